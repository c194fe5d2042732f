use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::default_fine_per_day;
use crate::date::CalendarDate;
use crate::decimal::Money;
use crate::errors::{LibraryError, Result};
use crate::loan::{FineAssessment, Loan};
use crate::types::{BookStatus, MemberId};

/// catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    isbn: String,
    fine_per_day: Money,
    loan: Option<Loan>,
}

impl Book {
    /// create a book charging the default fine rate
    pub fn new(title: impl Into<String>, author: impl Into<String>, isbn: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            fine_per_day: default_fine_per_day(),
            loan: None,
        }
    }

    /// create a book with an explicit daily fine
    pub fn with_fine_per_day(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        fine_per_day: Money,
    ) -> Result<Self> {
        if fine_per_day.is_negative() {
            return Err(LibraryError::InvalidFineRate { rate: fine_per_day });
        }

        let mut book = Self::new(title, author, isbn);
        book.fine_per_day = fine_per_day;
        Ok(book)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn fine_per_day(&self) -> Money {
        self.fine_per_day
    }

    pub fn loan(&self) -> Option<&Loan> {
        self.loan.as_ref()
    }

    pub fn is_borrowed(&self) -> bool {
        self.loan.is_some()
    }

    pub fn status(&self) -> BookStatus {
        if self.is_borrowed() {
            BookStatus::Borrowed
        } else {
            BookStatus::Available
        }
    }

    pub fn borrower(&self) -> Option<MemberId> {
        self.loan.as_ref().map(|loan| loan.borrower)
    }

    pub fn borrowed_on(&self) -> Option<CalendarDate> {
        self.loan.as_ref().map(|loan| loan.borrowed_on)
    }

    pub fn due_on(&self) -> Option<CalendarDate> {
        self.loan.as_ref().map(|loan| loan.due_on)
    }

    /// check the book out to `borrower`, leaving any existing loan untouched on failure
    pub fn borrow(&mut self, as_of: CalendarDate, loan_days: u32, borrower: MemberId) -> Result<&Loan> {
        if self.is_borrowed() {
            return Err(LibraryError::AlreadyBorrowed {
                isbn: self.isbn.clone(),
            });
        }

        Ok(&*self.loan.insert(Loan::start(as_of, loan_days, borrower)))
    }

    /// check the book back in, handing back the finished loan
    pub fn return_loan(&mut self) -> Result<Loan> {
        self.loan.take().ok_or_else(|| LibraryError::NotBorrowed {
            isbn: self.isbn.clone(),
        })
    }

    pub fn is_overdue(&self, as_of: CalendarDate) -> bool {
        self.loan
            .as_ref()
            .map(|loan| loan.is_overdue(as_of))
            .unwrap_or(false)
    }

    pub fn calculate_fine(&self, as_of: CalendarDate) -> Money {
        self.assess_fine(as_of)
            .map(|assessment| assessment.fine_amount)
            .unwrap_or(Money::ZERO)
    }

    /// fine breakdown for the active loan, if any
    pub fn assess_fine(&self, as_of: CalendarDate) -> Option<FineAssessment> {
        self.loan
            .as_ref()
            .map(|loan| loan.assess_fine(as_of, self.fine_per_day))
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", self.title)?;
        writeln!(f, "   Author: {}", self.author)?;
        writeln!(f, "   ISBN: {}", self.isbn)?;
        write!(f, "   Status: {}", self.status().label())?;
        if let Some(due_on) = self.due_on() {
            write!(f, "\n   Due Date: {}", due_on)?;
        }
        Ok(())
    }
}
