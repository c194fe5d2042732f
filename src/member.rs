use serde::{Deserialize, Serialize};
use std::fmt;

use crate::book::Book;
use crate::date::CalendarDate;
use crate::decimal::Money;
use crate::errors::{LibraryError, Result};
use crate::loan::{FineAssessment, Loan};
use crate::types::MemberId;

/// member ledger: active loans by isbn and unpaid fines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    name: String,
    member_id: MemberId,
    active_loans: Vec<String>,
    total_fines: Money,
}

/// outcome of a successful return
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnReceipt {
    pub loan: Loan,
    pub fine: FineAssessment,
}

impl Member {
    pub fn new(name: impl Into<String>, member_id: MemberId) -> Self {
        Self {
            name: name.into(),
            member_id,
            active_loans: Vec::new(),
            total_fines: Money::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn total_fines(&self) -> Money {
        self.total_fines
    }

    /// isbns currently checked out, in borrow order
    pub fn active_loans(&self) -> &[String] {
        &self.active_loans
    }

    pub fn borrowed_count(&self) -> usize {
        self.active_loans.len()
    }

    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.active_loans.iter().any(|held| held == isbn)
    }

    /// check `book` out to this member
    pub fn borrow_book(
        &mut self,
        book: &mut Book,
        as_of: CalendarDate,
        loan_days: u32,
        max_active_loans: usize,
    ) -> Result<Loan> {
        if self.active_loans.len() >= max_active_loans {
            return Err(LibraryError::LoanLimitReached {
                member_id: self.member_id,
                limit: max_active_loans,
            });
        }

        let loan = book.borrow(as_of, loan_days, self.member_id)?.clone();
        self.active_loans.push(book.isbn().to_string());

        Ok(loan)
    }

    /// check `book` back in, charging any overdue fine to this member
    pub fn return_book(&mut self, book: &mut Book, as_of: CalendarDate) -> Result<ReturnReceipt> {
        let position = self
            .active_loans
            .iter()
            .position(|held| held == book.isbn())
            .ok_or_else(|| LibraryError::NotBorrowedByMember {
                isbn: book.isbn().to_string(),
                member_id: self.member_id,
            })?;

        // a stale isbn can name a book that is now lent to someone else
        if book.borrower().is_some_and(|borrower| borrower != self.member_id) {
            return Err(LibraryError::NotBorrowedByMember {
                isbn: book.isbn().to_string(),
                member_id: self.member_id,
            });
        }

        // the fine must be assessed before the loan is cleared
        let fine = book.assess_fine(as_of).ok_or_else(|| LibraryError::NotBorrowed {
            isbn: book.isbn().to_string(),
        })?;
        let loan = book.return_loan()?;

        if fine.overdue {
            self.total_fines += fine.fine_amount;
        }
        self.active_loans.remove(position);

        Ok(ReturnReceipt { loan, fine })
    }

    /// pay off part or all of the outstanding fines, returning what is left
    pub fn pay_fine(&mut self, amount: Money) -> Result<Money> {
        if !amount.is_positive() || amount > self.total_fines {
            return Err(LibraryError::InvalidPaymentAmount {
                amount,
                outstanding: self.total_fines,
            });
        }

        self.total_fines -= amount;
        Ok(self.total_fines)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Member: {} (ID: {})", self.name, self.member_id)?;
        writeln!(f, "   Borrowed books: {}", self.active_loans.len())?;
        write!(f, "   Total fines: ${}", self.total_fines.to_cents_string())
    }
}
