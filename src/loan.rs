use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date::CalendarDate;
use crate::decimal::Money;
use crate::types::{LoanId, MemberId};

/// default loan period in days
pub const DEFAULT_LOAN_DAYS: u32 = 14;

/// borrower, borrow and due dates for a single checked-out book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub borrower: MemberId,
    pub borrowed_on: CalendarDate,
    pub due_on: CalendarDate,
}

impl Loan {
    /// start a loan for `borrower` running `loan_days` from `borrowed_on`
    pub fn start(borrowed_on: CalendarDate, loan_days: u32, borrower: MemberId) -> Self {
        Self {
            id: Uuid::new_v4(),
            borrower,
            borrowed_on,
            due_on: borrowed_on.advance(loan_days),
        }
    }

    /// overdue once the reference date is strictly past the due date
    pub fn is_overdue(&self, as_of: CalendarDate) -> bool {
        as_of > self.due_on
    }

    /// approximate days past due, zero when not overdue
    pub fn days_overdue(&self, as_of: CalendarDate) -> i64 {
        if !self.is_overdue(as_of) {
            return 0;
        }
        as_of.days_between(&self.due_on)
    }

    /// fine owed as of `as_of` at `fine_per_day`
    pub fn calculate_fine(&self, as_of: CalendarDate, fine_per_day: Money) -> Money {
        self.assess_fine(as_of, fine_per_day).fine_amount
    }

    /// fine owed with the breakdown used to compute it
    pub fn assess_fine(&self, as_of: CalendarDate, fine_per_day: Money) -> FineAssessment {
        if !self.is_overdue(as_of) {
            return FineAssessment {
                fine_amount: Money::ZERO,
                days_overdue: 0,
                fine_per_day,
                overdue: false,
            };
        }

        let days_overdue = self.days_overdue(as_of);

        FineAssessment {
            fine_amount: fine_per_day.times(days_overdue),
            days_overdue,
            fine_per_day,
            overdue: true,
        }
    }
}

/// fine calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineAssessment {
    pub fine_amount: Money,
    pub days_overdue: i64,
    pub fine_per_day: Money,
    pub overdue: bool,
}
