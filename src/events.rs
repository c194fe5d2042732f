use serde::{Deserialize, Serialize};

use crate::date::CalendarDate;
use crate::decimal::Money;
use crate::types::{LoanId, MemberId};

/// all events that can be emitted by the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // catalog events
    BookAdded {
        isbn: String,
        title: String,
        fine_per_day: Money,
    },
    BookRemoved {
        isbn: String,
        removed: usize,
        was_borrowed: bool,
    },
    MemberAdded {
        member_id: MemberId,
        name: String,
    },

    // circulation events
    BookBorrowed {
        loan_id: LoanId,
        isbn: String,
        member_id: MemberId,
        borrowed_on: CalendarDate,
        due_on: CalendarDate,
    },
    BookReturned {
        loan_id: LoanId,
        isbn: String,
        member_id: MemberId,
        returned_on: CalendarDate,
        overdue: bool,
    },

    // fine events
    FineAssessed {
        loan_id: LoanId,
        member_id: MemberId,
        amount: Money,
        days_overdue: i64,
        assessed_on: CalendarDate,
    },
    FinePaid {
        member_id: MemberId,
        amount: Money,
        remaining: Money,
        paid_on: CalendarDate,
    },

    // clock events
    ClockChanged {
        old_date: CalendarDate,
        new_date: CalendarDate,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
