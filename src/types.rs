use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a member
pub type MemberId = u32;

/// unique identifier for a single loan
pub type LoanId = Uuid;

/// circulation status of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookStatus {
    /// on the shelf
    Available,
    /// checked out to a member
    Borrowed,
}

impl BookStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Borrowed => "Borrowed",
        }
    }
}

/// aggregate counters for the whole registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LibraryStatus {
    pub total_books: usize,
    pub total_members: usize,
    pub borrowed_books: usize,
    pub total_fines: Money,
}

impl LibraryStatus {
    pub fn available_books(&self) -> usize {
        self.total_books.saturating_sub(self.borrowed_books)
    }
}

impl fmt::Display for LibraryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n LIBRARY STATUS ")?;
        writeln!(f, "=====================")?;
        writeln!(f, "Total books: {}", self.total_books)?;
        writeln!(f, "Total members: {}", self.total_members)?;
        writeln!(f, "Borrowed books: {}", self.borrowed_books)?;
        writeln!(f, "Available books: {}", self.available_books())?;
        writeln!(f, "Total fines due: ${}", self.total_fines.to_cents_string())
    }
}
