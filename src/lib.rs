pub mod book;
pub mod config;
pub mod date;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod library;
pub mod loan;
pub mod member;
pub mod snapshot;
pub mod types;

// re-export key types
pub use book::Book;
pub use config::{LibraryConfig, LoanPolicy};
pub use date::{days_in_month, is_leap_year, CalendarDate};
pub use decimal::Money;
pub use errors::{LibraryError, Result};
pub use events::{Event, EventStore};
pub use library::{Library, LibraryBuilder};
pub use loan::{FineAssessment, Loan, DEFAULT_LOAN_DAYS};
pub use member::{Member, ReturnReceipt};
pub use snapshot::{save_to_file, write_snapshot, LibraryView};
pub use types::{BookStatus, LibraryStatus, LoanId, MemberId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
