use thiserror::Error;

use crate::decimal::Money;
use crate::types::MemberId;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        day: u32,
        month: u32,
        year: i64,
    },

    #[error("invalid date format: {input}")]
    InvalidDateFormat {
        input: String,
    },

    #[error("isbn already exists: {isbn}")]
    DuplicateIsbn {
        isbn: String,
    },

    #[error("member id already exists: {member_id}")]
    DuplicateMember {
        member_id: MemberId,
    },

    #[error("book not found: {isbn}")]
    BookNotFound {
        isbn: String,
    },

    #[error("member not found: {member_id}")]
    MemberNotFound {
        member_id: MemberId,
    },

    #[error("loan limit reached: member {member_id} already holds {limit} books")]
    LoanLimitReached {
        member_id: MemberId,
        limit: usize,
    },

    #[error("book already borrowed: {isbn}")]
    AlreadyBorrowed {
        isbn: String,
    },

    #[error("book not borrowed: {isbn}")]
    NotBorrowed {
        isbn: String,
    },

    #[error("book {isbn} is not borrowed by member {member_id}")]
    NotBorrowedByMember {
        isbn: String,
        member_id: MemberId,
    },

    #[error("invalid payment amount: {amount}, outstanding fines {outstanding}")]
    InvalidPaymentAmount {
        amount: Money,
        outstanding: Money,
    },

    #[error("invalid fine rate: {rate}")]
    InvalidFineRate {
        rate: Money,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
