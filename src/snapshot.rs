//! flat text snapshot and json view of the registry.
//!
//! The text format is write-only:
//!
//! ```text
//! [BOOKS]
//! title|author|isbn|borrowed(0/1)
//! [MEMBERS]
//! name|memberId|totalFines
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::book::Book;
use crate::date::CalendarDate;
use crate::decimal::Money;
use crate::errors::Result;
use crate::library::Library;
use crate::member::Member;
use crate::types::{BookStatus, LibraryStatus, MemberId};

pub const BOOKS_SECTION: &str = "[BOOKS]";
pub const MEMBERS_SECTION: &str = "[MEMBERS]";

/// write the flat snapshot of every book and member
pub fn write_snapshot<W: Write>(library: &Library, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", BOOKS_SECTION)?;
    for book in library.books() {
        writeln!(
            writer,
            "{}|{}|{}|{}",
            book.title(),
            book.author(),
            book.isbn(),
            if book.is_borrowed() { "1" } else { "0" }
        )?;
    }

    writeln!(writer, "{}", MEMBERS_SECTION)?;
    for member in library.members() {
        writeln!(
            writer,
            "{}|{}|{}",
            member.name(),
            member.member_id(),
            member.total_fines().to_cents_string()
        )?;
    }

    Ok(())
}

/// write the flat snapshot to `path`, replacing any existing file
pub fn save_to_file(library: &Library, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_snapshot(library, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// serializable view of the whole registry
#[derive(Debug, Serialize, Deserialize)]
pub struct LibraryView {
    pub current_date: CalendarDate,
    pub status: LibraryStatus,
    pub books: Vec<BookView>,
    pub members: Vec<MemberView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookView {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub status: BookStatus,
    pub fine_per_day: Money,
    pub borrowed_on: Option<CalendarDate>,
    pub due_on: Option<CalendarDate>,
    pub overdue: bool,
    pub accrued_fine: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemberView {
    pub name: String,
    pub member_id: MemberId,
    pub active_loans: Vec<String>,
    pub total_fines: Money,
}

impl BookView {
    pub fn from_book(book: &Book, as_of: CalendarDate) -> Self {
        BookView {
            title: book.title().to_string(),
            author: book.author().to_string(),
            isbn: book.isbn().to_string(),
            status: book.status(),
            fine_per_day: book.fine_per_day(),
            borrowed_on: book.borrowed_on(),
            due_on: book.due_on(),
            overdue: book.is_overdue(as_of),
            accrued_fine: book.calculate_fine(as_of),
        }
    }
}

impl MemberView {
    pub fn from_member(member: &Member) -> Self {
        MemberView {
            name: member.name().to_string(),
            member_id: member.member_id(),
            active_loans: member.active_loans().to_vec(),
            total_fines: member.total_fines(),
        }
    }
}

impl LibraryView {
    pub fn from_library(library: &Library) -> Self {
        let today = library.current_date();
        LibraryView {
            current_date: today,
            status: library.status(),
            books: library
                .books()
                .iter()
                .map(|book| BookView::from_book(book, today))
                .collect(),
            members: library.members().iter().map(MemberView::from_member).collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
