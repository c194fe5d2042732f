use hourglass_rs::SafeTimeProvider;
use log::{debug, info, warn};
use std::path::PathBuf;

use crate::book::Book;
use crate::config::{LibraryConfig, LoanPolicy};
use crate::date::CalendarDate;
use crate::decimal::Money;
use crate::errors::{LibraryError, Result};
use crate::events::{Event, EventStore};
use crate::loan::Loan;
use crate::member::Member;
use crate::snapshot;
use crate::types::{LibraryStatus, MemberId};

/// registry owning every book and member plus the circulation clock
#[derive(Debug)]
pub struct Library {
    config: LibraryConfig,
    books: Vec<Book>,
    members: Vec<Member>,
    current_date: CalendarDate,
    events: EventStore,
}

impl Default for Library {
    fn default() -> Self {
        Self::new(LibraryConfig::default())
    }
}

impl Library {
    /// create an empty registry with the clock at the configured seed date
    pub fn new(config: LibraryConfig) -> Self {
        Self {
            current_date: config.seed_date,
            config,
            books: Vec::new(),
            members: Vec::new(),
            events: EventStore::new(),
        }
    }

    /// builder for creating registries
    pub fn builder() -> LibraryBuilder {
        LibraryBuilder::new()
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn loan_policy(&self) -> &LoanPolicy {
        &self.config.loan_policy
    }

    /// all books in insertion order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// all members in insertion order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// add a book at the default fine rate
    pub fn add_book(&mut self, title: &str, author: &str, isbn: &str) -> Result<()> {
        let fine_per_day = self.config.loan_policy.default_fine_per_day;
        self.add_book_with_fine(title, author, isbn, fine_per_day)
    }

    pub fn add_book_with_fine(
        &mut self,
        title: &str,
        author: &str,
        isbn: &str,
        fine_per_day: Money,
    ) -> Result<()> {
        if self.find_book_by_isbn(isbn).is_some() {
            warn!("isbn already exists: {}", isbn);
            return Err(LibraryError::DuplicateIsbn {
                isbn: isbn.to_string(),
            });
        }

        let book = Book::with_fine_per_day(title, author, isbn, fine_per_day)?;
        self.books.push(book);

        info!("book added: {}", title);
        self.events.emit(Event::BookAdded {
            isbn: isbn.to_string(),
            title: title.to_string(),
            fine_per_day,
        });

        Ok(())
    }

    /// remove every book with this isbn, returning how many were removed.
    ///
    /// Active loans are not checked: a member may keep an isbn whose book is
    /// gone, and returning it then fails with `BookNotFound`.
    pub fn remove_book(&mut self, isbn: &str) -> Result<usize> {
        let was_borrowed = self
            .books
            .iter()
            .any(|book| book.isbn() == isbn && book.is_borrowed());

        let before = self.books.len();
        self.books.retain(|book| book.isbn() != isbn);
        let removed = before - self.books.len();

        if removed == 0 {
            warn!("cannot remove book, isbn not found: {}", isbn);
            return Err(LibraryError::BookNotFound {
                isbn: isbn.to_string(),
            });
        }

        if was_borrowed {
            warn!("book removed while on loan: {}", isbn);
        }
        info!("book removed: {}", isbn);
        self.events.emit(Event::BookRemoved {
            isbn: isbn.to_string(),
            removed,
            was_borrowed,
        });

        Ok(removed)
    }

    pub fn add_member(&mut self, name: &str, member_id: MemberId) -> Result<()> {
        if self.find_member_by_id(member_id).is_some() {
            warn!("member id already exists: {}", member_id);
            return Err(LibraryError::DuplicateMember { member_id });
        }

        self.members.push(Member::new(name, member_id));

        info!("member added: {}", name);
        self.events.emit(Event::MemberAdded {
            member_id,
            name: name.to_string(),
        });

        Ok(())
    }

    pub fn find_book_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.isbn() == isbn)
    }

    pub fn find_member_by_id(&self, member_id: MemberId) -> Option<&Member> {
        self.members
            .iter()
            .find(|member| member.member_id() == member_id)
    }

    /// books whose title contains `title`, in insertion order
    pub fn find_books_by_title(&self, title: &str) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| book.title().contains(title))
            .collect()
    }

    /// books past their due date as of the current date
    pub fn overdue_books(&self) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| book.is_overdue(self.current_date))
            .collect()
    }

    fn locate(&self, isbn: &str, member_id: MemberId) -> Result<(usize, usize)> {
        let book_index = self.books.iter().position(|book| book.isbn() == isbn);
        let member_index = self
            .members
            .iter()
            .position(|member| member.member_id() == member_id);

        match (book_index, member_index) {
            (Some(b), Some(m)) => Ok((b, m)),
            (None, _) => {
                warn!("book or member not found: isbn {}", isbn);
                Err(LibraryError::BookNotFound {
                    isbn: isbn.to_string(),
                })
            }
            (_, None) => {
                warn!("book or member not found: member {}", member_id);
                Err(LibraryError::MemberNotFound { member_id })
            }
        }
    }

    /// lend a book to a member as of the current date.
    ///
    /// `loan_days` falls back to the policy's default loan period.
    pub fn borrow_book(
        &mut self,
        isbn: &str,
        member_id: MemberId,
        loan_days: Option<u32>,
    ) -> Result<Loan> {
        let (book_index, member_index) = self.locate(isbn, member_id)?;
        let policy = &self.config.loan_policy;
        let loan_days = loan_days.unwrap_or(policy.default_loan_days);

        let book = &mut self.books[book_index];
        let member = &mut self.members[member_index];

        let loan = member
            .borrow_book(book, self.current_date, loan_days, policy.max_active_loans)
            .map_err(|e| {
                warn!("cannot borrow book: {}", e);
                e
            })?;

        info!("{} borrowed: {}", member.name(), book.title());
        self.events.emit(Event::BookBorrowed {
            loan_id: loan.id,
            isbn: isbn.to_string(),
            member_id,
            borrowed_on: loan.borrowed_on,
            due_on: loan.due_on,
        });

        Ok(loan)
    }

    /// take a book back from a member as of the current date, returning the
    /// fine charged (zero when returned on time)
    pub fn return_book(&mut self, isbn: &str, member_id: MemberId) -> Result<Money> {
        let (book_index, member_index) = self.locate(isbn, member_id)?;
        let today = self.current_date;

        let book = &mut self.books[book_index];
        let member = &mut self.members[member_index];

        let receipt = member.return_book(book, today).map_err(|e| {
            warn!("cannot return book: {}", e);
            e
        })?;

        info!("{} returned: {}", member.name(), book.title());
        self.events.emit(Event::BookReturned {
            loan_id: receipt.loan.id,
            isbn: isbn.to_string(),
            member_id,
            returned_on: today,
            overdue: receipt.fine.overdue,
        });

        if receipt.fine.overdue {
            info!(
                "fine of {} charged to member {} ({} days overdue)",
                receipt.fine.fine_amount.to_cents_string(),
                member_id,
                receipt.fine.days_overdue
            );
            self.events.emit(Event::FineAssessed {
                loan_id: receipt.loan.id,
                member_id,
                amount: receipt.fine.fine_amount,
                days_overdue: receipt.fine.days_overdue,
                assessed_on: today,
            });
        }

        Ok(receipt.fine.fine_amount)
    }

    /// apply a fine payment for a member, returning the remaining balance
    pub fn pay_fine(&mut self, member_id: MemberId, amount: Money) -> Result<Money> {
        let today = self.current_date;
        let member = self
            .members
            .iter_mut()
            .find(|member| member.member_id() == member_id)
            .ok_or(LibraryError::MemberNotFound { member_id })?;

        let remaining = member.pay_fine(amount).map_err(|e| {
            warn!("payment ignored: {}", e);
            e
        })?;

        info!("member {} paid {}", member_id, amount.to_cents_string());
        self.events.emit(Event::FinePaid {
            member_id,
            amount,
            remaining,
            paid_on: today,
        });

        Ok(remaining)
    }

    pub fn current_date(&self) -> CalendarDate {
        self.current_date
    }

    pub fn set_current_date(&mut self, date: CalendarDate) {
        if date == self.current_date {
            return;
        }

        debug!("clock moved from {} to {}", self.current_date, date);
        self.events.emit(Event::ClockChanged {
            old_date: self.current_date,
            new_date: date,
        });
        self.current_date = date;
    }

    /// move the clock forward by `days`
    pub fn advance_clock(&mut self, days: u32) -> CalendarDate {
        let next = self.current_date.advance(days);
        self.set_current_date(next);
        next
    }

    /// set the clock to the provider's current day
    pub fn sync_clock(&mut self, time_provider: &SafeTimeProvider) -> Result<CalendarDate> {
        let today = CalendarDate::try_from(time_provider.now().date_naive())?;
        self.set_current_date(today);
        Ok(today)
    }

    pub fn status(&self) -> LibraryStatus {
        LibraryStatus {
            total_books: self.books.len(),
            total_members: self.members.len(),
            borrowed_books: self.books.iter().filter(|book| book.is_borrowed()).count(),
            total_fines: self.members.iter().map(|member| member.total_fines()).sum(),
        }
    }

    pub fn status_report(&self) -> String {
        self.status().to_string()
    }

    pub fn list_all_books(&self) -> String {
        let listing: String = self
            .books
            .iter()
            .map(|book| format!("{}\n---\n", book))
            .collect();
        format!("\n ALL BOOKS \n================\n{}", listing)
    }

    pub fn list_all_members(&self) -> String {
        let listing: String = self
            .members
            .iter()
            .map(|member| format!("{}\n---\n", member))
            .collect();
        format!("\n ALL MEMBERS \n==================\n{}", listing)
    }

    /// write the flat snapshot to the configured data file
    pub fn save(&self) -> Result<PathBuf> {
        let path = self.config.data_file.clone();
        snapshot::save_to_file(self, &path)?;
        info!("data saved to: {}", path.display());
        Ok(path)
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

/// builder for `Library`
#[derive(Debug, Default)]
pub struct LibraryBuilder {
    config: Option<LibraryConfig>,
    loan_policy: Option<LoanPolicy>,
    data_file: Option<PathBuf>,
    current_date: Option<CalendarDate>,
}

impl LibraryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: LibraryConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn loan_policy(mut self, policy: LoanPolicy) -> Self {
        self.loan_policy = Some(policy);
        self
    }

    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }

    /// start the clock here instead of the seed date
    pub fn current_date(mut self, date: CalendarDate) -> Self {
        self.current_date = Some(date);
        self
    }

    pub fn build(self) -> Result<Library> {
        let mut config = self.config.unwrap_or_default();
        if let Some(policy) = self.loan_policy {
            config.loan_policy = policy;
        }
        if let Some(path) = self.data_file {
            config.data_file = path;
        }
        if let Some(date) = self.current_date {
            config.seed_date = date;
        }

        config.validate()?;
        Ok(Library::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn demo_library() -> Library {
        let mut library = Library::default();
        library
            .add_book("The C++ Programming Language", "Bjarne Stroustrup", "9780321563842")
            .unwrap();
        library
            .add_book("Effective Modern C++", "Scott Meyers", "9781491903995")
            .unwrap();
        library
            .add_book("Clean Code", "Robert C. Martin", "9780132350884")
            .unwrap();
        library.add_member("Anna", 1001).unwrap();
        library.add_member("David", 1002).unwrap();
        library.add_member("Michael", 1003).unwrap();
        library
    }

    #[test]
    fn test_default_clock_is_seed_date() {
        let library = Library::default();
        assert_eq!(library.current_date(), date("2024-01-28"));
    }

    #[test]
    fn test_duplicate_isbn_rejected() {
        let mut library = demo_library();
        let result = library.add_book("Another", "Someone", "9780132350884");

        assert!(matches!(result, Err(LibraryError::DuplicateIsbn { .. })));
        assert_eq!(library.books().len(), 3);
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let mut library = demo_library();
        let result = library.add_member("Anna Again", 1001);

        assert!(matches!(result, Err(LibraryError::DuplicateMember { member_id: 1001 })));
        assert_eq!(library.members().len(), 3);
        assert_eq!(library.find_member_by_id(1001).unwrap().name(), "Anna");
    }

    #[test]
    fn test_find_books_by_title_keeps_insertion_order() {
        let library = demo_library();

        let matches: Vec<&str> = library
            .find_books_by_title("C++")
            .iter()
            .map(|book| book.isbn())
            .collect();
        assert_eq!(matches, vec!["9780321563842", "9781491903995"]);

        assert!(library.find_books_by_title("Rust").is_empty());
        assert_eq!(library.find_books_by_title("").len(), 3);
    }

    #[test]
    fn test_lookup_misses() {
        let library = demo_library();
        assert!(library.find_book_by_isbn("0000000000").is_none());
        assert!(library.find_member_by_id(42).is_none());
    }

    #[test]
    fn test_borrow_and_late_return_scenario() {
        let mut library = demo_library();

        let loan = library.borrow_book("9780321563842", 1001, Some(7)).unwrap();
        assert_eq!(loan.due_on, date("2024-02-04"));

        let next = library.advance_clock(10);
        assert_eq!(next, date("2024-02-07"));
        library.set_current_date(date("2024-02-14"));

        let fine = library.return_book("9780321563842", 1001).unwrap();
        assert_eq!(fine, Money::from_decimal(dec!(5.0)));

        let status = library.status();
        assert_eq!(status.borrowed_books, 0);
        assert_eq!(status.total_fines, Money::from_major(5));
        assert_eq!(library.find_member_by_id(1001).unwrap().total_fines(), Money::from_major(5));
    }

    #[test]
    fn test_borrow_uses_default_loan_period() {
        let mut library = demo_library();
        let loan = library.borrow_book("9781491903995", 1002, None).unwrap();
        assert_eq!(loan.due_on, date("2024-02-11"));
    }

    #[test]
    fn test_borrow_with_missing_entities() {
        let mut library = demo_library();

        let missing_book = library.borrow_book("nope", 1001, None);
        assert!(matches!(missing_book, Err(LibraryError::BookNotFound { .. })));

        let missing_member = library.borrow_book("9780132350884", 9999, None);
        assert!(matches!(missing_member, Err(LibraryError::MemberNotFound { member_id: 9999 })));

        assert_eq!(library.status().borrowed_books, 0);
    }

    #[test]
    fn test_double_borrow_fails() {
        let mut library = demo_library();
        let first = library.borrow_book("9780132350884", 1001, Some(7)).unwrap();

        let second = library.borrow_book("9780132350884", 1002, None);
        assert!(matches!(second, Err(LibraryError::AlreadyBorrowed { .. })));

        let book = library.find_book_by_isbn("9780132350884").unwrap();
        assert_eq!(book.loan(), Some(&first));
        assert_eq!(library.find_member_by_id(1002).unwrap().borrowed_count(), 0);
    }

    #[test]
    fn test_double_return_fails() {
        let mut library = demo_library();
        library.borrow_book("9780132350884", 1001, None).unwrap();
        library.return_book("9780132350884", 1001).unwrap();

        let again = library.return_book("9780132350884", 1001);
        assert!(matches!(again, Err(LibraryError::NotBorrowedByMember { .. })));
    }

    #[test]
    fn test_loan_limit() {
        let mut library = Library::default();
        library.add_member("Anna", 1).unwrap();
        for i in 0..6 {
            library
                .add_book(&format!("Book {}", i), "Author", &format!("isbn-{}", i))
                .unwrap();
        }

        for i in 0..5 {
            library.borrow_book(&format!("isbn-{}", i), 1, None).unwrap();
        }

        let sixth = library.borrow_book("isbn-5", 1, None);
        assert!(matches!(sixth, Err(LibraryError::LoanLimitReached { .. })));
        assert_eq!(library.status().borrowed_books, 5);
        assert!(!library.find_book_by_isbn("isbn-5").unwrap().is_borrowed());
    }

    #[test]
    fn test_custom_loan_policy() {
        let mut library = Library::builder()
            .loan_policy(LoanPolicy::short_term())
            .build()
            .unwrap();
        library.add_member("Anna", 1).unwrap();
        for isbn in ["a", "b", "c"] {
            library.add_book("Title", "Author", isbn).unwrap();
        }

        let loan = library.borrow_book("a", 1, None).unwrap();
        assert_eq!(loan.due_on, date("2024-02-04"));
        library.borrow_book("b", 1, None).unwrap();
        assert!(library.borrow_book("c", 1, None).is_err());

        assert_eq!(
            library.find_book_by_isbn("a").unwrap().fine_per_day(),
            Money::from_major(1)
        );
    }

    #[test]
    fn test_remove_book() {
        let mut library = demo_library();
        assert_eq!(library.remove_book("9780132350884").unwrap(), 1);
        assert_eq!(library.books().len(), 2);

        let again = library.remove_book("9780132350884");
        assert!(matches!(again, Err(LibraryError::BookNotFound { .. })));
    }

    #[test]
    fn test_remove_borrowed_book_leaves_member_loan() {
        let mut library = demo_library();
        library.borrow_book("9780132350884", 1001, None).unwrap();

        library.remove_book("9780132350884").unwrap();

        let anna = library.find_member_by_id(1001).unwrap();
        assert!(anna.has_borrowed("9780132350884"));

        let result = library.return_book("9780132350884", 1001);
        assert!(matches!(result, Err(LibraryError::BookNotFound { .. })));
    }

    #[test]
    fn test_stale_loan_cannot_return_another_members_copy() {
        let mut library = demo_library();
        library.borrow_book("9780132350884", 1001, Some(7)).unwrap();
        library.remove_book("9780132350884").unwrap();

        library
            .add_book("Clean Code", "Robert C. Martin", "9780132350884")
            .unwrap();
        let davids = library.borrow_book("9780132350884", 1002, Some(7)).unwrap();
        library.set_current_date(date("2024-02-14"));
        library.take_events();

        let result = library.return_book("9780132350884", 1001);
        assert!(matches!(
            result,
            Err(LibraryError::NotBorrowedByMember { member_id: 1001, .. })
        ));

        let book = library.find_book_by_isbn("9780132350884").unwrap();
        assert_eq!(book.loan(), Some(&davids));
        assert_eq!(library.find_member_by_id(1001).unwrap().total_fines(), Money::ZERO);
        assert!(library.find_member_by_id(1002).unwrap().has_borrowed("9780132350884"));
        assert!(library.events().is_empty());

        let fine = library.return_book("9780132350884", 1002).unwrap();
        assert_eq!(fine, Money::from_major(5));
        assert_eq!(library.find_member_by_id(1002).unwrap().borrowed_count(), 0);
    }

    #[test]
    fn test_pay_fine_through_registry() {
        let mut library = demo_library();
        library.borrow_book("9780321563842", 1001, Some(7)).unwrap();
        library.set_current_date(date("2024-02-14"));
        library.return_book("9780321563842", 1001).unwrap();

        let over = library.pay_fine(1001, Money::from_major(10));
        assert!(matches!(over, Err(LibraryError::InvalidPaymentAmount { .. })));
        assert_eq!(library.status().total_fines, Money::from_major(5));

        let remaining = library.pay_fine(1001, Money::from_cents(250)).unwrap();
        assert_eq!(remaining, Money::from_cents(250));

        assert!(matches!(
            library.pay_fine(4242, Money::ONE),
            Err(LibraryError::MemberNotFound { .. })
        ));
    }

    #[test]
    fn test_overdue_books() {
        let mut library = demo_library();
        library.borrow_book("9780321563842", 1001, Some(7)).unwrap();
        library.borrow_book("9781491903995", 1002, None).unwrap();

        library.set_current_date(date("2024-02-05"));
        let overdue: Vec<&str> = library.overdue_books().iter().map(|b| b.isbn()).collect();
        assert_eq!(overdue, vec!["9780321563842"]);
    }

    #[test]
    fn test_sync_clock_from_time_provider() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
        ));
        let control = time.test_control().unwrap();

        let mut library = Library::default();
        assert_eq!(library.sync_clock(&time).unwrap(), date("2024-03-01"));

        control.advance(Duration::days(30));
        library.sync_clock(&time).unwrap();
        assert_eq!(library.current_date(), date("2024-03-31"));
    }

    #[test]
    fn test_events_recorded() {
        let mut library = demo_library();
        library.take_events();

        library.borrow_book("9780321563842", 1001, Some(7)).unwrap();
        library.set_current_date(date("2024-02-14"));
        library.return_book("9780321563842", 1001).unwrap();
        library.pay_fine(1001, Money::from_major(5)).unwrap();

        let events = library.take_events();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], Event::BookBorrowed { member_id: 1001, .. }));
        assert!(matches!(events[1], Event::ClockChanged { .. }));
        assert!(matches!(events[2], Event::BookReturned { overdue: true, .. }));
        assert!(matches!(events[3], Event::FineAssessed { days_overdue: 10, .. }));
        assert!(matches!(events[4], Event::FinePaid { .. }));
        assert!(library.events().is_empty());
    }

    #[test]
    fn test_failed_operations_emit_nothing() {
        let mut library = demo_library();
        library.take_events();

        let _ = library.add_book("Dup", "Dup", "9780132350884");
        let _ = library.add_member("Dup", 1001);
        let _ = library.return_book("9780132350884", 1001);
        let _ = library.pay_fine(1001, Money::ONE);

        assert!(library.events().is_empty());
    }

    #[test]
    fn test_status_report() {
        let mut library = demo_library();
        library.borrow_book("9780321563842", 1001, Some(7)).unwrap();

        let report = library.status_report();
        assert!(report.contains("Total books: 3"));
        assert!(report.contains("Total members: 3"));
        assert!(report.contains("Borrowed books: 1"));
        assert!(report.contains("Available books: 2"));
        assert!(report.contains("Total fines due: $0.00"));

        let books = library.list_all_books();
        assert!(books.contains("Due Date: 2024-02-04"));
        assert_eq!(books.matches("---").count(), 3);

        let members = library.list_all_members();
        assert!(members.contains("Member: David (ID: 1002)"));
    }

    #[test]
    fn test_builder_rejects_bad_policy() {
        let mut policy = LoanPolicy::default();
        policy.max_active_loans = 0;

        let result = Library::builder().loan_policy(policy).build();
        assert!(matches!(result, Err(LibraryError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_builder_overrides_clock() {
        let library = Library::builder()
            .current_date(date("2024-06-01"))
            .data_file("other.txt")
            .build()
            .unwrap();

        assert_eq!(library.current_date(), date("2024-06-01"));
        assert_eq!(library.config().data_file, PathBuf::from("other.txt"));
    }
}
