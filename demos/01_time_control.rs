/// time control - drive the circulation clock from a controlled time source
use chrono::{Duration, TimeZone, Utc};
use circulation_rs::{Library, Money, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 28, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let mut library = Library::default();
    library.add_book_with_fine("Clean Code", "Robert C. Martin", "9780132350884", Money::from_cents(25))?;
    library.add_member("Anna", 1001)?;

    library.sync_clock(&time)?;
    let loan = library.borrow_book("9780132350884", 1001, Some(7))?;
    println!("borrowed on {}, due {}", loan.borrowed_on, loan.due_on);

    // check the overdue list week by week
    for week in 1..=3 {
        controller.advance(Duration::days(7));
        let today = library.sync_clock(&time)?;
        let overdue = library.overdue_books();
        println!("week {} ({}): {} overdue", week, today, overdue.len());
        for book in overdue {
            println!("  {} accrues ${}", book.title(), book.calculate_fine(today).to_cents_string());
        }
    }

    let fine = library.return_book("9780132350884", 1001)?;
    println!("\nreturned on {}, fine ${}", library.current_date(), fine.to_cents_string());

    let remaining = library.pay_fine(1001, fine)?;
    println!("paid in full, remaining ${}", remaining.to_cents_string());

    Ok(())
}
