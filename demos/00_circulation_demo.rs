/// circulation demo - add books and members, borrow, return late, save
use circulation_rs::Library;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("  LIBRARY MANAGEMENT SYSTEM ");
    println!("================================\n");

    let mut library = Library::default();

    // add books
    library.add_book("The C++ Programming Language", "Bjarne Stroustrup", "9780321563842")?;
    library.add_book("Effective Modern C++", "Scott Meyers", "9781491903995")?;
    library.add_book("Clean Code", "Robert C. Martin", "9780132350884")?;

    // add members
    library.add_member("Anna", 1001)?;
    library.add_member("David", 1002)?;
    library.add_member("Michael", 1003)?;

    print!("{}", library.status_report());

    // borrow books
    println!("\n BORROWING BOOKS ");
    library.borrow_book("9780321563842", 1001, Some(7))?; // short loan
    library.borrow_book("9781491903995", 1002, None)?;

    print!("{}", library.list_all_books());
    print!("{}", library.list_all_members());

    // return ten days later
    println!("\n RETURNING BOOKS ");
    library.advance_clock(10);
    let fine = library.return_book("9780321563842", 1001)?;
    println!("fine charged: ${}", fine.to_cents_string());

    println!("\n FINAL STATUS ");
    print!("{}", library.status_report());

    let path = library.save()?;
    println!("\nsaved to {}", path.display());

    Ok(())
}
