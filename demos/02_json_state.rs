/// json state - configuration and registry views as json
use circulation_rs::{CalendarDate, Library, LibraryConfig, LibraryView};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LibraryConfig::from_json(
        r#"{
            "data_file": "branch_data.txt",
            "seed_date": "2024-02-20",
            "loan_policy": { "default_loan_days": 21, "max_active_loans": 3 }
        }"#,
    )?;
    println!("config:\n{}\n", config.to_json_pretty()?);

    let mut library = Library::builder().config(config).build()?;
    library.add_book("Effective Modern C++", "Scott Meyers", "9781491903995")?;
    library.add_member("Michael", 1003)?;
    library.borrow_book("9781491903995", 1003, None)?;

    library.set_current_date("2024-03-20".parse::<CalendarDate>()?);

    println!("state:\n{}", LibraryView::from_library(&library).to_json_pretty()?);

    println!("\nevents:");
    for event in library.take_events() {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(())
}
