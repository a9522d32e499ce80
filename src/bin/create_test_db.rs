use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use savings_ledger::{
    models::{Transaction, TransactionType, UserName},
    stores::sqlite::create_engine,
};

/// A utility for creating a test database for the REST API server of savings_ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many months of transactions to generate, ending with the current month.
    #[arg(long, short, default_value_t = 6)]
    months: u32,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let engine = create_engine(conn, "Etc/UTC")?;

    println!("Creating test user...");
    let user = engine.register_user(UserName::new("Test User")?)?;

    println!("Creating {} months of transactions...", args.months);
    let today = OffsetDateTime::now_utc().date();
    let mut date = today;

    for month in 0..args.months {
        // Step back into the previous month without landing on a missing day.
        if month > 0 {
            date = date.replace_day(1)? - Duration::days(1);
        }
        let payday = date.replace_day(1)?;

        engine.record_transaction(
            Transaction::build(user.id, 4200.0, payday, TransactionType::Income)
                .category("Salary")
                .recipient("Employer"),
            today,
        )?;
        engine.record_transaction(
            Transaction::build(user.id, 1800.0, payday, TransactionType::Expense)
                .category("Rent")
                .recipient("Landlord"),
            today,
        )?;

        // Every third month overspends so that a deficit carries forward.
        let groceries = if month % 3 == 2 { 3100.0 } else { 650.0 };
        engine.record_transaction(
            Transaction::build(user.id, groceries, payday, TransactionType::Expense)
                .category("Groceries")
                .recipient("Supermarket"),
            today,
        )?;
    }

    println!("Success!");

    Ok(())
}
