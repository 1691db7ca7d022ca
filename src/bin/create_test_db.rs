use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use finance_tracker::{
    CategoryName, Frequency, NewBill, Timestamp, Transaction, TransactionType, create_bill,
    create_category, create_transaction, initialize_db,
};

/// A utility for creating a demo database for the finance_tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The user that owns the demo bills and transactions.
    #[arg(long, short, default_value = "demo-user")]
    user_id: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating categories...");
    let utilities = create_category(CategoryName::new("Utilities")?, &conn)?;
    let salary = create_category(CategoryName::new("Salary")?, &conn)?;
    let groceries = create_category(CategoryName::new("Groceries")?, &conn)?;

    println!("Creating bills for {}...", args.user_id);
    create_bill(
        NewBill::new(
            &args.user_id,
            "Electricity",
            4500.0,
            Timestamp::parse("2025-01-20")?,
            Frequency::Monthly,
        )
        .category_id(Some(utilities.id)),
        &conn,
    )?;
    create_bill(
        NewBill::new(
            &args.user_id,
            "Internet",
            3990.0,
            Timestamp::parse("2025-01-05")?,
            Frequency::Monthly,
        )
        .category_id(Some(utilities.id))
        .reminder_days_before(5),
        &conn,
    )?;
    create_bill(
        NewBill::new(
            &args.user_id,
            "Vehicle insurance",
            62000.0,
            Timestamp::parse("2025-06-01")?,
            Frequency::Yearly,
        )
        .notes(Some("Renewal through the broker".to_owned())),
        &conn,
    )?;

    println!("Creating transactions for {}...", args.user_id);
    create_transaction(
        Transaction::build(&args.user_id, 250000.0, TransactionType::Income)
            .category_id(Some(salary.id))
            .description(Some("Salary - January 2025".to_owned()))
            .date(Timestamp::parse("2025-01-25")?)
            .bank(Some("Commercial Bank".to_owned()))
            .recurring(true, Some(Frequency::Monthly)),
        &conn,
    )?;
    create_transaction(
        Transaction::build(&args.user_id, 8450.75, TransactionType::Expense)
            .category_id(Some(groceries.id))
            .description(Some("Keells Super".to_owned()))
            .date(Timestamp::parse("2025-01-12T10:30:00+05:30")?)
            .payment_method(Some("card".to_owned()))
            .bank(Some("Sampath Bank".to_owned())),
        &conn,
    )?;
    create_transaction(
        Transaction::build(&args.user_id, 4500.0, TransactionType::Expense)
            .category_id(Some(utilities.id))
            .description(Some("Electricity bill".to_owned()))
            .date(Timestamp::parse("2025-01-18")?),
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
