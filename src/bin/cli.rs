// Library Desk - Library Management Core
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::{anyhow, Context};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use library_desk::storage::models::{Book, Customer, MembershipStatus, NewBook, NewCustomer};
use library_desk::validation::{parse_id, parse_report_range, require_field};
use library_desk::{logging, Library, LibraryConfig, LibraryError};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "library-desk")]
#[command(about = "Library Desk - books, customers, checkouts and reports", long_about = None)]
struct Cli {
    /// Database file (overrides config and LIBRARY_DESK_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its tables
    Init,
    /// Book management
    Book {
        #[command(subcommand)]
        action: BookAction,
    },
    /// Customer management
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Check a book out to a customer
    Checkout {
        /// Book ID
        book_id: String,
        /// Customer ID
        customer_id: String,
    },
    /// Return a checked-out book
    Return {
        /// Book ID
        book_id: String,
        /// Transaction ID of the loan
        transaction_id: String,
    },
    /// List loans, optionally for one customer
    Loans {
        /// Customer ID
        #[arg(long)]
        customer: Option<String>,
    },
    /// Reports
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
}

#[derive(Subcommand)]
enum BookAction {
    /// Add a new book
    Add {
        title: String,
        author: String,
        genre: String,
        isbn: String,
    },
    /// Replace every field of a book
    Update {
        book_id: String,
        title: String,
        author: String,
        genre: String,
        isbn: String,
        /// Availability flag (keeps the stored value when omitted)
        #[arg(long, action = ArgAction::Set)]
        available: Option<bool>,
    },
    /// Delete a book
    Delete { book_id: String },
    /// Search by title, author, genre or ISBN (no term lists all)
    Search {
        #[arg(default_value = "")]
        term: String,
    },
    /// Show one book
    Show { book_id: String },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Register a new customer
    Add {
        name: String,
        email: String,
        #[arg(long, value_enum, default_value = "active")]
        status: MembershipArg,
    },
    /// Replace every field of a customer
    Update {
        customer_id: String,
        name: String,
        email: String,
        #[arg(long, value_enum)]
        status: MembershipArg,
    },
    /// Delete a customer
    Delete { customer_id: String },
    /// Show one customer
    Show { customer_id: String },
    /// List all customers
    List,
}

#[derive(Subcommand)]
enum ReportAction {
    /// Open loans past their due date
    Overdue,
    /// Loans checked out within a date range
    History {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MembershipArg {
    Active,
    Inactive,
    Suspended,
}

impl MembershipArg {
    fn to_status(self) -> MembershipStatus {
        match self {
            MembershipArg::Active => MembershipStatus::Active,
            MembershipArg::Inactive => MembershipStatus::Inactive,
            MembershipArg::Suspended => MembershipStatus::Suspended,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = LibraryConfig::load(path)?;
            config.apply_env();
            config
        }
        None => LibraryConfig::from_env(),
    };
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    config.validate()?;
    logging::init(&config.logging).context("Failed to initialize logging")?;

    let library = Library::open(&config)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_path.display()))?;

    let outcome = run(&library, cli.command, cli.json).await;
    library.close().await?;
    outcome
}

async fn run(library: &Library, command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Init => {
            let path = library
                .database()
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            info!(%path, "Database setup completed");
            println!("Database ready at {}", path);
        }
        Commands::Book { action } => book(library, action, json).await?,
        Commands::Customer { action } => customer(library, action, json).await?,
        Commands::Checkout {
            book_id,
            customer_id,
        } => {
            let book_id = parse_id("Book ID", &book_id).map_err(invalid)?;
            let customer_id = parse_id("Customer ID", &customer_id).map_err(invalid)?;
            let loan = library
                .ledger()
                .checkout(book_id, customer_id)
                .await
                .map_err(|e| failure("Failed to check out book.", &e))?;
            if json {
                print_json(&loan)?;
            } else {
                println!(
                    "Book checked out successfully! Transaction {} due {}",
                    loan.transaction_id, loan.due_date
                );
            }
        }
        Commands::Return {
            book_id,
            transaction_id,
        } => {
            let book_id = parse_id("Book ID", &book_id).map_err(invalid)?;
            let transaction_id = parse_id("Transaction ID", &transaction_id).map_err(invalid)?;
            let loan = library
                .ledger()
                .return_book(book_id, transaction_id)
                .await
                .map_err(|e| failure("Failed to return book.", &e))?;
            if json {
                print_json(&loan)?;
            } else {
                println!("Book returned successfully! Fine: {}", loan.fine);
            }
        }
        Commands::Loans { customer } => match customer {
            Some(customer_id) => {
                let customer_id = parse_id("Customer ID", &customer_id).map_err(invalid)?;
                let loans = library
                    .ledger()
                    .list_by_customer(customer_id)
                    .await
                    .map_err(|e| failure("Failed to load transactions.", &e))?;
                if json {
                    print_json(&loans)?;
                } else {
                    for l in &loans {
                        println!(
                            "{:>5}  {:>5}  {:<30}  {}  {}  {:<19}  {}",
                            l.transaction_id,
                            l.book_id,
                            l.title,
                            l.checkout_date,
                            l.due_date,
                            opt_date(l.return_date),
                            l.fine
                        );
                    }
                }
            }
            None => {
                let loans = library
                    .ledger()
                    .list_all()
                    .await
                    .map_err(|e| failure("Failed to load transactions.", &e))?;
                if json {
                    print_json(&loans)?;
                } else {
                    for l in &loans {
                        println!(
                            "{:>5}  {:<30}  {:<20}  {}  {}  {:<19}  {}",
                            l.transaction_id,
                            l.title,
                            l.customer_name,
                            l.checkout_date,
                            l.due_date,
                            opt_date(l.return_date),
                            l.fine
                        );
                    }
                }
            }
        },
        Commands::Report { action } => report(library, action, json).await?,
    }

    Ok(())
}

async fn book(library: &Library, action: BookAction, json: bool) -> anyhow::Result<()> {
    let catalog = library.catalog();

    match action {
        BookAction::Add {
            title,
            author,
            genre,
            isbn,
        } => {
            let new_book = NewBook::new(
                require_field("title", &title).map_err(invalid)?,
                require_field("author", &author).map_err(invalid)?,
                require_field("genre", &genre).map_err(invalid)?,
                require_field("isbn", &isbn).map_err(invalid)?,
            );
            let book_id = catalog
                .add_book(&new_book)
                .await
                .map_err(|e| failure("Failed to add book.", &e))?;
            if json {
                let book = Book {
                    book_id,
                    title: new_book.title,
                    author: new_book.author,
                    genre: new_book.genre,
                    isbn: new_book.isbn,
                    is_available: true,
                };
                print_json(&book)?;
            } else {
                println!("Book added successfully! ID {}", book_id);
            }
        }
        BookAction::Update {
            book_id,
            title,
            author,
            genre,
            isbn,
            available,
        } => {
            let book_id = parse_id("Book ID", &book_id).map_err(invalid)?;
            let title = require_field("title", &title).map_err(invalid)?.to_string();
            let author = require_field("author", &author).map_err(invalid)?.to_string();
            let genre = require_field("genre", &genre).map_err(invalid)?.to_string();
            let isbn = require_field("isbn", &isbn).map_err(invalid)?.to_string();
            let stored = catalog
                .find_book(book_id)
                .await
                .map_err(|e| failure("Failed to update book.", &e))?
                .ok_or_else(|| anyhow!("Failed to update book. Book {} not found.", book_id))?;
            let book = Book {
                book_id,
                title,
                author,
                genre,
                isbn,
                is_available: available.unwrap_or(stored.is_available),
            };
            catalog
                .update_book(&book)
                .await
                .map_err(|e| failure("Failed to update book.", &e))?;
            if json {
                print_json(&book)?;
            } else {
                println!("Book updated successfully!");
            }
        }
        BookAction::Delete { book_id } => {
            let book_id = parse_id("Book ID", &book_id).map_err(invalid)?;
            catalog
                .delete_book(book_id)
                .await
                .map_err(|e| failure("Failed to delete book.", &e))?;
            println!("Book deleted successfully!");
        }
        BookAction::Search { term } => {
            let books = catalog
                .search_books(term.trim())
                .await
                .map_err(|e| failure("Failed to search books.", &e))?;
            print_books(&books, json)?;
        }
        BookAction::Show { book_id } => {
            let book_id = parse_id("Book ID", &book_id).map_err(invalid)?;
            let book = catalog
                .find_book(book_id)
                .await
                .map_err(|e| failure("Failed to load book.", &e))?
                .ok_or_else(|| anyhow!("Book {} not found.", book_id))?;
            print_books(std::slice::from_ref(&book), json)?;
        }
    }

    Ok(())
}

async fn customer(library: &Library, action: CustomerAction, json: bool) -> anyhow::Result<()> {
    let members = library.members();

    match action {
        CustomerAction::Add {
            name,
            email,
            status,
        } => {
            let new_customer = NewCustomer::new(
                require_field("name", &name).map_err(invalid)?,
                require_field("email", &email).map_err(invalid)?,
                status.to_status().as_str(),
            );
            let customer_id = members
                .add_customer(&new_customer)
                .await
                .map_err(|e| failure("Failed to add customer.", &e))?;
            if json {
                let customer = Customer {
                    customer_id,
                    name: new_customer.name,
                    email: new_customer.email,
                    membership_status: new_customer.membership_status,
                };
                print_json(&customer)?;
            } else {
                println!("Customer added successfully! ID {}", customer_id);
            }
        }
        CustomerAction::Update {
            customer_id,
            name,
            email,
            status,
        } => {
            let customer = Customer {
                customer_id: parse_id("Customer ID", &customer_id).map_err(invalid)?,
                name: require_field("name", &name).map_err(invalid)?.to_string(),
                email: require_field("email", &email).map_err(invalid)?.to_string(),
                membership_status: status.to_status().to_string(),
            };
            members
                .update_customer(&customer)
                .await
                .map_err(|e| failure("Failed to update customer.", &e))?;
            if json {
                print_json(&customer)?;
            } else {
                println!("Customer updated successfully!");
            }
        }
        CustomerAction::Delete { customer_id } => {
            let customer_id = parse_id("Customer ID", &customer_id).map_err(invalid)?;
            members
                .delete_customer(customer_id)
                .await
                .map_err(|e| failure("Failed to delete customer.", &e))?;
            println!("Customer deleted successfully!");
        }
        CustomerAction::Show { customer_id } => {
            let customer_id = parse_id("Customer ID", &customer_id).map_err(invalid)?;
            let customer = members
                .get_customer(customer_id)
                .await
                .map_err(|e| failure("Failed to load customer.", &e))?
                .ok_or_else(|| anyhow!("Customer {} not found.", customer_id))?;
            print_customers(std::slice::from_ref(&customer), json)?;
        }
        CustomerAction::List => {
            let customers = members
                .list_customers()
                .await
                .map_err(|e| failure("Failed to load customers.", &e))?;
            print_customers(&customers, json)?;
        }
    }

    Ok(())
}

async fn report(library: &Library, action: ReportAction, json: bool) -> anyhow::Result<()> {
    let reports = library.reports();

    match action {
        ReportAction::Overdue => {
            let rows = reports
                .overdue_report()
                .await
                .map_err(|e| failure("Failed to generate overdue report.", &e))?;
            if json {
                print_json(&rows)?;
            } else {
                for r in &rows {
                    println!(
                        "{:>5}  {:<30}  {:<20}  Due: {}, Fine: {}",
                        r.transaction_id, r.title, r.customer_name, r.due_date, r.fine
                    );
                }
            }
        }
        ReportAction::History { from, to } => {
            let (start, end) = parse_report_range(&from, &to).map_err(invalid)?;
            let rows = reports
                .transaction_history(start, end)
                .await
                .map_err(|e| failure("Failed to generate transaction history.", &e))?;
            if json {
                print_json(&rows)?;
            } else {
                for r in &rows {
                    println!(
                        "{:>5}  {:<30}  {:<20}  Checkout: {}, Return: {}",
                        r.transaction_id,
                        r.title,
                        r.customer_name,
                        r.checkout_date,
                        opt_date(r.return_date)
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_books(books: &[Book], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(books);
    }
    for b in books {
        println!(
            "{:>5}  {:<30}  {:<20}  {:<15}  {:<13}  {}",
            b.book_id,
            b.title,
            b.author,
            b.genre,
            b.isbn,
            if b.is_available { "available" } else { "checked out" }
        );
    }
    Ok(())
}

fn print_customers(customers: &[Customer], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(customers);
    }
    for c in customers {
        println!(
            "{:>5}  {:<25}  {:<30}  {}",
            c.customer_id, c.name, c.email, c.membership_status
        );
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn opt_date(date: Option<chrono::NaiveDateTime>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Validation failures are shown as-is
fn invalid(err: LibraryError) -> anyhow::Error {
    anyhow!(err.user_message())
}

/// Store failures are shown with the action that failed; details are in the log
fn failure(action: &str, err: &LibraryError) -> anyhow::Error {
    if err.is_persistence_error() {
        anyhow!("{} {}", action, err.user_message())
    } else {
        anyhow!("{} {}", action, err)
    }
}
