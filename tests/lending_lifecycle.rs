//! End-to-end lending lifecycle against an on-disk database
//!
//! Covers the library's observable rules through the public API only:
//! availability mirrors open loans, fines count whole calendar days,
//! reports see only what they should.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use library_desk::storage::models::{LoanState, NewBook, NewCustomer};
use library_desk::{Library, LibraryError};

fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

struct Desk {
    _dir: tempfile::TempDir,
    library: Library,
}

async fn open_desk() -> Desk {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let library = Library::open_path(dir.path().join("library.db"))
        .await
        .expect("Failed to open library");
    Desk { _dir: dir, library }
}

async fn add_book(library: &Library, title: &str, genre: &str, isbn: &str) -> i64 {
    library
        .catalog()
        .add_book(&NewBook::new(title, "Some Author", genre, isbn))
        .await
        .expect("Failed to add book")
}

async fn add_customer(library: &Library, name: &str) -> i64 {
    library
        .members()
        .add_customer(&NewCustomer::new(name, format!("{}@example.com", name), "Active"))
        .await
        .expect("Failed to add customer")
}

#[tokio::test]
async fn test_checkout_and_late_return_round_trip() {
    let desk = open_desk().await;
    let lib = &desk.library;
    let book = add_book(lib, "Dune", "Science Fiction", "9780441013593").await;
    let ada = add_customer(lib, "ada").await;

    let loan = lib.ledger().checkout_at(book, ada, at(1, 1, 0, 10)).await.unwrap();
    assert_eq!(loan.state(), LoanState::Open);
    assert_eq!(loan.due_date - loan.checkout_date, Duration::days(14));
    assert!(!lib.catalog().find_book(book).await.unwrap().unwrap().is_available);

    // Returned on day 17 at 23:50; due day 15 at 00:10
    let closed = lib
        .ledger()
        .return_book_at(book, loan.transaction_id, at(1, 17, 23, 50))
        .await
        .unwrap();
    assert_eq!(closed.fine, 2);
    assert!(lib.catalog().find_book(book).await.unwrap().unwrap().is_available);

    let history = lib.ledger().list_by_customer(ada).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].title, "Dune");
    assert_eq!(history[0].fine, 2);
    assert_eq!(history[0].return_date, Some(at(1, 17, 23, 50)));
}

#[tokio::test]
async fn test_live_clock_checkout_and_return() {
    let desk = open_desk().await;
    let lib = &desk.library;
    let book = add_book(lib, "Emma", "Classic", "9780141439587").await;
    let ada = add_customer(lib, "ada").await;

    let loan = lib.ledger().checkout(book, ada).await.unwrap();
    assert_eq!(loan.due_date, loan.checkout_date + Duration::days(14));

    let closed = lib.ledger().return_book(book, loan.transaction_id).await.unwrap();
    assert_eq!(closed.fine, 0);
    assert!(closed.return_date.is_some());
    assert!(lib.catalog().find_book(book).await.unwrap().unwrap().is_available);
}

#[tokio::test]
async fn test_double_checkout_rejected_until_returned() {
    let desk = open_desk().await;
    let lib = &desk.library;
    let book = add_book(lib, "Dune", "Science Fiction", "9780441013593").await;
    let ada = add_customer(lib, "ada").await;
    let bob = add_customer(lib, "bob").await;

    let first = lib.ledger().checkout_at(book, ada, at(2, 1, 9, 0)).await.unwrap();
    assert!(matches!(
        lib.ledger().checkout_at(book, bob, at(2, 2, 9, 0)).await,
        Err(LibraryError::Conflict(_))
    ));

    lib.ledger()
        .return_book_at(book, first.transaction_id, at(2, 3, 9, 0))
        .await
        .unwrap();
    let second = lib.ledger().checkout_at(book, bob, at(2, 4, 9, 0)).await.unwrap();
    assert_ne!(first.transaction_id, second.transaction_id);
    assert_eq!(lib.ledger().list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_return_twice_is_not_idempotent() {
    let desk = open_desk().await;
    let lib = &desk.library;
    let book = add_book(lib, "Dune", "Science Fiction", "9780441013593").await;
    let ada = add_customer(lib, "ada").await;

    let loan = lib.ledger().checkout_at(book, ada, at(3, 1, 12, 0)).await.unwrap();
    let first = lib
        .ledger()
        .return_book_at(book, loan.transaction_id, at(3, 10, 12, 0))
        .await
        .unwrap();
    assert_eq!(first.fine, 0);

    let second = lib
        .ledger()
        .return_book_at(book, loan.transaction_id, at(3, 18, 8, 0))
        .await
        .unwrap();
    assert_eq!(second.return_date, Some(at(3, 18, 8, 0)));
    assert_eq!(second.fine, 3);

    let stored = lib.ledger().find_loan(loan.transaction_id).await.unwrap().unwrap();
    assert_eq!(stored, second);
}

#[tokio::test]
async fn test_reports_over_mixed_loans() {
    let desk = open_desk().await;
    let lib = &desk.library;
    let overdue = add_book(lib, "Overdue", "Mystery", "9780000000001").await;
    let late = add_book(lib, "Returned Late", "Mystery", "9780000000002").await;
    let fresh = add_book(lib, "Fresh", "Mystery", "9780000000003").await;
    let ada = add_customer(lib, "ada").await;

    let open_loan = lib.ledger().checkout_at(overdue, ada, at(4, 1, 10, 0)).await.unwrap();
    let late_loan = lib.ledger().checkout_at(late, ada, at(4, 1, 11, 0)).await.unwrap();
    lib.ledger()
        .return_book_at(late, late_loan.transaction_id, at(4, 20, 10, 0))
        .await
        .unwrap();
    lib.ledger().checkout_at(fresh, ada, at(4, 18, 10, 0)).await.unwrap();

    let rows = lib.reports().overdue_report_at(at(4, 21, 0, 0)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].transaction_id, open_loan.transaction_id);
    assert_eq!(rows[0].fine, 0);

    let day = |d| NaiveDate::from_ymd_opt(2025, 4, d).unwrap();
    let history = lib.reports().transaction_history(day(1), day(18)).await.unwrap();
    let titles: Vec<&str> = history.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["Overdue", "Returned Late"]);
    assert_eq!(history[1].return_date, Some(at(4, 20, 10, 0)));
}

#[tokio::test]
async fn test_deleting_lent_book_is_a_persistence_error() {
    let desk = open_desk().await;
    let lib = &desk.library;
    let book = add_book(lib, "Dune", "Science Fiction", "9780441013593").await;
    let ada = add_customer(lib, "ada").await;
    lib.ledger().checkout_at(book, ada, at(5, 1, 9, 0)).await.unwrap();

    let err = lib.catalog().delete_book(book).await.unwrap_err();
    assert!(err.is_persistence_error());
    assert!(lib.catalog().find_book(book).await.unwrap().is_some());
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");

    let lib = Library::open_path(&path).await.unwrap();
    let book = add_book(&lib, "Dune", "Science Fiction", "9780441013593").await;
    let ada = add_customer(&lib, "ada").await;
    lib.ledger().checkout_at(book, ada, at(6, 1, 9, 0)).await.unwrap();
    lib.close().await.unwrap();

    let lib = Library::open_path(&path).await.unwrap();
    let books = lib.catalog().search_books("sci").await.unwrap();
    assert_eq!(books.len(), 1);
    assert!(!books[0].is_available);
    assert_eq!(lib.ledger().list_by_customer(ada).await.unwrap().len(), 1);
}
