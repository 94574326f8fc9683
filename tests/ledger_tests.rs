// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billetera::error::LedgerError;
use billetera::filters::{Filters, SortOrder, build_predicate};
use billetera::ledger;
use billetera::models::{Currency, NewTransaction, TransactionType};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
}

fn new_tx(amount: &str, date: &str, bank: i64, cat: i64, tt: TransactionType) -> NewTransaction {
    NewTransaction {
        amount: amount.parse().unwrap(),
        currency: Currency::Cop,
        date: at(date),
        description: Some("lunch".into()),
        category_id: cat,
        bank_id: bank,
        transaction_type: tt,
    }
}

fn setup() -> Connection {
    let conn = billetera::db::open_in_memory().unwrap();
    // Food=1 (Expense), Salary=13 (Income); Bancolombia=1, Nequi=7
    for tx in [
        new_tx("100", "2024-03-01 08:00:00", 1, 1, TransactionType::Expense),
        new_tx("50", "2024-03-05 09:30:00", 7, 13, TransactionType::Income),
        new_tx("30", "2024-03-10 18:45:00", 1, 13, TransactionType::Income),
        new_tx("999", "2024-02-28 10:00:00", 1, 1, TransactionType::Expense),
    ] {
        ledger::insert_transaction(&conn, &tx).unwrap();
    }
    conn
}

fn ledger_err(err: &anyhow::Error) -> Option<&LedgerError> {
    err.downcast_ref::<LedgerError>()
}

#[test]
fn seed_data_is_present() {
    let conn = billetera::db::open_in_memory().unwrap();
    let banks = ledger::list_banks(&conn).unwrap();
    assert_eq!(banks.len(), 8);
    assert_eq!(banks[0].name, "Bancolombia");
    assert!(banks[0].logo_url.starts_with("https://"));
    assert_eq!(ledger::list_categories(&conn, None).unwrap().len(), 19);
    let income = ledger::list_categories(&conn, Some(TransactionType::Income)).unwrap();
    assert_eq!(income.len(), 7);
    assert!(income.iter().all(|c| c.category_type == TransactionType::Income));
    assert_eq!(income[0].name, "Salary");
}

#[test]
fn default_filter_reads_only_the_current_month_newest_first() {
    let conn = setup();
    let p = build_predicate(&Filters::default(), today());
    let rows = ledger::fetch_transactions(&conn, &p).unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);

    let first = &rows[2];
    assert_eq!(first.amount, Decimal::from(100));
    assert_eq!(first.currency, Currency::Cop);
    assert_eq!(first.category.name, "Food");
    assert_eq!(first.category.category_type, TransactionType::Expense);
    assert_eq!(first.bank.name, "Bancolombia");
    assert_eq!(first.description.as_deref(), Some("lunch"));
    assert_eq!(first.date, at("2024-03-01 08:00:00"));
}

#[test]
fn ascending_order_and_optional_predicates() {
    let conn = setup();
    let filters = Filters {
        year: Some(2024),
        bank_id: Some(1),
        order: Some(SortOrder::Ascending),
        ..Filters::default()
    };
    let rows = ledger::fetch_transactions(&conn, &build_predicate(&filters, today())).unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![4, 1, 3]);

    let income_only = Filters {
        year: Some(2024),
        transaction_type: Some(TransactionType::Income),
        category_id: Some(13),
        ..Filters::default()
    };
    let rows =
        ledger::fetch_transactions(&conn, &build_predicate(&income_only, today())).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.transaction_type == TransactionType::Income));
}

#[test]
fn inclusive_day_range_catches_late_evening_rows() {
    let conn = setup();
    let filters = Filters {
        date_range: Some(billetera::filters::DateRange::days(
            NaiveDate::from_ymd_opt(2024, 3, 5),
            NaiveDate::from_ymd_opt(2024, 3, 10),
        )),
        ..Filters::default()
    };
    let rows = ledger::fetch_transactions(&conn, &build_predicate(&filters, today())).unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2]);
}

#[test]
fn amounts_must_be_positive() {
    let conn = setup();
    for bad in ["0", "-5", "0.004", "0.005"] {
        let err = ledger::insert_transaction(
            &conn,
            &new_tx(bad, "2024-03-02 10:00:00", 1, 1, TransactionType::Expense),
        )
        .unwrap_err();
        assert!(matches!(
            ledger_err(&err),
            Some(LedgerError::NonPositiveAmount(_))
        ));
    }
    assert_eq!(ledger::count_transactions(&conn).unwrap(), 4);
}

#[test]
fn amounts_are_rounded_to_cents() {
    let conn = setup();
    let id = ledger::insert_transaction(
        &conn,
        &new_tx("12.3456", "2024-03-02 10:00:00", 1, 1, TransactionType::Expense),
    )
    .unwrap();
    let stored: String = conn
        .query_row("SELECT amount FROM transactions WHERE id=?1", [id], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(stored, "12.35");
}

#[test]
fn unknown_references_are_rejected() {
    let conn = setup();
    let err = ledger::insert_transaction(
        &conn,
        &new_tx("1", "2024-03-02 10:00:00", 999, 1, TransactionType::Expense),
    )
    .unwrap_err();
    assert_eq!(ledger_err(&err), Some(&LedgerError::UnknownBank(999)));

    let err = ledger::insert_transaction(
        &conn,
        &new_tx("1", "2024-03-02 10:00:00", 1, 555, TransactionType::Expense),
    )
    .unwrap_err();
    assert_eq!(ledger_err(&err), Some(&LedgerError::UnknownCategory(555)));
}

#[test]
fn update_and_delete() {
    let conn = setup();
    let mut tx = new_tx("75.5", "2024-03-03 11:00:00", 7, 2, TransactionType::Expense);
    tx.currency = Currency::Usd;
    tx.description = Some("   ".into());
    ledger::update_transaction(&conn, 1, &tx).unwrap();

    let row = ledger::get_transaction(&conn, 1).unwrap().unwrap();
    assert_eq!(row.amount, "75.5".parse::<Decimal>().unwrap());
    assert_eq!(row.currency, Currency::Usd);
    assert_eq!(row.bank.name, "Nequi");
    assert_eq!(row.category.name, "Clothes");
    assert_eq!(row.description, None);

    let err = ledger::update_transaction(&conn, 404, &tx).unwrap_err();
    assert_eq!(ledger_err(&err), Some(&LedgerError::TransactionNotFound(404)));

    ledger::delete_transaction(&conn, 1).unwrap();
    assert!(ledger::get_transaction(&conn, 1).unwrap().is_none());
    assert_eq!(ledger::count_transactions(&conn).unwrap(), 3);
    let err = ledger::delete_transaction(&conn, 1).unwrap_err();
    assert_eq!(ledger_err(&err), Some(&LedgerError::TransactionNotFound(1)));
}

#[test]
fn category_names_are_validated() {
    assert_eq!(ledger::validate_category_name("  Pet Food  ").unwrap(), "Pet Food");
    assert!(ledger::validate_category_name("").is_err());
    assert!(ledger::validate_category_name("   ").is_err());
    assert!(ledger::validate_category_name("Games2").is_err());
    assert!(ledger::validate_category_name("Café").is_err());
    assert!(ledger::validate_category_name(&"a".repeat(25)).is_ok());
    assert!(ledger::validate_category_name(&"a".repeat(26)).is_err());
}

#[test]
fn add_category_appends() {
    let conn = billetera::db::open_in_memory().unwrap();
    let cat = ledger::add_category(&conn, "Pets", TransactionType::Expense).unwrap();
    assert_eq!(cat.id, 20);
    assert_eq!(cat.name, "Pets");
    let all = ledger::list_categories(&conn, Some(TransactionType::Expense)).unwrap();
    assert_eq!(all.last().map(|c| c.name.as_str()), Some("Pets"));

    let err = ledger::add_category(&conn, "Pets & Vet", TransactionType::Expense).unwrap_err();
    assert!(matches!(
        ledger_err(&err),
        Some(LedgerError::InvalidCategoryName(_, _))
    ));
}

#[test]
fn integrity_checks_find_mismatches_and_unlinked_rows() {
    let conn = setup();
    // tx 3 is Income under Salary, tx 1 Expense under Food: both consistent
    assert!(ledger::find_type_mismatches(&conn).unwrap().is_empty());

    conn.execute(
        "INSERT INTO transactions(amount, currency, transaction_date, category_id, bank_id, transaction_type)
         VALUES ('5', 'COP', '2024-03-11 10:00:00', 1, 1, 'Income')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(amount, currency, transaction_date, category_id, bank_id, transaction_type)
         VALUES ('6', 'USD', '2024-03-12 10:00:00', 1, NULL, 'Expense')",
        [],
    )
    .unwrap();

    let mismatches = ledger::find_type_mismatches(&conn).unwrap();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].transaction_id, 5);
    assert_eq!(mismatches[0].category_name, "Food");
    assert_eq!(mismatches[0].category_type, TransactionType::Expense);

    assert_eq!(ledger::find_unlinked(&conn).unwrap(), vec![6]);
    let rows =
        ledger::fetch_transactions(&conn, &build_predicate(&Filters::default(), today())).unwrap();
    assert!(rows.iter().all(|r| r.id != 6));
}

#[test]
fn out_of_domain_currency_fails_the_read() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE banks(id INTEGER PRIMARY KEY, bank_name TEXT, logo_url TEXT);
        CREATE TABLE categories(id INTEGER PRIMARY KEY, category_name TEXT, category_type TEXT);
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY,
            amount TEXT NOT NULL,
            currency TEXT NOT NULL,
            transaction_date TEXT NOT NULL,
            transaction_description TEXT,
            category_id INTEGER,
            bank_id INTEGER,
            transaction_type TEXT NOT NULL
        );
        INSERT INTO banks VALUES (1, 'Cash', NULL);
        INSERT INTO categories VALUES (1, 'Food', 'Expense');
        INSERT INTO transactions(amount, currency, transaction_date, category_id, bank_id, transaction_type)
            VALUES ('10', 'EUR', '2024-03-01 10:00:00', 1, 1, 'Expense');
        "#,
    )
    .unwrap();
    let p = build_predicate(&Filters::default(), today());
    assert!(ledger::fetch_transactions(&conn, &p).is_err());
}
