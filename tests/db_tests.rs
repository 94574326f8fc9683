// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billetera::db::{self, LATEST_SCHEMA_VERSION};
use rusqlite::Connection;
use tempfile::tempdir;

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
        r.get(0)
    })
    .unwrap()
}

fn version(conn: &Connection) -> String {
    conn.query_row("SELECT version_number FROM schema_version", [], |r| {
        r.get(0)
    })
    .unwrap()
}

#[test]
fn new_database_is_seeded_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("user.sqlite");

    let conn = db::open_at(&path).unwrap();
    assert_eq!(version(&conn), LATEST_SCHEMA_VERSION.to_string());
    assert_eq!(count(&conn, "banks"), 8);
    assert_eq!(count(&conn, "categories"), 19);
    drop(conn);

    let conn = db::open_at(&path).unwrap();
    assert_eq!(count(&conn, "banks"), 8);
    assert_eq!(count(&conn, "schema_version"), 1);
}

#[test]
fn legacy_database_keeps_its_data_and_gains_version() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.sqlite");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE banks(id INTEGER PRIMARY KEY AUTOINCREMENT, bank_name TEXT NOT NULL, logo_url TEXT);
            INSERT INTO banks(bank_name, logo_url) VALUES ('Cash', NULL);
            "#,
        )
        .unwrap();
    }

    let conn = db::open_at(&path).unwrap();
    assert_eq!(version(&conn), "1");
    assert_eq!(count(&conn, "banks"), 1);
    assert_eq!(count(&conn, "categories"), 0);
    assert_eq!(count(&conn, "settings"), 0);
}

#[test]
fn outdated_version_is_migrated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("old.sqlite");
    {
        let conn = db::open_at(&path).unwrap();
        conn.execute_batch(
            "UPDATE schema_version SET version_number='0'; DROP TABLE settings;",
        )
        .unwrap();
    }

    let conn = db::open_at(&path).unwrap();
    assert_eq!(version(&conn), "1");
    assert_eq!(count(&conn, "settings"), 0);
    assert_eq!(count(&conn, "banks"), 8);
}

#[test]
fn explicit_path_wins() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chosen.sqlite");
    assert_eq!(db::db_path(Some(&path)).unwrap(), path);
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = db::open_in_memory().unwrap();
    let res = conn.execute(
        "INSERT INTO transactions(amount, currency, transaction_date, category_id, bank_id, transaction_type)
         VALUES ('1', 'COP', '2024-01-01 00:00:00', 1, 999, 'Expense')",
        [],
    );
    assert!(res.is_err());

    let res = conn.execute(
        "INSERT INTO transactions(amount, currency, transaction_date, category_id, bank_id, transaction_type)
         VALUES ('1', 'EUR', '2024-01-01 00:00:00', 1, 1, 'Expense')",
        [],
    );
    assert!(res.is_err());
}
