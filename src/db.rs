// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Billetera", "billetera"));

/// Overrides the platform data dir when set.
pub const DB_ENV: &str = "BILLETERA_DB";

pub const LATEST_SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_version(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        version_number TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS banks(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        bank_name TEXT NOT NULL,
        logo_url TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_name TEXT NOT NULL,
        category_type TEXT NOT NULL CHECK(category_type IN ('Expense','Income')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL CHECK(currency IN ('COP','USD')),
        transaction_date TEXT NOT NULL,
        transaction_description TEXT,
        category_id INTEGER,
        bank_id INTEGER,
        transaction_type TEXT NOT NULL CHECK(transaction_type IN ('Expense','Income')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL,
        FOREIGN KEY(bank_id) REFERENCES banks(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(transaction_date);
    "#;

const SEED_BANKS: &[(&str, &str)] = &[
    (
        "Bancolombia",
        "https://res.cloudinary.com/stkv2/image/upload/v1735163181/banks/bwbo3c6g1qsjistcgmgq.png",
    ),
    (
        "BBVA",
        "https://res.cloudinary.com/stkv2/image/upload/v1736112133/banks/vvvkpz2oxgzkrygile0r.png",
    ),
    (
        "Bogota",
        "https://res.cloudinary.com/stkv2/image/upload/v1736112133/banks/nppltf8dgg4tvfjkqiyj.png",
    ),
    (
        "Cash",
        "https://res.cloudinary.com/stkv2/image/upload/v1735163181/banks/hpb1twaaan4sb5kxupz2.png",
    ),
    (
        "Davivienda",
        "https://res.cloudinary.com/stkv2/image/upload/v1736112125/banks/byaysih3bfmhyveasyrg.png",
    ),
    (
        "Global66",
        "https://res.cloudinary.com/stkv2/image/upload/v1735163181/banks/eibkudsc6prz4du3jzxn.png",
    ),
    (
        "Nequi",
        "https://res.cloudinary.com/stkv2/image/upload/v1735163181/banks/wxbpieywd8xo9ynhgcbt.png",
    ),
    (
        "NuBank",
        "https://res.cloudinary.com/stkv2/image/upload/v1735163181/banks/zitxlmfeongnfm0kejss.png",
    ),
];

const SEED_CATEGORIES: &[(&str, &str)] = &[
    ("Food", "Expense"),
    ("Clothes", "Expense"),
    ("House Bills", "Expense"),
    ("Debt Repayments", "Expense"),
    ("Self Hygiene", "Expense"),
    ("Health", "Expense"),
    ("Transport", "Expense"),
    ("Taxes", "Expense"),
    ("Subscriptions", "Expense"),
    ("Tech", "Expense"),
    ("Utilities", "Expense"),
    ("Other", "Expense"),
    ("Salary", "Income"),
    ("Investments", "Income"),
    ("Freelance Work", "Income"),
    ("Sales", "Income"),
    ("Gifts", "Income"),
    ("Refunds", "Income"),
    ("Miscellaneous", "Income"),
];

/// Resolves the database file: explicit path, then `BILLETERA_DB`, then the platform data dir.
pub fn db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    if let Some(p) = std::env::var_os(DB_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("billetera.sqlite"))
}

pub fn open_or_init(explicit: Option<&Path>) -> Result<Connection> {
    let path = db_path(explicit)?;
    open_at(&path)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    debug!(path = %path.display(), "opened database");
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    init_schema(&mut conn)?;
    Ok(conn)
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Creates or upgrades the schema.
///
/// A database without `schema_version` is either brand new (gets seed data) or
/// a legacy file that already has banks (keeps its data, only gains the
/// missing tables). A version mismatch re-applies the idempotent DDL and bumps
/// the stored version.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    if !table_exists(conn, "schema_version")? {
        let legacy = table_exists(conn, "banks")?;
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA).context("Create schema")?;
        if legacy {
            info!("migrating legacy database to schema {}", LATEST_SCHEMA_VERSION);
        } else {
            seed(&tx)?;
            info!("created database at schema {}", LATEST_SCHEMA_VERSION);
        }
        tx.execute(
            "INSERT INTO schema_version(version_number) VALUES (?1)",
            params![LATEST_SCHEMA_VERSION.to_string()],
        )?;
        tx.commit()?;
        return Ok(());
    }

    let current: Option<String> = conn
        .query_row("SELECT version_number FROM schema_version LIMIT 1", [], |r| {
            r.get(0)
        })
        .optional()?;
    let current_num = current.as_deref().and_then(|v| v.trim().parse::<i64>().ok());
    if current_num == Some(LATEST_SCHEMA_VERSION) {
        debug!("schema is up to date");
        return Ok(());
    }

    warn!(
        "schema version {:?} differs from {}, applying migrations",
        current, LATEST_SCHEMA_VERSION
    );
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA).context("Apply schema migrations")?;
    match current {
        Some(old) => {
            tx.execute(
                "UPDATE schema_version SET version_number=?1, updated_at=datetime('now')
                 WHERE version_number=?2",
                params![LATEST_SCHEMA_VERSION.to_string(), old],
            )?;
        }
        None => {
            tx.execute(
                "INSERT INTO schema_version(version_number) VALUES (?1)",
                params![LATEST_SCHEMA_VERSION.to_string()],
            )?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn seed(conn: &Connection) -> Result<()> {
    let mut banks = conn.prepare("INSERT INTO banks(bank_name, logo_url) VALUES (?1, ?2)")?;
    for (name, logo) in SEED_BANKS {
        banks.execute(params![name, logo])?;
    }
    let mut cats =
        conn.prepare("INSERT INTO categories(category_name, category_type) VALUES (?1, ?2)")?;
    for (name, typ) in SEED_CATEGORIES {
        cats.execute(params![name, typ])?;
    }
    Ok(())
}
