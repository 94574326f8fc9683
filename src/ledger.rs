// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reads and writes against the SQLite store.

use crate::error::LedgerError;
use crate::filters::Predicate;
use crate::models::{
    Bank, Category, DATE_TIME_FORMAT, NewTransaction, TransactionDetails, TransactionType,
};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::{Type, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use rust_decimal::Decimal;
use tracing::{debug, info};

pub const MAX_CATEGORY_NAME_LEN: usize = 25;

static CATEGORY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("category name pattern compiles"));

const SELECT_DETAILS: &str = "SELECT t.id, t.amount, t.currency, t.transaction_date, \
     t.transaction_description, t.transaction_type, \
     c.id, c.category_name, c.category_type, \
     b.id, b.bank_name, b.logo_url \
     FROM transactions t \
     JOIN categories c ON t.category_id = c.id \
     JOIN banks b ON t.bank_id = b.id";

/// Amounts are written as decimal text but legacy files may hold REAL or INTEGER values.
fn amount_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    match r.get_ref(idx)? {
        ValueRef::Text(raw) => {
            let s = std::str::from_utf8(raw).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })?;
            s.trim().parse::<Decimal>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })
        }
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::try_from(f).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Real, Box::new(e))
        }),
        other => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "amount".into(),
            other.data_type(),
        )),
    }
}

fn details_from_row(r: &Row<'_>) -> rusqlite::Result<TransactionDetails> {
    Ok(TransactionDetails {
        id: r.get(0)?,
        amount: amount_at(r, 1)?,
        currency: r.get(2)?,
        date: r.get(3)?,
        description: r.get(4)?,
        transaction_type: r.get(5)?,
        category: Category {
            id: r.get(6)?,
            name: r.get(7)?,
            category_type: r.get(8)?,
        },
        bank: Bank {
            id: r.get(9)?,
            name: r.get(10)?,
            logo_url: r.get::<_, Option<String>>(11)?.unwrap_or_default(),
        },
    })
}

/// Runs the joined transactions read narrowed by `predicate`.
///
/// Rows whose currency or type falls outside the known set fail the whole
/// read rather than being skipped.
pub fn fetch_transactions(
    conn: &Connection,
    predicate: &Predicate,
) -> Result<Vec<TransactionDetails>> {
    let sql = format!(
        "{} {} ORDER BY t.transaction_date {}, t.id {}",
        SELECT_DETAILS,
        predicate.where_clause(),
        predicate.order,
        predicate.order
    );
    debug!(sql = %sql, params = ?predicate.params, "fetching transactions");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(predicate.params.iter()), details_from_row)?;
    let data = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Read transactions")?;
    debug!(rows = data.len(), "fetched transactions");
    Ok(data)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Option<TransactionDetails>> {
    let sql = format!("{} WHERE t.id = ?1", SELECT_DETAILS);
    let row = conn
        .query_row(&sql, params![id], details_from_row)
        .optional()?;
    Ok(row)
}

/// Row count over the whole table, ignoring any filter.
pub fn count_transactions(conn: &Connection) -> Result<i64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))?;
    Ok(n)
}

/// Checks references and returns the amount as stored, rounded to cents.
/// The sign check runs on the rounded value so nothing positive is written as zero.
fn validate(conn: &Connection, tx: &NewTransaction) -> Result<Decimal> {
    let amount = tx.amount.round_dp(2);
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(tx.amount.to_string()).into());
    }
    let bank: Option<i64> = conn
        .query_row("SELECT id FROM banks WHERE id=?1", params![tx.bank_id], |r| {
            r.get(0)
        })
        .optional()?;
    if bank.is_none() {
        return Err(LedgerError::UnknownBank(tx.bank_id).into());
    }
    let category: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE id=?1",
            params![tx.category_id],
            |r| r.get(0),
        )
        .optional()?;
    if category.is_none() {
        return Err(LedgerError::UnknownCategory(tx.category_id).into());
    }
    Ok(amount)
}

fn clean_description(tx: &NewTransaction) -> Option<&str> {
    tx.description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn insert_transaction(conn: &Connection, tx: &NewTransaction) -> Result<i64> {
    let amount = validate(conn, tx)?;
    conn.execute(
        "INSERT INTO transactions(amount, currency, transaction_date, transaction_description, \
         category_id, bank_id, transaction_type) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            amount.to_string(),
            tx.currency,
            tx.date.format(DATE_TIME_FORMAT).to_string(),
            clean_description(tx),
            tx.category_id,
            tx.bank_id,
            tx.transaction_type
        ],
    )?;
    let id = conn.last_insert_rowid();
    info!(id, %amount, currency = %tx.currency, "inserted transaction");
    Ok(id)
}

pub fn update_transaction(conn: &Connection, id: i64, tx: &NewTransaction) -> Result<()> {
    let amount = validate(conn, tx)?;
    let changed = conn.execute(
        "UPDATE transactions SET amount=?1, currency=?2, transaction_date=?3, \
         transaction_description=?4, category_id=?5, bank_id=?6, transaction_type=?7, \
         updated_at=datetime('now') WHERE id=?8",
        params![
            amount.to_string(),
            tx.currency,
            tx.date.format(DATE_TIME_FORMAT).to_string(),
            clean_description(tx),
            tx.category_id,
            tx.bank_id,
            tx.transaction_type,
            id
        ],
    )?;
    if changed == 0 {
        return Err(LedgerError::TransactionNotFound(id).into());
    }
    info!(id, "updated transaction");
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<()> {
    let changed = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(LedgerError::TransactionNotFound(id).into());
    }
    info!(id, "deleted transaction");
    Ok(())
}

pub fn list_banks(conn: &Connection) -> Result<Vec<Bank>> {
    let mut stmt = conn.prepare("SELECT id, bank_name, logo_url FROM banks ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(Bank {
            id: r.get(0)?,
            name: r.get(1)?,
            logo_url: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// All categories, or only those of `kind` (what the entry form offers for a given type).
pub fn list_categories(conn: &Connection, kind: Option<TransactionType>) -> Result<Vec<Category>> {
    let map = |r: &Row<'_>| -> rusqlite::Result<Category> {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            category_type: r.get(2)?,
        })
    };
    let data = match kind {
        Some(k) => {
            let mut stmt = conn.prepare(
                "SELECT id, category_name, category_type FROM categories \
                 WHERE category_type=?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![k], map)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
        None => {
            let mut stmt = conn
                .prepare("SELECT id, category_name, category_type FROM categories ORDER BY id")?;
            let rows = stmt.query_map([], map)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
    };
    Ok(data)
}

/// Trims and checks a new category name: non-empty, letters and spaces, at most 25 characters.
pub fn validate_category_name(raw: &str) -> Result<String, LedgerError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(LedgerError::InvalidCategoryName(
            raw.to_string(),
            "name cannot be empty",
        ));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(LedgerError::InvalidCategoryName(
            raw.to_string(),
            "name must not exceed 25 characters",
        ));
    }
    if !CATEGORY_NAME.is_match(name) {
        return Err(LedgerError::InvalidCategoryName(
            raw.to_string(),
            "name must only contain letters and spaces",
        ));
    }
    Ok(name.to_string())
}

/// Categories are append-only; there is no rename or delete.
pub fn add_category(conn: &Connection, raw_name: &str, kind: TransactionType) -> Result<Category> {
    let name = validate_category_name(raw_name)?;
    conn.execute(
        "INSERT INTO categories(category_name, category_type) VALUES (?1, ?2)",
        params![name, kind],
    )?;
    let id = conn.last_insert_rowid();
    info!(id, name = %name, kind = %kind, "added category");
    Ok(Category {
        id,
        name,
        category_type: kind,
    })
}

/// A transaction whose recorded type differs from its category's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub transaction_id: i64,
    pub transaction_type: TransactionType,
    pub category_name: String,
    pub category_type: TransactionType,
}

pub fn find_type_mismatches(conn: &Connection) -> Result<Vec<TypeMismatch>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.transaction_type, c.category_name, c.category_type
         FROM transactions t JOIN categories c ON t.category_id = c.id
         WHERE t.transaction_type != c.category_type
         ORDER BY t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(TypeMismatch {
            transaction_id: r.get(0)?,
            transaction_type: r.get(1)?,
            category_name: r.get(2)?,
            category_type: r.get(3)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Transactions the joined read drops because the bank or category is missing.
pub fn find_unlinked(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT t.id FROM transactions t
         LEFT JOIN categories c ON t.category_id = c.id
         LEFT JOIN banks b ON t.bank_id = b.id
         WHERE c.id IS NULL OR b.id IS NULL
         ORDER BY t.id",
    )?;
    let rows = stmt.query_map([], |r| r.get::<_, i64>(0))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
