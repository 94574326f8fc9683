// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::summarize;
use crate::filters::build_predicate;
use crate::ledger;
use crate::models::{Currency, TransactionsSummary};
use crate::utils::{fmt_amount, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub title: String,
    pub summary: TransactionsSummary,
    /// Transactions matched by the filters.
    pub matched: usize,
    /// Transactions in the whole ledger.
    pub total_transactions: i64,
}

pub fn report(
    conn: &Connection,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<SummaryReport> {
    let filters = super::filters::resolve(conn, sub, today)?;
    let rows = ledger::fetch_transactions(conn, &build_predicate(&filters, today))?;
    Ok(SummaryReport {
        title: filters.title(today),
        summary: summarize(&rows),
        matched: rows.len(),
        total_transactions: ledger::count_transactions(conn)?,
    })
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let rep = report(conn, sub, today)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rep)? {
        return Ok(());
    }
    println!("{}", rep.title);
    let mut data = Vec::new();
    for ccy in [Currency::Cop, Currency::Usd] {
        data.push(vec![
            ccy.to_string(),
            format!("+{}", fmt_amount(&rep.summary.total_income.get(ccy))),
            format!("-{}", fmt_amount(&rep.summary.total_expenses.get(ccy))),
        ]);
    }
    println!("{}", pretty_table(&["CCY", "Income", "Expenses"], data));
    println!(
        "{} matching of {} transactions",
        rep.matched, rep.total_transactions
    );
    Ok(())
}
