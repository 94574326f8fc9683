// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{group_by_bank, group_by_category};
use crate::error::LedgerError;
use crate::filters::build_predicate;
use crate::ledger;
use crate::models::{
    BankGroup, CategoryGroup, Currency, NewTransaction, TransactionDetails, TransactionType,
    ViewType,
};
use crate::state;
use crate::utils::{fmt_amount, maybe_print_json, parse_date_time, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use chrono::{NaiveDate, Timelike};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(required(sub, "amount")?)?;
    let currency: Currency = required(sub, "currency")?.parse()?;
    let transaction_type: TransactionType = required(sub, "type")?.parse()?;
    let bank_id = *sub
        .get_one::<i64>("bank")
        .ok_or_else(|| anyhow!("--bank is required"))?;
    let category_id = *sub
        .get_one::<i64>("category")
        .ok_or_else(|| anyhow!("--category is required"))?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date_time(d)?,
        None => {
            let now = chrono::Local::now().naive_local();
            now.with_nanosecond(0).unwrap_or(now)
        }
    };
    let tx = NewTransaction {
        amount,
        currency,
        date,
        description: sub.get_one::<String>("description").cloned(),
        category_id,
        bank_id,
        transaction_type,
    };
    let id = ledger::insert_transaction(conn, &tx)?;
    state::reset_filters(conn)?;
    println!(
        "Recorded {} {} {} on {} (id {})",
        transaction_type,
        fmt_amount(&tx.amount.round_dp(2)),
        currency,
        date,
        id
    );
    Ok(())
}

/// Fields left out keep their stored values; `--description ""` clears the description.
fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow!("--id is required"))?;
    let current =
        ledger::get_transaction(conn, id)?.ok_or(LedgerError::TransactionNotFound(id))?;

    let tx = NewTransaction {
        amount: match sub.get_one::<String>("amount") {
            Some(a) => parse_decimal(a)?,
            None => current.amount,
        },
        currency: match sub.get_one::<String>("currency") {
            Some(c) => c.parse()?,
            None => current.currency,
        },
        date: match sub.get_one::<String>("date") {
            Some(d) => parse_date_time(d)?,
            None => current.date,
        },
        // An empty --description is passed through and stored as NULL.
        description: match sub.get_one::<String>("description") {
            Some(d) => Some(d.clone()),
            None => current.description,
        },
        category_id: sub
            .get_one::<i64>("category")
            .copied()
            .unwrap_or(current.category.id),
        bank_id: sub.get_one::<i64>("bank").copied().unwrap_or(current.bank.id),
        transaction_type: match sub.get_one::<String>("type") {
            Some(t) => t.parse()?,
            None => current.transaction_type,
        },
    };
    ledger::update_transaction(conn, id, &tx)?;
    state::reset_filters(conn)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow!("--id is required"))?;
    if !sub.get_flag("yes") {
        return Err(anyhow!(
            "Refusing to delete transaction {} without --yes; this cannot be undone",
            id
        ));
    }
    ledger::delete_transaction(conn, id)?;
    state::reset_filters(conn)?;
    println!("Deleted transaction {}", id);
    Ok(())
}

fn required<'a>(sub: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    sub.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("--{} is required", name))
}

/// Rows shaped by the selected view. Serializes as the bare array.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Listing {
    Flat(Vec<TransactionDetails>),
    ByBank(Vec<BankGroup>),
    ByCategory(Vec<CategoryGroup>),
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        match self {
            Listing::Flat(rows) => rows.is_empty(),
            Listing::ByBank(groups) => groups.is_empty(),
            Listing::ByCategory(groups) => groups.is_empty(),
        }
    }
}

#[derive(Debug)]
pub struct ListReport {
    pub title: String,
    pub empty_message: String,
    pub listing: Listing,
}

/// Everything `tx list` prints. Flags win over the saved filters, `--view` over the saved view.
pub fn list_report(
    conn: &Connection,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<ListReport> {
    let view: ViewType = match sub.get_one::<String>("view") {
        Some(v) => v.parse()?,
        None => state::load_view(conn)?,
    };
    let filters = super::filters::resolve(conn, sub, today)?;
    let rows = ledger::fetch_transactions(conn, &build_predicate(&filters, today))?;
    let listing = match view {
        ViewType::Default => Listing::Flat(rows),
        ViewType::Bank => Listing::ByBank(group_by_bank(&rows)),
        ViewType::Category => Listing::ByCategory(group_by_category(&rows)),
    };
    Ok(ListReport {
        title: filters.title(today),
        empty_message: filters.empty_message(today),
        listing,
    })
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let report = list_report(conn, sub, today)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report.listing)? {
        return Ok(());
    }

    println!("{}", report.title);
    if report.listing.is_empty() {
        println!("{}", report.empty_message);
        return Ok(());
    }
    match &report.listing {
        Listing::Flat(rows) => println!("{}", detail_table(rows)),
        Listing::ByBank(groups) => {
            for g in groups {
                println!(
                    "\n{}  -{}  +{}",
                    g.bank_name,
                    fmt_amount(&g.expense_amount),
                    fmt_amount(&g.income_amount)
                );
                println!("{}", detail_table(&g.transactions));
            }
        }
        Listing::ByCategory(groups) => {
            for g in groups {
                println!(
                    "\n{} ({})  -{}  +{}",
                    g.category_name,
                    g.category_type,
                    fmt_amount(&g.expense_amount),
                    fmt_amount(&g.income_amount)
                );
                println!("{}", detail_table(&g.transactions));
            }
        }
    }
    Ok(())
}

fn detail_table(rows: &[TransactionDetails]) -> comfy_table::Table {
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            let sign = match r.transaction_type {
                TransactionType::Expense => "-",
                TransactionType::Income => "+",
            };
            vec![
                r.id.to_string(),
                r.date.format("%b %d / %a - %I:%M%p").to_string(),
                r.bank.name.clone(),
                r.category.name.clone(),
                format!("{}{}", sign, fmt_amount(&r.amount)),
                r.currency.to_string(),
                r.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    pretty_table(
        &["ID", "Date", "Bank", "Category", "Amount", "CCY", "Description"],
        data,
    )
}
