// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::models::TransactionType;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub
                .get_one::<String>("name")
                .map(String::as_str)
                .unwrap_or("");
            let kind = match sub.get_one::<String>("type") {
                Some(t) => t.parse::<TransactionType>()?,
                None => TransactionType::Expense,
            };
            let cat = ledger::add_category(conn, name, kind)?;
            println!(
                "Added category '{}' ({}, id {})",
                cat.name, cat.category_type, cat.id
            );
        }
        Some(("list", sub)) => {
            let kind = sub
                .get_one::<String>("type")
                .map(|t| t.parse::<TransactionType>())
                .transpose()?;
            let cats = ledger::list_categories(conn, kind)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let rows = cats
                    .into_iter()
                    .map(|c| vec![c.id.to_string(), c.name, c.category_type.to_string()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Category", "Type"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
