// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let banks = ledger::list_banks(conn)?;
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &banks)? {
            let rows = banks
                .into_iter()
                .map(|b| vec![b.id.to_string(), b.name, b.logo_url])
                .collect();
            println!("{}", pretty_table(&["ID", "Bank", "Logo"], rows));
        }
    }
    Ok(())
}
