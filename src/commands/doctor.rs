// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Recorded type disagrees with the category's type; grouping trusts the transaction
    for m in ledger::find_type_mismatches(conn)? {
        rows.push(vec![
            "type_mismatch".into(),
            format!(
                "tx {} is {} but category '{}' is {}",
                m.transaction_id, m.transaction_type, m.category_name, m.category_type
            ),
        ]);
    }

    // 2) Missing bank or category; these never show up in listings or summaries
    for id in ledger::find_unlinked(conn)? {
        rows.push(vec!["unlinked_transaction".into(), format!("tx {}", id)]);
    }

    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = issues(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
