// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::ViewType;
use crate::state;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let view: ViewType = sub
                .get_one::<String>("view")
                .map(String::as_str)
                .unwrap_or("default")
                .parse()?;
            state::save_view(conn, view)?;
            println!("Transactions will be listed in '{}' view", view.as_str());
        }
        Some(("show", _)) => {
            println!("{}", state::load_view(conn)?.as_str());
        }
        _ => {}
    }
    Ok(())
}
