// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::filters::{DateRange, DateRangePreset, Filters, SortOrder};
use crate::models::TransactionType;
use crate::state;
use crate::utils::{parse_date, parse_month};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    match m.subcommand() {
        Some(("set", sub)) => {
            let filters = from_matches(sub, today)?.unwrap_or_default();
            state::save_filters(conn, &filters)?;
            println!("Saved filters: {}", filters.title(today));
        }
        Some(("show", _)) => {
            let filters = state::load_filters(conn)?;
            println!("{}", filters.title(today));
            println!("{}", serde_json::to_string_pretty(&filters)?);
        }
        Some(("reset", _)) => {
            state::reset_filters(conn)?;
            println!("Filters reset to the current month");
        }
        _ => {}
    }
    Ok(())
}

/// Builds filters from command-line flags, or `None` when no filter flag was given.
pub fn from_matches(m: &clap::ArgMatches, today: NaiveDate) -> Result<Option<Filters>> {
    let from = m.get_one::<String>("from");
    let to = m.get_one::<String>("to");
    let preset = m.get_one::<String>("preset");
    let month = m.get_one::<String>("month");
    let year = m.get_one::<i32>("year");
    let bank = m.get_one::<i64>("bank");
    let category = m.get_one::<i64>("category");
    let kind = m.get_one::<String>("type");
    let order = m.get_one::<String>("order");

    let any_given = from.is_some()
        || to.is_some()
        || preset.is_some()
        || month.is_some()
        || year.is_some()
        || bank.is_some()
        || category.is_some()
        || kind.is_some()
        || order.is_some();
    if !any_given {
        return Ok(None);
    }

    let date_range = match preset.map(String::as_str) {
        Some("today") => Some(DateRangePreset::Today.resolve(today)),
        Some("this-week") => Some(DateRangePreset::ThisWeek.resolve(today)),
        _ => {
            let start = from.map(|s| parse_date(s)).transpose()?;
            let end = to.map(|s| parse_date(s)).transpose()?;
            if start.is_some() || end.is_some() {
                Some(DateRange::days(start, end))
            } else {
                None
            }
        }
    };

    Ok(Some(Filters {
        date_range,
        month: month.map(|s| parse_month(s)).transpose()?,
        year: year.copied(),
        bank_id: bank.copied(),
        category_id: category.copied(),
        transaction_type: kind.map(|s| s.parse::<TransactionType>()).transpose()?,
        order: order.map(|o| match o.as_str() {
            "asc" => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }),
    }))
}

/// Flag-built filters when any flag was given, otherwise the saved ones.
pub fn resolve(conn: &Connection, m: &clap::ArgMatches, today: NaiveDate) -> Result<Filters> {
    match from_matches(m, today)? {
        Some(f) => Ok(f),
        None => state::load_filters(conn),
    }
}
