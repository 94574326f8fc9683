// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::models::DATE_TIME_FORMAT;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use numfmt::{Formatter, Precision};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| LedgerError::InvalidDate(s.into()).into())
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or a bare date (midnight).
pub fn parse_date_time(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT) {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    let d = parse_date(s)?;
    Ok(d.and_time(NaiveTime::MIN))
}

/// Month number 1-12; `3` and `03` are both accepted.
pub fn parse_month(s: &str) -> Result<u32> {
    let m: u32 = s
        .trim()
        .parse()
        .map_err(|_| LedgerError::InvalidMonth(s.to_string()))?;
    if !(1..=12).contains(&m) {
        return Err(LedgerError::InvalidMonth(s.to_string()).into());
    }
    Ok(m)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

static THOUSANDS: Lazy<Formatter> = Lazy::new(|| {
    Formatter::new()
        .separator(',')
        .expect("comma is a valid separator")
        .precision(Precision::Decimals(0))
});

/// Two decimals with comma thousands separators, e.g. `1,234,567.50`.
///
/// numfmt groups the whole part; cents come from the decimal itself since numfmt
/// drops trailing zeros.
pub fn fmt_amount(d: &Decimal) -> String {
    let cents = d.round_dp(2);
    let sign = if cents < Decimal::ZERO { "-" } else { "" };
    let abs = cents.abs();
    let whole = abs.trunc().to_u128().unwrap_or_default();
    let frac = (abs.fract() * Decimal::ONE_HUNDRED).to_u32().unwrap_or_default();
    format!("{}{}.{:02}", sign, THOUSANDS.fmt_string(whole), frac)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
