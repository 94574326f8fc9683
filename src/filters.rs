// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns a [`Filters`] selection into a parameterized WHERE clause for the
//! transactions query.
//!
//! Exactly one date predicate is always emitted, so an empty selection narrows
//! to the current month instead of scanning every row. User values only ever
//! travel through `params`; the condition strings are fixed text with `?`
//! placeholders, pushed in the same order as their values.

use crate::models::{DATE_TIME_FORMAT, TransactionType};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Inclusive bounds on `transaction_date`. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    /// Whole-day bounds: start at 00:00:00, end at 23:59:59.
    pub fn days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        DateRange {
            start: start.map(|d| d.and_time(NaiveTime::MIN)),
            end: end.map(|d| d.and_time(last_second)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRangePreset {
    Today,
    ThisWeek,
}

impl DateRangePreset {
    /// Weeks run Sunday through Saturday.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match self {
            DateRangePreset::Today => DateRange::days(Some(today), Some(today)),
            DateRangePreset::ThisWeek => {
                let offset = i64::from(today.weekday().num_days_from_sunday());
                let start = today - Duration::days(offset);
                DateRange::days(Some(start), Some(start + Duration::days(6)))
            }
        }
    }
}

/// The user's current narrowing of the transaction list.
///
/// Date fields are alternatives checked in a fixed order: range, then month
/// with year, then year alone, then the current month. A month without a year,
/// or outside 1-12, is ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub date_range: Option<DateRange>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub bank_id: Option<i64>,
    pub category_id: Option<i64>,
    pub transaction_type: Option<TransactionType>,
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub conditions: Vec<String>,
    pub params: Vec<Value>,
    pub order: &'static str,
}

impl Predicate {
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

fn date_param(dt: &NaiveDateTime) -> Value {
    Value::Text(dt.format(DATE_TIME_FORMAT).to_string())
}

/// Months outside 1-12 (only reachable through hand-edited saved state) count as absent.
fn valid_month(month: u32) -> bool {
    (1..=12).contains(&month)
}

fn year_month(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

pub fn build_predicate(filters: &Filters, today: NaiveDate) -> Predicate {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    let range = filters.date_range.unwrap_or_default();
    match (range.start, range.end, filters.month, filters.year) {
        (Some(start), Some(end), _, _) => {
            conditions.push("t.transaction_date BETWEEN ? AND ?".into());
            params.push(date_param(&start));
            params.push(date_param(&end));
        }
        (Some(start), None, _, _) => {
            conditions.push("t.transaction_date >= ?".into());
            params.push(date_param(&start));
        }
        (None, Some(end), _, _) => {
            conditions.push("t.transaction_date <= ?".into());
            params.push(date_param(&end));
        }
        (None, None, Some(month), Some(year)) if valid_month(month) => {
            conditions.push("strftime('%Y-%m', t.transaction_date) = ?".into());
            params.push(Value::Text(year_month(year, month)));
        }
        (None, None, _, Some(year)) => {
            conditions.push("strftime('%Y', t.transaction_date) = ?".into());
            params.push(Value::Text(format!("{:04}", year)));
        }
        (None, None, _, None) => {
            conditions.push("strftime('%Y-%m', t.transaction_date) = ?".into());
            params.push(Value::Text(year_month(today.year(), today.month())));
        }
    }

    if let Some(bank_id) = filters.bank_id {
        conditions.push("t.bank_id = ?".into());
        params.push(Value::Integer(bank_id));
    }
    if let Some(category_id) = filters.category_id {
        conditions.push("t.category_id = ?".into());
        params.push(Value::Integer(category_id));
    }
    if let Some(tt) = filters.transaction_type {
        conditions.push("t.transaction_type = ?".into());
        params.push(Value::Text(tt.as_str().to_string()));
    }

    let order = match filters.order {
        Some(SortOrder::Ascending) => "ASC",
        _ => "DESC",
    };

    Predicate {
        conditions,
        params,
        order,
    }
}

impl Filters {
    pub fn predicate(&self) -> Predicate {
        build_predicate(self, chrono::Local::now().date_naive())
    }

    /// Heading for the summary, following the same precedence as the date predicate.
    pub fn title(&self, today: NaiveDate) -> String {
        let range = self.date_range.unwrap_or_default();
        match (range.start, range.end) {
            (Some(start), Some(end)) if start.date() == end.date() => short_date(start),
            (Some(start), Some(end)) => format!("{} - {}", short_date(start), short_date(end)),
            (Some(start), None) => format!("{} - Today", short_date(start)),
            (None, Some(end)) => format!("All - {}", short_date(end)),
            (None, None) => match (self.month, self.year) {
                (Some(m), Some(y)) if valid_month(m) => {
                    match NaiveDate::from_ymd_opt(y, m, 1) {
                        Some(first) => format!("{} - Summary", first.format("%B, %Y")),
                        None => current_month_title(today),
                    }
                }
                (_, Some(y)) => format!("{:04} - Summary", y),
                _ => current_month_title(today),
            },
        }
    }

    /// Text shown in place of an empty transaction list.
    pub fn empty_message(&self, today: NaiveDate) -> String {
        let range = self.date_range.unwrap_or_default();
        match (range.start, range.end) {
            (Some(start), Some(end)) if start.date() != end.date() => format!(
                "No transactions from {} - {}",
                short_date(start),
                short_date(end)
            ),
            (None, None) if self.year.is_some() => {
                format!("No transactions for {}", self.title(today).trim_end_matches(" - Summary"))
            }
            (None, None) => format!("No transactions for {} yet.", today.format("%B")),
            _ => format!("No transactions for {}", self.title(today)),
        }
    }
}

fn short_date(dt: NaiveDateTime) -> String {
    dt.format("%b %d, %Y").to_string()
}

fn current_month_title(today: NaiveDate) -> String {
    format!("{} - Summary", today.format("%B, %Y"))
}
