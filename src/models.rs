// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Layout of `transactions.transaction_date`; lexicographic order equals chronological order.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "COP")]
    Cop,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Cop => "COP",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "COP" => Ok(Currency::Cop),
            "USD" => Ok(Currency::Usd),
            _ => Err(LedgerError::UnknownCurrency(s.to_string())),
        }
    }
}

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Direction of a transaction. Expense is an outflow, Income an inflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "Expense",
            TransactionType::Income => "Income",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            _ => Err(LedgerError::UnknownTransactionType(s.to_string())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: i64,
    pub name: String,
    pub logo_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub category_type: TransactionType,
}

/// Input for inserting or updating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub currency: Currency,
    pub date: NaiveDateTime,
    pub description: Option<String>,
    pub category_id: i64,
    pub bank_id: i64,
    pub transaction_type: TransactionType,
}

/// A transaction joined with its category and bank display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub id: i64,
    pub amount: Decimal,
    pub currency: Currency,
    pub date: NaiveDateTime,
    pub description: Option<String>,
    pub transaction_type: TransactionType,
    pub category: Category,
    pub bank: Bank,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyTotals {
    pub cop: Decimal,
    pub usd: Decimal,
}

impl CurrencyTotals {
    pub fn add(&mut self, currency: Currency, amount: Decimal) {
        match currency {
            Currency::Cop => self.cop += amount,
            Currency::Usd => self.usd += amount,
        }
    }

    pub fn get(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Cop => self.cop,
            Currency::Usd => self.usd,
        }
    }
}

/// Expense and income totals, each split by currency. Never converted between currencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsSummary {
    pub total_expenses: CurrencyTotals,
    pub total_income: CurrencyTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankGroup {
    pub bank_id: i64,
    pub bank_name: String,
    pub logo_url: String,
    pub expense_amount: Decimal,
    pub income_amount: Decimal,
    pub transactions: Vec<TransactionDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category_id: i64,
    pub category_name: String,
    pub category_type: TransactionType,
    pub expense_amount: Decimal,
    pub income_amount: Decimal,
    pub transactions: Vec<TransactionDetails>,
}

/// How the transaction list is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    Default,
    Bank,
    Category,
}

impl ViewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Default => "default",
            ViewType::Bank => "bank",
            ViewType::Category => "category",
        }
    }
}

impl FromStr for ViewType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(ViewType::Default),
            "bank" => Ok(ViewType::Bank),
            "category" => Ok(ViewType::Category),
            _ => Err(LedgerError::UnknownView(s.to_string())),
        }
    }
}
