// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Validation failures raised by the ledger before anything touches the database.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Category names are letters and spaces only, at most 25 characters.
    #[error("Invalid category name '{0}': {1}")]
    InvalidCategoryName(String, &'static str),

    /// Amounts are stored as positive magnitudes; direction lives in the transaction type.
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(String),

    #[error("Transaction {0} not found")]
    TransactionNotFound(i64),

    #[error("Bank {0} not found")]
    UnknownBank(i64),

    #[error("Category {0} not found")]
    UnknownCategory(i64),

    #[error("Unknown currency '{0}', expected COP or USD")]
    UnknownCurrency(String),

    #[error("Unknown transaction type '{0}', expected Expense or Income")]
    UnknownTransactionType(String),

    #[error("Unknown view '{0}', expected default, bank or category")]
    UnknownView(String),

    #[error("Invalid month '{0}', expected 1-12")]
    InvalidMonth(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS")]
    InvalidDate(String),
}
