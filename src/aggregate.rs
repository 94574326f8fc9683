// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Currency-split totals and bank/category groupings over joined transaction rows.
//!
//! Grouping keeps groups in first-appearance order and members in input order,
//! so a list sorted by date stays sorted inside every group.

use crate::models::{
    BankGroup, CategoryGroup, TransactionDetails, TransactionType, TransactionsSummary,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

pub fn summarize(rows: &[TransactionDetails]) -> TransactionsSummary {
    let mut summary = TransactionsSummary::default();
    for row in rows {
        let bucket = match row.transaction_type {
            TransactionType::Expense => &mut summary.total_expenses,
            TransactionType::Income => &mut summary.total_income,
        };
        bucket.add(row.currency, row.amount);
    }
    summary
}

/// Subtotals carried by a group, keyed by the transaction's own type.
trait Subtotals {
    fn subtotal_mut(&mut self, tt: TransactionType) -> &mut Decimal;
    fn members_mut(&mut self) -> &mut Vec<TransactionDetails>;
}

impl Subtotals for BankGroup {
    fn subtotal_mut(&mut self, tt: TransactionType) -> &mut Decimal {
        match tt {
            TransactionType::Expense => &mut self.expense_amount,
            TransactionType::Income => &mut self.income_amount,
        }
    }

    fn members_mut(&mut self) -> &mut Vec<TransactionDetails> {
        &mut self.transactions
    }
}

impl Subtotals for CategoryGroup {
    fn subtotal_mut(&mut self, tt: TransactionType) -> &mut Decimal {
        match tt {
            TransactionType::Expense => &mut self.expense_amount,
            TransactionType::Income => &mut self.income_amount,
        }
    }

    fn members_mut(&mut self) -> &mut Vec<TransactionDetails> {
        &mut self.transactions
    }
}

fn group_rows<G: Subtotals>(
    rows: &[TransactionDetails],
    key: impl Fn(&TransactionDetails) -> i64,
    seed: impl Fn(&TransactionDetails) -> G,
) -> Vec<G> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<G> = Vec::new();
    for row in rows {
        let slot = *index.entry(key(row)).or_insert_with(|| {
            groups.push(seed(row));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        *group.subtotal_mut(row.transaction_type) += row.amount;
        group.members_mut().push(row.clone());
    }
    groups
}

pub fn group_by_bank(rows: &[TransactionDetails]) -> Vec<BankGroup> {
    group_rows(
        rows,
        |row| row.bank.id,
        |row| BankGroup {
            bank_id: row.bank.id,
            bank_name: row.bank.name.clone(),
            logo_url: row.bank.logo_url.clone(),
            expense_amount: Decimal::ZERO,
            income_amount: Decimal::ZERO,
            transactions: Vec::new(),
        },
    )
}

/// The category's own type is display-only. Subtotals follow each
/// transaction's recorded type even when the two disagree.
pub fn group_by_category(rows: &[TransactionDetails]) -> Vec<CategoryGroup> {
    group_rows(
        rows,
        |row| row.category.id,
        |row| CategoryGroup {
            category_id: row.category.id,
            category_name: row.category.name.clone(),
            category_type: row.category.category_type,
            expense_amount: Decimal::ZERO,
            income_amount: Decimal::ZERO,
            transactions: Vec::new(),
        },
    )
}
