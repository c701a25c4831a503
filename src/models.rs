// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A loan with its schedule derived once at creation. `paid_installments` is
/// append-only and its length is the count of EMIs paid; `revision` guards
/// concurrent payment writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub principal: Decimal,
    pub annual_rate_percent: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_in_months: u32,
    pub installment_amount: Decimal,
    pub total_payable: Decimal,
    pub remaining_amount: Decimal,
    pub paid_installments: Vec<NaiveDate>,
    pub revision: i64,
}

/// One logged expense, scoped to the profile that recorded it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub owner: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
}
