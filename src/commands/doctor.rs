// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = findings(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn findings(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Loan sanity: every stored cell must parse and the remaining amount
    //    must agree with the recorded payments
    let mut stmt = conn.prepare(
        "SELECT id, principal, annual_rate, start_date, end_date, duration_months,
                emi, total_payable, remaining_amount, paid_installments
         FROM loans ORDER BY id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let principal_s: String = r.get(1)?;
        let rate_s: String = r.get(2)?;
        let start_s: String = r.get(3)?;
        let end_s: String = r.get(4)?;
        let months: i64 = r.get(5)?;
        let emi_s: String = r.get(6)?;
        let total_s: String = r.get(7)?;
        let remaining_s: String = r.get(8)?;
        let paid_s: String = r.get(9)?;

        let bad_cell = |field: &str, value: &str, rows: &mut Vec<Vec<String>>| {
            rows.push(vec![
                "bad_cell".into(),
                format!("loan #{} {} '{}'", id, field, value),
            ]);
        };

        let principal = principal_s.parse::<Decimal>().ok();
        if principal.is_none() {
            bad_cell("principal", &principal_s, &mut rows);
        }
        let rate = rate_s.parse::<Decimal>().ok();
        if rate.is_none() {
            bad_cell("annual_rate", &rate_s, &mut rows);
        }
        let emi = emi_s.parse::<Decimal>().ok();
        if emi.is_none() {
            bad_cell("emi", &emi_s, &mut rows);
        }
        let total = total_s.parse::<Decimal>().ok();
        if total.is_none() {
            bad_cell("total_payable", &total_s, &mut rows);
        }
        let remaining = remaining_s.parse::<Decimal>().ok();
        if remaining.is_none() {
            bad_cell("remaining_amount", &remaining_s, &mut rows);
        }
        let start = NaiveDate::parse_from_str(&start_s, "%Y-%m-%d").ok();
        if start.is_none() {
            bad_cell("start_date", &start_s, &mut rows);
        }
        let end = NaiveDate::parse_from_str(&end_s, "%Y-%m-%d").ok();
        if end.is_none() {
            bad_cell("end_date", &end_s, &mut rows);
        }
        let paid = serde_json::from_str::<Vec<NaiveDate>>(&paid_s).ok();
        if paid.is_none() {
            bad_cell("paid_installments", &paid_s, &mut rows);
        }

        if let Some(p) = principal {
            if p <= Decimal::ZERO {
                rows.push(vec!["bad_term".into(), format!("loan #{} principal {}", id, p)]);
            }
        }
        if let Some(rt) = rate {
            if rt < Decimal::ZERO {
                rows.push(vec!["bad_term".into(), format!("loan #{} rate {}", id, rt)]);
            }
        }
        if let (Some(s), Some(e)) = (start, end) {
            if e <= s {
                rows.push(vec![
                    "bad_term".into(),
                    format!("loan #{} runs {} to {}", id, s, e),
                ]);
            }
        }
        if months <= 0 {
            rows.push(vec!["bad_term".into(), format!("loan #{} tenure {}", id, months)]);
        }
        if let Some(rem) = remaining {
            if rem < Decimal::ZERO {
                rows.push(vec![
                    "negative_remaining".into(),
                    format!("loan #{} remaining {}", id, rem),
                ]);
            }
        }
        if let Some(ref dates) = paid {
            if months > 0 && dates.len() as i64 > months {
                rows.push(vec![
                    "overpaid".into(),
                    format!("loan #{} has {} payments over {} months", id, dates.len(), months),
                ]);
            }
            if let (Some(emi_v), Some(total_v), Some(rem_v)) = (emi, total, remaining) {
                let expected =
                    (total_v - emi_v * Decimal::from(dates.len() as u64)).max(Decimal::ZERO);
                if (rem_v - expected).abs() > Decimal::new(1, 2) {
                    rows.push(vec![
                        "remaining_mismatch".into(),
                        format!("loan #{} remaining {} expected {}", id, rem_v, expected.round_dp(2)),
                    ]);
                }
            }
        }
    }

    // 2) Expenses: positive amounts on parseable dates
    let mut stmt2 = conn.prepare("SELECT id, date, amount FROM expenses ORDER BY id")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let date_s: String = r.get(1)?;
        let amount_s: String = r.get(2)?;
        if NaiveDate::parse_from_str(&date_s, "%Y-%m-%d").is_err() {
            rows.push(vec![
                "bad_cell".into(),
                format!("expense #{} date '{}'", id, date_s),
            ]);
        }
        match amount_s.parse::<Decimal>() {
            Ok(a) if a <= Decimal::ZERO => {
                rows.push(vec![
                    "bad_expense".into(),
                    format!("expense #{} amount {}", id, a),
                ]);
            }
            Ok(_) => {}
            Err(_) => {
                rows.push(vec![
                    "bad_cell".into(),
                    format!("expense #{} amount '{}'", id, amount_s),
                ]);
            }
        }
    }

    Ok(rows)
}
