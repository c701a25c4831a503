// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::amort;
use crate::commands::{expenses, loans};
use crate::utils::{
    fmt_money, get_active_profile, get_currency, get_salary, maybe_print_json, parse_month,
    pretty_table,
};
use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balance", sub)) => balance(conn, sub)?,
        Some(("loans", sub)) => loans_overview(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct BalanceRow {
    pub month: String,
    pub salary: String,
    pub spent: String,
    pub remaining: String,
}

fn balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let owner = get_active_profile(conn)?;
    let month = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s.trim())?,
        None => Utc::now().date_naive().format("%Y-%m").to_string(),
    };
    let (salary, spent, remaining) = balance_compute(conn, &owner, &month)?;
    let ccy = get_currency(conn)?;
    let row = BalanceRow {
        month: month.clone(),
        salary: salary.round_dp(2).to_string(),
        spent: spent.round_dp(2).to_string(),
        remaining: remaining.round_dp(2).to_string(),
    };
    if !maybe_print_json(json_flag, false, &row)? {
        let rows = vec![
            vec!["Month".into(), month],
            vec!["Salary".into(), fmt_money(&salary, &ccy)],
            vec!["Spent".into(), fmt_money(&spent, &ccy)],
            vec!["Remaining".into(), fmt_money(&remaining, &ccy)],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

pub fn balance_compute(
    conn: &Connection,
    owner: &str,
    month: &str,
) -> Result<(Decimal, Decimal, Decimal)> {
    let salary = get_salary(conn, owner)?.ok_or_else(|| {
        anyhow!(
            "No monthly salary set for profile '{}'; run 'loanbook salary set'",
            owner
        )
    })?;
    let spent = expenses::month_total(conn, owner, month)?;
    Ok((salary, spent, salary - spent))
}

#[derive(Serialize)]
pub struct OverviewRow {
    pub id: i64,
    pub name: String,
    pub remaining: String,
    pub paid: String,
    pub progress: String,
    pub next_due: String,
}

fn loans_overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let owner = get_active_profile(conn)?;
    let records = loans::query_loans(conn, &owner)?;

    let mut outstanding = Decimal::ZERO;
    let mut data = Vec::new();
    for l in &records {
        outstanding += l.remaining_amount;
        let progress = (amort::progress_ratio(l) * Decimal::from(100)).round_dp(1);
        data.push(OverviewRow {
            id: l.id,
            name: l.name.clone(),
            remaining: l.remaining_amount.round_dp(2).to_string(),
            paid: format!("{}/{}", l.paid_installments.len(), l.duration_in_months),
            progress: format!("{}%", progress),
            next_due: match amort::next_due_date(l) {
                Some(d) => d.to_string(),
                None => "All EMIs paid".to_string(),
            },
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name.clone(),
                    r.remaining.clone(),
                    r.paid.clone(),
                    r.progress.clone(),
                    r.next_due.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Remaining", "Paid", "Progress", "Next due"],
                rows
            )
        );
        let ccy = get_currency(conn)?;
        println!("Total outstanding: {}", fmt_money(&outstanding, &ccy));
    }
    Ok(())
}
