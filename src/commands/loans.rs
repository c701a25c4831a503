// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::amort;
use crate::models::LoanRecord;
use crate::utils::{
    fmt_money, get_active_profile, get_currency, maybe_print_json, parse_date, parse_decimal,
    pretty_table,
};
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("plan", sub)) => plan(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = get_active_profile(conn)?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let principal = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let rate = parse_decimal(sub.get_one::<String>("rate").unwrap().trim())?;
    let start = parse_date(sub.get_one::<String>("start").unwrap().trim())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap().trim())?;

    // Nothing is stored unless the terms produce a valid schedule
    let sched = amort::compute_schedule(principal, rate, start, end)?;

    conn.execute(
        "INSERT INTO loans(owner, name, principal, annual_rate, start_date, end_date,
                           duration_months, emi, total_payable, remaining_amount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            owner,
            name,
            principal.to_string(),
            rate.to_string(),
            start.to_string(),
            end.to_string(),
            sched.duration_in_months,
            sched.installment_amount.to_string(),
            sched.total_payable.to_string(),
            sched.total_payable.to_string()
        ],
    )?;
    println!(
        "Added loan #{} '{}': EMI {} over {} months",
        conn.last_insert_rowid(),
        name,
        sched.installment_amount.round_dp(2),
        sched.duration_in_months
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let owner = get_active_profile(conn)?;
    let data: Vec<LoanRow> = query_loans(conn, &owner)?.iter().map(loan_row).collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name.clone(),
                    r.principal.clone(),
                    r.rate.clone(),
                    r.start.clone(),
                    r.end.clone(),
                    r.months.to_string(),
                    r.emi.clone(),
                    r.remaining.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Principal", "Rate %", "Start", "End", "Months", "EMI", "Remaining", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let owner = get_active_profile(conn)?;
    let loan = get_loan(conn, &owner, id)?;
    let ccy = get_currency(conn)?;
    let progress = (amort::progress_ratio(&loan) * Decimal::from(100)).round_dp(1);
    let next_due = match amort::next_due_date(&loan) {
        Some(d) => d.to_string(),
        None => "All EMIs paid".to_string(),
    };
    let rows = vec![
        vec!["Name".into(), loan.name.clone()],
        vec!["Principal".into(), fmt_money(&loan.principal, &ccy)],
        vec!["Rate".into(), format!("{}% / year", loan.annual_rate_percent)],
        vec!["Start".into(), loan.start_date.to_string()],
        vec!["End".into(), loan.end_date.to_string()],
        vec!["Tenure".into(), format!("{} months", loan.duration_in_months)],
        vec!["EMI".into(), fmt_money(&loan.installment_amount, &ccy)],
        vec!["Total payable".into(), fmt_money(&loan.total_payable, &ccy)],
        vec!["Remaining".into(), fmt_money(&loan.remaining_amount, &ccy)],
        vec![
            "EMIs paid".into(),
            format!("{} of {}", loan.paid_installments.len(), loan.duration_in_months),
        ],
        vec!["Progress".into(), format!("{}%", progress)],
        vec!["Next due".into(), next_due],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

fn plan(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = *sub.get_one::<i64>("id").unwrap();
    let owner = get_active_profile(conn)?;
    let loan = get_loan(conn, &owner, id)?;
    let data: Vec<PlanRow> = amort::payment_plan(&loan)
        .iter()
        .map(|p| PlanRow {
            seq: p.sequence,
            due: p.due_on.to_string(),
            amount: p.amount.round_dp(2).to_string(),
            remaining_after: p.remaining_after.round_dp(2).to_string(),
            status: if p.paid { "paid" } else { "due" }.to_string(),
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.seq.to_string(),
                    r.due.clone(),
                    r.amount.clone(),
                    r.remaining_after.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["#", "Due", "Amount", "Remaining after", "Status"], rows)
        );
    }
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let on = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let owner = get_active_profile(conn)?;
    let updated = record_payment(conn, &owner, id, on)?;
    println!(
        "Recorded payment {}/{} for loan #{}; remaining {}",
        updated.paid_installments.len(),
        updated.duration_in_months,
        id,
        updated.remaining_amount.round_dp(2)
    );
    match amort::next_due_date(&updated) {
        Some(d) => println!("Next EMI due {}", d),
        None => println!("All EMIs paid"),
    }
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let owner = get_active_profile(conn)?;
    let n = conn.execute("DELETE FROM loans WHERE id=?1 AND owner=?2", params![id, owner])?;
    if n == 0 {
        bail!("Loan #{} not found", id);
    }
    println!("Removed loan #{}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct LoanRow {
    pub id: i64,
    pub name: String,
    pub principal: String,
    pub rate: String,
    pub start: String,
    pub end: String,
    pub months: u32,
    pub emi: String,
    pub remaining: String,
    pub status: String,
}

fn loan_row(l: &LoanRecord) -> LoanRow {
    LoanRow {
        id: l.id,
        name: l.name.clone(),
        principal: l.principal.round_dp(2).to_string(),
        rate: l.annual_rate_percent.to_string(),
        start: l.start_date.to_string(),
        end: l.end_date.to_string(),
        months: l.duration_in_months,
        emi: l.installment_amount.round_dp(2).to_string(),
        remaining: l.remaining_amount.round_dp(2).to_string(),
        status: if amort::is_settled(l) { "Settled" } else { "Active" }.to_string(),
    }
}

#[derive(Serialize)]
pub struct PlanRow {
    pub seq: u32,
    pub due: String,
    pub amount: String,
    pub remaining_after: String,
    pub status: String,
}

pub fn get_loan(conn: &Connection, owner: &str, id: i64) -> Result<LoanRecord> {
    let mut stmt = conn.prepare(
        "SELECT id, owner, name, principal, annual_rate, start_date, end_date, duration_months,
                emi, total_payable, remaining_amount, paid_installments, revision
         FROM loans WHERE id=?1 AND owner=?2",
    )?;
    let mut rows = stmt.query(params![id, owner])?;
    match rows.next()? {
        Some(r) => loan_from_row(r),
        None => bail!("Loan #{} not found", id),
    }
}

pub fn query_loans(conn: &Connection, owner: &str) -> Result<Vec<LoanRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner, name, principal, annual_rate, start_date, end_date, duration_months,
                emi, total_payable, remaining_amount, paid_installments, revision
         FROM loans WHERE owner=?1 ORDER BY id",
    )?;
    let mut rows = stmt.query(params![owner])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(loan_from_row(r)?);
    }
    Ok(out)
}

fn loan_from_row(r: &rusqlite::Row<'_>) -> Result<LoanRecord> {
    let id: i64 = r.get(0)?;
    let owner: String = r.get(1)?;
    let name: String = r.get(2)?;
    let principal: String = r.get(3)?;
    let rate: String = r.get(4)?;
    let start: NaiveDate = r.get(5)?;
    let end: NaiveDate = r.get(6)?;
    let months: i64 = r.get(7)?;
    let emi: String = r.get(8)?;
    let total: String = r.get(9)?;
    let remaining: String = r.get(10)?;
    let paid: String = r.get(11)?;
    let revision: i64 = r.get(12)?;
    Ok(LoanRecord {
        id,
        owner,
        name,
        principal: principal
            .parse::<Decimal>()
            .with_context(|| format!("Invalid principal '{}' for loan #{}", principal, id))?,
        annual_rate_percent: rate
            .parse::<Decimal>()
            .with_context(|| format!("Invalid rate '{}' for loan #{}", rate, id))?,
        start_date: start,
        end_date: end,
        duration_in_months: u32::try_from(months)
            .with_context(|| format!("Invalid tenure '{}' for loan #{}", months, id))?,
        installment_amount: emi
            .parse::<Decimal>()
            .with_context(|| format!("Invalid EMI '{}' for loan #{}", emi, id))?,
        total_payable: total
            .parse::<Decimal>()
            .with_context(|| format!("Invalid total '{}' for loan #{}", total, id))?,
        remaining_amount: remaining
            .parse::<Decimal>()
            .with_context(|| format!("Invalid remaining amount '{}' for loan #{}", remaining, id))?,
        paid_installments: serde_json::from_str(&paid)
            .with_context(|| format!("Invalid paid installments '{}' for loan #{}", paid, id))?,
        revision,
    })
}

const MAX_WRITE_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
#[error("loan #{id} was modified concurrently; payment not recorded")]
pub struct StaleWrite {
    pub id: i64,
}

/// Record one payment with a guarded write: the UPDATE only lands on the
/// revision that was read; a lost race reloads the row and recomputes.
pub fn record_payment(
    conn: &Connection,
    owner: &str,
    id: i64,
    on: NaiveDate,
) -> Result<LoanRecord> {
    for _ in 0..MAX_WRITE_ATTEMPTS {
        let loan = get_loan(conn, owner, id)?;
        let mut updated = amort::record_installment_paid(&loan, on)?;
        let paid_json = serde_json::to_string(&updated.paid_installments)?;
        let n = conn.execute(
            "UPDATE loans SET remaining_amount=?1, paid_installments=?2, revision=revision+1
             WHERE id=?3 AND revision=?4",
            params![updated.remaining_amount.to_string(), paid_json, id, loan.revision],
        )?;
        if n == 1 {
            updated.revision = loan.revision + 1;
            return Ok(updated);
        }
    }
    Err(StaleWrite { id }.into())
}
