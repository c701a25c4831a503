// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::ExpenseRecord;
use crate::utils::{
    fmt_money, get_active_profile, get_currency, maybe_print_json, parse_date, parse_decimal,
    parse_month, pretty_table,
};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("total", sub)) => total(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = get_active_profile(conn)?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    if amount <= Decimal::ZERO {
        bail!("Expense amount must be positive");
    }
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s.trim())?,
        None => Utc::now().date_naive(),
    };
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();

    conn.execute(
        "INSERT INTO expenses(owner, date, amount, category) VALUES (?1, ?2, ?3, ?4)",
        params![owner, date.to_string(), amount.to_string(), category],
    )?;
    println!("Recorded {} on {} ({})", amount, date, category);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let owner = get_active_profile(conn)?;
    let data: Vec<ExpenseRow> = query_rows(conn, &owner, sub)?.iter().map(expense_row).collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Id", "Date", "Amount", "Category"], rows));
    }
    Ok(())
}

fn total(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = get_active_profile(conn)?;
    let month = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s.trim())?,
        None => Utc::now().date_naive().format("%Y-%m").to_string(),
    };
    let sum = month_total(conn, &owner, &month)?;
    let ccy = get_currency(conn)?;
    println!("Spent in {}: {}", month, fmt_money(&sum, &ccy));
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let owner = get_active_profile(conn)?;
    let n = conn.execute(
        "DELETE FROM expenses WHERE id=?1 AND owner=?2",
        params![id, owner],
    )?;
    if n == 0 {
        bail!("Expense #{} not found", id);
    }
    println!("Removed expense #{}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub amount: String,
    pub category: String,
}

fn expense_row(e: &ExpenseRecord) -> ExpenseRow {
    ExpenseRow {
        id: e.id,
        date: e.date.to_string(),
        amount: e.amount.to_string(),
        category: e.category.clone(),
    }
}

pub fn query_rows(
    conn: &Connection,
    owner: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<ExpenseRecord>> {
    let mut sql = String::from(
        "SELECT id, owner, date, amount, category FROM expenses WHERE owner=?",
    );
    let mut params_vec: Vec<String> = vec![owner.to_string()];

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.into());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let amount: String = r.get(3)?;
        data.push(ExpenseRecord {
            id: r.get(0)?,
            owner: r.get(1)?,
            date: r.get(2)?,
            amount: amount
                .parse::<Decimal>()
                .with_context(|| format!("Invalid expense amount '{}'", amount))?,
            category: r.get(4)?,
        });
    }
    Ok(data)
}

pub fn month_total(conn: &Connection, owner: &str, month: &str) -> Result<Decimal> {
    let mut stmt =
        conn.prepare("SELECT amount FROM expenses WHERE owner=?1 AND substr(date,1,7)=?2")?;
    let mut rows = stmt.query(params![owner, month])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let s: String = r.get(0)?;
        total += s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid expense amount '{}'", s))?;
    }
    Ok(total)
}
