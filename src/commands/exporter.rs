// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("loans", sub)) => export_loans(conn, sub),
        Some(("expenses", sub)) => export_expenses(conn, sub),
        _ => Ok(()),
    }
}

fn export_loans(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT id, owner, name, principal, annual_rate, start_date, end_date, duration_months,
                emi, total_payable, remaining_amount, paid_installments
         FROM loans ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, i64>(7)?,
            r.get::<_, String>(8)?,
            r.get::<_, String>(9)?,
            r.get::<_, String>(10)?,
            r.get::<_, String>(11)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "owner",
                "name",
                "principal",
                "annual_rate",
                "start_date",
                "end_date",
                "duration_months",
                "emi",
                "total_payable",
                "remaining_amount",
                "emis_paid",
            ])?;
            for row in rows {
                let (id, owner, name, p, rate, start, end, months, emi, total, rem, paid) = row?;
                let dates: Vec<NaiveDate> = serde_json::from_str(&paid)
                    .with_context(|| format!("Invalid paid installments for loan #{}", id))?;
                wtr.write_record([
                    id.to_string(),
                    owner,
                    name,
                    p,
                    rate,
                    start,
                    end,
                    months.to_string(),
                    emi,
                    total,
                    rem,
                    dates.len().to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (id, owner, name, p, rate, start, end, months, emi, total, rem, paid) = row?;
                let dates: Vec<NaiveDate> = serde_json::from_str(&paid)
                    .with_context(|| format!("Invalid paid installments for loan #{}", id))?;
                items.push(json!({
                    "id": id, "owner": owner, "name": name, "principal": p,
                    "annual_rate": rate, "start_date": start, "end_date": end,
                    "duration_months": months, "emi": emi, "total_payable": total,
                    "remaining_amount": rem, "paid_installments": dates
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported loans to {}", out);
    Ok(())
}

fn export_expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn
        .prepare("SELECT id, owner, date, amount, category FROM expenses ORDER BY date, id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "owner", "date", "amount", "category"])?;
            for row in rows {
                let (id, owner, date, amount, category) = row?;
                wtr.write_record([id.to_string(), owner, date, amount, category])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (id, owner, date, amount, category) = row?;
                items.push(json!({
                    "id": id, "owner": owner, "date": date, "amount": amount, "category": category
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported expenses to {}", out);
    Ok(())
}
