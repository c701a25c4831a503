// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    fmt_money, get_active_profile, get_currency, get_salary, parse_decimal, set_salary,
};
use anyhow::{bail, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
            if amount <= Decimal::ZERO {
                bail!("Salary must be positive");
            }
            let owner = get_active_profile(conn)?;
            set_salary(conn, &owner, amount)?;
            println!(
                "Monthly salary for '{}' set to {}",
                owner,
                amount.round_dp(2)
            );
        }
        Some(("show", _)) => {
            let owner = get_active_profile(conn)?;
            match get_salary(conn, &owner)? {
                Some(s) => {
                    let ccy = get_currency(conn)?;
                    println!("Monthly salary for '{}': {}", owner, fmt_money(&s, &ccy));
                }
                None => println!("No monthly salary set for '{}'", owner),
            }
        }
        _ => {}
    }
    Ok(())
}
