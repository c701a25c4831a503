// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use loanbook::{cli, commands::expenses, commands::reports, db, utils};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn add_expense(conn: &Connection, amount: &str, date: &str, category: &str) {
    let matches = cli::build_cli().get_matches_from([
        "loanbook", "expense", "add", "--amount", amount, "--date", date, "--category", category,
    ]);
    if let Some(("expense", sub)) = matches.subcommand() {
        expenses::handle(conn, sub).unwrap();
    } else {
        panic!("expense command not parsed");
    }
}

#[test]
fn balance_subtracts_month_expenses_from_salary() {
    let conn = setup();
    utils::set_salary(&conn, "default", Decimal::from_str_exact("50000").unwrap()).unwrap();
    add_expense(&conn, "1200.50", "2025-08-03", "Rent");
    add_expense(&conn, "300", "2025-08-21", "Food");
    add_expense(&conn, "999", "2025-07-21", "Travel");

    let (salary, spent, remaining) = reports::balance_compute(&conn, "default", "2025-08").unwrap();
    assert_eq!(salary, Decimal::from_str_exact("50000").unwrap());
    assert_eq!(spent, Decimal::from_str_exact("1500.50").unwrap());
    assert_eq!(remaining, Decimal::from_str_exact("48499.50").unwrap());
}

#[test]
fn balance_with_no_expenses_equals_salary() {
    let conn = setup();
    utils::set_salary(&conn, "default", Decimal::from_str_exact("42000").unwrap()).unwrap();

    let (salary, spent, remaining) = reports::balance_compute(&conn, "default", "2025-03").unwrap();
    assert_eq!(salary, remaining);
    assert!(spent.is_zero());
}

#[test]
fn balance_requires_a_salary() {
    let conn = setup();
    let err = reports::balance_compute(&conn, "default", "2025-08").unwrap_err();
    assert!(err.to_string().contains("No monthly salary"));
}
