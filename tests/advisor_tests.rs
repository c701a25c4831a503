// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use loanbook::{cli, commands::advisor, db, utils};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn prompt_includes_borrower_details() {
    let p = advisor::build_prompt(
        "1200000", "500000", "5", "750", "None", "Home", "Salaried", "Yes",
    );
    assert!(p.starts_with("Based on the following information, suggest loan options:"));
    assert!(p.contains("Annual Income: 1200000"));
    assert!(p.contains("Loan Amount: 500000"));
    assert!(p.contains("Tenure: 5 years"));
    assert!(p.contains("Credit Score: 750"));
    assert!(p.contains("Outstanding Loans: None"));
    assert!(p.contains("Loan Type: Home"));
    assert!(p.contains("Employment: Salaried"));
    assert!(p.contains("Taxpayer: Yes"));
}

#[test]
fn reply_takes_first_data_element() {
    let out = advisor::parse_reply(r#"{"data": ["Consider a home loan at 8.5%", "extra"]}"#)
        .unwrap();
    assert_eq!(out, "Consider a home loan at 8.5%");
}

#[test]
fn reply_rejects_empty_or_malformed_bodies() {
    assert!(advisor::parse_reply(r#"{"data": []}"#).is_err());
    assert!(advisor::parse_reply("gateway timeout").is_err());
    assert!(advisor::parse_reply(r#"{"error": "boom"}"#).is_err());
}

#[test]
fn set_url_persists_the_endpoint() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "loanbook",
        "advisor",
        "set-url",
        "https://example.test/api/predict",
    ]);
    if let Some(("advisor", sub)) = matches.subcommand() {
        advisor::handle(&conn, sub).unwrap();
    } else {
        panic!("advisor command not parsed");
    }
    assert_eq!(
        utils::get_advisor_url(&conn).unwrap().as_deref(),
        Some("https://example.test/api/predict")
    );
}

#[test]
fn recommend_without_endpoint_errors() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "loanbook",
        "advisor",
        "recommend",
        "--income",
        "1200000",
        "--amount",
        "500000",
        "--tenure",
        "5",
        "--credit-score",
        "750",
    ]);
    if let Some(("advisor", sub)) = matches.subcommand() {
        let err = advisor::handle(&conn, sub).unwrap_err();
        assert!(err.to_string().contains("No advisor endpoint"));
    } else {
        panic!("advisor command not parsed");
    }
}
