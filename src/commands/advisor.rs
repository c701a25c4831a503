// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_advisor_url, http_client, set_advisor_url};
use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use serde::Deserialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-url", sub)) => {
            let url = sub.get_one::<String>("url").unwrap().trim().to_string();
            set_advisor_url(conn, &url)?;
            println!("Advisor endpoint set to {}", url);
        }
        Some(("recommend", sub)) => recommend(conn, sub)?,
        Some(("ask", sub)) => ask(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn recommend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let prompt = build_prompt(
        sub.get_one::<String>("income").unwrap(),
        sub.get_one::<String>("amount").unwrap(),
        sub.get_one::<String>("tenure").unwrap(),
        sub.get_one::<String>("credit-score").unwrap(),
        sub.get_one::<String>("outstanding").unwrap(),
        sub.get_one::<String>("loan-type").unwrap(),
        sub.get_one::<String>("employment").unwrap(),
        sub.get_one::<String>("taxpayer").unwrap(),
    );
    println!("{}", send(conn, &prompt)?);
    Ok(())
}

fn ask(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let prompt = sub.get_one::<String>("prompt").unwrap();
    println!("{}", send(conn, prompt)?);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn build_prompt(
    income: &str,
    amount: &str,
    tenure: &str,
    credit_score: &str,
    outstanding: &str,
    loan_type: &str,
    employment: &str,
    taxpayer: &str,
) -> String {
    format!(
        "Based on the following information, suggest loan options:\n\
         Annual Income: {income}\n\
         Loan Amount: {amount}\n\
         Tenure: {tenure} years\n\
         Credit Score: {credit_score}\n\
         Outstanding Loans: {outstanding}\n\
         Loan Type: {loan_type}\n\
         Employment: {employment}\n\
         Taxpayer: {taxpayer}"
    )
}

// The endpoint speaks the Gradio predict protocol: a JSON body with a "data"
// array in, the answer at data[0] out
#[derive(Debug, Deserialize)]
struct AdvisorReply {
    data: Vec<String>,
}

pub fn parse_reply(body: &str) -> Result<String> {
    let reply: AdvisorReply =
        serde_json::from_str(body).context("Malformed advisor reply")?;
    reply
        .data
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Advisor reply contained no data"))
}

fn send(conn: &Connection, prompt: &str) -> Result<String> {
    let url = get_advisor_url(conn)?.ok_or_else(|| {
        anyhow!("No advisor endpoint configured; run 'loanbook advisor set-url'")
    })?;
    let client = http_client()?;
    let resp = client
        .post(&url)
        .json(&serde_json::json!({ "data": [prompt] }))
        .send()?
        .error_for_status()?;
    let body = resp.text()?;
    parse_reply(&body)
}
