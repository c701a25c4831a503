// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::amort;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::{bail, Result};
use serde::Serialize;

#[derive(Serialize)]
pub struct QuoteRow {
    pub principal: String,
    pub months: u32,
    pub monthly_emi: String,
    pub total_interest: String,
    pub total_payable: String,
}

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let principal = parse_decimal(m.get_one::<String>("amount").unwrap().trim())?;
    let rate = parse_decimal(m.get_one::<String>("rate").unwrap().trim())?;
    let months = match (m.get_one::<u32>("months"), m.get_one::<u32>("years")) {
        (Some(mo), _) => *mo,
        (None, Some(y)) => y.saturating_mul(12),
        (None, None) => bail!("Provide a tenure via --months or --years"),
    };

    let q = amort::quote(principal, rate, months)?;
    let row = QuoteRow {
        principal: principal.round_dp(2).to_string(),
        months,
        monthly_emi: q.monthly_emi.round_dp(2).to_string(),
        total_interest: q.total_interest.round_dp(2).to_string(),
        total_payable: q.total_payable.round_dp(2).to_string(),
    };
    if !maybe_print_json(json_flag, false, &row)? {
        let rows = vec![
            vec!["Principal".into(), row.principal.clone()],
            vec!["Tenure".into(), format!("{} months", row.months)],
            vec!["Monthly EMI".into(), row.monthly_emi.clone()],
            vec!["Total interest".into(), row.total_interest.clone()],
            vec!["Total payable".into(), row.total_payable.clone()],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}
