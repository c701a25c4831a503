// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_active_profile, get_currency, set_active_profile, set_currency};
use anyhow::{bail, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("use", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            if name.is_empty() {
                bail!("Profile name must not be empty");
            }
            set_active_profile(conn, &name)?;
            println!("Active profile set to '{}'", name);
        }
        Some(("show", _)) => {
            println!("Active profile: {}", get_active_profile(conn)?);
            println!("Display currency: {}", get_currency(conn)?);
        }
        Some(("set-currency", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
            set_currency(conn, &ccy)?;
            println!("Display currency set to {}", ccy);
        }
        _ => {}
    }
    Ok(())
}
