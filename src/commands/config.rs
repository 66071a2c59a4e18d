// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_setting, pretty_table, set_setting};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-url", sub)) => {
            let url = sub
                .get_one::<String>("url")
                .unwrap()
                .trim()
                .trim_end_matches('/')
                .to_string();
            set_setting(conn, "api_base_url", &url)?;
            println!("API base URL set to {}", url);
        }
        Some(("set-token", sub)) => {
            let token = sub.get_one::<String>("token").unwrap().trim().to_string();
            set_setting(conn, "api_token", &token)?;
            println!("API token updated");
        }
        Some(("show", _)) => {
            let url = get_setting(conn, "api_base_url")?.unwrap_or_else(|| "(not set)".into());
            let token = match get_setting(conn, "api_token")? {
                Some(t) if t.len() > 4 => {
                    let prefix: String = t.chars().take(4).collect();
                    format!("{}…", prefix)
                }
                Some(_) => "****".into(),
                None => "(not set)".into(),
            };
            let rows = vec![
                vec!["api_base_url".to_string(), url],
                vec!["api_token".to_string(), token],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}
