// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::db;
use crate::models::DocumentKind;
use anyhow::Result;
use rusqlite::Connection;

/// Snapshot the remote collections. A failure in one collection is a warning,
/// not an abort; the others still land.
pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let api = ApiClient::from_settings(conn)?;
    let only = m.get_one::<String>("only").map(|s| s.trim().to_lowercase());
    if let Some(o) = only.as_deref() {
        if !matches!(o, "invoices" | "bills" | "accounts" | "transactions") {
            anyhow::bail!(
                "Unknown collection '{}' (use invoices|bills|accounts|transactions)",
                o
            );
        }
    }
    let want = |name: &str| only.as_deref().is_none_or(|o| o == name);
    let mut failed = 0usize;

    if want("invoices") {
        match api.invoices() {
            Ok(docs) => {
                db::replace_documents(conn, DocumentKind::Invoice, &docs)?;
                println!("Fetched {} invoices", docs.len());
            }
            Err(e) => {
                failed += 1;
                eprintln!("warning: invoices fetch failed: {:#}", e);
            }
        }
    }
    if want("bills") {
        match api.bills() {
            Ok(docs) => {
                db::replace_documents(conn, DocumentKind::Bill, &docs)?;
                println!("Fetched {} bills", docs.len());
            }
            Err(e) => {
                failed += 1;
                eprintln!("warning: bills fetch failed: {:#}", e);
            }
        }
    }
    if want("accounts") {
        match api.bank_accounts() {
            Ok(accounts) => {
                db::replace_accounts(conn, &accounts)?;
                println!("Fetched {} bank accounts", accounts.len());
            }
            Err(e) => {
                failed += 1;
                eprintln!("warning: bank accounts fetch failed: {:#}", e);
            }
        }
    }
    if want("transactions") {
        match api.transactions() {
            Ok(txns) => {
                db::replace_transactions(conn, &txns)?;
                println!("Fetched {} bank transactions", txns.len());
            }
            Err(e) => {
                failed += 1;
                eprintln!("warning: transactions fetch failed: {:#}", e);
            }
        }
    }

    if failed > 0 {
        println!("Snapshot updated; {} collection(s) skipped", failed);
    } else {
        println!("Snapshot updated");
    }
    Ok(())
}
