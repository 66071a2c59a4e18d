// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::DocumentKind;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("aging", sub)) => export_aging(conn, sub),
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

const AGING_HEADER: [&str; 9] = [
    "number",
    "counterparty",
    "issue_date",
    "due_date",
    "status",
    "days_overdue",
    "bucket",
    "balance_due",
    "total_amount",
];

fn export_aging(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind_arg = sub.get_one::<String>("kind").unwrap().trim().to_lowercase();
    let kind = match kind_arg.as_str() {
        "receivables" => DocumentKind::Invoice,
        "payables" => DocumentKind::Bill,
        _ => anyhow::bail!("Unknown kind '{}' (use receivables|payables)", kind_arg),
    };
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let docs = db::load_documents(conn, kind)?;
    let rows = crate::commands::aging::export_rows(&docs);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(AGING_HEADER)?;
            for row in rows {
                wtr.write_record(&row)?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<serde_json::Value> = rows
                .iter()
                .map(|row| {
                    let mut obj = serde_json::Map::new();
                    for (k, v) in AGING_HEADER.iter().zip(row) {
                        obj.insert((*k).to_string(), json!(v));
                    }
                    serde_json::Value::Object(obj)
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} {} to {}", docs.len(), kind_arg, out);
    Ok(())
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let txns = db::load_transactions(conn, false)?;
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "description",
                "reference",
                "amount",
                "type",
                "is_matched",
                "matched_entity_type",
                "matched_entity_id",
            ])?;
            for t in &txns {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.description.clone(),
                    t.reference.clone(),
                    t.amount.to_string(),
                    t.txn_type.as_str().to_string(),
                    t.is_matched.to_string(),
                    t.matched_entity
                        .map(|e| e.kind.as_str().to_string())
                        .unwrap_or_default(),
                    t.matched_entity
                        .map(|e| e.id.to_string())
                        .unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&txns)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} transactions to {}", txns.len(), out);
    Ok(())
}
