// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::DocumentKind;
use crate::utils::{get_setting, pretty_table, validate_gstin};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) API settings present
    for key in ["api_base_url", "api_token"] {
        if get_setting(conn, key)?.is_none() {
            rows.push(vec!["missing_setting".into(), key.to_string()]);
        }
    }

    // 2) Snapshot populated at all
    let docs_count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?;
    let txns_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM bank_transactions", [], |r| r.get(0))?;
    if docs_count == 0 {
        rows.push(vec!["empty_snapshot".into(), "documents".into()]);
    }
    if txns_count == 0 {
        rows.push(vec!["empty_snapshot".into(), "bank_transactions".into()]);
    }
    if let Some(ts) = db::last_fetched_at(conn)? {
        flag_if_stale(&mut rows, &ts);
    }

    // 3) Document invariants: balance_due <= total_amount, well-formed GSTIN
    for kind in [DocumentKind::Invoice, DocumentKind::Bill] {
        for d in db::load_documents(conn, kind)? {
            if d.balance_due > d.total_amount {
                rows.push(vec![
                    "balance_exceeds_total".into(),
                    format!("{} {}", kind, d.number),
                ]);
            }
            if let Some(g) = &d.gstin {
                if validate_gstin(g).is_err() {
                    rows.push(vec![
                        "malformed_gstin".into(),
                        format!("{} {}: {}", kind, d.number, g),
                    ]);
                }
            }
        }
    }

    // 4) Matched transactions must reference an entity
    for t in db::load_transactions(conn, false)? {
        if t.is_matched && t.matched_entity.is_none() {
            rows.push(vec![
                "matched_without_entity".into(),
                format!("transaction {}", t.id),
            ]);
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

fn flag_if_stale(rows: &mut Vec<Vec<String>>, fetched_at: &str) {
    // sqlite datetime('now') is UTC, second resolution
    if let Ok(ts) = chrono::NaiveDateTime::parse_from_str(fetched_at, "%Y-%m-%d %H:%M:%S") {
        let age = chrono::Utc::now().naive_utc() - ts;
        if age > chrono::Duration::days(7) {
            rows.push(vec![
                "stale_snapshot".into(),
                format!("last fetch {} days ago", age.num_days()),
            ]);
        }
    }
}
