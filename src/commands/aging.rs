// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aging::{aggregate_by_bucket, classify_doc};
use crate::db;
use crate::filter::{BucketFilter, DocumentFilter};
use crate::metrics;
use crate::models::{Document, DocumentKind};
use crate::utils::{fmt_date, fmt_inr, maybe_print_json, pretty_table, validate_gstin};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("receivables", sub)) => render(conn, sub, DocumentKind::Invoice),
        Some(("payables", sub)) => render(conn, sub, DocumentKind::Bill),
        _ => Ok(()),
    }
}

fn render(conn: &Connection, sub: &clap::ArgMatches, kind: DocumentKind) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let list_flag = sub.get_flag("list");

    let bucket_arg = sub
        .get_one::<String>("bucket")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "all".into());
    let bucket = BucketFilter::parse(&bucket_arg).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown bucket '{}' (use all|current|1-30|31-60|61-90|90+)",
            bucket_arg
        )
    })?;
    let search = sub
        .get_one::<String>("search")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let mut docs = db::load_documents(conn, kind)?;
    if let Some(g) = sub.get_one::<String>("gstin") {
        let g = g.trim().to_uppercase();
        validate_gstin(&g)?;
        docs.retain(|d| d.gstin.as_deref() == Some(g.as_str()));
    }

    let filter = DocumentFilter { search, bucket };
    let docs = filter.apply(&docs);

    let buckets = aggregate_by_bucket(&docs);
    let stats = metrics::compute(&docs);
    let cycle_label = match kind {
        DocumentKind::Invoice => "DSO",
        DocumentKind::Bill => "DPO",
    };

    if json_flag || jsonl_flag {
        let bucket_map: serde_json::Map<String, serde_json::Value> = buckets
            .iter()
            .map(|(b, total)| (b.label().to_string(), json!(total)))
            .collect();
        let payload = json!({
            "buckets": bucket_map,
            "metrics": stats,
            "documents": if list_flag { Some(&docs) } else { None },
        });
        maybe_print_json(json_flag, jsonl_flag, &payload)?;
        return Ok(());
    }

    if docs.is_empty() {
        match kind {
            DocumentKind::Invoice => println!("No receivables found (run `duebook fetch`)"),
            DocumentKind::Bill => println!("No payables found (run `duebook fetch`)"),
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = buckets
        .iter()
        .map(|(b, total)| vec![b.to_string(), fmt_inr(total)])
        .collect();
    println!("{}", pretty_table(&["Bucket", "Outstanding"], rows));
    println!(
        "Outstanding: {}   Documents: {}   Overdue: {}   Avg {}: {} days",
        fmt_inr(&stats.total_outstanding),
        stats.total_count,
        stats.overdue_count,
        cycle_label,
        stats.average_cycle_days.round_dp(1)
    );

    if list_flag {
        println!("{}", pretty_table(&doc_headers(), doc_rows(&docs)));
    }
    Ok(())
}

fn doc_headers() -> [&'static str; 8] {
    [
        "Number",
        "Counterparty",
        "Issued",
        "Due",
        "Status",
        "Days",
        "Bucket",
        "Balance",
    ]
}

fn doc_rows(docs: &[Document]) -> Vec<Vec<String>> {
    docs.iter()
        .map(|d| {
            vec![
                d.number.clone(),
                d.counterparty.clone(),
                fmt_date(d.issue_date),
                fmt_date(d.due_date),
                d.status.to_string(),
                d.days_overdue.to_string(),
                classify_doc(d).to_string(),
                fmt_inr(&d.balance_due),
            ]
        })
        .collect()
}

/// Rows for the CSV/JSON exporter: same view, machine-friendly values.
pub fn export_rows(docs: &[Document]) -> Vec<Vec<String>> {
    docs.iter()
        .map(|d| {
            vec![
                d.number.clone(),
                d.counterparty.clone(),
                d.issue_date.to_string(),
                d.due_date.to_string(),
                d.status.as_str().to_string(),
                d.days_overdue.to_string(),
                classify_doc(d).label().to_string(),
                d.balance_due.to_string(),
                d.total_amount.to_string(),
            ]
        })
        .collect()
}
