// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::utils::{fmt_date, fmt_inr, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

// The figures are computed server-side; this command only renders them.
pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub),
        Some(("statement", sub)) => statement(conn, sub),
        Some(("transactions", sub)) => transactions(conn, sub),
        _ => Ok(()),
    }
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let api = ApiClient::from_settings(conn)?;
    let s = api.cashflow_summary()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Opening balance".to_string(), fmt_inr(&s.opening_balance)],
        vec!["Total inflow".to_string(), fmt_inr(&s.total_inflow)],
        vec!["Total outflow".to_string(), fmt_inr(&s.total_outflow)],
        vec!["Net cash flow".to_string(), fmt_inr(&s.net_cashflow)],
        vec!["Closing balance".to_string(), fmt_inr(&s.closing_balance)],
    ];
    println!("{}", pretty_table(&["Figure", "Amount"], rows));
    Ok(())
}

fn statement(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let api = ApiClient::from_settings(conn)?;
    let lines = api.cashflow_statement()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &lines)? {
        return Ok(());
    }
    if lines.is_empty() {
        println!("No cash-flow lines returned");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = lines
        .iter()
        .map(|l| {
            vec![
                l.period.clone(),
                fmt_inr(&l.inflow),
                fmt_inr(&l.outflow),
                fmt_inr(&l.net),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Period", "Inflow", "Outflow", "Net"], rows)
    );
    Ok(())
}

fn transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let api = ApiClient::from_settings(conn)?;
    let txns = api.cashflow_transactions()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &txns)? {
        return Ok(());
    }
    if txns.is_empty() {
        println!("No cash movements returned");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = txns
        .iter()
        .map(|t| {
            vec![
                fmt_date(t.date),
                t.description.clone(),
                t.category.clone(),
                t.flow.clone(),
                fmt_inr(&t.amount),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Description", "Category", "Flow", "Amount"], rows)
    );
    Ok(())
}
