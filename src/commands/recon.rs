// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::db;
use crate::matching::{
    eligible_candidates, guard_commit, manual_kind_for, MatchEvent, MatchSession, MatchState,
};
use crate::models::{BankTransaction, DocumentKind};
use crate::utils::{fmt_date, fmt_inr, maybe_print_json, parse_id, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("accounts", sub)) => accounts(conn, sub),
        Some(("transactions", sub)) => transactions(conn, sub),
        Some(("suggest", sub)) => suggest(conn, sub),
        Some(("match", sub)) => commit(conn, sub),
        Some(("unmatch", sub)) => unmatch(conn, sub),
        _ => Ok(()),
    }
}

fn accounts(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = db::load_accounts(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
        return Ok(());
    }
    if accounts.is_empty() {
        println!("No bank accounts found (run `duebook fetch`)");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = accounts
        .iter()
        .map(|a| vec![a.name.clone(), a.account_number.clone(), fmt_inr(&a.balance)])
        .collect();
    println!("{}", pretty_table(&["Account", "Number", "Balance"], rows));
    Ok(())
}

fn transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut txns = db::load_transactions(conn, sub.get_flag("unmatched"))?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txns.truncate(*limit);
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &txns)? {
        return Ok(());
    }
    if txns.is_empty() {
        println!("No bank transactions found (run `duebook fetch`)");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = txns.iter().map(txn_row).collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Date", "Description", "Reference", "Type", "Amount", "Matched"],
            rows
        )
    );
    Ok(())
}

fn txn_row(t: &BankTransaction) -> Vec<String> {
    let matched = match (t.is_matched, t.matched_entity) {
        (true, Some(e)) => format!("{} {}", e.kind, e.id),
        (true, None) => "yes".into(),
        _ => "no".into(),
    };
    vec![
        t.id.to_string(),
        fmt_date(t.date),
        t.description.clone(),
        t.reference.clone(),
        t.txn_type.to_string(),
        fmt_inr(&t.amount),
        matched,
    ]
}

fn require_transaction(conn: &Connection, id: i64) -> Result<BankTransaction> {
    db::get_transaction(conn, id)?
        .with_context(|| format!("Transaction {} not in snapshot (run `duebook fetch`)", id))
}

fn suggest(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let txn_id = parse_id(sub.get_one::<String>("transaction").unwrap())?;
    let search = sub
        .get_one::<String>("search")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let txn = require_transaction(conn, txn_id)?;
    let mut session = MatchSession::new(&txn);
    if session.is_read_only() {
        if let Some(e) = txn.matched_entity {
            println!(
                "Transaction {} is already matched to {} {} (read-only)",
                txn_id, e.kind, e.id
            );
        } else {
            println!("Transaction {} is already matched (read-only)", txn_id);
        }
        return Ok(());
    }

    let api = ApiClient::from_settings(conn)?;
    let seq = session.begin_load()?;
    // A suggestions failure degrades to the manual tab; the screen stays up.
    match api.match_suggestions(txn_id) {
        Ok(suggestions) => session.apply(MatchEvent::SuggestionsLoaded { seq, suggestions })?,
        Err(e) => {
            eprintln!("warning: suggestion fetch failed: {:#}", e);
            session.apply(MatchEvent::SuggestionsFailed { seq })?;
        }
    }

    if let Some(tab) = session.current_tab() {
        println!(
            "Transaction {} ({}, {}): default tab '{}'",
            txn_id,
            txn.txn_type,
            fmt_inr(&txn.amount),
            tab.as_str()
        );
    }

    if let MatchState::SuggestionsReady { suggestions, .. } = &session.state {
        let rows: Vec<Vec<String>> = suggestions
            .iter()
            .map(|s| {
                vec![
                    format!("{}%", s.confidence),
                    s.kind.to_string(),
                    s.entity_id.to_string(),
                    s.number.clone(),
                    s.counterparty.clone(),
                    fmt_date(s.date),
                    fmt_inr(&s.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Confidence", "Type", "Id", "Number", "Counterparty", "Date", "Amount"],
                rows
            )
        );
    } else {
        println!("No suggestions");
    }

    // Manual candidates for the direction's kind, unmatched documents only.
    let docs = db::load_documents(conn, manual_kind_for(txn.txn_type))?;
    let candidates = eligible_candidates(&docs, txn.txn_type, &search);
    if candidates.is_empty() {
        println!("No eligible manual candidates");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = candidates
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.number.clone(),
                d.counterparty.clone(),
                fmt_date(d.due_date),
                fmt_inr(&d.balance_due),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Number", "Counterparty", "Due", "Balance"], rows)
    );
    Ok(())
}

fn commit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let txn_id = parse_id(sub.get_one::<String>("transaction").unwrap())?;
    let kind_arg = sub.get_one::<String>("entity-type").unwrap();
    let kind = DocumentKind::parse(kind_arg)
        .with_context(|| format!("Unknown entity type '{}' (use invoice|bill)", kind_arg))?;
    let entity_id = parse_id(sub.get_one::<String>("entity-id").unwrap())?;

    let txn = require_transaction(conn, txn_id)?;
    // Rejected client-side before any network call.
    guard_commit(&txn, kind)?;

    let mut session = MatchSession::new(&txn);
    session.apply(MatchEvent::MatchStarted { kind, entity_id })?;

    let api = ApiClient::from_settings(conn)?;
    match api.commit_match(txn_id, kind, entity_id) {
        Ok(updated) => {
            session.apply(MatchEvent::MatchConfirmed)?;
            // Only a confirmed server response flips local state.
            db::upsert_transaction(conn, &updated)?;
            db::mark_document_matched(conn, kind, entity_id, true)?;
            println!("Matched transaction {} to {} {}", txn_id, kind, entity_id);
            Ok(())
        }
        Err(e) => {
            session.apply(MatchEvent::MatchRejected {
                error: format!("{:#}", e),
            })?;
            Err(e.context("Match failed; transaction left unmatched, retry when ready"))
        }
    }
}

fn unmatch(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let txn_id = parse_id(sub.get_one::<String>("transaction").unwrap())?;
    let txn = require_transaction(conn, txn_id)?;
    if !txn.is_matched {
        anyhow::bail!("Transaction {} is not matched", txn_id);
    }
    let prior = txn.matched_entity;

    let api = ApiClient::from_settings(conn)?;
    let updated = api.unmatch(txn_id)?;
    db::upsert_transaction(conn, &updated)?;
    if let Some(e) = prior {
        db::mark_document_matched(conn, e.kind, e.id, false)?;
    }
    println!("Unmatched transaction {}", txn_id);
    Ok(())
}
