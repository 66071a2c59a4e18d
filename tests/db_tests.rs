// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use duebook::models::{
    BankAccount, BankTransaction, Document, DocumentKind, DocumentStatus, MatchedEntity,
    TransactionType,
};
use duebook::{cli, commands, db, utils};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn invoice(id: i64, balance: &str) -> Document {
    Document {
        id,
        kind: DocumentKind::Invoice,
        number: format!("INV-{:03}", id),
        counterparty: "Acme Traders".into(),
        gstin: Some("27AAPFU0939F1ZV".into()),
        issue_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        total_amount: balance.parse().unwrap(),
        balance_due: balance.parse().unwrap(),
        days_overdue: 12,
        cycle_days: "33.5".parse().unwrap(),
        status: DocumentStatus::PartiallyPaid,
        is_matched: false,
    }
}

fn credit_txn(id: i64) -> BankTransaction {
    BankTransaction {
        id,
        date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        description: "NEFT from Acme".into(),
        reference: "UTR9988".into(),
        amount: "2500.75".parse().unwrap(),
        txn_type: TransactionType::Credit,
        is_matched: false,
        matched_entity: None,
    }
}

#[test]
fn documents_round_trip_through_the_cache() {
    let conn = setup();
    let docs = vec![invoice(1, "1200.50"), invoice(2, "0.01")];
    db::replace_documents(&conn, DocumentKind::Invoice, &docs).unwrap();

    let loaded = db::load_documents(&conn, DocumentKind::Invoice).unwrap();
    assert_eq!(loaded, docs);

    // bills are a separate snapshot
    assert!(db::load_documents(&conn, DocumentKind::Bill).unwrap().is_empty());
}

#[test]
fn replace_documents_overwrites_the_previous_snapshot() {
    let conn = setup();
    db::replace_documents(&conn, DocumentKind::Invoice, &[invoice(1, "10")]).unwrap();
    db::replace_documents(&conn, DocumentKind::Invoice, &[invoice(7, "20")]).unwrap();
    let loaded = db::load_documents(&conn, DocumentKind::Invoice).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, 7);
}

#[test]
fn transaction_upsert_reflects_a_confirmed_match() {
    let conn = setup();
    db::replace_transactions(&conn, &[credit_txn(5)]).unwrap();
    db::replace_documents(&conn, DocumentKind::Invoice, &[invoice(9, "2500.75")]).unwrap();

    // Server response after the commit
    let mut updated = credit_txn(5);
    updated.is_matched = true;
    updated.matched_entity = Some(MatchedEntity {
        kind: DocumentKind::Invoice,
        id: 9,
    });
    db::upsert_transaction(&conn, &updated).unwrap();
    db::mark_document_matched(&conn, DocumentKind::Invoice, 9, true).unwrap();

    let t = db::get_transaction(&conn, 5).unwrap().unwrap();
    assert!(t.is_matched);
    assert_eq!(
        t.matched_entity,
        Some(MatchedEntity {
            kind: DocumentKind::Invoice,
            id: 9,
        })
    );
    let doc = &db::load_documents(&conn, DocumentKind::Invoice).unwrap()[0];
    assert!(doc.is_matched);

    // unmatched-only listing now excludes it
    assert!(db::load_transactions(&conn, true).unwrap().is_empty());
}

#[test]
fn accounts_round_trip() {
    let conn = setup();
    let accounts = vec![BankAccount {
        id: 1,
        name: "HDFC Current".into(),
        account_number: "50200012345678".into(),
        balance: Decimal::from(100000),
    }];
    db::replace_accounts(&conn, &accounts).unwrap();
    assert_eq!(db::load_accounts(&conn).unwrap(), accounts);
}

#[test]
fn config_set_url_trims_and_strips_trailing_slash() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "duebook",
        "config",
        "set-url",
        "--url",
        " https://erp.example.com/api/ ",
    ]);
    if let Some(("config", config_m)) = matches.subcommand() {
        commands::config::handle(&conn, config_m).unwrap();
    } else {
        panic!("config command not parsed");
    }
    assert_eq!(
        utils::get_setting(&conn, "api_base_url").unwrap().as_deref(),
        Some("https://erp.example.com/api")
    );
}

#[test]
fn settings_upsert_overwrites() {
    let conn = setup();
    utils::set_setting(&conn, "api_token", "old").unwrap();
    utils::set_setting(&conn, "api_token", "new").unwrap();
    assert_eq!(
        utils::get_setting(&conn, "api_token").unwrap().as_deref(),
        Some("new")
    );
}
