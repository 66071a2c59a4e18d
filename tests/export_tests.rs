// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use duebook::models::{Document, DocumentKind, DocumentStatus};
use duebook::{cli, commands, db};
use rusqlite::Connection;
use tempfile::NamedTempFile;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let docs = vec![
        Document {
            id: 1,
            kind: DocumentKind::Bill,
            number: "BILL-001".into(),
            counterparty: "Patel & Sons".into(),
            gstin: None,
            issue_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 2, 5).unwrap(),
            total_amount: "1800".parse().unwrap(),
            balance_due: "300.25".parse().unwrap(),
            days_overdue: 45,
            cycle_days: "40".parse().unwrap(),
            status: DocumentStatus::PartiallyPaid,
            is_matched: false,
        },
        Document {
            id: 2,
            kind: DocumentKind::Bill,
            number: "BILL-002".into(),
            counterparty: "Sharma Exports".into(),
            gstin: None,
            issue_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            total_amount: "950".parse().unwrap(),
            balance_due: "950".parse().unwrap(),
            days_overdue: 0,
            cycle_days: "10".parse().unwrap(),
            status: DocumentStatus::Unpaid,
            is_matched: false,
        },
    ];
    db::replace_documents(&conn, DocumentKind::Bill, &docs).unwrap();
    conn
}

fn run_export(conn: &Connection, args: &[&str]) {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(args);
    if let Some(("export", export_m)) = matches.subcommand() {
        commands::export::handle(conn, export_m).unwrap();
    } else {
        panic!("export command not parsed");
    }
}

#[test]
fn aging_export_writes_csv_with_bucket_labels() {
    let conn = setup();
    let out = NamedTempFile::new().unwrap();
    let path = out.path().to_str().unwrap().to_string();
    run_export(
        &conn,
        &[
            "duebook", "export", "aging", "--kind", "payables", "--format", "csv", "--out", &path,
        ],
    );

    let body = std::fs::read_to_string(&path).unwrap();
    let mut lines = body.lines();
    assert_eq!(
        lines.next().unwrap(),
        "number,counterparty,issue_date,due_date,status,days_overdue,bucket,balance_due,total_amount"
    );
    let first = lines.next().unwrap();
    assert!(first.contains("BILL-001"));
    assert!(first.contains("31-60"));
    assert!(first.contains("300.25"));
    let second = lines.next().unwrap();
    assert!(second.contains("BILL-002"));
    assert!(second.contains("current"));
}

#[test]
fn aging_export_writes_json_objects() {
    let conn = setup();
    let out = NamedTempFile::new().unwrap();
    let path = out.path().to_str().unwrap().to_string();
    run_export(
        &conn,
        &[
            "duebook", "export", "aging", "--kind", "payables", "--format", "json", "--out", &path,
        ],
    );

    let body = std::fs::read_to_string(&path).unwrap();
    let items: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["number"], "BILL-001");
    assert_eq!(items[0]["bucket"], "31-60");
    assert_eq!(items[1]["bucket"], "current");
}

#[test]
fn transactions_export_writes_csv() {
    use duebook::models::{BankTransaction, TransactionType};
    let conn = setup();
    db::replace_transactions(
        &conn,
        &[BankTransaction {
            id: 3,
            date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            description: "IMPS to Patel".into(),
            reference: "R-555".into(),
            amount: "300.25".parse().unwrap(),
            txn_type: TransactionType::Debit,
            is_matched: false,
            matched_entity: None,
        }],
    )
    .unwrap();

    let out = NamedTempFile::new().unwrap();
    let path = out.path().to_str().unwrap().to_string();
    run_export(
        &conn,
        &[
            "duebook", "export", "transactions", "--format", "csv", "--out", &path,
        ],
    );
    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.starts_with(
        "id,date,description,reference,amount,type,is_matched,matched_entity_type,matched_entity_id"
    ));
    assert!(body.contains("IMPS to Patel"));
    assert!(body.contains("debit"));
}
