// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{
    BankAccount, BankTransaction, Document, DocumentKind, DocumentStatus, MatchedEntity,
    TransactionType,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Duebook", "duebook"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("duebook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open cache at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Snapshot cache schema. Server ids are the primary keys; amounts are stored
/// as TEXT to round-trip Decimal exactly.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS documents(
        id INTEGER NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('invoice','bill')),
        number TEXT NOT NULL,
        counterparty TEXT NOT NULL,
        gstin TEXT,
        issue_date TEXT NOT NULL,
        due_date TEXT NOT NULL,
        total_amount TEXT NOT NULL,
        balance_due TEXT NOT NULL,
        days_overdue INTEGER NOT NULL DEFAULT 0,
        cycle_days TEXT NOT NULL DEFAULT '0',
        status TEXT NOT NULL,
        is_matched INTEGER NOT NULL DEFAULT 0,
        fetched_at TEXT NOT NULL DEFAULT (datetime('now')),
        PRIMARY KEY(kind, id)
    );
    CREATE INDEX IF NOT EXISTS idx_documents_kind ON documents(kind);

    CREATE TABLE IF NOT EXISTS bank_accounts(
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        account_number TEXT NOT NULL,
        balance TEXT NOT NULL DEFAULT '0'
    );

    CREATE TABLE IF NOT EXISTS bank_transactions(
        id INTEGER PRIMARY KEY,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        reference TEXT NOT NULL,
        amount TEXT NOT NULL,
        txn_type TEXT NOT NULL CHECK(txn_type IN ('credit','debit')),
        is_matched INTEGER NOT NULL DEFAULT 0,
        matched_entity_type TEXT,
        matched_entity_id INTEGER,
        fetched_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_bank_transactions_date ON bank_transactions(date);
    "#,
    )?;
    Ok(())
}

fn parse_amount(s: &str, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in cache", what, s))
}

/// Replace the snapshot of one document collection with a freshly fetched one.
pub fn replace_documents(conn: &Connection, kind: DocumentKind, docs: &[Document]) -> Result<()> {
    conn.execute("DELETE FROM documents WHERE kind=?1", params![kind.as_str()])?;
    let mut stmt = conn.prepare(
        "INSERT INTO documents(id, kind, number, counterparty, gstin, issue_date, due_date,
                               total_amount, balance_due, days_overdue, cycle_days, status, is_matched)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )?;
    for d in docs {
        stmt.execute(params![
            d.id,
            kind.as_str(),
            d.number,
            d.counterparty,
            d.gstin,
            d.issue_date.to_string(),
            d.due_date.to_string(),
            d.total_amount.to_string(),
            d.balance_due.to_string(),
            d.days_overdue,
            d.cycle_days.to_string(),
            d.status.as_str(),
            d.is_matched,
        ])?;
    }
    Ok(())
}

pub fn load_documents(conn: &Connection, kind: DocumentKind) -> Result<Vec<Document>> {
    let mut stmt = conn.prepare(
        "SELECT id, number, counterparty, gstin, issue_date, due_date, total_amount,
                balance_due, days_overdue, cycle_days, status, is_matched
         FROM documents WHERE kind=?1 ORDER BY due_date, id",
    )?;
    let mut rows = stmt.query(params![kind.as_str()])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let issue: String = r.get(4)?;
        let due: String = r.get(5)?;
        let total: String = r.get(6)?;
        let balance: String = r.get(7)?;
        let cycle: String = r.get(9)?;
        let status: String = r.get(10)?;
        out.push(Document {
            id: r.get(0)?,
            kind,
            number: r.get(1)?,
            counterparty: r.get(2)?,
            gstin: r.get(3)?,
            issue_date: crate::utils::parse_date(&issue)?,
            due_date: crate::utils::parse_date(&due)?,
            total_amount: parse_amount(&total, "total_amount")?,
            balance_due: parse_amount(&balance, "balance_due")?,
            days_overdue: r.get(8)?,
            cycle_days: parse_amount(&cycle, "cycle_days")?,
            status: DocumentStatus::parse(&status),
            is_matched: r.get(11)?,
        });
    }
    Ok(out)
}

pub fn mark_document_matched(
    conn: &Connection,
    kind: DocumentKind,
    id: i64,
    matched: bool,
) -> Result<()> {
    conn.execute(
        "UPDATE documents SET is_matched=?3 WHERE kind=?1 AND id=?2",
        params![kind.as_str(), id, matched],
    )?;
    Ok(())
}

pub fn replace_accounts(conn: &Connection, accounts: &[BankAccount]) -> Result<()> {
    conn.execute("DELETE FROM bank_accounts", [])?;
    let mut stmt = conn.prepare(
        "INSERT INTO bank_accounts(id, name, account_number, balance) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for a in accounts {
        stmt.execute(params![a.id, a.name, a.account_number, a.balance.to_string()])?;
    }
    Ok(())
}

pub fn load_accounts(conn: &Connection) -> Result<Vec<BankAccount>> {
    let mut stmt =
        conn.prepare("SELECT id, name, account_number, balance FROM bank_accounts ORDER BY name")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let balance: String = r.get(3)?;
        out.push(BankAccount {
            id: r.get(0)?,
            name: r.get(1)?,
            account_number: r.get(2)?,
            balance: parse_amount(&balance, "balance")?,
        });
    }
    Ok(out)
}

pub fn replace_transactions(conn: &Connection, txns: &[BankTransaction]) -> Result<()> {
    conn.execute("DELETE FROM bank_transactions", [])?;
    for t in txns {
        upsert_transaction(conn, t)?;
    }
    Ok(())
}

/// Insert or refresh a single transaction row, e.g. from a confirmed match
/// response.
pub fn upsert_transaction(conn: &Connection, t: &BankTransaction) -> Result<()> {
    conn.execute(
        "INSERT INTO bank_transactions(id, date, description, reference, amount, txn_type,
                                       is_matched, matched_entity_type, matched_entity_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(id) DO UPDATE SET
             date=excluded.date, description=excluded.description,
             reference=excluded.reference, amount=excluded.amount,
             txn_type=excluded.txn_type, is_matched=excluded.is_matched,
             matched_entity_type=excluded.matched_entity_type,
             matched_entity_id=excluded.matched_entity_id,
             fetched_at=datetime('now')",
        params![
            t.id,
            t.date.to_string(),
            t.description,
            t.reference,
            t.amount.to_string(),
            t.txn_type.as_str(),
            t.is_matched,
            t.matched_entity.map(|e| e.kind.as_str()),
            t.matched_entity.map(|e| e.id),
        ],
    )?;
    Ok(())
}

fn transaction_from_row(r: &rusqlite::Row<'_>) -> Result<BankTransaction> {
    let date: String = r.get(1)?;
    let amount: String = r.get(4)?;
    let txn_type: String = r.get(5)?;
    let entity_type: Option<String> = r.get(7)?;
    let entity_id: Option<i64> = r.get(8)?;
    let matched_entity = match (entity_type.as_deref().and_then(DocumentKind::parse), entity_id) {
        (Some(kind), Some(id)) => Some(MatchedEntity { kind, id }),
        _ => None,
    };
    Ok(BankTransaction {
        id: r.get(0)?,
        date: crate::utils::parse_date(&date)?,
        description: r.get(2)?,
        reference: r.get(3)?,
        amount: parse_amount(&amount, "amount")?,
        txn_type: TransactionType::parse(&txn_type)
            .with_context(|| format!("Invalid transaction type '{}' in cache", txn_type))?,
        is_matched: r.get(6)?,
        matched_entity,
    })
}

const TXN_COLS: &str = "id, date, description, reference, amount, txn_type, is_matched,
                        matched_entity_type, matched_entity_id";

pub fn load_transactions(conn: &Connection, unmatched_only: bool) -> Result<Vec<BankTransaction>> {
    let sql = if unmatched_only {
        format!(
            "SELECT {TXN_COLS} FROM bank_transactions WHERE is_matched=0 ORDER BY date DESC, id DESC"
        )
    } else {
        format!("SELECT {TXN_COLS} FROM bank_transactions ORDER BY date DESC, id DESC")
    };
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(transaction_from_row(r)?);
    }
    Ok(out)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Option<BankTransaction>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {TXN_COLS} FROM bank_transactions WHERE id=?1"))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => Ok(Some(transaction_from_row(r)?)),
        None => Ok(None),
    }
}

/// Newest fetched_at across the snapshot tables, if anything was ever fetched.
pub fn last_fetched_at(conn: &Connection) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT MAX(ts) FROM (
                 SELECT MAX(fetched_at) AS ts FROM documents
                 UNION ALL SELECT MAX(fetched_at) FROM bank_transactions
             )",
            [],
            |r| r.get(0),
        )
        .optional()?
        .flatten();
    Ok(v)
}
