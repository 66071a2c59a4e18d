// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use duebook::api::{RawCashflowTxn, RawDocument, RawSuggestion, RawTransaction};
use duebook::models::{DocumentKind, DocumentStatus, TransactionType};
use rust_decimal::Decimal;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
}

#[test]
fn missing_fields_normalize_to_documented_defaults() {
    let raw: RawDocument = serde_json::from_str("{}").unwrap();
    let doc = raw.normalize(DocumentKind::Invoice, today());
    assert_eq!(doc.id, 0);
    assert_eq!(doc.number, "N/A");
    assert_eq!(doc.counterparty, "N/A");
    assert_eq!(doc.gstin, None);
    assert_eq!(doc.total_amount, Decimal::ZERO);
    assert_eq!(doc.balance_due, Decimal::ZERO);
    assert_eq!(doc.days_overdue, 0);
    assert_eq!(doc.cycle_days, Decimal::ZERO);
    assert_eq!(doc.status, DocumentStatus::Unpaid);
    assert!(!doc.is_matched);
}

#[test]
fn days_overdue_derives_from_due_date_when_absent() {
    let raw: RawDocument = serde_json::from_str(
        r#"{
            "document_number": "INV-42",
            "due_date": "2026-03-01",
            "balance_due": "100",
            "status": "Unpaid"
        }"#,
    )
    .unwrap();
    let doc = raw.normalize(DocumentKind::Invoice, today());
    assert_eq!(doc.days_overdue, 30);
}

#[test]
fn paid_documents_never_derive_overdue_days() {
    let raw: RawDocument = serde_json::from_str(
        r#"{
            "due_date": "2025-01-01",
            "balance_due": "0",
            "status": "Paid"
        }"#,
    )
    .unwrap();
    let doc = raw.normalize(DocumentKind::Bill, today());
    assert_eq!(doc.days_overdue, 0);

    // A stale server-supplied count is ignored on a paid document too.
    let raw: RawDocument = serde_json::from_str(
        r#"{"days_overdue": 17, "due_date": "2025-01-01", "status": "Paid"}"#,
    )
    .unwrap();
    assert_eq!(raw.normalize(DocumentKind::Bill, today()).days_overdue, 0);
}

#[test]
fn server_supplied_days_overdue_wins_but_is_floored_at_zero() {
    let raw: RawDocument =
        serde_json::from_str(r#"{"days_overdue": 17, "due_date": "2020-01-01"}"#).unwrap();
    assert_eq!(raw.normalize(DocumentKind::Invoice, today()).days_overdue, 17);

    let raw: RawDocument = serde_json::from_str(r#"{"days_overdue": -3}"#).unwrap();
    assert_eq!(raw.normalize(DocumentKind::Invoice, today()).days_overdue, 0);
}

#[test]
fn not_yet_due_documents_derive_zero_not_negative() {
    let raw: RawDocument = serde_json::from_str(
        r#"{"due_date": "2026-06-30", "balance_due": "50", "status": "Unpaid"}"#,
    )
    .unwrap();
    assert_eq!(raw.normalize(DocumentKind::Invoice, today()).days_overdue, 0);
}

#[test]
fn transactions_normalize_matched_entity_pairs_only() {
    let raw: RawTransaction = serde_json::from_str(
        r#"{
            "id": 5,
            "transaction_date": "2026-03-10",
            "amount": "2500.75",
            "transaction_type": "credit",
            "is_matched": true,
            "matched_entity_type": "invoice",
            "matched_entity_id": 9
        }"#,
    )
    .unwrap();
    let t = raw.normalize().unwrap();
    assert_eq!(t.txn_type, TransactionType::Credit);
    assert!(t.is_matched);
    let e = t.matched_entity.unwrap();
    assert_eq!(e.kind, DocumentKind::Invoice);
    assert_eq!(e.id, 9);

    // entity type without an id is not a match reference
    let raw: RawTransaction = serde_json::from_str(
        r#"{"id": 6, "transaction_type": "debit", "matched_entity_type": "bill"}"#,
    )
    .unwrap();
    assert_eq!(raw.normalize().unwrap().matched_entity, None);
}

#[test]
fn unknown_transaction_type_is_an_error_at_the_boundary() {
    let raw: RawTransaction =
        serde_json::from_str(r#"{"id": 7, "transaction_type": "transfer"}"#).unwrap();
    assert!(raw.normalize().is_err());
}

#[test]
fn cash_movements_normalize_to_documented_defaults() {
    let raw: RawCashflowTxn = serde_json::from_str("{}").unwrap();
    let t = raw.normalize();
    assert_eq!(t.description, "N/A");
    assert_eq!(t.category, "N/A");
    assert_eq!(t.flow, "N/A");
    assert_eq!(t.amount, Decimal::ZERO);

    let raw: RawCashflowTxn = serde_json::from_str(
        r#"{
            "date": "2026-03-05",
            "description": "Rent",
            "category": "Operations",
            "flow": "outflow",
            "amount": "45000"
        }"#,
    )
    .unwrap();
    let t = raw.normalize();
    assert_eq!(t.date, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
    assert_eq!(t.flow, "outflow");
    assert_eq!(t.amount, Decimal::from(45000));
}

#[test]
fn suggestion_confidence_is_clamped_to_0_100() {
    let raw: RawSuggestion =
        serde_json::from_str(r#"{"entity_type": "invoice", "entity_id": 1, "confidence": 260}"#)
            .unwrap();
    assert_eq!(raw.normalize().confidence, 100);

    let raw: RawSuggestion = serde_json::from_str(r#"{"confidence": -5}"#).unwrap();
    assert_eq!(raw.normalize().confidence, 0);

    let raw: RawSuggestion = serde_json::from_str("{}").unwrap();
    assert_eq!(raw.normalize().confidence, 0);
}
