// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use duebook::aging::AgingBucket;
use duebook::filter::{BucketFilter, DocumentFilter};
use duebook::models::{Document, DocumentKind, DocumentStatus};
use rust_decimal::Decimal;

fn doc(id: i64, number: &str, counterparty: &str, days_overdue: i64) -> Document {
    Document {
        id,
        kind: DocumentKind::Invoice,
        number: number.into(),
        counterparty: counterparty.into(),
        gstin: None,
        issue_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        total_amount: Decimal::from(100),
        balance_due: Decimal::from(100),
        days_overdue,
        cycle_days: Decimal::ZERO,
        status: DocumentStatus::Unpaid,
        is_matched: false,
    }
}

fn fixture() -> Vec<Document> {
    vec![
        doc(1, "INV-001", "Acme Traders", 0),
        doc(2, "INV-002", "Sharma Exports", 15),
        doc(3, "INV-003", "Acme Traders", 45),
        doc(4, "BILL-77", "Patel & Sons", 120),
    ]
}

#[test]
fn default_filter_is_identity() {
    let docs = fixture();
    let filtered = DocumentFilter::default().apply(&docs);
    assert_eq!(filtered, docs);
}

#[test]
fn filter_is_idempotent() {
    let docs = fixture();
    let filter = DocumentFilter {
        search: "acme".into(),
        bucket: BucketFilter::Only(AgingBucket::Days31To60),
    };
    let once = filter.apply(&docs);
    let twice = filter.apply(&once);
    assert_eq!(once, twice);
}

#[test]
fn search_is_case_insensitive_over_number_and_counterparty() {
    let docs = fixture();
    let by_name = DocumentFilter {
        search: "ACME".into(),
        bucket: BucketFilter::All,
    };
    assert_eq!(by_name.apply(&docs).len(), 2);

    let by_number = DocumentFilter {
        search: "bill-77".into(),
        bucket: BucketFilter::All,
    };
    let hits = by_number.apply(&docs);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 4);
}

#[test]
fn predicates_are_anded() {
    let docs = fixture();
    // "acme" matches ids 1 and 3; the bucket keeps only id 3
    let filter = DocumentFilter {
        search: "acme".into(),
        bucket: BucketFilter::Only(AgingBucket::Days31To60),
    };
    let hits = filter.apply(&docs);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 3);
}

#[test]
fn whitespace_search_matches_everything() {
    let docs = fixture();
    let filter = DocumentFilter {
        search: "   ".into(),
        bucket: BucketFilter::All,
    };
    assert_eq!(filter.apply(&docs).len(), docs.len());
}

#[test]
fn bucket_labels_parse_case_sensitively() {
    assert_eq!(BucketFilter::parse("all"), Some(BucketFilter::All));
    assert_eq!(
        BucketFilter::parse("current"),
        Some(BucketFilter::Only(AgingBucket::Current))
    );
    assert_eq!(
        BucketFilter::parse("90+"),
        Some(BucketFilter::Only(AgingBucket::Days90Plus))
    );
    assert_eq!(BucketFilter::parse("All"), None);
    assert_eq!(BucketFilter::parse("0-30"), None);
}

#[test]
fn clearing_filters_restores_the_input() {
    let docs = fixture();
    let narrowed = DocumentFilter {
        search: "sharma".into(),
        bucket: BucketFilter::Only(AgingBucket::Days1To30),
    };
    assert_eq!(narrowed.apply(&docs).len(), 1);
    // reset == default
    let cleared = DocumentFilter::default();
    assert_eq!(cleared.apply(&docs), docs);
}
