// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Document;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// Day-range classification of how overdue a document is. Ranges do not
/// overlap: Current covers days <= 0, then (0,30], (30,60], (60,90], (90,∞).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgingBucket {
    Current,
    Days1To30,
    Days31To60,
    Days61To90,
    Days90Plus,
}

impl AgingBucket {
    pub const ALL: [AgingBucket; 5] = [
        AgingBucket::Current,
        AgingBucket::Days1To30,
        AgingBucket::Days31To60,
        AgingBucket::Days61To90,
        AgingBucket::Days90Plus,
    ];

    /// Canonical filter label, as accepted by `--bucket` (case-sensitive).
    pub fn label(self) -> &'static str {
        match self {
            AgingBucket::Current => "current",
            AgingBucket::Days1To30 => "1-30",
            AgingBucket::Days31To60 => "31-60",
            AgingBucket::Days61To90 => "61-90",
            AgingBucket::Days90Plus => "90+",
        }
    }

    pub fn parse_label(s: &str) -> Option<Self> {
        AgingBucket::ALL.into_iter().find(|b| b.label() == s)
    }
}

impl fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgingBucket::Current => f.write_str("Current"),
            other => f.write_str(other.label()),
        }
    }
}

/// Bucket for a days-overdue count. Total over all i64 inputs; not-yet-due
/// (negative) days land in Current.
pub fn classify(days_overdue: i64) -> AgingBucket {
    match days_overdue {
        d if d <= 0 => AgingBucket::Current,
        d if d <= 30 => AgingBucket::Days1To30,
        d if d <= 60 => AgingBucket::Days31To60,
        d if d <= 90 => AgingBucket::Days61To90,
        _ => AgingBucket::Days90Plus,
    }
}

pub fn classify_doc(doc: &Document) -> AgingBucket {
    classify(doc.days_overdue)
}

/// Sum of balance_due per bucket. Every bucket is present in the result, zero
/// when empty, so the map always totals to the collection's outstanding
/// balance.
pub fn aggregate_by_bucket(docs: &[Document]) -> BTreeMap<AgingBucket, Decimal> {
    let mut out: BTreeMap<AgingBucket, Decimal> = AgingBucket::ALL
        .into_iter()
        .map(|b| (b, Decimal::ZERO))
        .collect();
    for doc in docs {
        *out.entry(classify_doc(doc)).or_insert(Decimal::ZERO) += doc.balance_due;
    }
    out
}
