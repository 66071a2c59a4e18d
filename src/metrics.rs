// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aging::{classify_doc, AgingBucket};
use crate::models::Document;
use rust_decimal::Decimal;
use serde::Serialize;

/// Headline figures for a (filtered) document collection. Recomputed on every
/// call; O(n) over the input, no caching across filter changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingMetrics {
    pub total_outstanding: Decimal,
    pub total_count: usize,
    pub overdue_count: usize,
    /// Average per-document DSO/DPO. Zero for an empty collection, never NaN.
    pub average_cycle_days: Decimal,
}

pub fn compute(docs: &[Document]) -> AgingMetrics {
    let total_outstanding: Decimal = docs.iter().map(|d| d.balance_due).sum();
    let total_count = docs.len();
    let overdue_count = docs
        .iter()
        .filter(|d| classify_doc(d) != AgingBucket::Current)
        .count();
    let average_cycle_days = if total_count == 0 {
        Decimal::ZERO
    } else {
        docs.iter().map(|d| d.cycle_days).sum::<Decimal>() / Decimal::from(total_count)
    };
    AgingMetrics {
        total_outstanding,
        total_count,
        overdue_count,
        average_cycle_days,
    }
}
