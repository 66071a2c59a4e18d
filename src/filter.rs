// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aging::{classify_doc, AgingBucket};
use crate::models::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketFilter {
    #[default]
    All,
    Only(AgingBucket),
}

impl BucketFilter {
    /// Case-sensitive labels: `all`, `current`, `1-30`, `31-60`, `61-90`, `90+`.
    pub fn parse(s: &str) -> Option<Self> {
        if s == "all" {
            return Some(BucketFilter::All);
        }
        AgingBucket::parse_label(s).map(BucketFilter::Only)
    }

    pub fn matches(self, doc: &Document) -> bool {
        match self {
            BucketFilter::All => true,
            BucketFilter::Only(bucket) => classify_doc(doc) == bucket,
        }
    }
}

/// Search + bucket predicates, ANDed. The default filter (empty search,
/// bucket `all`) is the identity, which is also what "clear filters" resets
/// to.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub search: String,
    pub bucket: BucketFilter,
}

impl DocumentFilter {
    pub fn matches(&self, doc: &Document) -> bool {
        self.bucket.matches(doc) && search_matches(&self.search, doc)
    }

    pub fn apply(&self, docs: &[Document]) -> Vec<Document> {
        docs.iter().filter(|d| self.matches(d)).cloned().collect()
    }
}

/// Case-insensitive substring over document number OR counterparty name;
/// an empty (or all-whitespace) term matches everything.
fn search_matches(term: &str, doc: &Document) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty()
        || doc.number.to_lowercase().contains(&term)
        || doc.counterparty.to_lowercase().contains(&term)
}
