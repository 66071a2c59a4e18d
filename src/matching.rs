// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reconciliation matching as an explicit state machine. The scoring itself
//! lives server-side; this module owns the client contract around it: tab
//! selection per transaction direction, candidate eligibility, stale-load
//! discard, and the commit guards that must reject a bad match before any
//! network call is issued.

use crate::models::{
    BankTransaction, Document, DocumentKind, MatchSuggestion, MatchedEntity, TransactionType,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTab {
    Suggestions,
    Invoices,
    Bills,
}

impl MatchTab {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchTab::Suggestions => "suggestions",
            MatchTab::Invoices => "invoices",
            MatchTab::Bills => "bills",
        }
    }
}

/// The manual tab a transaction falls back to when no suggestions exist.
/// Credit settles invoices, Debit settles bills; the opposite tab is never
/// offered.
pub fn manual_tab_for(txn_type: TransactionType) -> MatchTab {
    match txn_type {
        TransactionType::Credit => MatchTab::Invoices,
        TransactionType::Debit => MatchTab::Bills,
    }
}

pub fn manual_kind_for(txn_type: TransactionType) -> DocumentKind {
    match txn_type {
        TransactionType::Credit => DocumentKind::Invoice,
        TransactionType::Debit => DocumentKind::Bill,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("transaction {0} is already matched; unmatch it first")]
    AlreadyMatched(i64),
    #[error("a {txn_type} transaction cannot be matched to a {kind}")]
    WrongDirection {
        txn_type: TransactionType,
        kind: DocumentKind,
    },
    #[error("tab '{0}' is not available for this transaction")]
    TabUnavailable(&'static str),
    #[error("no match in progress")]
    NotMatching,
    #[error("suggestions are still loading")]
    LoadInFlight,
    #[error("a match commit is already in progress")]
    CommitInFlight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchState {
    Unmatched,
    SuggestionsLoading,
    SuggestionsReady {
        suggestions: Vec<MatchSuggestion>,
        tab: MatchTab,
    },
    SuggestionsEmpty {
        tab: MatchTab,
    },
    Matching {
        prior: Box<MatchState>,
        kind: DocumentKind,
        entity_id: i64,
    },
    /// Matched transactions are read-only. The entity can be absent when the
    /// server flagged the row matched without reporting what it settles.
    Matched {
        entity: Option<MatchedEntity>,
    },
    /// Commit failed: the pre-commit context is retained so the user can
    /// retry, and no matched flag was set anywhere.
    MatchFailed {
        prior: Box<MatchState>,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchEvent {
    /// A suggestion load completed. `seq` identifies the load; completions
    /// for anything but the newest load are discarded as stale.
    SuggestionsLoaded {
        seq: u64,
        suggestions: Vec<MatchSuggestion>,
    },
    /// A suggestion load failed. Degrades to the empty manual tab instead of
    /// surfacing an error; the rest of the screen stays usable.
    SuggestionsFailed { seq: u64 },
    TabSelected(MatchTab),
    MatchStarted { kind: DocumentKind, entity_id: i64 },
    MatchConfirmed,
    MatchRejected { error: String },
}

/// Per-transaction matching session. All transitions are synchronous and
/// pure with respect to the session; the async edges (suggestion fetch, match
/// commit) feed back in as events.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSession {
    pub transaction_id: i64,
    pub txn_type: TransactionType,
    pub state: MatchState,
    seq: u64,
}

impl MatchSession {
    /// An already-matched transaction opens read-only in `Matched`, whether
    /// or not the server reported the settled entity; anything else starts at
    /// `Unmatched`.
    pub fn new(txn: &BankTransaction) -> Self {
        let state = if txn.is_matched {
            MatchState::Matched {
                entity: txn.matched_entity,
            }
        } else {
            MatchState::Unmatched
        };
        MatchSession {
            transaction_id: txn.id,
            txn_type: txn.txn_type,
            state,
            seq: 0,
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.state, MatchState::Matched { .. })
    }

    pub fn current_tab(&self) -> Option<MatchTab> {
        match &self.state {
            MatchState::SuggestionsReady { tab, .. } | MatchState::SuggestionsEmpty { tab } => {
                Some(*tab)
            }
            MatchState::Matching { prior, .. } | MatchState::MatchFailed { prior, .. } => {
                match prior.as_ref() {
                    MatchState::SuggestionsReady { tab, .. }
                    | MatchState::SuggestionsEmpty { tab } => Some(*tab),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Start (or restart) a suggestion load. Returns the sequence number the
    /// completion event must carry; re-triggering supersedes any in-flight
    /// load, so the last completed response for the current sequence wins.
    pub fn begin_load(&mut self) -> Result<u64, MatchError> {
        if self.is_read_only() {
            return Err(MatchError::AlreadyMatched(self.transaction_id));
        }
        self.seq += 1;
        self.state = MatchState::SuggestionsLoading;
        Ok(self.seq)
    }

    pub fn apply(&mut self, event: MatchEvent) -> Result<(), MatchError> {
        match event {
            MatchEvent::SuggestionsLoaded { seq, suggestions } => {
                if seq != self.seq {
                    return Ok(()); // stale response for a superseded load
                }
                if !matches!(self.state, MatchState::SuggestionsLoading) {
                    return Ok(());
                }
                self.state = if suggestions.is_empty() {
                    MatchState::SuggestionsEmpty {
                        tab: manual_tab_for(self.txn_type),
                    }
                } else {
                    MatchState::SuggestionsReady {
                        suggestions,
                        tab: MatchTab::Suggestions,
                    }
                };
                Ok(())
            }
            MatchEvent::SuggestionsFailed { seq } => {
                if seq != self.seq || !matches!(self.state, MatchState::SuggestionsLoading) {
                    return Ok(());
                }
                self.state = MatchState::SuggestionsEmpty {
                    tab: manual_tab_for(self.txn_type),
                };
                Ok(())
            }
            MatchEvent::TabSelected(tab) => self.select_tab(tab),
            MatchEvent::MatchStarted { kind, entity_id } => self.start_match(kind, entity_id),
            MatchEvent::MatchConfirmed => match std::mem::replace(&mut self.state, MatchState::Unmatched) {
                MatchState::Matching { kind, entity_id, .. } => {
                    self.state = MatchState::Matched {
                        entity: Some(MatchedEntity { kind, id: entity_id }),
                    };
                    Ok(())
                }
                other => {
                    self.state = other;
                    Err(MatchError::NotMatching)
                }
            },
            MatchEvent::MatchRejected { error } => match std::mem::replace(&mut self.state, MatchState::Unmatched) {
                MatchState::Matching { prior, .. } => {
                    self.state = MatchState::MatchFailed { prior, error };
                    Ok(())
                }
                other => {
                    self.state = other;
                    Err(MatchError::NotMatching)
                }
            },
        }
    }

    fn select_tab(&mut self, tab: MatchTab) -> Result<(), MatchError> {
        // Hard directional rule, not a default: the cross-direction manual
        // tab does not exist for this transaction.
        match (tab, self.txn_type) {
            (MatchTab::Bills, TransactionType::Credit) => {
                return Err(MatchError::TabUnavailable("bills"));
            }
            (MatchTab::Invoices, TransactionType::Debit) => {
                return Err(MatchError::TabUnavailable("invoices"));
            }
            _ => {}
        }
        match &mut self.state {
            MatchState::SuggestionsReady { tab: current, .. } => {
                *current = tab;
                Ok(())
            }
            MatchState::SuggestionsEmpty { tab: current } => {
                if tab == MatchTab::Suggestions {
                    return Err(MatchError::TabUnavailable("suggestions"));
                }
                *current = tab;
                Ok(())
            }
            MatchState::SuggestionsLoading => Err(MatchError::LoadInFlight),
            MatchState::Matched { .. } => Err(MatchError::AlreadyMatched(self.transaction_id)),
            _ => Err(MatchError::NotMatching),
        }
    }

    fn start_match(&mut self, kind: DocumentKind, entity_id: i64) -> Result<(), MatchError> {
        if self.is_read_only() {
            return Err(MatchError::AlreadyMatched(self.transaction_id));
        }
        if kind != manual_kind_for(self.txn_type) {
            return Err(MatchError::WrongDirection {
                txn_type: self.txn_type,
                kind,
            });
        }
        if matches!(self.state, MatchState::SuggestionsLoading) {
            return Err(MatchError::LoadInFlight);
        }
        if matches!(self.state, MatchState::Matching { .. }) {
            return Err(MatchError::CommitInFlight);
        }
        let prior = Box::new(self.state.clone());
        self.state = MatchState::Matching {
            prior,
            kind,
            entity_id,
        };
        Ok(())
    }
}

/// Reject a commit before any network call: already-matched transactions are
/// read-only, and the entity kind must agree with the transaction direction.
pub fn guard_commit(txn: &BankTransaction, kind: DocumentKind) -> Result<(), MatchError> {
    if txn.is_matched {
        return Err(MatchError::AlreadyMatched(txn.id));
    }
    if kind != manual_kind_for(txn.txn_type) {
        return Err(MatchError::WrongDirection {
            txn_type: txn.txn_type,
            kind,
        });
    }
    Ok(())
}

/// Manual-match candidates: documents of the direction's kind that are not
/// already settled, optionally narrowed by a search term over number or
/// counterparty.
pub fn eligible_candidates<'a>(
    docs: &'a [Document],
    txn_type: TransactionType,
    search: &str,
) -> Vec<&'a Document> {
    let kind = manual_kind_for(txn_type);
    let term = search.trim().to_lowercase();
    docs.iter()
        .filter(|d| d.kind == kind && !d.is_matched)
        .filter(|d| {
            term.is_empty()
                || d.number.to_lowercase().contains(&term)
                || d.counterparty.to_lowercase().contains(&term)
        })
        .collect()
}
