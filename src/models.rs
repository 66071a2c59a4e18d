// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Invoice,
    Bill,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Bill => "bill",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "invoice" | "invoices" => Some(DocumentKind::Invoice),
            "bill" | "bills" => Some(DocumentKind::Bill),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
    Overdue,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Unpaid => "Unpaid",
            DocumentStatus::PartiallyPaid => "Partially Paid",
            DocumentStatus::Paid => "Paid",
            DocumentStatus::Overdue => "Overdue",
        }
    }

    /// Lenient parse of the server's status strings; unknown values fall back
    /// to Unpaid so a new server-side status never breaks the snapshot.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "paid" => DocumentStatus::Paid,
            "overdue" => DocumentStatus::Overdue,
            "partially paid" | "partially_paid" | "partial" => DocumentStatus::PartiallyPaid,
            _ => DocumentStatus::Unpaid,
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outstanding receivable (invoice) or payable (bill), as normalized at the
/// API edge. `days_overdue` is always >= 0; `cycle_days` is the per-document
/// DSO/DPO figure supplied by the server (0 when absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub kind: DocumentKind,
    pub number: String,
    pub counterparty: String,
    pub gstin: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: Decimal,
    pub balance_due: Decimal,
    pub days_overdue: i64,
    pub cycle_days: Decimal,
    pub status: DocumentStatus,
    pub is_matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "credit" => Some(TransactionType::Credit),
            "debit" => Some(TransactionType::Debit),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedEntity {
    pub kind: DocumentKind,
    pub id: i64,
}

/// A bank statement line. Matched to at most one document; Credit lines settle
/// invoices, Debit lines settle bills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub reference: String,
    pub amount: Decimal,
    pub txn_type: TransactionType,
    pub is_matched: bool,
    pub matched_entity: Option<MatchedEntity>,
}

/// A ranked candidate from the server-side scoring service. Ephemeral: never
/// written to the snapshot cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSuggestion {
    pub kind: DocumentKind,
    pub entity_id: i64,
    pub number: String,
    pub counterparty: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: i64,
    pub name: String,
    pub account_number: String,
    pub balance: Decimal,
}
