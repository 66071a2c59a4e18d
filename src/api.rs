// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! REST adapter. Raw server payloads are deserialized with every field
//! optional and normalized here, once, to the documented defaults (0, "N/A",
//! empty) so the rest of the crate never sees a missing field.

use crate::models::{
    BankAccount, BankTransaction, Document, DocumentKind, DocumentStatus, MatchSuggestion,
    MatchedEntity, TransactionType,
};
use crate::utils::{get_setting, http_client};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub struct ApiClient {
    base: String,
    token: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base: &str, token: &str) -> Result<Self> {
        Ok(ApiClient {
            base: base.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http: http_client()?,
        })
    }

    pub fn from_settings(conn: &Connection) -> Result<Self> {
        let base = get_setting(conn, "api_base_url")?
            .context("API base URL not set; run `duebook config set-url`")?;
        let token = get_setting(conn, "api_token")?
            .context("API token not set; run `duebook config set-token`")?;
        ApiClient::new(&base, &token)
    }

    fn get(&self, path: &str) -> Result<reqwest::blocking::Response> {
        let url = format!("{}{}", self.base, path);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .with_context(|| format!("GET {}", url))?
            .error_for_status()
            .with_context(|| format!("GET {}", url))?;
        Ok(resp)
    }

    fn post(&self, path: &str) -> Result<reqwest::blocking::Response> {
        let url = format!("{}{}", self.base, path);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .with_context(|| format!("POST {}", url))?
            .error_for_status()
            .with_context(|| format!("POST {}", url))?;
        Ok(resp)
    }

    pub fn invoices(&self) -> Result<Vec<Document>> {
        let raw: Vec<RawDocument> = self.get("/invoices")?.json()?;
        let today = chrono::Utc::now().date_naive();
        Ok(raw
            .into_iter()
            .map(|r| r.normalize(DocumentKind::Invoice, today))
            .collect())
    }

    pub fn bills(&self) -> Result<Vec<Document>> {
        let raw: Vec<RawDocument> = self.get("/bills")?.json()?;
        let today = chrono::Utc::now().date_naive();
        Ok(raw
            .into_iter()
            .map(|r| r.normalize(DocumentKind::Bill, today))
            .collect())
    }

    pub fn bank_accounts(&self) -> Result<Vec<BankAccount>> {
        let raw: Vec<RawAccount> = self.get("/bank-accounts")?.json()?;
        Ok(raw.into_iter().map(RawAccount::normalize).collect())
    }

    pub fn transactions(&self) -> Result<Vec<BankTransaction>> {
        let raw: Vec<RawTransaction> = self.get("/transactions")?.json()?;
        raw.into_iter().map(RawTransaction::normalize).collect()
    }

    pub fn match_suggestions(&self, txn_id: i64) -> Result<Vec<MatchSuggestion>> {
        let raw: Vec<RawSuggestion> = self
            .get(&format!("/transactions/{}/match-suggestions-enhanced", txn_id))?
            .json()?;
        Ok(raw.into_iter().map(RawSuggestion::normalize).collect())
    }

    /// Commit a match; the server's confirmed response is the only source of
    /// the matched flag. Idempotent server-side on the same pair.
    pub fn commit_match(
        &self,
        txn_id: i64,
        kind: DocumentKind,
        entity_id: i64,
    ) -> Result<BankTransaction> {
        let raw: RawTransaction = self
            .post(&format!(
                "/transactions/{}/match?entity_type={}&entity_id={}",
                txn_id,
                kind.as_str(),
                entity_id
            ))?
            .json()?;
        raw.normalize()
    }

    pub fn unmatch(&self, txn_id: i64) -> Result<BankTransaction> {
        let raw: RawTransaction = self
            .post(&format!("/transactions/{}/unmatch", txn_id))?
            .json()?;
        raw.normalize()
    }

    pub fn cashflow_summary(&self) -> Result<CashflowSummary> {
        let raw: RawCashflowSummary = self.get("/cashflow/actuals/summary")?.json()?;
        Ok(raw.normalize())
    }

    pub fn cashflow_statement(&self) -> Result<Vec<CashflowLine>> {
        let raw: Vec<RawCashflowLine> = self.get("/cashflow/actuals/statement")?.json()?;
        Ok(raw.into_iter().map(RawCashflowLine::normalize).collect())
    }

    pub fn cashflow_transactions(&self) -> Result<Vec<CashflowTxn>> {
        let raw: Vec<RawCashflowTxn> = self.get("/cashflow/actuals/transactions")?.json()?;
        Ok(raw.into_iter().map(RawCashflowTxn::normalize).collect())
    }
}

const NA: &str = "N/A";

fn or_na(s: Option<String>) -> String {
    match s {
        Some(s) if !s.trim().is_empty() => s,
        _ => NA.to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub struct RawDocument {
    pub id: Option<i64>,
    pub document_number: Option<String>,
    pub counterparty_name: Option<String>,
    pub gstin: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub balance_due: Option<Decimal>,
    pub days_overdue: Option<i64>,
    pub dso_or_dpo: Option<Decimal>,
    pub status: Option<String>,
    pub is_matched: Option<bool>,
}

impl RawDocument {
    pub fn normalize(self, kind: DocumentKind, today: NaiveDate) -> Document {
        let issue_date = self.issue_date.unwrap_or(today);
        let due_date = self.due_date.unwrap_or(today);
        let balance_due = self.balance_due.unwrap_or(Decimal::ZERO);
        let status = self
            .status
            .as_deref()
            .map(DocumentStatus::parse)
            .unwrap_or(DocumentStatus::Unpaid);
        // Server value wins; otherwise today - due_date, floored at zero and
        // at the document's paid state. Paid documents are never overdue,
        // whatever the payload carries.
        let days_overdue = if status == DocumentStatus::Paid {
            0
        } else {
            match self.days_overdue {
                Some(d) => d.max(0),
                None if balance_due > Decimal::ZERO => (today - due_date).num_days().max(0),
                None => 0,
            }
        };
        Document {
            id: self.id.unwrap_or(0),
            kind,
            number: or_na(self.document_number),
            counterparty: or_na(self.counterparty_name),
            gstin: self.gstin.filter(|g| !g.trim().is_empty()),
            issue_date,
            due_date,
            total_amount: self.total_amount.unwrap_or(Decimal::ZERO),
            balance_due,
            days_overdue,
            cycle_days: self.dso_or_dpo.unwrap_or(Decimal::ZERO),
            status,
            is_matched: self.is_matched.unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawAccount {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub account_number: Option<String>,
    pub balance: Option<Decimal>,
}

impl RawAccount {
    fn normalize(self) -> BankAccount {
        BankAccount {
            id: self.id.unwrap_or(0),
            name: or_na(self.name),
            account_number: or_na(self.account_number),
            balance: self.balance.unwrap_or(Decimal::ZERO),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawTransaction {
    pub id: Option<i64>,
    pub transaction_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub reference_number: Option<String>,
    pub amount: Option<Decimal>,
    pub transaction_type: Option<String>,
    pub is_matched: Option<bool>,
    pub matched_entity_type: Option<String>,
    pub matched_entity_id: Option<i64>,
}

impl RawTransaction {
    pub fn normalize(self) -> Result<BankTransaction> {
        let txn_type = self
            .transaction_type
            .as_deref()
            .and_then(TransactionType::parse)
            .with_context(|| {
                format!(
                    "Transaction {} has unknown type {:?}",
                    self.id.unwrap_or(0),
                    self.transaction_type
                )
            })?;
        let matched_entity = match (
            self.matched_entity_type.as_deref().and_then(DocumentKind::parse),
            self.matched_entity_id,
        ) {
            (Some(kind), Some(id)) => Some(MatchedEntity { kind, id }),
            _ => None,
        };
        Ok(BankTransaction {
            id: self.id.unwrap_or(0),
            date: self
                .transaction_date
                .unwrap_or_else(|| chrono::Utc::now().date_naive()),
            description: or_na(self.description),
            reference: or_na(self.reference_number),
            amount: self.amount.unwrap_or(Decimal::ZERO),
            txn_type,
            is_matched: self.is_matched.unwrap_or(false),
            matched_entity,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RawSuggestion {
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub entity_number: Option<String>,
    pub entity_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub confidence: Option<i64>,
}

impl RawSuggestion {
    pub fn normalize(self) -> MatchSuggestion {
        MatchSuggestion {
            kind: self
                .entity_type
                .as_deref()
                .and_then(DocumentKind::parse)
                .unwrap_or(DocumentKind::Invoice),
            entity_id: self.entity_id.unwrap_or(0),
            number: or_na(self.entity_number),
            counterparty: or_na(self.entity_name),
            date: self.date.unwrap_or_else(|| chrono::Utc::now().date_naive()),
            amount: self.amount.unwrap_or(Decimal::ZERO),
            confidence: self.confidence.unwrap_or(0).clamp(0, 100) as u8,
        }
    }
}

/// Server-computed cash-flow figures; the client only renders these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashflowSummary {
    pub opening_balance: Decimal,
    pub total_inflow: Decimal,
    pub total_outflow: Decimal,
    pub net_cashflow: Decimal,
    pub closing_balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct RawCashflowSummary {
    pub opening_balance: Option<Decimal>,
    pub total_inflow: Option<Decimal>,
    pub total_outflow: Option<Decimal>,
    pub net_cashflow: Option<Decimal>,
    pub closing_balance: Option<Decimal>,
}

impl RawCashflowSummary {
    fn normalize(self) -> CashflowSummary {
        CashflowSummary {
            opening_balance: self.opening_balance.unwrap_or(Decimal::ZERO),
            total_inflow: self.total_inflow.unwrap_or(Decimal::ZERO),
            total_outflow: self.total_outflow.unwrap_or(Decimal::ZERO),
            net_cashflow: self.net_cashflow.unwrap_or(Decimal::ZERO),
            closing_balance: self.closing_balance.unwrap_or(Decimal::ZERO),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashflowLine {
    pub period: String,
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct RawCashflowLine {
    pub period: Option<String>,
    pub inflow: Option<Decimal>,
    pub outflow: Option<Decimal>,
    pub net: Option<Decimal>,
}

impl RawCashflowLine {
    fn normalize(self) -> CashflowLine {
        let inflow = self.inflow.unwrap_or(Decimal::ZERO);
        let outflow = self.outflow.unwrap_or(Decimal::ZERO);
        CashflowLine {
            period: or_na(self.period),
            inflow,
            outflow,
            net: self.net.unwrap_or(inflow - outflow),
        }
    }
}

/// A single settled cash movement from the actuals feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashflowTxn {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub flow: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct RawCashflowTxn {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub flow: Option<String>,
    pub amount: Option<Decimal>,
}

impl RawCashflowTxn {
    pub fn normalize(self) -> CashflowTxn {
        CashflowTxn {
            date: self.date.unwrap_or_else(|| chrono::Utc::now().date_naive()),
            description: or_na(self.description),
            category: or_na(self.category),
            flow: or_na(self.flow),
            amount: self.amount.unwrap_or(Decimal::ZERO),
        }
    }
}
