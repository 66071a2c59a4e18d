// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

const UA: &str = concat!(
    "duebook/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/duebook)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid id '{}'", s))
}

/// Display format used everywhere: DD-MMM-YYYY, e.g. 05-Apr-2026.
pub fn fmt_date(d: NaiveDate) -> String {
    d.format("%d-%b-%Y").to_string()
}

/// en-IN money rendering: rupee symbol plus Indian digit grouping, i.e. the
/// last three digits then pairs: 12345678.9 -> ₹1,23,45,678.90.
pub fn fmt_inr(d: &Decimal) -> String {
    let v = d.round_dp(2);
    let neg = v.is_sign_negative() && !v.is_zero();
    let s = format!("{:.2}", v.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s.as_str(), "00"),
    };
    let grouped = if int_part.len() > 3 {
        let (head, tail) = int_part.split_at(int_part.len() - 3);
        let mut groups = Vec::new();
        let mut i = head.len();
        while i > 2 {
            groups.push(&head[i - 2..i]);
            i -= 2;
        }
        if i > 0 {
            groups.push(&head[..i]);
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    } else {
        int_part.to_string()
    };
    format!("{}₹{}.{}", if neg { "-" } else { "" }, grouped, frac_part)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// API settings live in the snapshot cache's settings table.
pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

static GSTIN_RE: Lazy<Regex> = Lazy::new(|| {
    // 15 characters: state code, PAN, entity digit, 'Z', checksum
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").unwrap()
});

/// Validate a GST identification number before it is used anywhere. Rejection
/// happens client-side, ahead of any network call or state change.
pub fn validate_gstin(s: &str) -> Result<()> {
    let s = s.trim();
    if s.len() != 15 {
        anyhow::bail!("Invalid GSTIN '{}': expected 15 characters, got {}", s, s.len());
    }
    if !GSTIN_RE.is_match(s) {
        anyhow::bail!("Invalid GSTIN '{}'", s);
    }
    Ok(())
}
