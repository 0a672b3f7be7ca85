use chrono::Utc;

use super::types::{LogCategory, LogRecord};

#[derive(Debug, Clone, Default)]
pub struct Journal {
    records: Vec<LogRecord>,
    ticker: Vec<LogRecord>,
}

impl Journal {
    pub fn record(&mut self, message: &str, category: LogCategory, ticker: bool) {
        let entry = LogRecord {
            message: clean_text(message),
            category,
            timestamp: Utc::now(),
            ticker,
        };
        tracing::debug!(category = ?category, ticker, message = %entry.message, "journal");
        if ticker {
            self.ticker.push(entry.clone());
        }
        self.records.push(entry);
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn ticker(&self) -> &[LogRecord] {
        &self.ticker
    }

    pub fn clear_ticker(&mut self) {
        self.ticker.clear();
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.ticker.clear();
    }
}

/// Strips `**` emphasis and complete `<...>` tags. A `<` with no closing
/// `>` is kept as text.
pub fn clean_text(text: &str) -> String {
    let text = text.replace("**", "");
    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_str();
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                rest = &rest[open..];
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn format_money(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    if abs >= 1e12 {
        format!("{sign}{:.2}T", abs / 1e12)
    } else if abs >= 1e9 {
        format!("{sign}{:.2}B", abs / 1e9)
    } else if abs >= 1e6 {
        format!("{sign}{:.2}M", abs / 1e6)
    } else if abs >= 1e3 {
        format!("{sign}{:.2}K", abs / 1e3)
    } else {
        format!("{sign}${abs:.0}")
    }
}

pub fn format_signed_money(amount: f64) -> String {
    if amount >= 0.0 {
        format!("+{}", format_money(amount))
    } else {
        format_money(amount)
    }
}
