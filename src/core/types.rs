use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetClass {
    Equities,
    FixedIncome,
    Alternatives,
    Commodities,
    RealEstate,
}

impl AssetClass {
    pub fn label(self) -> &'static str {
        match self {
            AssetClass::Equities => "Equities",
            AssetClass::FixedIncome => "Fixed Income",
            AssetClass::Alternatives => "Alternatives",
            AssetClass::Commodities => "Commodities",
            AssetClass::RealEstate => "Real Estate",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskTier {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlations {
    pub gdp: f64,
    pub interest_rate: f64,
    pub inflation: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: f64,
    pub risk: RiskTier,
    pub return_range: (f64, f64),
    pub class: AssetClass,
    pub beta: f64,
    pub correlations: Correlations,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    Bull,
    Bear,
    Neutral,
    Political,
    Regulatory,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Bull => "Bull",
            EventKind::Bear => "Bear",
            EventKind::Neutral => "Neutral",
            EventKind::Political => "Political",
            EventKind::Regulatory => "Regulatory",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "target")]
pub enum EventScope {
    Market,
    AssetClass(AssetClass),
    Asset(&'static str),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SideEffect {
    ClientBoost,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEvent {
    pub kind: EventKind,
    pub text: &'static str,
    pub multiplier: f64,
    pub trust_change: f64,
    pub probability: f64,
    pub scope: EventScope,
    pub side_effect: Option<SideEffect>,
}

impl MarketEvent {
    pub fn applies_to(&self, asset: &Asset) -> bool {
        match self.scope {
            EventScope::Market => true,
            EventScope::AssetClass(class) => class == asset.class,
            EventScope::Asset(id) => id == asset.id,
        }
    }

    pub fn is_political(&self) -> bool {
        matches!(self.kind, EventKind::Political | EventKind::Regulatory)
    }

    pub fn boosts_clients(&self) -> bool {
        self.side_effect == Some(SideEffect::ClientBoost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroState {
    pub gdp: f64,
    pub interest_rate: f64,
    pub inflation: f64,
}

impl MacroState {
    pub const NEUTRAL: MacroState = MacroState {
        gdp: 1.0,
        interest_rate: 0.01,
        inflation: 0.02,
    };
}

impl Default for MacroState {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub asset_id: &'static str,
    pub quantity: u32,
    pub current_value: f64,
    pub initial_cost: f64,
    pub pnl: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    pub aum: f64,
    pub aggressiveness: f64,
    pub volatility: f64,
    pub pnl: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "threshold")]
pub enum AchievementCondition {
    Aum(f64),
    Trust(f64),
    Quarter(u32),
    Event(EventKind),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub condition: AchievementCondition,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighScores {
    pub aum: f64,
    pub quarters: u32,
    pub trust: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub achievements: BTreeMap<String, bool>,
    pub high_scores: HighScores,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub quarter: u32,
    pub aum: f64,
    pub pnl: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Profit,
    Loss,
    Event,
    Achievement,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub message: String,
    pub category: LogCategory,
    pub timestamp: DateTime<Utc>,
    pub ticker: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterReport {
    pub quarter: u32,
    pub firm_name: String,
    pub event_kind: EventKind,
    pub market_event_text: &'static str,
    pub macro_snapshot: MacroState,
    pub pnl: f64,
    pub client_flow: f64,
    pub aum: f64,
    pub client_trust: f64,
    pub difficulty_factor: f64,
    pub competitors_sorted: Vec<Competitor>,
    pub unlocked_achievements: Vec<&'static str>,
    pub narrative: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "report")]
pub enum QuarterOutcome {
    Advanced(QuarterReport),
    WentBankrupt,
    Halted,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatIfResult {
    pub event_kind: EventKind,
    pub event_text: &'static str,
    pub pnl: f64,
    pub client_flow: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSlice {
    pub class: AssetClass,
    pub label: &'static str,
    pub percent: f64,
    pub value: f64,
}
