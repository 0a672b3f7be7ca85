pub mod catalog;
mod competitors;
mod engine;
mod error;
mod flow;
mod journal;
mod ledger;
mod market;
mod progress;
mod returns;
mod rng;
mod types;

pub use competitors::{advance_all, sorted_by_aum};
pub use engine::{Game, GameConfig, GameState, Settings};
pub use error::{GameError, StoreError};
pub use flow::{compute_client_flow, next_trust};
pub use journal::{Journal, clean_text, format_money, format_signed_money};
pub use ledger::{Ledger, Liquidation, Purchase, Sale, normalize_quantity, parse_quantity};
pub use market::{advance_macro, select_event};
pub use progress::{JsonFileStore, MemoryStore, Progress, ProgressStore, QuarterFacts};
pub use returns::{compute_profit, compute_return, effective_multiplier, macro_adjustment};
pub use rng::{RandomSource, Rng, entropy_seed};
pub use types::{
    Achievement, AchievementCondition, AllocationSlice, Asset, AssetClass, Competitor,
    Correlations, EventKind, EventScope, HighScores, HistoryPoint, Holding, LogCategory,
    LogRecord, MacroState, MarketEvent, ProgressSnapshot, QuarterOutcome, QuarterReport,
    RiskTier, SideEffect, WhatIfResult,
};
