use serde::Serialize;

use super::catalog::{
    ACHIEVEMENTS, CEO_QUOTES, DEFAULT_BURN_RATE, DEFAULT_FIRM_NAME, MARKET_EVENTS, STARTING_AUM,
    STARTING_TRUST, default_competitors, find_asset,
};
use super::competitors::{advance_all, sorted_by_aum};
use super::error::{GameError, StoreError};
use super::flow::{compute_client_flow, next_trust};
use super::journal::{Journal, format_money, format_signed_money};
use super::ledger::{Ledger, Liquidation, Purchase, Sale};
use super::market::{advance_macro, select_event};
use super::progress::{Progress, ProgressStore, QuarterFacts};
use super::returns::compute_profit;
use super::rng::{RandomSource, Rng};
use super::types::{
    AllocationSlice, Competitor, EventKind, HistoryPoint, LogCategory, MacroState, MarketEvent,
    QuarterOutcome, QuarterReport, WhatIfResult,
};

const MANAGEMENT_FEE_RATE: f64 = 0.005;
const DIFFICULTY_TRIGGER: f64 = 0.3;
const DIFFICULTY_STEP: f64 = 1.05;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub burn_rate: f64,
    pub firm_name: String,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            burn_rate: DEFAULT_BURN_RATE,
            firm_name: DEFAULT_FIRM_NAME.to_string(),
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub ledger: Ledger,
    pub client_trust: f64,
    pub quarter: u32,
    pub macro_state: MacroState,
    pub competitors: Vec<Competitor>,
    pub difficulty_factor: f64,
    pub bankrupt: bool,
    pub history: Vec<HistoryPoint>,
    pub last_pnl: f64,
}

impl GameState {
    pub fn initial() -> Self {
        Self {
            ledger: Ledger::new(STARTING_AUM),
            client_trust: STARTING_TRUST,
            quarter: 0,
            macro_state: MacroState::NEUTRAL,
            competitors: default_competitors(),
            difficulty_factor: 1.0,
            bankrupt: false,
            history: Vec::new(),
            last_pnl: 0.0,
        }
    }

    pub fn aum(&self) -> f64 {
        self.ledger.aum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub burn_rate: f64,
    pub firm_name: String,
}

pub struct Game<R: RandomSource = Rng> {
    state: GameState,
    settings: Settings,
    progress: Progress,
    journal: Journal,
    rng: R,
    store: Option<Box<dyn ProgressStore>>,
}

impl Game<Rng> {
    pub fn from_config(config: &GameConfig) -> Self {
        Game::new(config, Rng::new(config.seed))
    }
}

impl<R: RandomSource> Game<R> {
    pub fn new(config: &GameConfig, rng: R) -> Self {
        Self {
            state: GameState::initial(),
            settings: Settings {
                burn_rate: config.burn_rate,
                firm_name: config.firm_name.clone(),
            },
            progress: Progress::default(),
            journal: Journal::default(),
            rng,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Box<dyn ProgressStore>) -> Result<Self, StoreError> {
        let snapshot = store.load()?;
        tracing::info!(
            unlocked = snapshot.achievements.values().filter(|v| **v).count(),
            best_quarters = snapshot.high_scores.quarters,
            "loaded progress snapshot"
        );
        self.progress = Progress::from_snapshot(snapshot);
        self.store = Some(store);
        Ok(self)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn allocation(&self) -> Vec<AllocationSlice> {
        self.state.ledger.allocation()
    }

    pub fn net_worth(&self) -> f64 {
        self.state.ledger.net_worth()
    }

    pub fn buy(&mut self, asset_id: &str, quantity: u32) -> Result<Purchase, GameError> {
        if self.state.bankrupt {
            return Err(GameError::Bankrupt);
        }
        let asset =
            find_asset(asset_id).ok_or_else(|| GameError::UnknownAsset(asset_id.to_string()))?;
        let quantity = quantity.max(1);

        match self.state.ledger.buy(asset, quantity) {
            Ok(purchase) => {
                self.journal.record(
                    &format!(
                        "You invested **{}** in **{}**.",
                        format_money(purchase.total_cost),
                        purchase.asset_name
                    ),
                    LogCategory::Profit,
                    false,
                );
                Ok(purchase)
            }
            Err(err) => {
                self.journal.record(
                    "You don't have enough capital to make this investment.",
                    LogCategory::Loss,
                    false,
                );
                Err(err)
            }
        }
    }

    pub fn sell_one(&mut self, asset_id: &str) -> Option<Sale> {
        let sale = self.state.ledger.sell_one(asset_id)?;
        self.journal.record(
            &format!(
                "You sold all **{}** for **{}**. Realized P/L: **{}**.",
                sale.asset_name,
                format_money(sale.proceeds),
                format_signed_money(sale.realized_pnl)
            ),
            pnl_category(sale.realized_pnl),
            false,
        );
        Some(sale)
    }

    pub fn sell_all(&mut self) -> Option<Liquidation> {
        let liquidation = self.state.ledger.sell_all()?;
        self.journal.record(
            &format!(
                "You sold your entire portfolio. Realized P/L: **{}**.",
                format_signed_money(liquidation.realized_pnl)
            ),
            pnl_category(liquidation.realized_pnl),
            false,
        );
        Some(liquidation)
    }

    pub fn set_burn_rate(&mut self, value: f64) -> Result<(), GameError> {
        if !value.is_finite() || value < 0.0 {
            return Err(GameError::InvalidBurnRate(value));
        }
        self.settings.burn_rate = value;
        Ok(())
    }

    pub fn set_firm_name(&mut self, name: &str) -> Result<(), GameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(GameError::EmptyFirmName);
        }
        self.settings.firm_name = trimmed.to_string();
        Ok(())
    }

    pub fn restart(&mut self) {
        self.state = GameState::initial();
        self.journal.clear();
        tracing::info!(firm = %self.settings.firm_name, "game restarted");
    }

    pub fn advance_quarter(&mut self) -> QuarterOutcome {
        self.run_quarter(None)
    }

    pub fn advance_quarter_with_event(&mut self, event: &MarketEvent) -> QuarterOutcome {
        self.run_quarter(Some(*event))
    }

    fn run_quarter(&mut self, forced: Option<MarketEvent>) -> QuarterOutcome {
        if self.state.bankrupt {
            return QuarterOutcome::Halted;
        }
        let burn_rate = self.settings.burn_rate;
        if self.state.aum() <= burn_rate {
            self.state.bankrupt = true;
            self.journal.record(
                "Your firm's capital is insufficient to cover operational burn rate. You are bankrupt!",
                LogCategory::Loss,
                false,
            );
            tracing::warn!(
                aum = self.state.aum(),
                burn_rate,
                quarter = self.state.quarter,
                "firm went bankrupt"
            );
            return QuarterOutcome::WentBankrupt;
        }

        self.journal.clear_ticker();
        let state = &mut self.state;
        state.quarter += 1;

        // Lags one quarter: last quarter's pnl against this quarter's opening aum.
        if state.last_pnl / state.aum() > DIFFICULTY_TRIGGER {
            state.difficulty_factor *= DIFFICULTY_STEP;
        }

        state.macro_state = advance_macro(&state.macro_state, &mut self.rng);
        let event = forced.unwrap_or_else(|| *select_event(&MARKET_EVENTS, &mut self.rng));
        let headline = if event.is_political() {
            "Political News:"
        } else {
            "Market News:"
        };
        self.journal
            .record(&format!("{headline} {}", event.text), LogCategory::Event, true);

        let profits = quarter_profits(&state.ledger, &state.macro_state, &event, &mut self.rng);
        let holdings_pnl = state.ledger.apply_quarter_returns(&profits);

        let opening_aum = state.aum();
        let pnl = holdings_pnl + opening_aum * MANAGEMENT_FEE_RATE
            - burn_rate * state.difficulty_factor;
        state.ledger.adjust_cash(pnl);

        let client_flow = compute_client_flow(
            pnl,
            state.client_trust,
            state.aum(),
            state.difficulty_factor,
            &event,
        );
        state.client_trust = next_trust(state.client_trust, pnl, &event);
        state.ledger.adjust_cash(client_flow);
        state.last_pnl = pnl;

        state.competitors = advance_all(&state.competitors, &event, &mut self.rng);
        state.history.push(HistoryPoint {
            quarter: state.quarter,
            aum: state.aum(),
            pnl,
        });

        self.journal.record(
            &format!(
                "Your investments yielded a **P/L of {}**.",
                format_signed_money(pnl)
            ),
            pnl_category(pnl),
            true,
        );
        self.journal.record(
            &format!(
                "Client capital changed by **{}**.",
                format_signed_money(client_flow)
            ),
            if client_flow >= 0.0 {
                LogCategory::Profit
            } else {
                LogCategory::Loss
            },
            true,
        );

        let unlocked = self.update_progress(event.kind);
        let narrative = CEO_QUOTES[self.rng.index(CEO_QUOTES.len())];

        let state = &self.state;
        tracing::info!(
            quarter = state.quarter,
            event = event.kind.label(),
            pnl,
            client_flow,
            aum = state.aum(),
            trust = state.client_trust,
            "quarter closed"
        );

        QuarterOutcome::Advanced(QuarterReport {
            quarter: state.quarter,
            firm_name: self.settings.firm_name.clone(),
            event_kind: event.kind,
            market_event_text: event.text,
            macro_snapshot: state.macro_state,
            pnl,
            client_flow,
            aum: state.aum(),
            client_trust: state.client_trust,
            difficulty_factor: state.difficulty_factor,
            competitors_sorted: sorted_by_aum(&state.competitors),
            unlocked_achievements: unlocked,
            narrative,
        })
    }

    fn update_progress(&mut self, event: EventKind) -> Vec<&'static str> {
        let before = self.progress.clone();
        let facts = QuarterFacts {
            aum: self.state.aum(),
            trust: self.state.client_trust,
            quarter: self.state.quarter,
            event,
        };
        self.progress
            .record_high_scores(facts.aum, facts.quarter, facts.trust);
        let unlocked = self.progress.evaluate(&ACHIEVEMENTS, &facts);
        for achievement in &unlocked {
            self.journal.record(
                &format!("Achievement Unlocked: {}", achievement.name),
                LogCategory::Achievement,
                false,
            );
        }

        if self.progress != before {
            self.persist_progress();
        }
        unlocked.iter().map(|a| a.id).collect()
    }

    fn persist_progress(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        if let Err(err) = store.save(self.progress.snapshot()) {
            tracing::warn!(error = %err, "failed to save progress snapshot");
        }
    }

    /// Forecast of the next quarter against the current book without touching
    /// it: the macro state is not advanced, holdings are not revalued and no
    /// rival moves. Only random draws are consumed.
    pub fn run_what_if(&mut self) -> Option<WhatIfResult> {
        if self.state.bankrupt {
            return None;
        }
        let state = &self.state;
        let event = *select_event(&MARKET_EVENTS, &mut self.rng);
        let profits = quarter_profits(&state.ledger, &state.macro_state, &event, &mut self.rng);
        let holdings_pnl: f64 = profits.iter().map(|(_, profit)| profit).sum();

        let pnl = holdings_pnl + state.aum() * MANAGEMENT_FEE_RATE
            - self.settings.burn_rate * state.difficulty_factor;
        let client_flow = compute_client_flow(
            pnl,
            state.client_trust,
            state.aum() + pnl,
            state.difficulty_factor,
            &event,
        );

        Some(WhatIfResult {
            event_kind: event.kind,
            event_text: event.text,
            pnl,
            client_flow,
        })
    }
}

fn quarter_profits<R: RandomSource>(
    ledger: &Ledger,
    macro_state: &MacroState,
    event: &MarketEvent,
    rng: &mut R,
) -> Vec<(&'static str, f64)> {
    ledger
        .holdings()
        .filter_map(|holding| {
            let asset = find_asset(holding.asset_id)?;
            let profit = compute_profit(holding.current_value, asset, macro_state, event, rng);
            Some((holding.asset_id, profit))
        })
        .collect()
}

fn pnl_category(pnl: f64) -> LogCategory {
    if pnl >= 0.0 {
        LogCategory::Profit
    } else {
        LogCategory::Loss
    }
}
