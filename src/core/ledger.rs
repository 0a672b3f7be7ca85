use std::collections::BTreeMap;

use serde::Serialize;

use super::catalog::find_asset;
use super::error::GameError;
use super::types::{AllocationSlice, Asset, AssetClass, Holding};

pub fn normalize_quantity(raw: i64) -> u32 {
    if raw < 1 {
        1
    } else {
        u32::try_from(raw).unwrap_or(u32::MAX)
    }
}

pub fn parse_quantity(raw: &str) -> u32 {
    raw.trim().parse::<i64>().map(normalize_quantity).unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub asset_id: &'static str,
    pub asset_name: &'static str,
    pub quantity: u32,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub asset_id: &'static str,
    pub asset_name: &'static str,
    pub proceeds: f64,
    pub realized_pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Liquidation {
    pub positions: usize,
    pub proceeds: f64,
    pub realized_pnl: f64,
}

/// Cash (`aum`) plus open positions. Buys and sells move value between the two
/// without creating or destroying any; only [`Ledger::adjust_cash`] and
/// [`Ledger::apply_quarter_returns`] change the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    aum: f64,
    holdings: BTreeMap<&'static str, Holding>,
}

impl Ledger {
    pub fn new(aum: f64) -> Self {
        Self {
            aum,
            holdings: BTreeMap::new(),
        }
    }

    pub fn aum(&self) -> f64 {
        self.aum
    }

    pub fn holdings(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.values()
    }

    pub fn holding(&self, asset_id: &str) -> Option<&Holding> {
        self.holdings.get(asset_id)
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn portfolio_value(&self) -> f64 {
        self.holdings.values().map(|h| h.current_value).sum()
    }

    pub fn net_worth(&self) -> f64 {
        self.aum + self.portfolio_value()
    }

    pub fn adjust_cash(&mut self, delta: f64) {
        self.aum += delta;
    }

    pub fn buy(&mut self, asset: &'static Asset, quantity: u32) -> Result<Purchase, GameError> {
        let total_cost = asset.cost * f64::from(quantity);
        if self.aum < total_cost {
            return Err(GameError::InsufficientCapital {
                required: total_cost,
                available: self.aum,
            });
        }

        self.aum -= total_cost;
        self.holdings
            .entry(asset.id)
            .and_modify(|holding| {
                holding.quantity = holding.quantity.saturating_add(quantity);
                holding.current_value += total_cost;
                holding.initial_cost += total_cost;
            })
            .or_insert(Holding {
                asset_id: asset.id,
                quantity,
                current_value: total_cost,
                initial_cost: total_cost,
                pnl: 0.0,
            });

        Ok(Purchase {
            asset_id: asset.id,
            asset_name: asset.name,
            quantity,
            total_cost,
        })
    }

    pub fn sell_one(&mut self, asset_id: &str) -> Option<Sale> {
        let holding = self.holdings.remove(asset_id)?;
        self.aum += holding.current_value;
        let asset_name = find_asset(holding.asset_id).map_or(holding.asset_id, |a| a.name);
        Some(Sale {
            asset_id: holding.asset_id,
            asset_name,
            proceeds: holding.current_value,
            realized_pnl: holding.pnl,
        })
    }

    pub fn sell_all(&mut self) -> Option<Liquidation> {
        if self.holdings.is_empty() {
            return None;
        }
        let holdings = std::mem::take(&mut self.holdings);
        let proceeds: f64 = holdings.values().map(|h| h.current_value).sum();
        let realized_pnl: f64 = holdings.values().map(|h| h.pnl).sum();
        self.aum += proceeds;
        Some(Liquidation {
            positions: holdings.len(),
            proceeds,
            realized_pnl,
        })
    }

    /// Books each profit against its holding and returns the quarter total.
    /// A loss is capped at the position's value; ids with no open position
    /// are ignored.
    pub fn apply_quarter_returns(&mut self, profits: &[(&str, f64)]) -> f64 {
        let mut total = 0.0;
        for &(asset_id, profit) in profits {
            if let Some(holding) = self.holdings.get_mut(asset_id) {
                let profit = profit.max(-holding.current_value);
                holding.current_value += profit;
                holding.pnl += profit;
                total += profit;
            }
        }
        total
    }

    pub fn allocation(&self) -> Vec<AllocationSlice> {
        let total = self.portfolio_value();
        if total <= 0.0 {
            return Vec::new();
        }

        let mut by_class: BTreeMap<AssetClass, f64> = BTreeMap::new();
        for holding in self.holdings.values() {
            let Some(asset) = find_asset(holding.asset_id) else {
                continue;
            };
            *by_class.entry(asset.class).or_insert(0.0) += holding.current_value;
        }

        by_class
            .into_iter()
            .map(|(class, value)| AllocationSlice {
                class,
                label: class.label(),
                percent: value / total * 100.0,
                value,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::ASSETS;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn asset(id: &str) -> &'static Asset {
        find_asset(id).expect("catalog asset")
    }

    #[test]
    fn quantity_normalisation_falls_back_to_one() {
        assert_eq!(normalize_quantity(0), 1);
        assert_eq!(normalize_quantity(-4), 1);
        assert_eq!(normalize_quantity(7), 7);
        assert_eq!(parse_quantity("abc"), 1);
        assert_eq!(parse_quantity(" 3 "), 3);
        assert_eq!(parse_quantity("-2"), 1);
    }

    #[test]
    fn buy_debits_cash_and_merges_repeat_purchases() {
        let mut ledger = Ledger::new(1_000_000.0);
        ledger.buy(asset("bonds"), 2).expect("affordable");
        ledger.buy(asset("bonds"), 3).expect("affordable");

        let holding = ledger.holding("bonds").expect("open position");
        assert_eq!(holding.quantity, 5);
        assert_approx(holding.current_value, 50_000.0);
        assert_approx(holding.initial_cost, 50_000.0);
        assert_approx(ledger.aum(), 950_000.0);
    }

    #[test]
    fn buy_rejects_when_cash_is_short_and_changes_nothing() {
        let mut ledger = Ledger::new(40_000.0);
        let before = ledger.clone();
        let err = ledger.buy(asset("blue_chip"), 1).expect_err("too expensive");
        assert_eq!(
            err,
            GameError::InsufficientCapital {
                required: 50_000.0,
                available: 40_000.0
            }
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn buy_allows_spending_exactly_all_cash() {
        let mut ledger = Ledger::new(20_000.0);
        ledger.buy(asset("small_cap"), 1).expect("exact amount");
        assert_approx(ledger.aum(), 0.0);
    }

    #[test]
    fn sell_one_credits_value_and_reports_realized_pnl() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.buy(asset("crypto"), 4).expect("affordable");
        ledger.apply_quarter_returns(&[("crypto", 2_500.0)]);

        let sale = ledger.sell_one("crypto").expect("position exists");
        assert_approx(sale.proceeds, 22_500.0);
        assert_approx(sale.realized_pnl, 2_500.0);
        assert_eq!(sale.asset_name, "Cryptocurrency");
        assert_approx(ledger.aum(), 102_500.0);
        assert!(ledger.holding("crypto").is_none());
    }

    #[test]
    fn sell_one_on_missing_position_is_a_no_op() {
        let mut ledger = Ledger::new(10.0);
        assert!(ledger.sell_one("gold").is_none());
        assert_approx(ledger.aum(), 10.0);
    }

    #[test]
    fn sell_all_on_empty_portfolio_is_a_no_op() {
        let mut ledger = Ledger::new(10.0);
        assert!(ledger.sell_all().is_none());
        assert_approx(ledger.aum(), 10.0);
    }

    #[test]
    fn sell_all_then_rebuy_starts_fresh_pnl() {
        let mut ledger = Ledger::new(500_000.0);
        ledger.buy(asset("real_estate"), 2).expect("affordable");
        ledger.apply_quarter_returns(&[("real_estate", -4_000.0)]);

        let liquidation = ledger.sell_all().expect("non-empty");
        assert_eq!(liquidation.positions, 1);
        assert_approx(liquidation.realized_pnl, -4_000.0);

        ledger.buy(asset("real_estate"), 1).expect("affordable");
        let holding = ledger.holding("real_estate").expect("new position");
        assert_approx(holding.pnl, 0.0);
        assert_eq!(holding.quantity, 1);
    }

    #[test]
    fn quarter_returns_ignore_unknown_ids() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.buy(asset("bonds"), 1).expect("affordable");
        let total = ledger.apply_quarter_returns(&[("bonds", 100.0), ("crypto", 9_999.0)]);
        assert_approx(total, 100.0);
        assert_approx(ledger.portfolio_value(), 10_100.0);
    }

    #[test]
    fn allocation_groups_by_class() {
        let mut ledger = Ledger::new(1_000_000.0);
        assert!(ledger.allocation().is_empty());

        ledger.buy(asset("blue_chip"), 1).expect("affordable");
        ledger.buy(asset("small_cap"), 1).expect("affordable");
        ledger.buy(asset("bonds"), 3).expect("affordable");

        let slices = ledger.allocation();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].class, AssetClass::Equities);
        assert_approx(slices[0].value, 70_000.0);
        assert_approx(slices[0].percent, 70.0);
        assert_eq!(slices[1].label, "Fixed Income");
        assert_approx(slices[1].percent, 30.0);
    }

    #[test]
    fn quarter_loss_is_capped_at_position_value() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.buy(asset("bonds"), 1).expect("affordable");
        let total = ledger.apply_quarter_returns(&[("bonds", -25_000.0)]);
        assert_approx(total, -10_000.0);

        let holding = ledger.holding("bonds").expect("open position");
        assert_approx(holding.current_value, 0.0);
        assert_approx(holding.pnl, -10_000.0);
        assert_approx(ledger.net_worth(), 90_000.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_buys_and_sells_conserve_net_worth(
            start in 0.0f64..2_000_000.0,
            orders in proptest::collection::vec((0usize..7, 1u32..6, proptest::bool::ANY), 1..20),
        ) {
            let mut ledger = Ledger::new(start);
            for (idx, quantity, sell) in orders {
                let asset = &ASSETS[idx];
                let before = ledger.net_worth();
                if sell {
                    ledger.sell_one(asset.id);
                } else {
                    let _ = ledger.buy(asset, quantity);
                }
                prop_assert!((ledger.net_worth() - before).abs() <= 1e-6);
                prop_assert!(ledger.aum() >= -1e-9);
            }
            let before = ledger.net_worth();
            ledger.sell_all();
            prop_assert!((ledger.net_worth() - before).abs() <= 1e-6);
            prop_assert!(ledger.is_empty());
        }
    }
}
