use super::rng::RandomSource;
use super::types::{Asset, MacroState, MarketEvent};

pub fn compute_return<R: RandomSource>(asset: &Asset, macro_state: &MacroState, rng: &mut R) -> f64 {
    let (low, high) = asset.return_range;
    let base = rng.uniform(low, high);
    base + macro_adjustment(asset, macro_state)
}

pub fn macro_adjustment(asset: &Asset, macro_state: &MacroState) -> f64 {
    let neutral = MacroState::NEUTRAL;
    let c = &asset.correlations;
    (macro_state.gdp - neutral.gdp) * c.gdp
        + (macro_state.interest_rate - neutral.interest_rate) * c.interest_rate
        + (macro_state.inflation - neutral.inflation) * c.inflation
}

pub fn effective_multiplier(asset: &Asset, event: &MarketEvent) -> f64 {
    if event.applies_to(asset) {
        event.multiplier
    } else {
        1.0
    }
}

/// Profit on a position worth `current_value`, never losing more than that.
/// Consumes exactly one draw.
pub fn compute_profit<R: RandomSource>(
    current_value: f64,
    asset: &Asset,
    macro_state: &MacroState,
    event: &MarketEvent,
    rng: &mut R,
) -> f64 {
    let rate = compute_return(asset, macro_state, rng);
    (current_value * rate * effective_multiplier(asset, event)).max(-current_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{MARKET_EVENTS, find_asset, find_event};
    use crate::core::rng::{Rng, ScriptedSource};
    use crate::core::types::EventKind;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-9;

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
    fn neutral_macro_leaves_base_rate_untouched() {
        let bonds = asset("bonds");
        let mut source = ScriptedSource::constant(0.5);
        let rate = compute_return(bonds, &MacroState::NEUTRAL, &mut source);
        assert_approx(rate, 0.01);
    }

    #[test]
    fn oracle_macro_adjustment_matches_hand_calculation() {
        // blue_chip: 0.8*(1.1-1) - 0.3*(0.02-0.01) - 0.1*(0.03-0.02) = 0.08 - 0.003 - 0.001
        let macro_state = MacroState {
            gdp: 1.1,
            interest_rate: 0.02,
            inflation: 0.03,
        };
        assert_approx(macro_adjustment(asset("blue_chip"), &macro_state), 0.076);
    }

    #[test]
    fn untargeted_event_scales_every_asset() {
        let bull = find_event(EventKind::Bull).expect("bull event");
        let mut source = ScriptedSource::constant(0.0);
        let profit = compute_profit(
            100_000.0,
            asset("blue_chip"),
            &MacroState::NEUTRAL,
            bull,
            &mut source,
        );
        assert_approx(profit, 100_000.0 * 0.01 * 1.5);
    }

    #[test]
    fn class_targeted_event_only_scales_matching_assets() {
        let tax_law = &MARKET_EVENTS[3];
        assert_approx(effective_multiplier(asset("small_cap"), tax_law), 0.8);
        assert_approx(effective_multiplier(asset("bonds"), tax_law), 1.0);

        let sanctions = &MARKET_EVENTS[5];
        assert_approx(effective_multiplier(asset("commodities_gold"), sanctions), 0.8);
        assert_approx(effective_multiplier(asset("crypto"), sanctions), 1.0);
    }

    #[test]
    fn asset_targeted_event_matches_on_id() {
        let mut event = MARKET_EVENTS[0];
        event.scope = crate::core::types::EventScope::Asset("crypto");
        event.multiplier = 2.0;
        assert_approx(effective_multiplier(asset("crypto"), &event), 2.0);
        assert_approx(effective_multiplier(asset("private_equity"), &event), 1.0);
    }

    #[test]
    fn profit_consumes_one_draw() {
        let neutral = find_event(EventKind::Neutral).expect("neutral event");
        let mut source = ScriptedSource::new(&[0.2, 0.9]);
        compute_profit(1.0, asset("crypto"), &MacroState::NEUTRAL, neutral, &mut source);
        assert_eq!(source.consumed(), 1);
    }

    #[test]
    fn profit_never_loses_more_than_the_position() {
        // 0.08 + 1.5 * (0.5 - 1.0) = -0.67, times the bull 1.5 is -1.005
        let bull = find_event(EventKind::Bull).expect("bull event");
        let trough = MacroState {
            gdp: 0.5,
            ..MacroState::NEUTRAL
        };
        let mut source = ScriptedSource::constant(0.0);
        let profit = compute_profit(75_000.0, asset("private_equity"), &trough, bull, &mut source);
        assert_approx(profit, -75_000.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_neutral_rates_stay_inside_catalog_range(seed in 0u64..10_000, idx in 0usize..7) {
            let asset = &crate::core::catalog::ASSETS[idx];
            let mut rng = Rng::new(seed);
            let rate = compute_return(asset, &MacroState::NEUTRAL, &mut rng);
            prop_assert!(rate >= asset.return_range.0 - EPS);
            prop_assert!(rate <= asset.return_range.1 + EPS);
        }
    }
}
