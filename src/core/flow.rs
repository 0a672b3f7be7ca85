use super::types::MarketEvent;

pub const TRUST_MIN: f64 = 0.0;
pub const TRUST_MAX: f64 = 100.0;

const LOYAL_TRUST: f64 = 90.0;
const FLIGHT_TRUST: f64 = 30.0;
const INFLOW_RATE: f64 = 0.05;
const OUTFLOW_RATE: f64 = -0.10;
const BOOST_RATE: f64 = 0.05;
const PROFIT_TRUST_GAIN: f64 = 5.0;
const LOSS_TRUST_PENALTY: f64 = -10.0;

/// `trust` is the level clients held going into the quarter; the boost side
/// effect pays out regardless of performance and is not scaled by difficulty.
pub fn compute_client_flow(
    pnl: f64,
    trust: f64,
    aum: f64,
    difficulty: f64,
    event: &MarketEvent,
) -> f64 {
    let mut flow = 0.0;
    if pnl > 0.0 {
        if trust > LOYAL_TRUST {
            flow = INFLOW_RATE * aum * difficulty;
        }
    } else if trust < FLIGHT_TRUST {
        flow = OUTFLOW_RATE * aum * difficulty;
    }

    if event.boosts_clients() {
        flow += BOOST_RATE * aum;
    }
    flow
}

pub fn next_trust(trust: f64, pnl: f64, event: &MarketEvent) -> f64 {
    let base = if pnl > 0.0 {
        PROFIT_TRUST_GAIN
    } else {
        LOSS_TRUST_PENALTY
    };
    (trust + base + event.trust_change).clamp(TRUST_MIN, TRUST_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{MARKET_EVENTS, find_event};
    use crate::core::types::EventKind;
    use proptest::prelude::{prop_assert, proptest};

    fn event(kind: EventKind) -> &'static MarketEvent {
        find_event(kind).expect("catalog event")
    }

    #[test]
    fn loyal_clients_add_capital_on_profit() {
        let flow = compute_client_flow(1.0, 95.0, 1_000_000.0, 1.05, event(EventKind::Neutral));
        assert!((flow - 52_500.0).abs() < 1e-6);
    }

    #[test]
    fn trust_exactly_at_threshold_moves_nothing() {
        let neutral = event(EventKind::Neutral);
        assert_eq!(compute_client_flow(1.0, 90.0, 1_000_000.0, 1.0, neutral), 0.0);
        assert_eq!(compute_client_flow(-1.0, 30.0, 1_000_000.0, 1.0, neutral), 0.0);
    }

    #[test]
    fn distrustful_clients_pull_capital_on_loss() {
        let flow = compute_client_flow(0.0, 10.0, 500_000.0, 2.0, event(EventKind::Bear));
        assert!((flow + 100_000.0).abs() < 1e-6);
    }

    #[test]
    fn stimulus_boost_stacks_on_top_of_outflow() {
        let stimulus = &MARKET_EVENTS[4];
        assert!(stimulus.boosts_clients());
        let flow = compute_client_flow(-5.0, 10.0, 1_000_000.0, 1.0, stimulus);
        assert!((flow - (-100_000.0 + 50_000.0)).abs() < 1e-6);
    }

    #[test]
    fn trust_moves_by_event_delta_and_clamps() {
        assert_eq!(next_trust(100.0, 10.0, event(EventKind::Bull)), 100.0);
        assert_eq!(next_trust(50.0, 10.0, event(EventKind::Bear)), 53.0);
        assert_eq!(next_trust(100.0, -1.0, event(EventKind::Neutral)), 90.0);
        assert_eq!(next_trust(4.0, 0.0, event(EventKind::Bear)), 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(128))]

        #[test]
        fn prop_trust_stays_clamped(
            trust in 0.0f64..=100.0,
            pnl in -1e7f64..1e7,
            idx in 0usize..6,
        ) {
            let next = next_trust(trust, pnl, &MARKET_EVENTS[idx]);
            prop_assert!((TRUST_MIN..=TRUST_MAX).contains(&next));
        }
    }
}
