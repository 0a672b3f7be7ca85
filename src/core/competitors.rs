use std::cmp::Ordering;

use super::rng::RandomSource;
use super::types::{Competitor, MarketEvent};

pub fn advance_all<R: RandomSource>(
    competitors: &[Competitor],
    event: &MarketEvent,
    rng: &mut R,
) -> Vec<Competitor> {
    competitors
        .iter()
        .map(|rival| {
            let rate =
                rng.centered() * rival.volatility * event.multiplier * rival.aggressiveness;
            let pnl = rival.aum * rate;
            Competitor {
                aum: rival.aum + pnl,
                pnl,
                ..rival.clone()
            }
        })
        .collect()
}

pub fn sorted_by_aum(competitors: &[Competitor]) -> Vec<Competitor> {
    let mut sorted = competitors.to_vec();
    sorted.sort_by(|a, b| b.aum.partial_cmp(&a.aum).unwrap_or(Ordering::Equal));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{MARKET_EVENTS, default_competitors, find_event};
    use crate::core::rng::ScriptedSource;
    use crate::core::types::EventKind;

    #[test]
    fn oracle_rival_pnl_matches_hand_calculation() {
        let bull = find_event(EventKind::Bull).expect("bull event");
        // Draws centre to +0.5, -0.5, 0.0.
        let mut source = ScriptedSource::new(&[1.0, 0.0, 0.5]);
        let next = advance_all(&default_competitors(), bull, &mut source);

        // Apex: 900k * 0.5 * 0.1 * 1.5 * 1.1
        assert!((next[0].pnl - 74_250.0).abs() < 1e-6);
        assert!((next[0].aum - 974_250.0).abs() < 1e-6);
        // Titan: 1.1M * -0.5 * 0.05 * 1.5 * 0.9
        assert!((next[1].pnl + 37_125.0).abs() < 1e-6);
        assert_eq!(next[2].pnl, 0.0);
        assert_eq!(next[2].aum, 800_000.0);
        assert_eq!(source.consumed(), 3);
    }

    #[test]
    fn coefficients_and_names_are_preserved() {
        let roster = default_competitors();
        let mut source = ScriptedSource::constant(0.9);
        let next = advance_all(&roster, &MARKET_EVENTS[1], &mut source);
        for (before, after) in roster.iter().zip(&next) {
            assert_eq!(before.name, after.name);
            assert_eq!(before.aggressiveness, after.aggressiveness);
            assert_eq!(before.volatility, after.volatility);
        }
    }

    #[test]
    fn leaderboard_sorts_descending() {
        let sorted = sorted_by_aum(&default_competitors());
        let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Titan Investments", "Apex Global", "Veridian Capital"]);
    }
}
