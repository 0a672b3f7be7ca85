use super::rng::RandomSource;
use super::types::{MacroState, MarketEvent};

const GDP_STEP: f64 = 0.1;
const INTEREST_RATE_STEP: f64 = 0.005;
const INFLATION_STEP: f64 = 0.005;

pub const GDP_FLOOR: f64 = 0.5;
pub const INTEREST_RATE_FLOOR: f64 = 0.005;
pub const INFLATION_FLOOR: f64 = 0.0;

/// One quarter of bounded random walk. Draw order is gdp, interest rate,
/// inflation.
pub fn advance_macro<R: RandomSource>(state: &MacroState, rng: &mut R) -> MacroState {
    let gdp = state.gdp + rng.centered() * GDP_STEP;
    let interest_rate = state.interest_rate + rng.centered() * INTEREST_RATE_STEP;
    let inflation = state.inflation + rng.centered() * INFLATION_STEP;

    MacroState {
        gdp: gdp.max(GDP_FLOOR),
        interest_rate: interest_rate.max(INTEREST_RATE_FLOOR),
        inflation: inflation.max(INFLATION_FLOOR),
    }
}

/// Weighted draw over `table` in declaration order. Weights are normalised
/// by their sum; any floating-point shortfall falls back to the first entry.
///
/// Panics if `table` is empty.
pub fn select_event<'a, R: RandomSource>(table: &'a [MarketEvent], rng: &mut R) -> &'a MarketEvent {
    let total_weight: f64 = table.iter().map(|event| event.probability).sum();
    let r = rng.next_f64() * total_weight;

    let mut upper = 0.0;
    for event in table {
        upper += event.probability;
        if r < upper {
            return event;
        }
    }
    &table[0]
}
