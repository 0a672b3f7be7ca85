use super::types::{
    Achievement, AchievementCondition, Asset, AssetClass, Competitor, Correlations, EventKind,
    EventScope, MarketEvent, RiskTier, SideEffect,
};

pub const STARTING_AUM: f64 = 1_000_000.0;
pub const STARTING_TRUST: f64 = 100.0;
pub const DEFAULT_BURN_RATE: f64 = 50_000.0;
pub const DEFAULT_FIRM_NAME: &str = "Phrontera Capital";

pub static ASSETS: [Asset; 7] = [
    Asset {
        id: "blue_chip",
        name: "Blue-Chip Equities",
        description: "Stable, large-cap companies.",
        cost: 50_000.0,
        risk: RiskTier::Low,
        return_range: (0.01, 0.05),
        class: AssetClass::Equities,
        beta: 0.8,
        correlations: Correlations {
            gdp: 0.8,
            interest_rate: -0.3,
            inflation: -0.1,
        },
    },
    Asset {
        id: "small_cap",
        name: "Small-Cap Equities",
        description: "High-growth companies.",
        cost: 20_000.0,
        risk: RiskTier::High,
        return_range: (0.05, 0.20),
        class: AssetClass::Equities,
        beta: 1.5,
        correlations: Correlations {
            gdp: 1.2,
            interest_rate: -0.5,
            inflation: 0.1,
        },
    },
    Asset {
        id: "bonds",
        name: "Government Bonds",
        description: "Safe investment with fixed returns.",
        cost: 10_000.0,
        risk: RiskTier::VeryLow,
        return_range: (0.005, 0.015),
        class: AssetClass::FixedIncome,
        beta: 0.1,
        correlations: Correlations {
            gdp: -0.2,
            interest_rate: 0.9,
            inflation: -0.8,
        },
    },
    Asset {
        id: "crypto",
        name: "Cryptocurrency",
        description: "Extremely volatile digital assets.",
        cost: 5_000.0,
        risk: RiskTier::VeryHigh,
        return_range: (-0.4, 0.5),
        class: AssetClass::Alternatives,
        beta: 2.5,
        correlations: Correlations {
            gdp: 0.3,
            interest_rate: -0.2,
            inflation: 0.2,
        },
    },
    Asset {
        id: "commodities_gold",
        name: "Gold",
        description: "Safe-haven commodity, shines in inflation and crises.",
        cost: 20_000.0,
        risk: RiskTier::Medium,
        return_range: (-0.05, 0.10),
        class: AssetClass::Commodities,
        beta: 0.5,
        correlations: Correlations {
            gdp: -0.3,
            interest_rate: -0.1,
            inflation: 0.7,
        },
    },
    Asset {
        id: "real_estate",
        name: "Real Estate Funds",
        description: "Funds invested in commercial and residential properties.",
        cost: 30_000.0,
        risk: RiskTier::Medium,
        return_range: (0.02, 0.08),
        class: AssetClass::RealEstate,
        beta: 0.6,
        correlations: Correlations {
            gdp: 0.6,
            interest_rate: -0.5,
            inflation: 0.5,
        },
    },
    Asset {
        id: "private_equity",
        name: "Private Equity",
        description: "Investments in private companies.",
        cost: 75_000.0,
        risk: RiskTier::High,
        return_range: (0.08, 0.30),
        class: AssetClass::Alternatives,
        beta: 1.8,
        correlations: Correlations {
            gdp: 1.5,
            interest_rate: -0.8,
            inflation: 0.2,
        },
    },
];

pub static MARKET_EVENTS: [MarketEvent; 6] = [
    MarketEvent {
        kind: EventKind::Bull,
        text: "A strong bull market is underway! Market sentiment is positive.",
        multiplier: 1.5,
        trust_change: 1.0,
        probability: 0.3,
        scope: EventScope::Market,
        side_effect: None,
    },
    MarketEvent {
        kind: EventKind::Bear,
        text: "A recession is beginning. The market is in a downturn.",
        multiplier: 0.5,
        trust_change: -2.0,
        probability: 0.3,
        scope: EventScope::Market,
        side_effect: None,
    },
    MarketEvent {
        kind: EventKind::Neutral,
        text: "The market is moving sideways. No major news to report.",
        multiplier: 1.0,
        trust_change: 0.0,
        probability: 0.4,
        scope: EventScope::Market,
        side_effect: None,
    },
    MarketEvent {
        kind: EventKind::Political,
        text: "New Tax Law reduces equity returns for 2 quarters.",
        multiplier: 0.8,
        trust_change: 0.0,
        probability: 0.1,
        scope: EventScope::AssetClass(AssetClass::Equities),
        side_effect: None,
    },
    MarketEvent {
        kind: EventKind::Political,
        text: "Stimulus Package boosts client inflows.",
        multiplier: 1.2,
        trust_change: 5.0,
        probability: 0.1,
        scope: EventScope::Market,
        side_effect: Some(SideEffect::ClientBoost),
    },
    MarketEvent {
        kind: EventKind::Regulatory,
        text: "Sanctions hit commodities. Expected returns -20%.",
        multiplier: 0.8,
        trust_change: -1.0,
        probability: 0.1,
        scope: EventScope::AssetClass(AssetClass::Commodities),
        side_effect: None,
    },
];

pub static ACHIEVEMENTS: [Achievement; 5] = [
    Achievement {
        id: "first_million",
        name: "First Millionaire",
        description: "Achieve an AUM of $1M.",
        condition: AchievementCondition::Aum(1_000_000.0),
    },
    Achievement {
        id: "first_billion",
        name: "The Billionaire",
        description: "Achieve an AUM of $1B.",
        condition: AchievementCondition::Aum(1_000_000_000.0),
    },
    Achievement {
        id: "survived_bear",
        name: "Survived The Bear",
        description: "Survive a bear market with a positive AUM.",
        condition: AchievementCondition::Event(EventKind::Bear),
    },
    Achievement {
        id: "perfect_trust",
        name: "Client Favorite",
        description: "Reach 100% client trust.",
        condition: AchievementCondition::Trust(100.0),
    },
    Achievement {
        id: "long_run",
        name: "Marathon Runner",
        description: "Survive for 20 quarters.",
        condition: AchievementCondition::Quarter(20),
    },
];

pub static CEO_QUOTES: [&str; 5] = [
    "The market is a fickle beast, but our strategy is a fortress.",
    "A moment of chaos is an opportunity for those who are prepared.",
    "Our fiduciary duty is not to be profitable, but to be wise.",
    "The path to success is paved with data, not emotion.",
    "Another quarter, another step toward greatness.",
];

pub fn find_asset(id: &str) -> Option<&'static Asset> {
    ASSETS.iter().find(|asset| asset.id == id)
}

pub fn find_event(kind: EventKind) -> Option<&'static MarketEvent> {
    MARKET_EVENTS.iter().find(|event| event.kind == kind)
}

pub fn default_competitors() -> Vec<Competitor> {
    [
        ("Apex Global", 900_000.0, 1.1, 0.1),
        ("Titan Investments", 1_100_000.0, 0.9, 0.05),
        ("Veridian Capital", 800_000.0, 1.5, 0.2),
    ]
    .into_iter()
    .map(|(name, aum, aggressiveness, volatility)| Competitor {
        name: name.to_string(),
        aum,
        aggressiveness,
        volatility,
        pnl: 0.0,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn asset_ids_are_unique_and_ranges_ordered() {
        let mut seen = HashSet::new();
        for asset in &ASSETS {
            assert!(seen.insert(asset.id), "duplicate asset id {}", asset.id);
            assert!(asset.return_range.0 <= asset.return_range.1, "{}", asset.id);
            assert!(asset.cost > 0.0);
        }
    }

    #[test]
    fn event_table_has_positive_weights() {
        assert!(!MARKET_EVENTS.is_empty());
        assert!(MARKET_EVENTS.iter().all(|event| event.probability > 0.0));
        let boosts = MARKET_EVENTS.iter().filter(|e| e.boosts_clients()).count();
        assert_eq!(boosts, 1);
    }

    #[test]
    fn find_helpers_resolve_known_entries() {
        assert_eq!(find_asset("bonds").map(|a| a.cost), Some(10_000.0));
        assert!(find_asset("tulips").is_none());
        assert_eq!(
            find_event(EventKind::Neutral).map(|e| e.multiplier),
            Some(1.0)
        );
    }

    #[test]
    fn default_roster_is_ordered_and_flat() {
        let roster = default_competitors();
        let names: Vec<_> = roster.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Apex Global", "Titan Investments", "Veridian Capital"]);
        assert!(roster.iter().all(|c| c.pnl == 0.0));
    }
}
