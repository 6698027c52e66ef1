use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Raw per-side inputs for a matchup, assembled by the data-fetching layer.
///
/// Factor maps are free-form: any key absent from the sport's weight table
/// simply contributes nothing to the projection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SideFactors {
    /// Team or side identifier, e.g. "Lakers" or "Over".
    pub name: String,
    /// Performance metrics (named factor → value), e.g. "offense" → 0.8.
    #[serde(default)]
    pub metrics: HashMap<String, f64>,
    /// Situational factors: home advantage, rest, travel.
    #[serde(default)]
    pub situational: HashMap<String, f64>,
    /// Injury impact factors, positive = more impaired.
    #[serde(default)]
    pub injuries: HashMap<String, f64>,
    /// Decimal market odds for this side winning. Always > 1.0.
    pub decimal_odds: f64,
}

/// One two-sided market to analyze. Built fresh per request, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupInput {
    /// Sport/category tag, e.g. "NBA". Unknown tags fall back to the
    /// default sport profile.
    pub sport: String,
    pub side_a: SideFactors,
    pub side_b: SideFactors,
    /// Shared head-to-head historical adjustment, positive favoring side A.
    #[serde(default)]
    pub historical_adjustment: f64,
}

/// An over/under prop line to analyze. Built fresh per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropInput {
    /// Stat label, e.g. "Points", "Strikeouts". Drives the bias heuristic.
    pub label: String,
    /// Posted line. Must be positive.
    pub line: f64,
    /// Decimal odds paid on the over.
    pub over_odds: f64,
    /// Decimal odds paid on the under.
    pub under_odds: f64,
    /// Sport/category tag, used as the parlay grouping key.
    pub sport: String,
}

/// Which side of a two-sided market a recommendation backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetSide {
    SideA,
    SideB,
}

/// Risk tier for a single recommendation.
///
/// Ordering is by riskiness: `Low < Med < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Med,
    High,
}

/// Letter grade assigned from edge magnitude.
///
/// Ordering is by quality: `D < C < B < A < APlus`, so a larger edge never
/// compares below a smaller one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    D,
    C,
    B,
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

/// A finished betting recommendation for one two-sided market.
///
/// When `side` is `None` neither outcome showed positive expected value; the
/// probability/odds/edge fields then describe the candidate closest to
/// break-even and `stake_fraction` is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickRecommendation {
    /// Chosen side, or `None` for "no edge".
    pub side: Option<BetSide>,
    /// Identifier of the chosen side (team name, "Over"/"Under" for props).
    pub label: Option<String>,
    /// Estimated win probability of the side described by this pick.
    pub win_probability: f64,
    /// Decimal odds used for that side.
    pub decimal_odds: f64,
    /// Estimated probability minus implied probability.
    pub edge: f64,
    /// Expected value per unit stake at the odds above.
    pub expected_value: f64,
    /// Fractional-Kelly stake as a fraction of bankroll. Never negative.
    pub stake_fraction: f64,
    pub risk: RiskTier,
    pub grade: Grade,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_ordering_matches_quality() {
        assert!(Grade::APlus > Grade::A);
        assert!(Grade::A > Grade::B);
        assert!(Grade::B > Grade::C);
        assert!(Grade::C > Grade::D);
    }

    #[test]
    fn risk_ordering_matches_riskiness() {
        assert!(RiskTier::High > RiskTier::Med);
        assert!(RiskTier::Med > RiskTier::Low);
    }

    #[test]
    fn grade_serializes_with_plus_suffix() {
        let s = serde_json::to_string(&Grade::APlus).unwrap();
        assert_eq!(s, "\"A+\"");
        let back: Grade = serde_json::from_str(&s).unwrap();
        assert_eq!(back, Grade::APlus);
    }
}
