//! Factor-weighted score projection.
//!
//! Turns raw per-side factor maps into an expected score baseline for the
//! simulator. Factors the sport's weight table doesn't know are ignored, so
//! upstream feeds can attach whatever extras they like without breaking the
//! projection.

use tracing::debug;

use crate::config::{SportBook, SportProfile};
use crate::types::{MatchupInput, SideFactors};

/// Weight-table key for the shared head-to-head adjustment.
const HISTORICAL_KEY: &str = "historical";

/// Floor on a projection, as a fraction of the league-average score.
/// Forbids non-positive or implausibly small baselines.
const BASELINE_FLOOR: f64 = 0.5;

/// Weighted sum of one factor map against the sport's weight table.
fn weighted_sum(profile: &SportProfile, factors: &std::collections::HashMap<String, f64>) -> f64 {
    factors
        .iter()
        .filter_map(|(name, value)| profile.weights.get(name).map(|w| w * value))
        .sum()
}

/// Project one side's expected score.
///
/// `raw` aggregates metrics, situational factors and injury factors through
/// the sport's weight table, plus the weighted historical adjustment. The
/// baseline scales the league-average score by `1 + raw * dampening` and is
/// floored at half the league average.
pub fn project_side(
    side: &SideFactors,
    historical_adjustment: f64,
    profile: &SportProfile,
    dampening: f64,
) -> f64 {
    let raw = weighted_sum(profile, &side.metrics)
        + weighted_sum(profile, &side.situational)
        + weighted_sum(profile, &side.injuries)
        + profile.weights.get(HISTORICAL_KEY).unwrap_or(&0.0) * historical_adjustment;

    let baseline = profile.base_score * (1.0 + raw * dampening);
    baseline.max(profile.base_score * BASELINE_FLOOR)
}

/// Project both sides of a matchup. The historical adjustment favors side A
/// when positive, so side B receives it negated.
pub fn project_matchup(input: &MatchupInput, book: &SportBook) -> (f64, f64) {
    let profile = book.profile(&input.sport);
    let baseline_a = project_side(
        &input.side_a,
        input.historical_adjustment,
        profile,
        book.dampening,
    );
    let baseline_b = project_side(
        &input.side_b,
        -input.historical_adjustment,
        profile,
        book.dampening,
    );
    debug!(
        sport = %input.sport,
        baseline_a,
        baseline_b,
        "projected matchup baselines"
    );
    (baseline_a, baseline_b)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_relative_eq;

    use super::*;
    use crate::config::SportBook;
    use crate::types::{MatchupInput, SideFactors};

    fn side(metrics: &[(&str, f64)]) -> SideFactors {
        SideFactors {
            name: "Side".into(),
            metrics: metrics.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            situational: HashMap::new(),
            injuries: HashMap::new(),
            decimal_odds: 1.9,
        }
    }

    #[test]
    fn weighted_factors_move_the_baseline() {
        let book = SportBook::default();
        let profile = book.profile("nba");
        // offense weight 0.30, value 1.0 → raw 0.30, dampening 0.12
        let baseline = project_side(&side(&[("offense", 1.0)]), 0.0, profile, book.dampening);
        assert_relative_eq!(baseline, 112.0 * (1.0 + 0.30 * 0.12), epsilon = 1e-9);
    }

    #[test]
    fn unknown_factors_contribute_zero() {
        let book = SportBook::default();
        let profile = book.profile("nba");
        let plain = project_side(&side(&[]), 0.0, profile, book.dampening);
        let with_noise = project_side(
            &side(&[("espn_power_index", 3.0), ("vibes", -9.0)]),
            0.0,
            profile,
            book.dampening,
        );
        assert_relative_eq!(plain, with_noise, epsilon = 1e-12);
    }

    #[test]
    fn historical_adjustment_splits_between_sides() {
        let book = SportBook::default();
        let input = MatchupInput {
            sport: "nba".into(),
            side_a: side(&[]),
            side_b: side(&[]),
            historical_adjustment: 1.0,
        };
        let (a, b) = project_matchup(&input, &book);
        // historical weight 0.08: side A lifted, side B pushed down.
        assert!(a > b);
        assert_relative_eq!(a - 112.0, 112.0 - b, epsilon = 1e-9);
    }

    #[test]
    fn baseline_floors_at_half_scale() {
        let book = SportBook::default();
        let profile = book.profile("nba");
        // Heavy injury burden: injury_impact weight -0.10, value 80 → raw -8,
        // well past the point where the unfloored baseline goes negative.
        let mut crushed = side(&[]);
        crushed
            .injuries
            .insert("injury_impact".to_string(), 80.0);
        let baseline = project_side(&crushed, 0.0, profile, book.dampening);
        assert_relative_eq!(baseline, 112.0 * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn unknown_sport_uses_fallback_scale() {
        let book = SportBook::default();
        let input = MatchupInput {
            sport: "darts".into(),
            side_a: side(&[]),
            side_b: side(&[]),
            historical_adjustment: 0.0,
        };
        let (a, b) = project_matchup(&input, &book);
        assert_relative_eq!(a, book.fallback.base_score, epsilon = 1e-9);
        assert_relative_eq!(b, book.fallback.base_score, epsilon = 1e-9);
    }
}
