//! Over/under prop-line evaluation.
//!
//! Prop projections start from the posted line and shift it by a stat-keyword
//! heuristic. Those keyword formulas are interchangeable folklore — every feed
//! has its own — so they live behind the [`LineBias`] trait and the rest of
//! the pipeline (simulation, EV, risk, grading) never sees them.

use rand::Rng;
use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::ev::select_side;
use crate::engine::risk::classify_risk;
use crate::engine::simulation::simulate_over_probability;
use crate::error::Result;
use crate::types::{BetSide, PickRecommendation, PropInput};

/// A projection heuristic for prop lines.
pub trait LineBias {
    /// Relative shift applied to the line to form the projection.
    /// Positive means the stat tends to clear its posted line.
    fn adjustment(&self, line: f64, label: &str) -> f64;

    /// Relative standard deviation of the outcome around the projection.
    fn volatility(&self, line: f64, label: &str) -> f64;
}

/// Default bias: a flat optimistic base shifted per stat keyword, with
/// volatility scaled by line size and stat type.
#[derive(Debug, Clone, Copy)]
pub struct KeywordBias {
    pub base_adjustment: f64,
    pub base_volatility: f64,
}

impl Default for KeywordBias {
    fn default() -> Self {
        KeywordBias {
            base_adjustment: 0.055,
            base_volatility: 0.18,
        }
    }
}

impl LineBias for KeywordBias {
    fn adjustment(&self, _line: f64, label: &str) -> f64 {
        let label = label.to_lowercase();
        let shift = if label.contains("assist") {
            0.012
        } else if label.contains("point") {
            0.010
        } else if label.contains("rebound") {
            -0.004
        } else if label.contains("goal") {
            0.009
        } else if label.contains("shot") {
            0.007
        } else if label.contains("strikeout") {
            0.011
        } else if label.contains("hit") {
            0.006
        } else if label.contains("yard") {
            0.008
        } else if label.contains("touchdown") {
            0.013
        } else {
            0.0
        };
        self.base_adjustment + shift
    }

    fn volatility(&self, line: f64, label: &str) -> f64 {
        let label = label.to_lowercase();
        let mut vol = self.base_volatility;
        // Small lines resolve tighter, big counting lines looser.
        if line <= 1.5 {
            vol *= 0.85;
        } else if line >= 25.0 {
            vol *= 1.15;
        }
        if label.contains("strikeout") {
            vol *= 1.10;
        }
        if label.contains("rebound") {
            vol *= 0.95;
        }
        vol
    }
}

/// Evaluate an over/under prop line into a pick.
///
/// The projection is the posted line shifted by the bias adjustment; the
/// over-probability comes from the Monte Carlo threshold sampler; side
/// selection, risk and grade follow the same path as a matchup pick. A
/// non-positive line surfaces as `InvalidConfiguration` through the sigma
/// validation.
pub fn evaluate_prop<R: Rng + ?Sized>(
    input: &PropInput,
    bias: &dyn LineBias,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<PickRecommendation> {
    let projection = input.line * (1.0 + bias.adjustment(input.line, &input.label));
    let sigma = input.line * bias.volatility(input.line, &input.label);
    let over_probability = simulate_over_probability(
        projection,
        sigma,
        input.line,
        config.simulation.trials,
        rng,
    )?;
    debug!(
        label = %input.label,
        line = input.line,
        projection,
        over_probability,
        "prop line projected"
    );

    let selection = select_side(
        over_probability,
        input.over_odds,
        input.under_odds,
        config.kelly_fraction,
    )?;
    let profile = config.book.profile(&input.sport);
    let risk = classify_risk(
        projection - input.line,
        selection.win_probability,
        &config.risk,
        profile.spread_cutoff,
    );

    Ok(PickRecommendation {
        side: selection.side,
        label: selection.side.map(|side| {
            match side {
                BetSide::SideA => "Over",
                BetSide::SideB => "Under",
            }
            .to_string()
        }),
        win_probability: selection.win_probability,
        decimal_odds: selection.decimal_odds,
        edge: selection.edge,
        expected_value: selection.expected_value,
        stake_fraction: selection.stake_fraction,
        risk,
        grade: config.grades.grade_for(selection.edge),
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn prop(label: &str, line: f64) -> PropInput {
        PropInput {
            label: label.to_string(),
            line,
            over_odds: 1.9,
            under_odds: 1.9,
            sport: "NBA".to_string(),
        }
    }

    #[test]
    fn keyword_adjustments_match_the_table() {
        let bias = KeywordBias::default();
        assert_relative_eq!(bias.adjustment(20.0, "Assists"), 0.067, epsilon = 1e-9);
        assert_relative_eq!(bias.adjustment(20.0, "Points"), 0.065, epsilon = 1e-9);
        assert_relative_eq!(bias.adjustment(20.0, "Rebounds"), 0.051, epsilon = 1e-9);
        assert_relative_eq!(bias.adjustment(20.0, "Touchdowns"), 0.068, epsilon = 1e-9);
        assert_relative_eq!(bias.adjustment(20.0, "Fantasy Score"), 0.055, epsilon = 1e-9);
    }

    #[test]
    fn volatility_scales_with_line_and_stat() {
        let bias = KeywordBias::default();
        assert_relative_eq!(bias.volatility(1.0, "Goals"), 0.18 * 0.85, epsilon = 1e-9);
        assert_relative_eq!(bias.volatility(30.0, "Points"), 0.18 * 1.15, epsilon = 1e-9);
        assert_relative_eq!(
            bias.volatility(6.0, "Strikeouts"),
            0.18 * 1.10,
            epsilon = 1e-9
        );
        // Line-size and stat multipliers compose.
        assert_relative_eq!(
            bias.volatility(30.0, "Rebounds"),
            0.18 * 1.15 * 0.95,
            epsilon = 1e-9
        );
    }

    #[test]
    fn optimistic_bias_backs_the_over() {
        // Points: adjustment 0.065, volatility 0.207 (line ≥ 25) →
        // z ≈ 0.314 → P(over) ≈ 0.62, comfortably +EV at 1.9.
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(17);
        let pick = evaluate_prop(&prop("Points", 25.5), &KeywordBias::default(), &config, &mut rng)
            .unwrap();
        assert_eq!(pick.side, Some(BetSide::SideA));
        assert_eq!(pick.label.as_deref(), Some("Over"));
        assert!(pick.win_probability > 0.55);
        assert!(pick.stake_fraction > 0.0);
    }

    #[test]
    fn pessimistic_bias_backs_the_under() {
        struct FadeBias;
        impl LineBias for FadeBias {
            fn adjustment(&self, _line: f64, _label: &str) -> f64 {
                -0.08
            }
            fn volatility(&self, _line: f64, _label: &str) -> f64 {
                0.20
            }
        }
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(17);
        let pick = evaluate_prop(&prop("Points", 25.5), &FadeBias, &config, &mut rng).unwrap();
        assert_eq!(pick.side, Some(BetSide::SideB));
        assert_eq!(pick.label.as_deref(), Some("Under"));
    }

    #[test]
    fn fixed_seed_reproduces_the_prop_pick() {
        let config = EngineConfig::default();
        let input = prop("Strikeouts", 6.5);
        let first = evaluate_prop(
            &input,
            &KeywordBias::default(),
            &config,
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();
        let second = evaluate_prop(
            &input,
            &KeywordBias::default(),
            &config,
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();
        assert_eq!(first.win_probability, second.win_probability);
        assert_eq!(first.side, second.side);
    }

    #[test]
    fn non_positive_line_is_rejected() {
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let result = evaluate_prop(&prop("Points", 0.0), &KeywordBias::default(), &config, &mut rng);
        assert!(result.is_err());
        let result = evaluate_prop(&prop("Points", -3.5), &KeywordBias::default(), &config, &mut rng);
        assert!(result.is_err());
    }
}
