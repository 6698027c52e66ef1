//! Multi-leg wager aggregation.
//!
//! Legs are treated as independent except for a flat correlation haircut:
//! any grouping key (sport, event) appearing on more than one leg marks those
//! legs as non-independent, and each of their win probabilities is discounted
//! by a fixed multiplier before the joint probability is taken. This is an
//! approximation, not a joint model — see `DESIGN.md`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ParlayConfig;
use crate::engine::ev::{expected_value, fractional_kelly};
use crate::engine::market::decimal_to_american;
use crate::error::{EngineError, Result};
use crate::types::{Grade, PickRecommendation, RiskTier};

/// One constituent pick of a parlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParlayLeg {
    pub pick: PickRecommendation,
    /// Correlation grouping key, typically the sport or event identifier.
    /// Legs sharing a key are haircut as non-independent.
    pub group: String,
}

impl ParlayLeg {
    pub fn new(pick: PickRecommendation, group: impl Into<String>) -> Self {
        ParlayLeg {
            pick,
            group: group.into(),
        }
    }

    fn display_label(&self, index: usize) -> String {
        self.pick
            .label
            .clone()
            .unwrap_or_else(|| format!("leg {}", index + 1))
    }
}

/// A combined multi-leg wager. Built once from a finished leg list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParlaySlip {
    pub legs: Vec<ParlayLeg>,
    /// Product of the correlation-adjusted leg probabilities.
    pub combined_probability: f64,
    /// Product of the leg decimal odds.
    pub combined_decimal_odds: f64,
    pub combined_american_odds: i32,
    /// Expected value per unit stake on the whole parlay.
    pub expected_value: f64,
    /// Fractional-Kelly stake for the whole parlay.
    pub stake_fraction: f64,
    pub grade: Grade,
    /// Informational flags; never fatal.
    pub warnings: Vec<String>,
}

/// Combine legs into a single slip.
///
/// Returns `Ok(None)` for an empty leg list — no parlay is possible, which
/// is a valid outcome, not an error.
pub fn build_parlay(
    legs: &[ParlayLeg],
    config: &ParlayConfig,
    kelly_fraction: f64,
) -> Result<Option<ParlaySlip>> {
    if legs.is_empty() {
        return Ok(None);
    }
    for leg in legs {
        if leg.pick.decimal_odds <= 1.0 {
            return Err(EngineError::invalid(format!(
                "leg odds must exceed 1.0, got {}",
                leg.pick.decimal_odds
            )));
        }
        if !(0.0..=1.0).contains(&leg.pick.win_probability) {
            return Err(EngineError::invalid(format!(
                "leg win probability out of range: {}",
                leg.pick.win_probability
            )));
        }
    }

    let mut combined_probability = 1.0;
    let mut combined_decimal_odds = 1.0;
    for leg in legs {
        let shared = legs
            .iter()
            .filter(|other| other.group == leg.group)
            .count()
            > 1;
        let adjusted = if shared {
            leg.pick.win_probability * config.correlation_haircut
        } else {
            leg.pick.win_probability
        };
        combined_probability *= adjusted;
        combined_decimal_odds *= leg.pick.decimal_odds;
    }

    let ev = expected_value(combined_probability, combined_decimal_odds, 1.0);
    let stake_fraction = fractional_kelly(combined_probability, combined_decimal_odds, kelly_fraction);

    let high_legs: Vec<String> = legs
        .iter()
        .enumerate()
        .filter(|(_, leg)| leg.pick.risk == RiskTier::High)
        .map(|(i, leg)| leg.display_label(i))
        .collect();

    let grade = if high_legs.is_empty() && ev > 0.0 {
        Grade::A
    } else if high_legs.len() <= 1 && ev > 0.0 {
        Grade::B
    } else if high_legs.len() <= 2 {
        Grade::C
    } else {
        Grade::D
    };

    let mut warnings = Vec::new();
    if !high_legs.is_empty() {
        warnings.push(format!("high-risk legs: {}", high_legs.join(", ")));
    }
    if legs.len() > config.max_legs {
        warnings.push(format!(
            "{} legs exceeds the recommended maximum of {}",
            legs.len(),
            config.max_legs
        ));
    }
    if combined_probability < config.min_combined_probability {
        warnings.push(format!(
            "combined probability {:.1}% is below the {:.1}% floor",
            combined_probability * 100.0,
            config.min_combined_probability * 100.0
        ));
    }
    for warning in &warnings {
        warn!(%warning, "parlay warning");
    }
    debug!(
        legs = legs.len(),
        combined_probability,
        combined_decimal_odds,
        ev,
        "parlay built"
    );

    Ok(Some(ParlaySlip {
        legs: legs.to_vec(),
        combined_probability,
        combined_decimal_odds,
        combined_american_odds: decimal_to_american(combined_decimal_odds)?,
        expected_value: ev,
        stake_fraction,
        grade,
        warnings,
    }))
}

/// Build the best parlay from a candidate pool.
///
/// Candidates with positive expected value and a risk tier below HIGH are
/// ranked by a composite score that weights edge above raw win probability,
/// and the top legs are combined. When no candidate qualifies, the whole
/// pool is ranked by raw win probability instead. An empty pool yields
/// `Ok(None)`, never an error.
pub fn build_optimal_parlay(
    pool: &[ParlayLeg],
    config: &ParlayConfig,
    kelly_fraction: f64,
) -> Result<Option<ParlaySlip>> {
    if pool.is_empty() {
        return Ok(None);
    }

    let mut candidates: Vec<&ParlayLeg> = pool
        .iter()
        .filter(|leg| leg.pick.expected_value > 0.0 && leg.pick.risk != RiskTier::High)
        .collect();

    let selected: Vec<ParlayLeg> = if candidates.is_empty() {
        debug!("no positive-EV candidates, falling back to raw win probability");
        let mut fallback: Vec<&ParlayLeg> = pool.iter().collect();
        fallback.sort_by(|a, b| {
            b.pick
                .win_probability
                .total_cmp(&a.pick.win_probability)
        });
        fallback
            .into_iter()
            .take(config.optimal_size)
            .cloned()
            .collect()
    } else {
        let score = |leg: &ParlayLeg| {
            config.edge_weight * leg.pick.edge
                + config.probability_weight * leg.pick.win_probability
        };
        candidates.sort_by(|a, b| score(b).total_cmp(&score(a)));
        candidates
            .into_iter()
            .take(config.optimal_size)
            .cloned()
            .collect()
    };

    build_parlay(&selected, config, kelly_fraction)
}
