//! End-to-end matchup analysis and pick shortlisting.
//!
//! One-way flow: factors → baseline projection → Monte Carlo simulation →
//! EV/Kelly side selection → risk tier and grade. Everything is a pure
//! function of its inputs; callers own the RNG and the configuration.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, ShortlistConfig};
use crate::engine::ev::select_side;
use crate::engine::market::{implied_probability, remove_vig};
use crate::engine::projection::project_matchup;
use crate::engine::risk::classify_risk;
use crate::engine::simulation::{simulate, SimulationParams, SimulationResult};
use crate::error::{EngineError, Result};
use crate::types::{BetSide, MatchupInput, PickRecommendation};

/// The full output of one matchup analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupAnalysis {
    pub simulation: SimulationResult,
    pub pick: PickRecommendation,
}

/// Analyze one matchup end to end.
///
/// Fails fast on malformed configuration or odds; a matchup where neither
/// side shows value comes back as a no-edge pick, not an error.
pub fn analyze_matchup<R: Rng + ?Sized>(
    input: &MatchupInput,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<MatchupAnalysis> {
    config.validate()?;
    let odds_a = input.side_a.decimal_odds;
    let odds_b = input.side_b.decimal_odds;
    if odds_a <= 1.0 || odds_b <= 1.0 {
        return Err(EngineError::invalid(format!(
            "market odds must exceed 1.0 decimal, got {odds_a} / {odds_b}"
        )));
    }

    let (baseline_a, baseline_b) = project_matchup(input, &config.book);
    let profile = config.book.profile(&input.sport);
    let simulation = simulate(
        &SimulationParams {
            mean_a: baseline_a,
            mean_b: baseline_b,
            sigma: profile.std_dev,
            correlation: config.simulation.correlation,
            trials: config.simulation.trials,
        },
        rng,
    )?;

    // Vig-free market view, logged against the model for calibration checks.
    let (market_a, _) = remove_vig(implied_probability(odds_a)?, implied_probability(odds_b)?)?;
    debug!(
        model_a = simulation.side_a.win_probability,
        market_a, "model vs vig-free market probability"
    );

    let selection = select_side(
        simulation.side_a.win_probability,
        odds_a,
        odds_b,
        config.kelly_fraction,
    )?;
    let risk = classify_risk(
        simulation.spread,
        selection.win_probability,
        &config.risk,
        profile.spread_cutoff,
    );
    let label = selection.side.map(|side| match side {
        BetSide::SideA => input.side_a.name.clone(),
        BetSide::SideB => input.side_b.name.clone(),
    });

    let pick = PickRecommendation {
        side: selection.side,
        label,
        win_probability: selection.win_probability,
        decimal_odds: selection.decimal_odds,
        edge: selection.edge,
        expected_value: selection.expected_value,
        stake_fraction: selection.stake_fraction,
        risk,
        grade: config.grades.grade_for(selection.edge),
    };
    Ok(MatchupAnalysis { simulation, pick })
}

/// Filter, dedupe and rank finished picks.
///
/// Keeps picks that chose a side and clear the probability/edge floors,
/// sorts by edge descending, drops duplicate labels (best edge wins) and
/// truncates to the configured cap.
pub fn shortlist_picks(
    picks: Vec<PickRecommendation>,
    filter: &ShortlistConfig,
) -> Vec<PickRecommendation> {
    let mut kept: Vec<PickRecommendation> = picks
        .into_iter()
        .filter(|p| {
            p.side.is_some()
                && p.win_probability >= filter.min_probability
                && p.edge >= filter.min_edge
        })
        .collect();
    kept.sort_by(|a, b| b.edge.total_cmp(&a.edge));

    let mut seen = std::collections::HashSet::new();
    kept.retain(|p| match &p.label {
        Some(label) => seen.insert(label.clone()),
        None => false,
    });
    kept.truncate(filter.limit);
    kept
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::types::{Grade, RiskTier, SideFactors};

    fn side(name: &str, offense: f64, odds: f64) -> SideFactors {
        SideFactors {
            name: name.to_string(),
            metrics: HashMap::from([("offense".to_string(), offense)]),
            situational: HashMap::new(),
            injuries: HashMap::new(),
            decimal_odds: odds,
        }
    }

    fn nba_input() -> MatchupInput {
        // Baselines land ≈ 3.5 points apart: offense weight 0.30, dampening
        // 0.12 → raw gap 0.26 scales to 112·0.0312.
        MatchupInput {
            sport: "NBA".to_string(),
            side_a: side("Lakers", 0.43, 1.7692), // −130
            side_b: side("Nuggets", -0.43, 2.10), // +110
            historical_adjustment: 0.0,
        }
    }

    #[test]
    fn end_to_end_is_deterministic_under_a_fixed_seed() {
        let mut config = EngineConfig::default();
        config.simulation.trials = 20_000;
        let first =
            analyze_matchup(&nba_input(), &config, &mut StdRng::seed_from_u64(2024)).unwrap();
        let second =
            analyze_matchup(&nba_input(), &config, &mut StdRng::seed_from_u64(2024)).unwrap();
        assert_eq!(
            first.simulation.side_a.win_probability,
            second.simulation.side_a.win_probability
        );
        assert_eq!(first.pick.stake_fraction, second.pick.stake_fraction);
    }

    #[test]
    fn end_to_end_backs_the_positive_ev_favorite() {
        // Spread ≈ 3.5 at σ 11, corr 0.2 → P(A) ≈ Φ(3.5/13.91) ≈ 0.60,
        // above the 0.565 the −130 price implies; +110 on the dog is −EV.
        let mut config = EngineConfig::default();
        config.simulation.trials = 20_000;
        let analysis =
            analyze_matchup(&nba_input(), &config, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_abs_diff_eq!(
            analysis.simulation.side_a.win_probability,
            0.60,
            epsilon = 0.02
        );
        assert_eq!(analysis.pick.side, Some(BetSide::SideA));
        assert_eq!(analysis.pick.label.as_deref(), Some("Lakers"));
        assert!(analysis.pick.expected_value > 0.0);
        assert!(analysis.pick.stake_fraction > 0.0);
        assert!(analysis.simulation.spread > 2.0 && analysis.simulation.spread < 5.0);
    }

    #[test]
    fn uninformative_matchup_flows_through_as_no_edge() {
        // Both sides collapse to the projection floor: identical baselines,
        // near-coin-flip probability, both sides priced below fair at 1.87.
        let mut input = nba_input();
        input.side_a = side("Flat A", 0.0, 1.87);
        input.side_b = side("Flat B", 0.0, 1.87);
        input
            .side_a
            .injuries
            .insert("injury_impact".to_string(), 90.0);
        input
            .side_b
            .injuries
            .insert("injury_impact".to_string(), 90.0);
        let config = EngineConfig::default();
        let analysis = analyze_matchup(&input, &config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(analysis.pick.side, None);
        assert_eq!(analysis.pick.label, None);
        assert_eq!(analysis.pick.stake_fraction, 0.0);
        assert_eq!(analysis.pick.grade, Grade::D);
        assert_eq!(analysis.pick.risk, RiskTier::High);
    }

    #[test]
    fn unknown_sport_still_analyzes() {
        let mut input = nba_input();
        input.sport = "cricket".to_string();
        let config = EngineConfig::default();
        assert!(analyze_matchup(&input, &config, &mut StdRng::seed_from_u64(1)).is_ok());
    }

    #[test]
    fn sub_even_market_odds_are_rejected() {
        let mut input = nba_input();
        input.side_a.decimal_odds = 1.0;
        let config = EngineConfig::default();
        assert!(analyze_matchup(&input, &config, &mut StdRng::seed_from_u64(1)).is_err());
    }

    fn pick(label: &str, prob: f64, edge: f64) -> PickRecommendation {
        PickRecommendation {
            side: Some(BetSide::SideA),
            label: Some(label.to_string()),
            win_probability: prob,
            decimal_odds: 1.9,
            edge,
            expected_value: edge * 1.9,
            stake_fraction: 0.02,
            risk: RiskTier::Low,
            grade: Grade::B,
        }
    }

    #[test]
    fn shortlist_filters_sorts_and_caps() {
        let filter = ShortlistConfig {
            min_probability: 0.60,
            min_edge: 0.05,
            limit: 2,
        };
        let picks = vec![
            pick("thin-edge", 0.70, 0.02),     // dropped: edge floor
            pick("coin-flip", 0.55, 0.10),     // dropped: probability floor
            pick("solid", 0.65, 0.08),
            pick("best", 0.68, 0.12),
            pick("third", 0.66, 0.07),         // dropped: cap
        ];
        let shortlist = shortlist_picks(picks, &filter);
        let labels: Vec<_> = shortlist
            .iter()
            .map(|p| p.label.clone().unwrap())
            .collect();
        assert_eq!(labels, vec!["best", "solid"]);
    }

    #[test]
    fn shortlist_keeps_the_best_duplicate() {
        let filter = ShortlistConfig::default();
        let picks = vec![
            pick("same-game", 0.66, 0.06),
            pick("same-game", 0.70, 0.11),
        ];
        let shortlist = shortlist_picks(picks, &filter);
        assert_eq!(shortlist.len(), 1);
        assert_abs_diff_eq!(shortlist[0].edge, 0.11, epsilon = 1e-12);
    }

    #[test]
    fn shortlist_drops_no_edge_picks() {
        let filter = ShortlistConfig::default();
        let mut no_edge = pick("nothing", 0.70, 0.10);
        no_edge.side = None;
        no_edge.label = None;
        assert!(shortlist_picks(vec![no_edge], &filter).is_empty());
    }
}
