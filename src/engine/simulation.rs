//! Correlated score sampling and Monte Carlo aggregation.
//!
//! Scores for the two sides are drawn as a correlated normal pair: two
//! independent standard normals `z1, z2` are mixed into
//! `corr*z1 + sqrt(1-corr²)*z2`, which leaves both marginals standard normal
//! while hitting the target pairwise correlation. Positive correlation models
//! shared game environment — pace, weather, officiating — that lifts or sinks
//! both scores together.
//!
//! Randomness always comes from the caller's `Rng`, so a fixed seed
//! reproduces a simulation bit-for-bit and concurrent simulations never
//! contend on a shared generator.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};

/// Inputs for one matchup simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimulationParams {
    pub mean_a: f64,
    pub mean_b: f64,
    /// Standard deviation of each side's score. Must be positive.
    pub sigma: f64,
    /// Target pairwise correlation between the sides, in [-1, 1].
    pub correlation: f64,
    /// Number of paired samples to draw. Must be positive.
    pub trials: u32,
}

impl SimulationParams {
    fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(EngineError::invalid("trials must be positive"));
        }
        if self.sigma <= 0.0 {
            return Err(EngineError::invalid(format!(
                "sigma must be positive, got {}",
                self.sigma
            )));
        }
        if !(-1.0..=1.0).contains(&self.correlation) {
            return Err(EngineError::invalid(format!(
                "correlation must be in [-1, 1], got {}",
                self.correlation
            )));
        }
        Ok(())
    }
}

/// Distribution summary for one side's simulated score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub mean: f64,
    /// Nearest-rank median of the sorted sample.
    pub median: f64,
    pub win_probability: f64,
    /// 5th percentile of the sorted sample (nearest rank).
    pub percentile_05: f64,
    /// 95th percentile of the sorted sample (nearest rank).
    pub percentile_95: f64,
}

/// Aggregate result of one matchup simulation. Produced once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub side_a: ScoreDistribution,
    pub side_b: ScoreDistribution,
    /// Mean of (score_a − score_b) across trials.
    pub spread: f64,
    /// Standard deviation of the same differenced sample.
    pub spread_std_dev: f64,
    /// Trial count actually used.
    pub trials: u32,
}

/// Run a full matchup simulation.
///
/// Win probabilities count strictly-greater trials; exact ties are split
/// 50/50 between the two counters, and side B's probability is computed as
/// the complement, so the pair sums to exactly 1.0.
pub fn simulate<R: Rng + ?Sized>(params: &SimulationParams, rng: &mut R) -> Result<SimulationResult> {
    params.validate()?;

    let n = params.trials as usize;
    let mix = (1.0 - params.correlation * params.correlation).sqrt();

    let mut scores_a = Vec::with_capacity(n);
    let mut scores_b = Vec::with_capacity(n);
    let mut diffs = Vec::with_capacity(n);
    let mut wins_a = 0.0f64;

    for _ in 0..n {
        let z1: f64 = rng.sample(StandardNormal);
        let z2: f64 = rng.sample(StandardNormal);
        let score_a = params.mean_a + params.sigma * z1;
        let score_b = params.mean_b + params.sigma * (params.correlation * z1 + mix * z2);

        if score_a > score_b {
            wins_a += 1.0;
        } else if score_a == score_b {
            wins_a += 0.5;
        }
        diffs.push(score_a - score_b);
        scores_a.push(score_a);
        scores_b.push(score_b);
    }

    let win_probability_a = wins_a / n as f64;
    let spread = mean(&diffs);
    let spread_std_dev = std_dev(&diffs, spread);

    scores_a.sort_unstable_by(f64::total_cmp);
    scores_b.sort_unstable_by(f64::total_cmp);

    let result = SimulationResult {
        side_a: distribution(&scores_a, win_probability_a),
        side_b: distribution(&scores_b, 1.0 - win_probability_a),
        spread,
        spread_std_dev,
        trials: params.trials,
    };
    debug!(
        win_probability_a = result.side_a.win_probability,
        spread = result.spread,
        trials = result.trials,
        "simulation finished"
    );
    Ok(result)
}

/// Estimate P(sample > line) for a single near-normal score.
///
/// Used by the prop-line path, where one side of the market is a fixed
/// threshold rather than a second sampled score. Exact ties on the line
/// count half, matching the matchup tie rule.
pub fn simulate_over_probability<R: Rng + ?Sized>(
    mean: f64,
    sigma: f64,
    line: f64,
    trials: u32,
    rng: &mut R,
) -> Result<f64> {
    if trials == 0 {
        return Err(EngineError::invalid("trials must be positive"));
    }
    if sigma <= 0.0 {
        return Err(EngineError::invalid(format!(
            "sigma must be positive, got {sigma}"
        )));
    }

    let mut overs = 0.0f64;
    for _ in 0..trials {
        let z: f64 = rng.sample(StandardNormal);
        let sample = mean + sigma * z;
        if sample > line {
            overs += 1.0;
        } else if sample == line {
            overs += 0.5;
        }
    }
    Ok(overs / trials as f64)
}

/// Summarize one side from its sorted sample.
fn distribution(sorted: &[f64], win_probability: f64) -> ScoreDistribution {
    ScoreDistribution {
        mean: mean(sorted),
        median: nearest_rank(sorted, 0.50),
        win_probability,
        percentile_05: nearest_rank(sorted, 0.05),
        percentile_95: nearest_rank(sorted, 0.95),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Nearest-rank percentile on an ascending sample: rank = ceil(p·n).
fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let rank = ((p * n as f64).ceil() as usize).clamp(1, n);
    sorted[rank - 1]
}
