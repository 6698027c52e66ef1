//! Engine configuration.
//!
//! Every tunable the engine consults lives here as an explicit, immutable
//! value passed by the caller — no hidden globals, no environment lookups.
//! All structs deserialize from JSON with per-field defaults, so callers can
//! override a single knob without restating the rest.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::Grade;

/// Monte Carlo simulation knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Trials per matchup. 10k–20k is the practical range; more buys
    /// precision linearly in cost.
    pub trials: u32,
    /// Pairwise correlation between the two sides' sampled scores.
    /// Positive values model shared game environment (pace, weather).
    pub correlation: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            trials: 10_000,
            correlation: 0.20,
        }
    }
}

/// Win-probability cutoffs for the risk classifier. Spread cutoffs are
/// per-sport and live on [`SportProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Below this win probability a pick is HIGH risk.
    pub high_below: f64,
    /// Below this win probability (and at or above `high_below`) a pick is
    /// MED risk.
    pub med_below: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            high_below: 0.52,
            med_below: 0.58,
        }
    }
}

/// One row of the edge → letter-grade table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GradeStep {
    /// Minimum edge (inclusive) for this grade.
    pub min_edge: f64,
    pub grade: Grade,
}

/// Top-down edge → grade threshold table.
///
/// Steps are consulted in order; the first step whose `min_edge` the edge
/// meets wins, and `fallback` applies below the last step. `validate`
/// enforces descending thresholds and grades so a bigger edge can never
/// grade below a smaller one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeTable {
    pub steps: Vec<GradeStep>,
    pub fallback: Grade,
}

impl Default for GradeTable {
    fn default() -> Self {
        GradeTable {
            steps: vec![
                GradeStep {
                    min_edge: 0.14,
                    grade: Grade::APlus,
                },
                GradeStep {
                    min_edge: 0.11,
                    grade: Grade::A,
                },
                GradeStep {
                    min_edge: 0.08,
                    grade: Grade::B,
                },
                GradeStep {
                    min_edge: 0.05,
                    grade: Grade::C,
                },
            ],
            fallback: Grade::D,
        }
    }
}

impl GradeTable {
    /// Map an edge to its letter grade.
    pub fn grade_for(&self, edge: f64) -> Grade {
        for step in &self.steps {
            if edge >= step.min_edge {
                return step.grade;
            }
        }
        self.fallback
    }

    fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(EngineError::invalid(
                "grade table must have at least one step",
            ));
        }
        for pair in self.steps.windows(2) {
            if pair[1].min_edge >= pair[0].min_edge {
                return Err(EngineError::invalid(
                    "grade table thresholds must be strictly descending",
                ));
            }
            if pair[1].grade >= pair[0].grade {
                return Err(EngineError::invalid(
                    "grade table grades must be strictly descending",
                ));
            }
        }
        if let Some(last) = self.steps.last() {
            if self.fallback >= last.grade {
                return Err(EngineError::invalid(
                    "grade table fallback must rank below the last step",
                ));
            }
        }
        Ok(())
    }
}

/// Parlay aggregation knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParlayConfig {
    /// Probability multiplier applied to every leg whose grouping key is
    /// shared with another leg. Flat approximation of same-event dependence.
    pub correlation_haircut: f64,
    /// Leg count above which a warning is attached.
    pub max_legs: usize,
    /// Combined probability below which a warning is attached.
    pub min_combined_probability: f64,
    /// Composite ranking weight on edge when building an optimal parlay.
    pub edge_weight: f64,
    /// Composite ranking weight on raw win probability.
    pub probability_weight: f64,
    /// Number of legs the optimal-parlay builder keeps.
    pub optimal_size: usize,
}

impl Default for ParlayConfig {
    fn default() -> Self {
        ParlayConfig {
            correlation_haircut: 0.97,
            max_legs: 6,
            min_combined_probability: 0.05,
            edge_weight: 0.7,
            probability_weight: 0.3,
            optimal_size: 4,
        }
    }
}

/// Filters for shortlisting finished picks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortlistConfig {
    /// Minimum win probability a pick must carry.
    pub min_probability: f64,
    /// Minimum edge a pick must carry.
    pub min_edge: f64,
    /// Maximum number of picks returned.
    pub limit: usize,
}

impl Default for ShortlistConfig {
    fn default() -> Self {
        ShortlistConfig {
            min_probability: 0.60,
            min_edge: 0.05,
            limit: 25,
        }
    }
}

/// Scoring model for one sport: factor weights, scale and dispersion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportProfile {
    /// Factor name → weight. Factors absent here contribute zero.
    pub weights: HashMap<String, f64>,
    /// League-average score used as the projection scale.
    pub base_score: f64,
    /// Standard deviation of a side's sampled score.
    pub std_dev: f64,
    /// Projected-spread magnitude above which a pick is HIGH risk.
    pub spread_cutoff: f64,
}

impl SportProfile {
    fn validate(&self, sport: &str) -> Result<()> {
        if self.base_score <= 0.0 {
            return Err(EngineError::invalid(format!(
                "base_score for {sport} must be positive"
            )));
        }
        if self.std_dev <= 0.0 {
            return Err(EngineError::invalid(format!(
                "std_dev for {sport} must be positive"
            )));
        }
        if self.spread_cutoff <= 0.0 {
            return Err(EngineError::invalid(format!(
                "spread_cutoff for {sport} must be positive"
            )));
        }
        if self.weights.values().any(|w| !w.is_finite()) {
            return Err(EngineError::invalid(format!(
                "weights for {sport} must be finite"
            )));
        }
        Ok(())
    }
}

fn weights(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries.iter().map(|(k, w)| (k.to_string(), *w)).collect()
}

/// Per-sport profile book.
///
/// The fallback profile is a plain struct field rather than a map entry, so a
/// lookup can never come back empty: unknown sports resolve to `fallback` by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SportBook {
    /// Scales how strongly the weighted factor sum moves the baseline away
    /// from the league-average score.
    pub dampening: f64,
    pub profiles: HashMap<String, SportProfile>,
    pub fallback: SportProfile,
}

impl Default for SportBook {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "nba".to_string(),
            SportProfile {
                weights: weights(&[
                    ("offense", 0.30),
                    ("defense", 0.25),
                    ("pace", 0.10),
                    ("form", 0.12),
                    ("home", 0.06),
                    ("rest", 0.05),
                    ("travel", -0.03),
                    ("injury_impact", -0.10),
                    ("historical", 0.08),
                ]),
                base_score: 112.0,
                std_dev: 11.0,
                spread_cutoff: 6.5,
            },
        );
        profiles.insert(
            "nfl".to_string(),
            SportProfile {
                weights: weights(&[
                    ("offense", 0.28),
                    ("defense", 0.28),
                    ("form", 0.10),
                    ("home", 0.07),
                    ("rest", 0.06),
                    ("travel", -0.04),
                    ("injury_impact", -0.12),
                    ("historical", 0.08),
                ]),
                base_score: 23.0,
                std_dev: 9.5,
                spread_cutoff: 6.5,
            },
        );
        profiles.insert(
            "mlb".to_string(),
            SportProfile {
                weights: weights(&[
                    ("offense", 0.25),
                    ("defense", 0.20),
                    ("pitching", 0.30),
                    ("home", 0.04),
                    ("rest", 0.03),
                    ("travel", -0.02),
                    ("injury_impact", -0.08),
                    ("historical", 0.06),
                ]),
                base_score: 4.5,
                std_dev: 2.9,
                spread_cutoff: 1.5,
            },
        );
        profiles.insert(
            "nhl".to_string(),
            SportProfile {
                weights: weights(&[
                    ("offense", 0.26),
                    ("defense", 0.24),
                    ("goaltending", 0.22),
                    ("home", 0.05),
                    ("rest", 0.04),
                    ("travel", -0.03),
                    ("injury_impact", -0.09),
                    ("historical", 0.06),
                ]),
                base_score: 3.0,
                std_dev: 1.7,
                spread_cutoff: 1.5,
            },
        );
        profiles.insert(
            "soccer".to_string(),
            SportProfile {
                weights: weights(&[
                    ("offense", 0.28),
                    ("defense", 0.26),
                    ("form", 0.14),
                    ("home", 0.08),
                    ("rest", 0.03),
                    ("travel", -0.03),
                    ("injury_impact", -0.10),
                    ("historical", 0.07),
                ]),
                base_score: 1.4,
                std_dev: 1.2,
                spread_cutoff: 1.0,
            },
        );
        SportBook {
            dampening: 0.12,
            profiles,
            fallback: SportProfile {
                weights: weights(&[
                    ("offense", 0.25),
                    ("defense", 0.25),
                    ("form", 0.10),
                    ("home", 0.05),
                    ("rest", 0.04),
                    ("travel", -0.03),
                    ("injury_impact", -0.10),
                    ("historical", 0.06),
                ]),
                base_score: 50.0,
                std_dev: 9.0,
                spread_cutoff: 6.5,
            },
        }
    }
}

impl SportBook {
    /// Resolve a sport tag to its profile, falling back for unknown tags.
    pub fn profile(&self, sport: &str) -> &SportProfile {
        self.profiles
            .get(&canonical_sport(sport))
            .unwrap_or(&self.fallback)
    }
}

/// Collapse the sport aliases seen across upstream feeds onto one key each.
fn canonical_sport(sport: &str) -> String {
    let s = sport.trim().to_lowercase();
    match s.as_str() {
        "basketball" | "nba" => "nba".to_string(),
        "american_football" | "nfl" => "nfl".to_string(),
        "baseball" | "mlb" => "mlb".to_string(),
        "ice_hockey" | "nhl" => "nhl".to_string(),
        "football" | "football_eu" | "soccer" => "soccer".to_string(),
        _ => s,
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub simulation: SimulationConfig,
    /// Fractional-Kelly multiplier applied to the full Kelly stake.
    pub kelly_fraction: f64,
    pub risk: RiskThresholds,
    pub grades: GradeTable,
    pub parlay: ParlayConfig,
    pub shortlist: ShortlistConfig,
    pub book: SportBook,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            simulation: SimulationConfig::default(),
            kelly_fraction: 0.25,
            risk: RiskThresholds::default(),
            grades: GradeTable::default(),
            parlay: ParlayConfig::default(),
            shortlist: ShortlistConfig::default(),
            book: SportBook::default(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration from JSON. Absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| EngineError::invalid(format!("config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulation.trials == 0 {
            return Err(EngineError::invalid("trials must be positive"));
        }
        if !(-1.0..=1.0).contains(&self.simulation.correlation) {
            return Err(EngineError::invalid(
                "correlation must be between -1.0 and 1.0",
            ));
        }
        if !(0.0..=1.0).contains(&self.kelly_fraction) || self.kelly_fraction == 0.0 {
            return Err(EngineError::invalid(
                "kelly_fraction must be between 0.0 (exclusive) and 1.0",
            ));
        }
        if !(0.0..1.0).contains(&self.risk.high_below)
            || !(0.0..1.0).contains(&self.risk.med_below)
            || self.risk.high_below > self.risk.med_below
        {
            return Err(EngineError::invalid(
                "risk cutoffs must satisfy 0 <= high_below <= med_below < 1",
            ));
        }
        self.grades.validate()?;
        if !(0.0..=1.0).contains(&self.parlay.correlation_haircut)
            || self.parlay.correlation_haircut == 0.0
        {
            return Err(EngineError::invalid(
                "correlation_haircut must be between 0.0 (exclusive) and 1.0",
            ));
        }
        if self.parlay.max_legs == 0 || self.parlay.optimal_size == 0 {
            return Err(EngineError::invalid(
                "parlay max_legs and optimal_size must be positive",
            ));
        }
        if !(0.0..1.0).contains(&self.parlay.min_combined_probability) {
            return Err(EngineError::invalid(
                "min_combined_probability must be in [0, 1)",
            ));
        }
        if self.parlay.edge_weight < 0.0 || self.parlay.probability_weight < 0.0 {
            return Err(EngineError::invalid(
                "parlay ranking weights must be non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.shortlist.min_probability) {
            return Err(EngineError::invalid(
                "shortlist min_probability must be in [0, 1]",
            ));
        }
        if self.book.dampening <= 0.0 {
            return Err(EngineError::invalid("dampening must be positive"));
        }
        for (sport, profile) in &self.book.profiles {
            profile.validate(sport)?;
        }
        self.book.fallback.validate("fallback")?;
        Ok(())
    }
}
