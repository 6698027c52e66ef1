//! Monte Carlo matchup and prop-line simulation with risk-controlled bet
//! sizing.
//!
//! The crate estimates the win probability of a two-sided outcome — a sports
//! matchup or an over/under prop line — by correlated stochastic simulation,
//! converts the estimate plus market odds into an EV/Kelly betting
//! recommendation with a risk tier and letter grade, and can combine several
//! recommendations into a parlay with a correlation-adjusted joint
//! probability.
//!
//! Everything here is synchronous, CPU-bound and side-effect-free: no I/O,
//! no shared state, no hidden globals. Odds retrieval, delivery and
//! persistence belong to the embedding application, which calls in with a
//! [`types::MatchupInput`] or [`types::PropInput`], an
//! [`config::EngineConfig`] and its own `Rng`:
//!
//! ```
//! use propedge::config::EngineConfig;
//! use propedge::engine::analyze_matchup;
//! use propedge::types::{MatchupInput, SideFactors};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let config = EngineConfig::default();
//! let input = MatchupInput {
//!     sport: "NBA".into(),
//!     side_a: SideFactors {
//!         name: "Lakers".into(),
//!         decimal_odds: 1.91,
//!         ..Default::default()
//!     },
//!     side_b: SideFactors {
//!         name: "Nuggets".into(),
//!         decimal_odds: 1.91,
//!         ..Default::default()
//!     },
//!     historical_adjustment: 0.0,
//! };
//! let mut rng = StdRng::seed_from_u64(42);
//! let analysis = analyze_matchup(&input, &config, &mut rng).unwrap();
//! assert_eq!(
//!     analysis.simulation.side_a.win_probability
//!         + analysis.simulation.side_b.win_probability,
//!     1.0
//! );
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use engine::analyzer::{analyze_matchup, shortlist_picks, MatchupAnalysis};
pub use engine::parlay::{build_optimal_parlay, build_parlay, ParlayLeg, ParlaySlip};
pub use engine::props::{evaluate_prop, KeywordBias, LineBias};
pub use engine::simulation::{SimulationParams, SimulationResult};
pub use error::{EngineError, Result};
pub use types::{BetSide, Grade, MatchupInput, PickRecommendation, PropInput, RiskTier, SideFactors};
