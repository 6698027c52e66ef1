pub mod analyzer;
pub mod ev;
pub mod market;
pub mod parlay;
pub mod projection;
pub mod props;
pub mod risk;
pub mod simulation;

pub use analyzer::{analyze_matchup, shortlist_picks, MatchupAnalysis};
pub use parlay::{build_optimal_parlay, build_parlay, ParlayLeg, ParlaySlip};
pub use simulation::{simulate, SimulationParams, SimulationResult};
