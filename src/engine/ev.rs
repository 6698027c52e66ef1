//! Expected value and Kelly Criterion stake sizing.
//!
//! The Kelly formula sizes a bet to maximise the expected logarithm of
//! wealth, which balances risk and reward optimally over the long run.
//!
//! Standard formula:
//!   f* = (b·p − q) / b
//! where
//!   b  = net odds received on the bet (decimal odds − 1)
//!   p  = estimated probability of winning
//!   q  = 1 − p  (probability of losing)
//!
//! A *fractional* Kelly multiplier (0 < multiplier ≤ 1) is applied on top to
//! reduce variance at the cost of slightly lower expected growth.

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::types::BetSide;

/// Expected profit of a bet.
///
/// # Arguments
/// * `win_prob`     – Estimated probability the bet wins (0.0–1.0).
/// * `decimal_odds` – Decimal odds paid on a win.
/// * `stake`        – Amount staked.
pub fn expected_value(win_prob: f64, decimal_odds: f64, stake: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&win_prob), "win_prob out of range");
    win_prob * (decimal_odds - 1.0) * stake - (1.0 - win_prob) * stake
}

/// Calculate the fractional-Kelly stake fraction.
///
/// Returns `0.0` when the edge is non-positive — never a negative stake.
pub fn fractional_kelly(win_prob: f64, decimal_odds: f64, fraction: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&win_prob), "win_prob out of range");
    debug_assert!((0.0..=1.0).contains(&fraction), "fraction out of range");

    let b = decimal_odds - 1.0;
    if b <= 0.0 {
        return 0.0;
    }
    let p = win_prob;
    let q = 1.0 - p;

    let full = (b * p - q) / b;
    if full <= 0.0 {
        return 0.0; // no edge
    }
    (full * fraction).min(1.0)
}

/// The EV verdict on one two-sided market.
///
/// When `side` is `None`, neither outcome had positive expected value; the
/// remaining fields describe the candidate that came closest to break-even
/// and the stake is zero.
#[derive(Debug, Clone, Copy)]
pub struct SideSelection {
    pub side: Option<BetSide>,
    pub win_probability: f64,
    pub decimal_odds: f64,
    /// Win probability minus implied probability.
    pub edge: f64,
    /// Expected value per unit stake.
    pub expected_value: f64,
    /// Fractional-Kelly stake. Zero when no edge.
    pub stake_fraction: f64,
}

/// Pick the better side of a two-outcome market by expected value.
///
/// Each side's EV comes from its own odds and probability (side B wins with
/// probability `1 − win_prob_a`). The side with the strictly greater EV is
/// chosen when that EV is positive; equal positive EVs fall to side A — an
/// arbitrary but fixed tie-break. Neither positive means no edge.
pub fn select_side(
    win_prob_a: f64,
    odds_a: f64,
    odds_b: f64,
    kelly_fraction: f64,
) -> Result<SideSelection> {
    if odds_a <= 1.0 || odds_b <= 1.0 {
        return Err(EngineError::invalid(format!(
            "decimal odds must exceed 1.0, got {odds_a} / {odds_b}"
        )));
    }

    let win_prob_b = 1.0 - win_prob_a;
    let ev_a = expected_value(win_prob_a, odds_a, 1.0);
    let ev_b = expected_value(win_prob_b, odds_b, 1.0);

    let (side, prob, odds, ev) = if ev_a > 0.0 && ev_a >= ev_b {
        (Some(BetSide::SideA), win_prob_a, odds_a, ev_a)
    } else if ev_b > 0.0 {
        (Some(BetSide::SideB), win_prob_b, odds_b, ev_b)
    } else if ev_a >= ev_b {
        (None, win_prob_a, odds_a, ev_a)
    } else {
        (None, win_prob_b, odds_b, ev_b)
    };

    let stake_fraction = if side.is_some() {
        fractional_kelly(prob, odds, kelly_fraction)
    } else {
        0.0
    };
    debug!(?side, ev, stake_fraction, "side selection");

    Ok(SideSelection {
        side,
        win_probability: prob,
        decimal_odds: odds,
        edge: prob - 1.0 / odds,
        expected_value: ev,
        stake_fraction,
    })
}
