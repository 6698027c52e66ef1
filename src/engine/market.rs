//! Odds-format conversions and vig removal.
//!
//! Decimal odds are the internal currency: payout multiplier per unit stake,
//! stake included (1.90 → 1.90 returned per 1.0 bet). American odds appear
//! only at the boundary, converted on the way in and out.

use crate::error::{EngineError, Result};

/// Convert American odds to decimal odds.
///
/// Positive odds (+150) are the payout per 100 risked on an underdog;
/// negative odds (-150) are the stake needed to net 100 on a favorite.
pub fn american_to_decimal(odds: i32) -> Result<f64> {
    if odds == 0 {
        return Err(EngineError::invalid("american odds of 0 are undefined"));
    }
    if odds > 0 {
        Ok(1.0 + odds as f64 / 100.0)
    } else {
        Ok(1.0 + 100.0 / odds.abs() as f64)
    }
}

/// Convert decimal odds back to the signed American convention.
pub fn decimal_to_american(dec: f64) -> Result<i32> {
    if dec <= 1.0 {
        return Err(EngineError::invalid(format!(
            "decimal odds must exceed 1.0, got {dec}"
        )));
    }
    if dec >= 2.0 {
        Ok(((dec - 1.0) * 100.0).round() as i32)
    } else {
        Ok((-100.0 / (dec - 1.0)).round() as i32)
    }
}

/// Implied win probability of decimal odds, before vig removal.
pub fn implied_probability(dec: f64) -> Result<f64> {
    if dec <= 1.0 {
        return Err(EngineError::invalid(format!(
            "decimal odds must exceed 1.0, got {dec}"
        )));
    }
    Ok(1.0 / dec)
}

/// Strip the bookmaker margin from a pair of implied probabilities.
///
/// Renormalizes so the pair sums to 1.0 while preserving their ratio.
pub fn remove_vig(p_a: f64, p_b: f64) -> Result<(f64, f64)> {
    let total = p_a + p_b;
    if total <= 0.0 {
        return Err(EngineError::invalid(
            "implied probabilities must sum to a positive value",
        ));
    }
    Ok((p_a / total, p_b / total))
}
