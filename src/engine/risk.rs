//! Risk tiering for finished picks.
//!
//! Rule precedence, first match wins:
//! 1. Projected spread magnitude beyond the sport's cutoff → HIGH. A lopsided
//!    projection means the market line and the model disagree violently, or
//!    the game is a blowout candidate with inflated variance either way.
//! 2. Win probability below the HIGH cutoff → HIGH (near coin-flip).
//! 3. Win probability below the MED cutoff → MED.
//! 4. Otherwise LOW.

use crate::config::RiskThresholds;
use crate::types::RiskTier;

/// Classify a pick's risk tier. `spread_cutoff` comes from the sport profile;
/// probability cutoffs from [`RiskThresholds`].
pub fn classify_risk(
    spread: f64,
    win_probability: f64,
    thresholds: &RiskThresholds,
    spread_cutoff: f64,
) -> RiskTier {
    if spread.abs() > spread_cutoff {
        RiskTier::High
    } else if win_probability < thresholds.high_below {
        RiskTier::High
    } else if win_probability < thresholds.med_below {
        RiskTier::Med
    } else {
        RiskTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GradeTable;
    use crate::types::Grade;

    const CUTOFF: f64 = 6.5;

    fn thresholds() -> RiskThresholds {
        RiskThresholds::default()
    }

    #[test]
    fn wide_spread_is_high_even_with_strong_probability() {
        let tier = classify_risk(8.0, 0.75, &thresholds(), CUTOFF);
        assert_eq!(tier, RiskTier::High);
        let tier = classify_risk(-7.0, 0.75, &thresholds(), CUTOFF);
        assert_eq!(tier, RiskTier::High);
    }

    #[test]
    fn coin_flip_probability_is_high() {
        assert_eq!(classify_risk(2.0, 0.50, &thresholds(), CUTOFF), RiskTier::High);
        assert_eq!(classify_risk(2.0, 0.519, &thresholds(), CUTOFF), RiskTier::High);
    }

    #[test]
    fn middling_probability_is_med() {
        assert_eq!(classify_risk(2.0, 0.52, &thresholds(), CUTOFF), RiskTier::Med);
        assert_eq!(classify_risk(2.0, 0.579, &thresholds(), CUTOFF), RiskTier::Med);
    }

    #[test]
    fn confident_probability_is_low() {
        assert_eq!(classify_risk(2.0, 0.58, &thresholds(), CUTOFF), RiskTier::Low);
        assert_eq!(classify_risk(2.0, 0.80, &thresholds(), CUTOFF), RiskTier::Low);
    }

    #[test]
    fn custom_thresholds_are_respected() {
        let strict = RiskThresholds {
            high_below: 0.60,
            med_below: 0.70,
        };
        assert_eq!(classify_risk(1.0, 0.65, &strict, CUTOFF), RiskTier::Med);
        assert_eq!(classify_risk(1.0, 0.59, &strict, CUTOFF), RiskTier::High);
    }

    #[test]
    fn grade_is_monotonic_in_edge() {
        let table = GradeTable::default();
        let mut last = Grade::D;
        let mut edge = -0.05;
        while edge <= 0.20 {
            let grade = table.grade_for(edge);
            assert!(
                grade >= last,
                "grade regressed from {last:?} to {grade:?} at edge {edge}"
            );
            last = grade;
            edge += 0.001;
        }
        assert_eq!(last, Grade::APlus);
    }
}
