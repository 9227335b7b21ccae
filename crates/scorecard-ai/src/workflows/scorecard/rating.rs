//! Rating formulas converting a (target, actual) pair into a bounded score.
//!
//! Both formulas are centered at 3.0 ("meets target") and move two points per
//! unit of relative deviation, clamped to the 1.0..=5.0 band. A zero target or
//! actual yields the 0.0 sentinel: the measure has no data yet, which is not
//! the same as a true low score.

pub const RATING_FLOOR: f64 = 1.0;
pub const RATING_CEILING: f64 = 5.0;

const BASELINE: f64 = 3.0;
const SLOPE: f64 = 2.0;

/// Higher-is-better rating for achievement measures.
pub fn achievement_rating(target: f64, actual: f64) -> f64 {
    let target = coerce(target);
    let actual = coerce(actual);
    if target == 0.0 || actual == 0.0 {
        return 0.0;
    }

    let rating = if actual >= target {
        BASELINE + SLOPE * ((actual - target) / target)
    } else {
        BASELINE - SLOPE * ((target - actual) / target)
    };

    round1(rating.clamp(RATING_FLOOR, RATING_CEILING))
}

/// Lower-is-better rating for financial measures: spending under budget is
/// rewarded, overruns are penalized.
pub fn financial_rating(target_budget: f64, actual_spent: f64) -> f64 {
    let target = coerce(target_budget);
    let actual = coerce(actual_spent);
    if target == 0.0 || actual == 0.0 {
        return 0.0;
    }

    let rating = if actual < target {
        BASELINE + SLOPE * ((target - actual) / target)
    } else if actual > target {
        BASELINE - SLOPE * ((actual - target) / target)
    } else {
        BASELINE
    };

    round1(rating.clamp(RATING_FLOOR, RATING_CEILING))
}

/// Malformed numerics coerce to the no-data sentinel rather than poisoning
/// downstream arithmetic.
fn coerce(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_target_exactly_scores_baseline() {
        for target in [1.0, 7.5, 40.0, 1200.0] {
            assert_eq!(achievement_rating(target, target), 3.0);
            assert_eq!(financial_rating(target, target), 3.0);
        }
    }

    #[test]
    fn zero_operands_yield_the_no_data_sentinel() {
        assert_eq!(achievement_rating(25.0, 0.0), 0.0);
        assert_eq!(achievement_rating(0.0, 25.0), 0.0);
        assert_eq!(financial_rating(0.0, 400.0), 0.0);
        assert_eq!(financial_rating(400.0, 0.0), 0.0);
    }

    #[test]
    fn ratings_stay_inside_the_band_for_positive_inputs() {
        for target in [1.0, 10.0, 250.0] {
            for actual in [0.1, 1.0, 9.0, 10.0, 99.0, 10_000.0] {
                let achievement = achievement_rating(target, actual);
                assert!((RATING_FLOOR..=RATING_CEILING).contains(&achievement));
                let financial = financial_rating(target, actual);
                assert!((RATING_FLOOR..=RATING_CEILING).contains(&financial));
            }
        }
    }

    #[test]
    fn achievement_scales_linearly_around_the_baseline() {
        // 10% over target adds 0.2; 25% under subtracts 0.5.
        assert_eq!(achievement_rating(100.0, 110.0), 3.2);
        assert_eq!(achievement_rating(100.0, 75.0), 2.5);
        // Large overshoot clamps instead of running away.
        assert_eq!(achievement_rating(10.0, 100.0), 5.0);
        assert_eq!(achievement_rating(100.0, 1.0), 1.0);
    }

    #[test]
    fn financial_rewards_underspend_and_penalizes_overrun() {
        assert_eq!(financial_rating(1000.0, 900.0), 3.2);
        assert_eq!(financial_rating(1000.0, 1250.0), 2.5);
        assert_eq!(financial_rating(1000.0, 100.0), 4.8);
        assert_eq!(financial_rating(1000.0, 5000.0), 1.0);
    }

    #[test]
    fn non_finite_inputs_are_treated_as_missing() {
        assert_eq!(achievement_rating(f64::NAN, 10.0), 0.0);
        assert_eq!(financial_rating(500.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn rating_functions_are_pure() {
        let first = achievement_rating(37.0, 29.5);
        let second = achievement_rating(37.0, 29.5);
        assert_eq!(first.to_bits(), second.to_bits());
        let first = financial_rating(812.0, 640.0);
        let second = financial_rating(812.0, 640.0);
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
