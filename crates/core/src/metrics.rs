//! Staffing numbers the API leaves out, derived from [`Assumptions`].

use serde::Serialize;

use crate::config::Assumptions;
use crate::domain::Signal;

pub const STRONG_DEMAND: f64 = 70.0;
pub const STEADY_DEMAND: f64 = 55.0;

/// Explicit value when the API sent one, otherwise the earnings index
/// divided by payout per order and working days.
pub fn orders_per_day(
    explicit: Option<f64>,
    store_earning_index: Option<f64>,
    assumptions: &Assumptions,
) -> Option<f64> {
    explicit.or_else(|| {
        store_earning_index
            .map(|index| index / assumptions.payout_per_order / assumptions.working_days_per_week)
    })
}

pub fn recommended_riders(
    explicit: Option<f64>,
    orders_per_day: Option<f64>,
    assumptions: &Assumptions,
) -> Option<f64> {
    explicit.or_else(|| orders_per_day.map(|orders| orders / assumptions.target_orders_per_rider))
}

/// Zero riders a week reads as "no current staffing data", not zero riders.
pub fn current_riders(riders_week: Option<f64>, assumptions: &Assumptions) -> Option<f64> {
    riders_week
        .filter(|riders| *riders != 0.0)
        .map(|riders| riders / assumptions.working_days_per_week)
}

pub fn capacity_gap(recommended: Option<f64>, current: Option<f64>) -> Option<f64> {
    Some(recommended? - current?)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Staffing {
    pub orders_per_day: Option<f64>,
    pub recommended: Option<f64>,
    pub current: Option<f64>,
    pub gap: Option<f64>,
}

pub fn staffing(
    explicit_orders: Option<f64>,
    store_earning_index: Option<f64>,
    explicit_recommended: Option<f64>,
    riders_week: Option<f64>,
    assumptions: &Assumptions,
) -> Staffing {
    let orders = orders_per_day(explicit_orders, store_earning_index, assumptions);
    let recommended = recommended_riders(explicit_recommended, orders, assumptions);
    let current = current_riders(riders_week, assumptions);
    Staffing {
        orders_per_day: orders,
        recommended,
        current,
        gap: capacity_gap(recommended, current),
    }
}

/// Row colour: the API's own `color` when present, otherwise banded on score.
pub fn demand_signal(color: Option<&str>, score: Option<f64>) -> Signal {
    if let Some(signal) = color.and_then(Signal::parse) {
        return signal;
    }
    let score = score.unwrap_or(0.0);
    if score >= STRONG_DEMAND {
        Signal::Green
    } else if score >= STEADY_DEMAND {
        Signal::Yellow
    } else {
        Signal::Red
    }
}

/// P25, median and P75 as fractions of the largest of the three (at least 1).
pub fn range_fractions(p25: Option<f64>, median: Option<f64>, p75: Option<f64>) -> [f64; 3] {
    let values = [p25, median, p75].map(|v| v.unwrap_or(0.0));
    let max = values.iter().copied().fold(1.0_f64, f64::max);
    values.map(|v| v / max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn derives_orders_and_riders_from_earning_index() {
        let assumptions = Assumptions::default();
        let derived = staffing(None, Some(28_600.0), None, None, &assumptions);
        assert!(close(derived.orders_per_day, 22.0));
        assert!(close(derived.recommended, 1.0));
        assert_eq!(derived.current, None);
        assert_eq!(derived.gap, None);
    }

    #[test]
    fn explicit_values_win_over_derivation() {
        let assumptions = Assumptions::default();
        let derived = staffing(Some(44.0), Some(28_600.0), Some(3.0), Some(13.0), &assumptions);
        assert!(close(derived.orders_per_day, 44.0));
        assert!(close(derived.recommended, 3.0));
        assert!(close(derived.current, 2.0));
        assert!(close(derived.gap, 1.0));
    }

    #[test]
    fn zero_riders_week_means_unknown() {
        assert_eq!(current_riders(Some(0.0), &Assumptions::default()), None);
    }

    #[test]
    fn signal_bands() {
        assert_eq!(demand_signal(None, Some(80.0)), Signal::Green);
        assert_eq!(demand_signal(None, Some(55.0)), Signal::Yellow);
        assert_eq!(demand_signal(None, None), Signal::Red);
        assert_eq!(demand_signal(Some("green"), Some(10.0)), Signal::Green);
        assert_eq!(demand_signal(Some("purple"), Some(60.0)), Signal::Yellow);
    }

    #[test]
    fn range_is_relative_to_largest() {
        assert_eq!(range_fractions(Some(50.0), Some(75.0), Some(100.0)), [0.5, 0.75, 1.0]);
        assert_eq!(range_fractions(None, None, None), [0.0, 0.0, 0.0]);
    }
}
