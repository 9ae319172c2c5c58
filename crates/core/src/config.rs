//! Dashboard configuration shared by both front ends.
//!
//! The core never reads the environment itself: each front end gathers its
//! sources (process env, `.env`, CLI flags, `window.__API_URL__`) and hands
//! them over here so resolution happens in one place.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const API_URL_VAR: &str = "RIDER_DASH_API_URL";
pub const DEFAULT_HEX_RESOLUTION: u8 = 7;
pub const DEFAULT_JOBS_LIMIT: u32 = 100;

/// Picks the API base: build-time value, then runtime override, then the
/// default. Blank candidates are skipped and a trailing `/` is dropped.
pub fn resolve_api_base(build_time: Option<&str>, runtime: Option<&str>) -> String {
    [build_time, runtime]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
        .trim_end_matches('/')
        .to_string()
}

/// Constants used to derive staffing numbers the API does not send.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub payout_per_order: f64,
    pub working_days_per_week: f64,
    pub target_orders_per_rider: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            payout_per_order: 200.0,
            working_days_per_week: 6.5,
            target_orders_per_rider: 22.0,
        }
    }
}

impl Assumptions {
    /// Overrides individual constants, ignoring values that would make the
    /// derived ratios meaningless (zero, negative, NaN).
    #[must_use]
    pub fn with_overrides(
        mut self,
        payout_per_order: Option<f64>,
        working_days_per_week: Option<f64>,
        target_orders_per_rider: Option<f64>,
    ) -> Self {
        let usable = |value: Option<f64>| value.filter(|v| v.is_finite() && *v > 0.0);
        if let Some(value) = usable(payout_per_order) {
            self.payout_per_order = value;
        }
        if let Some(value) = usable(working_days_per_week) {
            self.working_days_per_week = value;
        }
        if let Some(value) = usable(target_orders_per_rider) {
            self.target_orders_per_rider = value;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub api_base: String,
    pub assumptions: Assumptions,
    pub hex_resolution: u8,
    pub jobs_limit: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            assumptions: Assumptions::default(),
            hex_resolution: DEFAULT_HEX_RESOLUTION,
            jobs_limit: DEFAULT_JOBS_LIMIT,
        }
    }
}

impl DashboardConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_time_value_wins() {
        assert_eq!(
            resolve_api_base(Some("https://api.example.in/"), Some("http://other")),
            "https://api.example.in"
        );
    }

    #[test]
    fn blank_values_fall_through_to_default() {
        assert_eq!(resolve_api_base(Some("  "), None), DEFAULT_API_BASE);
        assert_eq!(resolve_api_base(None, Some("")), DEFAULT_API_BASE);
        assert_eq!(resolve_api_base(Some(""), Some("http://runtime:9000")), "http://runtime:9000");
    }

    #[test]
    fn overrides_ignore_non_positive_values() {
        let assumptions = Assumptions::default().with_overrides(Some(250.0), Some(0.0), None);
        assert!((assumptions.payout_per_order - 250.0).abs() < f64::EPSILON);
        assert!((assumptions.working_days_per_week - 6.5).abs() < f64::EPSILON);
        assert!((assumptions.target_orders_per_rider - 22.0).abs() < f64::EPSILON);
    }
}
