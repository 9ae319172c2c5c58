//! Terminal settings: `.env`, process environment and CLI flags folded into
//! one [`Settings`].

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;
use rider_dash_core::config::{resolve_api_base, API_URL_VAR};
use rider_dash_core::{Assumptions, DashboardConfig};
use thiserror::Error;

use crate::cli::CliArgs;

pub const PAYOUT_VAR: &str = "RIDER_DASH_PAYOUT_PER_ORDER";
pub const DAYS_VAR: &str = "RIDER_DASH_DAYS_PER_WEEK";
pub const ORDERS_VAR: &str = "RIDER_DASH_ORDERS_PER_RIDER";
pub const HEX_RESOLUTION_VAR: &str = "RIDER_DASH_HEX_RESOLUTION";
pub const JOBS_LIMIT_VAR: &str = "RIDER_DASH_JOBS_LIMIT";
pub const TIMEOUT_VAR: &str = "RIDER_DASH_TIMEOUT_SECS";
pub const LOG_VAR: &str = "RIDER_DASH_LOG";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE: &str = "rider-dash.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    NotANumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub dashboard: DashboardConfig,
    pub timeout: Duration,
    pub log_file: PathBuf,
    pub debug: bool,
}

/// Loads `.env` (if present) and reads settings from the process environment.
pub fn load(args: &CliArgs) -> Result<Settings, ConfigError> {
    dotenv().ok();
    from_sources(args, option_env!("RIDER_DASH_API_URL"), |name| env::var(name).ok())
}

/// Builds settings from explicit sources; `lookup` stands in for the
/// environment.
pub fn from_sources(
    args: &CliArgs,
    build_time_url: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let api_base = match args.api_url.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(url) => resolve_api_base(Some(url), None),
        None => resolve_api_base(build_time_url, lookup(API_URL_VAR).as_deref()),
    };

    let assumptions = Assumptions::default().with_overrides(
        parse_var(&lookup, PAYOUT_VAR)?,
        parse_var(&lookup, DAYS_VAR)?,
        parse_var(&lookup, ORDERS_VAR)?,
    );

    let mut dashboard = DashboardConfig::new(api_base);
    dashboard.assumptions = assumptions;
    if let Some(resolution) = parse_var(&lookup, HEX_RESOLUTION_VAR)? {
        dashboard.hex_resolution = resolution;
    }
    if let Some(limit) = parse_var::<u32>(&lookup, JOBS_LIMIT_VAR)? {
        dashboard.jobs_limit = limit.max(1);
    }

    let timeout_secs = parse_var(&lookup, TIMEOUT_VAR)?.unwrap_or(DEFAULT_TIMEOUT_SECS);
    let log_file = args
        .log
        .clone()
        .or_else(|| lookup(LOG_VAR).filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    Ok(Settings {
        dashboard,
        timeout: Duration::from_secs(timeout_secs),
        log_file,
        debug: args.debug,
    })
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| ConfigError::NotANumber {
        var,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_any_source() {
        let settings = from_sources(&CliArgs::default(), None, env_of(&[])).unwrap();
        assert_eq!(settings.dashboard, DashboardConfig::default());
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.log_file, PathBuf::from("rider-dash.log"));
    }

    #[test]
    fn build_time_url_beats_runtime_env() {
        let lookup = env_of(&[(API_URL_VAR, "http://runtime:9000")]);
        let settings = from_sources(&CliArgs::default(), Some("http://build:8000/"), lookup).unwrap();
        assert_eq!(settings.dashboard.api_base, "http://build:8000");

        let lookup = env_of(&[(API_URL_VAR, "http://runtime:9000/")]);
        let settings = from_sources(&CliArgs::default(), Some("  "), lookup).unwrap();
        assert_eq!(settings.dashboard.api_base, "http://runtime:9000");
    }

    #[test]
    fn cli_flag_overrides_everything() {
        let args = CliArgs {
            api_url: Some("http://flag/".into()),
            ..CliArgs::default()
        };
        let lookup = env_of(&[(API_URL_VAR, "http://runtime")]);
        let settings = from_sources(&args, Some("http://build"), lookup).unwrap();
        assert_eq!(settings.dashboard.api_base, "http://flag");
    }

    #[test]
    fn reads_numeric_overrides() {
        let lookup = env_of(&[
            (ORDERS_VAR, "20"),
            (DAYS_VAR, "0"),
            (HEX_RESOLUTION_VAR, "8"),
            (JOBS_LIMIT_VAR, "25"),
            (TIMEOUT_VAR, "5"),
        ]);
        let settings = from_sources(&CliArgs::default(), None, lookup).unwrap();
        assert!((settings.dashboard.assumptions.target_orders_per_rider - 20.0).abs() < f64::EPSILON);
        assert!((settings.dashboard.assumptions.working_days_per_week - 6.5).abs() < f64::EPSILON);
        assert_eq!(settings.dashboard.hex_resolution, 8);
        assert_eq!(settings.dashboard.jobs_limit, 25);
        assert_eq!(settings.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_garbage_numbers() {
        let lookup = env_of(&[(TIMEOUT_VAR, "soon")]);
        let err = from_sources(&CliArgs::default(), None, lookup).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotANumber {
                var: TIMEOUT_VAR,
                value: "soon".into()
            }
        );
    }
}
