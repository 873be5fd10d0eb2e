//! Configuration validation.
//!
//! Turns a raw config source plus CLI overrides into a typed
//! [`BacktestRequest`]. CLI flags always win over file values.

use crate::domain::backtest::BacktestRequest;
use crate::domain::error::RewindError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

/// CLI-level overrides for the `[backtest]` section. `None` defers to the
/// config file.
#[derive(Debug, Clone, Default)]
pub struct RequestOverrides {
    pub ticker: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub strategy: Option<String>,
    pub initial_capital: Option<f64>,
}

pub fn build_request(
    config: &dyn ConfigPort,
    overrides: &RequestOverrides,
) -> Result<BacktestRequest, RewindError> {
    let ticker = match &overrides.ticker {
        Some(t) => t.clone(),
        None => require_string(config, "backtest", "ticker")?,
    };
    if ticker.trim().is_empty() {
        return Err(RewindError::InvalidInput {
            reason: "ticker must not be empty".into(),
        });
    }

    let strategy = overrides
        .strategy
        .clone()
        .or_else(|| config.get_string("backtest", "strategy"))
        .unwrap_or_else(|| "buy and hold".to_string());

    let initial_capital = match overrides.initial_capital {
        Some(c) => c,
        None => config.get_double("backtest", "initial_capital", 10_000.0),
    };
    if !(initial_capital.is_finite() && initial_capital > 0.0) {
        return Err(RewindError::ConfigInvalid {
            section: "backtest".into(),
            key: "initial_capital".into(),
            reason: "initial_capital must be positive".into(),
        });
    }

    let start_date = match overrides.start_date {
        Some(d) => Some(d),
        None => optional_date(config, "backtest", "start_date")?,
    };
    let end_date = match overrides.end_date {
        Some(d) => Some(d),
        None => optional_date(config, "backtest", "end_date")?,
    };
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(RewindError::ConfigInvalid {
                section: "backtest".into(),
                key: "start_date".into(),
                reason: format!("start date {start} is after end date {end}"),
            });
        }
    }

    Ok(BacktestRequest {
        ticker,
        start_date,
        end_date,
        strategy,
        initial_capital,
    })
}

/// Resolve the data directory: CLI flag, then `[data] path`.
pub fn data_path(
    config: &dyn ConfigPort,
    override_path: Option<&str>,
) -> Result<String, RewindError> {
    match override_path {
        Some(p) => Ok(p.to_string()),
        None => require_string(config, "data", "path"),
    }
}

fn require_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, RewindError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(RewindError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn optional_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, RewindError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| RewindError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("invalid date '{s}', expected YYYY-MM-DD"),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Minimal in-memory config for tests.
    struct MapConfig {
        values: HashMap<(String, String), String>,
    }

    impl MapConfig {
        fn new(pairs: &[(&str, &str, &str)]) -> Self {
            Self {
                values: pairs
                    .iter()
                    .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                    .collect(),
            }
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.values
                .get(&(section.to_string(), key.to_string()))
                .cloned()
        }
        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
        fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    #[test]
    fn builds_request_from_config_alone() {
        let config = MapConfig::new(&[
            ("backtest", "ticker", "AAPL"),
            ("backtest", "strategy", "Buy and Hold"),
            ("backtest", "initial_capital", "2500.0"),
            ("backtest", "start_date", "2020-01-01"),
            ("backtest", "end_date", "2024-12-31"),
        ]);

        let request = build_request(&config, &RequestOverrides::default()).unwrap();
        assert_eq!(request.ticker, "AAPL");
        assert_eq!(request.strategy, "Buy and Hold");
        assert!((request.initial_capital - 2500.0).abs() < f64::EPSILON);
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(request.end_date, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn overrides_beat_config_values() {
        let config = MapConfig::new(&[
            ("backtest", "ticker", "AAPL"),
            ("backtest", "initial_capital", "2500.0"),
        ]);
        let overrides = RequestOverrides {
            ticker: Some("MSFT".into()),
            initial_capital: Some(1000.0),
            ..Default::default()
        };

        let request = build_request(&config, &overrides).unwrap();
        assert_eq!(request.ticker, "MSFT");
        assert!((request.initial_capital - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_ticker_is_config_missing() {
        let config = MapConfig::new(&[]);
        let err = build_request(&config, &RequestOverrides::default()).unwrap_err();
        assert!(matches!(err, RewindError::ConfigMissing { .. }));
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = MapConfig::new(&[("backtest", "ticker", "AAPL")]);
        let request = build_request(&config, &RequestOverrides::default()).unwrap();
        assert_eq!(request.strategy, "buy and hold");
        assert!((request.initial_capital - 10_000.0).abs() < f64::EPSILON);
        assert_eq!(request.start_date, None);
        assert_eq!(request.end_date, None);
    }

    #[test]
    fn bad_date_format_rejected() {
        let config = MapConfig::new(&[
            ("backtest", "ticker", "AAPL"),
            ("backtest", "start_date", "01/02/2020"),
        ]);
        let err = build_request(&config, &RequestOverrides::default()).unwrap_err();
        assert!(matches!(err, RewindError::ConfigInvalid { .. }));
    }

    #[test]
    fn inverted_config_dates_rejected() {
        let config = MapConfig::new(&[
            ("backtest", "ticker", "AAPL"),
            ("backtest", "start_date", "2024-06-01"),
            ("backtest", "end_date", "2024-01-01"),
        ]);
        let err = build_request(&config, &RequestOverrides::default()).unwrap_err();
        assert!(matches!(err, RewindError::ConfigInvalid { .. }));
    }

    #[test]
    fn non_positive_capital_rejected() {
        let config = MapConfig::new(&[
            ("backtest", "ticker", "AAPL"),
            ("backtest", "initial_capital", "-100"),
        ]);
        let err = build_request(&config, &RequestOverrides::default()).unwrap_err();
        assert!(matches!(err, RewindError::ConfigInvalid { .. }));
    }

    #[test]
    fn data_path_prefers_override() {
        let config = MapConfig::new(&[("data", "path", "/srv/data")]);
        assert_eq!(data_path(&config, Some("/tmp/d")).unwrap(), "/tmp/d");
        assert_eq!(data_path(&config, None).unwrap(), "/srv/data");
        let empty = MapConfig::new(&[]);
        assert!(data_path(&empty, None).is_err());
    }
}
