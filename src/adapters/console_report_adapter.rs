//! Console report adapter.
//!
//! Renders one finished run as an aligned key/value table on stdout.
//! Return-like statistics are shown as percentages; undefined statistics
//! print as "n/a" rather than being dropped.

use crate::domain::error::RewindError;
use crate::domain::metrics::Summary;
use crate::domain::simulation::SimulationPoint;
use crate::ports::report_port::ReportPort;

pub struct ConsoleReportAdapter;

impl ReportPort for ConsoleReportAdapter {
    fn render(
        &self,
        series: &[SimulationPoint],
        summary: &Summary,
        initial_capital: f64,
    ) -> Result<(), RewindError> {
        print!("{}", format_report(series, summary, initial_capital));
        Ok(())
    }
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn opt_pct(value: Option<f64>) -> String {
    value.map(pct).unwrap_or_else(|| "n/a".to_string())
}

fn opt_num(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

pub fn format_report(
    series: &[SimulationPoint],
    summary: &Summary,
    initial_capital: f64,
) -> String {
    let mut out = String::new();

    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        out.push_str(&format!(
            "Backtest {} .. {} ({} trading days)\n",
            first.date,
            last.date,
            series.len()
        ));
        out.push_str(&format!(
            "Capital {:.2} -> {:.2}\n\n",
            initial_capital, last.portfolio_value
        ));
    }

    let rows: Vec<(&str, String)> = vec![
        ("Total Return", pct(summary.total_return)),
        ("Annualized Return", pct(summary.annualized_return)),
        (
            "Annualized Sharpe Ratio",
            opt_num(summary.annualized_sharpe),
        ),
        ("Max Drawdown", pct(summary.max_drawdown)),
        (
            "Annualized Volatility",
            opt_pct(summary.annualized_volatility),
        ),
        ("Win Rate", pct(summary.win_rate)),
        ("Avg 1D Return", opt_pct(summary.avg_return_1d)),
        ("Avg 5D Return", opt_pct(summary.avg_return_5d)),
        ("Avg 20D Return", opt_pct(summary.avg_return_20d)),
        ("% Above SMA200", opt_pct(summary.pct_above_sma_200)),
        ("Average RSI", opt_num(summary.avg_rsi_14)),
        ("Average ATR", opt_num(summary.avg_atr_14)),
        (
            "Average 20D Volatility",
            opt_pct(summary.avg_volatility_20d),
        ),
        ("Average Volume Ratio", opt_num(summary.avg_volume_ratio)),
    ];

    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in rows {
        out.push_str(&format!("{key:<width$}  {value}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::IndicatorSnapshot;
    use chrono::NaiveDate;

    fn sample_summary() -> Summary {
        Summary {
            total_return: 0.21,
            annualized_return: 0.05,
            annualized_sharpe: Some(1.5),
            max_drawdown: -0.10,
            annualized_volatility: Some(0.18),
            win_rate: 0.5,
            avg_return_1d: Some(0.001),
            avg_return_5d: None,
            avg_return_20d: None,
            pct_above_sma_200: None,
            avg_rsi_14: Some(55.0),
            avg_atr_14: None,
            avg_volatility_20d: None,
            avg_volume_ratio: None,
        }
    }

    fn sample_series() -> Vec<SimulationPoint> {
        vec![
            SimulationPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                position: 10.0,
                price: 100.0,
                portfolio_value: 1000.0,
                daily_return: 0.0,
                cumulative_profit: 0.0,
                drawdown: 0.0,
                indicators: IndicatorSnapshot::default(),
            },
            SimulationPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                position: 10.0,
                price: 121.0,
                portfolio_value: 1210.0,
                daily_return: 0.21,
                cumulative_profit: 210.0,
                drawdown: 0.0,
                indicators: IndicatorSnapshot::default(),
            },
        ]
    }

    #[test]
    fn report_has_every_summary_key() {
        let text = format_report(&sample_series(), &sample_summary(), 1000.0);
        for key in [
            "Total Return",
            "Annualized Return",
            "Annualized Sharpe Ratio",
            "Max Drawdown",
            "Annualized Volatility",
            "Win Rate",
            "Avg 1D Return",
            "Avg 5D Return",
            "Avg 20D Return",
            "% Above SMA200",
            "Average RSI",
            "Average ATR",
            "Average 20D Volatility",
            "Average Volume Ratio",
        ] {
            assert!(text.contains(key), "missing {key} in:\n{text}");
        }
    }

    #[test]
    fn percentages_formatted_as_such() {
        let text = format_report(&sample_series(), &sample_summary(), 1000.0);
        assert!(text.contains("21.00%"));
        assert!(text.contains("-10.00%"));
    }

    #[test]
    fn undefined_statistics_print_as_na() {
        let text = format_report(&sample_series(), &sample_summary(), 1000.0);
        assert!(text.contains("n/a"));
    }

    #[test]
    fn header_shows_range_and_final_value() {
        let text = format_report(&sample_series(), &sample_summary(), 1000.0);
        assert!(text.contains("2024-01-02 .. 2024-01-03"));
        assert!(text.contains("1000.00 -> 1210.00"));
    }

    #[test]
    fn empty_series_renders_table_only() {
        let text = format_report(&[], &sample_summary(), 1000.0);
        assert!(!text.contains(".."));
        assert!(text.contains("Total Return"));
    }
}
