//! Backtest orchestration.
//!
//! Sequences provider → strategy registry → evaluation → summarization →
//! report. Every failure propagates to the caller unchanged; there is no
//! recovery and no retry at this level.

use crate::domain::error::RewindError;
use crate::domain::metrics::Summary;
use crate::domain::simulation::SimulationPoint;
use crate::domain::strategy::StrategyRegistry;
use crate::ports::history_port::HistoryPort;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;

/// The five logical parameters of one run.
#[derive(Debug, Clone)]
pub struct BacktestRequest {
    pub ticker: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub strategy: String,
    pub initial_capital: f64,
}

#[derive(Debug, Clone)]
pub struct BacktestOutcome {
    pub series: Vec<SimulationPoint>,
    pub summary: Summary,
}

/// Run one backtest end to end and hand the result to the report port.
pub fn run_backtest(
    provider: &dyn HistoryPort,
    registry: &StrategyRegistry,
    report: &dyn ReportPort,
    request: &BacktestRequest,
) -> Result<BacktestOutcome, RewindError> {
    // Argument checks come before any data is touched.
    if !(request.initial_capital.is_finite() && request.initial_capital > 0.0) {
        return Err(RewindError::InvalidInput {
            reason: format!(
                "initial capital must be positive, got {}",
                request.initial_capital
            ),
        });
    }
    if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
        if start > end {
            return Err(RewindError::InvalidInput {
                reason: format!("start date {start} is after end date {end}"),
            });
        }
    }

    let bars = provider.get_history(&request.ticker, request.start_date, request.end_date)?;

    let strategy = registry.resolve(&request.strategy)?;
    let series = strategy.evaluate(&bars, request.initial_capital)?;
    let summary = Summary::compute(&series, request.initial_capital)?;

    report.render(&series, &summary, request.initial_capital)?;

    Ok(BacktestOutcome { series, summary })
}
