//! Daily simulation series produced by strategy evaluation.

use crate::domain::bar::IndicatorSnapshot;
use chrono::NaiveDate;

/// One day of an evaluated strategy: the equity-curve row plus the underlying
/// bar's technical snapshot, carried through so summarization needs nothing
/// but this series.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPoint {
    pub date: NaiveDate,
    /// Quantity held; fractional shares allowed.
    pub position: f64,
    /// Close of the underlying bar.
    pub price: f64,
    /// position * price
    pub portfolio_value: f64,
    /// Fractional change of portfolio_value from the prior row; first row 0.
    pub daily_return: f64,
    /// portfolio_value - initial capital
    pub cumulative_profit: f64,
    /// portfolio_value / running max - 1; always <= 0.
    pub drawdown: f64,
    pub indicators: IndicatorSnapshot,
}
