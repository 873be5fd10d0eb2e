//! Summary statistics derived from a simulation series.

use crate::domain::bar::IndicatorSnapshot;
use crate::domain::error::RewindError;
use crate::domain::simulation::SimulationPoint;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Fixed-shape summary of one backtest run. Always recomputed wholesale;
/// `Option` fields are explicit undefined sentinels, never NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_return: f64,
    pub annualized_return: f64,
    /// mean(r)/stddev(r) * sqrt(252); `None` when the sample stddev is zero
    /// or undefined (fewer than two rows).
    pub annualized_sharpe: Option<f64>,
    pub max_drawdown: f64,
    /// stddev(r) * sqrt(252); `None` when fewer than two rows.
    pub annualized_volatility: Option<f64>,
    pub win_rate: f64,

    // Means of the technical fields over the evaluated range. Undefined rows
    // are excluded per field; `None` when no row in range defines the field.
    pub avg_return_1d: Option<f64>,
    pub avg_return_5d: Option<f64>,
    pub avg_return_20d: Option<f64>,
    pub pct_above_sma_200: Option<f64>,
    pub avg_rsi_14: Option<f64>,
    pub avg_atr_14: Option<f64>,
    pub avg_volatility_20d: Option<f64>,
    pub avg_volume_ratio: Option<f64>,
}

impl Summary {
    pub fn compute(
        series: &[SimulationPoint],
        initial_capital: f64,
    ) -> Result<Summary, RewindError> {
        if !(initial_capital.is_finite() && initial_capital > 0.0) {
            return Err(RewindError::InvalidInput {
                reason: format!("initial capital must be positive, got {initial_capital}"),
            });
        }

        let rows: Vec<&SimulationPoint> = series
            .iter()
            .filter(|p| p.portfolio_value.is_finite() && p.daily_return.is_finite())
            .collect();

        if rows.is_empty() {
            return Err(RewindError::InsufficientData {
                reason: "no usable rows after filtering".into(),
            });
        }

        let n = rows.len() as f64;
        let returns: Vec<f64> = rows.iter().map(|p| p.daily_return).collect();

        let total_return = rows.last().unwrap().portfolio_value / initial_capital - 1.0;
        let annualized_return = (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / n) - 1.0;

        let stddev = sample_stddev(&returns);
        let mean_return = returns.iter().sum::<f64>() / n;

        let annualized_sharpe = match stddev {
            Some(sd) if sd > 0.0 => Some(mean_return / sd * TRADING_DAYS_PER_YEAR.sqrt()),
            _ => None,
        };
        let annualized_volatility = stddev.map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt());

        let max_drawdown = rows.iter().map(|p| p.drawdown).fold(f64::INFINITY, f64::min);

        let win_rate = returns.iter().filter(|&&r| r > 0.0).count() as f64 / n;

        Ok(Summary {
            total_return,
            annualized_return,
            annualized_sharpe,
            max_drawdown,
            annualized_volatility,
            win_rate,
            avg_return_1d: field_mean(&rows, |s| s.return_1d),
            avg_return_5d: field_mean(&rows, |s| s.return_5d),
            avg_return_20d: field_mean(&rows, |s| s.return_20d),
            pct_above_sma_200: pct_above_sma_200(&rows),
            avg_rsi_14: field_mean(&rows, |s| s.rsi_14),
            avg_atr_14: field_mean(&rows, |s| s.atr_14),
            avg_volatility_20d: field_mean(&rows, |s| s.volatility_20d),
            avg_volume_ratio: field_mean(&rows, |s| s.volume_ratio),
        })
    }
}

/// Sample standard deviation (n-1 divisor); undefined below two values.
fn sample_stddev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(var.sqrt())
}

/// Mean of one technical field over the rows where it is defined.
fn field_mean(
    rows: &[&SimulationPoint],
    field: fn(&IndicatorSnapshot) -> Option<f64>,
) -> Option<f64> {
    let defined: Vec<f64> = rows.iter().filter_map(|p| field(&p.indicators)).collect();
    if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }
}

/// Fraction of rows with a defined long moving average whose close sits above
/// it. Rows inside the warm-up window are excluded from the denominator.
fn pct_above_sma_200(rows: &[&SimulationPoint]) -> Option<f64> {
    let mut defined = 0usize;
    let mut above = 0usize;
    for p in rows {
        if let Some(sma) = p.indicators.sma_200 {
            defined += 1;
            if p.price > sma {
                above += 1;
            }
        }
    }
    if defined == 0 {
        None
    } else {
        Some(above as f64 / defined as f64)
    }
}
