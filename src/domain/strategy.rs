//! Strategy contract, baseline implementation, and registry.

use crate::domain::bar::{validate_series, PriceBar};
use crate::domain::error::RewindError;
use crate::domain::simulation::SimulationPoint;

/// A strategy maps a validated price series and starting capital to a full
/// daily simulation series. Implementations are pure: identical inputs give
/// bitwise-identical output.
pub trait Strategy {
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        bars: &[PriceBar],
        initial_capital: f64,
    ) -> Result<Vec<SimulationPoint>, RewindError>;
}

impl std::fmt::Debug for dyn Strategy + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name()).finish()
    }
}

/// Shared precondition check for every strategy: series invariants plus
/// positive capital. Out-of-order input is rejected, never reordered.
pub fn check_inputs(bars: &[PriceBar], initial_capital: f64) -> Result<(), RewindError> {
    validate_series(bars)?;
    if !(initial_capital.is_finite() && initial_capital > 0.0) {
        return Err(RewindError::InvalidInput {
            reason: format!("initial capital must be positive, got {initial_capital}"),
        });
    }
    Ok(())
}

/// Buy at the first close with the full capital, hold the exact share count
/// for the rest of the series. No rebalancing, no rounding.
pub struct BuyAndHold;

impl Strategy for BuyAndHold {
    fn name(&self) -> &str {
        "buy and hold"
    }

    fn evaluate(
        &self,
        bars: &[PriceBar],
        initial_capital: f64,
    ) -> Result<Vec<SimulationPoint>, RewindError> {
        check_inputs(bars, initial_capital)?;

        let shares = initial_capital / bars[0].close;

        let mut points = Vec::with_capacity(bars.len());
        let mut prev_value = f64::NAN;
        let mut running_max = f64::NEG_INFINITY;

        for (i, bar) in bars.iter().enumerate() {
            let value = shares * bar.close;
            let daily_return = if i == 0 { 0.0 } else { value / prev_value - 1.0 };
            if value > running_max {
                running_max = value;
            }

            points.push(SimulationPoint {
                date: bar.date,
                position: shares,
                price: bar.close,
                portfolio_value: value,
                daily_return,
                cumulative_profit: value - initial_capital,
                drawdown: value / running_max - 1.0,
                indicators: bar.indicators.clone(),
            });

            prev_value = value;
        }

        Ok(points)
    }
}

/// Dispatch from strategy name to implementation. Case-insensitive exact
/// match after trimming; no fuzzy or partial matching, so a typo can never
/// silently run the wrong strategy.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        self.strategies.push(strategy);
    }

    pub fn resolve(&self, name: &str) -> Result<&dyn Strategy, RewindError> {
        let wanted = name.trim().to_lowercase();
        self.strategies
            .iter()
            .find(|s| s.name().to_lowercase() == wanted)
            .map(|s| s.as_ref())
            .ok_or_else(|| RewindError::UnknownStrategy {
                name: name.to_string(),
                registered: self
                    .strategies
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(BuyAndHold));
        registry
    }
}
