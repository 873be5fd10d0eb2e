//! Report rendering port trait.

use crate::domain::error::RewindError;
use crate::domain::metrics::Summary;
use crate::domain::simulation::SimulationPoint;

/// Port for presenting one finished run. The caller guarantees `series` is
/// date-ordered and `summary` fully populated (undefined statistics are
/// `None`, never missing).
pub trait ReportPort {
    fn render(
        &self,
        series: &[SimulationPoint],
        summary: &Summary,
        initial_capital: f64,
    ) -> Result<(), RewindError>;
}
