//! Price history access port trait.

use crate::domain::bar::PriceBar;
use crate::domain::error::RewindError;
use chrono::NaiveDate;

/// Supplies validated, chronologically ordered daily price series.
///
/// `query` is a ticker symbol or a company name. Implementations must fail
/// distinguishably: empty query (`InvalidInput`), unknown instrument
/// (`NotFound`), name mapping to several tickers (`AmbiguousTicker`), range
/// with no overlap (`NotFound`), start after end (`InvalidInput`). Omitted
/// bounds default to the instrument's full available range.
pub trait HistoryPort {
    fn get_history(
        &self,
        query: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, RewindError>;

    /// (first date, last date, row count) for the resolved instrument.
    fn available_range(&self, query: &str) -> Result<(NaiveDate, NaiveDate, usize), RewindError>;

    /// All known (ticker, company name) pairs, sorted by ticker.
    fn list_instruments(&self) -> Result<Vec<(String, String)>, RewindError>;
}
