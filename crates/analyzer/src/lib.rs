pub mod aggregator;
pub mod config;
pub mod indicators;
pub mod scorers;

pub use config::ScoringConfig;

use common::{MarketSnapshot, Result, Setup};
use tracing::debug;

/// Full scoring pipeline for one symbol: validated snapshot → indicators →
/// component scores → aggregated setup.
///
/// Pure CPU work, deterministic for a given snapshot and config. Fails only
/// on a malformed snapshot; short candle histories degrade individual
/// scorers to their neutral default instead of failing the whole setup.
pub fn analyze(snapshot: &MarketSnapshot, cfg: &ScoringConfig) -> Result<Setup> {
    snapshot.validate()?;
    let indicators = indicators::compute_all(&snapshot.candles);
    let scores = scorers::score_all(snapshot, &indicators, cfg);
    let setup = aggregator::build_setup(snapshot, indicators, scores);
    debug!(
        symbol = %setup.symbol,
        score = setup.overall_score,
        signal = %setup.signal,
        "setup scored"
    );
    Ok(setup)
}
