use crate::resample;
use crate::series;
use crate::streak;
use crate::trade;
use crate::volume;

use tracing::info;

/// Everything derived from one raw series.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Analysis {
    pub daily: series::DailySeries,
    pub longest_downward_run: usize,
    pub highest_volume: Option<series::Sample>,
    pub trade: Option<series::TradeRecommendation>,
}

/// Resamples the raw series to daily observations and runs the three analyzers.
///
/// Degenerate inputs give defined results: an empty or sub-day series yields a
/// zero streak, no volume peak and no trade.
///
/// # Arguments
/// * `raw` - Index-aligned price and volume samples.
///
/// # Returns
/// * `anyhow::Result<Analysis>` - The result bundle, or an error from resampling.
pub fn analyze(raw: &series::RawSeries) -> anyhow::Result<Analysis> {
    let daily = resample::resample_daily(raw)?;
    let longest_downward_run = streak::longest_downward_run(&daily);
    let highest_volume = volume::highest_volume_day(&daily);
    let trade = trade::best_trade(&daily);

    info!(
        days = daily.len(),
        longest_downward_run,
        peak_volume = ?highest_volume.map(|s| s.value),
        buy = ?trade.map(|t| t.buy_index),
        sell = ?trade.and_then(|t| t.sell_index),
        "Analysis complete"
    );

    Ok(Analysis {
        daily,
        longest_downward_run,
        highest_volume,
        trade,
    })
}
