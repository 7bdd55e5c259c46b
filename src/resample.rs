use crate::series;
use crate::utils;

use tracing::debug;

/// Widest gap between consecutive samples that is still resampled.
///
/// Each crossed midnight emits one entry, so the gap bounds how many days a
/// single sample can fill.
pub const MAX_GAP_DAYS: i64 = 7;
const DAY_MS: i64 = 86_400_000;

/// Cursor state for the single forward pass over the raw samples.
struct DayCursor {
    index: usize,
    boundary: i64,
}

/// Resamples irregular price/volume samples into one observation per UTC day.
///
/// For every midnight boundary crossed by the raw series, this function picks
/// the existing sample closest in time to that midnight:
/// - `after`: distance from the boundary to the first sample at or past it
/// - `before`: distance from the preceding sample to the boundary
///
/// The later sample wins only when `after < before`; on a tie the earlier
/// sample is kept. The first boundary is the first midnight at or after the
/// first sample, so a series already aligned to midnight passes through
/// unchanged. When the very first sample sits on the boundary there is no
/// preceding sample and it is selected directly.
///
/// The cursor never moves backwards. After a selection the boundary advances
/// by one calendar day and the same sample is re-checked, so a gap longer
/// than a day selects the same sample for each day it spans. Gaps wider than
/// `MAX_GAP_DAYS` are rejected.
///
/// # Arguments
///
/// * `raw` - Index-aligned price and volume samples in ascending time order.
///
/// # Returns
///
/// * `anyhow::Result<DailySeries>` - One entry per boundary crossed, or an error
///   if the volume stream is shorter than the price stream or two samples
///   are more than `MAX_GAP_DAYS` apart.
pub fn resample_daily(raw: &series::RawSeries) -> anyhow::Result<series::DailySeries> {
    let mut daily = series::DailySeries::default();
    let Some(first) = raw.prices.first() else {
        return Ok(daily);
    };

    if let Some(w) = raw
        .prices
        .windows(2)
        .find(|w| w[1].timestamp.saturating_sub(w[0].timestamp) > MAX_GAP_DAYS * DAY_MS)
    {
        return Err(anyhow::anyhow!(
            "Gap of more than {} days between samples at {} and {}",
            MAX_GAP_DAYS,
            w[0].timestamp,
            w[1].timestamp
        ));
    }

    let mut cursor = DayCursor {
        index: 0,
        boundary: utils::next_midnight_inclusive(first.timestamp)?,
    };

    while cursor.index < raw.prices.len() {
        let current = raw.prices[cursor.index];
        if current.timestamp < cursor.boundary {
            cursor.index += 1;
            continue;
        }

        let chosen = match cursor.index.checked_sub(1) {
            Some(prev_index) => {
                let before = cursor.boundary - raw.prices[prev_index].timestamp;
                let after = current.timestamp - cursor.boundary;
                if after < before { cursor.index } else { prev_index }
            }
            None => cursor.index,
        };

        let volume = raw.total_volumes.get(chosen).copied().ok_or_else(|| {
            anyhow::anyhow!("Missing volume sample at index {}", chosen)
        })?;
        daily.push(raw.prices[chosen], volume);

        cursor.boundary = utils::add_days(cursor.boundary, 1)?;
    }

    debug!(
        raw_samples = raw.len(),
        days = daily.len(),
        "Resampled raw series to daily observations"
    );
    Ok(daily)
}
