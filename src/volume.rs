use crate::series;

/// Finds the day with the highest trading volume.
///
/// Only a strictly greater volume replaces the current candidate, so among
/// equal volumes the earliest day is returned.
///
/// # Arguments
/// * `series` - Daily observations.
///
/// # Returns
/// * `Option<Sample>` - Timestamp and volume of the peak day, `None` for an empty series.
pub fn highest_volume_day(series: &series::DailySeries) -> Option<series::Sample> {
    let (first, rest) = series.total_volumes.split_first()?;
    let peak = rest
        .iter()
        .fold(*first, |best, sample| if sample.value > best.value { *sample } else { best });
    Some(peak)
}
