use crate::series;

/// Counts the longest run of consecutive days with a strictly lower price
/// than the day before.
///
/// Equal consecutive prices break the run. Series shorter than two days, or
/// series that never decline, return 0.
pub fn longest_downward_run(series: &series::DailySeries) -> usize {
    let mut longest = 0;
    let mut current = 0;

    for pair in series.prices.windows(2) {
        if pair[1].value < pair[0].value {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
