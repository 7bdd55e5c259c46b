use crate::series;

use rayon::prelude::*;

/// Below this many days the parallel scan costs more than it saves.
pub const PARALLEL_MIN_DAYS: usize = 256;

/// Best exit found for one buy day.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    profit: f64,
    buy: series::DayIndex,
    sell: series::DayIndex,
}

/// Profit of buying on day `buy` and selling on day `sell`, capped by volume.
///
/// When the buy day traded less than the sell day, only that fraction of the
/// sell day's market can be bought, so the price move is scaled by
/// `volume[buy] / volume[sell]`. Otherwise the raw price difference applies.
pub fn capped_profit(series: &series::DailySeries, buy: series::DayIndex, sell: series::DayIndex) -> f64 {
    let ratio = series.volume(buy) / series.volume(sell);
    let spread = series.price(sell) - series.price(buy);
    if ratio < 1.0 { ratio * spread } else { spread }
}

/// Index of the first occurrence of the lowest price.
fn min_price_index(series: &series::DailySeries) -> series::DayIndex {
    let mut min_index = 0;
    for i in 1..series.len() {
        if series.price(i) < series.price(min_index) {
            min_index = i;
        }
    }
    min_index
}

fn recommendation(series: &series::DailySeries, best: Option<Candidate>) -> series::TradeRecommendation {
    match best {
        Some(c) => series::TradeRecommendation { buy_index: c.buy, sell_index: Some(c.sell) },
        None => series::TradeRecommendation { buy_index: min_price_index(series), sell_index: None },
    }
}

/// Best strictly positive exit for a single buy day, earliest sell day on ties.
fn best_sell_for(series: &series::DailySeries, buy: series::DayIndex) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let buy_ts = series.timestamp(buy);
    for sell in buy + 1..series.len() {
        if series.timestamp(sell) <= buy_ts {
            continue;
        }
        let profit = capped_profit(series, buy, sell);
        if profit > best.map_or(0.0, |c| c.profit) {
            best = Some(Candidate { profit, buy, sell });
        }
    }
    best
}

/// Merges two candidates: higher profit wins, then earlier buy, then earlier sell.
fn better(a: Candidate, b: Candidate) -> Candidate {
    if b.profit > a.profit {
        b
    } else if a.profit > b.profit {
        a
    } else if (b.buy, b.sell) < (a.buy, a.sell) {
        b
    } else {
        a
    }
}

/// Reference O(n²) scan over every buy/sell pair.
///
/// Pairs are visited buy day ascending, then sell day ascending, and the
/// current best is only replaced by a strictly greater profit starting from
/// zero. If no pair is profitable the recommendation is to buy at the lowest
/// price and hold.
///
/// # Arguments
/// * `series` - Daily observations.
///
/// # Returns
/// * `Option<TradeRecommendation>` - `None` only for an empty series.
pub fn best_trade_sequential(series: &series::DailySeries) -> Option<series::TradeRecommendation> {
    if series.is_empty() {
        return None;
    }

    let mut profit = 0.0;
    let mut best: Option<Candidate> = None;
    for buy in 0..series.len() {
        for sell in buy + 1..series.len() {
            if series.timestamp(sell) <= series.timestamp(buy) {
                continue;
            }
            let day_profit = capped_profit(series, buy, sell);
            if day_profit > profit {
                profit = day_profit;
                best = Some(Candidate { profit, buy, sell });
            }
        }
    }
    Some(recommendation(series, best))
}

/// Same result as `best_trade_sequential`, with buy days split across the
/// current Rayon pool.
pub fn best_trade_parallel(series: &series::DailySeries) -> Option<series::TradeRecommendation> {
    if series.is_empty() {
        return None;
    }

    let best = (0..series.len())
        .into_par_iter()
        .filter_map(|buy| best_sell_for(series, buy))
        .reduce_with(better);
    Some(recommendation(series, best))
}

/// Picks the scan that suits the series length.
pub fn best_trade(series: &series::DailySeries) -> Option<series::TradeRecommendation> {
    if series.len() < PARALLEL_MIN_DAYS {
        best_trade_sequential(series)
    } else {
        best_trade_parallel(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{DailySeries, RawSeries, TradeRecommendation};

    const DAY_MS: i64 = 86_400_000;

    fn daily(rows: &[(f64, f64)]) -> DailySeries {
        let raw = RawSeries::from_rows(
            rows.iter().enumerate().map(|(i, (p, v))| (i as i64 * DAY_MS, *p, *v)),
        );
        DailySeries::from(&raw)
    }

    fn both(series: &DailySeries) -> Option<TradeRecommendation> {
        let seq = best_trade_sequential(series);
        assert_eq!(seq, best_trade_parallel(series));
        seq
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(both(&daily(&[])), None);
    }

    #[test]
    fn test_single_day_holds() {
        let rec = both(&daily(&[(10.0, 1.0)])).unwrap();
        assert_eq!(rec, TradeRecommendation { buy_index: 0, sell_index: None });
        assert!(rec.is_hold());
    }

    #[test]
    fn test_equal_volumes_buy_low_sell_high() {
        let series = daily(&[(10.0, 5.0), (8.0, 5.0), (12.0, 5.0)]);
        let rec = both(&series).unwrap();
        assert_eq!(rec, TradeRecommendation { buy_index: 1, sell_index: Some(2) });
        assert_eq!(capped_profit(&series, 1, 2), 4.0);
    }

    #[test]
    fn test_lower_buy_volume_caps_profit() {
        let series = daily(&[(10.0, 10.0), (20.0, 20.0)]);
        assert_eq!(capped_profit(&series, 0, 1), 5.0);
    }

    #[test]
    fn test_higher_buy_volume_is_uncapped() {
        let series = daily(&[(10.0, 30.0), (20.0, 20.0)]);
        assert_eq!(capped_profit(&series, 0, 1), 10.0);
    }

    #[test]
    fn test_zero_sell_volume_is_uncapped() {
        // 5 / 0 is infinite, which is not below 1
        let series = daily(&[(10.0, 5.0), (20.0, 0.0)]);
        assert_eq!(capped_profit(&series, 0, 1), 10.0);
        assert_eq!(both(&series).unwrap(), TradeRecommendation { buy_index: 0, sell_index: Some(1) });
    }

    #[test]
    fn test_zero_buy_volume_yields_no_profit() {
        let series = daily(&[(10.0, 0.0), (20.0, 5.0)]);
        assert_eq!(capped_profit(&series, 0, 1), 0.0);
        assert_eq!(both(&series).unwrap(), TradeRecommendation { buy_index: 0, sell_index: None });
    }

    #[test]
    fn test_zero_volumes_on_both_days_are_uncapped() {
        // 0 / 0 is NaN, which is not below 1
        let series = daily(&[(10.0, 0.0), (20.0, 0.0)]);
        assert_eq!(capped_profit(&series, 0, 1), 10.0);
    }

    #[test]
    fn test_scans_agree_with_zero_volumes() {
        let series = daily(&[
            (10.0, 0.0),
            (12.0, 4.0),
            (7.0, 0.0),
            (9.0, 2.0),
            (15.0, 0.0),
            (11.0, 6.0),
            (14.0, 0.0),
        ]);
        let rec = both(&series).unwrap();
        assert_eq!(rec, TradeRecommendation { buy_index: 2, sell_index: Some(4) });
    }

    #[test]
    fn test_volume_cap_changes_choice() {
        // buying day 0 at 5 looks best, but its tiny volume caps the gain to 1.5
        let series = daily(&[(5.0, 1.0), (10.0, 100.0), (20.0, 10.0)]);
        let rec = both(&series).unwrap();
        assert_eq!(rec, TradeRecommendation { buy_index: 1, sell_index: Some(2) });
    }

    #[test]
    fn test_decreasing_prices_hold_at_minimum() {
        let series = daily(&[(5.0, 1.0), (4.0, 1.0), (3.0, 1.0), (2.0, 1.0)]);
        let rec = both(&series).unwrap();
        assert_eq!(rec, TradeRecommendation { buy_index: 3, sell_index: None });
    }

    #[test]
    fn test_hold_uses_first_global_minimum() {
        // flat stretches are never profitable
        let flat = daily(&[(5.0, 1.0), (2.0, 1.0), (2.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        assert_eq!(both(&flat).unwrap(), TradeRecommendation { buy_index: 3, sell_index: None });
    }

    #[test]
    fn test_ties_keep_earliest_pair() {
        let series = daily(&[(1.0, 1.0), (2.0, 1.0), (1.0, 1.0), (2.0, 1.0)]);
        let rec = both(&series).unwrap();
        assert_eq!(rec, TradeRecommendation { buy_index: 0, sell_index: Some(1) });
    }

    #[test]
    fn test_duplicate_timestamps_never_pair() {
        let raw = RawSeries::from_rows([(0, 1.0, 1.0), (DAY_MS, 5.0, 1.0), (DAY_MS, 9.0, 1.0)]);
        let series = DailySeries::from(&raw);
        let rec = both(&series).unwrap();
        assert_eq!(rec, TradeRecommendation { buy_index: 0, sell_index: Some(2) });
        let same_day = DailySeries::from(&RawSeries::from_rows([(0, 1.0, 1.0), (0, 9.0, 1.0)]));
        assert!(both(&same_day).unwrap().is_hold());
    }

    #[test]
    fn test_dispatch_matches_reference_on_long_series() {
        let rows: Vec<(f64, f64)> = (0..PARALLEL_MIN_DAYS + 40)
            .map(|i| {
                let x = i as f64;
                (100.0 + (x * 0.37).sin() * 20.0, 50.0 + (x * 0.11).cos() * 40.0)
            })
            .collect();
        let series = daily(&rows);
        assert_eq!(best_trade(&series), best_trade_sequential(&series));
    }
}
