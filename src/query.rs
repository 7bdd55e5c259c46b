use crate::analysis;
use crate::error::QueryError;
use crate::series;
use crate::utils;

use tracing::{debug, error};

/// Hours added on each side of the range so both midnights are covered.
const WINDOW_PADDING_HOURS: i64 = 1;

/// A validated search range, both ends at midnight UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: chrono::DateTime<chrono::Utc>,
    pub end: chrono::DateTime<chrono::Utc>,
}

/// Range sent to the data source, in whole epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub from: i64,
    pub to: i64,
}

/// A remote or local provider of raw price history.
pub trait PriceHistorySource {
    /// Returns the complete raw series for the window, or fails as a whole.
    fn fetch_range(
        &self,
        window: &QueryWindow,
    ) -> impl std::future::Future<Output = anyhow::Result<series::RawSeries>> + Send;
}

/// Validates user supplied start and end dates.
///
/// Checks run in a fixed order: both dates must parse, must differ, must not
/// lie after `now`, and the start must precede the end.
///
/// # Arguments
/// * `start` - Start date as typed by the user.
/// * `end` - End date as typed by the user.
/// * `now` - Current instant, injected so validation is reproducible.
///
/// # Returns
/// * `Result<DateRange, QueryError>` - The range, or the first validation failure.
pub fn validate_range(
    start: &str,
    end: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<DateRange, QueryError> {
    let start = utils::parse_date_input(start).map_err(|e| QueryError::InvalidFormat(e.to_string()))?;
    let end = utils::parse_date_input(end).map_err(|e| QueryError::InvalidFormat(e.to_string()))?;

    if start == end {
        return Err(QueryError::SameDate);
    }
    if start > now || end > now {
        return Err(QueryError::FutureDate { now });
    }
    if start > end {
        return Err(QueryError::StartAfterEnd);
    }
    Ok(DateRange { start, end })
}

impl DateRange {
    /// Widens the range by an hour on each side and truncates to epoch seconds.
    pub fn window(&self) -> anyhow::Result<QueryWindow> {
        let from = utils::remove_hours(self.start.timestamp_millis(), WINDOW_PADDING_HOURS)?;
        let to = utils::add_hours(self.end.timestamp_millis(), WINDOW_PADDING_HOURS)?;
        anyhow::Ok(QueryWindow {
            from: from.div_euclid(1000),
            to: to.div_euclid(1000),
        })
    }
}

/// Fetches the raw series for a validated range and runs the analysis on it.
///
/// Any failure of the source, including a payload that breaks the alignment
/// invariants, is reported as `QueryError::ServiceUnavailable`; the cause is
/// only logged.
///
/// # Arguments
/// * `source` - Data source to query once.
/// * `range` - Validated date range.
///
/// # Returns
/// * `Result<Analysis, QueryError>` - The result bundle or a user-facing error.
pub async fn run_query<S>(source: &S, range: &DateRange) -> Result<analysis::Analysis, QueryError>
where
    S: PriceHistorySource + Sync,
{
    let window = range.window().map_err(|e| QueryError::InvalidFormat(e.to_string()))?;
    debug!(from = window.from, to = window.to, "Querying price history");

    let raw = source.fetch_range(&window).await.map_err(unavailable)?;
    raw.validate().map_err(unavailable)?;
    analysis::analyze(&raw).map_err(unavailable)
}

fn unavailable(err: anyhow::Error) -> QueryError {
    error!("Price history unavailable: {:#}", err);
    QueryError::ServiceUnavailable(format!("{:#}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{RawSeries, TradeRecommendation};
    use chrono::TimeZone;

    fn now() -> chrono::DateTime<chrono::Utc> {
        chrono::Utc.with_ymd_and_hms(2022, 6, 1, 12, 0, 0).unwrap()
    }

    struct StaticSource {
        payload: Option<RawSeries>,
        seen: std::sync::Mutex<Option<QueryWindow>>,
    }

    impl StaticSource {
        fn new(payload: Option<RawSeries>) -> Self {
            Self { payload, seen: std::sync::Mutex::new(None) }
        }
    }

    impl PriceHistorySource for StaticSource {
        fn fetch_range(
            &self,
            window: &QueryWindow,
        ) -> impl std::future::Future<Output = anyhow::Result<RawSeries>> + Send {
            *self.seen.lock().unwrap() = Some(*window);
            let result = self
                .payload
                .clone()
                .ok_or_else(|| anyhow::anyhow!("connection refused"));
            async move { result }
        }
    }

    #[test]
    fn test_valid_range() {
        let range = validate_range("2021-01-01", "2021-01-05", now()).unwrap();
        assert_eq!(range.start.timestamp_millis(), 1_609_459_200_000);
        assert_eq!(range.end.timestamp_millis(), 1_609_804_800_000);
    }

    #[test]
    fn test_invalid_format() {
        let err = validate_range("01/01/2021", "2021-01-05", now()).unwrap_err();
        assert!(matches!(err, QueryError::InvalidFormat(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn test_same_date() {
        let err = validate_range("2021-01-01", "01-01-2021", now()).unwrap_err();
        assert!(matches!(err, QueryError::SameDate));
        assert!(err.to_string().contains("can't be same date"));
    }

    #[test]
    fn test_future_date() {
        let err = validate_range("2021-01-01", "2022-06-02", now()).unwrap_err();
        assert!(matches!(err, QueryError::FutureDate { .. }));
    }

    #[test]
    fn test_future_check_precedes_order_check() {
        let err = validate_range("2023-01-01", "2021-01-01", now()).unwrap_err();
        assert!(matches!(err, QueryError::FutureDate { .. }));
    }

    #[test]
    fn test_start_after_end() {
        let err = validate_range("2021-01-05", "2021-01-01", now()).unwrap_err();
        assert!(matches!(err, QueryError::StartAfterEnd));
    }

    #[test]
    fn test_window_is_padded_by_an_hour() {
        let range = validate_range("2021-01-01", "2021-01-05", now()).unwrap();
        let window = range.window().unwrap();
        assert_eq!(window, QueryWindow { from: 1_609_455_600, to: 1_609_808_400 });
        assert_eq!(window.from.to_string().len(), 10);
    }

    #[tokio::test]
    async fn test_run_query_analyzes_payload() {
        let payload = RawSeries::from_rows([
            (1_609_459_200_000, 10.0, 5.0),
            (1_609_545_600_000, 8.0, 5.0),
            (1_609_632_000_000, 12.0, 5.0),
        ]);
        let source = StaticSource::new(Some(payload));
        let range = validate_range("2021-01-01", "2021-01-03", now()).unwrap();

        let analysis = run_query(&source, &range).await.unwrap();
        assert_eq!(analysis.longest_downward_run, 1);
        assert_eq!(
            analysis.trade,
            Some(TradeRecommendation { buy_index: 1, sell_index: Some(2) })
        );
        assert_eq!(*source.seen.lock().unwrap(), Some(range.window().unwrap()));
    }

    #[tokio::test]
    async fn test_source_failure_is_service_unavailable() {
        let source = StaticSource::new(None);
        let range = validate_range("2021-01-01", "2021-01-03", now()).unwrap();
        let err = run_query(&source, &range).await.unwrap_err();
        assert!(matches!(err, QueryError::ServiceUnavailable(_)));
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Something went wrong. Take contact to service provider.");
    }

    #[tokio::test]
    async fn test_misaligned_payload_is_service_unavailable() {
        let mut payload = RawSeries::from_rows([(0, 1.0, 1.0), (86_400_000, 2.0, 2.0)]);
        payload.total_volumes.pop();
        let source = StaticSource::new(Some(payload));
        let range = validate_range("2021-01-01", "2021-01-03", now()).unwrap();
        let err = run_query(&source, &range).await.unwrap_err();
        assert!(matches!(err, QueryError::ServiceUnavailable(_)));
    }
}
