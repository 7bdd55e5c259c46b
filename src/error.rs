//! User-facing errors of the range query.

use thiserror::Error;

/// Failures surfaced to the user before or instead of a report.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Wrong input format. Type the search time in format: YYYY-MM-DD or DD-MM-YYYY.")]
    InvalidFormat(String),

    #[error("Wrong search time input. Starting and ending date can't be same date.")]
    SameDate,

    #[error("Wrong search time input. Search starting date or ending date can't be later than {now}.")]
    FutureDate { now: chrono::DateTime<chrono::Utc> },

    #[error("Wrong search time input. Starting date is later than ending date.")]
    StartAfterEnd,

    /// The cause is kept for logs; the message stays generic.
    #[error("Something went wrong. Take contact to service provider.")]
    ServiceUnavailable(String),
}

impl QueryError {
    /// Whether the error comes from the user's input rather than the data source.
    pub fn is_validation(&self) -> bool {
        !matches!(self, QueryError::ServiceUnavailable(_))
    }
}
