use chrono::TimeZone;

const MS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Configures a custom Rayon thread pool with specified size.
///
/// The pool is used for the parallel trade scan when the user asks for an
/// explicit thread count, separate from the global Rayon pool.
///
/// # Arguments
/// * `num_threads` - Desired number of threads for the pool.
///
/// # Returns
/// * `Result<ThreadPool>` - Created thread pool or an error if creation fails.
pub fn configure_thread_pool(num_threads: usize) -> anyhow::Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))
}

/// Converts a millisecond Unix timestamp into a UTC `DateTime`.
///
/// # Arguments
/// * `ts_ms` - Milliseconds since epoch.
///
/// # Returns
/// * `anyhow::Result<DateTime<Utc>>` - The instant, or an error if the timestamp is out of chrono's range.
pub fn to_datetime(ts_ms: i64) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    chrono::Utc
        .timestamp_millis_opt(ts_ms)
        .single()
        .ok_or_else(|| anyhow::anyhow!("Timestamp out of range: {}", ts_ms))
}

/// Adds calendar days to a timestamp.
///
/// Day arithmetic is done on the UTC calendar, so month and year boundaries
/// are crossed the same way a calendar would cross them.
///
/// # Arguments
/// * `ts_ms` - Milliseconds since epoch.
/// * `days` - Number of days to add (negative values subtract).
///
/// # Returns
/// * `anyhow::Result<i64>` - The shifted timestamp in milliseconds.
pub fn add_days(ts_ms: i64, days: i64) -> anyhow::Result<i64> {
    let dt = to_datetime(ts_ms)?;
    let shifted = if days >= 0 {
        dt.checked_add_days(chrono::Days::new(days as u64))
    } else {
        dt.checked_sub_days(chrono::Days::new(days.unsigned_abs()))
    };
    shifted
        .map(|d| d.timestamp_millis())
        .ok_or_else(|| anyhow::anyhow!("Adding {} days to {} overflows", days, ts_ms))
}

/// Adds hours to a timestamp.
pub fn add_hours(ts_ms: i64, hours: i64) -> anyhow::Result<i64> {
    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|delta| ts_ms.checked_add(delta))
        .ok_or_else(|| anyhow::anyhow!("Adding {} hours to {} overflows", hours, ts_ms))
}

/// Removes hours from a timestamp.
pub fn remove_hours(ts_ms: i64, hours: i64) -> anyhow::Result<i64> {
    hours
        .checked_neg()
        .ok_or_else(|| anyhow::anyhow!("Cannot negate {} hours", hours))
        .and_then(|h| add_hours(ts_ms, h))
}

/// Returns the first UTC midnight at or after the given timestamp.
///
/// A timestamp lying exactly on midnight is returned unchanged; any other
/// instant maps to midnight of the following calendar day.
///
/// # Arguments
/// * `ts_ms` - Milliseconds since epoch.
///
/// # Returns
/// * `anyhow::Result<i64>` - The boundary instant in milliseconds.
pub fn next_midnight_inclusive(ts_ms: i64) -> anyhow::Result<i64> {
    let dt = to_datetime(ts_ms)?;
    let midnight = dt
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid midnight for {}", ts_ms))?
        .and_utc()
        .timestamp_millis();
    if midnight == ts_ms {
        anyhow::Ok(midnight)
    } else {
        add_days(midnight, 1)
    }
}

/// Formats a millisecond timestamp into a `day.month.year` string.
///
/// Calendar fields are taken in UTC, without zero padding.
///
/// # Arguments
/// * `ts_ms` - Milliseconds since epoch.
///
/// # Returns
/// * `anyhow::Result<String>` - Formatted string (e.g., "4.1.2021") or error if invalid timestamp.
pub fn format_date(ts_ms: i64) -> anyhow::Result<String> {
    let dt = to_datetime(ts_ms)?;
    let output = dt.format("%-d.%-m.%Y").to_string();
    anyhow::Ok(output)
}

/// Parses a user supplied date into midnight UTC of that day.
///
/// Accepts `YYYY-MM-DD` (what date pickers emit) and `DD-MM-YYYY`.
pub fn parse_date_input(input: &str) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    let trimmed = input.trim();
    let date = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| chrono::NaiveDate::parse_from_str(trimmed, "%d-%m-%Y"))
        .map_err(|e| anyhow::anyhow!("Failed to parse date '{}': {}", trimmed, e))?;
    let dt = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid midnight for {}", date))?;
    anyhow::Ok(dt.and_utc())
}
