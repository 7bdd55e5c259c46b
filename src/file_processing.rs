use crate::series;

use tracing::info;

/// Single row of a CSV payload.
#[derive(Debug, serde::Deserialize)]
struct CsvRecord {
    timestamp: i64,
    price: f64,
    total_volume: f64,
}

/// Checks that the input path exists and is a regular file.
///
/// # Arguments
/// * `path` - Path to the payload file.
///
/// # Returns
/// * `anyhow::Result<()>` - Error if the path is missing or is a directory.
pub fn check_path<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(anyhow::anyhow!("Input path does not exist: {}", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow::anyhow!("Input path is not a file: {}", path.display()));
    }
    anyhow::Ok(())
}

fn load_json(path: &std::path::Path) -> anyhow::Result<series::RawSeries> {
    let file = std::fs::File::open(path)?;
    let raw: series::RawSeries = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
    anyhow::Ok(raw)
}

fn load_csv(path: &std::path::Path) -> anyhow::Result<series::RawSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<CsvRecord>() {
        let record = result?;
        rows.push((record.timestamp, record.price, record.total_volume));
    }
    anyhow::Ok(series::RawSeries::from_rows(rows))
}

/// Loads a raw series from a saved payload.
///
/// `.json` files hold the same document the price API returns;
/// `.csv` files carry a `timestamp,price,total_volume` header and one sample
/// per row. The loaded series is validated before it is returned.
///
/// # Arguments
/// * `path` - Path to a `.json` or `.csv` file.
///
/// # Returns
/// * `anyhow::Result<RawSeries>` - The series, or an error for unknown
///   extensions, parse failures and misaligned streams.
pub fn load_raw_series<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<series::RawSeries> {
    let path = path.as_ref();
    check_path(path)?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    let raw = match extension.as_deref() {
        Some("json") => load_json(path)?,
        Some("csv") => load_csv(path)?,
        _ => {
            return Err(anyhow::anyhow!(
                "Unsupported input format: {} (expected .json or .csv)",
                path.display()
            ));
        }
    };
    raw.validate()?;

    info!(samples = raw.len(), "Loaded price history from {}", path.display());
    anyhow::Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_json_payload() {
        let file = write_temp(
            ".json",
            r#"{"prices":[[0,10.0],[86400000,8.0]],"total_volumes":[[0,1.5],[86400000,2.5]]}"#,
        );
        let raw = load_raw_series(file.path()).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.total_volumes[1], series::Sample::new(86_400_000, 2.5));
    }

    #[test]
    fn test_load_csv_payload() {
        let file = write_temp(
            ".csv",
            "timestamp,price,total_volume\n0, 10.0, 1.5\n86400000, 8.0, 2.5\n",
        );
        let raw = load_raw_series(file.path()).unwrap();
        assert_eq!(raw.prices[1], series::Sample::new(86_400_000, 8.0));
        assert_eq!(raw.total_volumes[0].value, 1.5);
    }

    #[test]
    fn test_misaligned_json_is_rejected() {
        let file = write_temp(".json", r#"{"prices":[[0,10.0],[1,8.0]],"total_volumes":[[0,1.5]]}"#);
        assert!(load_raw_series(file.path()).is_err());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let file = write_temp(".txt", "irrelevant");
        let err = load_raw_series(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported input format"));
    }

    #[test]
    fn test_missing_and_directory_paths() {
        assert!(check_path("/definitely/not/here.json").is_err());
        let dir = tempfile::tempdir().unwrap();
        assert!(check_path(dir.path()).is_err());
    }
}
