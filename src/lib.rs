//! Daily bitcoin price analytics: bearish streak, peak volume day and a
//! volume-capped best buy/sell pair.

pub mod analysis;
pub mod cli;
pub mod coingecko;
pub mod error;
pub mod file_processing;
pub mod progress;
pub mod query;
pub mod report;
pub mod resample;
pub mod series;
pub mod streak;
pub mod trade;
pub mod utils;
pub mod volume;
