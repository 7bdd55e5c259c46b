use crate::analysis;
use crate::utils;

/// Peak trading day ready for display.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct VolumePeak {
    pub date: String,
    pub amount: f64,
}

/// Trade recommendation with dates instead of day indices.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TradeDates {
    pub buy: String,
    pub sell: Option<String>,
}

/// Presentation view of an `Analysis`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Report {
    pub currency: String,
    pub days: usize,
    pub longest_downward_run: usize,
    pub highest_volume: Option<VolumePeak>,
    pub trade: Option<TradeDates>,
}

impl Report {
    /// Resolves day indices to calendar dates.
    ///
    /// # Arguments
    /// * `analysis` - Result bundle to present.
    /// * `currency` - Quote currency code the volumes are expressed in.
    ///
    /// # Returns
    /// * `anyhow::Result<Report>` - Error only if a timestamp cannot be formatted.
    pub fn from_analysis(analysis: &analysis::Analysis, currency: &str) -> anyhow::Result<Self> {
        let highest_volume = match analysis.highest_volume {
            Some(sample) => Some(VolumePeak {
                date: utils::format_date(sample.timestamp)?,
                amount: sample.value,
            }),
            None => None,
        };

        let trade = match analysis.trade {
            Some(rec) => {
                let buy = utils::format_date(analysis.daily.timestamp(rec.buy_index))?;
                let sell = match rec.sell_index {
                    Some(day) => Some(utils::format_date(analysis.daily.timestamp(day))?),
                    None => None,
                };
                Some(TradeDates { buy, sell })
            }
            None => None,
        };

        anyhow::Ok(Report {
            currency: currency.to_uppercase(),
            days: analysis.daily.len(),
            longest_downward_run: analysis.longest_downward_run,
            highest_volume,
            trade,
        })
    }

    /// Human readable lines, one per metric.
    pub fn lines(&self) -> Vec<String> {
        let streak = format!(
            "Longest bearish trend was {} days in a row.",
            self.longest_downward_run
        );
        let volume = match &self.highest_volume {
            Some(peak) => format!(
                "Highest trading volume was {:.2} {} on {}.",
                peak.amount, self.currency, peak.date
            ),
            None => "No trading volume in range.".to_string(),
        };
        let trade = match &self.trade {
            Some(TradeDates { buy, sell: Some(sell) }) => format!("Buy on {}, sell on {}.", buy, sell),
            Some(TradeDates { buy, sell: None }) => format!("Buy on {}, hold.", buy),
            None => "Not enough daily prices to recommend a trade.".to_string(),
        };
        vec![streak, volume, trade]
    }
}
