/// Position of a day inside a `DailySeries`.
pub type DayIndex = usize;

/// A single timestamped observation.
///
/// On the wire a sample is a two-element array `[timestamp_ms, value]`.
/// Timestamps may arrive as floats; they are truncated to whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "(f64, f64)", into = "(i64, f64)")]
pub struct Sample {
    pub timestamp: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((timestamp, value): (f64, f64)) -> Self {
        Self { timestamp: timestamp as i64, value }
    }
}

impl From<Sample> for (i64, f64) {
    fn from(sample: Sample) -> Self {
        (sample.timestamp, sample.value)
    }
}

/// Price and volume streams as delivered by the data source.
///
/// Both vectors are index-aligned: `prices[i]` and `total_volumes[i]` share
/// the same timestamp. Any other field of the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawSeries {
    pub prices: Vec<Sample>,
    pub total_volumes: Vec<Sample>,
}

impl RawSeries {
    /// Builds a series from `(timestamp, price, volume)` rows.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (i64, f64, f64)>,
    {
        let (prices, total_volumes) = rows
            .into_iter()
            .map(|(ts, price, volume)| (Sample::new(ts, price), Sample::new(ts, volume)))
            .unzip();
        Self { prices, total_volumes }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Checks the alignment invariants a data source is expected to uphold.
    ///
    /// # Returns
    /// * `anyhow::Result<()>` - Error if the streams differ in length,
    ///   disagree on a timestamp, or go backwards in time.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.prices.len() != self.total_volumes.len() {
            return Err(anyhow::anyhow!(
                "Price and volume streams differ in length: {} vs {}",
                self.prices.len(),
                self.total_volumes.len()
            ));
        }
        for (i, (p, v)) in self.prices.iter().zip(&self.total_volumes).enumerate() {
            if p.timestamp != v.timestamp {
                return Err(anyhow::anyhow!(
                    "Sample {} is misaligned: price at {}, volume at {}",
                    i,
                    p.timestamp,
                    v.timestamp
                ));
            }
        }
        if let Some(w) = self.prices.windows(2).find(|w| w[1].timestamp < w[0].timestamp) {
            return Err(anyhow::anyhow!(
                "Timestamps go backwards: {} after {}",
                w[1].timestamp,
                w[0].timestamp
            ));
        }
        anyhow::Ok(())
    }
}

/// One selected observation per UTC day, ascending by day.
///
/// `prices[k]` and `total_volumes[k]` were taken from the same raw sample.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DailySeries {
    pub prices: Vec<Sample>,
    pub total_volumes: Vec<Sample>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn price(&self, day: DayIndex) -> f64 {
        self.prices[day].value
    }

    pub fn volume(&self, day: DayIndex) -> f64 {
        self.total_volumes[day].value
    }

    pub fn timestamp(&self, day: DayIndex) -> i64 {
        self.prices[day].timestamp
    }

    pub(crate) fn push(&mut self, price: Sample, volume: Sample) {
        self.prices.push(price);
        self.total_volumes.push(volume);
    }
}

impl From<&RawSeries> for DailySeries {
    /// Wraps samples that are already one per day.
    fn from(raw: &RawSeries) -> Self {
        Self {
            prices: raw.prices.clone(),
            total_volumes: raw.total_volumes.clone(),
        }
    }
}

/// Outcome of the buy/sell search.
///
/// `sell_index == None` means no profitable exit exists and the position
/// should be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TradeRecommendation {
    pub buy_index: DayIndex,
    pub sell_index: Option<DayIndex>,
}

impl TradeRecommendation {
    pub fn is_hold(&self) -> bool {
        self.sell_index.is_none()
    }
}
