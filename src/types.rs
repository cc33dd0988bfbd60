use serde::Serialize;
use tabled::Tabled;

/// One overhead category and its share of total expenses, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct OverheadRecord {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Overheads")]
    #[tabled(rename = "Overheads")]
    pub amount: f64,
}

/// Net profit for a single day. Rows are kept in file order, which is
/// taken to be chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Tabled)]
pub struct DailyProfit {
    #[serde(rename = "Day")]
    #[tabled(rename = "Day")]
    pub day: u32,
    #[serde(rename = "NetProfit")]
    #[tabled(rename = "NetProfit")]
    pub net_profit: i64,
}

/// Day-over-day change in net profit. `day` is the later day of the pair.
///
/// Held as `i128` so the difference of any two `i64` profits fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfitDelta {
    pub day: u32,
    pub delta: i128,
}

impl ProfitDelta {
    /// Size of the change regardless of direction.
    pub fn magnitude(&self) -> u128 {
        self.delta.unsigned_abs()
    }
}

/// Shape of the net profit trend over the whole report.
///
/// Each variant carries only what its section of the report prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scenario", rename_all = "snake_case")]
pub enum Trend {
    /// Fewer than two days, so there is nothing to compare.
    InsufficientData,
    /// Every day beat the previous one; carries the largest increase.
    Surplus { day: u32, amount: u128 },
    /// Every day fell short of the previous one; carries the deepest drop.
    Deficit { day: u32, amount: u128 },
    /// Anything else; carries every drop, ascending by day.
    Fluctuating { deficits: Vec<ProfitDelta> },
}

/// Machine-readable digest written next to the text report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub overhead_categories: usize,
    pub highest_overhead: OverheadRecord,
    pub days_reported: usize,
    pub trend: Trend,
}
