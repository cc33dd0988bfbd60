//! Summary statements for small financial reports.
//!
//! Two independent pipelines, each parse → reduce → format:
//! - overheads: find the largest overhead category;
//! - profit and loss: classify the day-over-day net profit trend and call
//!   out the notable days.
pub mod error;
pub mod loader;
pub mod logging;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use error::{ReportError, Result};
pub use types::{DailyProfit, OverheadRecord, ProfitDelta, SummaryStats, Trend};
