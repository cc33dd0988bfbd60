use crate::error::{ReportError, Result};
use crate::types::{DailyProfit, OverheadRecord, ProfitDelta, SummaryStats, Trend};
use crate::util::{format_currency, format_percentage};
use std::fmt;
use tracing::warn;

const RANKED_DEFICITS: usize = 3;
const DEFICIT_LABELS: [&str; RANKED_DEFICITS] = [
    "[HIGHEST NET PROFIT DEFICIT]",
    "[2ND HIGHEST NET PROFIT DEFICIT]",
    "[3RD HIGHEST NET PROFIT DEFICIT]",
];

/// The category with the largest share. On a tie the earliest row wins.
pub fn highest_overhead(records: &[OverheadRecord]) -> Result<&OverheadRecord> {
    let mut iter = records.iter();
    let mut best = iter
        .next()
        .ok_or_else(|| ReportError::EmptyInput("overhead records".to_string()))?;
    for r in iter {
        if r.amount > best.amount {
            best = r;
        }
    }
    Ok(best)
}

pub fn format_highest_overhead(record: &OverheadRecord) -> String {
    format!(
        "[HIGHEST OVERHEAD] {}: {}%\n",
        record.category,
        format_percentage(record.amount)
    )
}

pub fn overhead_summary(records: &[OverheadRecord]) -> Result<String> {
    highest_overhead(records).map(format_highest_overhead)
}

/// Change in net profit for every pair of consecutive days.
pub fn compute_deltas(days: &[DailyProfit]) -> Vec<ProfitDelta> {
    days.windows(2)
        .map(|pair| ProfitDelta {
            day: pair[1].day,
            delta: i128::from(pair[1].net_profit) - i128::from(pair[0].net_profit),
        })
        .collect()
}

/// Decide which of the report shapes applies.
///
/// Checked in order: no deltas, all increases, all decreases, otherwise
/// fluctuating. A zero change is neither an increase nor a decrease.
pub fn classify(deltas: &[ProfitDelta]) -> Trend {
    if deltas.is_empty() {
        return Trend::InsufficientData;
    }

    if deltas.iter().all(|d| d.delta > 0) {
        // First occurrence wins ties, so only move on a strictly larger delta.
        let mut best = &deltas[0];
        for d in &deltas[1..] {
            if d.delta > best.delta {
                best = d;
            }
        }
        return Trend::Surplus {
            day: best.day,
            amount: best.magnitude(),
        };
    }

    if deltas.iter().all(|d| d.delta < 0) {
        let mut worst = &deltas[0];
        for d in &deltas[1..] {
            if d.delta < worst.delta {
                worst = d;
            }
        }
        return Trend::Deficit {
            day: worst.day,
            amount: worst.magnitude(),
        };
    }

    let mut deficits: Vec<ProfitDelta> = deltas.iter().copied().filter(|d| d.delta < 0).collect();
    deficits.sort_by_key(|d| d.day);
    Trend::Fluctuating { deficits }
}

/// The `n` largest drops, biggest first. `deficits` is expected in day
/// order; equal drops keep that order.
pub fn top_deficits(deficits: &[ProfitDelta], n: usize) -> Vec<ProfitDelta> {
    let mut ranked = deficits.to_vec();
    ranked.sort_by(|a, b| b.magnitude().cmp(&a.magnitude()));
    ranked.truncate(n);
    ranked
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::InsufficientData => {
                writeln!(f, "[INSUFFICIENT DATA] AT LEAST TWO DAYS OF NET PROFIT ARE REQUIRED")
            }
            Trend::Surplus { day, amount } => {
                writeln!(f, "[NET PROFIT SURPLUS] NET PROFIT ON EACH DAY IS HIGHER THAN PREVIOUS DAY")?;
                writeln!(
                    f,
                    "[HIGHEST NET PROFIT SURPLUS] DAY: {}, AMOUNT: {}",
                    day,
                    format_currency(*amount)
                )
            }
            Trend::Deficit { day, amount } => {
                writeln!(f, "[NET PROFIT DEFICIT] NET PROFIT ON EACH DAY IS LOWER THAN PREVIOUS DAY")?;
                writeln!(
                    f,
                    "[HIGHEST PROFIT DEFICIT] DAY: {}, AMOUNT: {}",
                    day,
                    format_currency(*amount)
                )
            }
            Trend::Fluctuating { deficits } => {
                for d in deficits {
                    writeln!(
                        f,
                        "[NET PROFIT DEFICIT] DAY: {}, AMOUNT: {}",
                        d.day,
                        format_currency(d.magnitude())
                    )?;
                }
                let ranked = top_deficits(deficits, RANKED_DEFICITS);
                for (label, d) in DEFICIT_LABELS.iter().zip(&ranked) {
                    writeln!(
                        f,
                        "{} DAY: {}, AMOUNT: {}",
                        label,
                        d.day,
                        format_currency(d.magnitude())
                    )?;
                }
                Ok(())
            }
        }
    }
}

pub fn profit_loss_trend(days: &[DailyProfit]) -> Trend {
    let trend = classify(&compute_deltas(days));
    if trend == Trend::InsufficientData {
        warn!(days = days.len(), "not enough days to compare net profit");
    }
    trend
}

pub fn profit_loss_summary(days: &[DailyProfit]) -> String {
    profit_loss_trend(days).to_string()
}

/// Both reports, overheads first, as written to the summary file.
pub fn full_report(overheads: &[OverheadRecord], days: &[DailyProfit]) -> Result<String> {
    let mut out = overhead_summary(overheads)?;
    out.push_str(&profit_loss_summary(days));
    Ok(out)
}

pub fn generate_summary(overheads: &[OverheadRecord], days: &[DailyProfit]) -> Result<SummaryStats> {
    let highest = highest_overhead(overheads)?.clone();
    Ok(SummaryStats {
        overhead_categories: overheads.len(),
        highest_overhead: highest,
        days_reported: days.len(),
        trend: profit_loss_trend(days),
    })
}
