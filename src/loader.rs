use crate::error::{ReportError, Result};
use crate::types::{DailyProfit, OverheadRecord};
use crate::util::{parse_amount, parse_day, parse_percentage};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const OVERHEAD_COLUMNS: usize = 2;
const PROFIT_LOSS_COLUMNS: usize = 5;
const DAY_COL: usize = 0;
const NET_PROFIT_COL: usize = 4;

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| ReportError::MissingFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Line number of the first empty line that sits between the header and the
/// last row. The CSV reader drops such lines without a trace, so they are
/// caught here instead. Empty lines at the very end are allowed.
fn find_blank_row(data: &[u8]) -> Option<u64> {
    let lines: Vec<&[u8]> = data
        .split(|&b| b == b'\n')
        .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
        .collect();
    let first = lines.iter().position(|l| !l.is_empty())?;
    let last = lines.iter().rposition(|l| !l.is_empty())?;
    lines[first..last]
        .iter()
        .position(|l| l.is_empty())
        .map(|i| (first + i + 1) as u64)
}

/// Read the data rows of a comma-separated report, header discarded.
///
/// Each row comes back with its 1-based line number; an empty line between
/// rows, or anything the CSV reader itself chokes on (bad UTF-8), is
/// reported as a malformed row.
fn read_rows<R: Read>(mut input: R, source: &Path) -> Result<Vec<(u64, StringRecord)>> {
    let mut data = Vec::new();
    input
        .read_to_end(&mut data)
        .map_err(|e| ReportError::MissingFile {
            path: source.to_path_buf(),
            source: e,
        })?;
    if let Some(line) = find_blank_row(&data) {
        return Err(ReportError::MalformedRow {
            path: source.to_path_buf(),
            line,
            reason: "row is empty".to_string(),
        });
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_slice());
    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| ReportError::MalformedRow {
            path: source.to_path_buf(),
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        out.push((line, record));
    }
    Ok(out)
}

fn require_columns(record: &StringRecord, needed: usize) -> std::result::Result<(), String> {
    if record.len() < needed {
        return Err(format!(
            "expected at least {} fields, found {}",
            needed,
            record.len()
        ));
    }
    Ok(())
}

pub fn load_overheads(path: impl AsRef<Path>) -> Result<Vec<OverheadRecord>> {
    let path = path.as_ref();
    read_overheads(open(path)?, path)
}

/// Parse `category,percentage` rows. A category may only appear once.
pub fn read_overheads<R: Read>(input: R, source: &Path) -> Result<Vec<OverheadRecord>> {
    let malformed = |line: u64, reason: String| ReportError::MalformedRow {
        path: source.to_path_buf(),
        line,
        reason,
    };

    let mut records: Vec<OverheadRecord> = Vec::new();
    let mut first_seen: HashMap<String, u64> = HashMap::new();

    for (line, record) in read_rows(input, source)? {
        require_columns(&record, OVERHEAD_COLUMNS).map_err(|r| malformed(line, r))?;

        let category = record[0].trim().to_string();
        if category.is_empty() {
            return Err(malformed(line, "category is empty".to_string()));
        }
        let amount = parse_percentage(&record[1]).map_err(|r| malformed(line, r))?;

        if let Some(first) = first_seen.get(&category) {
            return Err(malformed(
                line,
                format!("duplicate category '{}' (first seen on line {})", category, first),
            ));
        }
        first_seen.insert(category.clone(), line);
        records.push(OverheadRecord { category, amount });
    }

    if records.is_empty() {
        return Err(ReportError::EmptyInput(source.display().to_string()));
    }
    debug!(rows = records.len(), source = %source.display(), "loaded overheads");
    Ok(records)
}

pub fn load_profit_loss(path: impl AsRef<Path>) -> Result<Vec<DailyProfit>> {
    let path = path.as_ref();
    read_profit_loss(open(path)?, path)
}

/// Parse daily profit and loss rows: day in column 0, net profit in column 4.
/// Columns 1 to 3 must be present but are not read.
pub fn read_profit_loss<R: Read>(input: R, source: &Path) -> Result<Vec<DailyProfit>> {
    let malformed = |line: u64, reason: String| ReportError::MalformedRow {
        path: source.to_path_buf(),
        line,
        reason,
    };

    let mut days: Vec<DailyProfit> = Vec::new();
    for (line, record) in read_rows(input, source)? {
        require_columns(&record, PROFIT_LOSS_COLUMNS).map_err(|r| malformed(line, r))?;

        let day = parse_day(&record[DAY_COL]).map_err(|r| malformed(line, r))?;
        let net_profit = parse_amount(&record[NET_PROFIT_COL]).map_err(|r| malformed(line, r))?;
        days.push(DailyProfit { day, net_profit });
    }

    if days.is_empty() {
        return Err(ReportError::EmptyInput(source.display().to_string()));
    }
    debug!(rows = days.len(), source = %source.display(), "loaded profit and loss");
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overheads(text: &str) -> Result<Vec<OverheadRecord>> {
        read_overheads(text.as_bytes(), Path::new("Overheads.csv"))
    }

    fn profit_loss(text: &str) -> Result<Vec<DailyProfit>> {
        read_profit_loss(text.as_bytes(), Path::new("Profits_and_Loss.csv"))
    }

    #[test]
    fn reads_overheads_in_file_order() {
        let got = overheads("Category,Overheads\nRent,40.0\nUtilities, 15.5\nSalaries,44.5\n").unwrap();
        let names: Vec<&str> = got.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Utilities", "Salaries"]);
        assert_eq!(got[1].amount, 15.5);
    }

    #[test]
    fn header_only_is_empty_input() {
        let err = overheads("Category,Overheads\n").unwrap_err();
        assert!(matches!(err, ReportError::EmptyInput(_)));
        let err = profit_loss("").unwrap_err();
        assert!(matches!(err, ReportError::EmptyInput(_)));
    }

    #[test]
    fn short_overhead_row_names_its_line() {
        let err = overheads("Category,Overheads\nRent,40\nUtilities\n").unwrap_err();
        match err {
            ReportError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("at least 2 fields"), "{}", reason);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_percentage_is_rejected() {
        let err = overheads("Category,Overheads\nRent,forty\n").unwrap_err();
        assert!(matches!(err, ReportError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let err = overheads("Category,Overheads\nRent,40\nSalaries,30\nRent,10\n").unwrap_err();
        match err {
            ReportError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 4);
                assert!(reason.contains("first seen on line 2"), "{}", reason);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reads_day_and_net_profit_columns() {
        let text = "Day,Sales,Trading Profit,Operating Expense,Net Profit\n\
                    11,100,50,20,3000\n\
                    12,110,55,21,-250\n";
        let got = profit_loss(text).unwrap();
        assert_eq!(
            got,
            vec![
                DailyProfit { day: 11, net_profit: 3000 },
                DailyProfit { day: 12, net_profit: -250 },
            ]
        );
    }

    #[test]
    fn missing_net_profit_column_is_rejected() {
        let err = profit_loss("Day,Sales,Trading Profit,Operating Expense,Net Profit\n11,100,50,20\n").unwrap_err();
        assert!(matches!(err, ReportError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn bad_day_is_rejected_not_skipped() {
        let text = "Day,A,B,C,Net Profit\n1,0,0,0,10\nx,0,0,0,20\n3,0,0,0,30\n";
        let err = profit_loss(text).unwrap_err();
        assert!(matches!(err, ReportError::MalformedRow { line: 3, .. }));
    }

    #[test]
    fn blank_line_between_rows_is_rejected() {
        let err = profit_loss("Day,A,B,C,Net Profit\n1,0,0,0,10\n\n3,0,0,0,30\n").unwrap_err();
        match err {
            ReportError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 3);
                assert_eq!(reason, "row is empty");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = overheads("Category,Overheads\r\n\r\nRent,40\r\n").unwrap_err();
        assert!(matches!(err, ReportError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn whitespace_only_row_is_rejected() {
        let err = profit_loss("Day,A,B,C,Net Profit\n1,0,0,0,10\n   \n3,0,0,0,30\n").unwrap_err();
        assert!(matches!(err, ReportError::MalformedRow { line: 3, .. }));
    }

    #[test]
    fn trailing_blank_lines_and_crlf_are_accepted() {
        let got = profit_loss("Day,A,B,C,Net Profit\r\n1,0,0,0,10\r\n2,0,0,0,30\r\n\r\n\n").unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[1], DailyProfit { day: 2, net_profit: 30 });
    }

    #[test]
    fn extreme_net_profit_values_load() {
        let text = format!(
            "Day,A,B,C,Net Profit\n1,0,0,0,{}\n2,0,0,0,{}\n",
            i64::MIN,
            i64::MAX
        );
        let got = profit_loss(&text).unwrap();
        assert_eq!(got[0].net_profit, i64::MIN);
        assert_eq!(got[1].net_profit, i64::MAX);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_overheads("no/such/Overheads.csv").unwrap_err();
        assert!(matches!(err, ReportError::MissingFile { .. }));
    }
}
