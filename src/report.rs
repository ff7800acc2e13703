//! # Report Module
//!
//! Line-oriented scanner for the `dslsstat -usage` style license report.
//!
//! The report is a human formatted table preceded by banner text:
//!
//! ```text
//! Licenses:
//! +---------+--------+-------+-------+
//! | Feature | Number | Inuse | Model |
//! +---------+--------+-------+-------+
//! | QAX     | 10     | 3     | Token |
//!    jobA using 2 licenses (userX, hostY)
//! ```
//!
//! A feature may appear in several blocks (one per license pool); counts are
//! summed. Usage lines following a feature row are merged per job.
//!
//! Nothing in here fails: the report comes from an external tool whose layout
//! is not guaranteed, so unexpected lines are skipped and bad numbers read as
//! zero.

use std::io::BufRead;

use tracing::{debug, trace};

use crate::models::{Summary, UsageEntry};

/// Marker that opens the license table.
const TABLE_MARKER: &str = "Licenses:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Skipping banner text until the table marker
    Seeking,
    InTable,
}

/// Typed view of one data row, looked up through the captured headings.
#[derive(Debug, Default)]
struct FeatureRow {
    feature: Option<String>,
    number: u64,
    inuse: u64,
    model: Option<String>,
    extra: Vec<(String, String)>,
}

impl FeatureRow {
    fn from_cells(headings: &[String], cells: &[&str]) -> Self {
        let mut row = FeatureRow::default();
        for (heading, value) in headings.iter().zip(cells) {
            match heading.as_str() {
                "feature" => {
                    if !value.is_empty() {
                        row.feature = Some(value.to_string());
                    }
                }
                "number" => row.number = parse_count(value),
                "inuse" => row.inuse = parse_count(value),
                "model" => row.model = Some(value.to_string()),
                "" => {}
                other => row.extra.push((other.to_string(), value.to_string())),
            }
        }
        row
    }
}

fn parse_count(value: &str) -> u64 {
    value.trim().parse::<u64>().unwrap_or(0)
}

/// Cells of a `|` delimited line, leading delimiter already stripped.
fn split_cells(line: &str) -> Vec<&str> {
    line[1..].split('|').map(str::trim).collect()
}

/// Heading check. Once headings are known, a `|` line repeats them only if
/// its cell under the `feature` column reads "feature"; before that any cell
/// will do.
fn is_heading_row(line: &str, headings: Option<&[String]>) -> bool {
    if line.starts_with('+') {
        return line.contains("Feature");
    }
    let cells = split_cells(line);
    match headings.and_then(|h| h.iter().position(|name| name == "feature")) {
        Some(idx) => cells
            .get(idx)
            .is_some_and(|cell| cell.eq_ignore_ascii_case("feature")),
        None => cells.iter().any(|cell| cell.eq_ignore_ascii_case("feature")),
    }
}

/// Single pass state machine over report lines.
struct ReportScanner {
    state: ScanState,
    headings: Option<Vec<String>>,
    /// Key of the feature the next usage lines belong to
    current: Option<String>,
    summary: Summary,
}

impl ReportScanner {
    fn new(error: Option<&str>) -> Self {
        let error = error
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string);
        Self {
            state: ScanState::Seeking,
            headings: None,
            current: None,
            summary: Summary {
                error,
                ..Summary::default()
            },
        }
    }

    fn feed(&mut self, raw: &str) {
        let line = raw.trim_end();
        match self.state {
            ScanState::Seeking => {
                if line.starts_with(TABLE_MARKER) {
                    trace!("license table found");
                    self.state = ScanState::InTable;
                }
            }
            ScanState::InTable => {
                if (line.starts_with('+') || line.starts_with('|'))
                    && is_heading_row(line, self.headings.as_deref())
                {
                    self.capture_headings(line);
                } else if line.starts_with('|') {
                    self.feature_row(line);
                } else if line.starts_with('+') {
                    // border
                } else if self.current.is_some() && line.contains("using") {
                    self.usage_line(line);
                }
            }
        }
    }

    fn capture_headings(&mut self, line: &str) {
        let headings: Vec<String> = split_cells(line)
            .into_iter()
            .map(str::to_lowercase)
            .collect();
        debug!(?headings, "column headings");
        self.headings = Some(headings);
    }

    fn feature_row(&mut self, line: &str) {
        let Some(headings) = self.headings.as_deref() else {
            debug!(line, "data row before headings, skipped");
            return;
        };
        let cells = split_cells(line);
        let row = FeatureRow::from_cells(headings, &cells);
        let Some(code) = row.feature else {
            debug!(line, "data row without feature code, skipped");
            self.current = None;
            return;
        };

        let key = code.to_uppercase();
        let status = self.summary.feature_mut(&key);
        status.total = status.total.saturating_add(row.number);
        status.in_use = status.in_use.saturating_add(row.inuse);
        if let Some(model) = row.model {
            status.model = model;
        }
        for (name, value) in row.extra {
            status.attributes.insert(name, value);
        }
        debug!(
            feature = %key,
            total = status.total,
            in_use = status.in_use,
            "feature row"
        );
        self.current = Some(key);
    }

    fn usage_line(&mut self, line: &str) {
        let Some(key) = self.current.as_deref() else {
            return;
        };
        debug!(feature = %key, line = line.trim(), "usage line");
        let entry = UsageEntry::from_line(line);
        if let Some(status) = self.summary.features.get_mut(key) {
            status.record_usage(entry);
        }
    }

    fn finish(self) -> Summary {
        if self.state == ScanState::Seeking {
            debug!("no license table in report");
        }
        self.summary
    }
}

/// Parse a captured report and its diagnostic text into a [`Summary`].
///
/// `error` is kept verbatim when it holds anything besides whitespace.
/// A report without the table marker yields an empty summary.
pub fn parse(report: &str, error: Option<&str>) -> Summary {
    let mut scanner = ReportScanner::new(error);
    for line in report.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}

/// Streaming variant of [`parse`]. A read error ends the scan; whatever was
/// collected up to that point is returned.
pub fn parse_reader<R: BufRead>(reader: R, error: Option<&str>) -> Summary {
    let mut scanner = ReportScanner::new(error);
    for line in reader.lines() {
        match line {
            Ok(line) => scanner.feed(&line),
            Err(err) => {
                debug!(%err, "report stream ended early");
                break;
            }
        }
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_POOLS: &str = "\
Server: lic1.example.com
Licenses:
+---------+--------+-------+-------+
| Feature | Number | Inuse | Model |
+---------+--------+-------+-------+
| QAX     | 10     | 3     | Token |
   jobA using 2 licenses (userX, hostY)
+---------+--------+-------+-------+
| SRU     | 5      | 1     | Credit|
   jobB using 1 licenses (userZ, hostZ)
+---------+--------+-------+-------+
| QAX     | 4      | 1     | Token |
   jobC using 1 licenses (userQ, hostQ)
";

    #[test]
    fn test_counts_accumulate_across_blocks() {
        let summary = parse(TWO_POOLS, None);
        let qax = summary.get("QAX").unwrap();
        assert_eq!(qax.total, 14);
        assert_eq!(qax.in_use, 4);
        assert_eq!(qax.model, "Token");
        assert_eq!(qax.usage_lines().len(), 2);
        assert_eq!(summary.get("sru").unwrap().model, "Credit");
    }

    #[test]
    fn test_preamble_rows_are_ignored() {
        let report = "| QAX | 1 | 0 | Token |\nno table here\n";
        let summary = parse(report, None);
        assert!(summary.features.is_empty());
        assert!(summary.error.is_none());
    }

    #[test]
    fn test_row_before_headings_is_skipped() {
        let report = "Licenses:\n| QAX | 1 | 0 | Token |\n";
        assert!(parse(report, None).features.is_empty());
    }

    #[test]
    fn test_plus_prefixed_heading_line() {
        let report = "Licenses:\n+ Feature | Number | InUse | Model |\n| QXT | 8 | 2 | token |\n";
        let summary = parse(report, None);
        let qxt = summary.get("QXT").unwrap();
        assert_eq!((qxt.total, qxt.in_use), (8, 2));
    }

    #[test]
    fn test_malformed_numbers_read_as_zero() {
        let report = "Licenses:\n| Feature | Number | Inuse | Model |\n| QAT | ten | 2 | Token |\n";
        let summary = parse(report, None);
        let qat = summary.get("QAT").unwrap();
        assert_eq!(qat.total, 0);
        assert_eq!(qat.in_use, 2);
        assert_eq!(qat.available(), -2);
    }

    #[test]
    fn test_row_without_feature_drops_usage_context() {
        let report = "\
Licenses:
| Feature | Number | Inuse | Model |
| QAX | 2 | 1 | Token |
|     | 3 | 1 | Token |
   stray using 1 licenses (u, h)
";
        let summary = parse(report, None);
        assert_eq!(summary.features.len(), 1);
        assert!(summary.get("QAX").unwrap().usage_lines().is_empty());
    }

    #[test]
    fn test_extra_columns_are_kept() {
        let report = "\
Licenses:
| Feature | Version | Model | Type | Number | InUse | Expires |
| SUN | 1.0 | Credit | CONSUMABLE | 100 | 12 | 2026-12-31 |
";
        let summary = parse(report, None);
        let sun = summary.get("SUN").unwrap();
        assert_eq!(sun.available(), 88);
        assert_eq!(sun.attributes.get("type").map(String::as_str), Some("CONSUMABLE"));
        assert_eq!(sun.attributes.get("expires").map(String::as_str), Some("2026-12-31"));
    }

    #[test]
    fn test_feature_valued_cell_in_data_row_is_not_a_heading() {
        let report = "\
Licenses:
| Feature | Number | Inuse | Model | Type |
| QAX | 10 | 3 | Token | Feature |
| SRU | 5 | 1 | Credit | NODE |
| Feature | Number | Inuse | Model | Type |
| QXT | 4 | 0 | Token | NODE |
";
        let summary = parse(report, None);
        assert_eq!(summary.codes(), vec!["QAX", "QXT", "SRU"]);
        let qax = summary.get("QAX").unwrap();
        assert_eq!((qax.total, qax.in_use), (10, 3));
        assert_eq!(qax.attributes.get("type").map(String::as_str), Some("Feature"));
        assert_eq!(summary.get("SRU").unwrap().available(), 4);
    }

    #[test]
    fn test_whitespace_error_is_dropped() {
        assert!(parse("", Some(" \n")).error.is_none());
        assert_eq!(
            parse("", Some("server down\n")).error.as_deref(),
            Some("server down\n")
        );
    }

    #[test]
    fn test_parse_reader_matches_parse() {
        let from_str = parse(TWO_POOLS, None);
        let from_reader = parse_reader(TWO_POOLS.as_bytes(), None);
        assert_eq!(from_str.codes(), from_reader.codes());
        assert_eq!(
            from_str.get("QAX").unwrap().usage_lines(),
            from_reader.get("QAX").unwrap().usage_lines()
        );
    }
}
