//! Analysis helpers shipped in the workspace's `utils/` directory.
//!
//! Inputs are CSV exports of the field datasets. Cells that pandas would
//! read as missing (`""`, `NA`, `NaN`, `null`, ...) are treated as missing.

pub mod mni;
pub mod seasons;
pub mod stats;

use std::collections::HashMap;
use std::io::Read;

use csv::StringRecord;

use crate::domain::AnalysisError;

pub use mni::{TransectMni, calculate_mni};
pub use seasons::{SeasonComparison, SeasonOptions, compare_consecutive_seasons};

const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub(crate) fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// CSV contents with a header index.
pub(crate) struct Table {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<StringRecord>,
}

impl Table {
    pub(crate) fn read<R: Read>(reader: R) -> Result<Self, AnalysisError> {
        let mut csv = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        let rows = csv.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            headers,
            index,
            rows,
        })
    }

    pub(crate) fn headers(&self) -> &[String] {
        &self.headers
    }

    pub(crate) fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fails with the sorted list of absent columns.
    pub(crate) fn require(&self, columns: &[&str]) -> Result<(), AnalysisError> {
        let mut missing: Vec<String> = columns
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(AnalysisError::MissingColumns(missing))
    }

    pub(crate) fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    /// Cell value, or `None` when absent or missing.
    pub(crate) fn cell<'a>(&self, row: &'a StringRecord, column: &str) -> Option<&'a str> {
        let idx = *self.index.get(column)?;
        row.get(idx).filter(|v| !is_missing(v))
    }
}

/// Orders ids: numeric ids first by value, then the rest as text.
///
/// Equal numeric values (`1` and `1.0`) fall back to text so the order stays
/// total.
pub(crate) fn compare_ids(a: &str, b: &str) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    let numeric = |s: &str| s.parse::<f64>().ok().filter(|v| !v.is_nan());
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_markers() {
        assert!(is_missing(""));
        assert!(is_missing(" NaN "));
        assert!(is_missing("null"));
        assert!(!is_missing("0"));
        assert!(!is_missing("Left"));
    }

    #[test]
    fn test_table_require_reports_sorted() {
        let table = Table::read("b,a\n1,2\n".as_bytes()).unwrap();
        let err = table.require(&["z", "a", "c"]).unwrap_err();
        match err {
            AnalysisError::MissingColumns(cols) => assert_eq!(cols, vec!["c", "z"]),
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
        assert!(table.require(&["a", "b"]).is_ok());
    }

    #[test]
    fn test_cell_treats_markers_as_missing() {
        let table = Table::read("x,y\nNA,5\n".as_bytes()).unwrap();
        let row = &table.rows()[0];
        assert_eq!(table.cell(row, "x"), None);
        assert_eq!(table.cell(row, "y"), Some("5"));
        assert_eq!(table.cell(row, "nope"), None);
    }

    #[test]
    fn test_compare_ids() {
        use std::cmp::Ordering;
        assert_eq!(compare_ids("9", "10"), Ordering::Less);
        assert_eq!(compare_ids("T9", "T10"), Ordering::Greater);
        assert_eq!(compare_ids("10A", "2"), Ordering::Greater);
        assert_eq!(compare_ids("1", "1.0"), Ordering::Less);
        assert_eq!(compare_ids("NaN", "1"), Ordering::Greater);
    }

    #[test]
    fn test_compare_ids_is_transitive_on_mixed_ids() {
        let ids = ["2", "10", "10A", "1.5", "B", "2A", "1.0", "1"];
        for a in ids {
            for b in ids {
                for c in ids {
                    if compare_ids(a, b).is_le() && compare_ids(b, c).is_le() {
                        assert!(compare_ids(a, c).is_le(), "{} <= {} <= {}", a, b, c);
                    }
                }
            }
        }
    }
}
