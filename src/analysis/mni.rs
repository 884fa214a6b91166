//! Minimum Number of Individuals per transect.
//!
//! For every element the MNI is the largest count across sides. The MNI of
//! a (transect, taxon, age, sex) group is the largest element MNI in it, and
//! the transect MNI is the sum over its groups.

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

use serde::Serialize;
use tracing::debug;

use super::{Table, compare_ids};
use crate::domain::AnalysisError;

pub const TRANSECT: &str = "TransectUID";
pub const TAXON: &str = "Taxon Label";
pub const AGE: &str = "Pre: Age";
pub const SEX: &str = "Pre: Sex";
pub const ELEMENT: &str = "What element is this?";
pub const SIDE: &str = "Side";

const REQUIRED: [&str; 5] = [TRANSECT, TAXON, AGE, SEX, ELEMENT];

type GroupKey = (String, String, String, String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransectMni {
    #[serde(rename = "TransectUID")]
    pub transect: String,
    #[serde(rename = "MNI")]
    pub mni: u64,
}

fn group_key(table: &Table, row: &csv::StringRecord) -> Option<(GroupKey, String)> {
    Some((
        (
            table.cell(row, TRANSECT)?.to_string(),
            table.cell(row, TAXON)?.to_string(),
            table.cell(row, AGE)?.to_string(),
            table.cell(row, SEX)?.to_string(),
        ),
        table.cell(row, ELEMENT)?.to_string(),
    ))
}

// Raw rows: one observation per row with a `Side` column.
fn element_mni_from_raw(table: &Table) -> Result<Vec<(GroupKey, Option<u64>)>, AnalysisError> {
    let mut required = REQUIRED.to_vec();
    required.push(SIDE);
    table.require(&required)?;

    let mut counts: BTreeMap<(GroupKey, String), HashMap<String, u64>> = BTreeMap::new();
    for row in table.rows() {
        let (Some(key), Some(side)) = (group_key(table, row), table.cell(row, SIDE)) else {
            continue;
        };
        *counts.entry(key).or_default().entry(side.to_string()).or_default() += 1;
    }

    Ok(counts
        .into_iter()
        .map(|((group, _element), sides)| (group, sides.into_values().max()))
        .collect())
}

// Pre-pivoted rows: every non-key column holds the count for one side.
fn element_mni_from_pivot(table: &Table) -> Result<Vec<(GroupKey, Option<u64>)>, AnalysisError> {
    table.require(&REQUIRED)?;
    let side_columns: Vec<&str> = table
        .headers()
        .iter()
        .map(String::as_str)
        .filter(|h| !REQUIRED.contains(h))
        .collect();

    let mut elements = Vec::new();
    for row in table.rows() {
        let Some((group, _element)) = group_key(table, row) else {
            continue;
        };
        let element_mni = side_columns
            .iter()
            .filter_map(|col| table.cell(row, col))
            .filter_map(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u64)
            .max();
        elements.push((group, element_mni));
    }
    Ok(elements)
}

/// Computes the MNI per transect from a CSV export.
///
/// Accepts either raw observations (with a `Side` column) or a table that is
/// already pivoted to one column per side. Rows missing any key value are
/// dropped. Results are ordered by transect id.
pub fn calculate_mni<R: Read>(reader: R) -> Result<Vec<TransectMni>, AnalysisError> {
    let table = Table::read(reader)?;
    let elements = if table.has_column(SIDE) {
        element_mni_from_raw(&table)?
    } else {
        element_mni_from_pivot(&table)?
    };
    debug!(elements = elements.len(), "Computed element MNI");

    let mut groups: HashMap<GroupKey, Option<u64>> = HashMap::new();
    for (group, element_mni) in elements {
        let entry = groups.entry(group).or_insert(None);
        *entry = match (*entry, element_mni) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    let mut transects: BTreeMap<String, u64> = BTreeMap::new();
    for ((transect, ..), group_mni) in groups {
        *transects.entry(transect).or_default() += group_mni.unwrap_or(0);
    }

    let mut result: Vec<TransectMni> = transects
        .into_iter()
        .map(|(transect, mni)| TransectMni { transect, mni })
        .collect();
    result.sort_by(|a, b| compare_ids(&a.transect, &b.transect));
    Ok(result)
}

pub fn write_mni<W: Write>(writer: W, rows: &[TransectMni]) -> Result<(), AnalysisError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "\
TransectUID,Taxon Label,Pre: Age,Pre: Sex,What element is this?,Side
T1,Deer,Adult,F,Femur,Left
T1,Deer,Adult,F,Femur,Left
T1,Deer,Adult,F,Femur,Right
T1,Deer,Adult,F,Tibia,Left
T1,Deer,Adult,F,Tibia,Left
T1,Deer,Adult,F,Tibia,Left
T1,Hare,Juvenile,M,Femur,Right
T2,Deer,Adult,M,Femur,Left
T2,Deer,Adult,M,Femur,
T2,,Adult,M,Femur,Left
";

    const PIVOTED: &str = "\
TransectUID,Taxon Label,Pre: Age,Pre: Sex,What element is this?,Left,Right
T1,Deer,Adult,F,Femur,2,1
T1,Deer,Adult,F,Tibia,3,0
T1,Hare,Juvenile,M,Femur,0,1
T2,Deer,Adult,M,Femur,1,
";

    #[test]
    fn test_raw_input() {
        let result = calculate_mni(RAW.as_bytes()).unwrap();
        assert_eq!(
            result,
            vec![
                TransectMni { transect: "T1".to_string(), mni: 4 },
                TransectMni { transect: "T2".to_string(), mni: 1 },
            ]
        );
    }

    #[test]
    fn test_pivoted_input_matches_raw() {
        let raw = calculate_mni(RAW.as_bytes()).unwrap();
        let pivoted = calculate_mni(PIVOTED.as_bytes()).unwrap();
        assert_eq!(raw, pivoted);
    }

    #[test]
    fn test_missing_columns_are_sorted() {
        let err = calculate_mni("TransectUID,Side\nT1,Left\n".as_bytes()).unwrap_err();
        match err {
            AnalysisError::MissingColumns(cols) => assert_eq!(
                cols,
                vec!["Pre: Age", "Pre: Sex", "Taxon Label", "What element is this?"]
            ),
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_transects_sort_numerically() {
        let csv = "\
TransectUID,Taxon Label,Pre: Age,Pre: Sex,What element is this?,Left
10,Deer,Adult,F,Femur,1
9,Deer,Adult,F,Femur,2
";
        let result = calculate_mni(csv.as_bytes()).unwrap();
        assert_eq!(result[0].transect, "9");
        assert_eq!(result[0].mni, 2);
        assert_eq!(result[1].transect, "10");
    }

    #[test]
    fn test_mixed_numeric_and_text_transects_sort_stably() {
        let mut csv = String::from(
            "TransectUID,Taxon Label,Pre: Age,Pre: Sex,What element is this?,Left\n",
        );
        for i in 1..=60 {
            csv.push_str(&format!("{},Deer,Adult,F,Femur,1\n", i));
            csv.push_str(&format!("{}A,Deer,Adult,F,Femur,2\n", i));
        }

        let result = calculate_mni(csv.as_bytes()).unwrap();
        assert_eq!(result.len(), 120);

        let ids: Vec<&str> = result.iter().map(|r| r.transect.as_str()).collect();
        let numeric: Vec<String> = (1..=60).map(|i| i.to_string()).collect();
        assert_eq!(ids[..60], numeric.iter().map(String::as_str).collect::<Vec<_>>()[..]);
        assert_eq!(ids[60], "10A");
        assert!(ids[60..].windows(2).all(|w| w[0] < w[1]));
        assert!(result[..60].iter().all(|r| r.mni == 1));
        assert!(result[60..].iter().all(|r| r.mni == 2));

        assert_eq!(calculate_mni(csv.as_bytes()).unwrap(), result);
    }

    #[test]
    fn test_write_mni() {
        let mut out = Vec::new();
        write_mni(
            &mut out,
            &[TransectMni { transect: "T1".to_string(), mni: 4 }],
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "TransectUID,MNI\nT1,4\n");
    }
}
