//! Pairwise comparison of consecutive field seasons.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::Serialize;
use tracing::{debug, warn};

use super::Table;
use super::stats::{mean, round4, welch_t_test};
use crate::domain::AnalysisError;

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonOptions {
    pub season_column: String,
    pub value_column: String,
    pub alpha: f64,
}

impl Default for SeasonOptions {
    fn default() -> Self {
        Self {
            season_column: "Year".to_string(),
            value_column: "Pre: Distance spotted".to_string(),
            alpha: 0.05,
        }
    }
}

/// Comparison between two consecutive seasons.
///
/// The t-statistic is for season B against season A, so a positive value
/// means B's mean is higher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonComparison {
    #[serde(rename = "Field Season A")]
    pub season_a: i64,
    #[serde(rename = "Field Season B")]
    pub season_b: i64,
    #[serde(rename = "Mean A")]
    pub mean_a: f64,
    #[serde(rename = "Mean B")]
    pub mean_b: f64,
    #[serde(rename = "T-stat")]
    pub t_stat: f64,
    #[serde(rename = "p-value")]
    pub p_value: f64,
    #[serde(rename = "Significant (p<0.05)")]
    pub significant: bool,
}

fn parse_season(raw: &str) -> Option<i64> {
    if let Ok(season) = raw.parse::<i64>() {
        return Some(season);
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

/// Runs Welch's t-test between each pair of consecutive seasons.
///
/// Seasons come from the distinct non-missing values of the season column,
/// in ascending order. A pair is skipped when either season has no values.
pub fn compare_consecutive_seasons<R: Read>(
    reader: R,
    options: &SeasonOptions,
) -> Result<Vec<SeasonComparison>, AnalysisError> {
    let table = Table::read(reader)?;
    table.require(&[options.season_column.as_str(), options.value_column.as_str()])?;

    let mut groups: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for row in table.rows() {
        let Some(season) = table
            .cell(row, &options.season_column)
            .and_then(parse_season)
        else {
            continue;
        };
        let values = groups.entry(season).or_default();
        if let Some(value) = table
            .cell(row, &options.value_column)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| !v.is_nan())
        {
            values.push(value);
        }
    }
    debug!(seasons = groups.len(), "Grouped values by season");

    let seasons: Vec<(&i64, &Vec<f64>)> = groups.iter().collect();
    let mut results = Vec::new();
    for pair in seasons.windows(2) {
        let (&season_a, group_a) = pair[0];
        let (&season_b, group_b) = pair[1];

        if group_a.is_empty() || group_b.is_empty() {
            warn!(season_a, season_b, "Skipping comparison due to missing data");
            continue;
        }

        let test = welch_t_test(group_b, group_a);
        results.push(SeasonComparison {
            season_a,
            season_b,
            mean_a: round4(mean(group_a)),
            mean_b: round4(mean(group_b)),
            t_stat: round4(test.t_stat),
            p_value: round4(test.p_value),
            significant: test.p_value < options.alpha,
        });
    }
    Ok(results)
}

pub fn write_comparisons<W: Write>(
    writer: W,
    rows: &[SeasonComparison],
) -> Result<(), AnalysisError> {
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

    const DATA: &str = "\
Year,Pre: Distance spotted
2019,1
2019,2
2019,3
2019,4
2020,2
2020,3
2020,4
2020,5
2021,
2022,20
2022,22
2022,19
2023,10
2023,12
2023,11
";

    #[test]
    fn test_consecutive_pairs_skip_empty_groups() {
        let results = compare_consecutive_seasons(DATA.as_bytes(), &SeasonOptions::default())
            .unwrap();
        let pairs: Vec<(i64, i64)> = results.iter().map(|r| (r.season_a, r.season_b)).collect();
        assert_eq!(pairs, vec![(2019, 2020), (2022, 2023)]);
    }

    #[test]
    fn test_comparison_values() {
        let results = compare_consecutive_seasons(DATA.as_bytes(), &SeasonOptions::default())
            .unwrap();
        let first = &results[0];
        assert_eq!(first.mean_a, 2.5);
        assert_eq!(first.mean_b, 3.5);
        assert_eq!(first.t_stat, 1.0954);
        assert_eq!(first.p_value, 0.3153);
        assert!(!first.significant);

        let second = &results[1];
        assert!(second.t_stat < 0.0);
        assert!(second.p_value < 0.05);
        assert!(second.significant);
    }

    #[test]
    fn test_custom_columns_and_alpha() {
        let csv = "season,score\n1,1\n1,2\n1,3\n1,4\n2,2\n2,3\n2,4\n2,5\n";
        let options = SeasonOptions {
            season_column: "season".to_string(),
            value_column: "score".to_string(),
            alpha: 0.5,
        };
        let results = compare_consecutive_seasons(csv.as_bytes(), &options).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].significant);
    }

    #[test]
    fn test_missing_value_column() {
        let err = compare_consecutive_seasons("Year\n2019\n".as_bytes(), &SeasonOptions::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumns(cols) if cols == vec!["Pre: Distance spotted"]));
    }

    #[test]
    fn test_float_seasons_are_accepted() {
        assert_eq!(parse_season("2019.0"), Some(2019));
        assert_eq!(parse_season("2019.5"), None);
        assert_eq!(parse_season("abc"), None);
    }

    #[test]
    fn test_write_comparisons_header() {
        let mut out = Vec::new();
        write_comparisons(&mut out, &[]).unwrap();
        let results = compare_consecutive_seasons(DATA.as_bytes(), &SeasonOptions::default())
            .unwrap();
        write_comparisons(&mut out, &results[..1]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(
            "Field Season A,Field Season B,Mean A,Mean B,T-stat,p-value,Significant (p<0.05)\n"
        ));
        assert!(text.contains("2019,2020,2.5,3.5,1.0954,0.3153,false"));
    }
}
