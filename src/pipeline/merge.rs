use crate::error::{EnricherError, Result};
use crate::observability::metrics;
use crate::tabular::Dataset;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::{info, instrument};

const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

/// Which unmatched rows survive a join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum JoinMode {
    /// Only keys present on both sides
    #[default]
    Inner,
    /// Every left row, right columns empty when unmatched
    Left,
    /// Every right row, left columns empty when unmatched
    Right,
    /// Union of keys from both sides
    Outer,
}

impl JoinMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinMode::Inner => "inner",
            JoinMode::Left => "left",
            JoinMode::Right => "right",
            JoinMode::Outer => "outer",
        }
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row counts reported after a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub left_rows: usize,
    pub right_rows: usize,
    pub merged_rows: usize,
}

/// Column layout of a join result, computed once from both headers.
struct JoinLayout {
    headers: Vec<String>,
    left_key: usize,
    right_key: usize,
    right_columns: Vec<usize>,
}

impl JoinLayout {
    /// Fails when a suffixed name collides with another output column.
    fn new(left: &Dataset, right: &Dataset, left_key: usize, right_key: usize) -> Result<Self> {
        let left_names: HashSet<&str> = left
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != left_key)
            .map(|(_, h)| h.as_str())
            .collect();
        let right_names: HashSet<&str> = right
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != right_key)
            .map(|(_, h)| h.as_str())
            .collect();

        let mut headers = Vec::with_capacity(left.headers.len() + right.headers.len() - 1);
        for (i, name) in left.headers.iter().enumerate() {
            if i != left_key && right_names.contains(name.as_str()) {
                headers.push(format!("{}{}", name, LEFT_SUFFIX));
            } else {
                headers.push(name.clone());
            }
        }

        let right_columns: Vec<usize> = (0..right.headers.len()).filter(|i| *i != right_key).collect();
        for &i in &right_columns {
            let name = &right.headers[i];
            if left_names.contains(name.as_str()) {
                headers.push(format!("{}{}", name, RIGHT_SUFFIX));
            } else {
                headers.push(name.clone());
            }
        }

        let mut seen = HashSet::with_capacity(headers.len());
        for name in &headers {
            if !seen.insert(name.as_str()) {
                return Err(EnricherError::DuplicateColumn(name.clone()));
            }
        }

        Ok(Self {
            headers,
            left_key,
            right_key,
            right_columns,
        })
    }

    /// Build one output row. The key cell comes from whichever side is present.
    fn row(&self, left_width: usize, left: Option<&[String]>, right: Option<&[String]>) -> Vec<String> {
        let key = left
            .map(|l| l[self.left_key].clone())
            .or_else(|| right.map(|r| r[self.right_key].clone()))
            .unwrap_or_default();

        let mut out = Vec::with_capacity(self.headers.len());
        for i in 0..left_width {
            if i == self.left_key {
                out.push(key.clone());
            } else {
                out.push(left.map(|l| l[i].clone()).unwrap_or_default());
            }
        }
        for &i in &self.right_columns {
            out.push(right.map(|r| r[i].clone()).unwrap_or_default());
        }
        out
    }
}

fn index_by_key(dataset: &Dataset, key: usize) -> HashMap<&str, Vec<usize>> {
    let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in dataset.rows.iter().enumerate() {
        index.entry(row[key].as_str()).or_default().push(i);
    }
    index
}

/// Numeric order when both keys parse as numbers, text order otherwise.
fn compare_keys(a: &str, b: &str, numeric: bool) -> Ordering {
    if numeric {
        if let (Ok(x), Ok(y)) = (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
            return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        }
    }
    a.cmp(b)
}

/// Stable sort of rows by the key cell. All-numeric key columns sort by value.
fn sort_rows_by_key(dataset: &mut Dataset, key: usize) {
    let numeric = dataset
        .rows
        .iter()
        .all(|row| row[key].trim().parse::<f64>().is_ok());
    dataset
        .rows
        .sort_by(|a, b| compare_keys(&a[key], &b[key], numeric));
}

/// Join two datasets on `key`.
///
/// Fails with `MissingColumn` naming `left_name` or `right_name` when the key
/// is absent from that side. Duplicate keys produce the cross-product of their
/// rows. Non-key columns present on both sides get `_x`/`_y` suffixes; a
/// suffixed name that clashes with an existing column is a `DuplicateColumn`
/// error. Outer joins come back sorted by key.
pub fn merge_named(
    left: &Dataset,
    left_name: &str,
    right: &Dataset,
    right_name: &str,
    key: &str,
    mode: JoinMode,
) -> Result<Dataset> {
    let left_key = left
        .column_index(key)
        .ok_or_else(|| EnricherError::missing_column(key, left_name))?;
    let right_key = right
        .column_index(key)
        .ok_or_else(|| EnricherError::missing_column(key, right_name))?;

    let layout = JoinLayout::new(left, right, left_key, right_key)?;
    let left_width = left.headers.len();
    let mut merged = Dataset::new(layout.headers.clone());

    match mode {
        JoinMode::Right => {
            let left_index = index_by_key(left, left_key);
            for r in &right.rows {
                match left_index.get(r[right_key].as_str()) {
                    Some(matches) => {
                        for &l in matches {
                            merged.push_row(layout.row(left_width, Some(left.rows[l].as_slice()), Some(r.as_slice())));
                        }
                    }
                    None => merged.push_row(layout.row(left_width, None, Some(r.as_slice()))),
                }
            }
        }
        JoinMode::Inner | JoinMode::Left | JoinMode::Outer => {
            let right_index = index_by_key(right, right_key);
            for l in &left.rows {
                match right_index.get(l[left_key].as_str()) {
                    Some(matches) => {
                        for &r in matches {
                            merged.push_row(layout.row(left_width, Some(l.as_slice()), Some(right.rows[r].as_slice())));
                        }
                    }
                    None if mode != JoinMode::Inner => {
                        merged.push_row(layout.row(left_width, Some(l.as_slice()), None));
                    }
                    None => {}
                }
            }

            if mode == JoinMode::Outer {
                let left_keys: HashSet<&str> = left.rows.iter().map(|l| l[left_key].as_str()).collect();
                for r in right.rows.iter().filter(|r| !left_keys.contains(r[right_key].as_str())) {
                    merged.push_row(layout.row(left_width, None, Some(r.as_slice())));
                }
                sort_rows_by_key(&mut merged, left_key);
            }
        }
    }

    Ok(merged)
}

/// Join two datasets on `key`, labelling them "left dataset" and "right
/// dataset" in errors.
pub fn merge(left: &Dataset, right: &Dataset, key: &str, mode: JoinMode) -> Result<Dataset> {
    merge_named(left, "left dataset", right, "right dataset", key, mode)
}

/// Read two CSV files, join them on `key` and write the result to `output`.
///
/// Nothing is written unless the merge succeeds.
#[instrument(skip_all, fields(key = %key, mode = %mode))]
pub fn merge_files(
    file1: &Path,
    file2: &Path,
    output: &Path,
    key: &str,
    mode: JoinMode,
) -> Result<MergeSummary> {
    let left = Dataset::read_path(file1)?;
    let right = Dataset::read_path(file2)?;

    let merged = merge_named(
        &left,
        &file1.display().to_string(),
        &right,
        &file2.display().to_string(),
        key,
        mode,
    )?;
    merged.write_path(output)?;
    metrics::output::merge_rows(merged.len());

    let summary = MergeSummary {
        left_rows: left.len(),
        right_rows: right.len(),
        merged_rows: merged.len(),
    };
    info!(
        "Merged {} records from {} and {} input records into {}",
        summary.merged_rows,
        summary.left_rows,
        summary.right_rows,
        output.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
        let mut d = Dataset::new(headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            d.push_row(row.iter().map(|c| c.to_string()).collect());
        }
        d
    }

    fn sample() -> (Dataset, Dataset) {
        let left = dataset(&["id", "x"], &[&["1", "a"], &["3", "d"]]);
        let right = dataset(&["id", "y"], &[&["1", "b"], &["2", "c"]]);
        (left, right)
    }

    #[test]
    fn test_inner_keeps_only_shared_keys() {
        let (left, right) = sample();
        let merged = merge(&left, &right, "id", JoinMode::Inner).unwrap();

        assert_eq!(merged.headers, vec!["id", "x", "y"]);
        assert_eq!(merged.rows, vec![vec!["1", "a", "b"]]);
    }

    #[test]
    fn test_left_preserves_all_left_rows() {
        let (left, right) = sample();
        let merged = merge(&left, &right, "id", JoinMode::Left).unwrap();

        assert_eq!(merged.len(), left.len());
        assert_eq!(merged.rows[1], vec!["3", "d", ""]);
    }

    #[test]
    fn test_right_preserves_all_right_rows() {
        let (left, right) = sample();
        let merged = merge(&left, &right, "id", JoinMode::Right).unwrap();

        assert_eq!(merged.rows, vec![vec!["1", "a", "b"], vec!["2", "", "c"]]);
    }

    #[test]
    fn test_outer_unions_keys() {
        let left = dataset(&["id", "x"], &[&["1", "a"]]);
        let right = dataset(&["id", "y"], &[&["1", "b"], &["2", "c"]]);
        let merged = merge(&left, &right, "id", JoinMode::Outer).unwrap();

        assert_eq!(merged.headers, vec!["id", "x", "y"]);
        assert_eq!(merged.rows, vec![vec!["1", "a", "b"], vec!["2", "", "c"]]);
    }

    #[test]
    fn test_duplicate_keys_produce_cross_product() {
        let left = dataset(&["id", "x"], &[&["1", "a1"], &["1", "a2"]]);
        let right = dataset(&["id", "y"], &[&["1", "b1"], &["1", "b2"], &["1", "b3"]]);
        let merged = merge(&left, &right, "id", JoinMode::Inner).unwrap();

        assert_eq!(merged.len(), 6);
        assert_eq!(merged.rows[0], vec!["1", "a1", "b1"]);
        assert_eq!(merged.rows[5], vec!["1", "a2", "b3"]);
    }

    #[test]
    fn test_overlapping_columns_are_suffixed() {
        let left = dataset(&["Business Name", "city", "phone"], &[&["Acme", "Seattle", "555"]]);
        let right = dataset(&["city", "Business Name", "rating"], &[&["Tacoma", "Acme", "4.5"]]);
        let merged = merge(&left, &right, "Business Name", JoinMode::Inner).unwrap();

        assert_eq!(
            merged.headers,
            vec!["Business Name", "city_x", "phone", "city_y", "rating"]
        );
        assert_eq!(merged.rows[0], vec!["Acme", "Seattle", "555", "Tacoma", "4.5"]);
    }

    #[test]
    fn test_key_position_follows_left_header() {
        let left = dataset(&["x", "id"], &[&["a", "1"]]);
        let right = dataset(&["id", "y"], &[&["2", "c"]]);
        let merged = merge(&left, &right, "id", JoinMode::Outer).unwrap();

        assert_eq!(merged.headers, vec!["x", "id", "y"]);
        assert_eq!(merged.rows[1], vec!["", "2", "c"]);
    }

    #[test]
    fn test_missing_key_names_dataset() {
        let left = dataset(&["id"], &[]);
        let right = dataset(&["other"], &[]);
        let err = merge_named(&left, "a.csv", &right, "b.csv", "id", JoinMode::Inner).unwrap_err();

        match err {
            EnricherError::MissingColumn { column, source_name } => {
                assert_eq!(column, "id");
                assert_eq!(source_name, "b.csv");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_outer_sorts_by_key() {
        let left = dataset(&["id", "x"], &[&["3", "c"], &["1", "a"]]);
        let right = dataset(&["id", "y"], &[&["2", "b"], &["0", "z"]]);
        let merged = merge(&left, &right, "id", JoinMode::Outer).unwrap();

        let keys: Vec<&str> = merged.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(keys, vec!["0", "1", "2", "3"]);
        assert_eq!(merged.rows[0], vec!["0", "", "z"]);
        assert_eq!(merged.rows[3], vec!["3", "c", ""]);
    }

    #[test]
    fn test_outer_sorts_numeric_keys_by_value() {
        let left = dataset(&["id", "x"], &[&["10", "a"]]);
        let right = dataset(&["id", "y"], &[&["9", "b"]]);
        let merged = merge(&left, &right, "id", JoinMode::Outer).unwrap();

        let keys: Vec<&str> = merged.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(keys, vec!["9", "10"]);
    }

    #[test]
    fn test_outer_sorts_text_keys_and_keeps_duplicates_stable() {
        let left = dataset(&["name", "x"], &[&["beta", "1"], &["alpha", "2"], &["beta", "3"]]);
        let right = dataset(&["name", "y"], &[&["gamma", "4"]]);
        let merged = merge(&left, &right, "name", JoinMode::Outer).unwrap();

        let cells: Vec<(&str, &str)> = merged
            .rows
            .iter()
            .map(|r| (r[0].as_str(), r[1].as_str()))
            .collect();
        assert_eq!(
            cells,
            vec![("alpha", "2"), ("beta", "1"), ("beta", "3"), ("gamma", "")]
        );
    }

    #[test]
    fn test_suffix_clash_is_rejected() {
        let left = dataset(&["id", "city", "city_x"], &[&["1", "a", "b"]]);
        let right = dataset(&["id", "city"], &[&["1", "c"]]);
        let err = merge(&left, &right, "id", JoinMode::Inner).unwrap_err();

        match err {
            EnricherError::DuplicateColumn(name) => assert_eq!(name, "city_x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_join_mode_from_cli_value() {
        use clap::ValueEnum;

        assert_eq!(JoinMode::from_str("OUTER", true).unwrap(), JoinMode::Outer);
        assert_eq!(JoinMode::default(), JoinMode::Inner);
        assert!(JoinMode::from_str("cross", true).is_err());
        assert_eq!(JoinMode::Left.to_string(), "left");
    }
}
