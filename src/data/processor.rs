//! Data Processor Module
//! Extracts group keys and numeric values from dataset columns.

use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),
    #[error("Dataset has no rows")]
    EmptyDataset,
    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),
}

/// A distinct value of a grouping column.
///
/// Keys are totally ordered: flags, then numbers, then text.
#[derive(Debug, Clone)]
pub enum GroupKey {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl GroupKey {
    fn rank(&self) -> u8 {
        match self {
            GroupKey::Flag(_) => 0,
            GroupKey::Number(_) => 1,
            GroupKey::Text(_) => 2,
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Flag(a), GroupKey::Flag(b)) => a.cmp(b),
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Flag(true) => write!(f, "True"),
            GroupKey::Flag(false) => write!(f, "False"),
            GroupKey::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            GroupKey::Number(n) => write!(f, "{}", n),
            GroupKey::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        GroupKey::Text(value.to_string())
    }
}

impl From<f64> for GroupKey {
    /// `-0.0` and `0.0` are the same key.
    fn from(value: f64) -> Self {
        GroupKey::Number(value + 0.0)
    }
}

impl From<bool> for GroupKey {
    fn from(value: bool) -> Self {
        GroupKey::Flag(value)
    }
}

/// Rows sharing one group key.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup {
    pub key: GroupKey,
    /// Rows carrying this key, including rows whose value is null.
    pub rows: usize,
    /// Non-null values of the value column.
    pub values: Vec<f64>,
}

impl RowGroup {
    fn new(key: GroupKey) -> Self {
        Self {
            key,
            rows: 0,
            values: Vec::new(),
        }
    }
}

/// Handles column lookup and extraction.
pub struct DataProcessor;

impl DataProcessor {
    /// Fail unless every named column exists and the dataset has rows.
    pub fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<(), ProcessorError> {
        for name in columns {
            if df.column(name).is_err() {
                return Err(ProcessorError::MissingColumn(name.to_string()));
            }
        }
        if df.height() == 0 {
            return Err(ProcessorError::EmptyDataset);
        }
        Ok(())
    }

    pub fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Boolean
                | DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    /// Values of a numeric column as f64; nulls and NaN become `None`.
    /// Boolean columns read as 0/1.
    pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let column = df
            .column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))?;
        if !Self::is_numeric(column.dtype()) {
            return Err(ProcessorError::NonNumericColumn(name.to_string()));
        }

        let value_f64 = column.cast(&DataType::Float64)?;
        let value_ca = value_f64.f64()?;
        Ok(value_ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Group key of every row; nulls become `None`.
    pub fn group_keys(df: &DataFrame, name: &str) -> Result<Vec<Option<GroupKey>>, ProcessorError> {
        let column = df
            .column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))?;

        let keys = match column.dtype() {
            DataType::Boolean => column
                .bool()?
                .into_iter()
                .map(|v| v.map(GroupKey::Flag))
                .collect(),
            DataType::String => column
                .str()?
                .into_iter()
                .map(|v| v.map(GroupKey::from))
                .collect(),
            dtype if Self::is_numeric(dtype) => {
                let value_f64 = column.cast(&DataType::Float64)?;
                let value_ca = value_f64.f64()?;
                value_ca
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()).map(GroupKey::from))
                    .collect()
            }
            _ => {
                let as_text = column.cast(&DataType::String)?;
                let text_ca = as_text.str()?;
                text_ca
                    .into_iter()
                    .map(|v| v.map(GroupKey::from))
                    .collect()
            }
        };

        Ok(keys)
    }

    /// Partition the value column by the group column.
    ///
    /// Groups come back in order of first appearance. Rows with a null key
    /// are dropped.
    pub fn group_rows(
        df: &DataFrame,
        group_col: &str,
        value_col: &str,
    ) -> Result<Vec<RowGroup>, ProcessorError> {
        Self::require_columns(df, &[group_col, value_col])?;

        let keys = Self::group_keys(df, group_col)?;
        let values = Self::numeric_values(df, value_col)?;

        let mut index: BTreeMap<GroupKey, usize> = BTreeMap::new();
        let mut groups: Vec<RowGroup> = Vec::new();

        for (key, value) in keys.into_iter().zip(values) {
            let Some(key) = key else {
                continue;
            };

            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(RowGroup::new(key));
                groups.len() - 1
            });

            let group = &mut groups[slot];
            group.rows += 1;
            if let Some(v) = value {
                group.values.push(v);
            }
        }

        Ok(groups)
    }

    /// (x, y) pairs for rows where both columns hold a number.
    pub fn paired_values(
        df: &DataFrame,
        x_col: &str,
        y_col: &str,
    ) -> Result<Vec<(f64, f64)>, ProcessorError> {
        Self::require_columns(df, &[x_col, y_col])?;

        let xs = Self::numeric_values(df, x_col)?;
        let ys = Self::numeric_values(df, y_col)?;

        Ok(xs
            .into_iter()
            .zip(ys)
            .filter_map(|pair| match pair {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_key_ordering_and_display() {
        let mut keys = vec![
            GroupKey::from("senior"),
            GroupKey::from(1.0),
            GroupKey::from(true),
            GroupKey::from(0.0),
            GroupKey::from("junior"),
            GroupKey::from(false),
        ];
        keys.sort();

        let labels: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["False", "True", "0", "1", "junior", "senior"]);
        assert_eq!(GroupKey::from(3.5).to_string(), "3.5");
    }

    #[test]
    fn test_group_rows_keeps_first_appearance_order() {
        let df = df!(
            "seniority" => [Some("senior"), Some("na"), None, Some("senior"), Some("jr")],
            "avg_salary" => [Some(80.0), Some(50.0), Some(10.0), None, Some(40.0)]
        )
        .unwrap();

        let groups = DataProcessor::group_rows(&df, "seniority", "avg_salary").unwrap();
        let keys: Vec<String> = groups.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, vec!["senior", "na", "jr"]);

        // null salary still counts as a row of its group
        assert_eq!(groups[0].rows, 2);
        assert_eq!(groups[0].values, vec![80.0]);
    }

    #[test]
    fn test_numeric_keys_group_by_value() {
        let df = df!(
            "employer_provided" => [0i64, 1, 0, 0],
            "avg_salary" => [10.0, 20.0, 30.0, 50.0]
        )
        .unwrap();

        let groups = DataProcessor::group_rows(&df, "employer_provided", "avg_salary").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, GroupKey::Number(0.0));
        assert_eq!(groups[0].values, vec![10.0, 30.0, 50.0]);
        assert_eq!(groups[1].key, GroupKey::Number(1.0));
    }

    #[test]
    fn test_signed_zero_keys_share_a_group() {
        let df = df!(
            "k" => [0.0, -0.0, 0.0],
            "avg_salary" => [10.0, 20.0, 30.0]
        )
        .unwrap();

        let groups = DataProcessor::group_rows(&df, "k", "avg_salary").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key.to_string(), "0");
        assert_eq!(groups[0].values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_missing_column_is_reported_by_name() {
        let df = df!("Industry" => ["A"], "avg_salary" => [1.0]).unwrap();

        let err = DataProcessor::group_rows(&df, "Industry", "salary").unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn(ref c) if c == "salary"));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let df = df!(
            "Industry" => Vec::<String>::new(),
            "avg_salary" => Vec::<f64>::new()
        )
        .unwrap();

        let err = DataProcessor::group_rows(&df, "Industry", "avg_salary").unwrap_err();
        assert!(matches!(err, ProcessorError::EmptyDataset));
    }

    #[test]
    fn test_text_value_column_is_not_numeric() {
        let df = df!("Industry" => ["A", "B"], "Size" => ["1 to 50", "51 to 200"]).unwrap();

        let err = DataProcessor::group_rows(&df, "Industry", "Size").unwrap_err();
        assert!(matches!(err, ProcessorError::NonNumericColumn(ref c) if c == "Size"));
    }

    #[test]
    fn test_paired_values_drop_incomplete_rows() {
        let df = df!(
            "Rating" => [Some(3.5), None, Some(4.0)],
            "avg_salary" => [Some(60.0), Some(70.0), None]
        )
        .unwrap();

        let pairs = DataProcessor::paired_values(&df, "Rating", "avg_salary").unwrap();
        assert_eq!(pairs, vec![(3.5, 60.0)]);
    }
}
