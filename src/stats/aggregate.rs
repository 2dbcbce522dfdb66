//! Aggregation Module
//! Group-by reductions over a dataset, ranked and truncated per chart.

use crate::data::{DataProcessor, GroupKey, ProcessorError, RowGroup};
use polars::prelude::DataFrame;
use tracing::debug;

/// Function collapsing one group's values into a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Arithmetic mean of the non-null values.
    Mean,
    /// Number of rows in the group.
    Count,
}

impl Reduction {
    /// Reduce a group, or `None` when the group has nothing to reduce.
    pub fn apply(&self, group: &RowGroup) -> Option<f64> {
        match self {
            Reduction::Mean if group.values.is_empty() => None,
            Reduction::Mean => Some(arithmetic_mean(&group.values)),
            Reduction::Count => Some(group.rows as f64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesOrder {
    #[default]
    ByKey,
    ValueDescending,
}

/// Group-by key, value column, reduction, ordering and optional top-N.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSpec {
    pub group_by: String,
    pub value: String,
    pub reduction: Reduction,
    pub order: SeriesOrder,
    pub limit: Option<usize>,
}

impl AggregateSpec {
    pub fn mean(group_by: &str, value: &str) -> Self {
        Self {
            group_by: group_by.to_string(),
            value: value.to_string(),
            reduction: Reduction::Mean,
            order: SeriesOrder::ByKey,
            limit: None,
        }
    }

    pub fn count(group_by: &str, value: &str) -> Self {
        Self {
            reduction: Reduction::Count,
            ..Self::mean(group_by, value)
        }
    }

    pub fn descending(mut self) -> Self {
        self.order = SeriesOrder::ValueDescending;
        self
    }

    pub fn top(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesEntry {
    pub key: GroupKey,
    pub value: f64,
}

/// Ordered mapping from group key to reduced value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateSeries {
    pub entries: Vec<SeriesEntry>,
}

impl AggregateSeries {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| &e.key == key)
            .map(|e| e.value)
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key.to_string()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.value).collect()
    }

    /// Stable sort, largest value first.
    pub fn sort_descending(&mut self) {
        self.entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    }

    pub fn truncate(&mut self, n: usize) {
        self.entries.truncate(n);
    }
}

fn arithmetic_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Group `spec.value` by `spec.group_by` and reduce each group.
///
/// Groups are traversed in key order, so descending ties keep key order.
pub fn aggregate(df: &DataFrame, spec: &AggregateSpec) -> Result<AggregateSeries, ProcessorError> {
    let mut groups = DataProcessor::group_rows(df, &spec.group_by, &spec.value)?;
    groups.sort_by(|a, b| a.key.cmp(&b.key));

    let entries = groups
        .iter()
        .filter_map(|group| {
            spec.reduction.apply(group).map(|value| SeriesEntry {
                key: group.key.clone(),
                value,
            })
        })
        .collect();

    let mut series = AggregateSeries { entries };
    if spec.order == SeriesOrder::ValueDescending {
        series.sort_descending();
    }
    if let Some(n) = spec.limit {
        series.truncate(n);
    }

    debug!(
        group_by = %spec.group_by,
        value = %spec.value,
        groups = series.len(),
        "aggregate computed"
    );
    Ok(series)
}

/// Percentage of rows flagged 1 in each 0/1 indicator column.
///
/// Computed as `mean(column) * 100`; columns keep the given order.
pub fn indicator_share(df: &DataFrame, columns: &[String]) -> Result<AggregateSeries, ProcessorError> {
    let names: Vec<&str> = columns.iter().map(String::as_str).collect();
    DataProcessor::require_columns(df, &names)?;

    let mut entries = Vec::with_capacity(columns.len());
    for name in &names {
        let flags: Vec<f64> = DataProcessor::numeric_values(df, name)?
            .into_iter()
            .flatten()
            .collect();
        if flags.is_empty() {
            continue;
        }
        entries.push(SeriesEntry {
            key: GroupKey::from(*name),
            value: arithmetic_mean(&flags) * 100.0,
        });
    }

    Ok(AggregateSeries { entries })
}

/// Mean of `value_col` over the rows where each indicator equals 1.
///
/// An indicator with no row equal to 1 is left out of the series rather than
/// reported as zero. The result is sorted descending.
pub fn indicator_mean(
    df: &DataFrame,
    columns: &[String],
    value_col: &str,
) -> Result<AggregateSeries, ProcessorError> {
    let mut names: Vec<&str> = columns.iter().map(String::as_str).collect();
    names.push(value_col);
    DataProcessor::require_columns(df, &names)?;
    names.pop();

    let values = DataProcessor::numeric_values(df, value_col)?;

    let mut series = AggregateSeries::default();
    for name in names {
        let flags = DataProcessor::numeric_values(df, name)?;
        let selected: Vec<f64> = flags
            .iter()
            .zip(&values)
            .filter_map(|(flag, value)| match (flag, value) {
                (Some(f), Some(v)) if *f == 1.0 => Some(*v),
                _ => None,
            })
            .collect();

        if selected.is_empty() {
            debug!(indicator = name, "indicator never set, omitted");
            continue;
        }
        series.entries.push(SeriesEntry {
            key: GroupKey::from(name),
            value: arithmetic_mean(&selected),
        });
    }

    series.sort_descending();
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn skills() -> Vec<String> {
        ["python_yn", "R_yn", "spark"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_mean_by_industry() {
        let df = df!(
            "Industry" => ["A", "A", "B"],
            "avg_salary" => [50000.0, 70000.0, 100000.0]
        )
        .unwrap();

        let series = aggregate(&df, &AggregateSpec::mean("Industry", "avg_salary")).unwrap();
        assert_eq!(series.labels(), vec!["A", "B"]);
        assert_eq!(series.values(), vec![60000.0, 100000.0]);

        let ranked = aggregate(
            &df,
            &AggregateSpec::mean("Industry", "avg_salary").descending(),
        )
        .unwrap();
        assert_eq!(ranked.labels(), vec!["B", "A"]);
        assert_eq!(ranked.values(), vec![100000.0, 60000.0]);
    }

    #[test]
    fn test_one_entry_per_distinct_key() {
        let df = df!(
            "job_state" => ["Berlin", "Bayern", "Berlin", "Hessen", "Bayern", "Berlin"],
            "avg_salary" => [60.0, 70.0, 66.0, 55.0, 74.0, 63.0]
        )
        .unwrap();

        let series = aggregate(&df, &AggregateSpec::mean("job_state", "avg_salary")).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(&GroupKey::from("Berlin")), Some(63.0));
        assert_eq!(series.get(&GroupKey::from("Bayern")), Some(72.0));
        assert_eq!(series.get(&GroupKey::from("Hessen")), Some(55.0));
    }

    #[test]
    fn test_descending_is_monotone_and_ties_keep_key_order() {
        let df = df!(
            "seniority" => ["mid", "jr", "senior", "na", "lead"],
            "avg_salary" => [50.0, 40.0, 80.0, 50.0, 80.0]
        )
        .unwrap();

        let series = aggregate(
            &df,
            &AggregateSpec::mean("seniority", "avg_salary").descending(),
        )
        .unwrap();

        for pair in series.entries.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
        assert_eq!(series.labels(), vec!["lead", "senior", "mid", "na", "jr"]);
    }

    #[test]
    fn test_top_n_is_prefix_of_full_ranking() {
        let industries: Vec<String> = (0..15).map(|i| format!("industry_{i:02}")).collect();
        let salaries: Vec<f64> = (0..15).map(|i| ((i * 7) % 15) as f64 * 1000.0).collect();
        let df = df!("Industry" => industries, "avg_salary" => salaries).unwrap();

        let full = aggregate(&df, &AggregateSpec::mean("Industry", "avg_salary").descending()).unwrap();
        let top = aggregate(
            &df,
            &AggregateSpec::mean("Industry", "avg_salary").descending().top(10),
        )
        .unwrap();

        assert_eq!(top.len(), 10);
        assert_eq!(top.entries[..], full.entries[..10]);
    }

    #[test]
    fn test_top_n_larger_than_group_count() {
        let df = df!("Industry" => ["A", "B"], "avg_salary" => [1.0, 2.0]).unwrap();

        let series = aggregate(
            &df,
            &AggregateSpec::mean("Industry", "avg_salary").descending().top(10),
        )
        .unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_count_includes_rows_with_null_values() {
        let df = df!(
            "Size" => ["small", "large", "small", "small"],
            "avg_salary" => [Some(1.0), Some(2.0), None, Some(3.0)]
        )
        .unwrap();

        let series = aggregate(&df, &AggregateSpec::count("Size", "avg_salary")).unwrap();
        assert_eq!(series.get(&GroupKey::from("small")), Some(3.0));
        assert_eq!(series.get(&GroupKey::from("large")), Some(1.0));
    }

    #[test]
    fn test_group_without_numeric_values_is_omitted() {
        let df = df!(
            "Industry" => ["A", "B", "B"],
            "avg_salary" => [Some(10.0), None, None]
        )
        .unwrap();

        let series = aggregate(&df, &AggregateSpec::mean("Industry", "avg_salary")).unwrap();
        assert_eq!(series.labels(), vec!["A"]);
    }

    #[test]
    fn test_negative_zero_key_is_not_a_separate_group() {
        let df = df!(
            "employer_provided" => [0.0, -0.0, 0.0],
            "avg_salary" => [10.0, 20.0, 30.0]
        )
        .unwrap();

        let series = aggregate(&df, &AggregateSpec::mean("employer_provided", "avg_salary")).unwrap();
        assert_eq!(series.labels(), vec!["0"]);
        assert_eq!(series.values(), vec![20.0]);
    }

    #[test]
    fn test_missing_column_fails() {
        let df = df!("Industry" => ["A"], "avg_salary" => [1.0]).unwrap();

        let err = aggregate(&df, &AggregateSpec::mean("job_state", "avg_salary")).unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn(ref c) if c == "job_state"));
    }

    #[test]
    fn test_indicator_share_is_percentage_of_ones() {
        let df = df!(
            "python_yn" => [1i64, 1, 0, 1],
            "R_yn" => [0i64, 0, 0, 0],
            "spark" => [1i64, 0, 0, 0]
        )
        .unwrap();

        let series = indicator_share(&df, &skills()).unwrap();
        assert_eq!(series.labels(), vec!["python_yn", "R_yn", "spark"]);
        assert_eq!(series.values(), vec![75.0, 0.0, 25.0]);
    }

    #[test]
    fn test_indicator_mean_omits_skills_never_required() {
        let df = df!(
            "python_yn" => [0i64, 0, 0],
            "R_yn" => [1i64, 0, 1],
            "spark" => [1i64, 1, 0],
            "avg_salary" => [60.0, 90.0, 40.0]
        )
        .unwrap();

        let series = indicator_mean(&df, &skills(), "avg_salary").unwrap();
        assert_eq!(series.labels(), vec!["spark", "R_yn"]);
        assert_eq!(series.values(), vec![75.0, 50.0]);
        assert_eq!(series.get(&GroupKey::from("python_yn")), None);
    }

    #[test]
    fn test_boolean_indicators_read_as_zero_one() {
        let df = df!(
            "python_yn" => [true, false, true, false],
            "R_yn" => [false, false, false, false],
            "spark" => [false, true, false, false],
            "avg_salary" => [80.0, 50.0, 60.0, 40.0]
        )
        .unwrap();

        let share = indicator_share(&df, &skills()).unwrap();
        assert_eq!(share.values(), vec![50.0, 0.0, 25.0]);

        let mean = indicator_mean(&df, &skills(), "avg_salary").unwrap();
        assert_eq!(mean.labels(), vec!["python_yn", "spark"]);
        assert_eq!(mean.values(), vec![70.0, 50.0]);
    }

    #[test]
    fn test_indicator_mean_omits_skill_without_salaries() {
        let df = df!(
            "python_yn" => [1i64, 0, 1],
            "R_yn" => [0i64, 1, 0],
            "spark" => [0i64, 0, 0],
            "avg_salary" => [Some(70.0), None, Some(50.0)]
        )
        .unwrap();

        let series = indicator_mean(&df, &skills(), "avg_salary").unwrap();
        assert_eq!(series.labels(), vec!["python_yn"]);
        assert_eq!(series.values(), vec![60.0]);
    }

    #[test]
    fn test_indicator_mean_requires_value_column() {
        let df = df!("python_yn" => [1i64], "R_yn" => [1i64], "spark" => [0i64]).unwrap();

        let err = indicator_mean(&df, &skills(), "avg_salary").unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn(ref c) if c == "avg_salary"));
    }
}
