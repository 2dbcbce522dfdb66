//! Chart Specifications
//! The dashboard's charts as an ordered list of declarative specs.

use crate::config::DashboardConfig;
use crate::stats::AggregateSpec;

/// 0/1 skill indicator columns.
pub const SKILL_COLUMNS: [&str; 5] = ["python_yn", "R_yn", "spark", "aws", "excel"];

pub const SALARY_COLUMN: &str = "avg_salary";
const SALARY_LABEL: &str = "Average Salary (€)";

/// What a chart computes from the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    /// One bar per group of an aggregate.
    Bar {
        aggregate: AggregateSpec,
        horizontal: bool,
    },
    /// Raw (x, y) pairs, optionally with a fitted line.
    Scatter {
        x: String,
        y: String,
        regression: bool,
    },
    /// Value distribution per group.
    Box { group_by: String, value: String },
    /// Percentage of rows flagged in each indicator column.
    IndicatorShare { columns: Vec<String> },
    /// Mean value over rows flagged in each indicator column.
    IndicatorMean { columns: Vec<String>, value: String },
}

impl ChartKind {
    /// Every dataset column this chart reads.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            ChartKind::Bar { aggregate, .. } => {
                vec![aggregate.group_by.as_str(), aggregate.value.as_str()]
            }
            ChartKind::Scatter { x, y, .. } => vec![x.as_str(), y.as_str()],
            ChartKind::Box { group_by, value } => vec![group_by.as_str(), value.as_str()],
            ChartKind::IndicatorShare { columns } => columns.iter().map(String::as_str).collect(),
            ChartKind::IndicatorMean { columns, value } => columns
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(value.as_str()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
}

impl ChartSpec {
    pub fn new(title: &str, x_label: &str, y_label: &str, kind: ChartKind) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            kind,
        }
    }

    fn bar(title: &str, x_label: &str, aggregate: AggregateSpec) -> Self {
        Self::new(
            title,
            x_label,
            SALARY_LABEL,
            ChartKind::Bar {
                aggregate,
                horizontal: false,
            },
        )
    }

    fn scatter(title: &str, x: &str, x_label: &str) -> Self {
        Self::new(
            title,
            x_label,
            SALARY_LABEL,
            ChartKind::Scatter {
                x: x.to_string(),
                y: SALARY_COLUMN.to_string(),
                regression: false,
            },
        )
    }

    fn salary_box(title: &str, group_by: &str, x_label: &str) -> Self {
        Self::new(
            title,
            x_label,
            SALARY_LABEL,
            ChartKind::Box {
                group_by: group_by.to_string(),
                value: SALARY_COLUMN.to_string(),
            },
        )
    }
}

fn skill_columns() -> Vec<String> {
    SKILL_COLUMNS.iter().map(|s| s.to_string()).collect()
}

/// The dashboard's charts, in display order.
pub fn dashboard_specs(config: &DashboardConfig) -> Vec<ChartSpec> {
    let top = config.top_industries;

    vec![
        // Horizontal bars read as the value on x, category on y.
        ChartSpec::new(
            &format!("Top {top} Industries by Average Salary"),
            SALARY_LABEL,
            "Industry",
            ChartKind::Bar {
                aggregate: AggregateSpec::mean("Industry", SALARY_COLUMN)
                    .descending()
                    .top(top),
                horizontal: true,
            },
        ),
        ChartSpec::scatter("Company Age vs Average Salary", "age", "Company Age (years)"),
        ChartSpec::bar(
            "Average Salary by German State",
            "German State",
            AggregateSpec::mean("job_state", SALARY_COLUMN).descending(),
        ),
        ChartSpec::scatter(
            "Job Description Length vs Salary",
            "desc_len",
            "Job Description Length (characters)",
        ),
        ChartSpec::bar(
            "Employer-provided vs Estimated Salaries",
            "Salary Source",
            AggregateSpec::mean("employer_provided", SALARY_COLUMN),
        ),
        ChartSpec::scatter(
            "Number of Competitors vs Average Salary",
            "num_comp",
            "Number of Competitors",
        ),
        ChartSpec::salary_box("Salary Distribution by Job Role", "job_simp", "Job Role"),
        ChartSpec::salary_box("Salary by Seniority Level", "seniority", "Seniority Level"),
        ChartSpec::bar(
            "Average Salary per Seniority Level",
            "Seniority Level",
            AggregateSpec::mean("seniority", SALARY_COLUMN).descending(),
        ),
        ChartSpec::new(
            "Skill Demand (% of jobs requiring skill)",
            "Skill",
            "% of Jobs Requiring Skill",
            ChartKind::IndicatorShare {
                columns: skill_columns(),
            },
        ),
        ChartSpec::new(
            "Average Salary for Jobs Requiring Each Skill",
            "Skill",
            SALARY_LABEL,
            ChartKind::IndicatorMean {
                columns: skill_columns(),
                value: SALARY_COLUMN.to_string(),
            },
        ),
        ChartSpec::salary_box("Salary Distribution by Company Size", "Size", "Company Size"),
        ChartSpec::new(
            "Company Rating vs Average Salary",
            "Company Rating",
            SALARY_LABEL,
            ChartKind::Scatter {
                x: "Rating".to_string(),
                y: SALARY_COLUMN.to_string(),
                regression: true,
            },
        ),
    ]
}
