//! Chart Figures
//! Per-chart drawing data computed from a dataset and a spec.
//!
//! A figure owns everything a backend needs to draw one chart, so each chart
//! is built and dropped on its own and a failure in one never reaches the
//! others.

use crate::charts::spec::{ChartKind, ChartSpec};
use crate::data::{DataProcessor, ProcessorError};
use crate::stats::{
    aggregate, indicator_mean, indicator_share, AggregateSeries, BoxSummary, RegressionFit,
    StatsCalculator,
};
use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

/// One group of a box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    pub label: String,
    pub summary: BoxSummary,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FigureData {
    Bars {
        labels: Vec<String>,
        values: Vec<f64>,
        horizontal: bool,
    },
    Scatter {
        points: Vec<(f64, f64)>,
        fit: Option<RegressionFit>,
    },
    Boxes {
        groups: Vec<BoxGroup>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartFigure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: FigureData,
}

impl ChartFigure {
    /// Compute the figure for `spec` over `df`.
    pub fn build(df: &DataFrame, spec: &ChartSpec) -> Result<Self, ProcessorError> {
        let data = match &spec.kind {
            ChartKind::Bar {
                aggregate: agg,
                horizontal,
            } => Self::bars(aggregate(df, agg)?, *horizontal),
            ChartKind::IndicatorShare { columns } => Self::bars(indicator_share(df, columns)?, false),
            ChartKind::IndicatorMean { columns, value } => {
                Self::bars(indicator_mean(df, columns, value)?, false)
            }
            ChartKind::Scatter { x, y, regression } => {
                let points = DataProcessor::paired_values(df, x, y)?;
                let fit = if *regression {
                    StatsCalculator::linear_fit(&points)
                } else {
                    None
                };
                FigureData::Scatter { points, fit }
            }
            ChartKind::Box { group_by, value } => {
                let groups = DataProcessor::group_rows(df, group_by, value)?
                    .into_iter()
                    .filter_map(|group| {
                        let summary = StatsCalculator::box_summary(&group.values)?;
                        Some(BoxGroup {
                            label: group.key.to_string(),
                            summary,
                            values: group.values,
                        })
                    })
                    .collect();
                FigureData::Boxes { groups }
            }
        };

        Ok(Self {
            title: spec.title.clone(),
            x_label: spec.x_label.clone(),
            y_label: spec.y_label.clone(),
            data,
        })
    }

    fn bars(series: AggregateSeries, horizontal: bool) -> FigureData {
        FigureData::Bars {
            labels: series.labels(),
            values: series.values(),
            horizontal,
        }
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match &self.data {
            FigureData::Bars { values, .. } => values.is_empty(),
            FigureData::Scatter { points, .. } => points.is_empty(),
            FigureData::Boxes { groups } => groups.is_empty(),
        }
    }
}

/// One dashboard slot: the spec and either its figure or the reason it was skipped.
#[derive(Debug)]
pub struct Panel {
    pub spec: ChartSpec,
    pub figure: Result<ChartFigure, ProcessorError>,
}

impl Panel {
    pub fn is_rendered(&self) -> bool {
        self.figure.is_ok()
    }
}

/// Build every panel in order. Each spec is computed independently; a failing
/// spec is kept as a skipped panel.
pub fn build_dashboard(df: &DataFrame, specs: &[ChartSpec]) -> Vec<Panel> {
    let panels: Vec<Panel> = specs
        .iter()
        .map(|spec| {
            let figure = ChartFigure::build(df, spec);
            match &figure {
                Ok(_) => debug!(chart = %spec.title, "chart built"),
                Err(e) => warn!(chart = %spec.title, error = %e, "chart skipped"),
            }
            Panel {
                spec: spec.clone(),
                figure,
            }
        })
        .collect();

    let rendered = panels.iter().filter(|p| p.is_rendered()).count();
    info!(
        rendered,
        skipped = panels.len() - rendered,
        "dashboard built"
    );
    panels
}
