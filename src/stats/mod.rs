//! Stats module - grouped aggregates and descriptive statistics

pub mod aggregate;
mod calculator;

pub use aggregate::{
    aggregate, indicator_mean, indicator_share, AggregateSeries, AggregateSpec, Reduction,
    SeriesEntry, SeriesOrder,
};
pub use calculator::{BandPoint, BoxSummary, RegressionFit, StatsCalculator};
