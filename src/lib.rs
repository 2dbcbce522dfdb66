//! Salary Dashboard - job market CSV analysis
//!
//! Loads a job-postings CSV, reduces it into grouped salary aggregates and
//! turns each aggregate into a chart figure. The desktop UI lives in the
//! binary; everything here is display-independent except the two chart
//! backends in [`charts`].

pub mod charts;
pub mod config;
pub mod data;
pub mod stats;
