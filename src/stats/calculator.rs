//! Statistics Calculator Module
//! Box-plot summaries and regression fits for the distribution and scatter charts.

use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

/// Whisker reach in multiples of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Confidence level of the regression band.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Number of x positions the regression band is evaluated at.
const BAND_POINTS: usize = 50;

/// Five-number summary of one box-plot group.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Fitted mean and its confidence limits at one x position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub x: f64,
    pub fitted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Ordinary least squares line with a confidence band around it.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionFit {
    pub slope: f64,
    pub intercept: f64,
    pub band: Vec<BandPoint>,
}

impl RegressionFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Quartiles, whiskers and outliers of a group.
    ///
    /// Whiskers stop at the most extreme data points within 1.5 IQR of the
    /// box; anything beyond is an outlier.
    pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - WHISKER_IQR * iqr)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + WHISKER_IQR * iqr)
            .unwrap_or(q3);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        let std = if sorted.len() > 1 {
            sorted.iter().std_dev()
        } else {
            0.0
        };

        Some(BoxSummary {
            count: sorted.len(),
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            std,
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Least-squares line through `points` with a 95% band for the fitted mean.
    ///
    /// Needs at least three points and some spread in x.
    pub fn linear_fit(points: &[(f64, f64)]) -> Option<RegressionFit> {
        let n = points.len();
        if n < 3 {
            return None;
        }

        let nf = n as f64;
        let x_mean = points.iter().map(|p| p.0).sum::<f64>() / nf;
        let y_mean = points.iter().map(|p| p.1).sum::<f64>() / nf;

        let sxx: f64 = points.iter().map(|p| (p.0 - x_mean).powi(2)).sum();
        if sxx == 0.0 {
            return None;
        }
        let sxy: f64 = points
            .iter()
            .map(|p| (p.0 - x_mean) * (p.1 - y_mean))
            .sum();

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let rss: f64 = points
            .iter()
            .map(|p| (p.1 - (intercept + slope * p.0)).powi(2))
            .sum();
        let residual_std = (rss / (nf - 2.0)).sqrt();

        let t = StudentsT::new(0.0, 1.0, nf - 2.0)
            .map(|dist| dist.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0))
            .ok()?;

        let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let step = (x_max - x_min) / (BAND_POINTS - 1) as f64;

        let band = (0..BAND_POINTS)
            .map(|i| {
                let x = x_min + step * i as f64;
                let fitted = intercept + slope * x;
                let se = residual_std * (1.0 / nf + (x - x_mean).powi(2) / sxx).sqrt();
                BandPoint {
                    x,
                    fitted,
                    lower: fitted - t * se,
                    upper: fitted + t * se,
                }
            })
            .collect();

        Some(RegressionFit {
            slope,
            intercept,
            band,
        })
    }
}
