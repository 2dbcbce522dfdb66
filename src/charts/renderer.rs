//! Static Chart Renderer
//! Draws a chart figure onto its own plotters bitmap and encodes it as PNG.
//!
//! Every call allocates a fresh canvas, so rendering one chart never touches
//! another chart's drawing state.

use crate::charts::{BoxGroup, ChartFigure, ChartPlotter, FigureData};
use crate::stats::RegressionFit;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to draw for '{0}'")]
    Empty(String),
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FIT_COLOR: RGBColor = RGBColor(220, 53, 69);

fn drawing_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// The interactive palette, as plotters colors.
fn palette(i: usize) -> RGBColor {
    let c = ChartPlotter::palette_color(i);
    RGBColor(c.r(), c.g(), c.b())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a figure to PNG bytes.
    pub fn render_png(figure: &ChartFigure, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if figure.is_empty() {
            return Err(RenderError::Empty(figure.title.clone()));
        }

        let mut buffer = vec![0u8; Self::buffer_len(width, height)];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(drawing_error)?;

            match &figure.data {
                FigureData::Bars {
                    labels,
                    values,
                    horizontal: false,
                } => Self::draw_vertical_bars(&root, figure, labels, values)?,
                FigureData::Bars {
                    labels,
                    values,
                    horizontal: true,
                } => Self::draw_horizontal_bars(&root, figure, labels, values)?,
                FigureData::Scatter { points, fit } => {
                    Self::draw_scatter(&root, figure, points, fit.as_ref())?
                }
                FigureData::Boxes { groups } => Self::draw_boxes(&root, figure, groups)?,
            }

            root.present().map_err(drawing_error)?;
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(&buffer, width, height, ExtendedColorType::Rgb8)?;
        Ok(png)
    }

    /// Bytes of an RGB canvas; computed in `usize` so large exports cannot wrap.
    pub fn buffer_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    /// Value axis from zero (or the smallest negative value) to the largest value plus headroom.
    pub fn value_range(values: &[f64]) -> Range<f64> {
        let max = values.iter().copied().fold(0.0, f64::max);
        let min = values.iter().copied().fold(0.0, f64::min);
        if max == min {
            return min..min + 1.0;
        }
        let pad = (max - min) * 0.1;
        min..max + pad
    }

    /// Padded data range; a single value gets a unit window around it.
    pub fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() {
            return 0.0..1.0;
        }
        if min == max {
            return (min - 1.0)..(max + 1.0);
        }
        let pad = (max - min) * 0.05;
        (min - pad)..(max + pad)
    }

    fn segment_label(labels: &[String], value: &SegmentValue<usize>) -> String {
        match value {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn draw_vertical_bars(
        root: &Canvas<'_>,
        figure: &ChartFigure,
        labels: &[String],
        values: &[f64],
    ) -> Result<(), RenderError> {
        let n = values.len();
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .caption(&figure.title, ("sans-serif", 22))
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), Self::value_range(values))
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|v| Self::segment_label(labels, v))
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(values.iter().enumerate().map(|(i, &v)| {
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
                    palette(i).filled(),
                );
                bar.set_margin(0, 0, 8, 8);
                bar
            }))
            .map_err(drawing_error)?;

        Ok(())
    }

    fn draw_horizontal_bars(
        root: &Canvas<'_>,
        figure: &ChartFigure,
        labels: &[String],
        values: &[f64],
    ) -> Result<(), RenderError> {
        let n = values.len();
        // First entry drawn in the top row.
        let row_labels: Vec<String> = labels.iter().rev().cloned().collect();

        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .caption(&figure.title, ("sans-serif", 22))
            .x_label_area_size(50)
            .y_label_area_size(200)
            .build_cartesian_2d(Self::value_range(values), (0..n).into_segmented())
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&|v| Self::segment_label(&row_labels, v))
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(values.iter().enumerate().map(|(i, &v)| {
                let row = n - 1 - i;
                let mut bar = Rectangle::new(
                    [(0.0, SegmentValue::Exact(row)), (v, SegmentValue::Exact(row + 1))],
                    palette(i).filled(),
                );
                bar.set_margin(4, 4, 0, 0);
                bar
            }))
            .map_err(drawing_error)?;

        Ok(())
    }

    fn draw_scatter(
        root: &Canvas<'_>,
        figure: &ChartFigure,
        points: &[(f64, f64)],
        fit: Option<&RegressionFit>,
    ) -> Result<(), RenderError> {
        let x_range = Self::padded_range(points.iter().map(|p| p.0));
        let mut y_values: Vec<f64> = points.iter().map(|p| p.1).collect();
        if let Some(fit) = fit {
            y_values.extend(fit.band.iter().flat_map(|p| [p.lower, p.upper]));
        }
        let y_range = Self::padded_range(y_values.into_iter());

        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .caption(&figure.title, ("sans-serif", 22))
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, y_range)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, palette(0).mix(0.6).filled())),
            )
            .map_err(drawing_error)?;

        if let Some(fit) = fit {
            let outline: Vec<(f64, f64)> = fit
                .band
                .iter()
                .map(|p| (p.x, p.upper))
                .chain(fit.band.iter().rev().map(|p| (p.x, p.lower)))
                .collect();
            chart
                .draw_series(std::iter::once(Polygon::new(
                    outline,
                    FIT_COLOR.mix(0.15).filled(),
                )))
                .map_err(drawing_error)?;
            chart
                .draw_series(LineSeries::new(
                    fit.band.iter().map(|p| (p.x, p.fitted)),
                    FIT_COLOR.stroke_width(2),
                ))
                .map_err(drawing_error)?;
        }

        Ok(())
    }

    fn draw_boxes(
        root: &Canvas<'_>,
        figure: &ChartFigure,
        groups: &[BoxGroup],
    ) -> Result<(), RenderError> {
        let n = groups.len();
        let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
        let y_range = Self::padded_range(groups.iter().flat_map(|g| g.values.iter().copied()));

        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .caption(&figure.title, ("sans-serif", 22))
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), y_range)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|v| Self::segment_label(&labels, v))
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .draw()
            .map_err(drawing_error)?;

        for (i, group) in groups.iter().enumerate() {
            let s = &group.summary;
            let color = palette(i);
            let left = SegmentValue::Exact(i);
            let right = SegmentValue::Exact(i + 1);
            let center = SegmentValue::CenterOf(i);

            let mut body = Rectangle::new(
                [(left.clone(), s.q3), (right.clone(), s.q1)],
                color.mix(0.35).filled(),
            );
            body.set_margin(0, 0, 20, 20);
            let mut outline =
                Rectangle::new([(left.clone(), s.q3), (right.clone(), s.q1)], color.stroke_width(2));
            outline.set_margin(0, 0, 20, 20);
            chart
                .draw_series([body, outline])
                .map_err(drawing_error)?;

            chart
                .draw_series([
                    PathElement::new(
                        vec![(center.clone(), s.whisker_low), (center.clone(), s.q1)],
                        color.stroke_width(2),
                    ),
                    PathElement::new(
                        vec![(center.clone(), s.q3), (center.clone(), s.whisker_high)],
                        color.stroke_width(2),
                    ),
                ])
                .map_err(drawing_error)?;

            let mut median = Rectangle::new(
                [(left, s.median), (right, s.median)],
                BLACK.stroke_width(2),
            );
            median.set_margin(0, 0, 20, 20);
            chart
                .draw_series(std::iter::once(median))
                .map_err(drawing_error)?;

            chart
                .draw_series(
                    s.outliers
                        .iter()
                        .map(|&v| Circle::new((center.clone(), v), 3, color.filled())),
                )
                .map_err(drawing_error)?;
        }

        Ok(())
    }
}
