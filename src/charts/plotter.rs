//! Chart Plotter Module
//! Draws chart figures as interactive egui_plot widgets.

use crate::charts::{BoxGroup, ChartFigure, FigureData};
use crate::stats::RegressionFit;
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Line, Plot, PlotPoints, Points, Polygon,
};
use std::ops::RangeInclusive;

/// Color palette for groups
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

pub const POINT_COLOR: Color32 = Color32::from_rgb(52, 152, 219);
pub const FIT_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Draws chart figures using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn palette_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Category label for an axis mark; empty between categories.
    pub fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if idx < 0.0 || (value - idx).abs() > 1e-6 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Draw one figure. `id` must be unique within the page.
    pub fn draw_figure(ui: &mut egui::Ui, id: &str, figure: &ChartFigure, height: f32) {
        if figure.is_empty() {
            ui.label(RichText::new("No data to plot").italics().color(Color32::GRAY));
            return;
        }

        let plot = Plot::new(id.to_string())
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(figure.x_label.clone())
            .y_axis_label(figure.y_label.clone());

        match &figure.data {
            FigureData::Bars {
                labels,
                values,
                horizontal,
            } => Self::draw_bars(ui, plot, labels, values, *horizontal),
            FigureData::Scatter { points, fit } => Self::draw_scatter(ui, plot, points, fit.as_ref()),
            FigureData::Boxes { groups } => Self::draw_boxes(ui, plot, groups),
        }
    }

    fn draw_bars(ui: &mut egui::Ui, plot: Plot, labels: &[String], values: &[f64], horizontal: bool) {
        let n = values.len();

        // Horizontal charts list the first entry at the top.
        let position = |i: usize| if horizontal { (n - 1 - i) as f64 } else { i as f64 };
        let axis_labels: Vec<String> = if horizontal {
            labels.iter().rev().cloned().collect()
        } else {
            labels.to_vec()
        };

        let bars: Vec<Bar> = values
            .iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (&value, label))| {
                Bar::new(position(i), value)
                    .name(label)
                    .width(0.7)
                    .fill(Self::palette_color(i))
            })
            .collect();

        let mut chart = BarChart::new(bars);
        if horizontal {
            chart = chart.horizontal();
        }

        let formatter = move |mark: GridMark, _range: &RangeInclusive<f64>| {
            Self::category_label(&axis_labels, mark.value)
        };
        let plot = if horizontal {
            plot.y_axis_formatter(formatter).include_x(0.0)
        } else {
            plot.x_axis_formatter(formatter).include_y(0.0)
        };

        plot.show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
    }

    fn draw_scatter(ui: &mut egui::Ui, plot: Plot, points: &[(f64, f64)], fit: Option<&RegressionFit>) {
        let scatter: PlotPoints = points.iter().map(|&(x, y)| [x, y]).collect();

        plot.show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(scatter)
                    .radius(2.5)
                    .color(POINT_COLOR.gamma_multiply(0.7)),
            );

            if let Some(fit) = fit {
                // Upper edge left to right, lower edge back.
                let outline: PlotPoints = fit
                    .band
                    .iter()
                    .map(|p| [p.x, p.upper])
                    .chain(fit.band.iter().rev().map(|p| [p.x, p.lower]))
                    .collect();
                plot_ui.polygon(
                    Polygon::new(outline)
                        .fill_color(FIT_COLOR.gamma_multiply(0.15))
                        .stroke(egui::Stroke::NONE)
                        .name("95% CI"),
                );

                let line: PlotPoints = fit.band.iter().map(|p| [p.x, p.fitted]).collect();
                plot_ui.line(Line::new(line).color(FIT_COLOR).width(2.0).name("Linear fit"));
            }
        });
    }

    fn draw_boxes(ui: &mut egui::Ui, plot: Plot, groups: &[BoxGroup]) {
        let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();

        plot.x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                for (i, group) in groups.iter().enumerate() {
                    let color = Self::palette_color(i);
                    let s = &group.summary;

                    let box_elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(s.whisker_low, s.q1, s.median, s.q3, s.whisker_high),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(&group.label));

                    if !s.outliers.is_empty() {
                        let outliers: PlotPoints = s.outliers.iter().map(|&v| [i as f64, v]).collect();
                        plot_ui.points(Points::new(outliers).radius(2.5).color(color));
                    }
                }
            });
    }

    /// Per-group summary table shown under box plots.
    pub fn draw_box_table(ui: &mut egui::Ui, id: &str, groups: &[BoxGroup]) {
        egui::Grid::new(ui.make_persistent_id(format!("box_table_{id}")))
            .striped(true)
            .min_col_width(55.0)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                for header in ["Group", "N", "Mean", "Median", "Std"] {
                    ui.label(RichText::new(header).strong().size(11.0));
                }
                ui.end_row();

                for group in groups {
                    let s = &group.summary;
                    ui.label(RichText::new(&group.label).size(11.0));
                    ui.label(RichText::new(s.count.to_string()).size(11.0));
                    ui.label(RichText::new(format!("{:.0}", s.mean)).size(11.0));
                    ui.label(RichText::new(format!("{:.0}", s.median)).size(11.0));
                    ui.label(RichText::new(format!("{:.0}", s.std)).size(11.0));
                    ui.end_row();
                }
            });
    }
}
