//! Chart Viewer Widget
//! Scrollable single-page view: dataset preview followed by every chart panel.

use egui::{Color32, RichText, ScrollArea};
use salary_dashboard::charts::{ChartPlotter, FigureData, Panel};
use salary_dashboard::data::DatasetPreview;

const PANEL_SPACING: f32 = 15.0;

/// Scrollable chart display area, panels stacked in dashboard order.
pub struct ChartViewer {
    pub preview: Option<DatasetPreview>,
    pub panels: Vec<Panel>,
    pub chart_height: f32,
}

impl ChartViewer {
    pub fn new(chart_height: f32) -> Self {
        Self {
            preview: None,
            panels: Vec::new(),
            chart_height,
        }
    }

    pub fn clear(&mut self) {
        self.preview = None;
        self.panels.clear();
    }

    pub fn set_dashboard(&mut self, preview: DatasetPreview, panels: Vec<Panel>) {
        self.preview = Some(preview);
        self.panels = panels;
    }

    /// Draw the page. Returns the panel whose snapshot was requested, if any.
    pub fn show(&self, ui: &mut egui::Ui) -> Option<usize> {
        let mut save_request = None;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("German Tech Job Market Analysis").size(24.0));
                ui.label(
                    "Explore salary drivers, skill demand, and company characteristics in the German tech job market.",
                );
                ui.add_space(PANEL_SPACING);

                let Some(preview) = &self.preview else {
                    egui::Frame::none()
                        .fill(Color32::from_rgb(220, 235, 250))
                        .rounding(5.0)
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new("Please upload a CSV file to get started!")
                                    .color(Color32::from_rgb(30, 80, 140)),
                            );
                        });
                    return;
                };

                ui.label(
                    RichText::new("Dataset loaded successfully!")
                        .color(Color32::from_rgb(40, 167, 69)),
                );
                ui.add_space(PANEL_SPACING);

                ui.label(RichText::new("Dataset Preview").size(18.0).strong());
                Self::draw_preview(ui, preview);
                ui.add_space(PANEL_SPACING);

                for (idx, panel) in self.panels.iter().enumerate() {
                    if Self::draw_panel(ui, idx, panel, self.chart_height) {
                        save_request = Some(idx);
                    }
                    ui.add_space(PANEL_SPACING);
                }
            });

        save_request
    }

    fn draw_preview(ui: &mut egui::Ui, preview: &DatasetPreview) {
        ScrollArea::horizontal()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                egui::Grid::new("dataset_preview")
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for header in &preview.headers {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for row in &preview.rows {
                            for cell in row {
                                ui.label(RichText::new(cell).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
        ui.label(
            RichText::new(format!("{} rows in total", preview.total_rows))
                .size(11.0)
                .color(Color32::GRAY),
        );
    }

    /// Draw one panel card. Returns true when "Save PNG" was clicked.
    fn draw_panel(ui: &mut egui::Ui, idx: usize, panel: &Panel, height: f32) -> bool {
        let mut clicked = false;

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&panel.spec.title).size(18.0).strong());
                    if panel.is_rendered() {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("💾 Save PNG").clicked() {
                                clicked = true;
                            }
                        });
                    }
                });
                ui.add_space(8.0);

                match &panel.figure {
                    Ok(figure) => {
                        let id = format!("chart_{idx}");
                        ChartPlotter::draw_figure(ui, &id, figure, height);
                        if let FigureData::Boxes { groups } = &figure.data {
                            ui.add_space(6.0);
                            ChartPlotter::draw_box_table(ui, &id, groups);
                        }
                    }
                    Err(e) => {
                        ui.label(
                            RichText::new(format!("⚠ Chart skipped: {e}"))
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    }
                }
            });

        clicked
    }
}
