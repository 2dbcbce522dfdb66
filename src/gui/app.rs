//! Salary Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, StatusKind};
use egui::SidePanel;
use salary_dashboard::charts::{
    build_dashboard, dashboard_specs, ChartSpec, StaticChartRenderer,
};
use salary_dashboard::config::DashboardConfig;
use salary_dashboard::data::{preview_rows, DataLoader};
use std::path::Path;
use tracing::{error, info};

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    specs: Vec<ChartSpec>,
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            specs: dashboard_specs(&config),
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(config.chart_height),
            config,
        };

        if let Some(path) = app.config.initial_csv.clone() {
            app.load_dataset(&path);
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.load_dataset(&path);
        }
    }

    /// Load a file and compute every chart in one pass.
    fn load_dataset(&mut self, path: &Path) {
        self.chart_viewer.clear();
        self.control_panel.set_chart_counts(0, 0);
        self.control_panel.file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string());

        match self.loader.load_csv(path) {
            Ok(df) => {
                let preview = preview_rows(df, self.config.preview_rows);
                let panels = build_dashboard(df, &self.specs);

                let rendered = panels.iter().filter(|p| p.is_rendered()).count();
                self.control_panel
                    .set_chart_counts(rendered, panels.len() - rendered);
                self.control_panel.set_status(
                    StatusKind::Success,
                    &format!("Loaded {} rows, {} columns", df.height(), df.width()),
                );
                self.chart_viewer.set_dashboard(preview, panels);
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load dataset");
                self.control_panel
                    .set_status(StatusKind::Error, &format!("Error: {}", e));
            }
        }
    }

    /// Handle PNG export of one panel
    fn handle_save_png(&mut self, index: usize) {
        let Some(Ok(figure)) = self.chart_viewer.panels.get(index).map(|p| p.figure.as_ref()) else {
            return;
        };

        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(format!("chart_{:02}.png", index + 1))
            .save_file()
        else {
            return; // User cancelled
        };

        let result = StaticChartRenderer::render_png(
            figure,
            self.config.export_width,
            self.config.export_height,
        )
        .map_err(|e| e.to_string())
        .and_then(|png| std::fs::write(&output_path, png).map_err(|e| e.to_string()));

        match result {
            Ok(()) => {
                info!(path = %output_path.display(), chart = %figure.title, "chart exported");
                self.control_panel.set_status(
                    StatusKind::Success,
                    &format!("Saved {}", output_path.display()),
                );
            }
            Err(e) => {
                error!(chart = %figure.title, error = %e, "chart export failed");
                self.control_panel
                    .set_status(StatusKind::Error, &format!("Export error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                let action = self.control_panel.show(ui);
                match action {
                    ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                    ControlPanelAction::None => {}
                }
            });

        // Central panel - Chart Viewer
        let save_request = egui::CentralPanel::default()
            .show(ctx, |ui| self.chart_viewer.show(ui))
            .inner;

        if let Some(index) = save_request {
            self.handle_save_png(index);
        }
    }
}
