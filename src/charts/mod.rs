//! Charts module - chart specs, figures and rendering backends

mod figure;
mod plotter;
mod renderer;
pub mod spec;

pub use figure::{build_dashboard, BoxGroup, ChartFigure, FigureData, Panel};
pub use plotter::{ChartPlotter, PALETTE};
pub use renderer::{RenderError, StaticChartRenderer};
pub use spec::{dashboard_specs, ChartKind, ChartSpec, SKILL_COLUMNS};
