pub mod action;
pub mod app;
pub mod component;
pub mod heatmap_grid;
pub mod histogram_view;
pub mod hover_panel;
pub mod theme;

pub use action::{Action, ActionCategory};
pub use app::App;
pub use component::Component;
pub use heatmap_grid::HeatmapGrid;
pub use hover_panel::HoverPanel;
pub use theme::Theme;
