use std::path::PathBuf;

use color_eyre::Result;
use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::{debug, info, warn};

use crate::config::{Config, Mode};
use crate::core::bucket_table::BucketTable;
use crate::hover::lookup::CellValuesLookup;
use crate::hover::tab::{HoverOptions, layer_for};
use crate::render::raster::{render_histogram, save_png};
use crate::tui::{Action, Component, HeatmapGrid, HoverPanel, Theme};

/// Application state
///
/// Owns the grid and hover panel, routes key presses through the configured
/// bindings and rebuilds the hover entry whenever the cursor moves.
pub struct App {
    config: Config,
    options: HoverOptions,
    grid: HeatmapGrid,
    panel: HoverPanel,
    lookup: Box<dyn CellValuesLookup>,
    display_name: Option<String>,
    png_path: PathBuf,
    theme: Theme,
    show_help: bool,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(
        table: BucketTable,
        display_name: Option<String>,
        lookup: Box<dyn CellValuesLookup>,
        config: Config,
        png_path: Option<PathBuf>,
    ) -> Result<Self> {
        let options = config.hover_options()?;
        let theme = Theme::default();
        let png_path =
            png_path.unwrap_or_else(|| config.config.data_dir.join("histogram.png"));
        let grid = HeatmapGrid::new(table, theme.clone(), options.time_zone);
        let panel = HoverPanel::new(theme.clone(), config.hover.raw_preview_rows);

        let mut app = Self {
            config,
            options,
            grid,
            panel,
            lookup,
            display_name,
            png_path,
            theme,
            show_help: false,
            status: None,
            should_quit: false,
        };
        app.refresh_hover();
        Ok(app)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn index(&self) -> usize {
        self.grid.index()
    }

    /// Start with the cursor on `index`.
    pub fn set_index(&mut self, index: usize) {
        self.grid.set_index(index);
        self.refresh_hover();
    }

    pub fn panel(&self) -> &HoverPanel {
        &self.panel
    }

    /// Handle a key event
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if let Some(action) = self.config.action_for_key(Mode::Grid, key) {
            // the help popup keeps the keyboard until it is closed
            if self.show_help && !matches!(action, Action::ToggleHelp | Action::Quit) {
                return Ok(());
            }
            self.handle_action(action)?;
        }
        Ok(())
    }

    /// Handle an action
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        debug!(?action, "action");
        match action {
            Action::Quit => {
                self.should_quit = true;
                return Ok(());
            }
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
                self.grid.set_focused(!self.show_help);
                return Ok(());
            }
            Action::ToggleHistogram => {
                self.options.show_histogram = !self.options.show_histogram;
                self.refresh_hover();
                return Ok(());
            }
            Action::SaveHistogram => {
                self.save_histogram();
                return Ok(());
            }
            _ => {}
        }

        if self.grid.handle_action(action)? {
            self.status = None;
            self.refresh_hover();
        }
        Ok(())
    }

    fn refresh_hover(&mut self) {
        let layer = layer_for(
            self.grid.table(),
            self.display_name.as_deref(),
            self.grid.index(),
            self.lookup.as_ref(),
            &self.options,
        );
        self.panel.set_layer(Some(layer));
    }

    fn save_histogram(&mut self) {
        let style = &self.options.histogram;
        let image = render_histogram(
            self.grid.table(),
            self.grid.index(),
            style.width,
            style.height,
            &style.palette,
        );
        let result = match self.png_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent).map_err(color_eyre::Report::from)
            }
            _ => Ok(()),
        }
        .and_then(|_| save_png(&image, &self.png_path));
        self.status = Some(match result {
            Ok(()) => {
                info!(path = %self.png_path.display(), "histogram saved");
                format!("Saved {}", self.png_path.display())
            }
            Err(e) => {
                warn!("failed to save histogram: {e}");
                format!("Save failed: {e}")
            }
        });
    }

    /// Draw the whole screen
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(1)])
            .split(area);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[0]);

        self.grid.render(frame, cols[0]);
        self.panel.render(frame, cols[1]);

        let status = match &self.status {
            Some(message) => Paragraph::new(Line::from(message.clone())).style(self.theme.info_style()),
            None => Paragraph::new(Line::from(self.short_instructions())).style(self.theme.normal_style()),
        };
        frame.render_widget(status, rows[1]);

        if self.show_help {
            self.render_help(frame, area);
        }
    }

    fn short_instructions(&self) -> String {
        self.config.actions_to_instructions(
            Mode::Grid,
            &[Action::ToggleHelp, Action::ToggleHistogram, Action::SaveHistogram, Action::Quit],
        )
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let popup = centered(area, 60, 60);
        let mut lines = Vec::new();
        let mut category = None;
        for action in Action::all() {
            if category != Some(action.category()) {
                category = Some(action.category());
                lines.push(Line::styled(action.category().to_string(), self.theme.header_style()));
            }
            let key = self
                .config
                .key_hint(Mode::Grid, action)
                .unwrap_or_else(|| "-".to_string());
            lines.push(Line::from(format!("  {key:<10} {}", action.description())));
        }
        let help = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style(true))
                    .title(" Keys "),
            );
        frame.render_widget(Clear, popup);
        frame.render_widget(help, popup);
    }
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
