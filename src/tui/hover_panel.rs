use color_eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph, Row, Table},
};

use crate::hover::export::frame_rows;
use crate::hover::tab::HoverLayer;
use crate::tui::histogram_view::half_block_lines;
use crate::tui::{Action, Component, Theme};

const SUMMARY_HEIGHT: u16 = 7;
const HISTOGRAM_HEIGHT: u16 = 8;

/// Side panel showing the hover entry for the bucket under the cursor.
pub struct HoverPanel {
    layer: Option<HoverLayer>,
    preview_rows: usize,
    theme: Theme,
}

impl HoverPanel {
    pub fn new(theme: Theme, preview_rows: usize) -> Self {
        Self {
            layer: None,
            preview_rows,
            theme,
        }
    }

    pub fn set_layer(&mut self, layer: Option<HoverLayer>) {
        self.layer = layer;
    }

    pub fn layer(&self) -> Option<&HoverLayer> {
        self.layer.as_ref()
    }

    fn block(&self, title: String) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false))
            .title(title)
    }

    fn summary_table(&self, rows: Vec<(&'static str, String)>) -> Table<'static> {
        let rows: Vec<Row> = rows
            .into_iter()
            .map(|(name, value)| Row::new(vec![name.to_string(), value]))
            .collect();
        Table::new(rows, [Constraint::Length(6), Constraint::Fill(1)])
            .block(self.block(" Bucket ".to_string()))
            .style(self.theme.normal_style())
    }

    fn frame_table(&self, df: &polars::prelude::DataFrame, title: &str) -> Table<'static> {
        let (headers, rows) = frame_rows(df, self.preview_rows);
        let widths = vec![Constraint::Fill(1); headers.len().max(1)];
        let title = if df.height() > rows.len() {
            format!(" {title} ({} of {}) ", rows.len(), df.height())
        } else {
            format!(" {title} ")
        };
        Table::new(rows.into_iter().map(Row::new), widths)
            .header(Row::new(headers).style(self.theme.header_style()))
            .block(self.block(title))
            .style(self.theme.normal_style())
    }
}

impl Component for HoverPanel {
    fn handle_action(&mut self, _action: Action) -> Result<bool> {
        Ok(false)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(layer) = self.layer.as_ref() else {
            let empty = Paragraph::new(Line::from("No bucket under the cursor"))
                .style(self.theme.info_style())
                .block(self.block(" Hover ".to_string()));
            frame.render_widget(empty, area);
            return;
        };

        let outer = self.block(format!(" {} ", layer.name));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let mut constraints = Vec::new();
        if layer.header.is_some() {
            constraints.push(Constraint::Length(SUMMARY_HEIGHT));
        }
        if layer.data.is_empty() {
            constraints.push(Constraint::Length(3));
        }
        for _ in &layer.data {
            constraints.push(Constraint::Min(4));
        }
        if layer.footer.is_some() {
            constraints.push(Constraint::Length(HISTOGRAM_HEIGHT));
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let mut slot = 0;
        if let Some(summary) = &layer.header {
            frame.render_widget(self.summary_table(summary.rows()), chunks[slot]);
            slot += 1;
        }
        if layer.data.is_empty() {
            let note = Paragraph::new(Line::from("No data"))
                .style(self.theme.error_style())
                .block(self.block(String::new()));
            frame.render_widget(note, chunks[slot]);
            slot += 1;
        }
        let data_title = if layer.header.is_some() { "Raw records" } else { "Bucket" };
        for df in &layer.data {
            frame.render_widget(self.frame_table(df, data_title), chunks[slot]);
            slot += 1;
        }
        if let Some(image) = &layer.footer {
            let block = self.block(" Histogram ".to_string());
            let hist_area = block.inner(chunks[slot]);
            frame.render_widget(block, chunks[slot]);
            let lines = half_block_lines(image, hist_area.width, hist_area.height, self.theme.histogram_bg);
            frame.render_widget(Paragraph::new(lines), hist_area);
        }
    }

    fn supported_actions(&self) -> &[Action] {
        &[]
    }

    fn name(&self) -> &str {
        "HoverPanel"
    }
}
