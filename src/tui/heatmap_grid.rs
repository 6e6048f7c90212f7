use std::ops::Range;

use color_eyre::Result;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing::trace;

use crate::core::bucket_table::BucketTable;
use crate::hover::format::{DisplayTimeZone, format_number, format_time};
use crate::tui::{Action, Component, Theme};

const CELL_WIDTH: u16 = 2;

const GRID_ACTIONS: &[Action] = &[
    Action::MoveUp,
    Action::MoveDown,
    Action::MoveLeft,
    Action::MoveRight,
    Action::ColumnTop,
    Action::ColumnBottom,
    Action::FirstColumn,
    Action::LastColumn,
];

/// Heatmap grid with a hover cursor.
///
/// Columns run left to right, buckets bottom to top. The cursor is a flat index
/// into the bucket table, the same index the hover resolver takes.
pub struct HeatmapGrid {
    table: BucketTable,
    columns: Vec<Range<usize>>,
    max_count: f64,
    column: usize,
    index: usize,
    time_zone: DisplayTimeZone,
    theme: Theme,
    focused: bool,
}

impl HeatmapGrid {
    pub fn new(table: BucketTable, theme: Theme, time_zone: DisplayTimeZone) -> Self {
        let columns = table.columns();
        let max_count = table
            .count()
            .iter()
            .copied()
            .filter(|c| c.is_finite())
            .fold(0.0, f64::max);
        Self {
            table,
            columns,
            max_count,
            column: 0,
            index: 0,
            time_zone,
            theme,
            focused: true,
        }
    }

    pub fn table(&self) -> &BucketTable {
        &self.table
    }

    /// Flat index of the hovered bucket.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Put the cursor on `index`; out-of-range indices are ignored.
    pub fn set_index(&mut self, index: usize) {
        if let Some(column) = self.columns.iter().position(|c| c.contains(&index)) {
            self.column = column;
            self.index = index;
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Move to `column`, keeping the in-column offset where the column allows it.
    fn jump_to_column(&mut self, column: usize) {
        let (Some(current), Some(target)) = (self.columns.get(self.column), self.columns.get(column))
        else {
            return;
        };
        let offset = self.index - current.start;
        self.index = (target.start + offset).min(target.end - 1);
        self.column = column;
    }

    fn current(&self) -> Option<Range<usize>> {
        self.columns.get(self.column).cloned()
    }

    /// First visible entry of `total` so that `cursor` stays inside a window of `visible`.
    fn scroll_offset(cursor: usize, total: usize, visible: usize) -> usize {
        if visible == 0 || total <= visible {
            return 0;
        }
        cursor.saturating_sub(visible / 2).min(total - visible)
    }

    fn title(&self) -> String {
        match self.current() {
            Some(column) => {
                let x = self.table.x_min()[column.start];
                format!(
                    " Heatmap  x={}  bucket {}/{}  count={} ",
                    format_time(x, &self.time_zone),
                    self.index - column.start + 1,
                    column.len(),
                    format_number(self.table.count()[self.index]),
                )
            }
            None => " Heatmap (empty) ".to_string(),
        }
    }
}

impl Component for HeatmapGrid {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        let Some(column) = self.current() else {
            return Ok(false);
        };
        match action {
            Action::MoveUp => {
                if self.index + 1 < column.end {
                    self.index += 1;
                }
            }
            Action::MoveDown => {
                if self.index > column.start {
                    self.index -= 1;
                }
            }
            Action::MoveLeft => {
                if self.column > 0 {
                    self.jump_to_column(self.column - 1);
                }
            }
            Action::MoveRight => self.jump_to_column(self.column + 1),
            Action::ColumnTop => self.index = column.end - 1,
            Action::ColumnBottom => self.index = column.start,
            Action::FirstColumn => self.jump_to_column(0),
            Action::LastColumn => self.jump_to_column(self.columns.len().saturating_sub(1)),
            _ => return Ok(false),
        }
        trace!(index = self.index, column = self.column, "grid cursor moved");
        Ok(true)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused))
            .title(self.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows_total = self.columns.iter().map(|c| c.len()).max().unwrap_or(0);
        let visible_cols = usize::from(inner.width / CELL_WIDTH);
        let visible_rows = usize::from(inner.height);
        let first_col = Self::scroll_offset(self.column, self.columns.len(), visible_cols);
        let cursor_row = self
            .current()
            .map(|c| self.index - c.start)
            .unwrap_or(0);
        let first_row = Self::scroll_offset(cursor_row, rows_total, visible_rows);

        let blank = " ".repeat(usize::from(CELL_WIDTH));
        let mut lines = Vec::with_capacity(visible_rows);
        // top line shows the highest visible bucket
        for row in (first_row..rows_total.min(first_row + visible_rows)).rev() {
            let spans: Vec<Span> = self
                .columns
                .iter()
                .enumerate()
                .skip(first_col)
                .take(visible_cols)
                .map(|(col_idx, column)| {
                    let idx = column.start + row;
                    if idx >= column.end {
                        return Span::styled(blank.clone(), self.theme.normal_style());
                    }
                    if col_idx == self.column && idx == self.index {
                        return Span::styled("[]".to_string(), self.theme.cursor_style());
                    }
                    let fraction = if self.max_count > 0.0 {
                        self.table.count()[idx] / self.max_count
                    } else {
                        0.0
                    };
                    Span::styled(
                        blank.clone(),
                        self.theme.normal_style().bg(self.theme.heat_color(fraction)),
                    )
                })
                .collect();
            lines.push(Line::from(spans));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn supported_actions(&self) -> &[Action] {
        GRID_ACTIONS
    }

    fn name(&self) -> &str {
        "HeatmapGrid"
    }
}
