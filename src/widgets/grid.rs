use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, StatefulWidget, Table, TableState, Widget},
};

use crate::expansion::{ExpansionState, RowExpansionController};
use crate::model::Row;
use crate::widgets::detail::{detail_rows, loading_row};

const MAX_COLUMN_WIDTH: usize = 24;
/// Detail lines reuse the first three value columns; keep them wide enough for the numbers.
const MIN_DETAIL_WIDTH: usize = 13;

/// Marker in the control column for each expansion state.
pub fn control_symbol(state: &ExpansionState) -> &'static str {
    match state {
        ExpansionState::Collapsed => "▸",
        ExpansionState::Loading { .. } => "…",
        ExpansionState::Expanded(_) => "▾",
    }
}

/// The page of rows with their expanded detail inlined beneath them.
pub struct Grid<'a> {
    rows: &'a [Row],
    expansion: &'a RowExpansionController,
    selected: usize,
    /// Detail entry under the cursor within the selected row.
    selected_entry: Option<usize>,
    focused: bool,
    header_color: Color,
    selected_color: Color,
    detail_color: Color,
    dimmed_color: Color,
    border_color: Color,
}

impl<'a> Grid<'a> {
    pub fn new(rows: &'a [Row], expansion: &'a RowExpansionController, selected: usize) -> Self {
        Self {
            rows,
            expansion,
            selected,
            selected_entry: None,
            focused: true,
            header_color: Color::White,
            selected_color: Color::Reset,
            detail_color: Color::Gray,
            dimmed_color: Color::DarkGray,
            border_color: Color::Cyan,
        }
    }

    pub fn with_selected_entry(mut self, entry: Option<usize>) -> Self {
        self.selected_entry = entry;
        self
    }

    pub fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn with_colors(
        mut self,
        header: Color,
        selected: Color,
        detail: Color,
        dimmed: Color,
        border: Color,
    ) -> Self {
        self.header_color = header;
        self.selected_color = selected;
        self.detail_color = detail;
        self.dimmed_color = dimmed;
        self.border_color = border;
        self
    }

    fn columns(&self) -> Vec<&'a str> {
        self.rows
            .first()
            .map(|row| row.columns().collect())
            .unwrap_or_default()
    }

    fn widths(&self, columns: &[&str]) -> Vec<Constraint> {
        let mut widths = vec![Constraint::Length(2)];
        for (i, column) in columns.iter().enumerate() {
            let longest = self
                .rows
                .iter()
                .filter_map(|row| row.value(column))
                .map(|v| v.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0);
            let floor = if i < 3 { MIN_DETAIL_WIDTH } else { 0 };
            widths.push(Constraint::Length(longest.max(floor).min(MAX_COLUMN_WIDTH) as u16));
        }
        widths
    }

    fn selected_style(&self) -> Style {
        // "reversed" in the theme parses to Reset
        if self.selected_color == Color::Reset {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().bg(self.selected_color)
        }
    }
}

impl StatefulWidget for Grid<'_> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if self.focused {
                self.border_color
            } else {
                self.dimmed_color
            }))
            .title(" Scorecards ");

        if self.rows.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new("No rows")
                .style(Style::default().fg(self.dimmed_color))
                .centered()
                .render(inner, buf);
            return;
        }

        let columns = self.columns();
        let header = TableRow::new(
            std::iter::once(Cell::from(""))
                .chain(columns.iter().map(|c| Cell::from(c.to_string())))
                .collect::<Vec<_>>(),
        )
        .style(
            Style::default()
                .fg(self.header_color)
                .add_modifier(Modifier::BOLD),
        );

        let detail_header = Style::default().fg(self.dimmed_color);
        let detail_body = Style::default().fg(self.detail_color);
        let mut lines = Vec::with_capacity(self.rows.len());
        let mut selected_line = 0;
        for (i, row) in self.rows.iter().enumerate() {
            if i == self.selected {
                // Entries sit below the row line and the detail sub-header
                selected_line = lines.len() + self.selected_entry.map_or(0, |e| e + 2);
            }
            let row_state = self.expansion.state(&row.key);
            let cells = std::iter::once(Cell::from(control_symbol(row_state)))
                .chain(
                    columns
                        .iter()
                        .map(|c| Cell::from(row.value(c).unwrap_or_default().to_string())),
                )
                .collect::<Vec<_>>();
            lines.push(TableRow::new(cells));

            match row_state {
                ExpansionState::Collapsed => {}
                ExpansionState::Loading { .. } => lines.push(loading_row(detail_header)),
                ExpansionState::Expanded(detail) => {
                    lines.extend(detail_rows(detail, detail_header, detail_body))
                }
            }
        }

        state.select(Some(selected_line));
        let highlight = if self.focused {
            self.selected_style()
        } else {
            Style::default()
        };
        let table = Table::new(lines, self.widths(&columns))
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(highlight);
        StatefulWidget::render(table, area, buf, state);
    }
}
