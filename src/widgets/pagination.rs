use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::pagination::PaginationWindow;

/// One line: page controls on the left, "Showing a to b of n entries" on the right.
pub struct PaginationBar<'a> {
    window: &'a PaginationWindow,
    summary: String,
    loading: bool,
    active_color: Color,
    dimmed_color: Color,
    background: Color,
}

impl<'a> PaginationBar<'a> {
    pub fn new(window: &'a PaginationWindow, summary: String) -> Self {
        Self {
            window,
            summary,
            loading: false,
            active_color: Color::Cyan,
            dimmed_color: Color::DarkGray,
            background: Color::Reset,
        }
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn with_colors(mut self, active: Color, dimmed: Color, background: Color) -> Self {
        self.active_color = active;
        self.dimmed_color = dimmed;
        self.background = background;
        self
    }

    fn nav(&self, label: &'static str, disabled: bool) -> Span<'static> {
        let style = if disabled {
            Style::default().fg(self.dimmed_color)
        } else {
            Style::default()
        };
        Span::styled(label, style)
    }

    pub fn line(&self) -> Line<'static> {
        let mut spans = vec![
            self.nav("« First", self.window.previous_disabled),
            Span::raw(" "),
            self.nav("‹ Prev", self.window.previous_disabled),
            Span::raw(" "),
        ];
        for &page in &self.window.pages {
            let label = if self.window.is_current(page) {
                Span::styled(
                    format!("[{page}]"),
                    Style::default()
                        .fg(self.active_color)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(format!(" {page} "))
            };
            spans.push(label);
        }
        spans.push(Span::raw(" "));
        spans.push(self.nav("Next ›", self.window.next_disabled));
        spans.push(Span::raw(" "));
        spans.push(self.nav("Last »", self.window.next_disabled));
        Line::from(spans)
    }
}

impl Widget for &PaginationBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let summary = if self.loading {
            format!("{} (loading)", self.summary)
        } else {
            self.summary.clone()
        };
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(summary.chars().count() as u16 + 1),
            ])
            .split(area);
        let base = Style::default().bg(self.background);
        Paragraph::new(self.line()).style(base).render(layout[0], buf);
        Paragraph::new(summary)
            .style(base)
            .right_aligned()
            .render(layout[1], buf);
    }
}
