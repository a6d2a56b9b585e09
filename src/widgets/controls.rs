use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
};

const GRID_CONTROLS: [(&str, &str); 8] = [
    ("↵", "Expand"),
    ("b", "Bets"),
    ("←→", "Page"),
    ("1-9", "Go to"),
    ("Tab", "Strategies"),
    ("r", "Refresh"),
    ("Esc", "Dismiss"),
    ("q", "Quit"),
];

const STRATEGY_CONTROLS: [(&str, &str); 6] = [
    ("↑↓", "Select"),
    ("↵", "Start/Stop"),
    ("b", "Bets"),
    ("Tab", "Grid"),
    ("r", "Refresh"),
    ("q", "Quit"),
];

const BETS_CONTROLS: [(&str, &str); 4] = [
    ("←→", "Page"),
    ("1-9", "Go to"),
    ("Esc", "Close"),
    ("q", "Quit"),
];

/// Key hints for the focused pane.
pub struct Controls {
    pub strategies_focused: bool,
    pub bets_open: bool,
    pub background: Color,
}

impl Controls {
    pub fn new(strategies_focused: bool) -> Self {
        Self {
            strategies_focused,
            bets_open: false,
            background: Color::DarkGray,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_bets_open(mut self, open: bool) -> Self {
        self.bets_open = open;
        self
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.bets_open {
            &BETS_CONTROLS
        } else if self.strategies_focused {
            &STRATEGY_CONTROLS
        } else {
            &GRID_CONTROLS
        }
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hints = self.hints();
        let mut constraints = hints.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });
        constraints.push(Constraint::Fill(1));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);
        let base_style = Style::default();

        for (i, (key, action)) in hints.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(base_style.add_modifier(Modifier::BOLD))
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(base_style.bg(self.background))
                .render(layout[j + 1], buf);
        }

        Paragraph::new("")
            .style(base_style.bg(self.background))
            .render(layout[hints.len() * 2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(controls: &Controls) -> String {
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        controls.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_hints_follow_focus() {
        assert!(render(&Controls::new(false)).contains("Expand"));
        let strategies = render(&Controls::new(true));
        assert!(strategies.contains("Start/Stop"));
        assert!(!strategies.contains("Expand"));
        let bets = render(&Controls::new(true).with_bets_open(true));
        assert!(bets.contains("Close"));
        assert!(!bets.contains("Start/Stop"));
    }
}
