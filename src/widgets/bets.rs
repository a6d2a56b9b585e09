use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, Table, Widget},
};

use crate::bets::BetsView;
use crate::format::fixed2;
use crate::model::{Bet, BetSide};

const HEADERS: [&str; 8] = [
    "Placed", "Market", "Event", "Off", "Selection", "Type", "Amount", "Odds",
];

/// "2013-05-01T14:02:11.5" -> "2013-05-01 14:02"
pub fn short_time(timestamp: &str) -> String {
    timestamp.chars().take(16).map(|c| if c == 'T' { ' ' } else { c }).collect()
}

/// Display cells of one bet, in header order.
pub fn bet_cells(bet: &Bet) -> [String; 8] {
    [
        short_time(&bet.timestamp),
        bet.market_id.clone(),
        bet.event.clone(),
        short_time(&bet.scheduled_off),
        bet.selection.clone(),
        bet.side().to_string(),
        fixed2(bet.amount),
        bet.odds.to_string(),
    ]
}

/// The current page of an open bets list.
pub struct BetsTable<'a> {
    view: &'a BetsView,
    header_color: Color,
    back_color: Color,
    lay_color: Color,
    dimmed_color: Color,
    border_color: Color,
}

impl<'a> BetsTable<'a> {
    pub fn new(view: &'a BetsView) -> Self {
        Self {
            view,
            header_color: Color::White,
            back_color: Color::Cyan,
            lay_color: Color::Yellow,
            dimmed_color: Color::DarkGray,
            border_color: Color::Cyan,
        }
    }

    pub fn with_colors(
        mut self,
        header: Color,
        back: Color,
        lay: Color,
        dimmed: Color,
        border: Color,
    ) -> Self {
        self.header_color = header;
        self.back_color = back;
        self.lay_color = lay;
        self.dimmed_color = dimmed;
        self.border_color = border;
        self
    }
}

impl Widget for BetsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .title(format!(" {} ", self.view.title()));

        let placeholder = if self.view.is_loading() {
            Some("loading bets…")
        } else if self.view.bets.is_empty() {
            Some("No bets")
        } else {
            None
        };
        if let Some(text) = placeholder {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(text)
                .style(Style::default().fg(self.dimmed_color))
                .centered()
                .render(inner, buf);
            return;
        }

        let header = TableRow::new(HEADERS.iter().map(|h| Cell::from(*h)).collect::<Vec<_>>()).style(
            Style::default()
                .fg(self.header_color)
                .add_modifier(Modifier::BOLD),
        );
        let lines = self.view.page().iter().map(|bet| {
            let side = match bet.side() {
                BetSide::Back => Style::default().fg(self.back_color),
                BetSide::Lay => Style::default().fg(self.lay_color),
            };
            let cells = bet_cells(bet);
            TableRow::new(
                cells
                    .into_iter()
                    .enumerate()
                    .map(|(i, text)| {
                        let cell = Cell::from(text);
                        if i == 5 {
                            cell.style(side)
                        } else {
                            cell
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        });
        let widths = [
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Fill(2),
            Constraint::Length(16),
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Length(6),
        ];
        Table::new(lines, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bets::BetsBrowser;
    use crate::model::{BetsQuery, EntityId};

    fn open(bets: Vec<Bet>) -> BetsBrowser {
        let mut browser = BetsBrowser::new(50, 5);
        let request = browser.open(BetsQuery::Strategy(EntityId::new("alpha")));
        if !bets.is_empty() {
            browser.complete(request, Ok(bets)).unwrap();
        }
        browser
    }

    fn render(table: BetsTable) -> Buffer {
        let area = Rect::new(0, 0, 110, 8);
        let mut buf = Buffer::empty(area);
        table.render(area, &mut buf);
        buf
    }

    fn text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_bet_cells() {
        let mut bet = Bet::new("1.1093", -2.5, 6.2);
        bet.timestamp = "2013-05-01T14:02:11.532".to_string();
        bet.event = "Ascot".to_string();
        bet.selection = "Kauto Star".to_string();
        let cells = bet_cells(&bet);
        assert_eq!(cells[0], "2013-05-01 14:02");
        assert_eq!(cells[3], "");
        assert_eq!(cells[5], "Back");
        assert_eq!(cells[6], "-2.50");
        assert_eq!(cells[7], "6.2");
    }

    #[test]
    fn test_loading_placeholder() {
        let browser = open(vec![]);
        let buf = render(BetsTable::new(browser.view().unwrap()));
        let text = text(&buf);
        assert!(text.contains("Paper bets alpha"));
        assert!(text.contains("loading bets"));
    }

    #[test]
    fn test_lay_uses_lay_color() {
        let browser = open(vec![Bet::new("1.01", 3.0, 2.0), Bet::new("1.02", -3.0, 2.0)]);
        let buf = render(BetsTable::new(browser.view().unwrap()).with_colors(
            Color::White,
            Color::Blue,
            Color::Magenta,
            Color::DarkGray,
            Color::Cyan,
        ));
        let text = text(&buf);
        assert!(text.contains("Lay"));
        assert!(text.contains("Back"));

        let (mut lay, mut back) = (false, false);
        for cell in buf.content() {
            match cell.symbol() {
                "L" if cell.fg == Color::Magenta => lay = true,
                "B" if cell.fg == Color::Blue => back = true,
                _ => {}
            }
        }
        assert!(lay && back);
    }
}
