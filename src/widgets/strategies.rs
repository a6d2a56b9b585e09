use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
};

use crate::active::{ActiveSetSynchronizer, AffordanceStyle, ButtonAffordance};
use crate::model::EntityId;

/// Width of the button column, wide enough for the longest label.
const BUTTON_WIDTH: usize = 9;

#[derive(Debug, Clone, Copy)]
pub struct AffordanceColors {
    pub active: Color,
    pub inactive: Color,
    pub danger: Color,
    pub primary: Color,
    pub busy: Color,
}

impl Default for AffordanceColors {
    fn default() -> Self {
        Self {
            active: Color::Green,
            inactive: Color::DarkGray,
            danger: Color::Red,
            primary: Color::Cyan,
            busy: Color::Yellow,
        }
    }
}

impl AffordanceColors {
    pub fn style(&self, affordance: &ButtonAffordance) -> Style {
        let color = match affordance.style {
            AffordanceStyle::Active => self.active,
            AffordanceStyle::Inactive => self.inactive,
            AffordanceStyle::Danger => self.danger,
            AffordanceStyle::Primary => self.primary,
            AffordanceStyle::Busy => self.busy,
        };
        let style = Style::default().fg(color);
        match affordance.style {
            AffordanceStyle::Danger | AffordanceStyle::Primary => {
                style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
            }
            _ => style,
        }
    }
}

/// Toggle buttons for every known strategy. The highlighted entry counts as hovered.
pub struct StrategyPanel<'a> {
    entities: &'a [EntityId],
    sync: &'a ActiveSetSynchronizer,
    hovered: Option<usize>,
    colors: AffordanceColors,
    border_color: Color,
}

impl<'a> StrategyPanel<'a> {
    pub fn new(entities: &'a [EntityId], sync: &'a ActiveSetSynchronizer) -> Self {
        Self {
            entities,
            sync,
            hovered: None,
            colors: AffordanceColors::default(),
            border_color: Color::DarkGray,
        }
    }

    pub fn with_hovered(mut self, hovered: Option<usize>) -> Self {
        self.hovered = hovered;
        self
    }

    pub fn with_colors(mut self, colors: AffordanceColors, border: Color) -> Self {
        self.colors = colors;
        self.border_color = border;
        self
    }

    fn item(&self, index: usize, id: &EntityId) -> ListItem<'static> {
        let affordance = self.sync.affordance(id, self.hovered == Some(index));
        ListItem::new(Line::from(vec![
            Span::styled(
                format!("{:^width$}", affordance.label, width = BUTTON_WIDTH),
                self.colors.style(&affordance),
            ),
            Span::raw(" "),
            Span::raw(id.to_string()),
        ]))
    }
}

impl Widget for StrategyPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .title(" Strategies ");
        let inner = block.inner(area);
        block.render(area, buf);

        if self.entities.is_empty() {
            let message = if self.sync.is_loaded() {
                "None"
            } else {
                "Loading…"
            };
            Paragraph::new(message)
                .style(Style::default().fg(self.colors.inactive))
                .render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, id)| self.item(i, id))
            .collect();
        List::new(items).render(inner, buf);
    }
}
