//! Nested detail shown under an expanded grid row, and the chart comparing its
//! observed and model-implied values.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, LegendPosition, Paragraph, Row, Widget},
};

use crate::chart_data::{ComparisonChart, MODEL_SERIES, OBSERVED_SERIES};
use crate::format::fixed2;
use crate::model::DetailSet;

const INDENT: &str = "  ";

/// Table lines for one expanded row: a sub-header, then one line per entry in fetch order.
/// The first cell is left empty so the lines sit under the grid's control column.
pub fn detail_rows(detail: &DetailSet, header: Style, body: Style) -> Vec<Row<'static>> {
    let mut rows = Vec::with_capacity(detail.len() + 1);
    rows.push(
        Row::new(vec![
            Cell::from(""),
            Cell::from(format!("{INDENT}label")),
            Cell::from(OBSERVED_SERIES),
            Cell::from(MODEL_SERIES),
        ])
        .style(header.add_modifier(Modifier::ITALIC)),
    );
    if detail.is_empty() {
        rows.push(Row::new(vec![Cell::from(""), Cell::from(format!("{INDENT}no detail"))]).style(body));
        return rows;
    }
    for entry in detail {
        rows.push(
            Row::new(vec![
                Cell::from(""),
                Cell::from(format!("{INDENT}{}", entry.label)),
                Cell::from(fixed2(entry.observed)),
                Cell::from(fixed2(entry.model)),
            ])
            .style(body),
        );
    }
    rows
}

/// Placeholder line for a row whose detail is still being fetched.
pub fn loading_row(style: Style) -> Row<'static> {
    Row::new(vec![Cell::from(""), Cell::from(format!("{INDENT}loading…"))]).style(style)
}

pub struct DetailChart<'a> {
    chart: &'a ComparisonChart,
    title: String,
    observed_color: Color,
    model_color: Color,
    border_color: Color,
    text_color: Color,
}

impl<'a> DetailChart<'a> {
    pub fn new(chart: &'a ComparisonChart, title: impl Into<String>) -> Self {
        Self {
            chart,
            title: title.into(),
            observed_color: Color::Gray,
            model_color: Color::Cyan,
            border_color: Color::DarkGray,
            text_color: Color::White,
        }
    }

    pub fn with_colors(
        mut self,
        observed: Color,
        model: Color,
        border: Color,
        text: Color,
    ) -> Self {
        self.observed_color = observed;
        self.model_color = model;
        self.border_color = border;
        self.text_color = text;
        self
    }

    fn series_color(&self, name: &str) -> Color {
        if name == MODEL_SERIES {
            self.model_color
        } else {
            self.observed_color
        }
    }
}

impl Widget for DetailChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .title(format!(" {} ", self.title));

        if self.chart.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new("Nothing to chart")
                .style(Style::default().fg(self.border_color))
                .centered()
                .render(inner, buf);
            return;
        }

        let points: Vec<Vec<(f64, f64)>> = self.chart.series.iter().map(|s| s.points()).collect();
        let datasets: Vec<Dataset> = self
            .chart
            .series
            .iter()
            .zip(points.iter())
            .map(|(series, data)| {
                Dataset::default()
                    .name(series.name.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(self.series_color(&series.name)))
                    .data(data)
            })
            .collect();

        let label_style = Style::default().fg(self.text_color);
        let [x_min, x_max] = self.chart.x_bounds();
        let categories = &self.chart.categories;
        let mut x_labels = vec![Span::styled(categories[0].clone(), label_style)];
        if categories.len() > 2 {
            x_labels.push(Span::styled(
                categories[categories.len() / 2].clone(),
                label_style,
            ));
        }
        if categories.len() > 1 {
            x_labels.push(Span::styled(
                categories[categories.len() - 1].clone(),
                label_style,
            ));
        }

        let [y_min, y_max] = self.chart.y_bounds();
        let y_labels = vec![
            Span::styled(fixed2(y_min), label_style),
            Span::styled(fixed2((y_min + y_max) / 2.0), label_style),
            Span::styled(fixed2(y_max), label_style),
        ];

        Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds([x_min, x_max])
                    .style(label_style)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .bounds([y_min, y_max])
                    .style(label_style)
                    .labels(y_labels),
            )
            .legend_position(Some(LegendPosition::TopRight))
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
            .render(area, buf);
    }
}
