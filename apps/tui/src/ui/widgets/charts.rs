use parajes_core::{ChartSlot, ChartSpec};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line as TextLine;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;

use crate::ui::widgets::map::to_color;
use crate::view::Screen;

/// Bar length for a count; negatives and NaN draw nothing.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bar_value(count: f64) -> u64 {
    if count.is_finite() && count > 0.0 {
        count.round() as u64
    } else {
        0
    }
}

pub fn format_count(count: f64) -> String {
    if count.fract() == 0.0 {
        format!("{count:.0}")
    } else {
        format!("{count:.1}")
    }
}

/// Per-bar colors come from the `ChartSpec`; slots without any use one accent.
fn bar_color(spec: &ChartSpec, index: usize) -> Color {
    spec.colors.get(index).map_or(Color::Cyan, |hex| to_color(hex))
}

pub fn render_kpi_panel(screen: &Screen, f: &mut Frame<'_>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .split(area);

    for (slot, row) in ChartSlot::ALL.iter().zip(rows.iter()) {
        render_kpi_chart(*slot, screen.charts.get(slot), f, *row);
    }
}

fn render_kpi_chart(slot: ChartSlot, spec: Option<&ChartSpec>, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", slot.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(spec) = spec.filter(|spec| !spec.labels.is_empty()) else {
        let paragraph = Paragraph::new("Sin datos")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    };

    let bars: Vec<Bar<'_>> = spec
        .labels
        .iter()
        .zip(&spec.values)
        .enumerate()
        .map(|(index, (label, count))| {
            Bar::default()
                .value(bar_value(*count))
                .text_value(format_count(*count))
                .label(TextLine::from(label.as_str()))
                .style(Style::default().fg(bar_color(spec, index)))
                .value_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(bar_color(spec, index))
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let max_value = spec
        .values
        .iter()
        .map(|count| bar_value(*count))
        .max()
        .unwrap_or(0)
        .max(1);

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .max(max_value)
        .bar_width(1)
        .bar_gap(0);

    f.render_widget(chart, area);
}
