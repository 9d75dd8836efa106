use parajes_core::popup::Popup;
use parajes_core::Status;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::ui::widgets::map::to_color;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .areas(area);

    let [_, center, _] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .areas(middle);

    center
}

fn status_key(status: Status) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            format!("[{}]", status.code()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}  ", status.label()),
            Style::default().fg(to_color(status.color())),
        ),
    ]
}

/// Property rows, then the review panel when the layer is editable.
pub fn popup_lines(popup: &Popup) -> Vec<TextLine<'_>> {
    let mut lines: Vec<TextLine<'_>> = popup
        .rows
        .iter()
        .map(|(key, value)| {
            TextLine::from(vec![
                Span::styled(key.as_str(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!(": {value}")),
            ])
        })
        .collect();

    lines.push(TextLine::from(""));
    match &popup.review {
        Some(review) => {
            lines.push(TextLine::from(format!("Estado actual: {}", review.current)));
            lines.push(TextLine::from(
                review
                    .actions
                    .iter()
                    .flat_map(|action| status_key(action.status))
                    .collect::<Vec<_>>(),
            ));
        }
        None => lines.push(TextLine::from(Span::styled(
            "Capa sin revisión de estado",
            Style::default().fg(Color::Gray),
        ))),
    }
    lines
}

pub fn render_feature_popup(popup: &Popup, f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Detalle ")
        .title_bottom(TextLine::from(" Esc: cerrar ").centered())
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(Text::from(popup_lines(popup)))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use parajes_core::geo::Feature;
    use serde_json::json;

    fn text(lines: &[TextLine<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn editable_popup_lists_the_three_keys() {
        let feature: Feature =
            serde_json::from_value(json!({ "properties": { "id": 7, "nombre": "Tres Isletas" } }))
                .unwrap();
        let popup = Popup::for_feature(&feature, true);
        let lines = text(&popup_lines(&popup));

        assert_eq!(lines[0], "id: 7");
        assert_eq!(lines[1], "nombre: Tres Isletas");
        assert_eq!(lines[3], "Estado actual: 2");
        assert!(lines[4].contains("[1] Corresponde"));
        assert!(lines[4].contains("[3] No Corresponde"));
    }

    #[test]
    fn plain_popup_has_no_keys() {
        let feature: Feature =
            serde_json::from_value(json!({ "properties": { "nombre": "Chaco" } })).unwrap();
        let lines = text(&popup_lines(&Popup::for_feature(&feature, false)));
        assert_eq!(lines.last().map(String::as_str), Some("Capa sin revisión de estado"));
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 50, area);
        assert_eq!(inner, Rect::new(20, 10, 60, 20));
    }
}
