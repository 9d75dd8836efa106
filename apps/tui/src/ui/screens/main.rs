use parajes_core::{DashboardConfig, Selector};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, Focus};
use crate::ui::widgets::charts::render_kpi_panel;
use crate::ui::widgets::map::render_map;
use crate::ui::widgets::popup::{centered_rect, render_feature_popup};
use crate::view::Screen;

pub fn render_main(app: &App, screen: &Screen, config: &DashboardConfig, f: &mut Frame<'_>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title area
            Constraint::Min(10),   // Selectors, map and charts
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_title_section(screen, config, f, main_layout[0]);
    render_content_section(app, screen, config, f, main_layout[1]);
    render_status_section(app, screen, f, main_layout[2]);
    render_shortcuts(f, main_layout[3]);

    if app.show_help {
        render_help_popup(f, main_layout[1]);
    } else if screen.popup_open {
        if let Some(rendered) = screen.feature(app.feature_cursor) {
            render_feature_popup(&rendered.popup, f, main_layout[1]);
        }
    }
}

fn render_title_section(screen: &Screen, config: &DashboardConfig, f: &mut Frame<'_>, area: Rect) {
    let region = screen
        .regions
        .value()
        .map_or("-", |option| option.text.as_str());
    let layer = screen
        .layers
        .value()
        .map_or("-", |option| option.text.as_str());
    let features = screen
        .active_layer()
        .map_or(0, |layer| layer.features.len());

    let label = Style::default().fg(Color::Gray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let title = Paragraph::new(TextLine::from(vec![
        Span::styled("Departamento: ", label),
        Span::styled(region, value),
        Span::styled("  Capa: ", label),
        Span::styled(layer, value),
        Span::styled("  Elementos: ", label),
        Span::styled(features.to_string(), value),
        Span::styled("  API: ", label),
        Span::styled(config.api_base.as_str(), Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .title("== Parajes · Revisión censal ==")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(title, area);
}

fn render_content_section(
    app: &App,
    screen: &Screen,
    config: &DashboardConfig,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(22),
            Constraint::Percentage(48),
            Constraint::Percentage(30),
        ])
        .split(area);

    let selectors = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[0]);

    render_selector(app, screen, Focus::Regions, f, selectors[0]);
    render_selector(app, screen, Focus::Layers, f, selectors[1]);

    let selected = (app.focus == Focus::Map || screen.popup_open).then_some(app.feature_cursor);
    render_map(
        screen,
        selected,
        config.map.center,
        app.focus == Focus::Map,
        f,
        columns[1],
    );

    render_kpi_panel(screen, f, columns[2]);
}

/// One selector list. `●` marks the committed value, the highlight is the
/// cursor.
fn render_selector(app: &App, screen: &Screen, focus: Focus, f: &mut Frame<'_>, area: Rect) {
    let Some(selector) = focus.selector() else {
        return;
    };
    let state = screen.selector(selector);
    let focused = app.focus == focus;

    let items: Vec<ListItem<'_>> = state
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let marker = if state.selected == Some(index) { "● " } else { "  " };
            ListItem::new(format!("{marker}{}", option.text))
        })
        .collect();

    let border = if focused { Color::Yellow } else { Color::Cyan };
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" {} ", focus.label()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(border)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let cursor = (!state.options.is_empty())
        .then(|| app.cursor(selector).min(state.options.len() - 1));
    let mut list_state = ListState::default().with_selected(cursor);
    f.render_stateful_widget(list, area, &mut list_state);

    if state.options.is_empty() && selector == Selector::Layer {
        let hint = Paragraph::new("Sin capas")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(hint, area.inner(Margin::new(1, 1)));
    }
}

fn render_status_section(app: &App, screen: &Screen, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Estado ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let status_text = if let Some(alert) = &screen.alert {
        Text::from(Span::styled(
            alert.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else {
        Text::from(Span::styled(
            app.status_message.as_str(),
            Style::default().fg(Color::Green),
        ))
    };

    let status_paragraph = Paragraph::new(status_text)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn key_hint(key: &'static str, action: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(
            key,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(action, Style::default().fg(Color::Gray)),
    ]
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let spans: Vec<Span<'static>> = [
        key_hint("Tab", ": Panel | "),
        key_hint("↑↓", ": Mover | "),
        key_hint("Enter", ": Elegir | "),
        key_hint("1-3", ": Estado | "),
        key_hint("r", ": Recargar | "),
        key_hint("?", ": Ayuda | "),
        key_hint("q", ": Salir"),
    ]
    .into_iter()
    .flatten()
    .collect();

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 80, area);
    f.render_widget(Clear, popup_area);

    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let lines = vec![
        TextLine::from(Span::styled("Navegación", heading)),
        TextLine::from("  Tab / Shift+Tab   cambiar de panel"),
        TextLine::from("  ↑ ↓               mover el cursor de la lista"),
        TextLine::from("  Enter             aplicar departamento o capa"),
        TextLine::from(""),
        TextLine::from(Span::styled("Mapa", heading)),
        TextLine::from("  ← → / ↑ ↓         recorrer los elementos de la capa"),
        TextLine::from("  Enter             abrir el detalle del elemento"),
        TextLine::from("  1 / 2 / 3         Corresponde / No Revisado / No Corresponde"),
        TextLine::from("  Esc               cerrar el detalle"),
        TextLine::from(""),
        TextLine::from(Span::styled("General", heading)),
        TextLine::from("  r                 recargar capa y KPIs"),
        TextLine::from("  ? / F1            mostrar u ocultar esta ayuda"),
        TextLine::from("  q                 salir"),
    ];

    let help = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title("== Ayuda ==")
                .title_bottom(TextLine::from(" ? o Esc para cerrar ").centered())
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}
