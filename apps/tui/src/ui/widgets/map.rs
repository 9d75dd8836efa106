use parajes_core::style::hex_rgb;
use parajes_core::RenderedFeature;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::view::Screen;

/// Half-width in degrees of the view shown before anything is loaded.
const EMPTY_SPAN: f64 = 2.0;
/// Smallest span drawn, so a single point still gets a usable canvas.
const MIN_SPAN: f64 = 0.02;

/// Longitude and latitude window of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Bounds {
    /// Window around `center` (latitude, longitude).
    pub fn around(center: [f64; 2]) -> Self {
        let [lat, lng] = center;
        Self {
            x: [lng - EMPTY_SPAN, lng + EMPTY_SPAN],
            y: [lat - EMPTY_SPAN, lat + EMPTY_SPAN],
        }
    }

    /// Box enclosing every drawn vertex, padded by five percent.
    pub fn enclosing<'a>(features: impl IntoIterator<Item = &'a RenderedFeature>) -> Option<Self> {
        let mut positions = features
            .into_iter()
            .flat_map(|rendered| rendered.feature.positions());
        let (lng, lat) = positions.next()?;
        let mut x = [lng, lng];
        let mut y = [lat, lat];
        for (lng, lat) in positions {
            x = [x[0].min(lng), x[1].max(lng)];
            y = [y[0].min(lat), y[1].max(lat)];
        }

        Some(Self {
            x: pad(x),
            y: pad(y),
        })
    }
}

fn pad([low, high]: [f64; 2]) -> [f64; 2] {
    let margin = ((high - low) * 0.05).max(MIN_SPAN / 2.0);
    [low - margin, high + margin]
}

pub fn to_color(hex: &str) -> Color {
    hex_rgb(hex).map_or(Color::Gray, |(r, g, b)| Color::Rgb(r, g, b))
}

fn draw_feature(ctx: &mut Context<'_>, rendered: &RenderedFeature, color: Color) {
    if rendered.feature.is_point() {
        let coords = rendered.feature.positions();
        ctx.draw(&Points {
            coords: &coords,
            color,
        });
        return;
    }

    for path in rendered.feature.paths() {
        for pair in path.windows(2) {
            if let [(x1, y1), (x2, y2)] = pair {
                ctx.draw(&CanvasLine {
                    x1: *x1,
                    y1: *y1,
                    x2: *x2,
                    y2: *y2,
                    color,
                });
            }
        }
    }
}

/// Braille map of every overlay, in the order they were added. The
/// highlighted feature is drawn last, in white.
pub fn render_map(
    screen: &Screen,
    selected: Option<usize>,
    center: [f64; 2],
    focused: bool,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let bounds = Bounds::enclosing(screen.map.values().flat_map(|layer| &layer.features))
        .unwrap_or_else(|| Bounds::around(center));
    let highlighted = selected.and_then(|index| screen.feature(index));
    let border = if focused { Color::Yellow } else { Color::Cyan };

    let title = highlighted
        .and_then(|rendered| rendered.feature.properties.get("nombre"))
        .and_then(|name| name.as_str())
        .map_or_else(|| " Mapa ".to_string(), |name| format!(" Mapa: {name} "));

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .marker(Marker::Braille)
        .x_bounds(bounds.x)
        .y_bounds(bounds.y)
        .paint(|ctx| {
            for layer in screen.map.values() {
                for rendered in &layer.features {
                    draw_feature(ctx, rendered, to_color(rendered.style.primary_color()));
                }
            }
            if let Some(rendered) = highlighted {
                ctx.layer();
                draw_feature(ctx, rendered, Color::White);
            }
        });

    f.render_widget(canvas, area);
}
