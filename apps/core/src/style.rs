use serde::Serialize;
use serde_json::Value;

use crate::domain::Status;

pub const DEFAULT_STROKE: &str = "#3388ff";
pub const NEUTRAL_COLOR: &str = "#999";
pub const MARKER_STROKE: &str = "#000";

/// Path options understood by the map renderer. Serializes to the
/// camelCase option names Leaflet expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl ShapeStyle {
    pub fn stroke(color: &str) -> Self {
        Self {
            color: color.to_string(),
            weight: None,
            fill_color: None,
            fill_opacity: None,
            radius: None,
        }
    }

    fn outline(color: &str, weight: f64, fill_opacity: f64) -> Self {
        Self {
            weight: Some(weight),
            fill_opacity: Some(fill_opacity),
            ..Self::stroke(color)
        }
    }

    /// Paints fill and stroke with the status color.
    pub fn apply_status(&mut self, status: Status) {
        self.color = status.color().to_string();
        self.fill_color = Some(status.color().to_string());
    }

    /// Color to draw the shape with where only one color fits.
    pub fn primary_color(&self) -> &str {
        self.fill_color.as_deref().unwrap_or(&self.color)
    }
}

/// How a point feature is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointSymbol {
    /// The renderer's default pin
    Pin,
    /// A small filled circle using the feature style
    Circle,
}

/// Fixed style of a layer; unknown layers get a plain default stroke.
pub fn layer_style(layer_id: &str) -> ShapeStyle {
    match layer_id {
        "dpto_chaco" => ShapeStyle::outline("#3388ff", 3.0, 0.15),
        "gob_locales_2022" => ShapeStyle::outline("#ff7800", 2.0, 0.15),
        "loc_censal_2022" => ShapeStyle::outline("#00cc44", 2.0, 0.15),
        "pjes_censal_2022" => ShapeStyle::outline("#cc0000", 1.0, 0.6),
        _ => ShapeStyle::stroke(DEFAULT_STROKE),
    }
}

/// Fill color for a raw status value. A missing status counts as not
/// reviewed; an unrecognized one is neutral gray.
pub fn status_fill(value: Option<&Value>) -> &'static str {
    match value {
        None => Status::NotReviewed.color(),
        Some(raw) => Status::from_value(raw).map_or(NEUTRAL_COLOR, Status::color),
    }
}

/// Circle marker for a point of the editable layer.
pub fn status_marker(value: Option<&Value>) -> ShapeStyle {
    ShapeStyle {
        color: MARKER_STROKE.to_string(),
        weight: Some(0.6),
        fill_color: Some(status_fill(value).to_string()),
        fill_opacity: Some(0.9),
        radius: Some(5.0),
    }
}

/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` into RGB, dropping alpha.
pub fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };

    match digits.len() {
        3 => {
            let short = |index: usize| channel(index..index + 1).map(|value| value * 17);
            Some((short(0)?, short(1)?, short(2)?))
        }
        6 | 8 => Some((channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        _ => None,
    }
}
