use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

pub const DEFAULT_EDITABLE_LAYER: &str = "pjes_censal_2022";
pub const DEFAULT_REGION_PARAM: &str = "depto";
pub const DEFAULT_TILE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
pub const DEFAULT_ATTRIBUTION: &str = "Tiles © Esri — Source: Esri, Maxar, Earthstar Geographics";

/// Settings shared by every front end.
///
/// Every field has a default, so a partial JSON document (or none at all)
/// is enough to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Prefix for every API path. Empty means same origin.
    pub api_base: String,
    /// The only layer whose points carry an editable review status.
    pub editable_layer: String,
    /// Query parameter carrying the region filter.
    pub region_param: String,
    pub map: MapConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Latitude, longitude
    pub center: [f64; 2],
    pub zoom: u8,
    pub max_zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            editable_layer: DEFAULT_EDITABLE_LAYER.to_string(),
            region_param: DEFAULT_REGION_PARAM.to_string(),
            map: MapConfig::default(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [-26.1, -60.5],
            zoom: 7,
            max_zoom: 24,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self, DashboardError> {
        Ok(serde_json::from_str(text)?)
    }

    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Joins an API path (always starting with `/`) onto the configured base.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_base.trim_end_matches('/'))
    }

    pub fn is_editable(&self, layer_id: &str) -> bool {
        self.editable_layer == layer_id
    }
}
