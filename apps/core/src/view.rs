use crate::domain::{LayerDescriptor, Region, Status, REGION_ALL};
use crate::geo::Feature;
use crate::kpi::ChartSpec;
use crate::popup::Popup;
use crate::style::{layer_style, status_marker, PointSymbol, ShapeStyle};

/// The two selector controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    Layer,
    Region,
}

impl Selector {
    pub const fn anchor_id(self) -> &'static str {
        match self {
            Self::Layer => "selectorCapas",
            Self::Region => "selectorDepartamento",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

impl SelectOption {
    pub fn region_all() -> Self {
        Self {
            value: REGION_ALL.to_string(),
            text: "Todos".to_string(),
        }
    }

    pub fn region(name: String) -> Self {
        Self {
            value: name.clone(),
            text: name,
        }
    }

    pub fn region_value(&self) -> Region {
        Region::parse(&self.value)
    }
}

impl From<&LayerDescriptor> for SelectOption {
    fn from(layer: &LayerDescriptor) -> Self {
        Self {
            value: layer.id.clone(),
            text: layer.label.clone(),
        }
    }
}

/// One feature as it is currently drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    pub feature: Feature,
    pub style: ShapeStyle,
    pub point: PointSymbol,
    pub popup: Popup,
}

impl RenderedFeature {
    pub fn new(layer_id: &str, feature: Feature, editable: bool) -> Self {
        let (style, point) = if editable && feature.is_point() {
            (status_marker(feature.status_value()), PointSymbol::Circle)
        } else {
            (layer_style(layer_id), PointSymbol::Pin)
        };
        let popup = Popup::for_feature(&feature, editable);

        Self {
            feature,
            style,
            point,
            popup,
        }
    }

    /// Records a new status and repaints the feature with its color.
    pub fn apply_status(&mut self, status: Status) {
        self.feature.set_status(status);
        self.style.apply_status(status);
        self.popup = Popup::for_feature(&self.feature, true);
    }
}

/// Everything the session draws on or reads from.
///
/// Implementations own the concrete widgets: DOM selects, the map and its
/// overlays, chart canvases. `Overlay` and `Chart` are the live handles the
/// session keeps so it can release them before installing replacements.
pub trait View {
    type Overlay;
    type Chart;

    /// Replaces the options of a selector. Returns `false` when the control
    /// does not exist.
    fn populate(&self, selector: Selector, options: &[SelectOption]) -> bool;

    fn selected(&self, selector: Selector) -> Option<String>;

    fn select_index(&self, selector: Selector, index: usize);

    fn add_overlay(&self, layer_id: &str, features: &[RenderedFeature]) -> Self::Overlay;

    fn remove_overlay(&self, overlay: Self::Overlay);

    /// Redraws one feature of a live overlay after an in-place edit.
    fn refresh_feature(&self, overlay: &Self::Overlay, index: usize, feature: &RenderedFeature);

    fn close_popup(&self);

    /// Draws a chart. `None` when the slot has no surface to draw on.
    fn mount_chart(&self, spec: &ChartSpec) -> Option<Self::Chart>;

    fn destroy_chart(&self, chart: Self::Chart);

    /// Message the operator must see.
    fn alert(&self, message: &str);
}
