use parajes_core::style::PointSymbol;
use parajes_core::{ChartSpec, MapConfig, RenderedFeature, SelectOption, Selector, View};
use serde::Serialize;
use tracing::{error, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, HtmlOptionElement, HtmlSelectElement};

use crate::chartjs::{chart_config, Chart};
use crate::leaflet;
use crate::popup;

pub const MAP_ANCHOR: &str = "map";

/// Live Leaflet objects of one layer: the group on the map and one
/// GeoJSON layer per feature, in feature order.
#[derive(Debug)]
pub struct WebOverlay {
    group: leaflet::Layer,
    features: Vec<leaflet::Layer>,
}

/// DOM, Leaflet and Chart.js behind the session's `View`.
pub struct DomView {
    document: Document,
    map: Option<leaflet::Map>,
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

impl DomView {
    pub fn new(document: Document, config: &MapConfig) -> Self {
        let map = if document.get_element_by_id(MAP_ANCHOR).is_some() {
            match init_map(config) {
                Ok(map) => Some(map),
                Err(err) => {
                    error!(?err, "map initialisation failed");
                    None
                }
            }
        } else {
            error!(anchor = MAP_ANCHOR, "map container not found");
            None
        };

        Self { document, map }
    }

    fn select(&self, selector: Selector) -> Option<HtmlSelectElement> {
        self.document
            .get_element_by_id(selector.anchor_id())
            .and_then(|element| element.dyn_into().ok())
    }

    fn feature_layer(&self, feature: &RenderedFeature) -> Result<leaflet::Layer, JsValue> {
        let style = to_js(&feature.style)?;
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"style".into(), &style)?;
        if feature.point == PointSymbol::Circle {
            let factory = leaflet::circle_marker_factory(&style)?;
            js_sys::Reflect::set(&options, &"pointToLayer".into(), &factory)?;
        }

        let layer = leaflet::geo_json(&to_js(&feature.feature.to_geojson())?, &options);
        layer.bind_popup(&popup::render(&self.document, &feature.popup)?);
        Ok(layer)
    }
}

fn init_map(config: &MapConfig) -> Result<leaflet::Map, JsValue> {
    let map = leaflet::map(MAP_ANCHOR);
    let [lat, lng] = config.center;
    map.set_view(
        &js_sys::Array::of2(&lat.into(), &lng.into()),
        f64::from(config.zoom),
    );

    let tile_options = to_js(&serde_json::json!({
        "maxZoom": config.max_zoom,
        "attribution": config.attribution,
    }))?;
    leaflet::tile_layer(&config.tile_url, &tile_options).add_to(&map);
    Ok(map)
}

impl View for DomView {
    type Overlay = WebOverlay;
    type Chart = Chart;

    fn populate(&self, selector: Selector, options: &[SelectOption]) -> bool {
        let Some(select) = self.select(selector) else {
            return false;
        };

        select.set_inner_html("");
        for option in options {
            let element = match HtmlOptionElement::new_with_text_and_value(&option.text, &option.value) {
                Ok(element) => element,
                Err(err) => {
                    warn!(?err, value = %option.value, "option not created");
                    continue;
                }
            };
            if let Err(err) = select.append_child(&element) {
                warn!(?err, value = %option.value, "option not appended");
            }
        }
        true
    }

    fn selected(&self, selector: Selector) -> Option<String> {
        self.select(selector).map(|select| select.value())
    }

    fn select_index(&self, selector: Selector, index: usize) {
        if let (Some(select), Ok(index)) = (self.select(selector), i32::try_from(index)) {
            select.set_selected_index(index);
        }
    }

    fn add_overlay(&self, layer_id: &str, features: &[RenderedFeature]) -> WebOverlay {
        let group = leaflet::feature_group();
        let mut layers = Vec::with_capacity(features.len());

        for (index, feature) in features.iter().enumerate() {
            match self.feature_layer(feature) {
                Ok(layer) => {
                    group.add_layer(&layer);
                    layers.push(layer);
                }
                Err(err) => {
                    warn!(layer = layer_id, index, ?err, "feature not drawn");
                    // keeps indexes aligned with the session's feature list
                    layers.push(leaflet::feature_group());
                }
            }
        }

        if let Some(map) = &self.map {
            group.add_to(map);
        }
        WebOverlay {
            group,
            features: layers,
        }
    }

    fn remove_overlay(&self, overlay: WebOverlay) {
        if let Some(map) = &self.map {
            map.remove_layer(&overlay.group);
        }
    }

    fn refresh_feature(&self, overlay: &WebOverlay, index: usize, feature: &RenderedFeature) {
        let Some(layer) = overlay.features.get(index) else {
            return;
        };
        match to_js(&feature.style) {
            Ok(style) => {
                layer.set_style(&style);
            }
            Err(err) => warn!(index, ?err, "style not converted"),
        }
        match popup::render(&self.document, &feature.popup) {
            Ok(content) => {
                layer.bind_popup(&content);
            }
            Err(err) => warn!(index, ?err, "popup not rebuilt"),
        }
    }

    fn close_popup(&self) {
        if let Some(map) = &self.map {
            map.close_popup();
        }
    }

    fn mount_chart(&self, spec: &ChartSpec) -> Option<Chart> {
        let canvas: HtmlCanvasElement = self
            .document
            .get_element_by_id(spec.slot.anchor_id())?
            .dyn_into()
            .ok()?;
        let context = canvas.get_context("2d").ok().flatten()?;
        let config = match to_js(&chart_config(spec)) {
            Ok(config) => config,
            Err(err) => {
                error!(slot = ?spec.slot, ?err, "chart config not converted");
                return None;
            }
        };

        match Chart::new(&context, &config) {
            Ok(chart) => Some(chart),
            Err(err) => {
                error!(slot = ?spec.slot, ?err, "chart not created");
                None
            }
        }
    }

    fn destroy_chart(&self, chart: Chart) {
        chart.destroy();
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.alert_with_message(message) {
                warn!(?err, message, "alert not shown");
            }
        }
    }
}
