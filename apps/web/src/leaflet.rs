// Bindings to the global `L` object of Leaflet. Only what the dashboard uses.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = js_sys::Object)]
    #[derive(Debug, Clone)]
    pub type Map;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    pub fn map(container_id: &str) -> Map;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &Map, center: &JsValue, zoom: f64) -> Map;

    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &Map, layer: &Layer) -> Map;

    #[wasm_bindgen(method, js_name = closePopup)]
    pub fn close_popup(this: &Map) -> Map;

    #[wasm_bindgen(extends = js_sys::Object)]
    #[derive(Debug, Clone)]
    pub type Layer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn tile_layer(url_template: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = geoJSON)]
    pub fn geo_json(data: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = featureGroup)]
    pub fn feature_group() -> Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Layer, map: &Map) -> Layer;

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &Layer, layer: &Layer) -> Layer;

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn bind_popup(this: &Layer, content: &web_sys::HtmlElement) -> Layer;

    /// On a GeoJSON group this restyles every child that supports it.
    #[wasm_bindgen(method, js_name = setStyle)]
    pub fn set_style(this: &Layer, style: &JsValue) -> Layer;
}

/// A `pointToLayer` option drawing every point as a circle marker with
/// the given path options.
pub fn circle_marker_factory(style: &JsValue) -> Result<JsValue, JsValue> {
    let factory = js_sys::Function::new_with_args(
        "style",
        "return function (feature, latlng) { return L.circleMarker(latlng, style); };",
    );
    factory.call1(&JsValue::NULL, style)
}
