mod chartjs;
mod dom;
mod events;
mod http;
mod leaflet;
mod popup;

use std::rc::Rc;

use parajes_core::{DashboardConfig, DashboardSession, Selector};
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use dom::DomView;
use http::FetchBackend;

/// Inline JSON block that may override the defaults.
const CONFIG_ANCHOR: &str = "dashboard-config";

fn load_config(document: &Document) -> DashboardConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ANCHOR)
        .and_then(|element| element.text_content())
        .filter(|text| !text.trim().is_empty())
    else {
        return DashboardConfig::default();
    };

    DashboardConfig::from_json(&text).unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unreadable #dashboard-config");
        DashboardConfig::default()
    })
}

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };

    let config = load_config(&document);
    info!(api = %config.api_base, editable = %config.editable_layer, "starting dashboard");

    let view = DomView::new(document.clone(), &config.map);
    let backend = FetchBackend::new(&config.api_base);
    let session = Rc::new(DashboardSession::new(config, backend, view));

    events::listen_selector(&document, Selector::Region, &session);
    events::listen_selector(&document, Selector::Layer, &session);
    events::listen_status_actions(&document, &session);

    spawn_local(async move {
        session.bootstrap().await;
    });
}
