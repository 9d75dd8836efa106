use std::rc::Rc;

use parajes_core::{DashboardSession, Selector};
use tracing::{error, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event};

use crate::dom::DomView;
use crate::http::FetchBackend;
use crate::popup;

pub type WebSession = DashboardSession<FetchBackend, DomView>;

/// Registers the `change` listener of one selector. Called once per page,
/// never per reload.
pub fn listen_selector(document: &Document, selector: Selector, session: &Rc<WebSession>) {
    let Some(element) = document.get_element_by_id(selector.anchor_id()) else {
        error!(anchor = selector.anchor_id(), "selector not found, changes ignored");
        return;
    };

    let session = Rc::clone(session);
    let handler = Closure::<dyn FnMut()>::new(move || {
        let session = Rc::clone(&session);
        spawn_local(async move {
            match selector {
                Selector::Layer => session.on_layer_changed().await,
                Selector::Region => session.on_region_changed().await,
            }
        });
    });

    if let Err(err) =
        element.add_event_listener_with_callback("change", handler.as_ref().unchecked_ref())
    {
        error!(?err, anchor = selector.anchor_id(), "change listener not registered");
    }
    handler.forget();
}

/// One capturing click listener for every status button of every popup.
/// Capturing on the document sees the click before Leaflet stops it from
/// bubbling out of the popup.
pub fn listen_status_actions(document: &Document, session: &Rc<WebSession>) {
    let session = Rc::clone(session);
    let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(button) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|element| element.closest(popup::ACTION_SELECTOR).ok().flatten())
        else {
            return;
        };

        let Some(action) = popup::read_action(&button) else {
            warn!("status button without a readable status");
            return;
        };
        event.prevent_default();

        let session = Rc::clone(&session);
        spawn_local(async move {
            session.set_status(action.feature_id, action.status).await;
        });
    });

    if let Err(err) = document.add_event_listener_with_callback_and_bool(
        "click",
        handler.as_ref().unchecked_ref(),
        true,
    ) {
        error!(?err, "status action listener not registered");
    }
    handler.forget();
}
