//! Popup markup and the delegated click contract.
//!
//! Status buttons carry their target as data attributes. A single capturing
//! click listener on the document reads them back, so no global callback
//! has to be reachable from inside the popup.

use parajes_core::popup::{Popup, StatusAction};
use parajes_core::{FeatureId, Status};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

pub const ATTR_FEATURE_ID: &str = "data-feature-id";
pub const ATTR_STATUS: &str = "data-status";
/// Selector matching a status button or anything inside one.
pub const ACTION_SELECTOR: &str = "[data-status]";

/// JSON text of the id, `null` when the feature has none.
pub fn feature_id_attr(feature_id: Option<&FeatureId>) -> String {
    feature_id.map_or_else(|| "null".to_string(), |id| id.to_json().to_string())
}

/// Reads a clicked button back into an action. `None` when the status is
/// not one of the three known codes; an unreadable id becomes `None` inside
/// the action so the Status Editor can reject it.
pub fn parse_action(feature_id: Option<&str>, status: Option<&str>) -> Option<StatusAction> {
    let status = status?.trim().parse().ok().and_then(Status::from_code)?;
    let feature_id = feature_id
        .and_then(|text| serde_json::from_str(text).ok())
        .and_then(|value| FeatureId::from_value(&value));
    Some(StatusAction { feature_id, status })
}

pub fn read_action(element: &Element) -> Option<StatusAction> {
    parse_action(
        element.get_attribute(ATTR_FEATURE_ID).as_deref(),
        element.get_attribute(ATTR_STATUS).as_deref(),
    )
}

fn line_break(document: &Document, parent: &Element) -> Result<(), JsValue> {
    let br = document.create_element("br")?;
    parent.append_child(&br)?;
    Ok(())
}

pub fn render(document: &Document, popup: &Popup) -> Result<HtmlElement, JsValue> {
    let container = document.create_element("div")?;
    container.set_attribute("style", "max-width:260px;")?;

    for (key, value) in &popup.rows {
        let name = document.create_element("b")?;
        name.set_text_content(Some(key));
        container.append_child(&name)?;
        container.append_with_str_1(&format!(": {value}"))?;
        line_break(document, &container)?;
    }

    if let Some(review) = &popup.review {
        container.append_with_str_1(&format!("Estado actual: {}", review.current))?;
        line_break(document, &container)?;

        let actions = document.create_element("div")?;
        actions.set_attribute("style", "margin-top:8px;")?;
        for action in &review.actions {
            let button = document.create_element("button")?;
            button.set_attribute("type", "button")?;
            button.set_attribute(ATTR_FEATURE_ID, &feature_id_attr(action.feature_id.as_ref()))?;
            button.set_attribute(ATTR_STATUS, &action.status.code().to_string())?;
            button.set_text_content(Some(action.label()));
            actions.append_child(&button)?;
        }
        container.append_child(&actions)?;
    }

    container.dyn_into::<HtmlElement>().map_err(JsValue::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_attributes() {
        let numeric = FeatureId::from(0);
        let action = parse_action(Some(&feature_id_attr(Some(&numeric))), Some("3")).unwrap();
        assert_eq!(action.feature_id, Some(numeric));
        assert_eq!(action.status, Status::DoesNotCorrespond);

        let text = FeatureId::from("P-17");
        assert_eq!(feature_id_attr(Some(&text)), "\"P-17\"");
        assert_eq!(
            parse_action(Some("\"P-17\""), Some("1")).unwrap().feature_id,
            Some(text)
        );
    }

    #[test]
    fn missing_id_is_kept_for_the_editor_to_reject() {
        let action = parse_action(Some(&feature_id_attr(None)), Some("2")).unwrap();
        assert_eq!(action.feature_id, None);
        assert_eq!(action.status, Status::NotReviewed);
    }

    #[test]
    fn unknown_status_is_ignored() {
        assert!(parse_action(Some("42"), Some("9")).is_none());
        assert!(parse_action(Some("42"), None).is_none());
    }
}
