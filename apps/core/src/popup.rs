use serde_json::Value;

use crate::domain::{FeatureId, Status};
use crate::geo::Feature;

/// Structured popup content. Front ends render it however they like; the
/// status actions carry everything the Status Editor needs, so no global
/// callback has to be reachable from the rendered markup.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    /// `key: value` rows, one per property, in property order
    pub rows: Vec<(String, String)>,
    pub review: Option<ReviewPanel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewPanel {
    /// Current status as shown to the operator
    pub current: String,
    pub actions: Vec<StatusAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusAction {
    /// `None` when the feature has no usable id; dispatching it is rejected.
    pub feature_id: Option<FeatureId>,
    pub status: Status,
}

impl StatusAction {
    pub const fn label(&self) -> &'static str {
        self.status.label()
    }
}

impl Popup {
    pub fn for_feature(feature: &Feature, editable: bool) -> Self {
        let rows = feature
            .properties
            .iter()
            .map(|(key, value)| (key.clone(), display_value(value)))
            .collect();

        let review = editable.then(|| ReviewPanel {
            current: feature
                .status_value()
                .map_or_else(|| Status::NotReviewed.to_string(), display_value),
            actions: Status::ALL
                .iter()
                .map(|status| StatusAction {
                    feature_id: feature.id(),
                    status: *status,
                })
                .collect(),
        });

        Self { rows, review }
    }
}

/// Text shown for a property value.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
