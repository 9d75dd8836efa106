//! Boundary adapters for list-shaped responses.
//!
//! The list endpoints have drifted between a bare array and an object
//! wrapping one. Everything here accepts any decoded JSON value and degrades
//! to an empty list instead of failing.

use serde_json::{Map, Value};

use crate::domain::LayerDescriptor;

/// The shapes a list endpoint may answer with.
#[derive(Debug, Clone, PartialEq)]
pub enum ListResponse {
    Bare(Vec<Value>),
    Keyed(Map<String, Value>),
    Other(Value),
}

impl From<Value> for ListResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Bare(items),
            Value::Object(fields) => Self::Keyed(fields),
            other => Self::Other(other),
        }
    }
}

impl ListResponse {
    /// Entries of the layer list: a bare array, else the `capas` array, else
    /// the first array-valued field in document order.
    pub fn entries(&self) -> &[Value] {
        match self {
            Self::Bare(items) => items,
            Self::Keyed(fields) => fields
                .get("capas")
                .and_then(Value::as_array)
                .or_else(|| fields.values().find_map(Value::as_array))
                .map_or(&[][..], Vec::as_slice),
            Self::Other(_) => &[],
        }
    }

    /// Entries of the region list: the `departamentos` field when present,
    /// else a bare array. A present but non-array `departamentos` yields
    /// nothing.
    pub fn region_entries(&self) -> &[Value] {
        match self {
            Self::Bare(items) => items,
            Self::Keyed(fields) => match fields.get("departamentos") {
                Some(Value::Array(items)) => items,
                _ => &[],
            },
            Self::Other(_) => &[],
        }
    }

    pub fn layer_descriptors(&self) -> Vec<LayerDescriptor> {
        self.entries().iter().map(LayerDescriptor::from_entry).collect()
    }

    /// Region names in server order. Numbers are kept as text; anything
    /// else is dropped.
    pub fn region_names(&self) -> Vec<String> {
        self.region_entries()
            .iter()
            .filter_map(|entry| match entry {
                Value::String(name) => Some(name.clone()),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            })
            .collect()
    }
}

/// Normalizes any decoded value into its list entries.
pub fn list_entries(value: Value) -> Vec<Value> {
    match ListResponse::from(value) {
        ListResponse::Bare(items) => items,
        keyed => keyed.entries().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn bare_array_is_returned_as_is() {
        assert_eq!(list_entries(json!(["a", "b"])), vec![json!("a"), json!("b")]);
    }

    #[test]
    fn capas_field_wins_over_other_arrays() {
        let value = json!({"otros": [1], "capas": [{"id": "dpto_chaco"}]});
        assert_eq!(list_entries(value), vec![json!({"id": "dpto_chaco"})]);
    }

    #[test]
    fn first_array_field_is_the_fallback() {
        let value = json!({"total": 2, "items": ["x"], "more": ["y"]});
        assert_eq!(list_entries(value), vec![json!("x")]);
    }

    #[test]
    fn non_array_shapes_degrade_to_empty() {
        assert!(list_entries(json!({"detail": "boom"})).is_empty());
        assert!(list_entries(json!("capas")).is_empty());
        assert!(list_entries(json!(null)).is_empty());
        assert!(list_entries(json!({})).is_empty());
    }

    #[test]
    fn capas_that_is_not_an_array_falls_through() {
        let value = json!({"capas": "none", "lista": ["dpto_chaco"]});
        assert_eq!(list_entries(value), vec![json!("dpto_chaco")]);
    }

    #[test]
    fn region_names_from_both_shapes() {
        let wrapped = ListResponse::from(json!({"departamentos": ["Almirante Brown", "Bermejo"]}));
        assert_eq!(wrapped.region_names(), vec!["Almirante Brown", "Bermejo"]);

        let bare = ListResponse::from(json!(["Chacabuco", 12, null]));
        assert_eq!(bare.region_names(), vec!["Chacabuco", "12"]);

        let broken = ListResponse::from(json!({"departamentos": "Bermejo", "x": ["y"]}));
        assert!(broken.region_names().is_empty());
    }

    #[test]
    fn layer_descriptors_follow_entries() {
        let response = ListResponse::from(json!({
            "capas": [
                {"id": "pjes_censal_2022", "nombre": "Parajes Censales"},
                "dpto_chaco"
            ]
        }));
        let ids: Vec<_> = response
            .layer_descriptors()
            .into_iter()
            .map(|layer| (layer.id, layer.label))
            .collect();

        assert_eq!(
            ids,
            vec![
                ("pjes_censal_2022".to_string(), "Parajes Censales".to_string()),
                ("dpto_chaco".to_string(), "dpto_chaco".to_string()),
            ]
        );
    }
}
