use geojson::{Geometry, Value as GeometryValue};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::{FeatureId, Status};

pub type Properties = Map<String, Value>;

/// Property names holding the review status, in lookup order.
pub const STATUS_FIELDS: [&str; 2] = ["id_estado", "estado"];
/// Property names holding the feature identifier, in lookup order.
pub const ID_FIELDS: [&str; 2] = ["id", "ID"];

/// A layer response. `features` is missing or `null` when the server had
/// nothing to aggregate, which callers treat as a failed load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
    /// `None` for null geometries and for ones `geojson` rejects, such as
    /// the `"coordinates": []` PostGIS emits for empty shapes. Such features
    /// keep their properties but draw nothing.
    #[serde(default, deserialize_with = "lenient_geometry")]
    pub geometry: Option<Geometry>,
}

fn lenient_geometry<'de, D>(deserializer: D) -> Result<Option<Geometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value::<Geometry>(raw) {
        Ok(geometry) => Ok(Some(geometry)),
        Err(err) => {
            warn!(error = %err, "skipping unreadable geometry");
            Ok(None)
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

impl Feature {
    pub fn new(properties: Properties, geometry: Option<Geometry>) -> Self {
        Self {
            properties,
            geometry,
        }
    }

    fn first_present(&self, fields: &[&str]) -> Option<&Value> {
        fields
            .iter()
            .filter_map(|field| self.properties.get(*field))
            .find(|value| !value.is_null())
    }

    pub fn id(&self) -> Option<FeatureId> {
        self.first_present(&ID_FIELDS).and_then(FeatureId::from_value)
    }

    pub fn has_id(&self, id: &FeatureId) -> bool {
        self.id().is_some_and(|own| own.loosely_eq(id))
    }

    /// The raw status value, if the feature carries one.
    pub fn status_value(&self) -> Option<&Value> {
        self.first_present(&STATUS_FIELDS)
    }

    pub fn status(&self) -> Option<Status> {
        self.status_value().and_then(Status::from_value)
    }

    /// Writes the status into `id_estado` when that key exists, otherwise
    /// into `estado`.
    pub fn set_status(&mut self, status: Status) {
        let field = if self.properties.contains_key(STATUS_FIELDS[0]) {
            STATUS_FIELDS[0]
        } else {
            STATUS_FIELDS[1]
        };
        self.properties
            .insert(field.to_string(), Value::from(status.code()));
    }

    pub fn is_point(&self) -> bool {
        matches!(
            self.geometry.as_ref().map(|geometry| &geometry.value),
            Some(GeometryValue::Point(_) | GeometryValue::MultiPoint(_))
        )
    }

    /// Every vertex of the geometry as (longitude, latitude).
    pub fn positions(&self) -> Vec<(f64, f64)> {
        let mut out = Vec::new();
        if let Some(geometry) = &self.geometry {
            collect_positions(&geometry.value, &mut out);
        }
        out
    }

    /// Outlines as separate rings or lines of (longitude, latitude).
    pub fn paths(&self) -> Vec<Vec<(f64, f64)>> {
        let mut out = Vec::new();
        if let Some(geometry) = &self.geometry {
            collect_paths(&geometry.value, &mut out);
        }
        out
    }

    /// GeoJSON `Feature` object for renderers that take raw GeoJSON.
    pub fn to_geojson(&self) -> Value {
        serde_json::json!({
            "type": "Feature",
            "properties": self.properties,
            "geometry": self.geometry,
        })
    }
}

fn position(coords: &[f64]) -> Option<(f64, f64)> {
    match coords {
        [lon, lat, ..] => Some((*lon, *lat)),
        _ => None,
    }
}

fn line(coords: &[Vec<f64>]) -> Vec<(f64, f64)> {
    coords.iter().filter_map(|pos| position(pos)).collect()
}

fn collect_positions(value: &GeometryValue, out: &mut Vec<(f64, f64)>) {
    match value {
        GeometryValue::Point(pos) => out.extend(position(pos)),
        GeometryValue::MultiPoint(points) | GeometryValue::LineString(points) => {
            out.extend(line(points));
        }
        GeometryValue::MultiLineString(lines) | GeometryValue::Polygon(lines) => {
            out.extend(lines.iter().flat_map(|points| line(points)));
        }
        GeometryValue::MultiPolygon(polygons) => {
            out.extend(
                polygons
                    .iter()
                    .flatten()
                    .flat_map(|points| line(points)),
            );
        }
        GeometryValue::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_positions(&geometry.value, out);
            }
        }
    }
}

fn collect_paths(value: &GeometryValue, out: &mut Vec<Vec<(f64, f64)>>) {
    match value {
        GeometryValue::Point(_) | GeometryValue::MultiPoint(_) => {}
        GeometryValue::LineString(points) => out.push(line(points)),
        GeometryValue::MultiLineString(lines) | GeometryValue::Polygon(lines) => {
            out.extend(lines.iter().map(|points| line(points)));
        }
        GeometryValue::MultiPolygon(polygons) => {
            out.extend(polygons.iter().flatten().map(|points| line(points)));
        }
        GeometryValue::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_paths(&geometry.value, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(value: Value) -> Feature {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn collection_without_features_decodes_to_none() {
        let missing: FeatureCollection = serde_json::from_value(json!({"type": "FeatureCollection"})).unwrap();
        let null: FeatureCollection =
            serde_json::from_value(json!({"type": "FeatureCollection", "features": null})).unwrap();

        assert!(missing.features.is_none());
        assert!(null.features.is_none());
    }

    #[test]
    fn null_properties_become_empty() {
        let parsed = feature(json!({"type": "Feature", "properties": null, "geometry": null}));
        assert!(parsed.properties.is_empty());
        assert!(parsed.geometry.is_none());
    }

    #[test]
    fn empty_coordinates_drop_only_that_geometry() {
        let collection: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"id": 1}, "geometry": {"type": "Point", "coordinates": []}},
                {"properties": {"id": 2}, "geometry": {"type": "Point", "coordinates": [-60.5, -26.1]}}
            ]
        }))
        .unwrap();
        let features = collection.features.unwrap();

        assert_eq!(features.len(), 2);
        assert!(features[0].geometry.is_none());
        assert!(features[0].positions().is_empty());
        assert_eq!(features[0].id(), Some(FeatureId::from(1)));
        assert_eq!(features[1].positions(), vec![(-60.5, -26.1)]);
    }

    #[test]
    fn id_falls_back_to_upper_case_field() {
        let parsed = feature(json!({"properties": {"id": null, "ID": 7}}));
        assert_eq!(parsed.id(), Some(FeatureId::from(7)));
        assert!(parsed.has_id(&FeatureId::from("7")));
    }

    #[test]
    fn set_status_prefers_existing_id_estado() {
        let mut with_id_estado = feature(json!({"properties": {"id": 1, "id_estado": null}}));
        with_id_estado.set_status(Status::DoesNotCorrespond);
        assert_eq!(with_id_estado.properties.get("id_estado"), Some(&json!(3)));
        assert!(!with_id_estado.properties.contains_key("estado"));

        let mut plain = feature(json!({"properties": {"id": 2}}));
        plain.set_status(Status::Corresponds);
        assert_eq!(plain.properties.get("estado"), Some(&json!(1)));
        assert_eq!(plain.status(), Some(Status::Corresponds));
    }

    #[test]
    fn point_positions_and_polygon_paths() {
        let point = feature(json!({
            "properties": {},
            "geometry": {"type": "Point", "coordinates": [-60.5, -26.1]}
        }));
        assert!(point.is_point());
        assert_eq!(point.positions(), vec![(-60.5, -26.1)]);
        assert!(point.paths().is_empty());

        let polygon = feature(json!({
            "properties": {},
            "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
        }));
        assert!(!polygon.is_point());
        assert_eq!(polygon.paths().len(), 1);
        assert_eq!(polygon.positions().len(), 4);
    }
}
