use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::Status;
use crate::style::NEUTRAL_COLOR;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiEntry {
    pub label: String,
    #[serde(serialize_with = "serialize_count")]
    pub count: f64,
}

/// Counts arrive as integers but may be parsed from strings with a fraction.
/// Whole values serialize as integers so reports print `17`, not `17.0`.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub fn serialize_count<S: Serializer>(count: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if count.fract() == 0.0 && count.abs() <= MAX_EXACT {
        serializer.serialize_i64(*count as i64)
    } else {
        serializer.serialize_f64(*count)
    }
}

/// Aggregate counts for one region, rebuilt from scratch on every fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiAggregate {
    pub by_status: Vec<KpiEntry>,
    pub by_municipality: Vec<KpiEntry>,
    pub by_department: Vec<KpiEntry>,
}

/// Where each group lives in the payload and how its rows are labelled.
struct GroupShape {
    fields: [&'static str; 2],
    label_field: &'static str,
    fallback_label: &'static str,
}

const STATUS_GROUP: GroupShape = GroupShape {
    fields: ["total_por_estado", "estados"],
    label_field: "estado",
    fallback_label: "No Asignado",
};

const MUNICIPALITY_GROUP: GroupShape = GroupShape {
    fields: ["por_municipio", "municipios"],
    label_field: "municipio",
    fallback_label: "Sin Municipio",
};

const DEPARTMENT_GROUP: GroupShape = GroupShape {
    fields: ["por_departamento", "departamentos"],
    label_field: "departamento",
    fallback_label: "Sin Departamento",
};

impl KpiAggregate {
    /// Extracts the three groups, accepting both naming conventions and
    /// rows given as objects or as bare `[label, count]` pairs. Anything
    /// unreadable becomes an empty group or a default row.
    pub fn from_json(payload: &Value) -> Self {
        let Some(fields) = payload.as_object() else {
            return Self::default();
        };

        Self {
            by_status: extract_group(fields, &STATUS_GROUP),
            by_municipality: extract_group(fields, &MUNICIPALITY_GROUP),
            by_department: extract_group(fields, &DEPARTMENT_GROUP),
        }
    }

    pub fn group(&self, slot: ChartSlot) -> &[KpiEntry] {
        match slot {
            ChartSlot::Status => &self.by_status,
            ChartSlot::Municipality => &self.by_municipality,
            ChartSlot::Department => &self.by_department,
        }
    }

    pub fn chart_specs(&self) -> Vec<ChartSpec> {
        ChartSlot::ALL
            .iter()
            .map(|slot| ChartSpec::for_group(*slot, self.group(*slot)))
            .collect()
    }
}

fn extract_group(fields: &Map<String, Value>, shape: &GroupShape) -> Vec<KpiEntry> {
    let rows = shape
        .fields
        .iter()
        .filter_map(|field| fields.get(*field))
        .find(|value| !value.is_null());

    match rows {
        Some(Value::Array(rows)) => rows.iter().map(|row| entry(row, shape)).collect(),
        _ => Vec::new(),
    }
}

fn entry(row: &Value, shape: &GroupShape) -> KpiEntry {
    let named = |field: &str| row.get(field).filter(|value| !value.is_null());
    let positional = |index: usize| {
        row.as_array()
            .and_then(|pair| pair.get(index))
            .filter(|value| !value.is_null())
    };

    let label = named(shape.label_field)
        .or_else(|| named("label"))
        .or_else(|| positional(0))
        .map_or_else(|| shape.fallback_label.to_string(), label_text);

    let count = named("cantidad")
        .or_else(|| named("value"))
        .or_else(|| positional(1))
        .map_or(0.0, count_value);

    KpiEntry { label, count }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn count_value(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSlot {
    Status,
    Municipality,
    Department,
}

impl ChartSlot {
    pub const ALL: [Self; 3] = [Self::Status, Self::Municipality, Self::Department];

    /// DOM id of the canvas the chart mounts on.
    pub const fn anchor_id(self) -> &'static str {
        match self {
            Self::Status => "kpiEstado",
            Self::Municipality => "kpiMunicipio",
            Self::Department => "kpiDepartamento",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Status => "Parajes por estado",
            Self::Municipality => "Parajes por municipio",
            Self::Department => "Parajes por departamento",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Bar,
}

/// Everything a chart surface needs to draw one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub slot: ChartSlot,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Per-slice colors; empty means the surface's default palette.
    pub colors: Vec<String>,
    pub dataset_label: Option<&'static str>,
}

impl ChartSpec {
    pub fn for_group(slot: ChartSlot, entries: &[KpiEntry]) -> Self {
        let labels: Vec<String> = entries.iter().map(|entry| entry.label.clone()).collect();
        let values = entries.iter().map(|entry| entry.count).collect();

        match slot {
            ChartSlot::Status => Self {
                slot,
                kind: ChartKind::Doughnut,
                colors: labels
                    .iter()
                    .map(|label| status_slice_color(label).to_string())
                    .collect(),
                labels,
                values,
                dataset_label: None,
            },
            ChartSlot::Municipality | ChartSlot::Department => Self {
                slot,
                kind: ChartKind::Bar,
                labels,
                values,
                colors: Vec::new(),
                dataset_label: Some("Parajes"),
            },
        }
    }
}

/// Slice color for a status label. Only the label text is consulted.
pub fn status_slice_color(label: &str) -> &'static str {
    Status::parse(label).map_or(NEUTRAL_COLOR, Status::color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn entry(label: &str, count: f64) -> KpiEntry {
        KpiEntry {
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn server_field_names_are_read() {
        let aggregate = KpiAggregate::from_json(&json!({
            "total_por_estado": [{"estado": "Corresponde", "cantidad": 10}],
            "por_municipio": [{"municipio": "Resistencia", "cantidad": 4}],
            "por_departamento": [{"departamento": "San Fernando", "cantidad": 6}]
        }));

        assert_eq!(aggregate.by_status, vec![entry("Corresponde", 10.0)]);
        assert_eq!(aggregate.by_municipality, vec![entry("Resistencia", 4.0)]);
        assert_eq!(aggregate.by_department, vec![entry("San Fernando", 6.0)]);
    }

    #[test]
    fn alternate_names_and_pairs_are_tolerated() {
        let aggregate = KpiAggregate::from_json(&json!({
            "estados": [["No Revisado", 3], {"label": "Corresponde", "value": "5"}],
            "municipios": [[null, null]],
            "departamentos": [{}]
        }));

        assert_eq!(
            aggregate.by_status,
            vec![entry("No Revisado", 3.0), entry("Corresponde", 5.0)]
        );
        assert_eq!(aggregate.by_municipality, vec![entry("Sin Municipio", 0.0)]);
        assert_eq!(aggregate.by_department, vec![entry("Sin Departamento", 0.0)]);
    }

    #[test]
    fn null_primary_field_falls_back_to_alternate() {
        let aggregate = KpiAggregate::from_json(&json!({
            "total_por_estado": null,
            "estados": [{"estado": "No Corresponde", "cantidad": 1}]
        }));
        assert_eq!(aggregate.by_status, vec![entry("No Corresponde", 1.0)]);
    }

    #[test]
    fn unreadable_payloads_give_empty_groups() {
        assert_eq!(KpiAggregate::from_json(&json!([1, 2])), KpiAggregate::default());
        assert_eq!(
            KpiAggregate::from_json(&json!({"total_por_estado": "oops"})),
            KpiAggregate::default()
        );
    }

    #[test]
    fn whole_counts_serialize_as_integers() {
        let value = serde_json::to_value(KpiAggregate {
            by_status: vec![entry("Corresponde", 17.0), entry("No Revisado", 2.5)],
            ..KpiAggregate::default()
        })
        .unwrap();

        assert_eq!(value["by_status"][0]["count"], json!(17));
        assert!(value["by_status"][0]["count"].is_i64());
        assert_eq!(value["by_status"][1]["count"], json!(2.5));
        assert_eq!(serde_json::to_string(&entry("x", 0.0)).unwrap(), r#"{"label":"x","count":0}"#);
    }

    #[test]
    fn status_chart_colors_come_from_label_text() {
        assert_eq!(status_slice_color("  No Revisado "), Status::NotReviewed.color());
        assert_eq!(status_slice_color("CORRESPONDE"), Status::Corresponds.color());
        assert_eq!(status_slice_color("2"), NEUTRAL_COLOR);

        let spec = ChartSpec::for_group(
            ChartSlot::Status,
            &[entry(" no revisado", 2.0), entry("Otro", 1.0)],
        );
        assert_eq!(spec.kind, ChartKind::Doughnut);
        assert_eq!(
            spec.colors,
            vec![Status::NotReviewed.color().to_string(), NEUTRAL_COLOR.to_string()]
        );
    }

    #[test]
    fn bar_charts_use_default_palette() {
        let aggregate = KpiAggregate {
            by_municipality: vec![entry("Resistencia", 4.0)],
            ..KpiAggregate::default()
        };
        let specs = aggregate.chart_specs();

        assert_eq!(specs.len(), 3);
        assert_eq!(specs[1].slot, ChartSlot::Municipality);
        assert_eq!(specs[1].kind, ChartKind::Bar);
        assert_eq!(specs[1].dataset_label, Some("Parajes"));
        assert!(specs[1].colors.is_empty());
        assert_eq!(specs[1].values, vec![4.0]);
    }
}
