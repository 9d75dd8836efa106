use parajes_core::{ChartKind, ChartSpec};
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type Chart;

    #[wasm_bindgen(constructor, catch)]
    pub fn new(context: &JsValue, config: &JsValue) -> Result<Chart, JsValue>;

    #[wasm_bindgen(method)]
    pub fn destroy(this: &Chart);
}

/// Chart.js configuration for one KPI slot.
pub fn chart_config(spec: &ChartSpec) -> Value {
    match spec.kind {
        ChartKind::Doughnut => json!({
            "type": "doughnut",
            "data": {
                "labels": spec.labels,
                "datasets": [{ "data": spec.values, "backgroundColor": spec.colors }]
            },
            "options": {
                "responsive": true,
                "plugins": { "legend": { "position": "bottom" } }
            }
        }),
        ChartKind::Bar => {
            let mut dataset = json!({ "data": spec.values });
            if let Some(label) = spec.dataset_label {
                dataset["label"] = json!(label);
            }
            if !spec.colors.is_empty() {
                dataset["backgroundColor"] = json!(spec.colors);
            }
            json!({
                "type": "bar",
                "data": { "labels": spec.labels, "datasets": [dataset] },
                "options": {
                    "responsive": true,
                    "plugins": { "legend": { "display": false } },
                    "scales": { "y": { "beginAtZero": true } }
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parajes_core::{ChartSlot, KpiEntry};
    use pretty_assertions::assert_eq;

    #[test]
    fn status_doughnut_carries_label_colors() {
        let spec = ChartSpec::for_group(
            ChartSlot::Status,
            &[KpiEntry {
                label: "No Revisado".into(),
                count: 7.0,
            }],
        );

        assert_eq!(
            chart_config(&spec),
            json!({
                "type": "doughnut",
                "data": {
                    "labels": ["No Revisado"],
                    "datasets": [{ "data": [7.0], "backgroundColor": ["#eeff07f5"] }]
                },
                "options": {
                    "responsive": true,
                    "plugins": { "legend": { "position": "bottom" } }
                }
            })
        );
    }

    #[test]
    fn bar_charts_hide_legend_and_start_at_zero() {
        let spec = ChartSpec::for_group(
            ChartSlot::Department,
            &[KpiEntry {
                label: "Bermejo".into(),
                count: 2.0,
            }],
        );
        let config = chart_config(&spec);

        assert_eq!(config["type"], "bar");
        assert_eq!(config["data"]["datasets"][0]["label"], "Parajes");
        assert_eq!(config["options"]["plugins"]["legend"]["display"], false);
        assert_eq!(config["options"]["scales"]["y"]["beginAtZero"], true);
        assert!(config["data"]["datasets"][0].get("backgroundColor").is_none());
    }
}
