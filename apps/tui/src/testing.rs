//! In-memory `Backend` shared by the console's tests.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use parajes_core::{Backend, DashboardConfig, DashboardError, DashboardSession, HttpReply};
use serde_json::{json, Value};

use crate::view::TerminalView;

#[derive(Default)]
pub struct StubBackend {
    replies: RefCell<HashMap<String, HttpReply>>,
    pub requests: RefCell<Vec<(String, Option<Value>)>>,
}

impl StubBackend {
    pub fn reply(&self, path: &str, status: u16, body: &Value) {
        self.replies
            .borrow_mut()
            .insert(path.to_string(), HttpReply::new(status, body.to_string()));
    }

    pub fn requests_to(&self, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|(requested, _)| requested == path)
            .count()
    }

    pub fn posted(&self) -> Vec<Value> {
        self.requests
            .borrow()
            .iter()
            .filter_map(|(_, body)| body.clone())
            .collect()
    }

    fn answer(&self, path: &str, body: Option<Value>) -> HttpReply {
        self.requests.borrow_mut().push((path.to_string(), body));
        self.replies
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_else(|| HttpReply::new(404, "not found"))
    }
}

#[async_trait(?Send)]
impl Backend for StubBackend {
    async fn get(&self, path: &str) -> Result<HttpReply, DashboardError> {
        Ok(self.answer(path, None))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<HttpReply, DashboardError> {
        Ok(self.answer(path, Some(body.clone())))
    }
}

/// A backend answering like a small census server: two regions, two layers
/// (the editable one first) and two parajes.
pub fn census_backend() -> StubBackend {
    let backend = StubBackend::default();
    backend.reply(
        "/api/departamentos",
        200,
        &json!({ "departamentos": ["San Fernando", "Libertad"] }),
    );
    backend.reply(
        "/api/capas",
        200,
        &json!({ "capas": [
            { "id": "pjes_censal_2022", "nombre": "Parajes" },
            { "id": "dpto_chaco", "nombre": "Departamentos" }
        ]}),
    );
    let parajes = json!({ "type": "FeatureCollection", "features": [
        { "type": "Feature", "properties": { "id": 41, "nombre": "El Palmar", "id_estado": 2 },
          "geometry": { "type": "Point", "coordinates": [-60.1, -27.2] } },
        { "type": "Feature", "properties": { "id": 42, "nombre": "La Leonesa", "id_estado": 2 },
          "geometry": { "type": "Point", "coordinates": [-58.7, -27.0] } }
    ]});
    backend.reply("/api/pjes_censal_2022", 200, &parajes);
    backend.reply("/api/pjes_censal_2022?depto=San%20Fernando", 200, &parajes);
    backend.reply(
        "/api/dpto_chaco",
        200,
        &json!({ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "nombre": "San Fernando" },
              "geometry": { "type": "Polygon", "coordinates": [[
                  [-59.5, -27.6], [-58.6, -27.6], [-58.6, -26.9], [-59.5, -27.6]
              ]] } }
        ]}),
    );
    let kpis = json!({
        "total_por_estado": [
            { "estado": "Corresponde", "cantidad": 5 },
            { "estado": "No Revisado", "cantidad": 12 }
        ],
        "por_municipio": [{ "municipio": "Resistencia", "cantidad": 9 }],
        "por_departamento": [{ "departamento": "San Fernando", "cantidad": 17 }]
    });
    backend.reply("/api/kpis", 200, &kpis);
    backend.reply("/api/kpis?depto=San%20Fernando", 200, &kpis);
    backend.reply("/api/estado", 200, &json!({ "ok": true }));
    backend
}

pub fn session(backend: StubBackend) -> DashboardSession<StubBackend, TerminalView> {
    DashboardSession::new(DashboardConfig::default(), backend, TerminalView::new())
}
