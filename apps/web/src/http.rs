use async_trait::async_trait;
use parajes_core::{Backend, DashboardError, HttpReply};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// `fetch`-based transport.
#[derive(Debug, Clone)]
pub struct FetchBackend {
    base: String,
}

impl FetchBackend {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpReply, DashboardError> {
        let window =
            web_sys::window().ok_or_else(|| DashboardError::Transport("no window".into()))?;

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(if self.base.is_empty() {
            RequestMode::SameOrigin
        } else {
            RequestMode::Cors
        });
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let url = format!("{}{path}", self.base);
        let request = Request::new_with_str_and_init(&url, &opts).map_err(transport)?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(transport)?;
        }

        let response_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?;
        let response: Response = response_value.dyn_into().map_err(transport)?;
        let text = JsFuture::from(response.text().map_err(transport)?)
            .await
            .map_err(transport)?;

        Ok(HttpReply::new(
            response.status(),
            text.as_string().unwrap_or_default(),
        ))
    }
}

fn transport(value: JsValue) -> DashboardError {
    DashboardError::Transport(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

#[async_trait(?Send)]
impl Backend for FetchBackend {
    async fn get(&self, path: &str) -> Result<HttpReply, DashboardError> {
        self.send("GET", path, None).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<HttpReply, DashboardError> {
        self.send("POST", path, Some(body.to_string())).await
    }
}
