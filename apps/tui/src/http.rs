use async_trait::async_trait;
use parajes_core::{Backend, DashboardError, HttpReply};
use serde_json::Value;

/// reqwest transport for the dashboard API.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    base: String,
}

impl ReqwestBackend {
    pub fn new(base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn read(response: reqwest::Response) -> Result<HttpReply, DashboardError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        Ok(HttpReply::new(status, body))
    }
}

#[allow(clippy::needless_pass_by_value)]
fn transport(err: reqwest::Error) -> DashboardError {
    DashboardError::Transport(err.to_string())
}

#[async_trait(?Send)]
impl Backend for ReqwestBackend {
    async fn get(&self, path: &str) -> Result<HttpReply, DashboardError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(transport)?;
        Self::read(response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<HttpReply, DashboardError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        Self::read(response).await
    }
}
