use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::DashboardConfig;
use crate::domain::Region;
use crate::error::DashboardError;

pub const LAYERS_PATH: &str = "/api/capas";
pub const REGIONS_PATH: &str = "/api/departamentos";
pub const STATUS_PATH: &str = "/api/estado";
pub const KPIS_PATH: &str = "/api/kpis";

/// Raw answer of the API, before any status or shape checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// Turns a non-2xx answer into [`DashboardError::Http`].
    pub fn into_success(self) -> Result<Self, DashboardError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(DashboardError::Http {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DashboardError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Transport to the dashboard API.
///
/// Paths are absolute API paths (`/api/...`) with any query already
/// encoded; implementations prefix their own base URL. Only transport
/// failures are errors, every HTTP status comes back as a reply.
#[async_trait(?Send)]
pub trait Backend {
    async fn get(&self, path: &str) -> Result<HttpReply, DashboardError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<HttpReply, DashboardError>;
}

fn with_region(path: String, param: &str, region: &Region) -> String {
    match region.filter() {
        Some(name) => format!("{path}?{param}={}", urlencoding::encode(name)),
        None => path,
    }
}

/// Path of a layer. Only the editable layer is filtered per region.
pub fn layer_path(config: &DashboardConfig, layer_id: &str, region: &Region) -> String {
    let path = format!("/api/{layer_id}");
    if config.is_editable(layer_id) {
        with_region(path, &config.region_param, region)
    } else {
        path
    }
}

pub fn kpis_path(config: &DashboardConfig, region: &Region) -> String {
    with_region(KPIS_PATH.to_string(), &config.region_param, region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_region_never_reaches_the_query() {
        let config = DashboardConfig::default();

        assert_eq!(
            layer_path(&config, "pjes_censal_2022", &Region::All),
            "/api/pjes_censal_2022"
        );
        assert_eq!(kpis_path(&config, &Region::parse("todos")), "/api/kpis");
    }

    #[test]
    fn named_region_is_url_encoded() {
        let config = DashboardConfig::default();
        let region = Region::parse("Comandante Fernández");

        assert_eq!(
            layer_path(&config, "pjes_censal_2022", &region),
            "/api/pjes_censal_2022?depto=Comandante%20Fern%C3%A1ndez"
        );
        assert_eq!(
            kpis_path(&config, &region),
            "/api/kpis?depto=Comandante%20Fern%C3%A1ndez"
        );
    }

    #[test]
    fn other_layers_ignore_the_region() {
        let config = DashboardConfig::default();
        assert_eq!(
            layer_path(&config, "dpto_chaco", &Region::parse("Bermejo")),
            "/api/dpto_chaco"
        );
    }

    #[test]
    fn reply_status_classes() {
        assert!(HttpReply::new(204, "").is_success());
        assert!(!HttpReply::new(500, "boom").is_success());

        let err = HttpReply::new(500, "boom").into_success().unwrap_err();
        assert!(err.is_http());
        assert_eq!(err.to_string(), "server answered 500: boom");
    }
}
