use thiserror::Error;

/// Failures raised while talking to the dashboard API.
///
/// None of these cross a component boundary: every session operation logs
/// the error and degrades instead of returning it.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server answered {status}: {body}")]
    Http { status: u16, body: String },

    #[error("unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("feature collection has no feature list")]
    MissingFeatures,
}

impl DashboardError {
    pub const fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }
}
