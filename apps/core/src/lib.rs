// Shared session core for the Parajes dashboard front ends
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod geo;
pub mod kpi;
pub mod normalize;
pub mod popup;
pub mod session;
pub mod style;
pub mod view;

pub use api::{Backend, HttpReply};
pub use config::{DashboardConfig, MapConfig};
pub use domain::{FeatureId, LayerDescriptor, Region, Status};
pub use error::DashboardError;
pub use kpi::{ChartKind, ChartSlot, ChartSpec, KpiAggregate, KpiEntry};
pub use session::DashboardSession;
pub use view::{RenderedFeature, SelectOption, Selector, View};
