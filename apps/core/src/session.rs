//! The dashboard session: one value owning every piece of shared state.
//!
//! All operations take `&self` and run on a single thread. Mutable state
//! sits in `RefCell`s that are only borrowed between awaits, so a response
//! arriving for one operation can never observe another half-applied.
//! Overlapping loads are not ordered against each other: whichever response
//! lands last is what stays on screen.

use std::cell::RefCell;
use std::collections::HashMap;
use std::iter;

use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::api::{self, Backend, LAYERS_PATH, REGIONS_PATH, STATUS_PATH};
use crate::config::DashboardConfig;
use crate::domain::{FeatureId, Region, Status};
use crate::error::DashboardError;
use crate::geo::{Feature, FeatureCollection};
use crate::kpi::{ChartSlot, ChartSpec, KpiAggregate};
use crate::normalize::ListResponse;
use crate::view::{RenderedFeature, SelectOption, Selector, View};

pub const INVALID_ID_ALERT: &str = "ID inválido para cambio de estado";
pub const UPDATE_FAILED_ALERT: &str = "Error actualizando estado. Mirá la consola.";

/// A layer's live overlay together with the per-feature state it was drawn
/// from.
#[derive(Debug)]
pub struct RenderedOverlay<O> {
    pub layer_id: String,
    pub features: Vec<RenderedFeature>,
    handle: O,
}

impl<O> RenderedOverlay<O> {
    pub const fn handle(&self) -> &O {
        &self.handle
    }
}

pub struct DashboardSession<B, V: View> {
    config: DashboardConfig,
    backend: B,
    view: V,
    overlays: RefCell<HashMap<String, RenderedOverlay<V::Overlay>>>,
    charts: RefCell<HashMap<ChartSlot, V::Chart>>,
}

impl<B: Backend, V: View> DashboardSession<B, V> {
    pub fn new(config: DashboardConfig, backend: B, view: V) -> Self {
        Self {
            config,
            backend,
            view,
            overlays: RefCell::new(HashMap::new()),
            charts: RefCell::new(HashMap::new()),
        }
    }

    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    /// Region currently chosen in the region selector.
    pub fn current_region(&self) -> Region {
        self.view
            .selected(Selector::Region)
            .map_or(Region::All, |value| Region::parse(&value))
    }

    pub fn current_layer(&self) -> Option<String> {
        self.view
            .selected(Selector::Layer)
            .filter(|value| !value.is_empty())
    }

    pub fn overlay_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.overlays.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn with_overlay<R>(
        &self,
        layer_id: &str,
        f: impl FnOnce(&RenderedOverlay<V::Overlay>) -> R,
    ) -> Option<R> {
        self.overlays.borrow().get(layer_id).map(f)
    }

    pub fn has_chart(&self, slot: ChartSlot) -> bool {
        self.charts.borrow().contains_key(&slot)
    }

    /// Initial load: regions, then layers (which loads the first one), then
    /// the unfiltered KPIs.
    pub async fn bootstrap(&self) {
        info!("bootstrapping dashboard session");
        self.load_regions().await;
        self.load_layers().await;
        self.load_kpis(&Region::All).await;
    }

    async fn fetch_json(&self, path: &str) -> Result<Value, DashboardError> {
        self.backend.get(path).await?.into_success()?.json()
    }

    /// Fills the region selector. The sentinel goes in before the request,
    /// so a failed fetch still leaves "all regions" selectable.
    pub async fn load_regions(&self) {
        let sentinel = SelectOption::region_all();
        if !self
            .view
            .populate(Selector::Region, std::slice::from_ref(&sentinel))
        {
            error!(anchor = Selector::Region.anchor_id(), "region selector not found");
            return;
        }

        let names = match self.fetch_json(REGIONS_PATH).await {
            Ok(payload) => ListResponse::from(payload).region_names(),
            Err(err) if err.is_http() => {
                warn!(path = REGIONS_PATH, error = %err, "region list unavailable");
                return;
            }
            Err(err) => {
                error!(path = REGIONS_PATH, error = %err, "region list failed");
                return;
            }
        };

        debug!(count = names.len(), "regions loaded");
        let options: Vec<SelectOption> = iter::once(sentinel)
            .chain(names.into_iter().map(SelectOption::region))
            .collect();
        self.view.populate(Selector::Region, &options);
    }

    /// Fills the layer selector and loads the first layer, if any.
    pub async fn load_layers(&self) {
        let layers = match self.fetch_json(LAYERS_PATH).await {
            Ok(payload) => ListResponse::from(payload).layer_descriptors(),
            Err(err) => {
                error!(path = LAYERS_PATH, error = %err, "layer list failed");
                return;
            }
        };

        let options: Vec<SelectOption> = layers.iter().map(SelectOption::from).collect();
        if !self.view.populate(Selector::Layer, &options) {
            error!(anchor = Selector::Layer.anchor_id(), "layer selector not found");
            return;
        }

        let Some(first) = options.first() else {
            info!("server offered no layers");
            return;
        };
        self.view.select_index(Selector::Layer, 0);
        let region = self.current_region();
        self.load_layer(&first.value, &region).await;
    }

    /// Region selector changed: reload the active layer and the KPIs.
    pub async fn on_region_changed(&self) {
        let region = self.current_region();
        debug!(%region, "region changed");
        if let Some(layer_id) = self.current_layer() {
            self.load_layer(&layer_id, &region).await;
        }
        self.load_kpis(&region).await;
    }

    /// Layer selector changed: drop the deselected overlays and load the
    /// new layer for the current region.
    pub async fn on_layer_changed(&self) {
        let Some(layer_id) = self.current_layer() else {
            return;
        };
        debug!(layer = %layer_id, "layer changed");

        let stale: Vec<String> = self
            .overlays
            .borrow()
            .keys()
            .filter(|id| **id != layer_id)
            .cloned()
            .collect();
        for id in stale {
            self.remove_overlay(&id);
        }

        let region = self.current_region();
        self.load_layer(&layer_id, &region).await;
    }

    fn remove_overlay(&self, layer_id: &str) {
        let removed = self.overlays.borrow_mut().remove(layer_id);
        if let Some(overlay) = removed {
            debug!(layer = layer_id, "overlay removed");
            self.view.remove_overlay(overlay.handle);
        }
    }

    async fn fetch_features(&self, path: &str) -> Result<Vec<Feature>, DashboardError> {
        let reply = self.backend.get(path).await?.into_success()?;
        let collection: FeatureCollection = reply.json()?;
        collection.features.ok_or(DashboardError::MissingFeatures)
    }

    /// Fetches one layer and swaps its overlay. Any failure removes the
    /// overlay instead of leaving stale features on the map.
    pub async fn load_layer(&self, layer_id: &str, region: &Region) {
        let path = api::layer_path(&self.config, layer_id, region);
        let features = match self.fetch_features(&path).await {
            Ok(features) => features,
            Err(err) => {
                error!(layer = layer_id, %path, error = %err, "layer load failed");
                self.remove_overlay(layer_id);
                return;
            }
        };

        self.remove_overlay(layer_id);

        let editable = self.config.is_editable(layer_id);
        let rendered: Vec<RenderedFeature> = features
            .into_iter()
            .map(|feature| RenderedFeature::new(layer_id, feature, editable))
            .collect();
        let handle = self.view.add_overlay(layer_id, &rendered);
        info!(layer = layer_id, features = rendered.len(), "overlay rendered");

        self.overlays.borrow_mut().insert(
            layer_id.to_string(),
            RenderedOverlay {
                layer_id: layer_id.to_string(),
                features: rendered,
                handle,
            },
        );

        if editable {
            self.load_kpis(region).await;
        }
    }

    /// Persists a review status and patches the drawn feature in place.
    pub async fn set_status(&self, feature_id: Option<FeatureId>, status: Status) {
        let Some(feature_id) = feature_id else {
            warn!(%status, "status change without a feature id");
            self.view.alert(INVALID_ID_ALERT);
            return;
        };

        let body = json!({ "id": feature_id.to_json(), "estado": status.code() });
        let result = match self.backend.post_json(STATUS_PATH, &body).await {
            Ok(reply) => reply.into_success().map(|_| ()),
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            error!(id = %feature_id, %status, error = %err, "status update failed");
            self.view.alert(UPDATE_FAILED_ALERT);
            return;
        }

        let patched = self.patch_status(&feature_id, status);
        info!(id = %feature_id, %status, patched, "status updated");

        self.view.close_popup();
        let region = self.current_region();
        self.load_kpis(&region).await;
    }

    /// Rewrites the status of every drawn feature with this id on the
    /// editable overlay. Returns how many were touched.
    fn patch_status(&self, feature_id: &FeatureId, status: Status) -> usize {
        let mut overlays = self.overlays.borrow_mut();
        let Some(overlay) = overlays.get_mut(&self.config.editable_layer) else {
            debug!(layer = %self.config.editable_layer, "editable overlay not loaded");
            return 0;
        };

        let mut patched = 0;
        for (index, rendered) in overlay.features.iter_mut().enumerate() {
            if rendered.feature.has_id(feature_id) {
                rendered.apply_status(status);
                self.view.refresh_feature(&overlay.handle, index, rendered);
                patched += 1;
            }
        }
        patched
    }

    /// Fetches aggregate counts for a region without drawing them.
    pub async fn fetch_kpis(&self, region: &Region) -> Result<KpiAggregate, DashboardError> {
        let path = api::kpis_path(&self.config, region);
        let payload = self.fetch_json(&path).await?;
        Ok(KpiAggregate::from_json(&payload))
    }

    /// Fetches KPIs and redraws the three charts. On failure the previous
    /// charts stay up.
    pub async fn load_kpis(&self, region: &Region) {
        let aggregate = match self.fetch_kpis(region).await {
            Ok(aggregate) => aggregate,
            Err(err) => {
                error!(%region, error = %err, "KPI load failed");
                return;
            }
        };

        for spec in aggregate.chart_specs() {
            self.redraw_chart(&spec);
        }
    }

    fn redraw_chart(&self, spec: &ChartSpec) {
        let previous = self.charts.borrow_mut().remove(&spec.slot);
        if let Some(chart) = previous {
            self.view.destroy_chart(chart);
        }

        match self.view.mount_chart(spec) {
            Some(chart) => {
                self.charts.borrow_mut().insert(spec.slot, chart);
            }
            None => warn!(anchor = spec.slot.anchor_id(), "chart surface not found"),
        }
    }
}
