use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, HashMap};

use parajes_core::{ChartSlot, ChartSpec, RenderedFeature, SelectOption, Selector, View};
use tracing::debug;

/// Options of one selector list and which of them is committed.
#[derive(Debug, Default)]
pub struct SelectorState {
    pub options: Vec<SelectOption>,
    pub selected: Option<usize>,
}

impl SelectorState {
    pub fn value(&self) -> Option<&SelectOption> {
        self.selected.and_then(|index| self.options.get(index))
    }
}

/// Features of one layer as they are currently drawn.
#[derive(Debug)]
pub struct MapLayer {
    pub layer_id: String,
    pub features: Vec<RenderedFeature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OverlayHandle(u32);

/// Everything the terminal draws, written by the session through `View`
/// and read by the renderer each frame.
#[derive(Debug, Default)]
pub struct Screen {
    pub regions: SelectorState,
    pub layers: SelectorState,
    /// Keyed by handle, so iteration follows drawing order.
    pub map: BTreeMap<OverlayHandle, MapLayer>,
    pub charts: HashMap<ChartSlot, ChartSpec>,
    pub alert: Option<String>,
    pub popup_open: bool,
    next_handle: u32,
}

impl Screen {
    pub const fn selector(&self, selector: Selector) -> &SelectorState {
        match selector {
            Selector::Layer => &self.layers,
            Selector::Region => &self.regions,
        }
    }

    fn selector_mut(&mut self, selector: Selector) -> &mut SelectorState {
        match selector {
            Selector::Layer => &mut self.layers,
            Selector::Region => &mut self.regions,
        }
    }

    pub fn layer(&self, layer_id: &str) -> Option<&MapLayer> {
        self.map.values().find(|layer| layer.layer_id == layer_id)
    }

    /// Layer the operator is browsing: the committed layer selection.
    pub fn active_layer(&self) -> Option<&MapLayer> {
        self.layers
            .value()
            .and_then(|option| self.layer(&option.value))
    }

    pub fn feature(&self, index: usize) -> Option<&RenderedFeature> {
        self.active_layer()?.features.get(index)
    }
}

#[derive(Debug, Default)]
pub struct TerminalView {
    screen: RefCell<Screen>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Ref<'_, Screen> {
        self.screen.borrow()
    }

    pub fn screen_mut(&self) -> RefMut<'_, Screen> {
        self.screen.borrow_mut()
    }
}

impl View for TerminalView {
    type Overlay = OverlayHandle;
    type Chart = ChartSlot;

    fn populate(&self, selector: Selector, options: &[SelectOption]) -> bool {
        let mut screen = self.screen.borrow_mut();
        let state = screen.selector_mut(selector);
        state.options = options.to_vec();
        state.selected = (!options.is_empty()).then_some(0);
        true
    }

    fn selected(&self, selector: Selector) -> Option<String> {
        self.screen
            .borrow()
            .selector(selector)
            .value()
            .map(|option| option.value.clone())
    }

    fn select_index(&self, selector: Selector, index: usize) {
        let mut screen = self.screen.borrow_mut();
        let state = screen.selector_mut(selector);
        if index < state.options.len() {
            state.selected = Some(index);
        }
    }

    fn add_overlay(&self, layer_id: &str, features: &[RenderedFeature]) -> OverlayHandle {
        let mut screen = self.screen.borrow_mut();
        screen.next_handle += 1;
        let handle = OverlayHandle(screen.next_handle);
        screen.map.insert(
            handle,
            MapLayer {
                layer_id: layer_id.to_string(),
                features: features.to_vec(),
            },
        );
        handle
    }

    fn remove_overlay(&self, overlay: OverlayHandle) {
        self.screen.borrow_mut().map.remove(&overlay);
    }

    fn refresh_feature(&self, overlay: &OverlayHandle, index: usize, feature: &RenderedFeature) {
        let mut screen = self.screen.borrow_mut();
        if let Some(slot) = screen
            .map
            .get_mut(overlay)
            .and_then(|layer| layer.features.get_mut(index))
        {
            *slot = feature.clone();
        }
    }

    fn close_popup(&self) {
        self.screen.borrow_mut().popup_open = false;
    }

    fn mount_chart(&self, spec: &ChartSpec) -> Option<ChartSlot> {
        self.screen
            .borrow_mut()
            .charts
            .insert(spec.slot, spec.clone());
        Some(spec.slot)
    }

    fn destroy_chart(&self, chart: ChartSlot) {
        self.screen.borrow_mut().charts.remove(&chart);
    }

    fn alert(&self, message: &str) {
        debug!(message, "alert raised");
        self.screen.borrow_mut().alert = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parajes_core::geo::Feature;
    use parajes_core::{KpiEntry, Status};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn paraje(id: i64) -> RenderedFeature {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "properties": { "id": id, "id_estado": 2 },
            "geometry": { "type": "Point", "coordinates": [-60.4, -26.8] }
        }))
        .unwrap();
        RenderedFeature::new("pjes_censal_2022", feature, true)
    }

    #[test]
    fn populate_commits_the_first_option() {
        let view = TerminalView::new();
        assert_eq!(view.selected(Selector::Region), None);

        view.populate(
            Selector::Region,
            &[SelectOption::region_all(), SelectOption::region("San Fernando".into())],
        );
        assert_eq!(view.selected(Selector::Region).as_deref(), Some("todos"));

        view.select_index(Selector::Region, 1);
        assert_eq!(view.selected(Selector::Region).as_deref(), Some("San Fernando"));

        view.select_index(Selector::Region, 7);
        assert_eq!(view.selected(Selector::Region).as_deref(), Some("San Fernando"));
    }

    #[test]
    fn overlays_are_tracked_by_handle() {
        let view = TerminalView::new();
        let first = view.add_overlay("pjes_censal_2022", &[paraje(1), paraje(2)]);
        let second = view.add_overlay("dpto_chaco", &[]);
        assert_ne!(first, second);

        let mut edited = paraje(2);
        edited.apply_status(Status::DoesNotCorrespond);
        view.refresh_feature(&first, 1, &edited);
        view.refresh_feature(&first, 9, &edited);

        {
            let screen = view.screen();
            let layer = screen.layer("pjes_censal_2022").unwrap();
            assert_eq!(layer.features[1], edited);
            assert_eq!(layer.features[0], paraje(1));
        }

        view.remove_overlay(first);
        assert!(view.screen().layer("pjes_censal_2022").is_none());
        assert!(view.screen().layer("dpto_chaco").is_some());
    }

    #[test]
    fn charts_replace_per_slot() {
        let view = TerminalView::new();
        let spec = ChartSpec::for_group(
            ChartSlot::Status,
            &[KpiEntry {
                label: "Corresponde".into(),
                count: 3.0,
            }],
        );

        let slot = view.mount_chart(&spec).unwrap();
        assert_eq!(view.screen().charts.get(&slot), Some(&spec));

        view.destroy_chart(slot);
        assert!(view.screen().charts.is_empty());
    }

    #[test]
    fn close_popup_and_alert_touch_the_screen() {
        let view = TerminalView::new();
        view.screen_mut().popup_open = true;
        view.close_popup();
        view.alert("boom");

        let screen = view.screen();
        assert!(!screen.popup_open);
        assert_eq!(screen.alert.as_deref(), Some("boom"));
    }
}
