use log::debug;

use crate::api::{endpoints, FetchOutcome, FetchRequest, RequestKind, Ticket};
use crate::binder::{decode, stale, TabBinder};
use crate::chart::Rgb;
use crate::domain::TabId;
use crate::hex::{bin_features, padded_bounds, LazyHexIndexer};
use crate::records::HotspotCollection;
use crate::selector::RequestGate;
use crate::view::{MapLayer, MapView, Marker, TabView};

pub const DEFAULT_CENTER: (f64, f64) = (18.5204, 73.8567);
pub const NO_DATA: &str = "No hotspot data available";
const MIN_MARKER_RADIUS: f64 = 4.0;
const MAX_MARKER_RADIUS: f64 = 18.0;

pub fn marker_radius(count: Option<f64>) -> f64 {
    count
        .filter(|c| *c != 0.0)
        .unwrap_or(1.0)
        .clamp(MIN_MARKER_RADIUS, MAX_MARKER_RADIUS)
}

fn default_view() -> MapView {
    MapView {
        center: DEFAULT_CENTER,
        bounds: None,
        layer: MapLayer::Empty,
        overlay: None,
    }
}

fn center_of(((south, west), (north, east)): ((f64, f64), (f64, f64))) -> (f64, f64) {
    ((south + north) / 2.0, (west + east) / 2.0)
}

/// Job hotspots, drawn as hex bins or, without a hex grid, as markers.
pub struct HotspotBinder {
    indexer: LazyHexIndexer,
    gate: RequestGate,
    map: MapView,
    loading: bool,
}

impl HotspotBinder {
    pub fn new(resolution: u8) -> Self {
        Self {
            indexer: LazyHexIndexer::new(resolution),
            gate: RequestGate::default(),
            map: default_view(),
            loading: false,
        }
    }

    pub const fn map(&self) -> &MapView {
        &self.map
    }

    pub const fn indexer(&self) -> &LazyHexIndexer {
        &self.indexer
    }

    fn render(&mut self, collection: &HotspotCollection) {
        let located: Vec<_> = collection
            .features
            .iter()
            .filter(|feature| feature.position().is_some())
            .cloned()
            .collect();

        if located.is_empty() {
            self.map = MapView {
                overlay: Some(NO_DATA.to_string()),
                ..default_view()
            };
            return;
        }

        let (layer, bounds) = match self.indexer.get() {
            Some(grid) => {
                let bins = bin_features(&located, grid);
                let bounds = padded_bounds(bins.iter().flat_map(|bin| bin.boundary.iter().copied()));
                (MapLayer::Hexes(bins), bounds)
            }
            None => {
                let markers: Vec<Marker> = located
                    .iter()
                    .filter_map(|feature| {
                        let (lat, lng) = feature.position()?;
                        Some(Marker {
                            lat,
                            lng,
                            radius: marker_radius(feature.count),
                            color: Rgb::RED,
                        })
                    })
                    .collect();
                let bounds = padded_bounds(markers.iter().map(|m| (m.lat, m.lng)));
                (MapLayer::Markers(markers), bounds)
            }
        };

        self.map = MapView {
            center: bounds.map_or(DEFAULT_CENTER, center_of),
            bounds,
            layer,
            overlay: None,
        };
    }
}

impl TabBinder for HotspotBinder {
    fn tab(&self) -> TabId {
        TabId::Hotspots
    }

    fn initialize(&mut self) -> Vec<FetchRequest> {
        // first activation pays for the grid
        self.indexer.get();
        self.map = default_view();
        self.loading = true;
        let generation = self.gate.issue();
        vec![FetchRequest::get(
            Ticket::for_tab(TabId::Hotspots, RequestKind::Collection, generation),
            endpoints::HOTSPOTS,
        )]
    }

    fn on_response(&mut self, ticket: &Ticket, outcome: FetchOutcome) -> Vec<FetchRequest> {
        if !self.gate.is_current(ticket.generation) {
            stale(TabId::Hotspots, ticket, self.gate.current());
            return Vec::new();
        }
        self.loading = false;
        let collection = outcome
            .into_json()
            .map_err(|err| debug!("hotspots: fetch failed: {err}"))
            .ok()
            .and_then(|value| decode::<HotspotCollection>(TabId::Hotspots, "features", value))
            .unwrap_or_default();
        self.render(&collection);
        Vec::new()
    }

    fn view(&self) -> TabView<'_> {
        let mut view = TabView::new(TabId::Hotspots);
        view.loading = self.loading;
        view.map = Some(&self.map);
        view.notice = self.map.overlay.as_deref();
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use serde_json::json;

    fn answer(binder: &mut HotspotBinder, outcome: FetchOutcome) {
        let request = binder.initialize().remove(0);
        binder.on_response(&request.ticket, outcome);
    }

    #[test]
    fn empty_collection_shows_overlay_at_pune() {
        let mut binder = HotspotBinder::new(7);
        answer(&mut binder, FetchOutcome::Json(json!({"features": []})));
        assert_eq!(binder.map().overlay.as_deref(), Some(NO_DATA));
        assert_eq!(binder.map().center, DEFAULT_CENTER);
        assert_eq!(binder.map().layer, MapLayer::Empty);
    }

    #[test]
    fn failure_is_treated_as_empty() {
        let mut binder = HotspotBinder::new(7);
        answer(&mut binder, FetchOutcome::Failed(ApiError::Status(502)));
        assert_eq!(binder.view().notice, Some(NO_DATA));
    }

    #[test]
    fn features_become_hex_bins() {
        let mut binder = HotspotBinder::new(7);
        answer(
            &mut binder,
            FetchOutcome::Json(json!({"features": [
                {"label": "a", "lat": 18.52, "lng": 73.85, "count": 5},
                {"label": "b", "lat": 18.60, "lng": 73.75, "count": 1}
            ]})),
        );
        let MapLayer::Hexes(bins) = &binder.map().layer else {
            panic!("expected hex bins, got {:?}", binder.map().layer);
        };
        assert_eq!(bins.len(), 2);
        let ((south, west), (north, east)) = binder.map().bounds.unwrap();
        assert!(south < 18.52 && north > 18.60);
        assert!(west < 73.75 && east > 73.85);
    }

    #[test]
    fn broken_grid_falls_back_to_clamped_markers() {
        let mut binder = HotspotBinder::new(99);
        answer(
            &mut binder,
            FetchOutcome::Json(json!({"features": [
                {"lat": 18.52, "lng": 73.85, "count": 40},
                {"lat": 18.53, "lng": 73.86}
            ]})),
        );
        answer(&mut binder, FetchOutcome::Json(json!({"features": [{"lat": 1, "lng": 2, "count": 2}]})));
        let MapLayer::Markers(markers) = &binder.map().layer else {
            panic!("expected markers");
        };
        assert!((markers[0].radius - 4.0).abs() < f64::EPSILON);
        assert_eq!(binder.indexer().load_attempts(), 1);
        assert!((marker_radius(Some(40.0)) - 18.0).abs() < f64::EPSILON);
    }
}
