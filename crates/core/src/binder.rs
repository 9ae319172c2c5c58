//! The fetch, populate, render cycle every data tab shares.
//!
//! A [`TabSpec`] supplies what differs per tab (endpoint, row extraction,
//! table cells, charts, the optional store picker). [`Binder`] runs the
//! cycle around it and owns the tab's selectors, charts and request gate.

use log::{debug, warn};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;

use crate::api::{self, FetchOutcome, FetchRequest, RequestKind, Ticket};
use crate::chart::ChartBoard;
use crate::collection::CityKeyed;
use crate::domain::TabId;
use crate::selector::{RequestGate, Selector};
use crate::view::{Chip, SelectorView, TabView, TableView};

// Board for tabs that draw no charts.
static NO_CHARTS: ChartBoard = ChartBoard::new();

/// Object-safe face of a tab, as the dashboard sees it.
pub trait TabBinder {
    fn tab(&self) -> TabId;

    /// Starts (or restarts) the tab from scratch.
    fn initialize(&mut self) -> Vec<FetchRequest>;

    fn on_response(&mut self, ticket: &Ticket, outcome: FetchOutcome) -> Vec<FetchRequest>;

    fn select_primary(&mut self, _key: &str) -> Vec<FetchRequest> {
        Vec::new()
    }

    fn cycle_primary(&mut self, _delta: isize) -> Vec<FetchRequest> {
        Vec::new()
    }

    fn select_secondary(&mut self, _index: usize) -> Vec<FetchRequest> {
        Vec::new()
    }

    fn cycle_secondary(&mut self, _delta: isize) -> Vec<FetchRequest> {
        Vec::new()
    }

    /// Numbered tab action (probe buttons, rebuild).
    fn trigger(&mut self, _action: usize) -> Vec<FetchRequest> {
        Vec::new()
    }

    /// Releases the chart handles the tab owns.
    fn teardown(&mut self) {}

    fn charts(&self) -> &ChartBoard {
        &NO_CHARTS
    }

    fn view(&self) -> TabView<'_>;
}

pub trait TabSpec {
    /// Per-city payload as the API returns it.
    type Entry: DeserializeOwned;
    type Row;

    fn tab(&self) -> TabId;

    fn collection_path(&self) -> &'static str;

    fn slice_path(&self, city: &str) -> String {
        api::with_query(self.collection_path(), "city", city)
    }

    /// The collection endpoint only contributes city names; rows come from
    /// `slice_path`.
    fn keys_only(&self) -> bool {
        false
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row];

    fn table(&self) -> TableView;

    fn table_row(&self, row: &Self::Row) -> Vec<String>;

    fn draw_charts(&self, rows: &[Self::Row], board: &mut ChartBoard);

    fn secondary_title(&self) -> Option<&'static str> {
        None
    }

    fn secondary_keys(&self, _rows: &[Self::Row]) -> Option<Vec<String>> {
        None
    }

    /// Chips (and any detail chart) for the current rows and store pick.
    fn detail(&self, _rows: &[Self::Row], _selected: Option<usize>, _board: &mut ChartBoard) -> Vec<Chip> {
        Vec::new()
    }
}

/// Deserializes a payload, logging and giving up on a shape mismatch.
pub(crate) fn decode<T: DeserializeOwned>(tab: TabId, what: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!("{}: could not decode {what}: {err}", tab.as_str());
            None
        }
    }
}

/// Keys in received order plus the cities whose value decodes. A city with
/// a malformed value keeps its place in the key list but has no rows.
pub(crate) fn decode_cities<T: DeserializeOwned>(
    tab: TabId,
    what: &str,
    value: Value,
) -> (Vec<String>, CityKeyed<T>) {
    let Some(raw) = decode::<CityKeyed<Value>>(tab, what, value) else {
        return (Vec::new(), CityKeyed::new());
    };
    let keys = raw.key_list();
    let decoded = raw
        .into_entries()
        .into_iter()
        .filter_map(|(city, value)| match serde_json::from_value(value) {
            Ok(entry) => Some((city, entry)),
            Err(err) => {
                warn!("{}: could not decode {what} for {city}: {err}", tab.as_str());
                None
            }
        });
    (keys, CityKeyed::from_entries(decoded))
}

pub(crate) fn stale(tab: TabId, ticket: &Ticket, current: u64) {
    debug!(
        "{}: dropping stale {:?} response (generation {} < {current})",
        tab.as_str(),
        ticket.kind,
        ticket.generation
    );
}

pub struct Binder<S: TabSpec> {
    spec: S,
    cache: CityKeyed<S::Entry>,
    cities: Selector,
    stores: Selector,
    gate: RequestGate,
    table: TableView,
    chips: Vec<Chip>,
    charts: ChartBoard,
    loading: bool,
}

impl<S: TabSpec> Binder<S> {
    pub fn new(spec: S) -> Self {
        let table = spec.table();
        Self {
            spec,
            cache: CityKeyed::new(),
            cities: Selector::new(),
            stores: Selector::new(),
            gate: RequestGate::default(),
            table,
            chips: Vec::new(),
            charts: ChartBoard::new(),
            loading: false,
        }
    }

    pub const fn cities(&self) -> &Selector {
        &self.cities
    }

    pub const fn stores(&self) -> &Selector {
        &self.stores
    }

    pub const fn table_view(&self) -> &TableView {
        &self.table
    }

    /// Renders the selected city from what is cached, then asks for the
    /// city-scoped slice.
    fn update(&mut self) -> Vec<FetchRequest> {
        self.render(false);
        let Some(city) = self.cities.selected_key().map(str::to_string) else {
            return Vec::new();
        };
        let generation = self.gate.issue();
        self.loading = true;
        let path = self.spec.slice_path(&city);
        vec![FetchRequest::get(
            Ticket::for_tab(self.spec.tab(), RequestKind::Slice { city }, generation),
            path,
        )]
    }

    fn render(&mut self, keep_secondary: bool) {
        let Self {
            spec,
            cache,
            cities,
            stores,
            table,
            chips,
            charts,
            ..
        } = self;

        let rows: &[S::Row] = cities
            .selected_key()
            .and_then(|city| cache.get(city))
            .map(|entry| spec.rows(entry))
            .unwrap_or_default();

        table.rows = rows.iter().map(|row| spec.table_row(row)).collect();
        spec.draw_charts(rows, charts);

        let previous = keep_secondary
            .then(|| stores.selected_key().map(str::to_string))
            .flatten();
        match spec.secondary_keys(rows) {
            Some(keys) => stores.populate(keys),
            None => stores.clear(),
        }
        if let Some(previous) = previous {
            stores.select(&previous);
        }
        *chips = spec.detail(rows, stores.selected_index(), charts);
    }

    fn redraw_detail(&mut self) {
        let Self {
            spec,
            cache,
            cities,
            stores,
            chips,
            charts,
            ..
        } = self;
        let rows: &[S::Row] = cities
            .selected_key()
            .and_then(|city| cache.get(city))
            .map(|entry| spec.rows(entry))
            .unwrap_or_default();
        *chips = spec.detail(rows, stores.selected_index(), charts);
    }

    fn on_collection(&mut self, outcome: FetchOutcome) -> Vec<FetchRequest> {
        let tab = self.spec.tab();
        let value = match outcome.into_json() {
            Ok(value) => value,
            Err(err) => {
                debug!("{}: collection fetch failed: {err}", tab.as_str());
                return Vec::new();
            }
        };

        let keys = if self.spec.keys_only() {
            self.cache = CityKeyed::new();
            decode::<CityKeyed<IgnoredAny>>(tab, "city list", value)
                .map(|keyed| keyed.key_list())
                .unwrap_or_default()
        } else {
            let (keys, cache) = decode_cities(tab, "collection", value);
            self.cache = cache;
            keys
        };

        self.cities.populate(keys);
        self.update()
    }

    fn on_slice(&mut self, city: &str, outcome: FetchOutcome) {
        let tab = self.spec.tab();
        let entry = outcome
            .into_json()
            .map_err(|err| debug!("{}: slice for {city} failed: {err}", tab.as_str()))
            .ok()
            .and_then(|value| decode_cities::<S::Entry>(tab, "city slice", value).1.remove(city));

        match entry {
            Some(entry) => self.cache.insert(city.to_string(), entry),
            None => {
                self.cache.remove(city);
            }
        }
        self.render(true);
    }
}

impl<S: TabSpec> TabBinder for Binder<S> {
    fn tab(&self) -> TabId {
        self.spec.tab()
    }

    fn initialize(&mut self) -> Vec<FetchRequest> {
        let generation = self.gate.issue();
        self.loading = true;
        vec![FetchRequest::get(
            Ticket::for_tab(self.spec.tab(), RequestKind::Collection, generation),
            self.spec.collection_path(),
        )]
    }

    fn on_response(&mut self, ticket: &Ticket, outcome: FetchOutcome) -> Vec<FetchRequest> {
        if !self.gate.is_current(ticket.generation) {
            stale(self.spec.tab(), ticket, self.gate.current());
            return Vec::new();
        }
        self.loading = false;
        match &ticket.kind {
            RequestKind::Collection => self.on_collection(outcome),
            RequestKind::Slice { city } => {
                self.on_slice(city, outcome);
                Vec::new()
            }
            other => {
                debug!("{}: ignoring {other:?} response", self.spec.tab().as_str());
                Vec::new()
            }
        }
    }

    fn select_primary(&mut self, key: &str) -> Vec<FetchRequest> {
        if self.cities.select(key) {
            self.update()
        } else {
            Vec::new()
        }
    }

    fn cycle_primary(&mut self, delta: isize) -> Vec<FetchRequest> {
        if self.cities.cycle(delta).is_some() {
            self.update()
        } else {
            Vec::new()
        }
    }

    fn select_secondary(&mut self, index: usize) -> Vec<FetchRequest> {
        if self.stores.select_index(index) {
            self.redraw_detail();
        }
        Vec::new()
    }

    fn cycle_secondary(&mut self, delta: isize) -> Vec<FetchRequest> {
        if self.stores.cycle(delta).is_some() {
            self.redraw_detail();
        }
        Vec::new()
    }

    fn teardown(&mut self) {
        self.charts.dispose_all();
    }

    fn charts(&self) -> &ChartBoard {
        &self.charts
    }

    fn view(&self) -> TabView<'_> {
        let mut view = TabView::new(self.spec.tab());
        view.loading = self.loading;
        view.primary = Some(SelectorView::of("City", &self.cities));
        view.secondary = self
            .spec
            .secondary_title()
            .map(|title| SelectorView::of(title, &self.stores));
        view.chips = &self.chips;
        view.tables = vec![&self.table];
        view.charts = self.charts.handles().iter().collect();
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, ChartOptions, Rgb, Series};
    use crate::error::ApiError;
    use crate::format;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Score {
        store: String,
        score: Option<f64>,
    }

    struct Scores {
        keys_only: bool,
    }

    impl TabSpec for Scores {
        type Entry = Vec<Score>;
        type Row = Score;

        fn tab(&self) -> TabId {
            TabId::Demand
        }

        fn collection_path(&self) -> &'static str {
            "/scores"
        }

        fn keys_only(&self) -> bool {
            self.keys_only
        }

        fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
            entry
        }

        fn table(&self) -> TableView {
            TableView::new("Scores", vec!["Store", "Score"])
        }

        fn table_row(&self, row: &Self::Row) -> Vec<String> {
            vec![row.store.clone(), format::number(row.score)]
        }

        fn draw_charts(&self, rows: &[Self::Row], board: &mut ChartBoard) {
            board.draw(
                "scores",
                ChartKind::VerticalBar,
                rows.iter().map(|r| r.store.clone()).collect(),
                vec![Series::new("Score", rows.iter().map(|r| r.score), Rgb::EMERALD)],
                ChartOptions::default(),
            );
        }

        fn secondary_title(&self) -> Option<&'static str> {
            Some("Store")
        }

        fn secondary_keys(&self, rows: &[Self::Row]) -> Option<Vec<String>> {
            Some(rows.iter().map(|r| r.store.clone()).collect())
        }

        fn detail(&self, rows: &[Self::Row], selected: Option<usize>, _board: &mut ChartBoard) -> Vec<Chip> {
            selected
                .and_then(|index| rows.get(index))
                .map(|row| vec![Chip::new("Store", row.store.clone())])
                .unwrap_or_default()
        }
    }

    fn single(requests: Vec<FetchRequest>) -> FetchRequest {
        assert_eq!(requests.len(), 1, "expected one request, got {requests:?}");
        requests.into_iter().next().unwrap()
    }

    #[test]
    fn collection_populates_then_requests_first_city() {
        let mut binder = Binder::new(Scores { keys_only: false });
        let collection = single(binder.initialize());
        assert_eq!(collection.path, "/scores");

        let slice = single(binder.on_response(
            &collection.ticket,
            FetchOutcome::Json(json!({"Pune": [{"store": "A", "score": 80}], "Agra": []})),
        ));
        assert_eq!(binder.cities().options(), ["Pune", "Agra"]);
        assert_eq!(slice.path, "/scores?city=Pune");
        // rendered from the cached collection before the slice lands
        assert_eq!(binder.table_view().rows, vec![vec!["A".to_string(), "80".to_string()]]);
        assert_eq!(binder.stores().selected_key(), Some("A"));
    }

    #[test]
    fn failed_collection_leaves_previous_render() {
        let mut binder = Binder::new(Scores { keys_only: false });
        let first = single(binder.initialize());
        binder.on_response(
            &first.ticket,
            FetchOutcome::Json(json!({"Pune": [{"store": "A", "score": 1}]})),
        );

        let again = single(binder.initialize());
        let follow_up = binder.on_response(&again.ticket, FetchOutcome::Failed(ApiError::Status(500)));
        assert!(follow_up.is_empty());
        assert_eq!(binder.cities().options(), ["Pune"]);
        assert_eq!(binder.table_view().rows.len(), 1);
    }

    #[test]
    fn malformed_city_keeps_its_place_in_the_selector() {
        let mut binder = Binder::new(Scores { keys_only: false });
        let collection = single(binder.initialize());
        let slice = single(binder.on_response(
            &collection.ticket,
            FetchOutcome::Json(json!({
                "Pune": null,
                "Mumbai": [{"store": "B", "score": 40}],
                "Agra": [7]
            })),
        ));
        assert_eq!(binder.cities().options(), ["Pune", "Mumbai", "Agra"]);
        assert_eq!(slice.path, "/scores?city=Pune");
        assert!(binder.table_view().rows.is_empty());

        binder.select_primary("Mumbai");
        assert_eq!(binder.table_view().rows, vec![vec!["B".to_string(), "40".to_string()]]);
    }

    #[test]
    fn slice_decodes_only_the_requested_city() {
        let mut binder = Binder::new(Scores { keys_only: false });
        let collection = single(binder.initialize());
        let slice = single(binder.on_response(
            &collection.ticket,
            FetchOutcome::Json(json!({"Pune": []})),
        ));
        binder.on_response(
            &slice.ticket,
            FetchOutcome::Json(json!({"Pune": [{"store": "A", "score": 5}], "Agra": "oops"})),
        );
        assert_eq!(binder.table_view().rows, vec![vec!["A".to_string(), "5".to_string()]]);
    }

    #[test]
    fn stale_slice_is_dropped() {
        let mut binder = Binder::new(Scores { keys_only: false });
        let collection = single(binder.initialize());
        let pune = single(binder.on_response(
            &collection.ticket,
            FetchOutcome::Json(json!({"Pune": [], "Agra": []})),
        ));
        let agra = single(binder.select_primary("Agra"));

        binder.on_response(&agra.ticket, FetchOutcome::Json(json!({"Agra": [{"store": "Z"}]})));
        binder.on_response(&pune.ticket, FetchOutcome::Json(json!({"Pune": [{"store": "P"}]})));

        assert_eq!(binder.table_view().rows, vec![vec!["Z".to_string(), format::PLACEHOLDER.to_string()]]);
    }

    #[test]
    fn keys_only_renders_after_slice() {
        let mut binder = Binder::new(Scores { keys_only: true });
        let collection = single(binder.initialize());
        let slice = single(binder.on_response(
            &collection.ticket,
            FetchOutcome::Json(json!({"Pune": [{"store": "ignored"}]})),
        ));
        assert!(binder.table_view().rows.is_empty());

        binder.on_response(
            &slice.ticket,
            FetchOutcome::Json(json!({"Pune": [{"store": "S1", "score": 3}, {"store": "S2"}]})),
        );
        assert_eq!(binder.table_view().rows.len(), 2);

        binder.select_secondary(1);
        assert_eq!(binder.view().chips[0].value, "S2");
    }

    #[test]
    fn failed_slice_renders_empty() {
        let mut binder = Binder::new(Scores { keys_only: false });
        let collection = single(binder.initialize());
        let slice = single(binder.on_response(
            &collection.ticket,
            FetchOutcome::Json(json!({"Pune": [{"store": "A"}]})),
        ));
        binder.on_response(
            &slice.ticket,
            FetchOutcome::Failed(ApiError::Transport("reset".to_string())),
        );
        assert!(binder.table_view().rows.is_empty());
        assert_eq!(binder.charts().live(), 1);

        binder.teardown();
        assert_eq!(binder.charts().live(), 0);
    }
}
