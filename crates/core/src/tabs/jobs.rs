use chrono::{DateTime, NaiveDateTime};
use log::debug;

use crate::api::{endpoints, segment, with_query, FetchOutcome, FetchRequest, RequestKind, Ticket};
use crate::binder::{decode, stale, TabBinder};
use crate::chart::{ChartBoard, ChartKind, ChartOptions, Rgb, Series};
use crate::domain::TabId;
use crate::format;
use crate::records::{Job, StoreRef, StoreSummary};
use crate::selector::{RequestGate, Selector};
use crate::view::{Chip, SelectorView, TabView, TableView};

use super::label;

const ZONE_CHART: &str = "jobs-zones";
const UNKNOWN_ZONE: &str = "NA";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn summary_path(store: &str) -> String {
    format!("/stores/{}/summary", segment(store))
}

/// Renders an API timestamp as `YYYY-MM-DD HH:MM`, leaving anything
/// unparseable as it came.
pub fn display_time(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(TIME_FORMAT).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(raw, pattern).ok())
        .map_or_else(|| raw.to_string(), |parsed| parsed.format(TIME_FORMAT).to_string())
}

/// Job counts per zone, zones in first-seen order.
pub fn zone_counts(jobs: &[Job]) -> Vec<(String, f64)> {
    let mut counts: Vec<(String, f64)> = Vec::new();
    for job in jobs {
        let zone = job.zone.as_deref().unwrap_or(UNKNOWN_ZONE);
        match counts.iter_mut().find(|(name, _)| name == zone) {
            Some((_, count)) => *count += 1.0,
            None => counts.push((zone.to_string(), 1.0)),
        }
    }
    counts
}

/// Recent jobs with a per-zone histogram, plus a store summary picker.
pub struct JobsBinder {
    limit: u32,
    gate: RequestGate,
    summary_gate: RequestGate,
    stores: Selector,
    jobs: TableView,
    chips: Vec<Chip>,
    charts: ChartBoard,
    loading: bool,
}

impl JobsBinder {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            gate: RequestGate::default(),
            summary_gate: RequestGate::default(),
            stores: Selector::new(),
            jobs: TableView::new(
                "Recent jobs",
                vec!["ID", "External ID", "Time", "Energy kWh", "Price USD", "Zone"],
            ),
            chips: Vec::new(),
            charts: ChartBoard::new(),
            loading: false,
        }
    }

    fn request_summary(&mut self) -> Vec<FetchRequest> {
        let Some(store) = self.stores.selected_key().map(str::to_string) else {
            self.chips.clear();
            return Vec::new();
        };
        let generation = self.summary_gate.issue();
        let path = summary_path(&store);
        vec![FetchRequest::get(
            Ticket::for_tab(TabId::Jobs, RequestKind::Summary { store }, generation),
            path,
        )]
    }

    fn on_jobs(&mut self, outcome: FetchOutcome) {
        let jobs = outcome
            .into_json()
            .map_err(|err| debug!("jobs: fetch failed: {err}"))
            .ok()
            .and_then(|value| decode::<Vec<Job>>(TabId::Jobs, "jobs", value))
            .unwrap_or_default();

        self.jobs.rows = jobs
            .iter()
            .map(|job| {
                vec![
                    label(job.id.as_ref()),
                    label(job.external_job_id.as_ref()),
                    job.timestamp
                        .as_deref()
                        .map_or_else(|| format::PLACEHOLDER.to_string(), display_time),
                    format::fixed(job.energy_kwh, 2),
                    format::fixed(job.price_usd, 2),
                    label(job.zone.as_ref()),
                ]
            })
            .collect();

        let (zones, counts): (Vec<String>, Vec<f64>) = zone_counts(&jobs).into_iter().unzip();
        self.charts.draw(
            ZONE_CHART,
            ChartKind::VerticalBar,
            zones,
            vec![Series::new("Jobs", counts.into_iter().map(Some), Rgb::BLUE)],
            ChartOptions::titled("Jobs per zone"),
        );
    }

    fn on_stores(&mut self, outcome: FetchOutcome) -> Vec<FetchRequest> {
        let stores = outcome
            .into_json()
            .ok()
            .and_then(|value| decode::<Vec<StoreRef>>(TabId::Jobs, "stores", value))
            .unwrap_or_default();
        self.stores.populate_labeled(
            stores
                .into_iter()
                .filter_map(|store| {
                    let id = store.id?;
                    let name = store.name.unwrap_or_else(|| id.clone());
                    Some((id, name))
                })
                .collect(),
        );
        self.request_summary()
    }

    fn on_summary(&mut self, outcome: FetchOutcome) {
        let summary = outcome
            .into_json()
            .ok()
            .and_then(|value| decode::<StoreSummary>(TabId::Jobs, "store summary", value));
        self.chips = summary
            .map(|summary| {
                vec![
                    Chip::new("Store", label(summary.store.as_ref())),
                    Chip::new("Jobs", format::number(summary.demand_jobs)),
                    Chip::new("Base payout", format::inr(summary.total_base_payout)),
                    Chip::new("Final payout", format::inr(summary.total_final_payout)),
                    Chip::new("Incentives", format::inr(summary.total_incentives)),
                    Chip::new("Avg final payout", format::inr(summary.avg_final_payout)),
                ]
            })
            .unwrap_or_default();
    }
}

impl TabBinder for JobsBinder {
    fn tab(&self) -> TabId {
        TabId::Jobs
    }

    fn initialize(&mut self) -> Vec<FetchRequest> {
        let generation = self.gate.issue();
        self.loading = true;
        vec![
            FetchRequest::get(
                Ticket::for_tab(TabId::Jobs, RequestKind::Collection, generation),
                with_query(endpoints::JOBS, "limit", &self.limit.to_string()),
            ),
            FetchRequest::get(
                Ticket::for_tab(TabId::Jobs, RequestKind::Stores, generation),
                endpoints::STORES,
            ),
        ]
    }

    fn on_response(&mut self, ticket: &Ticket, outcome: FetchOutcome) -> Vec<FetchRequest> {
        let gate = match ticket.kind {
            RequestKind::Summary { .. } => &self.summary_gate,
            _ => &self.gate,
        };
        if !gate.is_current(ticket.generation) {
            stale(TabId::Jobs, ticket, gate.current());
            return Vec::new();
        }
        match ticket.kind {
            RequestKind::Collection => {
                self.loading = false;
                self.on_jobs(outcome);
                Vec::new()
            }
            RequestKind::Stores => self.on_stores(outcome),
            RequestKind::Summary { .. } => {
                self.on_summary(outcome);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn select_secondary(&mut self, index: usize) -> Vec<FetchRequest> {
        if self.stores.select_index(index) {
            self.request_summary()
        } else {
            Vec::new()
        }
    }

    fn cycle_secondary(&mut self, delta: isize) -> Vec<FetchRequest> {
        if self.stores.cycle(delta).is_some() {
            self.request_summary()
        } else {
            Vec::new()
        }
    }

    fn teardown(&mut self) {
        self.charts.dispose_all();
    }

    fn charts(&self) -> &ChartBoard {
        &self.charts
    }

    fn view(&self) -> TabView<'_> {
        let mut view = TabView::new(TabId::Jobs);
        view.loading = self.loading;
        view.secondary = Some(SelectorView::of("Store", &self.stores));
        view.chips = &self.chips;
        view.tables = vec![&self.jobs];
        view.charts = self.charts.handles().iter().collect();
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use serde_json::json;

    #[test]
    fn timestamps_are_shortened() {
        assert_eq!(display_time("2024-05-01T10:20:30"), "2024-05-01 10:20");
        assert_eq!(display_time("2024-05-01T10:20:30.123456+05:30"), "2024-05-01 10:20");
        assert_eq!(display_time("yesterday"), "yesterday");
    }

    #[test]
    fn missing_zone_counts_as_na() {
        let jobs: Vec<Job> = serde_json::from_value(json!([
            {"zone": "north"}, {"zone": null}, {"zone": "north"}, {}
        ]))
        .unwrap();
        assert_eq!(
            zone_counts(&jobs),
            vec![("north".to_string(), 2.0), ("NA".to_string(), 2.0)]
        );
    }

    #[test]
    fn activation_fetches_jobs_and_stores_then_summary() {
        let mut binder = JobsBinder::new(100);
        let requests = binder.initialize();
        assert_eq!(requests[0].path, "/jobs?limit=100");
        assert_eq!(requests[1].path, "/stores/");

        binder.on_response(
            &requests[0].ticket,
            FetchOutcome::Json(json!([{"id": 1, "energy_kwh": 1.234, "zone": "east"}])),
        );
        assert_eq!(binder.view().tables[0].rows[0][3], "1.23");
        assert_eq!(binder.view().tables[0].rows[0][4], format::PLACEHOLDER);

        let summary = binder
            .on_response(
                &requests[1].ticket,
                FetchOutcome::Json(json!([{"id": "Baner Hub", "name": "Baner Hub"}])),
            )
            .remove(0);
        assert_eq!(summary.path, "/stores/Baner%20Hub/summary");

        binder.on_response(
            &summary.ticket,
            FetchOutcome::Json(json!({"store": "Baner Hub", "demand_jobs": 12, "avg_final_payout": 123456.7})),
        );
        let view = binder.view();
        assert_eq!(view.chips[1].value, "12");
        assert_eq!(view.chips[5].value, "₹1,23,456.70");
    }

    #[test]
    fn failed_summary_clears_chips() {
        let mut binder = JobsBinder::new(5);
        let requests = binder.initialize();
        let summary = binder
            .on_response(&requests[1].ticket, FetchOutcome::Json(json!([{"id": "A"}])))
            .remove(0);
        binder.on_response(&summary.ticket, FetchOutcome::Failed(ApiError::Status(404)));
        assert!(binder.view().chips.is_empty());
    }
}
