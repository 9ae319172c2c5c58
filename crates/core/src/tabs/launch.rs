use log::{debug, info};

use crate::api::{endpoints, segment, FetchOutcome, FetchRequest, RequestKind, Ticket};
use crate::binder::{decode, stale, TabBinder};
use crate::chart::{ChartBoard, ChartKind, ChartOptions, Rgb, Series};
use crate::domain::TabId;
use crate::format;
use crate::records::{LaunchPlan, LaunchStore, LaunchTask};
use crate::selector::{RequestGate, Selector};
use crate::view::{Chip, SelectorView, TabView, TableView};

use super::label;

pub const ROI_WEEKS: [&str; 4] = ["+1w", "+2w", "+3w", "+4w"];
pub const ACTIONS: &[&str] = &["Rebuild from XLS"];

const STAFFING_CHART: &str = "launch-staffing";
const ENERGY_CHART: &str = "launch-energy";
const ROI_CHART: &str = "launch-roi";

pub fn plan_path(store: &str) -> String {
    format!("/launch/{}/plan", segment(store))
}

pub fn tasks_path(store: &str) -> String {
    format!("/launch/{}/tasks", segment(store))
}

/// `store (city)` entries for the store picker.
pub fn store_options(stores: &[LaunchStore]) -> Vec<(String, String)> {
    stores
        .iter()
        .filter_map(|entry| {
            let store = entry.store.clone()?;
            let shown = format!("{store} ({})", label(entry.city.as_ref()));
            Some((store, shown))
        })
        .collect()
}

fn sla_table() -> TableView {
    TableView::new("SLA", vec!["Target (min)", "Predicted (min)"])
}

fn tasks_table() -> TableView {
    TableView::new("Launch tasks", vec!["Task", "Owner", "Due", "Status"])
}

/// Store launch planner: store list, then plan, then tasks.
pub struct LaunchBinder {
    gate: RequestGate,
    stores: Vec<LaunchStore>,
    selector: Selector,
    chips: Vec<Chip>,
    sla: TableView,
    tasks: TableView,
    charts: ChartBoard,
    loading: bool,
    notice: Option<String>,
}

impl Default for LaunchBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchBinder {
    pub fn new() -> Self {
        Self {
            gate: RequestGate::default(),
            stores: Vec::new(),
            selector: Selector::new(),
            chips: Vec::new(),
            sla: sla_table(),
            tasks: tasks_table(),
            charts: ChartBoard::new(),
            loading: false,
            notice: None,
        }
    }

    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    fn request_stores(&mut self) -> Vec<FetchRequest> {
        let generation = self.gate.issue();
        self.loading = true;
        vec![FetchRequest::get(
            Ticket::for_tab(TabId::Launch, RequestKind::Stores, generation),
            endpoints::LAUNCH_STORES,
        )]
    }

    fn update(&mut self) -> Vec<FetchRequest> {
        let Some(store) = self.selector.selected_key().map(str::to_string) else {
            return Vec::new();
        };
        let generation = self.gate.issue();
        self.loading = true;
        let path = plan_path(&store);
        vec![FetchRequest::get(
            Ticket::for_tab(TabId::Launch, RequestKind::Plan { store }, generation),
            path,
        )]
    }

    fn on_stores(&mut self, outcome: FetchOutcome) -> Vec<FetchRequest> {
        self.stores = outcome
            .into_json()
            .ok()
            .and_then(|value| decode::<Vec<LaunchStore>>(TabId::Launch, "launch stores", value))
            .unwrap_or_default();
        self.selector.populate_labeled(store_options(&self.stores));
        self.update()
    }

    fn on_plan(&mut self, store: &str, generation: u64, outcome: FetchOutcome) -> Vec<FetchRequest> {
        let plan = match outcome.into_json() {
            Ok(value) => decode::<LaunchPlan>(TabId::Launch, "plan", value),
            Err(err) => {
                debug!("launch: no plan for {store}: {err}");
                None
            }
        };
        let Some(plan) = plan else {
            return Vec::new();
        };
        self.render_plan(store, &plan);
        self.loading = true;
        vec![FetchRequest::get(
            Ticket::for_tab(
                TabId::Launch,
                RequestKind::Tasks {
                    store: store.to_string(),
                },
                generation,
            ),
            tasks_path(store),
        )]
    }

    fn render_plan(&mut self, store: &str, plan: &LaunchPlan) {
        let readiness = self
            .stores
            .iter()
            .find(|entry| entry.store.as_deref() == Some(store))
            .and_then(|entry| entry.readiness_score);
        let staffing = &plan.staffing;
        let energy = &plan.energy;

        self.chips = vec![
            Chip::new("Readiness", format::number(readiness)),
            Chip::new("Riders/day", format::number(staffing.riders_per_day)),
            Chip::new("Buffer %", format!("{}%", format::number(Some(staffing.buffer_pct.unwrap_or(0.0))))),
            Chip::new("Orders/rider", format::number(staffing.target_orders_per_rider)),
            Chip::new("Energy kWh/day", format::number(Some(energy.energy_kwh_day.unwrap_or(0.0)))),
            Chip::new("Swaps/day", format::number(Some(energy.swaps_day.unwrap_or(0.0)))),
            Chip::new("City", label(plan.city.as_ref())),
            Chip::new("Opening", label(plan.opening_date.as_ref())),
        ];

        let shifts = Series::new("Riders", staffing.shifts.iter().map(|shift| shift.riders), Rgb::EMERALD);
        if shifts.has_positive() {
            self.charts.draw(
                STAFFING_CHART,
                ChartKind::VerticalBar,
                staffing.shifts.iter().map(|shift| label(shift.name.as_ref())).collect(),
                vec![shifts],
                ChartOptions::titled("Riders per shift"),
            );
        } else {
            self.charts.clear(STAFFING_CHART);
        }

        let kwh = Series::new("kWh/day", [energy.energy_kwh_day], Rgb::CYAN);
        let swaps = Series::new("Swaps/day", [energy.swaps_day], Rgb::ORANGE);
        if kwh.has_positive() || swaps.has_positive() {
            self.charts.draw(
                ENERGY_CHART,
                ChartKind::HorizontalBar,
                vec!["Energy".to_string()],
                vec![kwh, swaps],
                ChartOptions::titled("Energy per day").legend(),
            );
        } else {
            self.charts.clear(ENERGY_CHART);
        }

        let roi = Series::new("Weekly INR", plan.roi.weekly_inr.iter().copied(), Rgb::BLUE);
        if roi.has_positive() {
            self.charts.draw(
                ROI_CHART,
                ChartKind::LineFilled,
                ROI_WEEKS.iter().map(|week| (*week).to_string()).collect(),
                vec![roi],
                ChartOptions::titled("ROI (weekly ₹)"),
            );
        } else {
            self.charts.clear(ROI_CHART);
        }

        self.sla.rows = vec![vec![
            format::number(plan.sla.target_min),
            format::number(plan.sla.predicted_min),
        ]];
    }

    fn on_tasks(&mut self, outcome: FetchOutcome) {
        let tasks = outcome
            .into_json()
            .ok()
            .and_then(|value| decode::<Vec<LaunchTask>>(TabId::Launch, "tasks", value))
            .unwrap_or_default();
        self.tasks.rows = tasks
            .iter()
            .map(|task| {
                vec![
                    label(task.task.as_ref()),
                    label(task.owner.as_ref()),
                    label(task.due.as_ref()),
                    label(task.status.as_ref()),
                ]
            })
            .collect();
    }

    fn on_reprocess(&mut self, outcome: &FetchOutcome) -> Vec<FetchRequest> {
        if outcome.is_success() {
            info!("launch: rebuild finished, reloading stores");
            self.notice = None;
            self.request_stores()
        } else {
            let reason = match outcome {
                FetchOutcome::Status { code, .. } => format!("status {code}"),
                FetchOutcome::Failed(err) => err.to_string(),
                FetchOutcome::Json(_) => String::new(),
            };
            self.notice = Some(format!("Rebuild failed: {reason}"));
            Vec::new()
        }
    }
}

impl TabBinder for LaunchBinder {
    fn tab(&self) -> TabId {
        TabId::Launch
    }

    fn initialize(&mut self) -> Vec<FetchRequest> {
        self.request_stores()
    }

    fn on_response(&mut self, ticket: &Ticket, outcome: FetchOutcome) -> Vec<FetchRequest> {
        // a rebuild outlives store switches
        if ticket.kind == RequestKind::Reprocess {
            return self.on_reprocess(&outcome);
        }
        if !self.gate.is_current(ticket.generation) {
            stale(TabId::Launch, ticket, self.gate.current());
            return Vec::new();
        }
        self.loading = false;
        match &ticket.kind {
            RequestKind::Stores => self.on_stores(outcome),
            RequestKind::Plan { store } => self.on_plan(store, ticket.generation, outcome),
            RequestKind::Tasks { .. } => {
                self.on_tasks(outcome);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn select_primary(&mut self, key: &str) -> Vec<FetchRequest> {
        if self.selector.select(key) {
            self.update()
        } else {
            Vec::new()
        }
    }

    fn cycle_primary(&mut self, delta: isize) -> Vec<FetchRequest> {
        if self.selector.cycle(delta).is_some() {
            self.update()
        } else {
            Vec::new()
        }
    }

    fn trigger(&mut self, action: usize) -> Vec<FetchRequest> {
        if action != 0 {
            return Vec::new();
        }
        self.notice = Some("Rebuilding...".to_string());
        vec![FetchRequest::post(
            Ticket::for_tab(TabId::Launch, RequestKind::Reprocess, self.gate.current()),
            endpoints::LAUNCH_REPROCESS,
            None,
        )]
    }

    fn teardown(&mut self) {
        self.charts.dispose_all();
    }

    fn charts(&self) -> &ChartBoard {
        &self.charts
    }

    fn view(&self) -> TabView<'_> {
        let mut view = TabView::new(TabId::Launch);
        view.loading = self.loading;
        view.primary = Some(SelectorView::of("Store", &self.selector));
        view.chips = &self.chips;
        view.tables = vec![&self.sla, &self.tasks];
        view.charts = self.charts.handles().iter().collect();
        view.actions = ACTIONS;
        view.notice = self.notice.as_deref();
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use serde_json::json;

    fn started() -> (LaunchBinder, FetchRequest) {
        let mut binder = LaunchBinder::new();
        let stores = binder.initialize().remove(0);
        let plan = binder
            .on_response(
                &stores.ticket,
                FetchOutcome::Json(json!([
                    {"store": "Kharadi Hub", "city": "Pune", "readiness_score": 82},
                    {"store": "Andheri", "city": null}
                ])),
            )
            .remove(0);
        (binder, plan)
    }

    #[test]
    fn stores_are_labelled_with_city() {
        let (binder, plan) = started();
        assert_eq!(binder.selector().labels(), ["Kharadi Hub (Pune)", "Andheri (—)"]);
        assert_eq!(plan.path, "/launch/Kharadi%20Hub/plan");
    }

    #[test]
    fn plan_then_tasks() {
        let (mut binder, plan) = started();
        let tasks = binder
            .on_response(
                &plan.ticket,
                FetchOutcome::Json(json!({
                    "city": "Pune",
                    "staffing": {"riders_per_day": 14, "buffer_pct": 10, "shifts": [
                        {"name": "Morning", "riders": 6}, {"name": "Evening", "riders": 8}
                    ]},
                    "energy": {"energy_kwh_day": 0, "swaps_day": 0},
                    "sla": {"target_min": 30, "predicted_min": 27.5},
                    "roi": {"weekly_inr": [0, 0, 0, 0]}
                })),
            )
            .remove(0);
        assert_eq!(tasks.path, "/launch/Kharadi%20Hub/tasks");
        assert_eq!(binder.view().chips[0].value, "82");
        assert_eq!(binder.view().chips[2].value, "10%");

        // only the staffing chart has something positive to show
        let canvases: Vec<_> = binder.charts().handles().iter().map(|h| h.canvas).collect();
        assert_eq!(canvases, vec![STAFFING_CHART]);

        binder.on_response(
            &tasks.ticket,
            FetchOutcome::Json(json!([{"task": "Hire riders", "owner": "Ops", "due": "2024-06-01", "status": "open"}])),
        );
        let view = binder.view();
        assert_eq!(view.tables[0].rows, vec![vec!["30".to_string(), "27.5".to_string()]]);
        assert_eq!(view.tables[1].rows[0][0], "Hire riders");
    }

    #[test]
    fn missing_plan_leaves_view_unchanged() {
        let (mut binder, plan) = started();
        let follow_up = binder.on_response(&plan.ticket, FetchOutcome::Failed(ApiError::Status(404)));
        assert!(follow_up.is_empty());
        assert!(binder.view().chips.is_empty());
    }

    #[test]
    fn successful_rebuild_reloads_stores() {
        let (mut binder, _plan) = started();
        let rebuild = binder.trigger(0).remove(0);
        assert!(rebuild.is_post());
        assert_eq!(binder.view().notice, Some("Rebuilding..."));

        // switching store while the rebuild runs must not swallow its answer
        binder.cycle_primary(1);
        let reload = binder.on_response(
            &rebuild.ticket,
            FetchOutcome::Status {
                code: 200,
                body: "{}".to_string(),
            },
        );
        assert_eq!(reload[0].path, endpoints::LAUNCH_STORES);
        assert_eq!(binder.view().notice, None);
    }

    #[test]
    fn failed_rebuild_is_reported() {
        let (mut binder, _plan) = started();
        let rebuild = binder.trigger(0).remove(0);
        let reload = binder.on_response(
            &rebuild.ticket,
            FetchOutcome::Status {
                code: 500,
                body: "boom".to_string(),
            },
        );
        assert!(reload.is_empty());
        assert_eq!(binder.view().notice, Some("Rebuild failed: status 500"));
    }
}
