//! The tab controller both front ends drive.
//!
//! Every input (key press, tab click, HTTP answer) goes in through a method
//! here and comes back out as the requests to run next. Rendering reads
//! [`Dashboard::active_view`].

use log::info;

use crate::api::{FetchOutcome, FetchRequest, HealthStatus, Route, Ticket};
use crate::binder::{Binder, TabBinder};
use crate::config::DashboardConfig;
use crate::domain::TabId;
use crate::router::{ButtonStyle, TabRouter};
use crate::tabs::admin::BecknBinder;
use crate::tabs::credit::{Credit, Mg, Underwriting};
use crate::tabs::demand::{Demand, ThreePl};
use crate::tabs::earnings::{Incentives, Payouts, Ride};
use crate::tabs::hotspots::HotspotBinder;
use crate::tabs::jobs::JobsBinder;
use crate::tabs::launch::LaunchBinder;
use crate::tabs::operations::{Energy, Maintenance};
use crate::tabs::planning::{Cashflow, Expansion, Retention};
use crate::view::TabView;

fn binder_for(tab: TabId, config: &DashboardConfig) -> Box<dyn TabBinder> {
    match tab {
        TabId::Demand => Box::new(Binder::new(Demand)),
        TabId::ThreePl => Box::new(Binder::new(ThreePl {
            assumptions: config.assumptions,
        })),
        TabId::Ride => Box::new(Binder::new(Ride)),
        TabId::Incentives => Box::new(Binder::new(Incentives)),
        TabId::Payouts => Box::new(Binder::new(Payouts)),
        TabId::Hotspots => Box::new(HotspotBinder::new(config.hex_resolution)),
        TabId::Credit => Box::new(Binder::new(Credit)),
        TabId::Mg => Box::new(Binder::new(Mg)),
        TabId::Energy => Box::new(Binder::new(Energy)),
        TabId::Maintenance => Box::new(Binder::new(Maintenance)),
        TabId::Underwriting => Box::new(Binder::new(Underwriting)),
        TabId::Cashflow => Box::new(Binder::new(Cashflow)),
        TabId::Expansion => Box::new(Binder::new(Expansion)),
        TabId::Retention => Box::new(Binder::new(Retention)),
        TabId::Beckn => Box::new(BecknBinder::new()),
        TabId::Launch => Box::new(LaunchBinder::new()),
        TabId::Jobs => Box::new(JobsBinder::new(config.jobs_limit)),
    }
}

pub struct Dashboard {
    config: DashboardConfig,
    router: TabRouter,
    binders: Vec<Box<dyn TabBinder>>,
    health: HealthStatus,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let binders = TabId::ALL
            .iter()
            .map(|tab| binder_for(*tab, &config))
            .collect();
        Self {
            config,
            router: TabRouter::new(),
            binders,
            health: HealthStatus::Checking,
        }
    }

    /// Health probe plus the default tab.
    pub fn start(&mut self) -> Vec<FetchRequest> {
        self.start_on(TabId::Demand)
    }

    /// Health probe plus `tab` as the first visible tab.
    pub fn start_on(&mut self, tab: TabId) -> Vec<FetchRequest> {
        self.health = HealthStatus::Checking;
        let mut requests = vec![HealthStatus::request()];
        requests.extend(self.activate(tab));
        requests
    }

    /// Shows `tab` and re-runs its initialization. Nothing is cached between
    /// activations.
    pub fn activate(&mut self, tab: TabId) -> Vec<FetchRequest> {
        let activation = self.router.activate(tab);
        if activation.previous != tab {
            self.binder_mut(activation.previous).teardown();
        }
        info!(
            "activating {} tab{}",
            tab.as_str(),
            if activation.first { " (first visit)" } else { "" }
        );
        self.binder_mut(tab).initialize()
    }

    pub fn next_tab(&mut self) -> Vec<FetchRequest> {
        self.activate(self.router.next())
    }

    pub fn prev_tab(&mut self) -> Vec<FetchRequest> {
        self.activate(self.router.prev())
    }

    pub fn reload(&mut self) -> Vec<FetchRequest> {
        self.activate(self.router.active())
    }

    pub fn select_city(&mut self, city: &str) -> Vec<FetchRequest> {
        self.active_binder_mut().select_primary(city)
    }

    pub fn cycle_city(&mut self, delta: isize) -> Vec<FetchRequest> {
        self.active_binder_mut().cycle_primary(delta)
    }

    pub fn select_store(&mut self, index: usize) -> Vec<FetchRequest> {
        self.active_binder_mut().select_secondary(index)
    }

    pub fn cycle_store(&mut self, delta: isize) -> Vec<FetchRequest> {
        self.active_binder_mut().cycle_secondary(delta)
    }

    pub fn trigger(&mut self, action: usize) -> Vec<FetchRequest> {
        self.active_binder_mut().trigger(action)
    }

    /// Routes an answer to whoever asked for it.
    pub fn on_response(&mut self, ticket: &Ticket, outcome: FetchOutcome) -> Vec<FetchRequest> {
        match ticket.route {
            Route::Health => {
                self.health = HealthStatus::from_outcome(&outcome);
                info!("backend status: {}", self.health.label());
                Vec::new()
            }
            Route::Tab(tab) => self.binder_mut(tab).on_response(ticket, outcome),
        }
    }

    pub const fn health(&self) -> &HealthStatus {
        &self.health
    }

    pub const fn router(&self) -> &TabRouter {
        &self.router
    }

    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn active_tab(&self) -> TabId {
        self.router.active()
    }

    pub fn button_style(&self, tab: TabId) -> ButtonStyle {
        self.router.button_style(tab)
    }

    pub fn binder(&self, tab: TabId) -> &dyn TabBinder {
        self.binders[tab.index()].as_ref()
    }

    pub fn view(&self, tab: TabId) -> TabView<'_> {
        self.binder(tab).view()
    }

    pub fn active_view(&self) -> TabView<'_> {
        self.view(self.router.active())
    }

    fn binder_mut(&mut self, tab: TabId) -> &mut dyn TabBinder {
        self.binders[tab.index()].as_mut()
    }

    fn active_binder_mut(&mut self) -> &mut dyn TabBinder {
        let tab = self.router.active();
        self.binder_mut(tab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestKind;

    #[test]
    fn start_checks_health_then_loads_demand() {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        let requests = dashboard.start();
        let paths: Vec<_> = requests.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/healthz", "/demand/forecast"]);
        assert_eq!(dashboard.health(), &HealthStatus::Checking);
        assert_eq!(requests[1].ticket.kind, RequestKind::Collection);
    }

    #[test]
    fn every_tab_has_its_own_binder() {
        let dashboard = Dashboard::new(DashboardConfig::default());
        for tab in TabId::ALL {
            assert_eq!(dashboard.binder(tab).tab(), tab);
        }
    }

    #[test]
    fn health_answer_updates_status() {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        let health = dashboard.start().remove(0);
        dashboard.on_response(
            &health.ticket,
            FetchOutcome::Json(serde_json::json!({"status": "ok"})),
        );
        assert_eq!(dashboard.health().label(), "ok");
    }

    #[test]
    fn degraded_health_is_reported_from_an_error_body() {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        let health = dashboard.start().remove(0);
        dashboard.on_response(
            &health.ticket,
            FetchOutcome::Status {
                code: 503,
                body: r#"{"status":"degraded"}"#.to_string(),
            },
        );
        assert_eq!(dashboard.health().label(), "degraded");
    }

    #[test]
    fn map_and_admin_tabs_hold_no_charts() {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        dashboard.start();
        for tab in [TabId::Hotspots, TabId::Beckn] {
            dashboard.activate(tab);
            assert_eq!(dashboard.binder(tab).charts().live(), 0);
            assert!(dashboard.view(tab).charts.is_empty());
        }
    }
}
