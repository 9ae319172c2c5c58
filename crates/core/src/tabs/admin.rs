use crate::api::{
    endpoints, probe_envelope, tail_chars, truncate_chars, FetchOutcome, FetchRequest, RequestKind, Ticket,
    LOG_LIMIT, PROBE_BODY_LIMIT,
};
use crate::binder::{decode, stale, TabBinder};
use crate::domain::TabId;
use crate::format;
use crate::records::LaunchStore;
use crate::selector::RequestGate;
use crate::view::{TabView, TableView};

use super::label;

pub const PROBES: [&str; 4] = [
    endpoints::BECKN_SEARCH,
    endpoints::BECKN_SELECT,
    endpoints::BECKN_CONFIRM,
    endpoints::BECKN_STATUS,
];
pub const ACTIONS: &[&str] = &["search", "select", "confirm", "status"];

/// Beckn admin: probe buttons with a rolling log, plus the launch store list.
pub struct BecknBinder {
    gate: RequestGate,
    stores: TableView,
    log: String,
    loading: bool,
}

impl Default for BecknBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl BecknBinder {
    pub fn new() -> Self {
        Self {
            gate: RequestGate::default(),
            stores: TableView::new(
                "Launch stores",
                vec!["Store", "City", "Opening", "Readiness", "Risk"],
            ),
            log: String::new(),
            loading: false,
        }
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    fn append(&mut self, line: &str) {
        if !self.log.is_empty() {
            self.log.push('\n');
        }
        self.log.push_str(line);
        let kept = tail_chars(&self.log, LOG_LIMIT);
        if kept.len() != self.log.len() {
            self.log = kept.to_string();
        }
    }

    fn on_probe(&mut self, path: &str, outcome: FetchOutcome) {
        let line = match outcome {
            FetchOutcome::Status { code, body } => {
                format!("{path}: {code} {}", truncate_chars(&body, PROBE_BODY_LIMIT))
            }
            FetchOutcome::Json(value) => {
                let body = value.to_string();
                format!("{path}: 200 {}", truncate_chars(&body, PROBE_BODY_LIMIT))
            }
            FetchOutcome::Failed(err) => format!("{path}: {err}"),
        };
        self.append(&line);
    }

    fn on_stores(&mut self, outcome: FetchOutcome) {
        let Ok(value) = outcome.into_json() else {
            return;
        };
        let stores = decode::<Vec<LaunchStore>>(TabId::Beckn, "launch stores", value).unwrap_or_default();
        self.stores.rows = stores
            .iter()
            .map(|entry| {
                vec![
                    label(entry.store.as_ref()),
                    label(entry.city.as_ref()),
                    label(entry.opening_date.as_ref()),
                    format::number(entry.readiness_score),
                    label(entry.risk.as_ref()),
                ]
            })
            .collect();
    }
}

impl TabBinder for BecknBinder {
    fn tab(&self) -> TabId {
        TabId::Beckn
    }

    fn initialize(&mut self) -> Vec<FetchRequest> {
        let generation = self.gate.issue();
        self.loading = true;
        vec![FetchRequest::get(
            Ticket::for_tab(TabId::Beckn, RequestKind::Stores, generation),
            endpoints::LAUNCH_STORES,
        )]
    }

    fn on_response(&mut self, ticket: &Ticket, outcome: FetchOutcome) -> Vec<FetchRequest> {
        match &ticket.kind {
            RequestKind::Probe { path } => self.on_probe(path, outcome),
            RequestKind::Stores if self.gate.is_current(ticket.generation) => {
                self.loading = false;
                self.on_stores(outcome);
            }
            _ => stale(TabId::Beckn, ticket, self.gate.current()),
        }
        Vec::new()
    }

    fn trigger(&mut self, action: usize) -> Vec<FetchRequest> {
        let Some(path) = PROBES.get(action) else {
            return Vec::new();
        };
        vec![FetchRequest::post(
            Ticket::for_tab(
                TabId::Beckn,
                RequestKind::Probe {
                    path: (*path).to_string(),
                },
                self.gate.current(),
            ),
            *path,
            Some(probe_envelope()),
        )]
    }

    fn view(&self) -> TabView<'_> {
        let mut view = TabView::new(TabId::Beckn);
        view.loading = self.loading;
        view.tables = vec![&self.stores];
        view.log = Some(&self.log);
        view.actions = ACTIONS;
        view
    }
}
