use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use rider_dash_core::{Dashboard, FetchRequest, TabId};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::api::{Delivery, HttpClient};
use crate::app::input::{action_for, perform, Action};

pub struct App {
    pub dashboard: Dashboard,
    pub running: bool,
    pub show_help: bool,
    /// Requests sent but not yet answered.
    pub in_flight: usize,
    pub last_update: Option<DateTime<Local>>,
    /// City from `--city`, applied once the tab offers it.
    pending_city: Option<String>,
    client: HttpClient,
    tx: UnboundedSender<Delivery>,
    rx: UnboundedReceiver<Delivery>,
}

impl App {
    pub fn new(dashboard: Dashboard, client: HttpClient) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            dashboard,
            running: true,
            show_help: false,
            in_flight: 0,
            last_update: None,
            pending_city: None,
            client,
            tx,
            rx,
        }
    }

    pub fn api_base(&self) -> &str {
        self.client.base()
    }

    #[must_use]
    pub fn with_city(mut self, city: Option<String>) -> Self {
        self.pending_city = city;
        self
    }

    pub fn start(&mut self, tab: TabId) {
        let requests = self.dashboard.start_on(tab);
        self.dispatch(requests);
    }

    pub fn dispatch(&mut self, requests: Vec<FetchRequest>) {
        for request in requests {
            self.in_flight += 1;
            self.client.spawn(request, self.tx.clone());
        }
    }

    /// Feeds every finished request into the dashboard. Returns whether
    /// anything arrived.
    pub fn drain(&mut self) -> bool {
        let mut changed = false;
        while let Ok((ticket, outcome)) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            debug!(?ticket, success = outcome.is_success(), "response");
            let follow_up = self.dashboard.on_response(&ticket, outcome);
            self.dispatch(follow_up);
            self.last_update = Some(Local::now());
            changed = true;
        }
        if changed {
            self.apply_pending_city();
        }
        changed
    }

    fn apply_pending_city(&mut self) {
        let Some(city) = self.pending_city.as_deref() else {
            return;
        };
        let offered = self
            .dashboard
            .active_view()
            .primary
            .is_some_and(|selector| selector.options.iter().any(|option| option == city));
        if offered {
            let requests = self.dashboard.select_city(city);
            self.pending_city = None;
            self.dispatch(requests);
        }
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        let Some(action) = action_for(key) else {
            return;
        };

        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::Quit) {
                self.show_help = false;
            }
            return;
        }

        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.show_help = true,
            other => {
                let requests = perform(&mut self.dashboard, other);
                self.dispatch(requests);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rider_dash_core::DashboardConfig;
    use std::time::Duration;

    fn app() -> App {
        let client = HttpClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        App::new(Dashboard::new(DashboardConfig::default()), client)
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = app();
        app.handle_input(KeyCode::Char('?'));
        assert!(app.show_help);

        app.handle_input(KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);

        app.handle_input(KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut app = app();
        app.handle_input(KeyCode::Char('z'));
        assert!(app.running);
        assert_eq!(app.in_flight, 0);
    }
}
