use std::collections::VecDeque;
use std::fmt::Write as _;

use color_eyre::Result;
use rider_dash_core::{Dashboard, FetchRequest, HealthStatus, MapLayer, TabId, TabView};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::HttpClient;

/// Run one tab to completion without a terminal and print it.
pub async fn run_headless(
    dashboard: &mut Dashboard,
    client: &HttpClient,
    tab: TabId,
    city: Option<&str>,
    json: bool,
) -> Result<()> {
    let requests = dashboard.start_on(tab);
    settle(dashboard, client, requests).await;

    if let Some(city) = city {
        let known = dashboard
            .active_view()
            .primary
            .is_some_and(|selector| selector.options.iter().any(|option| option == city));
        if known {
            let requests = dashboard.select_city(city);
            settle(dashboard, client, requests).await;
        } else {
            warn!(city, tab = tab.as_str(), "city not offered by this tab, keeping the default");
        }
    }

    let report = build_report(dashboard, client.base());
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

/// Executes requests one at a time, including whatever each answer asks for
/// next, until nothing is left.
async fn settle(dashboard: &mut Dashboard, client: &HttpClient, requests: Vec<FetchRequest>) {
    let mut queue: VecDeque<FetchRequest> = requests.into();
    let mut executed = 0_usize;
    while let Some(request) = queue.pop_front() {
        let outcome = client.execute(&request).await;
        executed += 1;
        queue.extend(dashboard.on_response(&request.ticket, outcome));
    }
    info!(executed, "headless fetches settled");
}

#[derive(Debug, Serialize)]
pub struct HeadlessReport<'a> {
    pub api_base: &'a str,
    pub health: &'a HealthStatus,
    pub status: &'a str,
    pub view: TabView<'a>,
}

pub fn build_report<'a>(dashboard: &'a Dashboard, api_base: &'a str) -> HeadlessReport<'a> {
    HeadlessReport {
        api_base,
        health: dashboard.health(),
        status: dashboard.health().label(),
        view: dashboard.active_view(),
    }
}

pub fn render_text(report: &HeadlessReport<'_>) -> String {
    let view = &report.view;
    let mut out = String::new();
    let heading = format!("Rider Dash: {}", view.title);
    let _ = writeln!(out, "\n{heading}\n{}", "=".repeat(heading.chars().count()));
    let _ = writeln!(out, "API: {} ({})", report.api_base, report.status);

    for selector in [&view.primary, &view.secondary].into_iter().flatten() {
        let _ = writeln!(
            out,
            "{}: {} [{}]",
            selector.title,
            selector.selected_label().unwrap_or("(none)"),
            selector.labels.join(", ")
        );
    }

    if !view.chips.is_empty() {
        out.push('\n');
        for chip in view.chips {
            let _ = writeln!(out, "- {}: {}", chip.label, chip.value);
        }
    }

    for table in &view.tables {
        let _ = writeln!(out, "\n{}:", table.title);
        let _ = writeln!(out, "{}", table.columns.join(" | "));
        if table.rows.is_empty() {
            let _ = writeln!(out, "(no rows)");
        }
        for row in &table.rows {
            let _ = writeln!(out, "{}", row.join(" | "));
        }
    }

    if let Some(map) = view.map {
        let layer = match &map.layer {
            MapLayer::Empty => "no data".to_string(),
            MapLayer::Hexes(bins) => format!("{} hex cells", bins.len()),
            MapLayer::Markers(markers) => format!("{} markers", markers.len()),
        };
        let _ = writeln!(out, "\nMap: {layer}");
    }

    if let Some(notice) = view.notice {
        let _ = writeln!(out, "\n{notice}");
    }
    if let Some(log) = view.log.filter(|log| !log.is_empty()) {
        let _ = writeln!(out, "\nLog:\n{log}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rider_dash_core::{DashboardConfig, FetchOutcome};
    use serde_json::json;

    fn loaded_demand() -> Dashboard {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        let requests = dashboard.start();
        dashboard.on_response(&requests[0].ticket, FetchOutcome::Json(json!({"status": "ok"})));
        dashboard.on_response(
            &requests[1].ticket,
            FetchOutcome::Json(json!({"Pune": [{"store": "A", "demand_score": 80, "p25": 123_456.7}]})),
        );
        dashboard
    }

    #[test]
    fn text_report_lists_selector_and_rows() {
        let dashboard = loaded_demand();
        let text = render_text(&build_report(&dashboard, "http://localhost:8000"));
        assert!(text.contains("Rider Dash: Demand"));
        assert!(text.contains("API: http://localhost:8000 (ok)"));
        assert!(text.contains("City: Pune [Pune]"));
        assert!(text.contains("A | —"));
        assert!(text.contains("₹1,23,456.70"));
    }

    #[test]
    fn json_report_carries_the_view() {
        let dashboard = loaded_demand();
        let value = serde_json::to_value(build_report(&dashboard, "http://x")).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["view"]["tab"], "Demand");
        assert_eq!(value["view"]["tables"][0]["rows"][0][0], "A");
    }
}
