use rider_dash_core::api::{FetchOutcome, FetchRequest, RequestKind, Route};
use rider_dash_core::{ApiError, Dashboard, DashboardConfig, HealthStatus, TabId};
use serde_json::{json, Value};

fn dashboard() -> (Dashboard, Vec<FetchRequest>) {
    let mut dashboard = Dashboard::new(DashboardConfig::default());
    let requests = dashboard.start();
    (dashboard, requests)
}

fn find(requests: &[FetchRequest], path: &str) -> FetchRequest {
    requests
        .iter()
        .find(|r| r.path == path)
        .cloned()
        .unwrap_or_else(|| panic!("no request for {path} in {requests:?}"))
}

fn answer(dashboard: &mut Dashboard, request: &FetchRequest, body: Value) -> Vec<FetchRequest> {
    dashboard.on_response(&request.ticket, FetchOutcome::Json(body))
}

fn demand_collection() -> Value {
    json!({
        "Pune": [{"store": "A", "demand_score": 80}],
        "Mumbai": [{"store": "B", "demand_score": 40}]
    })
}

#[test]
fn demand_tab_follows_the_city_selector() {
    let (mut dashboard, requests) = dashboard();
    let collection = find(&requests, "/demand/forecast");
    let slice = answer(&mut dashboard, &collection, demand_collection());

    let view = dashboard.active_view();
    let cities = view.primary.as_ref().map(|s| s.options.to_vec());
    assert_eq!(cities, Some(vec!["Pune".to_string(), "Mumbai".to_string()]));
    assert_eq!(view.primary.as_ref().and_then(|s| s.selected_label()), Some("Pune"));
    assert_eq!(view.tables[0].rows.len(), 1);
    assert_eq!(view.tables[0].rows[0][0], "A");
    assert_eq!(view.tables[0].rows[0][2], "80");
    assert_eq!(view.charts.len(), 1);
    assert_eq!(view.charts[0].labels, vec!["A".to_string()]);
    assert_eq!(view.charts[0].series[0].values, vec![80.0]);

    assert_eq!(slice.len(), 1);
    assert_eq!(slice[0].path, "/demand/forecast?city=Pune");
    answer(&mut dashboard, &slice[0], json!({"Pune": [{"store": "A", "demand_score": 80}]}));

    let switch = dashboard.select_city("Mumbai");
    assert_eq!(switch[0].path, "/demand/forecast?city=Mumbai");
    let view = dashboard.active_view();
    assert_eq!(view.tables[0].rows.len(), 1);
    assert_eq!(view.tables[0].rows[0][0], "B");
    assert_eq!(view.charts[0].series[0].values, vec![40.0]);
}

#[test]
fn null_city_does_not_empty_the_selector() {
    let (mut dashboard, requests) = dashboard();
    let collection = find(&requests, "/demand/forecast");
    answer(
        &mut dashboard,
        &collection,
        json!({"Pune": null, "Mumbai": [{"store": "B", "demand_score": 40}]}),
    );

    let view = dashboard.active_view();
    let cities = view.primary.as_ref().map(|s| s.options.to_vec());
    assert_eq!(cities, Some(vec!["Pune".to_string(), "Mumbai".to_string()]));
    assert!(view.tables[0].rows.is_empty());

    dashboard.select_city("Mumbai");
    assert_eq!(dashboard.active_view().tables[0].rows[0][0], "B");
}

#[test]
fn late_answer_for_previous_city_is_dropped() {
    let (mut dashboard, requests) = dashboard();
    let collection = find(&requests, "/demand/forecast");
    let pune = answer(&mut dashboard, &collection, demand_collection()).remove(0);
    let mumbai = dashboard.select_city("Mumbai").remove(0);

    answer(&mut dashboard, &mumbai, json!({"Mumbai": [{"store": "B", "demand_score": 41}]}));
    let ignored = answer(&mut dashboard, &pune, json!({"Pune": [{"store": "Z", "demand_score": 1}]}));
    assert!(ignored.is_empty());

    let view = dashboard.active_view();
    assert_eq!(view.tables[0].rows.len(), 1);
    assert_eq!(view.tables[0].rows[0][0], "B");
    assert_eq!(view.tables[0].rows[0][2], "41");
}

#[test]
fn failed_slice_leaves_the_city_empty() {
    let (mut dashboard, requests) = dashboard();
    let collection = find(&requests, "/demand/forecast");
    let pune = answer(&mut dashboard, &collection, demand_collection()).remove(0);
    dashboard.on_response(&pune.ticket, FetchOutcome::Failed(ApiError::Transport("refused".into())));

    let view = dashboard.active_view();
    assert!(view.tables[0].rows.is_empty());
    assert_eq!(view.chips[0].value, "No data");
}

#[test]
fn switching_tabs_keeps_one_panel_and_releases_charts() {
    let (mut dashboard, requests) = dashboard();
    let collection = find(&requests, "/demand/forecast");
    answer(&mut dashboard, &collection, demand_collection());
    assert_eq!(dashboard.binder(TabId::Demand).charts().live(), 1);

    for tab in [TabId::Energy, TabId::Demand, TabId::Energy, TabId::Jobs, TabId::Jobs] {
        dashboard.activate(tab);
        assert_eq!(dashboard.router().visible_panels(), 1);
        assert_eq!(dashboard.active_tab(), tab);
    }
    assert_eq!(dashboard.binder(TabId::Demand).charts().live(), 0);
    assert_eq!(dashboard.router().activation_count(TabId::Energy), 2);
}

#[test]
fn reactivation_refetches_and_redraws_in_place() {
    let (mut dashboard, requests) = dashboard();
    let collection = find(&requests, "/demand/forecast");
    answer(&mut dashboard, &collection, demand_collection());

    let again = dashboard.reload();
    assert_eq!(again[0].path, "/demand/forecast");
    assert_eq!(again[0].ticket.kind, RequestKind::Collection);
    answer(&mut dashboard, &again[0], demand_collection());

    let board = dashboard.binder(TabId::Demand).charts();
    assert_eq!(board.live(), 1);
    assert_eq!(board.created() - board.disposed(), 1);
}

#[test]
fn health_reports_unreachable_backend() {
    let (mut dashboard, requests) = dashboard();
    let health = requests
        .iter()
        .find(|r| r.ticket.route == Route::Health)
        .cloned()
        .expect("health request");
    dashboard.on_response(&health.ticket, FetchOutcome::Failed(ApiError::Transport("down".into())));
    assert_eq!(dashboard.health(), &HealthStatus::Unreachable);
    assert_eq!(dashboard.health().label(), "unreachable");
}

#[test]
fn cycling_tabs_wraps_around() {
    let (mut dashboard, _) = dashboard();
    let requests = dashboard.prev_tab();
    assert_eq!(dashboard.active_tab(), TabId::Jobs);
    assert!(requests.iter().any(|r| r.path.starts_with("/jobs?limit=")));
    dashboard.next_tab();
    assert_eq!(dashboard.active_tab(), TabId::Demand);
}
