//! Record shapes returned by the analytics API.
//!
//! Every field is optional and read through [`crate::lenient`], since the
//! backend builds these rows from spreadsheets and is loose about types.

use serde::Deserialize;

use crate::lenient;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DemandRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub best_shift: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub demand_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub stars: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub p25: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub p75: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub store_earning_index: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub new_rider_ramp_score: Option<f64>,
}

/// One store from `/demand/insights`, the 3PL capacity view.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InsightRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub demand_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub best_shift: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub orders_per_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub store_earning_index: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub recommended_riders_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub riders_week: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub orders_per_rider_week: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub idle_time_risk: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub playbook: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub p25: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub p75: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RideRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub per_ride_avg: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub per_ride_median: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub p25: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub p75: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub per_ride_std: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub num_samples: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IncentiveRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub base_pay: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub incentive_total: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub surge_payout: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub peak_hour_payout: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub minimum_guarantee: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PayoutRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub final_with_gst: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub management_fee: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub deductions_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_cash_adjustment: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub net_after_adj: Option<f64>,
}

/// Per-city value of `/analytics/pack`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalyticsPack {
    #[serde(default, deserialize_with = "lenient::list")]
    pub incentives: Vec<IncentiveRow>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub payouts: Vec<PayoutRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreditRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub cee_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cee_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub credit_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub band: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub earning_median: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub orders_per_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub attendance_per_week: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MgRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub cee_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cee_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub mg_target_per_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current_per_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub mg_gap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub per_ride_median: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub extra_orders: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub extra_shifts: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnergyRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub orders_week: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_dist_km_per_order: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub energy_kwh_week: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub est_swaps_week: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MaintenanceRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub downtime_risk: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub est_tickets_week: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UnderwritingRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub cee_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cee_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub credit_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub monthly_median_inr: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub recommended_limit_inr: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub pd: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lgd: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub ead: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub expected_loss_inr: Option<f64>,
}

/// Four weeks of history and four of forecast for one store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CashflowEntry {
    #[serde(default, deserialize_with = "lenient::numbers")]
    pub past: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient::numbers")]
    pub forecast: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExpansionRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub roi_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub capacity_gap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub demand_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub expected_gmv_week: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RetentionRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub risk: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub actions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LaunchStore {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub opening_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub readiness_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub risk: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Shift {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub riders: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanStaffing {
    #[serde(default, deserialize_with = "lenient::number")]
    pub riders_per_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub target_orders_per_rider: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub buffer_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub shifts: Vec<Shift>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanEnergy {
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_km_per_order: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub kwh_per_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub energy_kwh_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub swaps_day: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanSla {
    #[serde(default, deserialize_with = "lenient::number")]
    pub target_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub predicted_min: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanRoi {
    #[serde(default, deserialize_with = "lenient::numbers")]
    pub weekly_inr: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LaunchPlan {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub opening_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub staffing: PlanStaffing,
    #[serde(default, deserialize_with = "lenient::object")]
    pub energy: PlanEnergy,
    #[serde(default, deserialize_with = "lenient::object")]
    pub sla: PlanSla,
    #[serde(default, deserialize_with = "lenient::object")]
    pub roi: PlanRoi,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LaunchTask {
    #[serde(default, deserialize_with = "lenient::text")]
    pub task: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub due: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HotspotFeature {
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub count: Option<f64>,
}

impl HotspotFeature {
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lng?))
    }

    /// Missing or zero counts weigh as one job.
    pub fn weight(&self) -> f64 {
        self.count.filter(|c| *c != 0.0).unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HotspotCollection {
    #[serde(default, deserialize_with = "lenient::list")]
    pub features: Vec<HotspotFeature>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Job {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub external_job_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub energy_kwh: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub zone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StoreRef {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StoreSummary {
    #[serde(default, deserialize_with = "lenient::text")]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub demand_jobs: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_base_payout: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_final_payout: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_incentives: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_final_payout: Option<f64>,
}

/// Rider name, falling back to the rider id.
pub fn person_label(name: Option<&str>, id: Option<&str>) -> Option<String> {
    name.or(id).map(str::to_string)
}
