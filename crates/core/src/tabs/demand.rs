use crate::api::endpoints;
use crate::binder::TabSpec;
use crate::chart::{ChartBoard, ChartKind, ChartOptions, Rgb};
use crate::config::Assumptions;
use crate::domain::TabId;
use crate::format;
use crate::metrics;
use crate::records::{DemandRow, InsightRow};
use crate::view::{Chip, TableView};

use super::{draw_bars, head, label, store_keys};

const DEMAND_CHART_ROWS: usize = 12;

fn weekly_range(p25: Option<f64>, p75: Option<f64>) -> String {
    format!("{} – {}", format::inr(p25), format::inr(p75))
}

pub struct Demand;

impl TabSpec for Demand {
    type Entry = Vec<DemandRow>;
    type Row = DemandRow;

    fn tab(&self) -> TabId {
        TabId::Demand
    }

    fn collection_path(&self) -> &'static str {
        endpoints::DEMAND_FORECAST
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
        entry
    }

    fn table(&self) -> TableView {
        TableView::new(
            "Store demand",
            vec!["Store", "Best shift", "Score", "Stars", "Signal", "Weekly P25", "Weekly P75", "Earning index", "Ramp score"],
        )
    }

    fn table_row(&self, row: &DemandRow) -> Vec<String> {
        vec![
            label(row.store.as_ref()),
            label(row.best_shift.as_ref()),
            format::number(row.demand_score),
            label(row.stars.as_ref()),
            metrics::demand_signal(row.color.as_deref(), row.demand_score)
                .as_str()
                .to_string(),
            format::inr(row.p25),
            format::inr(row.p75),
            format::inr(row.store_earning_index),
            format::number(row.new_rider_ramp_score),
        ]
    }

    fn draw_charts(&self, rows: &[DemandRow], board: &mut ChartBoard) {
        draw_bars(
            board,
            "demand-score",
            ChartKind::HorizontalBar,
            head(rows, DEMAND_CHART_ROWS),
            |row| label(row.store.as_ref()),
            "Demand Score",
            |row| row.demand_score,
            Rgb::EMERALD,
            ChartOptions::titled("Demand score").max(100.0),
        );
    }

    /// Top store card: the first row is the server's best store.
    fn detail(&self, rows: &[DemandRow], _selected: Option<usize>, _board: &mut ChartBoard) -> Vec<Chip> {
        let Some(top) = rows.first() else {
            return vec![Chip::new("Top store", "No data")];
        };
        let signal = metrics::demand_signal(top.color.as_deref(), top.demand_score);
        let score = match top.stars.as_deref() {
            Some(stars) => format!("{} {stars}", format::number(top.demand_score)),
            None => format::number(top.demand_score),
        };
        vec![
            Chip::new("Top store", label(top.store.as_ref())).toned(signal),
            Chip::new("Best shift", label(top.best_shift.as_ref())),
            Chip::new("Demand score", score).toned(signal),
            Chip::new("Weekly INR", weekly_range(top.p25, top.p75)),
        ]
    }
}

pub struct ThreePl {
    pub assumptions: Assumptions,
}

impl ThreePl {
    fn staffing(&self, row: &InsightRow) -> metrics::Staffing {
        metrics::staffing(
            row.orders_per_day,
            row.store_earning_index,
            row.recommended_riders_day,
            row.riders_week,
            &self.assumptions,
        )
    }
}

impl TabSpec for ThreePl {
    type Entry = Vec<InsightRow>;
    type Row = InsightRow;

    fn tab(&self) -> TabId {
        TabId::ThreePl
    }

    fn collection_path(&self) -> &'static str {
        endpoints::DEMAND_INSIGHTS
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
        entry
    }

    fn table(&self) -> TableView {
        TableView::new(
            "3PL capacity",
            vec![
                "Store",
                "Score",
                "Orders/day",
                "Reco riders/day",
                "Current riders/day",
                "Gap",
                "Best shift",
                "Orders/rider (week)",
                "Idle risk",
                "Riders/week",
                "Weekly INR",
                "Playbook",
            ],
        )
    }

    fn table_row(&self, row: &InsightRow) -> Vec<String> {
        let staffing = self.staffing(row);
        vec![
            label(row.store.as_ref()),
            format::number(row.demand_score),
            format::fixed(staffing.orders_per_day, 1),
            format::fixed(staffing.recommended, 1),
            format::fixed(staffing.current, 1),
            format::fixed(staffing.gap, 1),
            label(row.best_shift.as_ref()),
            format::number(row.orders_per_rider_week),
            label(row.idle_time_risk.as_ref()),
            format::number(row.riders_week),
            weekly_range(row.p25, row.p75),
            label(row.playbook.as_ref()),
        ]
    }

    fn draw_charts(&self, rows: &[InsightRow], board: &mut ChartBoard) {
        draw_bars(
            board,
            "threepl-gap",
            ChartKind::HorizontalBar,
            rows,
            |row| label(row.store.as_ref()),
            "Capacity gap (riders/day)",
            |row| self.staffing(row).gap,
            Rgb::AMBER,
            ChartOptions::titled("Capacity gap (riders/day)"),
        );
    }

    fn secondary_title(&self) -> Option<&'static str> {
        Some("Store")
    }

    fn secondary_keys(&self, rows: &[InsightRow]) -> Option<Vec<String>> {
        Some(store_keys(rows, |row| row.store.as_ref()))
    }

    /// Insights for the picked store, the first one until a pick is made.
    fn detail(&self, rows: &[InsightRow], selected: Option<usize>, _board: &mut ChartBoard) -> Vec<Chip> {
        let Some(row) = selected.and_then(|index| rows.get(index)).or_else(|| rows.first()) else {
            return Vec::new();
        };
        vec![
            Chip::new("Store", label(row.store.as_ref())),
            Chip::new("Shift", label(row.best_shift.as_ref())),
            Chip::new("Orders/rider (week)", format::number(row.orders_per_rider_week)),
            Chip::new("Idle risk", label(row.idle_time_risk.as_ref())),
            Chip::new("Reco riders/day", format::number(row.recommended_riders_day)),
            Chip::new("Riders/week", format::number(row.riders_week)),
            Chip::new("Weekly INR", weekly_range(row.p25, row.p75)),
            Chip::new("Playbook", label(row.playbook.as_ref())),
        ]
    }
}
