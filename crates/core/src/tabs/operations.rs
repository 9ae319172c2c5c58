use crate::api::endpoints;
use crate::binder::TabSpec;
use crate::chart::{ChartBoard, ChartKind, ChartOptions, Rgb};
use crate::domain::TabId;
use crate::format;
use crate::records::{EnergyRow, MaintenanceRow};
use crate::view::TableView;

use super::{draw_bars, label};

pub struct Energy;

impl TabSpec for Energy {
    type Entry = Vec<EnergyRow>;
    type Row = EnergyRow;

    fn tab(&self) -> TabId {
        TabId::Energy
    }

    fn collection_path(&self) -> &'static str {
        endpoints::ENERGY_DEMAND
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
        entry
    }

    fn table(&self) -> TableView {
        TableView::new(
            "Energy demand",
            vec!["Store", "Orders/wk", "Km/order", "kWh/wk", "Swaps/wk"],
        )
    }

    fn table_row(&self, row: &EnergyRow) -> Vec<String> {
        vec![
            label(row.store.as_ref()),
            format::number(row.orders_week),
            format::number(row.avg_dist_km_per_order),
            format::number(row.energy_kwh_week),
            format::number(row.est_swaps_week),
        ]
    }

    fn draw_charts(&self, rows: &[EnergyRow], board: &mut ChartBoard) {
        let store = |row: &EnergyRow| label(row.store.as_ref());
        draw_bars(
            board,
            "energy-kwh",
            ChartKind::HorizontalBar,
            rows,
            store,
            "kWh/week",
            |row| row.energy_kwh_week,
            Rgb::CYAN,
            ChartOptions::titled("kWh/week"),
        );
        draw_bars(
            board,
            "energy-swaps",
            ChartKind::HorizontalBar,
            rows,
            store,
            "Swaps/week",
            |row| row.est_swaps_week,
            Rgb::ORANGE,
            ChartOptions::titled("Swaps/week"),
        );
    }
}

pub struct Maintenance;

impl TabSpec for Maintenance {
    type Entry = Vec<MaintenanceRow>;
    type Row = MaintenanceRow;

    fn tab(&self) -> TabId {
        TabId::Maintenance
    }

    fn collection_path(&self) -> &'static str {
        endpoints::MAINTENANCE_RISK
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
        entry
    }

    fn table(&self) -> TableView {
        TableView::new(
            "Maintenance risk",
            vec!["Store", "Downtime risk", "Tickets/wk", "Notes"],
        )
    }

    fn table_row(&self, row: &MaintenanceRow) -> Vec<String> {
        vec![
            label(row.store.as_ref()),
            format::number(row.downtime_risk),
            format::number(row.est_tickets_week),
            label(row.notes.as_ref()),
        ]
    }

    fn draw_charts(&self, rows: &[MaintenanceRow], board: &mut ChartBoard) {
        draw_bars(
            board,
            "maint-risk",
            ChartKind::HorizontalBar,
            rows,
            |row| label(row.store.as_ref()),
            "Downtime risk (%)",
            |row| row.downtime_risk,
            Rgb::RED,
            ChartOptions::titled("Downtime risk (%)").max(100.0),
        );
    }
}
