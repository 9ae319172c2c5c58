use crate::api::{self, endpoints};
use crate::binder::TabSpec;
use crate::chart::{ChartBoard, ChartKind, ChartOptions, Rgb, Series};
use crate::domain::TabId;
use crate::format;
use crate::metrics;
use crate::records::{AnalyticsPack, IncentiveRow, PayoutRow, RideRow};
use crate::view::{Chip, TableView};

use super::{draw_bars, label, store_keys};

const RIDE_RANGE: &str = "ride-range";

/// Per-ride earnings. Cities come from the demand forecast; rows come from
/// the per-ride endpoint.
pub struct Ride;

impl TabSpec for Ride {
    type Entry = Vec<RideRow>;
    type Row = RideRow;

    fn tab(&self) -> TabId {
        TabId::Ride
    }

    fn collection_path(&self) -> &'static str {
        endpoints::DEMAND_FORECAST
    }

    fn slice_path(&self, city: &str) -> String {
        api::with_query(endpoints::PER_RIDE, "city", city)
    }

    fn keys_only(&self) -> bool {
        true
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
        entry
    }

    fn table(&self) -> TableView {
        TableView::new(
            "Per-ride earnings",
            vec!["Store", "Avg", "Median", "P25", "P75", "Std", "Samples"],
        )
    }

    fn table_row(&self, row: &RideRow) -> Vec<String> {
        vec![
            label(row.store.as_ref()),
            format::inr(row.per_ride_avg),
            format::inr(row.per_ride_median),
            format::inr(row.p25),
            format::inr(row.p75),
            format::fixed(row.per_ride_std, 1),
            format::number(row.num_samples),
        ]
    }

    fn draw_charts(&self, _rows: &[RideRow], _board: &mut ChartBoard) {}

    fn secondary_title(&self) -> Option<&'static str> {
        Some("Store")
    }

    fn secondary_keys(&self, rows: &[RideRow]) -> Option<Vec<String>> {
        Some(store_keys(rows, |row| row.store.as_ref()))
    }

    fn detail(&self, rows: &[RideRow], selected: Option<usize>, board: &mut ChartBoard) -> Vec<Chip> {
        let Some(row) = selected.and_then(|index| rows.get(index)).or_else(|| rows.first()) else {
            board.clear(RIDE_RANGE);
            return Vec::new();
        };

        let fractions = metrics::range_fractions(row.p25, row.per_ride_median, row.p75);
        board.draw(
            RIDE_RANGE,
            ChartKind::HorizontalBar,
            vec!["P25".to_string(), "Median".to_string(), "P75".to_string()],
            vec![Series::new("% of max", fractions.map(|f| Some(f * 100.0)), Rgb::BLUE)
                .with_colors(vec![Rgb::AMBER, Rgb::EMERALD, Rgb::BLUE])],
            ChartOptions::titled(format!("Per-ride range: {}", label(row.store.as_ref()))).max(100.0),
        );

        vec![
            Chip::new("Avg", format::inr(row.per_ride_avg)),
            Chip::new("Median", format::inr(row.per_ride_median)),
            Chip::new("P25", format::inr(row.p25)),
            Chip::new("P75", format::inr(row.p75)),
            Chip::new("Std", format::fixed(row.per_ride_std, 1)),
            Chip::new("Samples", format::number(row.num_samples)),
        ]
    }
}

pub struct Incentives;

impl TabSpec for Incentives {
    type Entry = AnalyticsPack;
    type Row = IncentiveRow;

    fn tab(&self) -> TabId {
        TabId::Incentives
    }

    fn collection_path(&self) -> &'static str {
        endpoints::ANALYTICS_PACK
    }

    fn rows<'e>(&self, entry: &'e AnalyticsPack) -> &'e [IncentiveRow] {
        &entry.incentives
    }

    fn table(&self) -> TableView {
        TableView::new(
            "Incentives",
            vec!["Store", "Base pay", "Incentives", "Surge", "Peak hour", "Min guarantee"],
        )
    }

    fn table_row(&self, row: &IncentiveRow) -> Vec<String> {
        vec![
            label(row.store.as_ref()),
            format::inr(row.base_pay),
            format::inr(row.incentive_total),
            format::inr(row.surge_payout),
            format::inr(row.peak_hour_payout),
            format::inr(row.minimum_guarantee),
        ]
    }

    fn draw_charts(&self, rows: &[IncentiveRow], board: &mut ChartBoard) {
        draw_bars(
            board,
            "incentives",
            ChartKind::HorizontalBar,
            rows,
            |row| label(row.store.as_ref()),
            "Incentives (₹)",
            |row| row.incentive_total,
            Rgb::VIOLET,
            ChartOptions::titled("Incentives (₹)"),
        );
    }
}

pub struct Payouts;

impl TabSpec for Payouts {
    type Entry = AnalyticsPack;
    type Row = PayoutRow;

    fn tab(&self) -> TabId {
        TabId::Payouts
    }

    fn collection_path(&self) -> &'static str {
        endpoints::ANALYTICS_PACK
    }

    fn rows<'e>(&self, entry: &'e AnalyticsPack) -> &'e [PayoutRow] {
        &entry.payouts
    }

    fn table(&self) -> TableView {
        TableView::new(
            "Payouts",
            vec!["Store", "Final with GST", "Mgmt fee", "Deductions", "Cash adj.", "Net after adj."],
        )
    }

    fn table_row(&self, row: &PayoutRow) -> Vec<String> {
        vec![
            label(row.store.as_ref()),
            format::inr(row.final_with_gst),
            format::inr(row.management_fee),
            format::inr(row.deductions_amount),
            format::inr(row.total_cash_adjustment),
            format::inr(row.net_after_adj),
        ]
    }

    fn draw_charts(&self, rows: &[PayoutRow], board: &mut ChartBoard) {
        draw_bars(
            board,
            "payouts",
            ChartKind::HorizontalBar,
            rows,
            |row| label(row.store.as_ref()),
            "Final with GST (₹)",
            |row| row.final_with_gst,
            Rgb::EMERALD,
            ChartOptions::titled("Final with GST (₹)"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ride_missing_p25_is_dash_in_table_and_zero_in_chart() {
        let rows = vec![RideRow {
            store: Some("Wakad".to_string()),
            per_ride_median: Some(40.0),
            p75: Some(80.0),
            ..RideRow::default()
        }];
        assert_eq!(Ride.table_row(&rows[0])[3], format::PLACEHOLDER);

        let mut board = ChartBoard::new();
        let chips = Ride.detail(&rows, Some(0), &mut board);
        let range = board.get(RIDE_RANGE).unwrap();
        assert_eq!(range.series[0].values, vec![0.0, 50.0, 100.0]);
        assert_eq!(chips[2].value, format::PLACEHOLDER);
    }

    #[test]
    fn ride_slice_path_points_at_per_ride() {
        assert_eq!(Ride.slice_path("Pune"), "/earnings/per-ride?city=Pune");
        assert_eq!(Ride.collection_path(), "/demand/forecast");
    }

    #[test]
    fn payouts_format_final_with_gst() {
        let row = PayoutRow {
            store: Some("Hadapsar".to_string()),
            final_with_gst: Some(123_456.7),
            ..PayoutRow::default()
        };
        let cells = Payouts.table_row(&row);
        assert_eq!(cells[1], "₹1,23,456.70");
        assert_eq!(cells[2], format::PLACEHOLDER);
    }

    #[test]
    fn pack_rows_are_split_by_tab() {
        let pack: AnalyticsPack = serde_json::from_value(serde_json::json!({
            "incentives": [{"store": "A"}],
            "payouts": [{"store": "B"}, {"store": "C"}]
        }))
        .unwrap();
        assert_eq!(Incentives.rows(&pack).len(), 1);
        assert_eq!(Payouts.rows(&pack).len(), 2);
    }
}
