use crate::api::endpoints;
use crate::binder::TabSpec;
use crate::chart::{ChartBoard, ChartKind, ChartOptions, Rgb, Series};
use crate::collection::CityKeyed;
use crate::domain::TabId;
use crate::format;
use crate::records::{CashflowEntry, ExpansionRow, RetentionRow};
use crate::view::{Chip, TableView};

use super::{draw_bars, head, label};

pub const CASHFLOW_WEEKS: [&str; 8] = ["-3w", "-2w", "-1w", "0", "+1w", "+2w", "+3w", "+4w"];
const CASHFLOW_CHART: &str = "cashflow";
const RANKED_CHART_ROWS: usize = 15;

fn rupee_list(values: &[Option<f64>]) -> String {
    if values.is_empty() {
        return format::PLACEHOLDER.to_string();
    }
    values
        .iter()
        .map(|value| format::inr(*value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Store-keyed forecasts inside each city.
pub struct Cashflow;

impl TabSpec for Cashflow {
    type Entry = CityKeyed<CashflowEntry>;
    type Row = (String, CashflowEntry);

    fn tab(&self) -> TabId {
        TabId::Cashflow
    }

    fn collection_path(&self) -> &'static str {
        endpoints::CASHFLOW
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
        entry.entries()
    }

    fn table(&self) -> TableView {
        TableView::new("Cashflow", vec!["Store", "Past", "Forecast", "Rationale"])
    }

    fn table_row(&self, (store, entry): &(String, CashflowEntry)) -> Vec<String> {
        vec![
            store.clone(),
            rupee_list(&entry.past),
            rupee_list(&entry.forecast),
            label(entry.rationale.as_ref()),
        ]
    }

    fn draw_charts(&self, _rows: &[Self::Row], _board: &mut ChartBoard) {}

    fn secondary_title(&self) -> Option<&'static str> {
        Some("Store")
    }

    fn secondary_keys(&self, rows: &[Self::Row]) -> Option<Vec<String>> {
        Some(rows.iter().map(|(store, _)| store.clone()).collect())
    }

    fn detail(&self, rows: &[Self::Row], selected: Option<usize>, board: &mut ChartBoard) -> Vec<Chip> {
        let Some((store, entry)) = selected.and_then(|index| rows.get(index)) else {
            board.clear(CASHFLOW_CHART);
            return Vec::new();
        };
        board.draw(
            CASHFLOW_CHART,
            ChartKind::LineFilled,
            CASHFLOW_WEEKS.iter().map(|week| (*week).to_string()).collect(),
            vec![Series::new(
                store.clone(),
                entry.past.iter().chain(&entry.forecast).copied(),
                Rgb::BLUE,
            )],
            ChartOptions::titled(format!("Weekly cashflow: {store}")).legend(),
        );
        vec![Chip::new("Rationale", label(entry.rationale.as_ref()))]
    }
}

pub struct Expansion;

impl TabSpec for Expansion {
    type Entry = Vec<ExpansionRow>;
    type Row = ExpansionRow;

    fn tab(&self) -> TabId {
        TabId::Expansion
    }

    fn collection_path(&self) -> &'static str {
        endpoints::EXPANSION
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
        entry
    }

    fn table(&self) -> TableView {
        TableView::new(
            "Expansion opportunities",
            vec!["Store", "ROI score", "Capacity gap", "Demand score", "Expected GMV/wk", "Rationale"],
        )
    }

    fn table_row(&self, row: &ExpansionRow) -> Vec<String> {
        vec![
            label(row.store.as_ref()),
            format::number(row.roi_score),
            format::number(row.capacity_gap),
            format::number(row.demand_score),
            format::inr(row.expected_gmv_week),
            label(row.rationale.as_ref()),
        ]
    }

    fn draw_charts(&self, rows: &[ExpansionRow], board: &mut ChartBoard) {
        draw_bars(
            board,
            "exp-roi",
            ChartKind::HorizontalBar,
            head(rows, RANKED_CHART_ROWS),
            |row| label(row.store.as_ref()),
            "ROI score",
            |row| row.roi_score,
            Rgb::EMERALD,
            ChartOptions::titled("ROI score").max(100.0),
        );
    }
}

pub struct Retention;

impl TabSpec for Retention {
    type Entry = Vec<RetentionRow>;
    type Row = RetentionRow;

    fn tab(&self) -> TabId {
        TabId::Retention
    }

    fn collection_path(&self) -> &'static str {
        endpoints::RETENTION
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
        entry
    }

    fn table(&self) -> TableView {
        TableView::new("Retention at risk", vec!["Store", "Risk", "Actions"])
    }

    fn table_row(&self, row: &RetentionRow) -> Vec<String> {
        vec![
            label(row.store.as_ref()),
            format::number(row.risk),
            label(row.actions.as_ref()),
        ]
    }

    fn draw_charts(&self, rows: &[RetentionRow], board: &mut ChartBoard) {
        draw_bars(
            board,
            "ret-risk",
            ChartKind::HorizontalBar,
            head(rows, RANKED_CHART_ROWS),
            |row| label(row.store.as_ref()),
            "Churn risk (%)",
            |row| row.risk,
            Rgb::RED,
            ChartOptions::titled("Churn risk (%)").max(100.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn city() -> CityKeyed<CashflowEntry> {
        serde_json::from_value(json!({
            "Baner": {"past": [1, 2, 3, 4], "forecast": [5, 6, null, 8], "rationale": "steady"},
            "Aundh": {"past": [], "forecast": []}
        }))
        .unwrap()
    }

    #[test]
    fn cashflow_rows_keep_store_order() {
        let entry = city();
        let rows = Cashflow.rows(&entry);
        assert_eq!(Cashflow.secondary_keys(rows), Some(vec!["Baner".to_string(), "Aundh".to_string()]));
        assert_eq!(Cashflow.table_row(&rows[1])[1], format::PLACEHOLDER);
        assert!(Cashflow.table_row(&rows[0])[2].contains(format::PLACEHOLDER));
    }

    #[test]
    fn cashflow_detail_draws_past_then_forecast() {
        let entry = city();
        let mut board = ChartBoard::new();
        let chips = Cashflow.detail(Cashflow.rows(&entry), Some(0), &mut board);
        let chart = board.get(CASHFLOW_CHART).unwrap();
        assert_eq!(chart.labels.len(), 8);
        assert_eq!(chart.series[0].values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.0, 8.0]);
        assert_eq!(chart.kind, ChartKind::LineFilled);
        assert_eq!(chips[0].value, "steady");

        Cashflow.detail(&[], None, &mut board);
        assert!(board.get(CASHFLOW_CHART).is_none());
    }

    #[test]
    fn ranked_charts_cap_at_fifteen() {
        let rows: Vec<RetentionRow> = (0..40)
            .map(|i| RetentionRow {
                store: Some(format!("S{i}")),
                risk: Some(f64::from(i)),
                ..RetentionRow::default()
            })
            .collect();
        let mut board = ChartBoard::new();
        Retention.draw_charts(&rows, &mut board);
        assert_eq!(board.get("ret-risk").unwrap().series[0].values.len(), 15);
    }
}
