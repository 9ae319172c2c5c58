use crate::api::endpoints;
use crate::binder::TabSpec;
use crate::chart::{ChartBoard, ChartKind, ChartOptions, Rgb, Series};
use crate::domain::TabId;
use crate::format;
use crate::records::{person_label, CreditRow, MgRow, UnderwritingRow};
use crate::view::TableView;

use super::{draw_bars, head, label};

const BANDS: [(&str, Rgb); 5] = [
    ("A+", Rgb::GREEN),
    ("A", Rgb::LIME),
    ("B", Rgb::AMBER),
    ("C", Rgb::ORANGE),
    ("D", Rgb::RED),
];

const UNDERWRITING_CHART_ROWS: usize = 15;

fn rider(name: Option<&String>, id: Option<&String>) -> String {
    format::text(person_label(name.map(String::as_str), id.map(String::as_str)).as_deref())
}

/// Riders per credit band, always in A+..D order. Unknown bands are skipped.
pub fn band_counts(rows: &[CreditRow]) -> [f64; 5] {
    let mut counts = [0.0; 5];
    for band in rows.iter().filter_map(|row| row.band.as_deref()) {
        if let Some(index) = BANDS.iter().position(|(name, _)| *name == band) {
            counts[index] += 1.0;
        }
    }
    counts
}

pub struct Credit;

impl TabSpec for Credit {
    type Entry = Vec<CreditRow>;
    type Row = CreditRow;

    fn tab(&self) -> TabId {
        TabId::Credit
    }

    fn collection_path(&self) -> &'static str {
        endpoints::CREDIT_PROFILES
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
        entry
    }

    fn table(&self) -> TableView {
        TableView::new(
            "Credit profiles",
            vec!["Rider", "Store", "Score", "Band", "Median earning", "Orders/day", "Attendance/wk"],
        )
    }

    fn table_row(&self, row: &CreditRow) -> Vec<String> {
        vec![
            rider(row.cee_name.as_ref(), row.cee_id.as_ref()),
            label(row.store.as_ref()),
            format::number(row.credit_score),
            label(row.band.as_ref()),
            format::inr(row.earning_median),
            format::fixed(row.orders_per_day, 1),
            format::fixed(row.attendance_per_week, 1),
        ]
    }

    fn draw_charts(&self, rows: &[CreditRow], board: &mut ChartBoard) {
        let counts = band_counts(rows);
        board.draw(
            "credit-bands",
            ChartKind::HorizontalBar,
            BANDS.iter().map(|(name, _)| (*name).to_string()).collect(),
            vec![Series::new("Drivers", counts.map(Some), Rgb::BLUE)
                .with_colors(BANDS.iter().map(|(_, color)| *color).collect())],
            ChartOptions::titled("Credit Bands Distribution"),
        );
    }
}

pub struct Mg;

impl TabSpec for Mg {
    type Entry = Vec<MgRow>;
    type Row = MgRow;

    fn tab(&self) -> TabId {
        TabId::Mg
    }

    fn collection_path(&self) -> &'static str {
        endpoints::MG_GUIDANCE
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
        entry
    }

    fn table(&self) -> TableView {
        TableView::new(
            "Minimum guarantee",
            vec![
                "Rider",
                "Store",
                "MG target/day",
                "Current/day",
                "Gap",
                "Per-ride median",
                "Extra orders",
                "Extra shifts",
                "Recommendation",
            ],
        )
    }

    fn table_row(&self, row: &MgRow) -> Vec<String> {
        vec![
            rider(row.cee_name.as_ref(), row.cee_id.as_ref()),
            label(row.store.as_ref()),
            format::inr(row.mg_target_per_day),
            format::inr(row.current_per_day),
            format::inr(row.mg_gap),
            format::inr(row.per_ride_median),
            format::number(row.extra_orders),
            format::number(row.extra_shifts),
            label(row.recommendation.as_ref()),
        ]
    }

    fn draw_charts(&self, rows: &[MgRow], board: &mut ChartBoard) {
        draw_bars(
            board,
            "mg-gap",
            ChartKind::HorizontalBar,
            rows,
            |row| rider(row.cee_name.as_ref(), row.cee_id.as_ref()),
            "MG gap (₹/day)",
            |row| row.mg_gap,
            Rgb::AMBER,
            ChartOptions::titled("MG gap (₹/day)"),
        );
    }
}

pub struct Underwriting;

impl TabSpec for Underwriting {
    type Entry = Vec<UnderwritingRow>;
    type Row = UnderwritingRow;

    fn tab(&self) -> TabId {
        TabId::Underwriting
    }

    fn collection_path(&self) -> &'static str {
        endpoints::UNDERWRITING
    }

    fn rows<'e>(&self, entry: &'e Self::Entry) -> &'e [Self::Row] {
        entry
    }

    fn table(&self) -> TableView {
        TableView::new(
            "Underwriting",
            vec!["Rider", "Store", "Score", "Monthly median", "Limit", "PD", "LGD", "EAD", "Expected loss"],
        )
    }

    fn table_row(&self, row: &UnderwritingRow) -> Vec<String> {
        vec![
            rider(row.cee_name.as_ref(), row.cee_id.as_ref()),
            label(row.store.as_ref()),
            format::number(row.credit_score),
            format::inr(row.monthly_median_inr),
            format::inr(row.recommended_limit_inr),
            format::percent(row.pd, 1),
            format::percent(row.lgd, 0),
            format::inr(row.ead),
            format::inr(row.expected_loss_inr),
        ]
    }

    fn draw_charts(&self, rows: &[UnderwritingRow], board: &mut ChartBoard) {
        let rows = head(rows, UNDERWRITING_CHART_ROWS);
        let name = |row: &UnderwritingRow| rider(row.cee_name.as_ref(), row.cee_id.as_ref());
        draw_bars(
            board,
            "uw-expected-loss",
            ChartKind::HorizontalBar,
            rows,
            name,
            "Expected Loss (₹)",
            |row| row.expected_loss_inr,
            Rgb::AMBER,
            ChartOptions::titled("Expected loss (₹)").legend(),
        );
        draw_bars(
            board,
            "uw-pd",
            ChartKind::HorizontalBar,
            rows,
            name,
            "PD (%)",
            |row| row.pd.map(|pd| pd * 100.0),
            Rgb::BLUE,
            ChartOptions::titled("Probability of default (%)").max(25.0).legend(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banded(band: &str) -> CreditRow {
        CreditRow {
            band: Some(band.to_string()),
            ..CreditRow::default()
        }
    }

    #[test]
    fn bands_keep_fixed_order() {
        let rows = vec![banded("D"), banded("A+"), banded("D"), banded("Z"), CreditRow::default()];
        assert_eq!(band_counts(&rows), [1.0, 0.0, 0.0, 0.0, 2.0]);

        let mut board = ChartBoard::new();
        Credit.draw_charts(&rows, &mut board);
        let chart = board.get("credit-bands").unwrap();
        assert_eq!(chart.labels, vec!["A+", "A", "B", "C", "D"]);
        assert_eq!(chart.series[0].color_at(4), Rgb::RED);
    }

    #[test]
    fn underwriting_percentages() {
        let row = UnderwritingRow {
            cee_id: Some("C-42".to_string()),
            pd: Some(0.0734),
            lgd: Some(0.45),
            ..UnderwritingRow::default()
        };
        let cells = Underwriting.table_row(&row);
        assert_eq!(cells[0], "C-42");
        assert_eq!(cells[5], "7.3%");
        assert_eq!(cells[6], "45%");
        assert_eq!(cells[8], format::PLACEHOLDER);
    }

    #[test]
    fn underwriting_charts_use_first_fifteen() {
        let rows: Vec<UnderwritingRow> = (0..30)
            .map(|i| UnderwritingRow {
                cee_name: Some(format!("R{i}")),
                pd: Some(0.1),
                ..UnderwritingRow::default()
            })
            .collect();
        let mut board = ChartBoard::new();
        Underwriting.draw_charts(&rows, &mut board);
        let pd = board.get("uw-pd").unwrap();
        assert_eq!(pd.labels.len(), 15);
        assert!((pd.series[0].values[0] - 10.0).abs() < 1e-9);
        assert_eq!(pd.options.max, Some(25.0));
        assert_eq!(board.live(), 2);
    }
}
