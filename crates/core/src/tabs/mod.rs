//! Per-tab parameters for the generic [`Binder`](crate::binder::Binder),
//! plus the tabs that need their own binder (map, launch planner, admin
//! probes, jobs overview).

pub mod admin;
pub mod credit;
pub mod demand;
pub mod earnings;
pub mod hotspots;
pub mod jobs;
pub mod launch;
pub mod operations;
pub mod planning;

use crate::chart::{ChartBoard, ChartKind, ChartOptions, Rgb, Series};
use crate::format;

pub(crate) fn label(value: Option<&String>) -> String {
    format::text(value.map(String::as_str))
}

/// One-series bar chart over `rows`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_bars<R>(
    board: &mut ChartBoard,
    canvas: &'static str,
    kind: ChartKind,
    rows: &[R],
    row_label: impl Fn(&R) -> String,
    series: &str,
    value: impl Fn(&R) -> Option<f64>,
    color: Rgb,
    options: ChartOptions,
) {
    board.draw(
        canvas,
        kind,
        rows.iter().map(&row_label).collect(),
        vec![Series::new(series, rows.iter().map(&value), color)],
        options,
    );
}

/// Store picker keys, one per row. An unnamed or repeated store gets its
/// row number appended so each key selects exactly one row.
pub(crate) fn store_keys<R>(rows: &[R], store: impl Fn(&R) -> Option<&String>) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let name = label(store(row));
        let key = if name == format::PLACEHOLDER || keys.contains(&name) {
            format!("{name} #{}", index + 1)
        } else {
            name
        };
        keys.push(key);
    }
    keys
}

/// Leading rows kept for charts that would be unreadable with every store.
pub(crate) fn head<R>(rows: &[R], limit: usize) -> &[R] {
    &rows[..rows.len().min(limit)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_keys_are_unique() {
        let rows = vec![
            Some("Baner".to_string()),
            None,
            Some("Baner".to_string()),
            None,
            Some("  ".to_string()),
        ];
        assert_eq!(
            store_keys(&rows, Option::as_ref),
            ["Baner", "— #2", "Baner #3", "— #4", "— #5"]
        );
    }
}
