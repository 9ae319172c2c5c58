use ratatui::layout::{Alignment, Direction, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;
use rider_dash_core::{format, ChartHandle, ChartKind};

use super::color;

// BarChart wants integers; values are stored at two decimal places.
const BAR_SCALE: f64 = 100.0;

fn chart_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn scaled(value: f64) -> u64 {
    (value.max(0.0) * BAR_SCALE).round() as u64
}

pub fn render_empty_chart(f: &mut Frame<'_>, area: Rect, title: &str) {
    let paragraph = Paragraph::new("No data")
        .block(chart_block(title))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

pub fn render_chart(f: &mut Frame<'_>, area: Rect, handle: &ChartHandle) {
    if handle.labels.is_empty() {
        render_empty_chart(f, area, &handle.options.title);
        return;
    }
    match handle.kind {
        ChartKind::VerticalBar => render_bars(f, area, handle, Direction::Vertical),
        ChartKind::HorizontalBar => render_bars(f, area, handle, Direction::Horizontal),
        ChartKind::LineFilled => render_line(f, area, handle),
    }
}

fn bar(label: Option<&str>, value: f64, fill: Color) -> Bar<'static> {
    let bar = Bar::default()
        .value(scaled(value))
        .text_value(format::number(Some(value)))
        .style(Style::default().fg(fill))
        .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    match label {
        Some(label) => bar.label(TextLine::from(label.to_string())),
        None => bar,
    }
}

fn render_bars(f: &mut Frame<'_>, area: Rect, handle: &ChartHandle, direction: Direction) {
    let mut chart = BarChart::default()
        .block(chart_block(&handle.options.title))
        .direction(direction)
        .max(scaled(handle.upper_bound()).max(1));

    let groups: Vec<BarGroup<'_>> = if handle.series.len() == 1 {
        let series = &handle.series[0];
        let bars: Vec<Bar<'_>> = handle
            .labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let value = series.values.get(index).copied().unwrap_or(0.0);
                bar(Some(label), value, color(series.color_at(index)))
            })
            .collect();
        vec![BarGroup::default().bars(&bars)]
    } else {
        handle
            .labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let bars: Vec<Bar<'_>> = handle
                    .series
                    .iter()
                    .map(|series| {
                        let value = series.values.get(index).copied().unwrap_or(0.0);
                        bar(None, value, color(series.color_at(index)))
                    })
                    .collect();
                BarGroup::default()
                    .label(TextLine::from(label.clone()))
                    .bars(&bars)
            })
            .collect()
    };
    for group in groups {
        chart = chart.data(group);
    }

    let chart = match direction {
        Direction::Horizontal => chart.bar_width(1).bar_gap(0).group_gap(1),
        Direction::Vertical => {
            let bars = (handle.labels.len() * handle.series.len().max(1)) as u16;
            let width = (area.width.saturating_sub(2) / bars.max(1)).clamp(1, 9);
            chart.bar_width(width.saturating_sub(1).max(1)).bar_gap(1).group_gap(2)
        }
    };
    f.render_widget(chart, area);
}

fn render_line(f: &mut Frame<'_>, area: Rect, handle: &ChartHandle) {
    let points: Vec<Vec<(f64, f64)>> = handle
        .series
        .iter()
        .map(|series| {
            series
                .values
                .iter()
                .enumerate()
                .map(|(index, value)| (index as f64, *value))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset<'_>> = handle
        .series
        .iter()
        .zip(&points)
        .map(|(series, data)| {
            let dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color(series.color_at(0))))
                .data(data);
            if handle.options.show_legend {
                dataset.name(series.label.clone())
            } else {
                dataset
            }
        })
        .collect();

    let last = handle.labels.len().saturating_sub(1);
    let x_labels: Vec<Span<'_>> = [0, last / 2, last]
        .into_iter()
        .filter_map(|index| handle.labels.get(index))
        .map(|label| Span::raw(label.clone()))
        .collect();
    let upper = handle.upper_bound().max(1.0);

    let chart = Chart::new(datasets)
        .block(chart_block(&handle.options.title))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, last.max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, upper])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format::number(Some(upper / 2.0))),
                    Span::raw(format::number(Some(upper))),
                ]),
        );
    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_values_keep_two_decimals() {
        assert_eq!(scaled(12.345), 1235);
        assert_eq!(scaled(-3.0), 0);
        assert_eq!(scaled(0.0), 0);
    }
}
