use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Map, MapResolution, Points},
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row,
        Table, Wrap,
    },
    Frame,
};
use rider_dash_core::{
    format, ButtonStyle, ChartHandle, ChartKind, Dashboard, MapLayer, MapView, Rgb, Signal,
    TabId, TabView, TableView,
};

const fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

const fn tone(signal: Signal) -> Color {
    match signal {
        Signal::Green => color(Rgb::GREEN),
        Signal::Yellow => color(Rgb::YELLOW),
        Signal::Red => color(Rgb::RED),
    }
}

fn boxed(title: &str, border: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

pub fn render_dashboard(dashboard: &Dashboard, f: &mut Frame<'_>) {
    let area = f.area();
    let outer = Block::default()
        .title("Rider Dash")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = outer.inner(area).inner(Margin::new(1, 0));
    f.render_widget(outer, area);

    let view = dashboard.active_view();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(if view.chips.is_empty() { 0 } else { 3 }),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(inner);

    render_status(dashboard, &view, f, layout[0]);
    render_tabs(dashboard, f, layout[1]);
    render_selectors(&view, f, layout[2]);
    render_chips(&view, f, layout[3]);
    render_body(&view, f, layout[4]);
    render_footer(&view, f, layout[5]);
}

fn render_status(dashboard: &Dashboard, view: &TabView<'_>, f: &mut Frame<'_>, area: Rect) {
    let mut spans = vec![
        Span::styled(view.title, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            format!("API {} [{}]", dashboard.config().api_base, dashboard.health().label()),
            Style::default().fg(Color::Gray),
        ),
    ];
    if view.loading {
        spans.push(Span::styled("  loading...", Style::default().fg(Color::Yellow)));
    }
    if let Some(notice) = view.notice {
        spans.push(Span::styled(format!("  {notice}"), Style::default().fg(Color::Red)));
    }
    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}

fn render_tabs(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let mut spans = Vec::new();
    for (index, tab) in TabId::ALL.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled("|", Style::default().fg(Color::DarkGray)));
        }
        let style = match dashboard.button_style(*tab) {
            ButtonStyle::Active => Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0, 0, 238))
                .add_modifier(Modifier::BOLD),
            ButtonStyle::Inactive => Style::default().fg(Color::Gray),
        };
        spans.push(Span::styled(format!(" {} ", tab.label()), style));
    }
    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}

fn render_selectors(view: &TabView<'_>, f: &mut Frame<'_>, area: Rect) {
    let lines: Vec<TextLine<'_>> = [&view.primary, &view.secondary]
        .into_iter()
        .flatten()
        .map(|selector| {
            TextLine::from(vec![
                Span::styled(format!("{}: ", selector.title), Style::default().fg(Color::Gray)),
                Span::styled(
                    selector.selected_label().unwrap_or("none").to_string(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} options)", selector.options.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn render_chips(view: &TabView<'_>, f: &mut Frame<'_>, area: Rect) {
    if view.chips.is_empty() {
        return;
    }
    let mut spans = Vec::new();
    for chip in view.chips {
        spans.push(Span::styled(format!("{}: ", chip.label), Style::default().fg(Color::Gray)));
        let fg = chip.tone.map_or(Color::White, tone);
        spans.push(Span::styled(
            format!("{}   ", chip.value),
            Style::default().fg(fg).add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(
        Paragraph::new(TextLine::from(spans))
            .block(boxed("", Color::Magenta))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn split_even(area: Rect, direction: Direction, parts: usize) -> Vec<Rect> {
    let parts = parts.max(1) as u32;
    Layout::default()
        .direction(direction)
        .constraints((0..parts).map(|_| Constraint::Ratio(1, parts)))
        .split(area)
        .to_vec()
}

fn render_body(view: &TabView<'_>, f: &mut Frame<'_>, area: Rect) {
    if let Some(map) = view.map {
        render_map(map, f, area);
        return;
    }

    let columns = if view.charts.is_empty() {
        vec![area]
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(area)
            .to_vec()
    };

    let mut panels: Vec<Panel<'_>> = view.tables.iter().map(|t| Panel::Table(t)).collect();
    if let Some(log) = view.log {
        panels.push(Panel::Log(log));
    }
    for (panel, slot) in panels
        .iter()
        .zip(split_even(columns[0], Direction::Vertical, panels.len()))
    {
        match panel {
            Panel::Table(table) => render_table(table, f, slot),
            Panel::Log(log) => render_log(log, f, slot),
        }
    }

    if let Some(right) = columns.get(1) {
        for (handle, slot) in view
            .charts
            .iter()
            .zip(split_even(*right, Direction::Vertical, view.charts.len()))
        {
            render_chart(handle, f, slot);
        }
    }
}

enum Panel<'a> {
    Table(&'a TableView),
    Log(&'a str),
}

fn render_table(table: &TableView, f: &mut Frame<'_>, area: Rect) {
    let block = boxed(&table.title, Color::Green);
    if table.rows.is_empty() {
        let paragraph = Paragraph::new("No rows")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }
    let widths = table
        .columns
        .iter()
        .map(|_| Constraint::Ratio(1, table.columns.len().max(1) as u32))
        .collect::<Vec<_>>();
    let header = Row::new(table.columns.iter().copied())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let rows = table
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(String::as_str)));
    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

fn render_log(log: &str, f: &mut Frame<'_>, area: Rect) {
    let lines = log.lines().count() as u16;
    let scroll = lines.saturating_sub(area.height.saturating_sub(2));
    f.render_widget(
        Paragraph::new(log)
            .block(boxed("Log", Color::Blue))
            .scroll((scroll, 0)),
        area,
    );
}

fn render_chart(handle: &ChartHandle, f: &mut Frame<'_>, area: Rect) {
    let block = boxed(&handle.options.title, Color::Cyan);
    if handle.labels.is_empty() {
        let paragraph = Paragraph::new("No data")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    if handle.kind == ChartKind::LineFilled {
        let points: Vec<Vec<(f64, f64)>> = handle
            .series
            .iter()
            .map(|s| s.values.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect())
            .collect();
        let datasets = handle
            .series
            .iter()
            .zip(&points)
            .map(|(series, data)| {
                Dataset::default()
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(color(series.color_at(0))))
                    .data(data)
            })
            .collect::<Vec<_>>();
        let last = handle.labels.len().saturating_sub(1).max(1) as f64;
        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(Axis::default().bounds([0.0, last]))
            .y_axis(
                Axis::default()
                    .bounds([0.0, handle.upper_bound().max(1.0)])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format::number(Some(handle.upper_bound()))),
                    ]),
            );
        f.render_widget(chart, area);
        return;
    }

    let direction = if handle.kind == ChartKind::HorizontalBar {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let scale = |v: f64| (v.max(0.0) * 100.0).round() as u64;
    let mut chart = BarChart::default()
        .block(block)
        .direction(direction)
        .bar_width(if direction == Direction::Horizontal { 1 } else { 5 })
        .bar_gap(1)
        .max(scale(handle.upper_bound()).max(1));
    for (index, label) in handle.labels.iter().enumerate() {
        let bars: Vec<Bar<'_>> = handle
            .series
            .iter()
            .map(|series| {
                let value = series.values.get(index).copied().unwrap_or(0.0);
                Bar::default()
                    .value(scale(value))
                    .text_value(format::number(Some(value)))
                    .style(Style::default().fg(color(series.color_at(index))))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(TextLine::from(label.clone()))
                .bars(&bars),
        );
    }
    f.render_widget(chart, area);
}

fn render_map(map: &MapView, f: &mut Frame<'_>, area: Rect) {
    let block = boxed("Hotspots", Color::Cyan);
    if let Some(overlay) = &map.overlay {
        let paragraph = Paragraph::new(overlay.as_str())
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }
    let ((south, west), (north, east)) = map.bounds.unwrap_or_else(|| {
        let (lat, lng) = map.center;
        ((lat - 0.25, lng - 0.25), (lat + 0.25, lng + 0.25))
    });
    let span = (east - west).max(north - south);
    let canvas = Canvas::default()
        .block(block)
        .x_bounds([west, east])
        .y_bounds([south, north])
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();
            match &map.layer {
                MapLayer::Empty => {}
                MapLayer::Hexes(bins) => {
                    for bin in bins {
                        let coords: Vec<(f64, f64)> =
                            bin.boundary.iter().map(|(lat, lng)| (*lng, *lat)).collect();
                        ctx.draw(&Points {
                            coords: &coords,
                            color: color(bin.color),
                        });
                    }
                }
                MapLayer::Markers(markers) => {
                    for marker in markers {
                        ctx.draw(&Circle {
                            x: marker.lng,
                            y: marker.lat,
                            radius: span * marker.radius / 400.0,
                            color: color(marker.color),
                        });
                    }
                }
            }
        });
    f.render_widget(canvas, area);
}

fn render_footer(view: &TabView<'_>, f: &mut Frame<'_>, area: Rect) {
    let mut text = String::from("←/→ tab  ↑/↓ city  [ ] store  r reload");
    for (index, action) in view.actions.iter().enumerate() {
        text.push_str(&format!("  {} {action}", index + 1));
    }
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        area,
    );
}
