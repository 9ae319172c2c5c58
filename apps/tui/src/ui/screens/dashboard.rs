use crate::app::App;
use crate::ui::widgets::charts::render_chart;
use crate::ui::widgets::map::render_map;
use crate::ui::widgets::signal_color;
use crate::ui::widgets::tables::render_table;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use rider_dash_core::{ButtonStyle, SelectorView, TabId, TabView};

const TAB_DIVIDER: &str = " | ";

pub fn render_dashboard(app: &App, f: &mut Frame<'_>) {
    let view = app.dashboard.active_view();
    let selector_rows = [&view.primary, &view.secondary]
        .into_iter()
        .flatten()
        .count() as u16;
    let chip_rows = if view.chips.is_empty() { 0 } else { 3 };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Title
            Constraint::Length(1),             // Tab bar
            Constraint::Length(selector_rows), // City / store
            Constraint::Length(chip_rows),     // Chips
            Constraint::Min(5),                // Tables, charts, map
            Constraint::Length(3),             // Status
            Constraint::Length(1),             // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_title(app, &view, f, layout[0]);
    render_tab_bar(app, f, layout[1]);
    render_selectors(&view, f, layout[2]);
    render_chips(&view, f, layout[3]);
    render_body(&view, f, layout[4]);
    render_status(app, &view, f, layout[5]);
    render_shortcuts(f, layout[6]);
}

fn render_title(app: &App, view: &TabView<'_>, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("== Rider Dash ==")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut spans = vec![Span::styled(
        view.title,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    if view.loading {
        spans.push(Span::styled("  loading...", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled(
        format!("  API {} ", app.api_base()),
        Style::default().fg(Color::Gray),
    ));
    spans.push(Span::styled(
        format!("[{}]", app.dashboard.health().label()),
        health_style(app.dashboard.health().label()),
    ));

    f.render_widget(Paragraph::new(TextLine::from(spans)).block(block), area);
}

fn health_style(label: &str) -> Style {
    match label {
        "ok" | "healthy" => Style::default().fg(Color::Green),
        "unreachable" => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Yellow),
    }
}

const fn button(style: ButtonStyle) -> Style {
    match style {
        ButtonStyle::Active => Style::new()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        ButtonStyle::Inactive => Style::new().fg(Color::Gray),
    }
}

/// Horizontal scroll keeping the active tab inside `width` columns.
pub fn tab_bar_offset(active: TabId, width: u16) -> u16 {
    let divider = TAB_DIVIDER.chars().count();
    let start: usize = TabId::ALL[..active.index()]
        .iter()
        .map(|tab| tab.label().chars().count() + divider)
        .sum();
    let end = start + active.label().chars().count();
    let width = usize::from(width);
    if end <= width {
        0
    } else {
        (end - width + 1) as u16
    }
}

fn render_tab_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let mut spans = Vec::with_capacity(TabId::COUNT * 2);
    for (index, tab) in TabId::ALL.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(TAB_DIVIDER, Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(tab.label(), button(app.dashboard.button_style(*tab))));
    }
    let offset = tab_bar_offset(app.dashboard.active_tab(), area.width);
    f.render_widget(Paragraph::new(TextLine::from(spans)).scroll((0, offset)), area);
}

fn selector_line(selector: &SelectorView<'_>) -> TextLine<'static> {
    let position = selector
        .selected
        .map_or_else(String::new, |index| format!(" ({}/{})", index + 1, selector.options.len()));
    TextLine::from(vec![
        Span::styled(
            format!("{}: ", selector.title),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("< {} >", selector.selected_label().unwrap_or("none")),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(position, Style::default().fg(Color::DarkGray)),
    ])
}

fn render_selectors(view: &TabView<'_>, f: &mut Frame<'_>, area: Rect) {
    let lines: Vec<TextLine<'_>> = [&view.primary, &view.secondary]
        .into_iter()
        .flatten()
        .map(selector_line)
        .collect();
    f.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn render_chips(view: &TabView<'_>, f: &mut Frame<'_>, area: Rect) {
    if view.chips.is_empty() {
        return;
    }
    let mut spans = Vec::new();
    for (index, chip) in view.chips.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled("  ", Style::default()));
        }
        let value_style = chip.tone.map_or_else(
            || Style::default().fg(Color::White),
            |tone| Style::default().fg(signal_color(tone)),
        );
        spans.push(Span::styled(format!("{}: ", chip.label), Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            chip.value.clone(),
            value_style.add_modifier(Modifier::BOLD),
        ));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    f.render_widget(
        Paragraph::new(TextLine::from(spans))
            .block(block)
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
        render_map(f, area, map);
        return;
    }

    let (left, right) = if view.charts.is_empty() {
        (area, None)
    } else {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        (halves[0], Some(halves[1]))
    };

    render_left_column(view, f, left);

    if let Some(right) = right {
        for (handle, slot) in view
            .charts
            .iter()
            .zip(split_even(right, Direction::Vertical, view.charts.len()))
        {
            render_chart(f, slot, handle);
        }
    }
}

fn render_left_column(view: &TabView<'_>, f: &mut Frame<'_>, area: Rect) {
    let log = view.log;
    let (tables_area, log_area) = match log {
        Some(_) => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);
            (split[0], Some(split[1]))
        }
        None => (area, None),
    };

    for (table, slot) in view
        .tables
        .iter()
        .zip(split_even(tables_area, Direction::Vertical, view.tables.len()))
    {
        render_table(f, slot, table);
    }

    if let (Some(log), Some(log_area)) = (log, log_area) {
        let lines = log.lines().count() as u16;
        let visible = log_area.height.saturating_sub(2);
        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));
        let paragraph = Paragraph::new(log)
            .block(block)
            .scroll((lines.saturating_sub(visible), 0));
        f.render_widget(paragraph, log_area);
    }
}

fn render_status(app: &App, view: &TabView<'_>, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let mut spans = Vec::new();
    if let Some(notice) = view.notice {
        spans.push(Span::styled(notice.to_string(), Style::default().fg(Color::Red)));
        spans.push(Span::raw("  "));
    }
    if !view.actions.is_empty() {
        let actions = view
            .actions
            .iter()
            .enumerate()
            .map(|(index, action)| format!("[{}] {action}", index + 1))
            .collect::<Vec<_>>()
            .join(" ");
        spans.push(Span::styled(actions, Style::default().fg(Color::Green)));
        spans.push(Span::raw("  "));
    }
    if app.in_flight > 0 {
        spans.push(Span::styled(
            format!("{} request(s) in flight", app.in_flight),
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(updated) = app.last_update {
        spans.push(Span::styled(
            format!("updated {}", updated.format("%H:%M:%S")),
            Style::default().fg(Color::Gray),
        ));
    }

    let paragraph = Paragraph::new(TextLine::from(spans))
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn shortcuts_line() -> TextLine<'static> {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::Gray);
    TextLine::from(vec![
        Span::styled("←/→", key),
        Span::styled(": Tab | ", text),
        Span::styled("↑/↓", key),
        Span::styled(": City | ", text),
        Span::styled("[ ]", key),
        Span::styled(": Store | ", text),
        Span::styled("1-4", key),
        Span::styled(": Action | ", text),
        Span::styled("r", key),
        Span::styled(": Reload | ", text),
        Span::styled("?", key),
        Span::styled(": Help | ", text),
        Span::styled("q", key),
        Span::styled(": Quit", text),
    ])
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let paragraph = Paragraph::new(shortcuts_line()).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tab_needs_no_scroll() {
        assert_eq!(tab_bar_offset(TabId::Demand, 40), 0);
    }

    #[test]
    fn last_tab_scrolls_into_view() {
        let offset = tab_bar_offset(TabId::Jobs, 40);
        assert!(offset > 0);
        let total: usize = TabId::ALL
            .iter()
            .map(|tab| tab.label().chars().count() + TAB_DIVIDER.len())
            .sum::<usize>()
            - TAB_DIVIDER.len();
        assert_eq!(usize::from(offset), total - 40 + 1);
    }
}
