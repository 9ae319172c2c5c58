use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};
use ratatui::Frame;
use rider_dash_core::TableView;

/// Column widths sized to the widest cell, capped so one long name does not
/// push every other column off screen.
pub fn column_widths(table: &TableView) -> Vec<Constraint> {
    const MAX_WIDTH: usize = 28;
    table
        .columns
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let widest = table
                .rows
                .iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            Constraint::Length(widest.min(MAX_WIDTH) as u16)
        })
        .collect()
}

pub fn render_table(f: &mut Frame<'_>, area: Rect, table: &TableView) {
    let block = Block::default()
        .title(format!(" {} ", table.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    if table.rows.is_empty() {
        let paragraph = Paragraph::new("No rows")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(table.columns.iter().copied()).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let rows = table
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(String::as_str)));

    let widget = Table::new(rows, column_widths(table))
        .header(header)
        .block(block)
        .column_spacing(2);
    f.render_widget(widget, area);
}
