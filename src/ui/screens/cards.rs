use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::ledger::card_total;
use crate::models::CardType;
use crate::ui::app::{App, RowRef};
use crate::ui::util::{display_date, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_header(f, chunks[0], app);
    render_rows(f, chunks[1], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let fmt = |v: Decimal| app.formatter.format(v);
    let balance_style = if app.totals.balance >= Decimal::ZERO {
        p.income_style()
    } else {
        p.expense_style()
    };

    let mut spans = vec![
        Span::styled(" Income ", p.dim_style()),
        Span::styled(fmt(app.totals.income), p.income_style().add_modifier(Modifier::BOLD)),
        Span::styled("   Expenses ", p.dim_style()),
        Span::styled(fmt(app.totals.expenses), p.expense_style().add_modifier(Modifier::BOLD)),
        Span::styled("   Balance ", p.dim_style()),
        Span::styled(fmt(app.totals.balance), balance_style.add_modifier(Modifier::BOLD)),
        Span::styled("   Saved to date ", p.dim_style()),
        Span::styled(fmt(app.cumulative_savings), p.normal_style()),
    ];
    if app.modified {
        spans.push(Span::styled("   ● modified", Style::default().fg(p.yellow)));
    }
    if let Some(source) = app.record().copied_from {
        spans.push(Span::styled(format!("   copied from {source}"), p.dim_style()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.overlay))
        .title(Span::styled(format!(" {} ", app.month()), p.title_style()));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_rows(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let record = app.record();
    let rows_ref = app.rows();

    if record.cards.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.overlay));
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("This month has no cards", p.dim_style())),
            Line::from(Span::styled("Add one with A or :card <title>", p.dim_style())),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let page = area.height.saturating_sub(2) as usize;
    let rows: Vec<Row> = rows_ref
        .iter()
        .enumerate()
        .skip(app.row_scroll)
        .take(page)
        .map(|(i, r)| {
            let is_cursor = i == app.row_index;
            let row = match *r {
                RowRef::Card(ci) => {
                    let card = &record.cards[ci];
                    let done = card.items.iter().filter(|it| it.completed).count();
                    let mut title = card.title.clone();
                    if let Some(to_date) = app.card_to_date(&card.id) {
                        title.push_str(&format!("  (to date {})", app.formatter.format(to_date)));
                    }
                    Row::new(vec![
                        Cell::from(format!("▸ {title}")),
                        Cell::from(card.card_type.as_str()),
                        Cell::from(format!("{done}/{}", card.items.len())),
                        Cell::from(app.formatter.format(card_total(card))),
                    ])
                    .style(p.card_header_style())
                }
                RowRef::Item(ci, ii) => {
                    let card = &record.cards[ci];
                    let item = &card.items[ii];
                    let check = if item.completed { "[x]" } else { "[ ]" };
                    let notes = if item.notes.is_empty() { "" } else { " ✎" };
                    let amount_style = match card.card_type {
                        CardType::Income => p.income_style(),
                        CardType::Expense | CardType::Transfer => p.expense_style(),
                        CardType::Savings => Style::default().fg(p.accent),
                    };
                    let style = if item.completed {
                        p.completed_style()
                    } else {
                        p.normal_style()
                    };
                    Row::new(vec![
                        Cell::from(format!("   {check} {}{notes}", truncate(&item.name, 40))),
                        Cell::from(display_date(&item.date)),
                        Cell::from(""),
                        Cell::from(Span::styled(app.formatter.format(item.amount), amount_style)),
                    ])
                    .style(style)
                }
            };
            if is_cursor {
                row.style(p.selected_style())
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Length(9),
        Constraint::Length(6),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.overlay))
            .title(Span::styled(
                format!(" Cards ({}) ", record.cards.len()),
                p.title_style(),
            )),
    );

    f.render_widget(table, area);
}
