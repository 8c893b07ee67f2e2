use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),      // Summary cards
            Constraint::Percentage(55), // History
            Constraint::Min(6),         // Distribution
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_history_chart(f, chunks[1], app);
    render_distribution(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    let balance_color = if app.totals.balance >= Decimal::ZERO {
        p.green
    } else {
        p.red
    };
    let loan = if app.has_loan {
        app.formatter.format(app.remaining_loan)
    } else {
        "none".to_string()
    };

    render_card(f, cards[0], app, "Income", app.formatter.format(app.totals.income), p.green);
    render_card(f, cards[1], app, "Expenses", app.formatter.format(app.totals.expenses), p.red);
    render_card(f, cards[2], app, "Balance", app.formatter.format(app.totals.balance), balance_color);
    render_card(
        f,
        cards[3],
        app,
        "Saved to date",
        app.formatter.format(app.cumulative_savings),
        p.accent,
    );
    render_card(f, cards[4], app, "Loan left", loan, p.yellow);
}

fn render_card(f: &mut Frame, area: Rect, app: &App, title: &str, display: String, color: Color) {
    let p = app.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.overlay))
        .title(Span::styled(format!(" {title} "), p.title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn bar_value(amount: Decimal) -> u64 {
    amount.max(Decimal::ZERO).round().to_u64().unwrap_or(0)
}

fn render_history_chart(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.overlay))
        .title(Span::styled(
            format!(" Last {} months: income vs expenses ", app.history.len()),
            p.title_style(),
        ));

    if app.history.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled("No history yet", p.dim_style())))
            .centered()
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let mut chart = BarChart::default()
        .block(block)
        .bar_width(7)
        .bar_gap(1)
        .group_gap(3)
        .value_style(Style::default().fg(p.header_bg).add_modifier(Modifier::BOLD));

    for summary in &app.history {
        let bars = [
            Bar::default()
                .value(bar_value(summary.income))
                .style(Style::default().fg(p.green)),
            Bar::default()
                .value(bar_value(summary.expenses))
                .style(Style::default().fg(p.red)),
        ];
        let label = summary.month.to_string();
        let label_style = if summary.month == app.month() {
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
        } else {
            p.dim_style()
        };
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(Span::styled(label, label_style)))
                .bars(&bars),
        );
    }

    f.render_widget(chart, area);
}

fn render_distribution(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.overlay))
        .title(Span::styled(" Where the money goes ", p.title_style()));

    let total: Decimal = app.distribution.iter().map(|(_, v)| *v).sum();
    if app.distribution.is_empty() || total.is_zero() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses this month",
            p.dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let width = area.width.saturating_sub(44).max(10) as usize;
    let lines: Vec<Line> = app
        .distribution
        .iter()
        .map(|(title, amount)| {
            let share = (*amount / total).to_f64().unwrap_or(0.0);
            let filled = (share * width as f64).round() as usize;
            Line::from(vec![
                Span::styled(format!(" {:<18}", truncate(title, 18)), p.normal_style()),
                Span::styled("█".repeat(filled), Style::default().fg(p.accent)),
                Span::styled(
                    format!(" {:>5.1}%  ", share * 100.0),
                    p.dim_style(),
                ),
                Span::styled(app.formatter.format(*amount), p.expense_style()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
