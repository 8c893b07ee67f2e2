use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme::Palette;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let p = app.palette();
    f.render_widget(Block::default().style(p.background_style()), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area(), p);
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = format!("{}", i + 1);
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), Style::default().fg(p.text_dim)),
                    Span::styled(
                        format!("{s}"),
                        Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(
                    format!("{num}:{s}"),
                    Style::default().fg(p.text_dim),
                ))
            }
        })
        .collect();

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(area);

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(p.overlay)))
        .style(p.header_style());
    f.render_widget(tabs, halves[0]);

    let month = Paragraph::new(Line::from(vec![
        Span::styled("◀ H ", p.dim_style()),
        Span::styled(
            app.month().to_string(),
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" L ▶ ", p.dim_style()),
    ]))
    .right_aligned()
    .style(p.header_style());
    f.render_widget(month, halves[1]);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Cards => super::screens::cards::render(f, area, app),
        Screen::Summary => super::screens::summary::render(f, area, app),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => p.accent,
        InputMode::Command | InputMode::Editing => p.green,
        InputMode::Confirm => p.red,
    };
    let mode_style = Style::default()
        .fg(p.header_bg)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let record = app.record();
    let mut info = format!(
        " {} | {} | {}/{} done",
        app.screen,
        app.month(),
        record.completed_count(),
        record.item_count()
    );
    if app.modified {
        info.push_str(" | modified");
    }
    if let Some(user) = &app.user {
        info.push_str(&format!(" | {user}"));
    }

    let right = match app.screen {
        Screen::Cards => " Space done | a add | e edit | d delete | ? help ",
        Screen::Summary => " H/L month | Tab cards | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.chars().count();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, p.status_bar_style()),
        Span::styled(" ".repeat(pad), p.status_bar_style()),
        Span::styled(right, p.status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette();
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(p.accent)),
                Span::styled(&app.command_input, p.command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Editing => {
            let prompt = app.edit_target.as_ref().map_or("edit> ", |t| t.prompt());
            (
                Line::from(vec![
                    Span::styled(prompt, Style::default().fg(p.green)),
                    Span::styled(&app.command_input, p.command_bar_style()),
                ]),
                Some((prompt.chars().count() + app.command_input.chars().count()) as u16),
            )
        }
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(p.yellow)),
                Span::styled(" [y/N] ", Style::default().fg(p.red)),
            ]),
            None,
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, ? for help",
                    p.dim_style(),
                ))
            } else {
                Line::from(Span::styled(&app.status_message, p.command_bar_style()))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(p.command_bg));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn render_help_overlay(f: &mut Frame, area: Rect, p: &Palette) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().fg(p.yellow).add_modifier(Modifier::BOLD),
        ))
    };
    let text = |s: &'static str| Line::from(Span::styled(s, p.normal_style()));

    let mut help_text = vec![
        Line::from(Span::styled(
            " BudgetCards Help ",
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Navigation"),
        text("  j/k or Up/Down   Move cursor           1-2        Switch screens"),
        text("  H/L              Prev/Next month       g/G        Top/Bottom"),
        text("  Tab              Cycle screens         Ctrl-d/u   Page Down/Up"),
        Line::from(""),
        section(" Month"),
        text("  Space            Mark item done        a          Add item to card"),
        text("  e                Edit item / card      n          Item notes"),
        text("  d                Delete item / card    A          Add card"),
        text("  :                Command mode          Ctrl-q     Quit"),
        Line::from(""),
        section(" Commands"),
    ];

    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 1 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<14} {desc}"),
            p.normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(p.text_dim),
    )));

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 76.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.accent))
            .style(Style::default().bg(p.header_bg)),
    );
    f.render_widget(help, popup_area);
}
