use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

use crate::db::Database;
use crate::ui::app::{App, EditTarget, InputMode, RowRef, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &Database) -> Result<()> {
    let mut app = App::new(db)?;
    info!(month = %app.month(), "Starting TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!(error = %e, "TUI exited with error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Editing => handle_editing_input(key, app, db)?,
                InputMode::Confirm => handle_confirm_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

/// Rows of the card table that fit on screen (month header and borders excluded).
fn page(app: &App) -> usize {
    app.visible_rows.saturating_sub(5).max(1)
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    app.status_message.clear();
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.rows().len();
            let page = page(app);
            scroll_down(&mut app.row_index, &mut app.row_scroll, len, page);
        }
        KeyCode::Char('k') | KeyCode::Up => scroll_up(&mut app.row_index, &mut app.row_scroll),
        KeyCode::Char('1') => app.screen = Screen::Cards,
        KeyCode::Char('2') => app.screen = Screen::Summary,
        KeyCode::Tab | KeyCode::BackTab => {
            app.screen = match app.screen {
                Screen::Cards => Screen::Summary,
                Screen::Summary => Screen::Cards,
            };
        }
        KeyCode::Char('g') => scroll_to_top(&mut app.row_index, &mut app.row_scroll),
        KeyCode::Char('G') => {
            let len = app.rows().len();
            let page = page(app);
            scroll_to_bottom(&mut app.row_index, &mut app.row_scroll, len, page);
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let len = app.rows().len();
            let page = page(app);
            for _ in 0..page / 2 {
                scroll_down(&mut app.row_index, &mut app.row_scroll, len, page);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..page(app) / 2 {
                scroll_up(&mut app.row_index, &mut app.row_scroll);
            }
        }
        KeyCode::Char('H') => {
            let target = app.month().prev();
            app.request_month(db, target)?;
        }
        KeyCode::Char('L') => {
            let target = app.month().next();
            app.request_month(db, target)?;
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char(' ') | KeyCode::Enter if app.screen == Screen::Cards => {
            app.toggle_selected(db)?;
        }
        KeyCode::Char('a') if app.screen == Screen::Cards => {
            commands::handle_command("add", app, db)?;
        }
        KeyCode::Char('A') if app.screen == Screen::Cards => {
            app.start_edit(EditTarget::NewCard, String::new());
        }
        KeyCode::Char('e') if app.screen == Screen::Cards => start_edit_selected(app),
        KeyCode::Char('n') if app.screen == Screen::Cards => {
            commands::handle_command("notes", app, db)?;
        }
        KeyCode::Char('d') if app.screen == Screen::Cards => {
            commands::handle_command("delete", app, db)?;
        }
        _ => {}
    }
    Ok(())
}

/// Prefill the edit line with the selected item ("name amount date") or card title.
fn start_edit_selected(app: &mut App) {
    match app.selected_row() {
        Some(RowRef::Item(..)) => {
            if let Some((card, item)) = app.selected_item() {
                let target = EditTarget::Item {
                    card_id: card.id.clone(),
                    item_id: item.id.clone(),
                };
                let initial = format!("{} {} {}", item.name, item.amount, item.date);
                app.start_edit(target, initial);
            }
        }
        Some(RowRef::Card(_)) => {
            if let Some(card) = app.selected_card() {
                let target = EditTarget::CardTitle {
                    card_id: card.id.clone(),
                };
                let initial = card.title.clone();
                app.start_edit(target, initial);
            }
        }
        None => app.set_status("Nothing selected"),
    }
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            if let Some(target) = app.edit_target.take() {
                commands::commit_edit(app, db, target, &input)?;
            }
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.edit_target = None;
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            if let Some(action) = app.pending_action.take() {
                commands::run_pending_action(app, db, action)?;
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            if let Some(action) = app.pending_action.take() {
                commands::decline_pending_action(app, db, action)?;
            }
        }
        KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Ok(())
}
