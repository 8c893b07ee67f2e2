use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, EditTarget, InputMode, PendingAction, RowRef, Screen};
use super::util::parse_item_input;
use crate::currency::Currency;
use crate::db::Database;
use crate::models::{MonthKey, Theme};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit", cmd_quit, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("cards", "Go to Cards", cmd_cards, r);
    register_command!("c", "Go to Cards", cmd_cards, r);
    register_command!("summary", "Go to Summary", cmd_summary, r);
    register_command!("s", "Go to Summary", cmd_summary, r);
    register_command!("month", "Go to month (e.g. :month 2025-03)", cmd_month, r);
    register_command!("m", "Go to month (e.g. :m 2025-03)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!(
        "add",
        "Add item to selected card (e.g. :add Cine 12,50 2025-03-14)",
        cmd_add,
        r
    );
    register_command!("card", "Add expense card (e.g. :card Mascotas)", cmd_card, r);
    register_command!("rename", "Rename selected card", cmd_rename, r);
    register_command!("notes", "Set notes on selected item", cmd_notes, r);
    register_command!("delete", "Delete selected item or card", cmd_delete, r);
    register_command!("carry", "Copy this month into the next one", cmd_carry, r);
    register_command!(
        "export",
        "Export month to CSV (e.g. :export ~/marzo.csv)",
        cmd_export,
        r
    );
    register_command!("currency", "Set currency (e.g. :currency USD)", cmd_currency, r);
    register_command!("theme", "Switch theme (e.g. :theme dark)", cmd_theme, r);
    register_command!("logout", "Log out and quit", cmd_logout, r);
    register_command!("reset", "Delete all stored data", cmd_reset, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_cards(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Cards;
    Ok(())
}

fn cmd_summary(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Summary;
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    if args.is_empty() {
        return app.request_month(db, MonthKey::current());
    }
    match args.parse::<MonthKey>() {
        Ok(target) => app.request_month(db, target),
        Err(e) => {
            app.set_status(e.to_string());
            Ok(())
        }
    }
}

fn cmd_next_month(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let target = app.month().next();
    app.request_month(db, target)
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let target = app.month().prev();
    app.request_month(db, target)
}

fn cmd_add(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let Some(card_id) = app.selected_card().map(|c| c.id.clone()) else {
        app.set_status("Select a card first");
        return Ok(());
    };
    if args.is_empty() {
        app.start_edit(EditTarget::NewItem { card_id }, String::new());
        return Ok(());
    }
    commit_edit(app, db, EditTarget::NewItem { card_id }, args)
}

fn cmd_card(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.start_edit(EditTarget::NewCard, String::new());
        return Ok(());
    }
    commit_edit(app, db, EditTarget::NewCard, args)
}

fn cmd_rename(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let Some((card_id, title)) = app.selected_card().map(|c| (c.id.clone(), c.title.clone()))
    else {
        app.set_status("Select a card first");
        return Ok(());
    };
    if args.is_empty() {
        app.start_edit(EditTarget::CardTitle { card_id }, title);
        return Ok(());
    }
    commit_edit(app, db, EditTarget::CardTitle { card_id }, args)
}

fn cmd_notes(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let Some((card_id, item_id, notes)) = app
        .selected_item()
        .map(|(c, i)| (c.id.clone(), i.id.clone(), i.notes.clone()))
    else {
        app.set_status("Select an item first");
        return Ok(());
    };
    let target = EditTarget::Notes { card_id, item_id };
    if args.is_empty() {
        app.start_edit(target, notes);
        return Ok(());
    }
    commit_edit(app, db, target, args)
}

fn cmd_delete(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    match app.selected_row() {
        Some(RowRef::Item(..)) => {
            if let Some((card, item)) = app.selected_item() {
                let action = PendingAction::DeleteItem {
                    card_id: card.id.clone(),
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                };
                let message = format!("Delete '{}' from {}?", item.name, card.title);
                app.confirm(action, message);
            }
        }
        Some(RowRef::Card(_)) => {
            if let Some(card) = app.selected_card() {
                if card.is_protected() {
                    let message = format!("{} is a default card and cannot be deleted", card.title);
                    app.set_status(message);
                    return Ok(());
                }
                let action = PendingAction::DeleteCard {
                    card_id: card.id.clone(),
                    title: card.title.clone(),
                };
                let message = format!(
                    "Delete card {} and its {} items?",
                    card.title,
                    card.items.len()
                );
                app.confirm(action, message);
            }
        }
        None => app.set_status("Nothing selected"),
    }
    Ok(())
}

fn cmd_carry(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let next = app.month().next();
    let message = if db.has_month(next)? {
        format!("Overwrite {next} with a copy of {}?", app.month())
    } else {
        format!("Copy {} into {next}?", app.month())
    };
    app.confirm(PendingAction::CarryOver, message);
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        crate::export::default_export_path(app.month())
    } else {
        crate::run::shellexpand(args)
    };

    let count = crate::export::export_month_csv(app.record(), std::path::Path::new(&path))?;
    if count == 0 {
        app.set_status(format!("No items to export for {}", app.month()));
    } else {
        app.set_status(format!("Exported {count} items to {path}"));
    }
    Ok(())
}

fn cmd_currency(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let codes: Vec<&str> = Currency::all().iter().map(|c| c.code()).collect();
    if args.is_empty() {
        let current = app.formatter.current();
        app.set_status(format!(
            "Currency: {} ({}). Available: {}",
            current.code(),
            current.name(),
            codes.join(", ")
        ));
        return Ok(());
    }
    if app.set_currency(db, args)? {
        let current = app.formatter.current();
        app.set_status(format!("Currency set to {} ({})", current.code(), current.name()));
    } else {
        app.set_status(format!(
            "Unknown currency: {args}. Available: {}",
            codes.join(", ")
        ));
    }
    Ok(())
}

fn cmd_theme(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let theme = if args.is_empty() {
        app.config.theme.toggled()
    } else if let Some(t) = Theme::parse(args) {
        t
    } else {
        app.set_status(format!("Unknown theme: {args}. Use light or dark"));
        return Ok(());
    };
    app.set_theme(db, theme)?;
    app.set_status(format!("Theme: {theme}"));
    Ok(())
}

fn cmd_logout(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    crate::auth::logout(db)?;
    app.user = None;
    app.running = false;
    Ok(())
}

fn cmd_reset(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.confirm(
        PendingAction::ResetAll,
        "Delete ALL months, settings and the session?".into(),
    );
    Ok(())
}

// ── Edits & confirmed actions ────────────────────────────────

/// Apply the text from the edit line to `target`.
pub(crate) fn commit_edit(
    app: &mut App,
    db: &Database,
    target: EditTarget,
    input: &str,
) -> anyhow::Result<()> {
    match target {
        EditTarget::NewItem { card_id } => {
            let draft = match parse_item_input(input) {
                Ok(d) => d,
                Err(msg) => {
                    app.set_status(msg);
                    return Ok(());
                }
            };
            let name = draft.name.trim().to_string();
            let result = app.session.add_item(db, &card_id, draft);
            if let Some(item_id) = app.check(result)? {
                app.refresh(db)?;
                app.select_item(&item_id);
                app.set_status(format!("Added: {name}"));
            }
        }
        EditTarget::Item { card_id, item_id } => {
            let draft = match parse_item_input(input) {
                Ok(d) => d,
                Err(msg) => {
                    app.set_status(msg);
                    return Ok(());
                }
            };
            let result = app.session.update_item(db, &card_id, &item_id, draft);
            if app.check(result)?.is_some() {
                app.refresh(db)?;
                app.set_status("Item updated");
            }
        }
        EditTarget::Notes { card_id, item_id } => {
            let result = app.session.set_item_notes(db, &card_id, &item_id, input);
            if app.check(result)?.is_some() {
                app.refresh(db)?;
                app.set_status("Notes saved");
            }
        }
        EditTarget::NewCard => {
            let result = app.session.add_card(db, input);
            if app.check(result)?.is_some() {
                app.refresh(db)?;
                let last = app.rows().len().saturating_sub(1);
                app.row_index = last;
                app.set_status(format!("Added card: {}", input.trim()));
            }
        }
        EditTarget::CardTitle { card_id } => {
            let result = app.session.rename_card(db, &card_id, input);
            if app.check(result)?.is_some() {
                app.refresh(db)?;
                app.set_status(format!("Renamed to: {}", input.trim()));
            }
        }
    }
    Ok(())
}

/// Run an action the user just said yes to.
pub(crate) fn run_pending_action(
    app: &mut App,
    db: &Database,
    action: PendingAction,
) -> anyhow::Result<()> {
    match action {
        PendingAction::CopyIntoMonth { target } => app.go_to_month(db, target, true)?,
        PendingAction::DeleteItem {
            card_id,
            item_id,
            name,
        } => {
            let result = app.session.delete_item(db, &card_id, &item_id);
            if app.check(result)?.is_some() {
                app.refresh(db)?;
                app.set_status(format!("Deleted: {name}"));
            }
        }
        PendingAction::DeleteCard { card_id, title } => {
            let result = app.session.delete_card(db, &card_id);
            if app.check(result)?.is_some() {
                app.refresh(db)?;
                app.set_status(format!("Deleted card: {title}"));
            }
        }
        PendingAction::CarryOver => app.carry_over(db)?,
        PendingAction::ResetAll => {
            db.reset_all()?;
            app.running = false;
        }
    }
    Ok(())
}

/// The user said no. Declining the copy prompt still moves to the month,
/// starting it from the default cards.
pub(crate) fn decline_pending_action(
    app: &mut App,
    db: &Database,
    action: PendingAction,
) -> anyhow::Result<()> {
    match action {
        PendingAction::CopyIntoMonth { target } => app.go_to_month(db, target, false)?,
        _ => app.set_status("Cancelled"),
    }
    app.input_mode = InputMode::Normal;
    Ok(())
}
