#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::app::*;
use super::commands::{commit_edit, decline_pending_action, handle_command, run_pending_action};
use crate::currency::Currency;
use crate::db::Database;
use crate::ledger::LedgerError;
use crate::models::*;

fn key(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn setup() -> (Database, App) {
    let db = Database::open_in_memory().unwrap();
    crate::auth::login(&db, crate::auth::DEMO_EMAIL, crate::auth::DEMO_PASSWORD).unwrap();
    let app = App::open_at(&db, key("2025-03")).unwrap();
    (db, app)
}

fn confirm_yes(app: &mut App, db: &Database) {
    app.input_mode = InputMode::Normal;
    let action = app.pending_action.take().unwrap();
    run_pending_action(app, db, action).unwrap();
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn test_open_creates_month_and_next() {
    let (db, app) = setup();
    assert_eq!(app.month(), key("2025-03"));
    assert!(db.has_month(key("2025-03")).unwrap());
    assert!(db.has_month(key("2025-04")).unwrap());
    assert_eq!(app.user.as_deref(), Some(crate::auth::DEMO_EMAIL));
    assert!(!app.modified);
}

#[test]
fn test_default_totals() {
    let (_db, app) = setup();
    assert_eq!(app.totals.income, dec!(1800));
    assert_eq!(app.totals.expenses, dec!(1460));
    assert_eq!(app.totals.balance, dec!(340));
    assert_eq!(app.cumulative_savings, dec!(0));
    assert!(!app.has_loan);
}

#[test]
fn test_rows_list_cards_then_items() {
    let (_db, app) = setup();
    let rows = app.rows();
    assert_eq!(rows.len(), 5 + 11);
    assert_eq!(rows[0], RowRef::Card(0));
    assert_eq!(rows[1], RowRef::Item(0, 0));
    assert_eq!(app.selected_card().unwrap().id, INCOME_CARD_ID);
    assert!(app.selected_item().is_none());
}

// ── Month navigation ──────────────────────────────────────────

#[test]
fn test_forward_into_missing_month_asks_first() {
    let (db, mut app) = setup();
    app.request_month(&db, key("2025-06")).unwrap();

    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(
        app.pending_action,
        Some(PendingAction::CopyIntoMonth { target: key("2025-06") })
    );
    assert_eq!(app.month(), key("2025-03"));
    assert!(!db.has_month(key("2025-06")).unwrap());
}

#[test]
fn test_accepting_copy_prompt_copies_month() {
    let (db, mut app) = setup();
    commit_edit(
        &mut app,
        &db,
        EditTarget::NewItem {
            card_id: TRANSFERS_CARD_ID.into(),
        },
        "Mamá 120 2025-03-31",
    )
    .unwrap();
    app.request_month(&db, key("2025-06")).unwrap();
    confirm_yes(&mut app, &db);

    assert_eq!(app.month(), key("2025-06"));
    assert_eq!(app.record().copied_from, Some(key("2025-03")));
    assert_eq!(app.status_message, "Copied 2025-03 into 2025-06");
    let giros = app.record().find_card(TRANSFERS_CARD_ID).unwrap();
    assert_eq!(giros.items.len(), 1);
    assert_eq!(giros.items[0].date, "2025-06-30");
    assert!(!app.modified);
}

#[test]
fn test_declining_copy_prompt_uses_defaults() {
    let (db, mut app) = setup();
    app.request_month(&db, key("2025-06")).unwrap();
    let action = app.pending_action.take().unwrap();
    decline_pending_action(&mut app, &db, action).unwrap();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.month(), key("2025-06"));
    assert_eq!(app.record().copied_from, None);
    assert_eq!(app.record().cards.len(), 5);
}

#[test]
fn test_backward_navigation_never_asks() {
    let (db, mut app) = setup();
    app.request_month(&db, key("2025-01")).unwrap();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
    assert_eq!(app.month(), key("2025-01"));
    assert_eq!(app.record().copied_from, None);
    assert_eq!(app.status_message, "Month: 2025-01");
}

#[test]
fn test_next_from_last_month_stays_put() {
    let db = Database::open_in_memory().unwrap();
    crate::auth::login(&db, crate::auth::DEMO_EMAIL, crate::auth::DEMO_PASSWORD).unwrap();
    let mut app = App::open_at(&db, key("9999-12")).unwrap();
    let next = app.month().next();
    app.request_month(&db, next).unwrap();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
    assert_eq!(app.month(), key("9999-12"));
    assert!(!db.has_month(key("9999-01")).unwrap());
}

#[test]
fn test_precreated_next_month_still_asks() {
    let (db, mut app) = setup();
    handle_command("next-month", &mut app, &db).unwrap();

    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Copy 2025-03 into 2025-04?");
    assert_eq!(app.month(), key("2025-03"));
}

#[test]
fn test_edited_next_month_opens_directly() {
    let (db, mut app) = setup();
    app.request_month(&db, key("2025-04")).unwrap();
    confirm_yes(&mut app, &db);
    commit_edit(&mut app, &db, EditTarget::NewCard, "Mascotas").unwrap();
    app.request_month(&db, key("2025-03")).unwrap();

    handle_command("next-month", &mut app, &db).unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
    assert_eq!(app.month(), key("2025-04"));
    assert_eq!(app.record().cards.len(), 6);
}

#[test]
fn test_edit_navigate_copy_and_return() {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::open_at(&db, key("2025-03")).unwrap();
    for id in PROTECTED_CARD_IDS {
        assert!(app.record().find_card(id).is_some());
    }

    commit_edit(
        &mut app,
        &db,
        EditTarget::NewItem {
            card_id: VARIABLE_EXPENSES_CARD_ID.into(),
        },
        "Cine 50 2025-03-10",
    )
    .unwrap();
    let march = db.get_month(key("2025-03")).unwrap().unwrap();

    // L
    let next = app.month().next();
    app.request_month(&db, next).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Copy 2025-03 into 2025-04?");
    confirm_yes(&mut app, &db);

    assert_eq!(app.month(), key("2025-04"));
    let card = app.record().find_card(VARIABLE_EXPENSES_CARD_ID).unwrap();
    let cine = card.items.iter().find(|i| i.name == "Cine").unwrap();
    assert_eq!(cine.amount, dec!(50));
    assert_eq!(cine.date, "2025-04-10");
    assert!(!cine.completed);

    // H twice
    let prev = app.month().prev();
    app.request_month(&db, prev).unwrap();
    assert_eq!(app.month(), key("2025-03"));
    let prev = app.month().prev();
    app.request_month(&db, prev).unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.month(), key("2025-02"));

    let feb = app.record();
    assert_eq!(feb.copied_from, None);
    assert_eq!(feb.cards.len(), 5);
    assert!(feb
        .find_card(VARIABLE_EXPENSES_CARD_ID)
        .unwrap()
        .items
        .iter()
        .all(|i| i.name != "Cine"));
    assert_eq!(db.get_month(key("2025-03")).unwrap().unwrap(), march);
}

#[test]
fn test_month_command_rejects_bad_key() {
    let (db, mut app) = setup();
    handle_command("month 2025-13", &mut app, &db).unwrap();
    assert_eq!(app.month(), key("2025-03"));
    assert!(app.status_message.starts_with("Invalid month"));
}

// ── Edits ─────────────────────────────────────────────────────

#[test]
fn test_add_item_updates_totals_and_selection() {
    let (db, mut app) = setup();
    commit_edit(
        &mut app,
        &db,
        EditTarget::NewItem {
            card_id: TRANSFERS_CARD_ID.into(),
        },
        "Mamá 120,50",
    )
    .unwrap();

    assert_eq!(app.status_message, "Added: Mamá");
    assert_eq!(app.totals.expenses, dec!(1580.50));
    assert!(app.modified);
    let (card, item) = app.selected_item().unwrap();
    assert_eq!(card.id, TRANSFERS_CARD_ID);
    assert_eq!(item.name, "Mamá");
    assert!(key("2025-03").contains(&item.date));
}

#[test]
fn test_bad_amount_is_a_status_message() {
    let (db, mut app) = setup();
    let before = app.record().item_count();
    commit_edit(
        &mut app,
        &db,
        EditTarget::NewItem {
            card_id: TRANSFERS_CARD_ID.into(),
        },
        "Mamá lots",
    )
    .unwrap();

    assert!(app.status_message.starts_with("Invalid amount"));
    assert_eq!(app.record().item_count(), before);
}

#[test]
fn test_empty_card_title_is_rejected() {
    let (db, mut app) = setup();
    commit_edit(&mut app, &db, EditTarget::NewCard, "   ").unwrap();
    assert_eq!(app.status_message, LedgerError::EmptyCardTitle.to_string());
    assert_eq!(app.record().cards.len(), 5);
}

#[test]
fn test_edit_item_in_place() {
    let (db, mut app) = setup();
    app.row_index = 1;
    let (card_id, item_id) = {
        let (c, i) = app.selected_item().unwrap();
        (c.id.clone(), i.id.clone())
    };
    commit_edit(
        &mut app,
        &db,
        EditTarget::Item { card_id, item_id: item_id.clone() },
        "Salario neto 1650 2025-03-02",
    )
    .unwrap();

    let item = app.record().find_card(INCOME_CARD_ID).unwrap().find_item(&item_id).unwrap();
    assert_eq!(item.name, "Salario neto");
    assert_eq!(item.amount, dec!(1650));
    assert_eq!(item.date, "2025-03-02");
    assert_eq!(app.totals.income, dec!(1950));
}

// ── Deletion ──────────────────────────────────────────────────

#[test]
fn test_delete_protected_card_refused() {
    let (db, mut app) = setup();
    handle_command("delete", &mut app, &db).unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
    assert!(app.status_message.contains("cannot be deleted"));
}

#[test]
fn test_delete_item_after_confirmation() {
    let (db, mut app) = setup();
    app.row_index = 1;
    handle_command("delete", &mut app, &db).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Delete 'Salario' from INGRESO?");

    confirm_yes(&mut app, &db);
    assert_eq!(app.status_message, "Deleted: Salario");
    assert_eq!(app.totals.income, dec!(300));
    let stored = db.get_month(key("2025-03")).unwrap().unwrap();
    assert_eq!(stored.find_card(INCOME_CARD_ID).unwrap().items.len(), 1);
}

#[test]
fn test_delete_custom_card() {
    let (db, mut app) = setup();
    commit_edit(&mut app, &db, EditTarget::NewCard, "Mascotas").unwrap();
    assert_eq!(app.record().cards.len(), 6);
    assert_eq!(app.selected_card().unwrap().title, "Mascotas");

    handle_command("delete", &mut app, &db).unwrap();
    confirm_yes(&mut app, &db);
    assert_eq!(app.record().cards.len(), 5);
    assert_eq!(app.status_message, "Deleted card: Mascotas");
}

// ── Completion ────────────────────────────────────────────────

#[test]
fn test_toggle_on_card_row_asks_for_item() {
    let (db, mut app) = setup();
    app.toggle_selected(&db).unwrap();
    assert_eq!(app.status_message, "Select an item to mark it done");
}

#[test]
fn test_completing_every_item_celebrates() {
    let (db, mut app) = setup();
    let rows = app.rows();
    for (i, row) in rows.iter().enumerate() {
        if let RowRef::Item(..) = row {
            app.row_index = i;
            app.toggle_selected(&db).unwrap();
        }
    }
    assert_eq!(app.record().completed_count(), 11);
    assert!(app.status_message.contains("Everything for 2025-03 is done"));
    assert_eq!(app.cumulative_savings, dec!(300));
    assert_eq!(app.card_to_date(SAVINGS_CARD_ID), Some(dec!(300)));
    assert_eq!(app.card_to_date(INCOME_CARD_ID), None);
}

// ── Carry over ────────────────────────────────────────────────

#[test]
fn test_carry_overwrites_next_month() {
    let (db, mut app) = setup();
    commit_edit(&mut app, &db, EditTarget::NewCard, "Mascotas").unwrap();
    handle_command("carry", &mut app, &db).unwrap();
    assert_eq!(app.confirm_message, "Overwrite 2025-04 with a copy of 2025-03?");

    confirm_yes(&mut app, &db);
    let next = db.get_month(key("2025-04")).unwrap().unwrap();
    assert_eq!(next.cards.len(), 6);
    assert_eq!(next.copied_from, Some(key("2025-03")));
}

// ── Settings & commands ───────────────────────────────────────

#[test]
fn test_currency_command_persists() {
    let (db, mut app) = setup();
    handle_command("currency usd", &mut app, &db).unwrap();
    assert_eq!(app.formatter.current(), Currency::Usd);
    assert_eq!(db.get_config().unwrap().currency, Currency::Usd);

    handle_command("currency XYZ", &mut app, &db).unwrap();
    assert!(app.status_message.starts_with("Unknown currency"));
    assert_eq!(db.get_config().unwrap().currency, Currency::Usd);
}

#[test]
fn test_theme_command_toggles() {
    let (db, mut app) = setup();
    handle_command("theme", &mut app, &db).unwrap();
    assert_eq!(app.config.theme, Theme::Dark);
    assert_eq!(db.get_config().unwrap().theme, Theme::Dark);
}

#[test]
fn test_unknown_command_suggests() {
    let (db, mut app) = setup();
    handle_command("sumary", &mut app, &db).unwrap();
    assert_eq!(
        app.status_message,
        "Unknown command: :sumary. Did you mean :summary?"
    );
}

#[test]
fn test_logout_stops_app() {
    let (db, mut app) = setup();
    handle_command("logout", &mut app, &db).unwrap();
    assert!(!app.running);
    assert!(!crate::auth::is_authenticated(&db).unwrap());
}
