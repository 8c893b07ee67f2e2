use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::info;

use super::theme::Palette;
use crate::currency::CurrencyFormatter;
use crate::db::Database;
use crate::ledger::{self, LedgerError, MonthSession, MonthSummary, MonthTotals};
use crate::models::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Cards,
    Summary,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Cards, Self::Summary]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cards => write!(f, "Cards"),
            Self::Summary => write!(f, "Summary"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    /// Moving forward into a month that does not exist yet.
    CopyIntoMonth { target: MonthKey },
    DeleteItem { card_id: String, item_id: String, name: String },
    DeleteCard { card_id: String, title: String },
    CarryOver,
    ResetAll,
}

/// What the edit line is currently editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EditTarget {
    NewItem { card_id: String },
    Item { card_id: String, item_id: String },
    Notes { card_id: String, item_id: String },
    NewCard,
    CardTitle { card_id: String },
}

impl EditTarget {
    pub(crate) fn prompt(&self) -> &'static str {
        match self {
            Self::NewItem { .. } => "new item> ",
            Self::Item { .. } => "item> ",
            Self::Notes { .. } => "notes> ",
            Self::NewCard => "new card> ",
            Self::CardTitle { .. } => "title> ",
        }
    }
}

/// A line on the cards screen: a card header or one of its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowRef {
    Card(usize),
    Item(usize, usize),
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) user: Option<String>,

    pub(crate) config: AppConfig,
    pub(crate) formatter: CurrencyFormatter,

    // Viewed month
    pub(crate) session: MonthSession,
    pub(crate) modified: bool,
    pub(crate) totals: MonthTotals,
    pub(crate) row_index: usize,
    pub(crate) row_scroll: usize,

    // Summary
    pub(crate) cumulative_savings: Decimal,
    /// To-date totals of the viewed month's cumulative cards, by card id.
    pub(crate) card_to_date: Vec<(String, Decimal)>,
    pub(crate) remaining_loan: Decimal,
    pub(crate) has_loan: bool,
    pub(crate) history: Vec<MonthSummary>,
    pub(crate) distribution: Vec<(String, Decimal)>,

    // Editing & confirmation
    pub(crate) edit_target: Option<EditTarget>,
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    /// Open the current calendar month, pre-creating the next one.
    pub(crate) fn new(db: &Database) -> Result<Self> {
        Self::open_at(db, MonthKey::current())
    }

    pub(crate) fn open_at(db: &Database, month: MonthKey) -> Result<Self> {
        let config = db.get_config()?;
        let session = MonthSession::load(db, month)?;
        ledger::prepare_next_month(db, month)?;

        let mut app = Self {
            running: true,
            screen: Screen::Cards,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            user: crate::auth::current_user(db)?,

            config,
            formatter: CurrencyFormatter::new(config.currency),

            session,
            modified: false,
            totals: MonthTotals::default(),
            row_index: 0,
            row_scroll: 0,

            cumulative_savings: Decimal::ZERO,
            card_to_date: Vec::new(),
            remaining_loan: Decimal::ZERO,
            has_loan: false,
            history: Vec::new(),
            distribution: Vec::new(),

            edit_target: None,
            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        };
        app.refresh(db)?;
        Ok(app)
    }

    pub(crate) fn month(&self) -> MonthKey {
        self.session.month()
    }

    pub(crate) fn record(&self) -> &MonthRecord {
        self.session.record()
    }

    pub(crate) fn palette(&self) -> &'static Palette {
        Palette::for_theme(self.config.theme)
    }

    /// Recompute everything derived from the stored months.
    pub(crate) fn refresh(&mut self, db: &Database) -> Result<()> {
        let month = self.month();
        let months = db.all_months()?;
        self.totals = ledger::month_totals(self.record());
        self.modified = ledger::month_changed(db, month)?;
        self.cumulative_savings = ledger::cumulative_savings(&months, month);
        self.card_to_date = self
            .record()
            .cards
            .iter()
            .filter(|c| c.cumulative)
            .map(|c| (c.id.clone(), ledger::cumulative_card_total(&months, month, &c.id)))
            .collect();
        self.remaining_loan = ledger::remaining_loan(&months, month, LOAN_CARD_ID);
        self.has_loan = months
            .range(..=month)
            .any(|(_, r)| r.find_card(LOAN_CARD_ID).is_some());
        let upto: BTreeMap<MonthKey, MonthRecord> = months
            .range(..=month)
            .map(|(k, r)| (*k, r.clone()))
            .collect();
        self.history = ledger::historical_summaries(&upto, ledger::HISTORY_MONTHS);
        self.distribution = ledger::expense_distribution(self.record());
        self.clamp_cursor();
        Ok(())
    }

    pub(crate) fn card_to_date(&self, card_id: &str) -> Option<Decimal> {
        self.card_to_date
            .iter()
            .find(|(id, _)| id == card_id)
            .map(|(_, total)| *total)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Show a ledger rejection as a status message instead of failing.
    /// Other errors are passed on.
    pub(crate) fn check<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                if let Some(le) = e.downcast_ref::<LedgerError>() {
                    self.set_status(le.to_string());
                    return Ok(None);
                }
                Err(e)
            }
        }
    }

    pub(crate) fn confirm(&mut self, action: PendingAction, message: String) {
        self.pending_action = Some(action);
        self.confirm_message = message;
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn start_edit(&mut self, target: EditTarget, initial: String) {
        self.edit_target = Some(target);
        self.command_input = initial;
        self.input_mode = InputMode::Editing;
    }

    // ── Rows & selection ──────────────────────────────────────

    pub(crate) fn rows(&self) -> Vec<RowRef> {
        let mut rows = Vec::new();
        for (ci, card) in self.record().cards.iter().enumerate() {
            rows.push(RowRef::Card(ci));
            rows.extend((0..card.items.len()).map(|ii| RowRef::Item(ci, ii)));
        }
        rows
    }

    pub(crate) fn selected_row(&self) -> Option<RowRef> {
        self.rows().get(self.row_index).copied()
    }

    /// The card under the cursor, or the card owning the item under it.
    pub(crate) fn selected_card(&self) -> Option<&Card> {
        let ci = match self.selected_row()? {
            RowRef::Card(ci) | RowRef::Item(ci, _) => ci,
        };
        self.record().cards.get(ci)
    }

    pub(crate) fn selected_item(&self) -> Option<(&Card, &Item)> {
        match self.selected_row()? {
            RowRef::Item(ci, ii) => {
                let card = self.record().cards.get(ci)?;
                Some((card, card.items.get(ii)?))
            }
            RowRef::Card(_) => None,
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        if self.row_index >= len {
            self.row_index = len.saturating_sub(1);
        }
        if self.row_scroll > self.row_index {
            self.row_scroll = self.row_index;
        }
    }

    /// Put the cursor on the row for `item_id`, if present.
    pub(crate) fn select_item(&mut self, item_id: &str) {
        let target = self.rows().iter().position(|r| match r {
            RowRef::Item(ci, ii) => self.record().cards[*ci].items[*ii].id == item_id,
            RowRef::Card(_) => false,
        });
        if let Some(pos) = target {
            self.row_index = pos;
        }
    }

    // ── Month navigation ──────────────────────────────────────

    /// First phase of a month change. Asks before copying into a new month,
    /// otherwise switches straight away.
    pub(crate) fn request_month(&mut self, db: &Database, target: MonthKey) -> Result<()> {
        let plan = ledger::plan_navigation(db, self.month(), target)?;
        if plan.needs_copy_prompt {
            self.confirm(
                PendingAction::CopyIntoMonth { target },
                format!("Copy {} into {target}?", self.month()),
            );
            return Ok(());
        }
        self.go_to_month(db, target, false)
    }

    /// Second phase: resolve the month and switch to it.
    pub(crate) fn go_to_month(&mut self, db: &Database, target: MonthKey, copy: bool) -> Result<()> {
        let from = self.month();
        let prompted = ledger::plan_navigation(db, from, target)?.needs_copy_prompt;
        let record = ledger::navigate(db, from, target, copy)?;
        let copied = copy && prompted && record.copied_from == Some(from);
        self.session = MonthSession::from_record(target, record);
        self.row_index = 0;
        self.row_scroll = 0;
        self.refresh(db)?;
        if copied {
            self.set_status(format!("Copied {from} into {target}"));
        } else {
            self.set_status(format!("Month: {target}"));
        }
        Ok(())
    }

    /// Copy the viewed month over the next one and reload the view.
    pub(crate) fn carry_over(&mut self, db: &Database) -> Result<()> {
        let month = self.month();
        match ledger::carry_forward(db, month)? {
            Some(_) => self.set_status(format!("Copied {month} into {}", month.next())),
            None => self.set_status(format!("Nothing to copy from {month}")),
        }
        self.refresh(db)
    }

    // ── Edits ─────────────────────────────────────────────────

    pub(crate) fn toggle_selected(&mut self, db: &Database) -> Result<()> {
        let Some((card, item)) = self.selected_item() else {
            self.set_status("Select an item to mark it done");
            return Ok(());
        };
        let (card_id, item_id) = (card.id.clone(), item.id.clone());
        let result = self.session.toggle_completed(db, &card_id, &item_id);
        if let Some(all_done) = self.check(result)? {
            self.refresh(db)?;
            if all_done {
                info!(month = %self.month(), "All items completed");
                self.set_status(format!("🎉 Everything for {} is done!", self.month()));
            }
        }
        Ok(())
    }

    pub(crate) fn set_currency(&mut self, db: &Database, code: &str) -> Result<bool> {
        if !self.formatter.set_currency(code) {
            return Ok(false);
        }
        self.config.currency = self.formatter.current();
        db.save_config(&self.config)?;
        Ok(true)
    }

    pub(crate) fn set_theme(&mut self, db: &Database, theme: Theme) -> Result<()> {
        self.config.theme = theme;
        db.save_config(&self.config)
    }
}
