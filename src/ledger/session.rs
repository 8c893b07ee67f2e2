use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::{aggregate, LedgerError};
use crate::db::Database;
use crate::models::{Card, Item, MonthKey, MonthRecord};

/// User input for creating or updating an item.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ItemDraft {
    pub(crate) name: String,
    pub(crate) amount: Decimal,
    /// "YYYY-MM-DD". Defaults to the first day of the month when absent.
    pub(crate) date: Option<String>,
}

/// The month being viewed and edited. Every change is written back to the
/// store immediately.
#[derive(Debug, Clone)]
pub(crate) struct MonthSession {
    month: MonthKey,
    record: MonthRecord,
}

impl MonthSession {
    pub(crate) fn load(db: &Database, month: MonthKey) -> Result<Self> {
        let record = db.get_or_create_month(month)?;
        Ok(Self { month, record })
    }

    /// Wrap an already resolved record, e.g. the result of navigation.
    pub(crate) fn from_record(month: MonthKey, record: MonthRecord) -> Self {
        Self { month, record }
    }

    pub(crate) fn month(&self) -> MonthKey {
        self.month
    }

    pub(crate) fn record(&self) -> &MonthRecord {
        &self.record
    }

    fn save(&mut self, db: &Database) -> Result<()> {
        self.record.metadata.precreated = false;
        db.put_month(self.month, &mut self.record)
    }

    fn card_mut(&mut self, card_id: &str) -> Result<&mut Card, LedgerError> {
        self.record
            .find_card_mut(card_id)
            .ok_or_else(|| LedgerError::CardNotFound(card_id.to_string()))
    }

    fn item_mut(&mut self, card_id: &str, item_id: &str) -> Result<&mut Item, LedgerError> {
        self.card_mut(card_id)?
            .find_item_mut(item_id)
            .ok_or_else(|| LedgerError::ItemNotFound(item_id.to_string()))
    }

    fn resolve_date(&self, date: Option<String>) -> String {
        match date {
            Some(d) if !d.trim().is_empty() => d.trim().to_string(),
            _ => self.month.first_day().format("%Y-%m-%d").to_string(),
        }
    }

    fn validated_name(name: &str) -> Result<String, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyItemName);
        }
        Ok(name.to_string())
    }

    fn validated_title(title: &str) -> Result<String, LedgerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LedgerError::EmptyCardTitle);
        }
        Ok(title.to_string())
    }

    // ── Items ─────────────────────────────────────────────────

    /// Returns the new item's id.
    pub(crate) fn add_item(
        &mut self,
        db: &Database,
        card_id: &str,
        draft: ItemDraft,
    ) -> Result<String> {
        let name = Self::validated_name(&draft.name)?;
        let date = self.resolve_date(draft.date);
        let item = Item::new(name, draft.amount, date);
        let id = item.id.clone();
        self.card_mut(card_id)?.items.push(item);
        self.save(db)?;
        info!(month = %self.month, card = card_id, item = %id, "Added item");
        Ok(id)
    }

    pub(crate) fn update_item(
        &mut self,
        db: &Database,
        card_id: &str,
        item_id: &str,
        draft: ItemDraft,
    ) -> Result<()> {
        let name = Self::validated_name(&draft.name)?;
        let date = self.resolve_date(draft.date);
        let item = self.item_mut(card_id, item_id)?;
        item.name = name;
        item.amount = draft.amount;
        item.date = date;
        self.save(db)?;
        debug!(month = %self.month, card = card_id, item = item_id, "Updated item");
        Ok(())
    }

    pub(crate) fn set_item_notes(
        &mut self,
        db: &Database,
        card_id: &str,
        item_id: &str,
        notes: &str,
    ) -> Result<()> {
        self.item_mut(card_id, item_id)?.notes = notes.trim().to_string();
        self.save(db)
    }

    pub(crate) fn delete_item(&mut self, db: &Database, card_id: &str, item_id: &str) -> Result<()> {
        let card = self.card_mut(card_id)?;
        let before = card.items.len();
        card.items.retain(|i| i.id != item_id);
        if card.items.len() == before {
            return Err(LedgerError::ItemNotFound(item_id.to_string()).into());
        }
        self.save(db)?;
        info!(month = %self.month, card = card_id, item = item_id, "Deleted item");
        Ok(())
    }

    /// Flip an item's completed flag. Returns true when this leaves every
    /// item in the month completed.
    pub(crate) fn toggle_completed(
        &mut self,
        db: &Database,
        card_id: &str,
        item_id: &str,
    ) -> Result<bool> {
        let item = self.item_mut(card_id, item_id)?;
        item.completed = !item.completed;
        let now_completed = item.completed;
        self.save(db)?;
        Ok(now_completed && aggregate::all_completed(&self.record))
    }

    // ── Cards ─────────────────────────────────────────────────

    /// Add a custom expense card. Returns its id.
    pub(crate) fn add_card(&mut self, db: &Database, title: &str) -> Result<String> {
        let card = Card::new_custom(Self::validated_title(title)?);
        let id = card.id.clone();
        self.record.cards.push(card);
        self.save(db)?;
        info!(month = %self.month, card = %id, "Added card");
        Ok(id)
    }

    pub(crate) fn rename_card(&mut self, db: &Database, card_id: &str, title: &str) -> Result<()> {
        let title = Self::validated_title(title)?;
        let card = self.card_mut(card_id)?;
        if !card.editable {
            return Err(LedgerError::CardNotEditable(card_id.to_string()).into());
        }
        card.title = title;
        self.save(db)
    }

    pub(crate) fn delete_card(&mut self, db: &Database, card_id: &str) -> Result<()> {
        let card = self
            .record
            .find_card(card_id)
            .ok_or_else(|| LedgerError::CardNotFound(card_id.to_string()))?;
        if card.is_protected() {
            return Err(LedgerError::ProtectedCard(card.title.clone()).into());
        }
        self.record.cards.retain(|c| c.id != card_id);
        self.save(db)?;
        info!(month = %self.month, card = card_id, "Deleted card");
        Ok(())
    }
}
