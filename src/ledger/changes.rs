use anyhow::Result;

use crate::db::Database;
use crate::models::{Card, MonthKey, MonthRecord};

/// Structural comparison of two card lists. Only card count, item count,
/// item names and item amounts count as changes; dates, ids, notes and
/// completion are ignored.
pub(crate) fn cards_changed(current: &[Card], reference: &[Card]) -> bool {
    if current.len() != reference.len() {
        return true;
    }
    current.iter().zip(reference).any(|(cur, refc)| {
        cur.items.len() != refc.items.len()
            || cur
                .items
                .iter()
                .zip(&refc.items)
                .any(|(a, b)| a.amount != b.amount || a.name != b.name)
    })
}

/// Has `month` been edited relative to where it started: the month it was
/// copied from, or the default layout.
pub(crate) fn month_changed(db: &Database, month: MonthKey) -> Result<bool> {
    let Some(current) = db.get_month(month)? else {
        return Ok(false);
    };
    let reference = match current.copied_from {
        Some(source) => db.get_month(source)?,
        None => Some(MonthRecord::default_for(month)),
    };
    Ok(reference.is_some_and(|r| cards_changed(&current.cards, &r.cards)))
}
