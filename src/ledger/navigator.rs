use anyhow::Result;
use tracing::info;

use crate::db::Database;
use crate::models::{MonthKey, MonthRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
    Same,
}

/// First phase of a month change: what will happen, and whether the user
/// has to be asked about copying first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NavigationPlan {
    pub(crate) current: MonthKey,
    pub(crate) target: MonthKey,
    pub(crate) direction: Direction,
    pub(crate) needs_copy_prompt: bool,
}

pub(crate) fn plan_navigation(
    db: &Database,
    current: MonthKey,
    target: MonthKey,
) -> Result<NavigationPlan> {
    let direction = match target.cmp(&current) {
        std::cmp::Ordering::Greater => Direction::Forward,
        std::cmp::Ordering::Less => Direction::Backward,
        std::cmp::Ordering::Equal => Direction::Same,
    };
    // A month only copied ahead at startup has not been used yet and may be
    // replaced.
    let needs_copy_prompt = direction == Direction::Forward
        && db
            .get_month(target)?
            .map_or(true, |record| record.metadata.precreated);
    Ok(NavigationPlan {
        current,
        target,
        direction,
        needs_copy_prompt,
    })
}

/// Second phase: resolve and persist the target month. Copies `current`
/// only when moving forward into a month that does not exist yet and the
/// user agreed.
pub(crate) fn navigate(
    db: &Database,
    current: MonthKey,
    target: MonthKey,
    should_copy: bool,
) -> Result<MonthRecord> {
    let plan = plan_navigation(db, current, target)?;
    if plan.needs_copy_prompt {
        if should_copy {
            if let Some(record) = db.copy_month_to(current, target)? {
                return Ok(record);
            }
        }
        if db.has_month(target)? {
            // Declined: the month copied ahead gives way to the default cards.
            let mut record = MonthRecord::default_for(target);
            db.put_month(target, &mut record)?;
            info!(month = %target, "Replaced pre-created month with default cards");
            return Ok(record);
        }
    }
    info!(from = %current, to = %target, "Navigating");
    db.get_or_create_month(target)
}

/// Clone `source` as the starting point for `target`.
///
/// Completion flags are cleared and every item date is moved into `target`,
/// clamping the day to the end of the month.
pub(crate) fn copy_month(
    source_key: MonthKey,
    source: &MonthRecord,
    target: MonthKey,
) -> MonthRecord {
    let mut copy = source.clone();
    copy.copied_from = Some(source_key);
    copy.last_modified = None;
    copy.metadata.precreated = false;
    for item in copy.cards.iter_mut().flat_map(|c| c.items.iter_mut()) {
        item.completed = false;
        item.shift_into(target);
    }
    copy
}

/// Copy `month` into the following month, overwriting it.
pub(crate) fn carry_forward(db: &Database, month: MonthKey) -> Result<Option<MonthRecord>> {
    let next = month.next();
    // 9999-12 has no following month
    if next == month {
        return Ok(None);
    }
    db.copy_month_to(month, next)
}

/// Pre-create the month after `current` from `current`, if it is missing.
/// Returns true when a month was created.
pub(crate) fn prepare_next_month(db: &Database, current: MonthKey) -> Result<bool> {
    let next = current.next();
    if db.has_month(next)? {
        return Ok(false);
    }
    let Some(source) = db.get_month(current)? else {
        return Ok(false);
    };
    let mut record = copy_month(current, &source, next);
    record.metadata.precreated = true;
    db.put_month(next, &mut record)?;
    info!(month = %next, "Pre-created next month");
    Ok(true)
}
