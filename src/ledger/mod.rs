//! Month-level budgeting logic: moving between months, carrying a month
//! forward, detecting edits and rolling totals across months.

mod aggregate;
mod changes;
mod error;
mod navigator;
mod session;

pub(crate) use aggregate::{
    card_total, cumulative_card_total, cumulative_savings, expense_distribution,
    historical_summaries, month_totals, remaining_loan, MonthSummary, MonthTotals,
};
pub(crate) use changes::month_changed;
pub(crate) use error::LedgerError;
pub(crate) use navigator::{
    carry_forward, copy_month, navigate, plan_navigation, prepare_next_month,
};
#[cfg(test)]
pub(crate) use {aggregate::all_completed, changes::cards_changed, navigator::Direction};
pub(crate) use session::{ItemDraft, MonthSession};

/// Months shown in the history chart.
pub(crate) const HISTORY_MONTHS: usize = 6;
