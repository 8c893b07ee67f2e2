use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{Card, CardType, MonthKey, MonthRecord};

type Months = BTreeMap<MonthKey, MonthRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct MonthTotals {
    pub(crate) income: Decimal,
    pub(crate) expenses: Decimal,
    pub(crate) balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthSummary {
    pub(crate) month: MonthKey,
    pub(crate) income: Decimal,
    pub(crate) expenses: Decimal,
    pub(crate) balance: Decimal,
}

/// A card's total. Savings only count what has actually been set aside.
pub(crate) fn card_total(card: &Card) -> Decimal {
    match card.card_type {
        CardType::Savings => card
            .items
            .iter()
            .filter(|i| i.completed)
            .map(|i| i.amount)
            .sum(),
        CardType::Income | CardType::Expense | CardType::Transfer => {
            card.items.iter().map(|i| i.amount).sum()
        }
    }
}

/// Income against everything leaving the account: expenses, savings and
/// transfers.
pub(crate) fn month_totals(record: &MonthRecord) -> MonthTotals {
    let mut totals = MonthTotals::default();
    for card in &record.cards {
        let total = card_total(card);
        match card.card_type {
            CardType::Income => totals.income += total,
            CardType::Expense | CardType::Savings | CardType::Transfer => totals.expenses += total,
        }
    }
    totals.balance = totals.income - totals.expenses;
    totals
}

fn months_upto(months: &Months, upto: MonthKey) -> impl Iterator<Item = &MonthRecord> {
    months.range(..=upto).map(|(_, record)| record)
}

fn completed_sum<'a>(cards: impl Iterator<Item = &'a Card>) -> Decimal {
    cards
        .flat_map(|c| c.items.iter())
        .filter(|i| i.completed)
        .map(|i| i.amount)
        .sum()
}

/// Completed savings across every stored month up to and including `upto`.
pub(crate) fn cumulative_savings(months: &Months, upto: MonthKey) -> Decimal {
    months_upto(months, upto)
        .map(|r| completed_sum(r.cards.iter().filter(|c| c.card_type == CardType::Savings)))
        .sum()
}

/// Completed amounts of a single card across months up to `upto`.
pub(crate) fn cumulative_card_total(months: &Months, upto: MonthKey, card_id: &str) -> Decimal {
    months_upto(months, upto)
        .map(|r| completed_sum(r.find_card(card_id).into_iter()))
        .sum()
}

/// Principal minus every payment made up to `upto`, never below zero.
///
/// The principal is taken from the first month whose card has a non-zero
/// `loanTotal`.
pub(crate) fn remaining_loan(months: &Months, upto: MonthKey, card_id: &str) -> Decimal {
    let mut principal = Decimal::ZERO;
    let mut payments = Decimal::ZERO;
    for card in months_upto(months, upto).filter_map(|r| r.find_card(card_id)) {
        if principal.is_zero() {
            if let Some(total) = card.loan_total.filter(|t| !t.is_zero()) {
                principal = total;
            }
        }
        payments += card.items.iter().map(|i| i.amount).sum::<Decimal>();
    }
    (principal - payments).max(Decimal::ZERO)
}

/// Totals for the last `n` stored months, oldest first.
pub(crate) fn historical_summaries(months: &Months, n: usize) -> Vec<MonthSummary> {
    let skip = months.len().saturating_sub(n);
    months
        .iter()
        .skip(skip)
        .map(|(month, record)| {
            let t = month_totals(record);
            MonthSummary {
                month: *month,
                income: t.income,
                expenses: t.expenses,
                balance: t.balance,
            }
        })
        .collect()
}

/// `(title, total)` for expense and transfer cards that have a positive total.
pub(crate) fn expense_distribution(record: &MonthRecord) -> Vec<(String, Decimal)> {
    record
        .cards
        .iter()
        .filter(|c| matches!(c.card_type, CardType::Expense | CardType::Transfer))
        .map(|c| (c.title.clone(), card_total(c)))
        .filter(|(_, total)| *total > Decimal::ZERO)
        .collect()
}

/// True when the month has items and all of them are completed.
pub(crate) fn all_completed(record: &MonthRecord) -> bool {
    let mut items = record.cards.iter().flat_map(|c| c.items.iter()).peekable();
    items.peek().is_some() && items.all(|i| i.completed)
}
