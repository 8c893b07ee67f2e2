mod card;
mod config;
mod month;
mod month_key;
mod session;

pub(crate) use card::{Card, CardType, Item};
pub(crate) use config::{AppConfig, Theme};
pub(crate) use month::{MonthRecord, LOAN_CARD_ID, PROTECTED_CARD_IDS};
#[cfg(test)]
pub(crate) use month::{
    FIXED_EXPENSES_CARD_ID, INCOME_CARD_ID, SAVINGS_CARD_ID, TRANSFERS_CARD_ID,
    VARIABLE_EXPENSES_CARD_ID,
};
pub(crate) use month_key::MonthKey;
pub(crate) use session::Session;
