use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MonthKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum CardType {
    Income,
    Expense,
    Savings,
    Transfer,
}

impl CardType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Savings => "savings",
            Self::Transfer => "transfer",
        }
    }

    #[cfg(test)]
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            "savings" | "saving" => Some(Self::Savings),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn all() -> &'static [CardType] {
        &[Self::Income, Self::Expense, Self::Savings, Self::Transfer]
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Item {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) amount: Decimal,
    /// Format: "YYYY-MM-DD"
    #[serde(default)]
    pub(crate) date: String,
    #[serde(default)]
    pub(crate) completed: bool,
    #[serde(default)]
    pub(crate) notes: String,
}

impl Item {
    pub(crate) fn new(name: String, amount: Decimal, date: String) -> Self {
        Self {
            id: format!("item_{}", uuid::Uuid::new_v4().simple()),
            name,
            amount,
            date,
            completed: false,
            notes: String::new(),
        }
    }

    /// Move the item's day-of-month into `target`, clamping to the target's
    /// last day. Dates that are not `YYYY-MM-DD` shaped are left untouched.
    pub(crate) fn shift_into(&mut self, target: MonthKey) {
        let parts: Vec<&str> = self.date.split('-').collect();
        if parts.len() != 3 {
            return;
        }
        if let Ok(day) = parts[2].trim().parse::<u32>() {
            self.date = target.clamped_date(day).format("%Y-%m-%d").to_string();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Card {
    pub(crate) id: String,
    pub(crate) title: String,
    #[serde(rename = "type")]
    pub(crate) card_type: CardType,
    #[serde(default)]
    pub(crate) editable: bool,
    #[serde(default)]
    pub(crate) items: Vec<Item>,
    #[serde(default)]
    pub(crate) cumulative: bool,
    /// Principal for loan-tracking cards; read from the first month it appears.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) loan_total: Option<Decimal>,
}

impl Card {
    pub(crate) fn new(id: &str, title: &str, card_type: CardType, items: Vec<Item>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            card_type,
            editable: true,
            items,
            cumulative: false,
            loan_total: None,
        }
    }

    /// User-added cards are always expense cards.
    pub(crate) fn new_custom(title: String) -> Self {
        Self {
            id: format!("card_{}", uuid::Uuid::new_v4().simple()),
            title,
            card_type: CardType::Expense,
            editable: true,
            items: Vec::new(),
            cumulative: false,
            loan_total: None,
        }
    }

    pub(crate) fn is_protected(&self) -> bool {
        super::PROTECTED_CARD_IDS.contains(&self.id.as_str())
    }

    #[cfg(test)]
    pub(crate) fn find_item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub(crate) fn find_item_mut(&mut self, item_id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }
}
