use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Card, CardType, Item, MonthKey};

pub(crate) const INCOME_CARD_ID: &str = "ingreso";
pub(crate) const SAVINGS_CARD_ID: &str = "ahorros";
pub(crate) const FIXED_EXPENSES_CARD_ID: &str = "gastos-fijos";
pub(crate) const VARIABLE_EXPENSES_CARD_ID: &str = "gastos-variados";
pub(crate) const TRANSFERS_CARD_ID: &str = "giros";
pub(crate) const LOAN_CARD_ID: &str = "prestamo";

/// The five default cards. These can never be deleted.
pub(crate) const PROTECTED_CARD_IDS: [&str; 5] = [
    INCOME_CARD_ID,
    SAVINGS_CARD_ID,
    FIXED_EXPENSES_CARD_ID,
    VARIABLE_EXPENSES_CARD_ID,
    TRANSFERS_CARD_ID,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Metadata {
    #[serde(default)]
    pub(crate) created: String,
    /// Set on a month copied ahead at startup. Cleared by the first edit.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) precreated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MonthRecord {
    #[serde(default)]
    pub(crate) cards: Vec<Card>,
    #[serde(default)]
    pub(crate) metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) copied_from: Option<MonthKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_modified: Option<String>,
}

impl MonthRecord {
    /// Default card layout for a freshly created month. Item dates fall
    /// inside `month`.
    pub(crate) fn default_for(month: MonthKey) -> Self {
        let item = |id: &str, name: &str, amount: i64, day: u32| Item {
            id: id.to_string(),
            name: name.to_string(),
            amount: Decimal::from(amount),
            date: month.clamped_date(day).format("%Y-%m-%d").to_string(),
            completed: false,
            notes: String::new(),
        };

        let mut savings = Card::new(
            SAVINGS_CARD_ID,
            "AHORROS",
            CardType::Savings,
            vec![
                item("ahorro1", "Fondo Emergencia", 200, 1),
                item("ahorro2", "Inversiones", 100, 1),
            ],
        );
        savings.cumulative = true;

        Self {
            cards: vec![
                Card::new(
                    INCOME_CARD_ID,
                    "INGRESO",
                    CardType::Income,
                    vec![
                        item("ingreso1", "Salario", 1500, 1),
                        item("ingreso2", "Freelance", 300, 15),
                    ],
                ),
                savings,
                Card::new(
                    FIXED_EXPENSES_CARD_ID,
                    "GASTOS FIJOS",
                    CardType::Expense,
                    vec![
                        item("fijo1", "Alquiler / Hipoteca", 900, 5),
                        item("fijo2", "Servicios", 100, 10),
                        item("fijo3", "Abono transporte", 40, 1),
                        item("fijo4", "Suscripciones", 50, 15),
                    ],
                ),
                Card::new(
                    VARIABLE_EXPENSES_CARD_ID,
                    "GASTOS VARIADOS",
                    CardType::Expense,
                    vec![
                        item("var1", "Comida", 200, 1),
                        item("var2", "Aseo personal", 20, 1),
                        item("var3", "Salidas", 150, 1),
                    ],
                ),
                Card::new(TRANSFERS_CARD_ID, "GIROS", CardType::Transfer, Vec::new()),
            ],
            metadata: Metadata {
                created: chrono::Utc::now().to_rfc3339(),
                precreated: false,
            },
            copied_from: None,
            last_modified: None,
        }
    }

    pub(crate) fn find_card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub(crate) fn find_card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }

    pub(crate) fn item_count(&self) -> usize {
        self.cards.iter().map(|c| c.items.len()).sum()
    }

    pub(crate) fn completed_count(&self) -> usize {
        self.cards
            .iter()
            .flat_map(|c| c.items.iter())
            .filter(|i| i.completed)
            .count()
    }
}
