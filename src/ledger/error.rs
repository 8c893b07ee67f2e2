/// Rejections raised by month editing. Shown to the user, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum LedgerError {
    #[error("Item name cannot be empty")]
    EmptyItemName,
    #[error("Card title cannot be empty")]
    EmptyCardTitle,
    #[error("Card '{0}' not found")]
    CardNotFound(String),
    #[error("Item '{0}' not found")]
    ItemNotFound(String),
    #[error("Card '{0}' is a default card and cannot be deleted")]
    ProtectedCard(String),
    #[error("Card '{0}' cannot be renamed")]
    CardNotEditable(String),
}
