pub(crate) mod cards;
pub(crate) mod summary;
