use crate::Error;
use std::fmt::{self, Display, Formatter};

/// A lookup by identifier matched no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityNotFound {
    pub table: String,
}

impl Display for EntityNotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Entity not found in `{}`", self.table)
    }
}

impl std::error::Error for EntityNotFound {}

/// True when `error` (or anything in its context chain) is an [`EntityNotFound`].
pub fn is_entity_not_found(error: &Error) -> bool {
    error.downcast_ref::<EntityNotFound>().is_some()
}
