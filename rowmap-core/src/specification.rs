use crate::SelectQuery;

/// Composable narrowing of a query: filtering, ordering, limiting.
///
/// Implemented for any `Fn(SelectQuery) -> SelectQuery`, so most specifications
/// are plain closures.
///
/// ```rust
/// use rowmap_core::{ExpressionExt, SelectQuery, Specification, column};
/// let in_stock = |query: SelectQuery| query.filter(column("stock").gt(0));
/// # let _ = &in_stock as &dyn Specification;
/// ```
pub trait Specification: Send + Sync {
    fn apply(&self, query: SelectQuery) -> SelectQuery;
}

/// Every row of the table, the query is returned untouched.
#[derive(Default, Debug, Clone, Copy)]
pub struct AllRecords;

impl Specification for AllRecords {
    fn apply(&self, query: SelectQuery) -> SelectQuery {
        query
    }
}

impl<F> Specification for F
where
    F: Fn(SelectQuery) -> SelectQuery + Send + Sync,
{
    fn apply(&self, query: SelectQuery) -> SelectQuery {
        self(query)
    }
}
