use crate::{Expression, RowNames, TableRef};

/// A `SELECT` under construction.
///
/// Repositories start from a query over every declared column of the table and
/// hand it to a [`crate::Specification`], which narrows it further. The same
/// query can be narrowed any number of times: filters accumulate and are joined
/// with `AND`.
///
/// ```rust
/// use rowmap_core::{ExpressionExt, SelectQuery, TableRef, column};
/// let query = SelectQuery::new(TableRef::new("product"), ["name", "stock"].map(String::from).into())
///     .filter(column("stock").gt(0))
///     .order_by(column("name").asc())
///     .limit(10);
/// assert_eq!(query.conditions().len(), 1);
/// ```
#[derive(Debug)]
pub struct SelectQuery {
    table: TableRef,
    columns: RowNames,
    conditions: Vec<Box<dyn Expression>>,
    order_by: Vec<Box<dyn Expression>>,
    limit: Option<u32>,
}

impl SelectQuery {
    pub fn new(table: TableRef, columns: RowNames) -> Self {
        Self {
            table,
            columns,
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn filter(mut self, condition: impl Expression + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    pub fn order_by(mut self, expression: impl Expression + 'static) -> Self {
        self.order_by.push(Box::new(expression));
        self
    }

    /// Replaces any previous limit.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }
    pub fn columns(&self) -> &RowNames {
        &self.columns
    }
    pub fn conditions(&self) -> &[Box<dyn Expression>] {
        &self.conditions
    }
    pub fn ordering(&self) -> &[Box<dyn Expression>] {
        &self.order_by
    }
    pub fn limit_value(&self) -> Option<u32> {
        self.limit
    }
}
