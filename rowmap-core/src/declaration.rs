use crate::{Column, TableRef};
use std::borrow::Cow;

/// Table and column declarations of entity `E`, consumed by [`crate::Mapper::new`].
///
/// Columns keep the order they are declared in. Declaring a column name twice
/// replaces the earlier declaration in place.
#[derive(Debug)]
pub struct Declaration<E> {
    pub(crate) table: TableRef,
    pub(crate) columns: Vec<Column<E>>,
}

impl<E> Declaration<E> {
    pub fn new(table: impl Into<Cow<'static, str>>) -> Self {
        Self {
            table: TableRef::new(table),
            columns: Vec::new(),
        }
    }

    /// Overwrite the table name.
    pub fn table(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.table.name = name.into();
        self
    }

    pub fn schema(mut self, schema: impl Into<Cow<'static, str>>) -> Self {
        self.table.schema = schema.into();
        self
    }

    pub fn column(mut self, column: Column<E>) -> Self {
        if let Some(existing) = self.columns.iter_mut().find(|c| c.name == column.name) {
            log::warn!(
                "Column `{}` of `{}` is declared more than once, the last declaration is used",
                column.name,
                self.table.full_name(),
            );
            *existing = column;
        } else {
            self.columns.push(column);
        }
        self
    }

    pub fn table_ref(&self) -> &TableRef {
        &self.table
    }

    pub fn columns(&self) -> &[Column<E>] {
        &self.columns
    }
}

/// An entity type carrying its own declaration.
///
/// ```rust
/// use rowmap_core::{Column, Declaration, Entity, Mapper, EntityMapper};
///
/// #[derive(Default)]
/// struct Tag {
///     id: i64,
///     label: String,
/// }
///
/// impl Entity for Tag {
///     fn declaration() -> Declaration<Self> {
///         Declaration::new("tags")
///             .column(Column::new("id", |t: &Tag| &t.id, |t: &mut Tag| &mut t.id).primary_key())
///             .column(Column::new("label", |t: &Tag| &t.label, |t: &mut Tag| &mut t.label))
///     }
/// }
///
/// let mapper = Mapper::<Tag>::for_entity();
/// assert_eq!(mapper.table_spec().name(), "tags");
/// ```
pub trait Entity: Default + Send + Sync + Sized + 'static {
    fn declaration() -> Declaration<Self>;
}
