use crate::{AsValue, ColumnAdapter, PassThrough, Result, Value};
use std::{
    borrow::Cow,
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

/// Indicates how (or if) a column participates in the primary key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeyType {
    /// Single-column primary key.
    PrimaryKey,
    /// Member of a composite primary key.
    PartOfPrimaryKey,
    /// Not part of the primary key.
    #[default]
    None,
}

/// Column metadata exposed by a mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: Cow<'static, str>,
    pub primary_key: PrimaryKeyType,
}

impl ColumnDef {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn is_primary_key(&self) -> bool {
        self.primary_key != PrimaryKeyType::None
    }
}

pub(crate) type ReadField<E> = Box<dyn Fn(&E) -> Value + Send + Sync>;
pub(crate) type WriteField<E> = Box<dyn Fn(&mut E, Value) -> Result<()> + Send + Sync>;

/// Declaration of one column of entity `E`.
///
/// The field is addressed through a pair of accessors rather than by name, the
/// column name is free to differ from the field name.
///
/// ```rust
/// use rowmap_core::{Column, Rfc3339Adapter};
/// use time::OffsetDateTime;
///
/// #[derive(Default)]
/// struct Product {
///     id: String,
///     created: Option<OffsetDateTime>,
/// }
///
/// let id = Column::new("id", |p: &Product| &p.id, |p: &mut Product| &mut p.id).primary_key();
/// let created = Column::new(
///     "created_at",
///     |p: &Product| &p.created,
///     |p: &mut Product| &mut p.created,
/// )
/// .adapter(Rfc3339Adapter);
/// assert!(id.is_primary_key());
/// assert_eq!(created.name(), "created_at");
/// ```
pub struct Column<E> {
    pub(crate) name: Cow<'static, str>,
    pub(crate) primary_key: bool,
    pub(crate) adapter: Arc<dyn ColumnAdapter>,
    pub(crate) read: ReadField<E>,
    pub(crate) write: WriteField<E>,
}

impl<E: 'static> Column<E> {
    pub fn new<F>(
        name: impl Into<Cow<'static, str>>,
        get: fn(&E) -> &F,
        get_mut: fn(&mut E) -> &mut F,
    ) -> Self
    where
        F: AsValue + Clone + 'static,
    {
        Self {
            name: name.into(),
            primary_key: false,
            adapter: Arc::new(PassThrough),
            read: Box::new(move |entity| get(entity).clone().as_value()),
            write: Box::new(move |entity, value| {
                *get_mut(entity) = F::try_from_value(value)?;
                Ok(())
            }),
        }
    }
}

impl<E> Column<E> {
    /// Mark the column as (part of) the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn adapter(self, adapter: impl ColumnAdapter + 'static) -> Self {
        self.shared_adapter(Arc::new(adapter))
    }

    /// Use an adapter instance that is also bound to other columns.
    pub fn shared_adapter(mut self, adapter: Arc<dyn ColumnAdapter>) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}

impl<E> Debug for Column<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("primary_key", &self.primary_key)
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}
