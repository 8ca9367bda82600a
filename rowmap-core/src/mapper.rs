use crate::{
    Column, ColumnDef, Context, Declaration, Entity, PrimaryKeyType, Record, Result, Row,
    RowLabeled, RowNames, TableRef,
};
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

/// Shape of the table an entity maps to: name, ordered columns and primary key.
///
/// Computed once by the mapper and never recomputed. Clones share the same storage.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    table: TableRef,
    columns: Arc<[ColumnDef]>,
    names: RowNames,
    primary_key: RowNames,
}

impl TableSpec {
    pub fn name(&self) -> &str {
        &self.table.name
    }
    pub fn table_ref(&self) -> &TableRef {
        &self.table
    }
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }
    /// Column names, in declaration order.
    pub fn column_names(&self) -> &RowNames {
        &self.names
    }
    /// Names of the primary key columns, in declaration order.
    pub fn primary_key(&self) -> &RowNames {
        &self.primary_key
    }
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }
}

/// Translation between entities and records.
pub trait EntityMapper: Send + Sync {
    type Entity: Send + Sync;

    /// Constant for the lifetime of the mapper.
    fn table_spec(&self) -> &TableSpec;

    /// Record holding exactly the declared columns, in declaration order.
    fn from_entity(&self, entity: &Self::Entity) -> Result<Record>;

    /// New entity with every declared field taken from `record`. Columns missing
    /// from the record are decoded from `Value::Null`.
    fn to_entity(&self, record: &RowLabeled) -> Result<Self::Entity>;
}

/// Mapper driven by a [`Declaration`].
pub struct Mapper<E> {
    columns: Box<[Column<E>]>,
    spec: TableSpec,
}

impl<E> Mapper<E> {
    pub fn new(declaration: Declaration<E>) -> Self {
        let Declaration { table, columns } = declaration;
        let composite = columns.iter().filter(|c| c.primary_key).count() > 1;
        let defs: Arc<[ColumnDef]> = columns
            .iter()
            .map(|c| ColumnDef {
                name: c.name.clone(),
                primary_key: match (c.primary_key, composite) {
                    (false, _) => PrimaryKeyType::None,
                    (true, false) => PrimaryKeyType::PrimaryKey,
                    (true, true) => PrimaryKeyType::PartOfPrimaryKey,
                },
            })
            .collect();
        let names: RowNames = defs.iter().map(|c| c.name.to_string()).collect();
        let primary_key: RowNames = defs
            .iter()
            .filter(|c| c.is_primary_key())
            .map(|c| c.name.to_string())
            .collect();
        if primary_key.is_empty() {
            log::debug!(
                "`{}` declares no primary key column, lookups and mutations by key are not available",
                table.full_name()
            );
        }
        Self {
            columns: columns.into_boxed_slice(),
            spec: TableSpec {
                table,
                columns: defs,
                names,
                primary_key,
            },
        }
    }
}

impl<E: Entity> Mapper<E> {
    /// Mapper built from the declaration the entity type carries.
    pub fn for_entity() -> Self {
        Self::new(E::declaration())
    }
}

impl<E: Default + Send + Sync> EntityMapper for Mapper<E> {
    type Entity = E;

    fn table_spec(&self) -> &TableSpec {
        &self.spec
    }

    fn from_entity(&self, entity: &E) -> Result<Record> {
        let values = self
            .columns
            .iter()
            .map(|column| {
                column
                    .adapter
                    .from_entity((column.read)(entity))
                    .with_context(|| {
                        format!(
                            "While converting column `{}` of `{}`",
                            column.name,
                            self.spec.table.full_name()
                        )
                    })
            })
            .collect::<Result<Row>>()?;
        Ok(RowLabeled::new(self.spec.names.clone(), values))
    }

    fn to_entity(&self, record: &RowLabeled) -> Result<E> {
        let mut entity = E::default();
        for column in self.columns.iter() {
            let value = record.get_column(&column.name).cloned().unwrap_or_default();
            column
                .adapter
                .to_entity(value)
                .and_then(|value| (column.write)(&mut entity, value))
                .with_context(|| {
                    format!(
                        "While decoding column `{}` of `{}`",
                        column.name,
                        self.spec.table.full_name()
                    )
                })?;
        }
        Ok(entity)
    }
}

impl<E> Debug for Mapper<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("columns", &self.columns)
            .field("spec", &self.spec)
            .finish()
    }
}
