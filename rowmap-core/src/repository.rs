use crate::{
    BinaryOp, BinaryOpType, Context, Driver, EntityMapper, EntityNotFound, Error, Executor,
    ExecutorProvider, Expression, Operand, Record, Result, RowsAffected, SelectQuery,
    Specification, SqlWriter, TableSpec, Value, stream::Stream, truncate_long,
};
use async_stream::try_stream;
use futures::{StreamExt, TryStreamExt};
use std::pin::pin;

/// Create, read, update and delete for one entity type, plus queries refined by
/// a [`Specification`].
///
/// Every operation asks the provider for an executor, writes one statement with
/// the executor's dialect and runs it.
pub struct Repository<M: EntityMapper, P: ExecutorProvider> {
    table: TableSpec,
    mapper: M,
    provider: P,
}

impl<M: EntityMapper, P: ExecutorProvider> Repository<M, P> {
    pub fn new(provider: P, mapper: M) -> Self {
        Self {
            table: mapper.table_spec().clone(),
            mapper,
            provider,
        }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn table_spec(&self) -> &TableSpec {
        &self.table
    }

    /// Insert the entity as a new row.
    pub async fn add(&self, entity: &M::Entity) -> Result<()> {
        let record = self.mapper.from_entity(entity)?;
        let mut executor = self.provider.executor().await?;
        let mut query = String::with_capacity(256);
        executor
            .driver()
            .sql_writer()
            .write_insert(&mut query, self.table.table_ref(), &record);
        log::debug!("{}", truncate_long!(query));
        executor.execute(query).await?;
        Ok(())
    }

    /// Delete the row whose primary key matches the entity. Matching nothing is not an error.
    pub async fn remove(&self, entity: &M::Entity) -> Result<RowsAffected> {
        let record = self.mapper.from_entity(entity)?;
        let conditions = self.key_conditions(&record)?;
        let mut executor = self.provider.executor().await?;
        let mut query = String::with_capacity(128);
        executor
            .driver()
            .sql_writer()
            .write_delete(&mut query, self.table.table_ref(), &conditions);
        log::debug!("{}", truncate_long!(query));
        let result = executor.execute(query).await?;
        self.log_unmatched("remove", &result);
        Ok(result)
    }

    /// Overwrite every column of the row whose primary key matches the entity.
    pub async fn update(&self, entity: &M::Entity) -> Result<RowsAffected> {
        let record = self.mapper.from_entity(entity)?;
        let conditions = self.key_conditions(&record)?;
        let mut executor = self.provider.executor().await?;
        let mut query = String::with_capacity(256);
        executor.driver().sql_writer().write_update(
            &mut query,
            self.table.table_ref(),
            &record,
            &conditions,
        );
        log::debug!("{}", truncate_long!(query));
        let result = executor.execute(query).await?;
        self.log_unmatched("update", &result);
        Ok(result)
    }

    /// Entity whose primary key equals `id`, or an [`EntityNotFound`] error.
    ///
    /// The identifier is compared with every primary key column, so composite
    /// keys only match rows where all the key columns hold that same value.
    pub async fn get_by_id(&self, id: impl Into<Value>) -> Result<M::Entity> {
        self.require_primary_key()?;
        let id = id.into();
        let query = self
            .table
            .primary_key()
            .iter()
            .fold(self.select(), |query, name| {
                query.filter(BinaryOp {
                    op: BinaryOpType::Equal,
                    lhs: Operand::Column(name.clone().into()),
                    rhs: Operand::Variable(id.clone()),
                })
            })
            .limit(1);
        let stream = self.fetch_entities(query);
        match pin!(stream).try_next().await? {
            Some(entity) => Ok(entity),
            None => Err(EntityNotFound {
                table: self.table.table_ref().full_name(),
            }
            .into()),
        }
    }

    /// Every entity selected by the specification, in the order the engine returns them.
    pub async fn query(&self, specification: &impl Specification) -> Result<Vec<M::Entity>> {
        self.query_stream(specification).try_collect().await
    }

    /// Like [`Repository::query`], decoding one row at a time.
    pub fn query_stream(
        &self,
        specification: &impl Specification,
    ) -> impl Stream<Item = Result<M::Entity>> + Send + '_ {
        self.fetch_entities(specification.apply(self.select()))
    }

    /// First entity selected by the specification, if any.
    pub async fn find_one(&self, specification: &impl Specification) -> Result<Option<M::Entity>> {
        let stream = self.fetch_entities(specification.apply(self.select()).limit(1));
        pin!(stream).into_future().await.0.transpose()
    }

    fn select(&self) -> SelectQuery {
        SelectQuery::new(
            self.table.table_ref().clone(),
            self.table.column_names().clone(),
        )
    }

    fn fetch_entities(
        &self,
        query: SelectQuery,
    ) -> impl Stream<Item = Result<M::Entity>> + Send + '_ {
        try_stream! {
            let mut executor = self.provider.executor().await?;
            let mut sql = String::with_capacity(256);
            executor.driver().sql_writer().write_select(&mut sql, &query);
            log::debug!("{}", truncate_long!(sql));
            let mut rows = pin!(executor.fetch(sql));
            while let Some(row) = rows.try_next().await? {
                yield self.mapper.to_entity(&row)?;
            }
        }
    }

    fn require_primary_key(&self) -> Result<()> {
        if self.table.has_primary_key() {
            Ok(())
        } else {
            Err(Error::msg(format!(
                "`{}` has no primary key, entities cannot be addressed individually",
                self.table.table_ref().full_name()
            )))
        }
    }

    /// Key filter built from the translated record, so adapted keys are compared
    /// in their stored form.
    fn key_conditions(&self, record: &Record) -> Result<Vec<Box<dyn Expression>>> {
        self.require_primary_key()?;
        self.table
            .primary_key()
            .iter()
            .map(|name| {
                let value = record
                    .get_column(name)
                    .cloned()
                    .with_context(|| format!("The record has no value for key column `{}`", name))?;
                Ok(Box::new(BinaryOp {
                    op: BinaryOpType::Equal,
                    lhs: Operand::Column(name.clone().into()),
                    rhs: Operand::Variable(value),
                }) as Box<dyn Expression>)
            })
            .collect()
    }

    fn log_unmatched(&self, operation: &str, result: &RowsAffected) {
        if result.rows_affected == 0 {
            log::info!(
                "The {} on `{}` matched no row",
                operation,
                self.table.table_ref().full_name()
            );
        }
    }
}
