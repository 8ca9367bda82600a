#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rowmap::{
        AllRecords, Column, ColumnAdapter, Connection, Declaration, Driver, Entity, Error,
        Executor, ExpressionExt, GenericSqlWriter, Mapper, QueryResult, Repository, Result,
        RowLabeled, RowsAffected, SelectQuery, Shared, Value, column, future,
        is_entity_not_found,
        stream::{self, Stream},
    };
    use std::{
        collections::VecDeque,
        future::Future,
        sync::{Arc, Mutex},
    };

    #[derive(Default, Debug, Clone, Copy)]
    struct MockDriver;

    impl Driver for MockDriver {
        type Connection = MockExecutor;
        type SqlWriter = GenericSqlWriter;

        const NAME: &'static str = "mock";

        fn sql_writer(&self) -> GenericSqlWriter {
            GenericSqlWriter::new()
        }
    }

    #[derive(Default)]
    struct MockState {
        queries: Vec<String>,
        results: VecDeque<Vec<Result<QueryResult>>>,
    }

    /// Records every query and answers with the next queued batch of results.
    #[derive(Default, Clone)]
    struct MockExecutor {
        driver: MockDriver,
        state: Arc<Mutex<MockState>>,
    }

    impl MockExecutor {
        fn respond(&self, results: Vec<Result<QueryResult>>) {
            self.state.lock().unwrap().results.push_back(results);
        }
        fn queries(&self) -> Vec<String> {
            self.state.lock().unwrap().queries.clone()
        }
    }

    impl Executor for MockExecutor {
        type Driver = MockDriver;

        fn driver(&self) -> &MockDriver {
            &self.driver
        }

        fn run(&mut self, query: String) -> impl Stream<Item = Result<QueryResult>> + Send {
            let mut state = self.state.lock().unwrap();
            state.queries.push(query);
            let results = state.results.pop_front().unwrap_or_default();
            stream::iter(results)
        }
    }

    impl Connection for MockExecutor {
        fn connect(_url: &str) -> impl Future<Output = Result<Self>> + Send {
            future::ready(Ok(Self::default()))
        }
    }

    #[derive(Debug)]
    struct Prefixed;

    impl ColumnAdapter for Prefixed {
        fn from_entity(&self, value: Value) -> Result<Value> {
            Ok(match value {
                Value::Varchar(Some(v)) => Value::Varchar(Some(format!("sku-{}", v))),
                v => v,
            })
        }
        fn to_entity(&self, value: Value) -> Result<Value> {
            Ok(match value {
                Value::Varchar(Some(v)) => {
                    Value::Varchar(Some(v.trim_start_matches("sku-").to_string()))
                }
                v => v,
            })
        }
    }

    #[derive(Default, Debug, Clone, PartialEq)]
    struct Product {
        id: String,
        name: String,
        stock: i64,
    }

    impl Entity for Product {
        fn declaration() -> Declaration<Self> {
            Declaration::new("product")
                .column(
                    Column::new("id", |p: &Product| &p.id, |p: &mut Product| &mut p.id)
                        .primary_key()
                        .adapter(Prefixed),
                )
                .column(Column::new("name", |p: &Product| &p.name, |p: &mut Product| &mut p.name))
                .column(Column::new("stock", |p: &Product| &p.stock, |p: &mut Product| &mut p.stock))
        }
    }

    fn product(id: &str, name: &str, stock: i64) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            stock,
        }
    }

    fn row(id: &str, name: &str, stock: i64) -> Result<QueryResult> {
        Ok(RowLabeled::new(
            ["id", "name", "stock"].map(String::from).into(),
            [
                Value::Varchar(Some(format!("sku-{}", id))),
                Value::Varchar(Some(name.into())),
                Value::Int64(Some(stock)),
            ]
            .into(),
        )
        .into())
    }

    fn affected(rows_affected: u64) -> Result<QueryResult> {
        Ok(RowsAffected {
            rows_affected,
            last_affected_id: None,
        }
        .into())
    }

    fn repository() -> (
        MockExecutor,
        Repository<Mapper<Product>, Shared<MockExecutor>>,
    ) {
        let executor = MockExecutor::default();
        let repository = Repository::new(Shared(executor.clone()), Mapper::for_entity());
        (executor, repository)
    }

    #[tokio::test]
    async fn add_inserts_the_translated_record() {
        let (executor, repository) = repository();
        executor.respond(vec![affected(1)]);
        repository.add(&product("A", "Anchor", 3)).await.unwrap();
        assert_eq!(
            executor.queries(),
            [indoc! {r#"
                INSERT INTO "product" ("id", "name", "stock") VALUES
                ('sku-A', 'Anchor', 3);
            "#}
            .trim()]
        );
    }

    #[tokio::test]
    async fn engine_errors_are_propagated() {
        let (executor, repository) = repository();
        executor.respond(vec![Err(Error::msg("UNIQUE constraint failed: product.id"))]);
        let error = repository.add(&product("A", "Anchor", 3)).await.unwrap_err();
        assert!(!is_entity_not_found(&error));
        assert!(format!("{:#}", error).contains("UNIQUE constraint failed"));
    }

    #[tokio::test]
    async fn get_by_id() {
        let (executor, repository) = repository();
        executor.respond(vec![row("B", "Buoy", 7)]);
        let found = repository.get_by_id("sku-B").await.unwrap();
        assert_eq!(found, product("B", "Buoy", 7));
        assert_eq!(
            executor.queries(),
            [indoc! {r#"
                SELECT "id", "name", "stock"
                FROM "product"
                WHERE "id" = 'sku-B'
                LIMIT 1;
            "#}
            .trim()]
        );
    }

    #[tokio::test]
    async fn get_by_id_not_found() {
        let (executor, repository) = repository();
        executor.respond(vec![]);
        let error = repository.get_by_id("sku-Z").await.unwrap_err();
        assert!(is_entity_not_found(&error));
        assert_eq!(error.to_string(), "Entity not found in `product`");
    }

    #[tokio::test]
    async fn remove_filters_on_translated_key() {
        let (executor, repository) = repository();
        executor.respond(vec![affected(1)]);
        let result = repository.remove(&product("C", "", 0)).await.unwrap();
        assert_eq!(result.rows_affected, 1);
        assert_eq!(
            executor.queries(),
            [indoc! {r#"
                DELETE FROM "product"
                WHERE "id" = 'sku-C';
            "#}
            .trim()]
        );
    }

    #[tokio::test]
    async fn update_sets_every_column() {
        let (executor, repository) = repository();
        executor.respond(vec![affected(1)]);
        repository.update(&product("A", "Anchor", 4)).await.unwrap();
        assert_eq!(
            executor.queries(),
            [indoc! {r#"
                UPDATE "product" SET
                "id" = 'sku-A',
                "name" = 'Anchor',
                "stock" = 4
                WHERE "id" = 'sku-A';
            "#}
            .trim()]
        );
    }

    #[tokio::test]
    async fn zero_row_mutations_succeed() {
        let (executor, repository) = repository();
        executor.respond(vec![affected(0)]);
        executor.respond(vec![affected(0)]);
        let updated = repository.update(&product("X", "Ghost", 0)).await.unwrap();
        let removed = repository.remove(&product("X", "Ghost", 0)).await.unwrap();
        assert_eq!(updated.rows_affected, 0);
        assert_eq!(removed.rows_affected, 0);
    }

    #[tokio::test]
    async fn query_applies_the_specification() {
        let (executor, repository) = repository();
        executor.respond(vec![row("A", "Anchor", 3), row("B", "Buoy", 7), row("C", "Chain", 0)]);
        executor.respond(vec![row("B", "Buoy", 7)]);

        let all = repository.query(&AllRecords).await.unwrap();
        assert_eq!(
            all,
            [
                product("A", "Anchor", 3),
                product("B", "Buoy", 7),
                product("C", "Chain", 0),
            ]
        );

        let named_b = |query: SelectQuery| {
            query
                .filter(column("name").eq("Buoy"))
                .order_by(column("stock").desc())
        };
        let filtered = repository.query(&named_b).await.unwrap();
        assert_eq!(filtered, [product("B", "Buoy", 7)]);

        assert_eq!(
            executor.queries(),
            [
                indoc! {r#"
                    SELECT "id", "name", "stock"
                    FROM "product";
                "#}
                .trim(),
                indoc! {r#"
                    SELECT "id", "name", "stock"
                    FROM "product"
                    WHERE "name" = 'Buoy'
                    ORDER BY "stock" DESC;
                "#}
                .trim(),
            ]
        );
    }

    #[tokio::test]
    async fn query_empty_and_find_one() {
        let (executor, repository) = repository();
        executor.respond(vec![]);
        executor.respond(vec![row("A", "Anchor", 3)]);
        executor.respond(vec![]);
        assert!(repository.query(&AllRecords).await.unwrap().is_empty());
        assert_eq!(
            repository.find_one(&AllRecords).await.unwrap(),
            Some(product("A", "Anchor", 3))
        );
        let in_stock = |query: SelectQuery| query.filter(column("stock").gt(100));
        assert_eq!(repository.find_one(&in_stock).await.unwrap(), None);
        assert!(executor.queries()[1].ends_with("\nLIMIT 1;"));
    }

    #[tokio::test]
    async fn decoding_failure_is_an_error() {
        let (executor, repository) = repository();
        executor.respond(vec![Ok(RowLabeled::new(
            ["id", "name", "stock"].map(String::from).into(),
            [
                Value::Varchar(Some("sku-A".into())),
                Value::Varchar(Some("Anchor".into())),
                Value::Varchar(Some("lots".into())),
            ]
            .into(),
        )
        .into())]);
        let error = repository.query(&AllRecords).await.unwrap_err();
        assert!(format!("{:#}", error).contains("`stock`"));
    }

    #[tokio::test]
    async fn missing_primary_key_rejects_keyed_operations() {
        #[derive(Default)]
        struct Event {
            message: String,
        }
        let executor = MockExecutor::default();
        let repository = Repository::new(
            Shared(executor.clone()),
            Mapper::new(Declaration::new("event").column(Column::new(
                "message",
                |e: &Event| &e.message,
                |e: &mut Event| &mut e.message,
            ))),
        );
        let event = Event {
            message: "boot".into(),
        };
        assert!(repository.remove(&event).await.is_err());
        assert!(repository.update(&event).await.is_err());
        assert!(repository.get_by_id(1).await.is_err());
        assert!(executor.queries().is_empty());

        executor.respond(vec![affected(1)]);
        repository.add(&event).await.unwrap();
        assert_eq!(executor.queries().len(), 1);
    }

    #[tokio::test]
    async fn add_without_columns_uses_defaults() {
        #[derive(Default)]
        struct Tick;
        let executor = MockExecutor::default();
        let repository = Repository::new(
            Shared(executor.clone()),
            Mapper::new(Declaration::<Tick>::new("tick")),
        );
        executor.respond(vec![affected(1)]);
        repository.add(&Tick).await.unwrap();
        assert_eq!(executor.queries(), [r#"INSERT INTO "tick" DEFAULT VALUES;"#]);
    }

    #[tokio::test]
    async fn closure_provider_is_asked_per_operation() {
        let executor = MockExecutor::default();
        let handed_out = Arc::new(Mutex::new(0));
        let provider = {
            let executor = executor.clone();
            let handed_out = handed_out.clone();
            move || {
                *handed_out.lock().unwrap() += 1;
                let executor = executor.clone();
                async move { Ok::<_, Error>(executor) }
            }
        };
        let repository = Repository::new(provider, Mapper::<Product>::for_entity());
        executor.respond(vec![affected(1)]);
        executor.respond(vec![row("A", "Anchor", 3)]);
        repository.add(&product("A", "Anchor", 3)).await.unwrap();
        repository.get_by_id("sku-A").await.unwrap();
        assert_eq!(*handed_out.lock().unwrap(), 2);
    }
}
