use futures::{TryStreamExt, lock::Mutex};
use rowmap::{
    Column, Connection, Declaration, Entity, Executor, ExpressionExt, Mapper, Repository,
    SelectQuery, Shared, column,
};
use std::{pin::pin, sync::LazyLock, time::Duration};
use tokio::time::timeout;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Tally {
    pub id: i64,
    pub count: i64,
}

impl Entity for Tally {
    fn declaration() -> Declaration<Self> {
        Declaration::new("tallies")
            .column(Column::new("id", |t: &Tally| &t.id, |t: &mut Tally| &mut t.id).primary_key())
            .column(Column::new("count", |t: &Tally| &t.count, |t: &mut Tally| &mut t.count))
    }
}

/// Writes issued while a query is still being consumed, on the same connection.
pub async fn tallies<C: Connection + Clone + Sync>(connection: &mut C) {
    let _lock = MUTEX.lock().await;

    // Cleanup
    let result = connection
        .execute("DROP TABLE IF EXISTS tallies;".into())
        .await;
    assert!(
        result.is_ok(),
        "Failed to drop tallies: {:?}",
        result.unwrap_err()
    );

    // Create table
    let result = connection
        .execute("CREATE TABLE tallies (id INTEGER PRIMARY KEY, count INTEGER NOT NULL);".into())
        .await;
    assert!(
        result.is_ok(),
        "Failed to create tallies: {:?}",
        result.unwrap_err()
    );

    let repository = Repository::new(Shared(connection.clone()), Mapper::<Tally>::for_entity());
    for id in 0..200 {
        let result = repository.add(&Tally { id, count: id }).await;
        assert!(
            result.is_ok(),
            "Failed to add tally {}: {:?}",
            id,
            result.unwrap_err()
        );
    }

    let by_id = |query: SelectQuery| query.order_by(column("id").asc());
    let visited = timeout(Duration::from_secs(10), async {
        let mut stream = pin!(repository.query_stream(&by_id));
        let mut visited = 0;
        while let Some(tally) = stream.try_next().await.expect("Could not read the tallies") {
            let result = repository
                .update(&Tally {
                    count: tally.count + 1,
                    ..tally
                })
                .await;
            assert_eq!(
                result.expect("Could not update a tally while streaming").rows_affected,
                1
            );
            visited += 1;
        }
        visited
    })
    .await
    .expect("Updating while streaming must not block");
    assert_eq!(visited, 200);

    let result = repository
        .query(&by_id)
        .await
        .expect("Could not query the tallies");
    assert_eq!(result.len(), 200);
    assert!(
        result.iter().all(|t| t.count == t.id + 1),
        "Every tally is incremented once"
    );
    let untouched = repository
        .find_one(&|query: SelectQuery| query.filter(column("count").eq(0)))
        .await
        .expect("Could not look for untouched tallies");
    assert_eq!(untouched, None);
}
