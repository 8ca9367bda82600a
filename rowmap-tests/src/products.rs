use futures::{TryStreamExt, lock::Mutex};
use rowmap::{
    AllRecords, Column, Connection, Declaration, Entity, Executor, ExpressionExt, Mapper,
    Repository, SelectQuery, Shared, column, is_entity_not_found,
};
use std::{pin::pin, sync::LazyLock};

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub stock: i32,
}

impl Entity for Product {
    fn declaration() -> Declaration<Self> {
        Declaration::new("products")
            .column(Column::new("id", |p: &Product| &p.id, |p: &mut Product| &mut p.id).primary_key())
            .column(Column::new("name", |p: &Product| &p.name, |p: &mut Product| &mut p.name))
            .column(Column::new("stock", |p: &Product| &p.stock, |p: &mut Product| &mut p.stock))
    }
}

fn product(id: &str, name: &str, stock: i32) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        stock,
    }
}

pub async fn products<C: Connection + Clone + Sync>(connection: &mut C) {
    let _lock = MUTEX.lock().await;

    // Cleanup
    let result = connection
        .execute("DROP TABLE IF EXISTS products;".into())
        .await;
    assert!(
        result.is_ok(),
        "Failed to drop products: {:?}",
        result.unwrap_err()
    );

    // Create table
    let result = connection
        .execute(
            "CREATE TABLE products (id TEXT PRIMARY KEY, name TEXT NOT NULL, stock INTEGER NOT NULL);"
                .into(),
        )
        .await;
    assert!(
        result.is_ok(),
        "Failed to create products: {:?}",
        result.unwrap_err()
    );

    let repository = Repository::new(Shared(connection.clone()), Mapper::<Product>::for_entity());

    // Empty table
    let result = repository.query(&AllRecords).await;
    assert!(
        result.is_ok(),
        "Failed to query the empty table: {:?}",
        result.unwrap_err()
    );
    assert!(result.unwrap().is_empty());

    // Add A, B, C
    for item in [
        product("A", "Anchor", 3),
        product("B", "Buoy", 0),
        product("C", "Chain", 12),
    ] {
        let result = repository.add(&item).await;
        assert!(
            result.is_ok(),
            "Failed to add {}: {:?}",
            item.id,
            result.unwrap_err()
        );
    }

    // Everything
    let by_id = |query: SelectQuery| query.order_by(column("id").asc());
    let all = repository.query(&by_id).await.expect("Could not query all the products");
    assert_eq!(
        all,
        [
            product("A", "Anchor", 3),
            product("B", "Buoy", 0),
            product("C", "Chain", 12),
        ]
    );
    // The identity specification leaves the base query untouched
    assert_eq!(
        repository
            .query(&AllRecords)
            .await
            .expect("Could not query all the products"),
        all
    );

    // Filtered
    let named_b = |query: SelectQuery| query.filter(column("name").eq("Buoy"));
    let result = repository
        .query(&named_b)
        .await
        .expect("Could not query by name");
    assert_eq!(result, [product("B", "Buoy", 0)]);

    let in_stock = |query: SelectQuery| {
        query
            .filter(column("stock").gt(0))
            .order_by(column("stock").desc())
    };
    let result = repository
        .query(&in_stock)
        .await
        .expect("Could not query the products in stock");
    assert_eq!(
        result.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
        ["C", "A"]
    );

    // Streaming and single results
    {
        let mut stream = pin!(repository.query_stream(&by_id));
        let first = stream.try_next().await.expect("Could not read the stream");
        assert_eq!(first, Some(product("A", "Anchor", 3)));
    }
    let result = repository
        .find_one(&named_b)
        .await
        .expect("Could not find one product");
    assert_eq!(result, Some(product("B", "Buoy", 0)));
    let nothing = |query: SelectQuery| query.filter(column("stock").gt(1000));
    assert_eq!(
        repository
            .find_one(&nothing)
            .await
            .expect("Could not find one product"),
        None
    );

    // Lookup
    let result = repository.get_by_id("A").await;
    assert!(
        result.is_ok(),
        "Failed to get A: {:?}",
        result.unwrap_err()
    );
    assert_eq!(result.unwrap(), product("A", "Anchor", 3));

    // Update
    let result = repository.update(&product("A", "Anchor", 4)).await;
    assert!(
        result.is_ok(),
        "Failed to update A: {:?}",
        result.unwrap_err()
    );
    assert_eq!(result.unwrap().rows_affected, 1);
    assert_eq!(
        repository.get_by_id("A").await.expect("Could not get A").stock,
        4
    );

    // Adding the same key twice is an engine error
    let result = repository.add(&product("A", "Another anchor", 1)).await;
    assert!(result.is_err(), "Adding A twice should fail");
    assert!(!is_entity_not_found(&result.unwrap_err()));

    // Remove
    let result = repository.remove(&product("A", "", 0)).await;
    assert!(
        result.is_ok(),
        "Failed to remove A: {:?}",
        result.unwrap_err()
    );
    assert_eq!(result.unwrap().rows_affected, 1);
    let result = repository.get_by_id("A").await;
    assert!(result.is_err(), "A should be gone");
    assert!(is_entity_not_found(&result.unwrap_err()));

    // Missing entities are no-ops
    let result = repository.update(&product("Z", "Zeppelin", 1)).await;
    assert_eq!(
        result.expect("Updating a missing product should succeed").rows_affected,
        0
    );
    let result = repository.remove(&product("Z", "Zeppelin", 1)).await;
    assert_eq!(
        result.expect("Removing a missing product should succeed").rows_affected,
        0
    );
    let expected = [product("B", "Buoy", 0), product("C", "Chain", 12)];
    assert_eq!(
        repository
            .query(&AllRecords)
            .await
            .expect("Could not query all the products"),
        expected
    );
    assert_eq!(
        repository
            .query(&by_id)
            .await
            .expect("Could not query all the products"),
        expected
    );
}
