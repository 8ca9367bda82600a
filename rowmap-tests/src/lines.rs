use futures::lock::Mutex;
use rowmap::{
    Column, Connection, Declaration, Entity, EntityMapper, Executor, ExpressionExt, Mapper,
    PrimaryKeyType, Repository, SelectQuery, Shared, column,
};
use std::sync::LazyLock;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[derive(Default, Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub order_id: i64,
    pub position: u16,
    pub sku: String,
    pub quantity: u32,
}

impl Entity for OrderLine {
    fn declaration() -> Declaration<Self> {
        Declaration::new("order_lines")
            .column(
                Column::new(
                    "order_id",
                    |l: &OrderLine| &l.order_id,
                    |l: &mut OrderLine| &mut l.order_id,
                )
                .primary_key(),
            )
            .column(
                Column::new(
                    "position",
                    |l: &OrderLine| &l.position,
                    |l: &mut OrderLine| &mut l.position,
                )
                .primary_key(),
            )
            .column(Column::new("sku", |l: &OrderLine| &l.sku, |l: &mut OrderLine| &mut l.sku))
            .column(Column::new(
                "quantity",
                |l: &OrderLine| &l.quantity,
                |l: &mut OrderLine| &mut l.quantity,
            ))
    }
}

fn line(order_id: i64, position: u16, sku: &str, quantity: u32) -> OrderLine {
    OrderLine {
        order_id,
        position,
        sku: sku.into(),
        quantity,
    }
}

pub async fn lines<C: Connection + Clone + Sync>(connection: &mut C) {
    let _lock = MUTEX.lock().await;

    // Cleanup
    let result = connection
        .execute("DROP TABLE IF EXISTS order_lines;".into())
        .await;
    assert!(
        result.is_ok(),
        "Failed to drop order_lines: {:?}",
        result.unwrap_err()
    );

    // Create table
    let result = connection
        .execute(
            "CREATE TABLE order_lines (order_id INTEGER NOT NULL, position INTEGER NOT NULL, sku TEXT NOT NULL, quantity INTEGER NOT NULL, PRIMARY KEY (order_id, position));"
                .into(),
        )
        .await;
    assert!(
        result.is_ok(),
        "Failed to create order_lines: {:?}",
        result.unwrap_err()
    );

    let repository = Repository::new(
        Shared(connection.clone()),
        Mapper::<OrderLine>::for_entity(),
    );
    let spec = repository.mapper().table_spec();
    assert_eq!(&**spec.primary_key(), &["order_id", "position"]);
    assert!(
        spec.columns()
            .iter()
            .filter(|c| c.is_primary_key())
            .all(|c| c.primary_key == PrimaryKeyType::PartOfPrimaryKey)
    );

    for item in [
        line(1, 1, "anchor", 1),
        line(1, 2, "chain", 40),
        line(2, 1, "buoy", 3),
    ] {
        let result = repository.add(&item).await;
        assert!(
            result.is_ok(),
            "Failed to add line {}/{}: {:?}",
            item.order_id,
            item.position,
            result.unwrap_err()
        );
    }

    let first_order = |query: SelectQuery| {
        query
            .filter(column("order_id").eq(1))
            .order_by(column("position").asc())
    };
    let result = repository
        .query(&first_order)
        .await
        .expect("Could not query the first order");
    assert_eq!(result, [line(1, 1, "anchor", 1), line(1, 2, "chain", 40)]);

    // Only the matching pair of key values is touched
    let result = repository.update(&line(1, 2, "chain", 25)).await;
    assert_eq!(
        result.expect("Could not update line 1/2").rows_affected,
        1
    );
    let result = repository.remove(&line(1, 1, "", 0)).await;
    assert_eq!(
        result.expect("Could not remove line 1/1").rows_affected,
        1
    );
    let result = repository
        .query(&first_order)
        .await
        .expect("Could not query the first order");
    assert_eq!(result, [line(1, 2, "chain", 25)]);

    // The identifier is compared with every key column
    let result = repository.get_by_id(2).await;
    assert!(result.is_err(), "No line has order_id = position = 2");
    let result = repository.get_by_id(1).await;
    assert!(result.is_err(), "Line 1/1 was removed");
    repository
        .add(&line(3, 3, "shackle", 2))
        .await
        .expect("Could not add line 3/3");
    assert_eq!(
        repository.get_by_id(3).await.expect("Could not get line 3/3"),
        line(3, 3, "shackle", 2)
    );
}
