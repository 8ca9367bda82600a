use futures::lock::Mutex;
use rowmap::{
    AllRecords, Column, Connection, Declaration, Entity, Executor, Mapper, Repository,
    Rfc3339Adapter, Shared, is_entity_not_found,
};
use std::sync::LazyLock;
use time::{
    Date, OffsetDateTime, Time,
    macros::{date, datetime, time},
};
use uuid::Uuid;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Measurement {
    pub id: Uuid,
    pub taken_at: Option<OffsetDateTime>,
    pub valid: bool,
    pub value: f64,
    pub day: Option<Date>,
    pub at: Option<Time>,
    pub note: Option<String>,
    pub payload: Vec<u8>,
}

impl Entity for Measurement {
    fn declaration() -> Declaration<Self> {
        Declaration::new("measurements")
            .column(
                Column::new("id", |m: &Measurement| &m.id, |m: &mut Measurement| &mut m.id)
                    .primary_key(),
            )
            .column(
                Column::new(
                    "taken_at",
                    |m: &Measurement| &m.taken_at,
                    |m: &mut Measurement| &mut m.taken_at,
                )
                .adapter(Rfc3339Adapter),
            )
            .column(Column::new("valid", |m: &Measurement| &m.valid, |m: &mut Measurement| &mut m.valid))
            .column(Column::new("value", |m: &Measurement| &m.value, |m: &mut Measurement| &mut m.value))
            .column(Column::new("day", |m: &Measurement| &m.day, |m: &mut Measurement| &mut m.day))
            .column(Column::new("clock", |m: &Measurement| &m.at, |m: &mut Measurement| &mut m.at))
            .column(Column::new("note", |m: &Measurement| &m.note, |m: &mut Measurement| &mut m.note))
            .column(Column::new(
                "payload",
                |m: &Measurement| &m.payload,
                |m: &mut Measurement| &mut m.payload,
            ))
    }
}

/// Keyed by a timestamp stored as RFC 3339 text.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub at: OffsetDateTime,
    pub label: String,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Counter {
    pub id: i64,
    pub hits: u64,
}

impl Entity for Counter {
    fn declaration() -> Declaration<Self> {
        Declaration::new("counters")
            .column(Column::new("id", |c: &Counter| &c.id, |c: &mut Counter| &mut c.id).primary_key())
            .column(Column::new("hits", |c: &Counter| &c.hits, |c: &mut Counter| &mut c.hits))
    }
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self {
            at: OffsetDateTime::UNIX_EPOCH,
            label: String::new(),
        }
    }
}

pub async fn readings<C: Connection + Clone + Sync>(connection: &mut C) {
    let _lock = MUTEX.lock().await;

    // Cleanup
    for table in ["measurements", "checkpoints", "counters"] {
        let result = connection
            .execute(format!("DROP TABLE IF EXISTS {};", table))
            .await;
        assert!(
            result.is_ok(),
            "Failed to drop {}: {:?}",
            table,
            result.unwrap_err()
        );
    }

    // Create tables
    let result = connection
        .execute(
            "CREATE TABLE measurements (id TEXT PRIMARY KEY, taken_at TEXT, valid INTEGER NOT NULL, value REAL NOT NULL, day TEXT, clock TEXT, note TEXT, payload BLOB NOT NULL);"
                .into(),
        )
        .await;
    assert!(
        result.is_ok(),
        "Failed to create measurements: {:?}",
        result.unwrap_err()
    );
    let result = connection
        .execute("CREATE TABLE checkpoints (moment TEXT PRIMARY KEY, label TEXT NOT NULL);".into())
        .await;
    assert!(
        result.is_ok(),
        "Failed to create checkpoints: {:?}",
        result.unwrap_err()
    );

    // Unsigned values past i64::MAX only keep their digits without numeric affinity
    let result = connection
        .execute("CREATE TABLE counters (id INTEGER PRIMARY KEY, hits TEXT NOT NULL);".into())
        .await;
    assert!(
        result.is_ok(),
        "Failed to create counters: {:?}",
        result.unwrap_err()
    );

    let measurements = Repository::new(
        Shared(connection.clone()),
        Mapper::<Measurement>::for_entity(),
    );

    let full = Measurement {
        id: Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap(),
        taken_at: Some(datetime!(2025-06-07 14:32:00.25 +02:00)),
        valid: true,
        value: -12.125,
        day: Some(date!(2025-06-07)),
        at: Some(time!(14:32:00.5)),
        note: Some("it's calibrated".into()),
        payload: b"\x00\x01binary\xff".to_vec(),
    };
    let sparse = Measurement {
        id: Uuid::new_v4(),
        taken_at: None,
        valid: false,
        value: 0.0,
        day: None,
        at: None,
        note: None,
        payload: Vec::new(),
    };
    for item in [&full, &sparse] {
        let result = measurements.add(item).await;
        assert!(
            result.is_ok(),
            "Failed to add measurement {}: {:?}",
            item.id,
            result.unwrap_err()
        );
    }

    // Every field comes back as it was written
    let result = measurements.get_by_id(full.id).await;
    assert!(
        result.is_ok(),
        "Failed to get the measurement: {:?}",
        result.unwrap_err()
    );
    assert_eq!(result.unwrap(), full);
    assert_eq!(
        measurements
            .get_by_id(sparse.id)
            .await
            .expect("Could not get the sparse measurement"),
        sparse
    );
    assert!(is_entity_not_found(
        &measurements
            .get_by_id(Uuid::nil())
            .await
            .expect_err("The nil id should not be found")
    ));

    // Clearing optional fields
    let cleared = Measurement {
        taken_at: None,
        note: None,
        ..full.clone()
    };
    let result = measurements.update(&cleared).await;
    assert_eq!(
        result.expect("Could not update the measurement").rows_affected,
        1
    );
    assert_eq!(
        measurements
            .get_by_id(full.id)
            .await
            .expect("Could not get the updated measurement"),
        cleared
    );

    // Adapted primary key
    let checkpoints = Repository::new(
        Shared(connection.clone()),
        Mapper::new(
            Declaration::new("checkpoints")
                .column(
                    Column::new("moment", |c: &Checkpoint| &c.at, |c: &mut Checkpoint| &mut c.at)
                        .primary_key()
                        .adapter(Rfc3339Adapter),
                )
                .column(Column::new(
                    "label",
                    |c: &Checkpoint| &c.label,
                    |c: &mut Checkpoint| &mut c.label,
                )),
        ),
    );
    let checkpoint = Checkpoint {
        at: datetime!(2025-01-01 00:00:00 -05:00),
        label: "new year".into(),
    };
    checkpoints
        .add(&checkpoint)
        .await
        .expect("Could not add the checkpoint");
    // The key is looked up in its stored form
    assert_eq!(
        checkpoints
            .get_by_id("2025-01-01T00:00:00-05:00")
            .await
            .expect("Could not get the checkpoint"),
        checkpoint
    );
    let result = checkpoints.remove(&checkpoint).await;
    assert_eq!(
        result.expect("Could not remove the checkpoint").rows_affected,
        1
    );
    assert!(
        checkpoints
            .query(&AllRecords)
            .await
            .expect("Could not query the checkpoints")
            .is_empty()
    );

    // Full unsigned range
    let counters = Repository::new(Shared(connection.clone()), Mapper::<Counter>::for_entity());
    for counter in [
        Counter { id: 1, hits: u64::MAX },
        Counter { id: 2, hits: 7 },
        Counter {
            id: 3,
            hits: i64::MAX as u64 + 1,
        },
    ] {
        counters
            .add(&counter)
            .await
            .expect("Could not add the counter");
        assert_eq!(
            counters
                .get_by_id(counter.id)
                .await
                .expect("Could not get the counter"),
            counter
        );
    }
    let result = counters
        .update(&Counter {
            id: 2,
            hits: u64::MAX - 1,
        })
        .await;
    assert_eq!(
        result.expect("Could not update the counter").rows_affected,
        1
    );
    assert_eq!(
        counters
            .get_by_id(2)
            .await
            .expect("Could not get the updated counter")
            .hits,
        u64::MAX - 1
    );
}
