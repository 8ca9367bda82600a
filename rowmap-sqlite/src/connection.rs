use crate::{SqliteDriver, SqliteOptions, extract::extract_value};
use async_stream::try_stream;
use rowmap_core::{
    Connection, Error, Executor, QueryResult, Result, Row, RowLabeled, RowNames, RowsAffected,
    stream::Stream, truncate_long,
};
use std::sync::{Arc, Mutex};
use tokio::{
    sync::mpsc::{self, UnboundedSender},
    task::spawn_blocking,
};

/// Handle to a sqlite database.
///
/// Clones share the same underlying connection, statements from different clones
/// run one at a time.
#[derive(Clone)]
pub struct SqliteConnection {
    pub(crate) connection: Arc<Mutex<rusqlite::Connection>>,
}

impl SqliteConnection {
    pub async fn open(options: SqliteOptions) -> Result<Self> {
        let context = format!("While opening the sqlite database `{}`", options.path);
        let connection = spawn_blocking(move || {
            rusqlite::Connection::open_with_flags(&options.path, options.flags())
        })
        .await?
        .map_err(|e| {
            let error = Error::new(e).context(context);
            log::error!("{:#}", error);
            error
        })?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

/// Runs on the blocking pool, results are sent as they are read. Stops early
/// when the receiving stream is dropped.
/// Sending never blocks, the connection lock must not wait on the consumer.
fn run_blocking(
    connection: &Mutex<rusqlite::Connection>,
    sql: &str,
    sender: &UnboundedSender<QueryResult>,
) -> Result<()> {
    let connection = connection
        .lock()
        .map_err(|e| Error::msg(format!("The sqlite connection is unusable: {}", e)))?;
    let mut statement = connection.prepare(sql)?;
    if statement.column_count() == 0 {
        let rows_affected = statement.execute([])? as u64;
        let is_insert = sql
            .trim_start()
            .get(..6)
            .is_some_and(|v| v.eq_ignore_ascii_case("INSERT"));
        let _ = sender.send(
            RowsAffected {
                rows_affected,
                last_affected_id: is_insert.then(|| connection.last_insert_rowid()),
            }
            .into(),
        );
        return Ok(());
    }
    let labels: RowNames = statement
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let mut rows = statement.query([])?;
    while let Some(row) = rows.next()? {
        let values = (0..labels.len())
            .map(|i| extract_value(row.get_ref(i)?))
            .collect::<Result<Row>>()?;
        if sender
            .send(RowLabeled::new(labels.clone(), values).into())
            .is_err()
        {
            break;
        }
    }
    Ok(())
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn driver(&self) -> &Self::Driver {
        &SqliteDriver {}
    }

    fn run(&mut self, query: String) -> impl Stream<Item = Result<QueryResult>> + Send {
        let connection = self.connection.clone();
        try_stream! {
            let (sender, mut receiver) = mpsc::unbounded_channel();
            let task = spawn_blocking(move || {
                run_blocking(&connection, &query, &sender).map_err(|e| {
                    let error = e.context(format!(
                        "While executing the query:\n{}",
                        truncate_long!(query)
                    ));
                    log::error!("{:#}", error);
                    error
                })
            });
            while let Some(result) = receiver.recv().await {
                yield result;
            }
            task.await??;
        }
    }
}

impl Connection for SqliteConnection {
    async fn connect(url: &str) -> Result<SqliteConnection> {
        let options = SqliteOptions::from_url(url).inspect_err(|e| log::error!("{:#}", e))?;
        Self::open(options).await
    }
}
