use crate::{
    Driver, QueryResult, Result, RowLabeled, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
};
use futures::future;
use std::future::Future;

pub trait Executor: Send + Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// General method to send any query and return any result type (either row or count)
    fn run(&mut self, query: String) -> impl Stream<Item = Result<QueryResult>> + Send;

    /// Execute the query and returns the rows.
    fn fetch(&mut self, query: String) -> impl Stream<Item = Result<RowLabeled>> + Send {
        self.run(query).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the query and return the total number of rows affected.
    fn execute(&mut self, query: String) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.run(query)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }
}

/// Hands out the executor each repository operation runs on.
///
/// Asked once per operation, never cached by the repository.
pub trait ExecutorProvider: Send + Sync {
    type Executor: Executor;

    fn executor(&self) -> impl Future<Output = Result<Self::Executor>> + Send;
}

impl<F, Fut, X> ExecutorProvider for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<X>> + Send,
    X: Executor,
{
    type Executor = X;

    fn executor(&self) -> impl Future<Output = Result<X>> + Send {
        self()
    }
}

/// Provider handing out clones of a single executor, for connections that are
/// cheap to clone and safe to share.
#[derive(Debug, Clone)]
pub struct Shared<E>(pub E);

impl<E: Executor + Clone + Sync> ExecutorProvider for Shared<E> {
    type Executor = E;

    fn executor(&self) -> impl Future<Output = Result<E>> + Send {
        future::ready(Ok(self.0.clone()))
    }
}
