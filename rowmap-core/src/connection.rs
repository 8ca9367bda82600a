use crate::{Executor, Result};
use std::future::Future;

pub trait Connection: Executor {
    /// Establish a connection to the database identified by `url`.
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send;
}
