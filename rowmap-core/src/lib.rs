mod adapter;
mod as_value;
mod column;
mod connection;
mod declaration;
mod driver;
mod error;
mod executor;
mod expression;
mod mapper;
mod query;
mod repository;
mod select;
mod specification;
mod sql_writer;
mod table_ref;
mod util;
mod value;

pub use ::anyhow::Context;
pub use adapter::*;
pub use as_value::*;
pub use column::*;
pub use connection::*;
pub use declaration::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use expression::*;
pub use mapper::*;
pub use query::*;
pub use repository::*;
pub use select::*;
pub use specification::*;
pub use sql_writer::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
