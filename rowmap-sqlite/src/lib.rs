mod connection;
mod driver;
mod extract;
mod options;
mod sql_writer;

pub use connection::*;
pub use driver::*;
pub use options::*;
pub use sql_writer::*;
