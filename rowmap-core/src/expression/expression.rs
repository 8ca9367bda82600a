use crate::{OpPrecedence, SqlWriter, Value};
use std::fmt::Debug;

/// A renderable SQL expression node.
pub trait Expression: OpPrecedence + Send + Sync + Debug {
    /// Serialize the expression into the output string using the sql writer.
    fn write_query(&self, writer: &dyn SqlWriter, out: &mut String);
}

impl<T: Expression + ?Sized> Expression for &T {
    fn write_query(&self, writer: &dyn SqlWriter, out: &mut String) {
        (**self).write_query(writer, out);
    }
}

impl Expression for Box<dyn Expression> {
    fn write_query(&self, writer: &dyn SqlWriter, out: &mut String) {
        self.as_ref().write_query(writer, out);
    }
}

impl Expression for bool {
    fn write_query(&self, writer: &dyn SqlWriter, out: &mut String) {
        writer.write_value_bool(out, *self);
    }
}

impl Expression for Value {
    fn write_query(&self, writer: &dyn SqlWriter, out: &mut String) {
        writer.write_value(out, self);
    }
}
