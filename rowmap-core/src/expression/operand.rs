use crate::{Expression, OpPrecedence, SqlWriter, Value};
use std::borrow::Cow;

/// Leaf of an expression tree.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Unqualified column name.
    Column(Cow<'static, str>),
    /// Literal value, rendered by the sql writer.
    Variable(Value),
    Null,
}

impl OpPrecedence for Operand {
    fn precedence(&self, _writer: &dyn SqlWriter) -> i32 {
        1_000_000_000
    }
}

impl Expression for Operand {
    fn write_query(&self, writer: &dyn SqlWriter, out: &mut String) {
        writer.write_expression_operand(out, self)
    }
}
