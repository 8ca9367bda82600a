use crate::{
    BinaryOp, BinaryOpType, Expression, Operand, Order, Ordered, RowLabeled, SelectQuery,
    TableRef, UnaryOp, UnaryOpType, Value, possibly_parenthesized, separated_by,
};
use std::fmt::Write;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($out, $value.is_sign_negative());
        } else if $value.is_nan() {
            $this.write_value_nan($out);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Renders values, expressions and statements. Every method has a default
/// implementation, drivers override the fragments their dialect spells differently.
pub trait SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    fn write_table_ref(&self, out: &mut String, value: &TableRef) {
        if !value.schema.is_empty() {
            self.write_identifier_quoted(out, &value.schema);
            out.push('.');
        }
        self.write_identifier_quoted(out, &value.name);
    }

    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(out),
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => self.write_value_u64(out, *v),
            Value::Float32(Some(v)) => write_float!(self, out, *v),
            Value::Float64(Some(v)) => write_float!(self, out, *v),
            Value::Decimal(Some(v), ..) => {
                let _ = write!(out, "{}", v);
            }
            Value::Char(Some(v)) => self.write_value_string(out, v.encode_utf8(&mut [0; 4])),
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => self.write_value_blob(out, v),
            Value::Date(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, v);
                out.push('\'');
            }
            Value::Time(Some(v)) => {
                out.push('\'');
                self.write_value_time(out, v);
                out.push('\'');
            }
            Value::Timestamp(Some(v)) => {
                out.push('\'');
                self.write_value_timestamp(out, v);
                out.push('\'');
            }
            Value::TimestampWithTimezone(Some(v)) => {
                out.push('\'');
                self.write_value_timestamp_with_timezone(out, v);
                out.push('\'');
            }
            Value::Uuid(Some(v)) => {
                let _ = write!(out, "'{}'", v);
            }
            _ => self.write_value_none(out),
        };
    }

    fn write_value_u64(&self, out: &mut String, value: u64) {
        write_integer!(out, value);
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    fn write_value_infinity(&self, out: &mut String, negative: bool) {
        self.write_value_string(out, if negative { "-inf" } else { "inf" });
    }

    fn write_value_nan(&self, out: &mut String) {
        self.write_value_string(out, "NaN");
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push('\'');
        for b in value {
            let _ = write!(out, "\\x{:02X}", b);
        }
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    fn write_value_time(&self, out: &mut String, value: &Time) {
        let mut subsecond = value.nanosecond();
        let mut width = 9;
        while width > 1 && subsecond % 10 == 0 {
            subsecond /= 10;
            width -= 1;
        }
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}.{:0width$}",
            value.hour(),
            value.minute(),
            value.second(),
            subsecond
        );
    }

    fn write_value_timestamp(&self, out: &mut String, value: &PrimitiveDateTime) {
        self.write_value_date(out, &value.date());
        out.push('T');
        self.write_value_time(out, &value.time());
    }

    fn write_value_timestamp_with_timezone(&self, out: &mut String, value: &OffsetDateTime) {
        self.write_value_date(out, &value.date());
        out.push('T');
        self.write_value_time(out, &value.time());
        let offset = value.offset();
        let (hours, minutes, seconds) = offset.as_hms();
        let _ = write!(
            out,
            "{}{:02}:{:02}",
            if offset.is_negative() { '-' } else { '+' },
            hours.unsigned_abs(),
            minutes.unsigned_abs()
        );
        if seconds != 0 {
            let _ = write!(out, ":{:02}", seconds.unsigned_abs());
        }
    }

    fn expression_unary_op_precedence(&self, value: &UnaryOpType) -> i32 {
        match value {
            UnaryOpType::Not => 250,
        }
    }

    fn expression_binary_op_precedence(&self, value: &BinaryOpType) -> i32 {
        match value {
            BinaryOpType::Or => 100,
            BinaryOpType::And => 200,
            BinaryOpType::Equal => 300,
            BinaryOpType::NotEqual => 300,
            BinaryOpType::Less => 300,
            BinaryOpType::Greater => 300,
            BinaryOpType::LessEqual => 300,
            BinaryOpType::GreaterEqual => 300,
            BinaryOpType::Is => 400,
            BinaryOpType::IsNot => 400,
            BinaryOpType::Like => 400,
            BinaryOpType::NotLike => 400,
            BinaryOpType::Subtraction => 800,
            BinaryOpType::Addition => 800,
            BinaryOpType::Multiplication => 900,
            BinaryOpType::Division => 900,
            BinaryOpType::Remainder => 900,
        }
    }

    fn write_expression_operand(&self, out: &mut String, value: &Operand) {
        match value {
            Operand::Column(v) => self.write_identifier_quoted(out, v),
            Operand::Variable(v) => self.write_value(out, v),
            Operand::Null => self.write_value_none(out),
        };
    }

    fn write_expression_unary_op(&self, out: &mut String, value: &UnaryOp<&dyn Expression>) {
        match value.op {
            UnaryOpType::Not => out.push_str("NOT "),
        };
        possibly_parenthesized!(
            out,
            value.v.precedence(self.as_dyn()) <= self.expression_unary_op_precedence(&value.op),
            value.v.write_query(self.as_dyn(), out)
        );
    }

    fn write_expression_binary_op(
        &self,
        out: &mut String,
        value: &BinaryOp<&dyn Expression, &dyn Expression>,
    ) {
        let infix = match value.op {
            BinaryOpType::Multiplication => " * ",
            BinaryOpType::Division => " / ",
            BinaryOpType::Remainder => " % ",
            BinaryOpType::Addition => " + ",
            BinaryOpType::Subtraction => " - ",
            BinaryOpType::Is => " IS ",
            BinaryOpType::IsNot => " IS NOT ",
            BinaryOpType::Like => " LIKE ",
            BinaryOpType::NotLike => " NOT LIKE ",
            BinaryOpType::Equal => " = ",
            BinaryOpType::NotEqual => " != ",
            BinaryOpType::Less => " < ",
            BinaryOpType::LessEqual => " <= ",
            BinaryOpType::Greater => " > ",
            BinaryOpType::GreaterEqual => " >= ",
            BinaryOpType::And => " AND ",
            BinaryOpType::Or => " OR ",
        };
        let precedence = self.expression_binary_op_precedence(&value.op);
        possibly_parenthesized!(
            out,
            value.lhs.precedence(self.as_dyn()) < precedence,
            value.lhs.write_query(self.as_dyn(), out)
        );
        out.push_str(infix);
        possibly_parenthesized!(
            out,
            value.rhs.precedence(self.as_dyn()) <= precedence,
            value.rhs.write_query(self.as_dyn(), out)
        );
    }

    fn write_expression_ordered(&self, out: &mut String, value: &Ordered<&dyn Expression>) {
        value.expression.write_query(self.as_dyn(), out);
        out.push_str(match value.order {
            Order::Asc => " ASC",
            Order::Desc => " DESC",
        });
    }

    /// Conditions are joined with `AND`, nothing is written when there are none.
    fn write_where(&self, out: &mut String, conditions: &[Box<dyn Expression>]) {
        if conditions.is_empty() {
            return;
        }
        out.push_str("\nWHERE ");
        let and = self.expression_binary_op_precedence(&BinaryOpType::And);
        let multiple = conditions.len() > 1;
        separated_by(
            out,
            conditions,
            |out, v| {
                possibly_parenthesized!(
                    out,
                    multiple && v.precedence(self.as_dyn()) < and,
                    v.write_query(self.as_dyn(), out)
                );
            },
            " AND ",
        );
    }

    fn write_select(&self, out: &mut String, query: &SelectQuery) {
        out.push_str("SELECT ");
        if query.columns().is_empty() {
            out.push('*');
        } else {
            separated_by(
                out,
                query.columns().iter(),
                |out, v| self.write_identifier_quoted(out, v),
                ", ",
            );
        }
        out.push_str("\nFROM ");
        self.write_table_ref(out, query.table());
        self.write_where(out, query.conditions());
        if !query.ordering().is_empty() {
            out.push_str("\nORDER BY ");
            separated_by(
                out,
                query.ordering(),
                |out, v| v.write_query(self.as_dyn(), out),
                ", ",
            );
        }
        if let Some(limit) = query.limit_value() {
            let _ = write!(out, "\nLIMIT {}", limit);
        }
        out.push(';');
    }

    fn write_insert(&self, out: &mut String, table: &TableRef, record: &RowLabeled) {
        out.push_str("INSERT INTO ");
        self.write_table_ref(out, table);
        if record.names().is_empty() {
            out.push_str(" DEFAULT VALUES;");
            return;
        }
        out.push_str(" (");
        separated_by(
            out,
            record.names(),
            |out, v| self.write_identifier_quoted(out, v),
            ", ",
        );
        out.push_str(") VALUES\n(");
        separated_by(
            out,
            record.values(),
            |out, v| self.write_value(out, v),
            ", ",
        );
        out.push_str(");");
    }

    fn write_update(
        &self,
        out: &mut String,
        table: &TableRef,
        record: &RowLabeled,
        conditions: &[Box<dyn Expression>],
    ) {
        out.push_str("UPDATE ");
        self.write_table_ref(out, table);
        out.push_str(" SET\n");
        separated_by(
            out,
            record.iter(),
            |out, (name, value)| {
                self.write_identifier_quoted(out, name);
                out.push_str(" = ");
                self.write_value(out, value);
            },
            ",\n",
        );
        self.write_where(out, conditions);
        out.push(';');
    }

    fn write_delete(&self, out: &mut String, table: &TableRef, conditions: &[Box<dyn Expression>]) {
        out.push_str("DELETE FROM ");
        self.write_table_ref(out, table);
        self.write_where(out, conditions);
        out.push(';');
    }
}

/// Dialect neutral writer.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
