use rowmap_core::SqlWriter;
use std::fmt::Write;

/// Sqlite has no boolean type and reads blobs only from `X'..'` literals.
///
/// Integers past `i64::MAX` are written as text, a numeric literal that large would
/// be read as a lossy REAL. The digits survive only in columns without numeric
/// affinity (`TEXT` or no declared type).
#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteSqlWriter {}

impl SqlWriter for SqliteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
    }

    fn write_value_u64(&self, out: &mut String, value: u64) {
        if i64::try_from(value).is_ok() {
            let _ = write!(out, "{}", value);
        } else {
            self.write_value_string(out, &value.to_string());
        }
    }

    fn write_value_infinity(&self, out: &mut String, negative: bool) {
        if negative {
            out.push('-');
        }
        out.push_str("1.0e+10000");
    }

    fn write_value_nan(&self, out: &mut String) {
        // Sqlite stores NaN as NULL anyway
        self.write_value_none(out);
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        out.push_str(&hex::encode_upper(value));
        out.push('\'');
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteSqlWriter;
    use rowmap_core::{SqlWriter, Value};

    fn literal(value: impl Into<Value>) -> String {
        let mut out = String::new();
        SqliteSqlWriter {}.write_value(&mut out, &value.into());
        out
    }

    #[test]
    fn sqlite_literals() {
        assert_eq!(literal(true), "1");
        assert_eq!(literal(f64::NEG_INFINITY), "-1.0e+10000");
        assert_eq!(literal(f64::NAN), "NULL");
        assert_eq!(literal(vec![0xCAu8, 0xFE]), "X'CAFE'");
        assert_eq!(literal(i64::MAX as u64), "9223372036854775807");
        assert_eq!(literal(u64::MAX), "'18446744073709551615'");
    }
}
