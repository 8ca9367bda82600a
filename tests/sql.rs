#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rowmap::{
        BinaryOp, BinaryOpType, Expression, ExpressionExt, GenericSqlWriter, Operand, RowLabeled,
        SelectQuery, SqlWriter, TableRef, Value, column, value,
    };
    use time::macros::{date, datetime, time};
    use uuid::Uuid;

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();

    fn expression(expression: &impl Expression) -> String {
        let mut out = String::new();
        expression.write_query(&WRITER, &mut out);
        out
    }

    fn literal(value: impl Into<Value>) -> String {
        let mut out = String::new();
        WRITER.write_value(&mut out, &value.into());
        out
    }

    fn record() -> RowLabeled {
        RowLabeled::new(
            ["id", "name", "stock"].map(String::from).into(),
            [
                Value::Varchar(Some("A".into())),
                Value::Varchar(Some("O'Brien".into())),
                Value::Int32(Some(5)),
            ]
            .into(),
        )
    }

    #[test]
    fn literals() {
        assert_eq!(literal(Value::Null), "NULL");
        assert_eq!(literal(Value::Int64(None)), "NULL");
        assert_eq!(literal(true), "true");
        assert_eq!(literal(-42i16), "-42");
        assert_eq!(literal(u64::MAX), "18446744073709551615");
        assert_eq!(literal(1.5f64), "1.5");
        assert_eq!(literal(f32::INFINITY), "'inf'");
        assert_eq!(literal("it's"), "'it''s'");
        assert_eq!(literal('q'), "'q'");
        assert_eq!(literal(vec![0xCAu8, 0xFE]), r"'\xCA\xFE'");
        assert_eq!(literal(date!(2024-02-29)), "'2024-02-29'");
        assert_eq!(literal(time!(7:05:00)), "'07:05:00.0'");
        assert_eq!(literal(time!(7:05:00.120)), "'07:05:00.12'");
        assert_eq!(
            literal(datetime!(2024-02-29 7:05:00.5)),
            "'2024-02-29T07:05:00.5'"
        );
        assert_eq!(
            literal(datetime!(2024-02-29 7:05:00 -3:30)),
            "'2024-02-29T07:05:00.0-03:30'"
        );
        assert_eq!(
            literal(datetime!(2024-02-29 7:05:00 +0:09:21)),
            "'2024-02-29T07:05:00.0+00:09:21'"
        );
        assert_eq!(
            literal(Uuid::nil()),
            "'00000000-0000-0000-0000-000000000000'"
        );
    }

    #[test]
    fn identifiers() {
        let mut out = String::new();
        WRITER.write_identifier_quoted(&mut out, r#"odd"name"#);
        assert_eq!(out, r#""odd""name""#);

        let mut out = String::new();
        WRITER.write_table_ref(
            &mut out,
            &TableRef {
                name: "product".into(),
                schema: "shop".into(),
            },
        );
        assert_eq!(out, r#""shop"."product""#);
    }

    #[test]
    fn expressions() {
        assert_eq!(expression(&column("name").eq("B")), r#""name" = 'B'"#);
        assert_eq!(
            expression(&column("stock").gt(0).and(column("name").like("B%"))),
            r#""stock" > 0 AND "name" LIKE 'B%'"#
        );
        assert_eq!(
            expression(&column("a").eq(1).or(column("b").eq(2)).and(column("c").is_null())),
            r#"("a" = 1 OR "b" = 2) AND "c" IS NULL"#
        );
        assert_eq!(
            expression(&column("a").eq(1).and(column("b").eq(2)).not()),
            r#"NOT ("a" = 1 AND "b" = 2)"#
        );
        assert_eq!(
            expression(&column("deleted").is_not_null().not()),
            r#"NOT "deleted" IS NOT NULL"#
        );
        assert_eq!(
            expression(&BinaryOp {
                op: BinaryOpType::Multiplication,
                lhs: BinaryOp {
                    op: BinaryOpType::Addition,
                    lhs: column("price"),
                    rhs: value(1),
                },
                rhs: Operand::Variable(Value::Int32(Some(2))),
            }),
            r#"("price" + 1) * 2"#
        );
        assert_eq!(
            expression(&BinaryOp {
                op: BinaryOpType::Subtraction,
                lhs: column("a"),
                rhs: BinaryOp {
                    op: BinaryOpType::Subtraction,
                    lhs: column("b"),
                    rhs: column("c"),
                },
            }),
            r#""a" - ("b" - "c")"#
        );
        assert_eq!(expression(&column("stock").desc()), r#""stock" DESC"#);
    }

    #[test]
    fn select() {
        let query = SelectQuery::new(
            TableRef::new("product"),
            ["id", "name", "stock"].map(String::from).into(),
        );
        let mut out = String::new();
        WRITER.write_select(&mut out, &query);
        assert_eq!(
            out,
            indoc! {r#"
                SELECT "id", "name", "stock"
                FROM "product";
            "#}
            .trim()
        );

        let query = query
            .filter(column("stock").gt(0))
            .filter(column("name").eq("A").or(column("name").eq("B")))
            .order_by(column("name").asc())
            .order_by(column("stock").desc())
            .limit(10);
        let mut out = String::new();
        WRITER.write_select(&mut out, &query);
        assert_eq!(
            out,
            indoc! {r#"
                SELECT "id", "name", "stock"
                FROM "product"
                WHERE "stock" > 0 AND ("name" = 'A' OR "name" = 'B')
                ORDER BY "name" ASC, "stock" DESC
                LIMIT 10;
            "#}
            .trim()
        );

        let query = SelectQuery::new(TableRef::new("product"), Vec::<String>::new().into())
            .filter(column("name").eq("A").or(column("name").eq("B")));
        let mut out = String::new();
        WRITER.write_select(&mut out, &query);
        assert_eq!(
            out,
            indoc! {r#"
                SELECT *
                FROM "product"
                WHERE "name" = 'A' OR "name" = 'B';
            "#}
            .trim()
        );
    }

    #[test]
    fn insert() {
        let mut out = String::new();
        WRITER.write_insert(&mut out, &TableRef::new("product"), &record());
        assert_eq!(
            out,
            indoc! {r#"
                INSERT INTO "product" ("id", "name", "stock") VALUES
                ('A', 'O''Brien', 5);
            "#}
            .trim()
        );
    }

    #[test]
    fn insert_without_columns() {
        let mut out = String::new();
        WRITER.write_insert(
            &mut out,
            &TableRef::new("event"),
            &RowLabeled::new(Vec::<String>::new().into(), Vec::new().into()),
        );
        assert_eq!(out, r#"INSERT INTO "event" DEFAULT VALUES;"#);
    }

    #[test]
    fn update() {
        let mut out = String::new();
        WRITER.write_update(
            &mut out,
            &TableRef::new("product"),
            &record(),
            &[Box::new(column("id").eq("A"))],
        );
        assert_eq!(
            out,
            indoc! {r#"
                UPDATE "product" SET
                "id" = 'A',
                "name" = 'O''Brien',
                "stock" = 5
                WHERE "id" = 'A';
            "#}
            .trim()
        );
    }

    #[test]
    fn delete() {
        let mut out = String::new();
        WRITER.write_delete(
            &mut out,
            &TableRef::new("line"),
            &[
                Box::new(column("order").eq(7)),
                Box::new(column("position").eq(2)),
            ],
        );
        assert_eq!(
            out,
            indoc! {r#"
                DELETE FROM "line"
                WHERE "order" = 7 AND "position" = 2;
            "#}
            .trim()
        );
    }
}
