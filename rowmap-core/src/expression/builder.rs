use crate::{BinaryOp, BinaryOpType, Expression, Operand, Order, Ordered, UnaryOp, UnaryOpType, Value};
use std::borrow::Cow;

/// Reference a column by name, the starting point of filters written by specifications.
///
/// ```rust
/// use rowmap_core::{ExpressionExt, column};
/// let condition = column("name").eq("B").and(column("stock").gt(0));
/// ```
pub fn column(name: impl Into<Cow<'static, str>>) -> Operand {
    Operand::Column(name.into())
}

/// Literal value operand.
pub fn value(value: impl Into<Value>) -> Operand {
    Operand::Variable(value.into())
}

/// Combinators building comparison and logical expressions.
pub trait ExpressionExt: Expression + Sized {
    fn binary<R: Expression>(self, op: BinaryOpType, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp { op, lhs: self, rhs }
    }
    fn eq(self, rhs: impl Into<Value>) -> BinaryOp<Self, Operand> {
        self.binary(BinaryOpType::Equal, value(rhs))
    }
    fn ne(self, rhs: impl Into<Value>) -> BinaryOp<Self, Operand> {
        self.binary(BinaryOpType::NotEqual, value(rhs))
    }
    fn lt(self, rhs: impl Into<Value>) -> BinaryOp<Self, Operand> {
        self.binary(BinaryOpType::Less, value(rhs))
    }
    fn le(self, rhs: impl Into<Value>) -> BinaryOp<Self, Operand> {
        self.binary(BinaryOpType::LessEqual, value(rhs))
    }
    fn gt(self, rhs: impl Into<Value>) -> BinaryOp<Self, Operand> {
        self.binary(BinaryOpType::Greater, value(rhs))
    }
    fn ge(self, rhs: impl Into<Value>) -> BinaryOp<Self, Operand> {
        self.binary(BinaryOpType::GreaterEqual, value(rhs))
    }
    fn like(self, pattern: impl Into<Cow<'static, str>>) -> BinaryOp<Self, Operand> {
        self.binary(
            BinaryOpType::Like,
            Operand::Variable(Value::Varchar(Some(pattern.into().into_owned()))),
        )
    }
    fn is_null(self) -> BinaryOp<Self, Operand> {
        self.binary(BinaryOpType::Is, Operand::Null)
    }
    fn is_not_null(self) -> BinaryOp<Self, Operand> {
        self.binary(BinaryOpType::IsNot, Operand::Null)
    }
    fn and<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        self.binary(BinaryOpType::And, rhs)
    }
    fn or<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        self.binary(BinaryOpType::Or, rhs)
    }
    fn not(self) -> UnaryOp<Self> {
        UnaryOp {
            op: UnaryOpType::Not,
            v: self,
        }
    }
    fn asc(self) -> Ordered<Self> {
        Ordered {
            order: Order::Asc,
            expression: self,
        }
    }
    fn desc(self) -> Ordered<Self> {
        Ordered {
            order: Order::Desc,
            expression: self,
        }
    }
}

impl ExpressionExt for Operand {}
impl<L: Expression, R: Expression> ExpressionExt for BinaryOp<L, R> {}
impl<V: Expression> ExpressionExt for UnaryOp<V> {}
