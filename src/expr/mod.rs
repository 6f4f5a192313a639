use std::fmt::Write;

use smol_str::SmolStr;

use crate::{
    aggregate::Aggregate,
    bind::{Bind, IntoBind},
    conditionals::{Case, Conditional},
    error::Result,
    functions::Function,
    operators::{Binary, BinaryOp, Nary, NaryOp, Unary, UnaryOp},
    query::Query,
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

mod column;
mod order;
mod value;

pub use column::{Column, ColumnSource, column};
pub use order::{Direction, NullOrder, Nulls, Order};
pub use value::{As, Cast};

/// A node of the expression tree.
#[derive(Debug, Clone)]
pub enum Expr {
    /// The `NULL` sentinel, `x = NULL` renders as `x IS NULL`.
    Null,
    /// A plain value written as a placeholder.
    Value(Bind),
    /// A literal, booleans may render as tautologies.
    Literal(Bind),
    Column(Column),
    List(Vec<Expr>),
    Query(Box<Query>),
    Unary(Unary),
    Binary(Binary),
    Nary(Nary),
    Function(Box<Function>),
    Aggregate(Box<Aggregate>),
    Case(Box<Case>),
    Conditional(Conditional),
    As(As),
    Cast(Cast),
    Order(Order),
    NullOrder(NullOrder),
    Rownum,
}

impl Expr {
    pub fn unary<E: IntoExpr>(op: UnaryOp, operand: E) -> Self {
        Self::Unary(Unary::new(op, operand.into_expr()))
    }

    pub fn binary<L: IntoExpr, R: IntoExpr>(op: BinaryOp, left: L, right: R) -> Self {
        Self::Binary(Binary::new(op, left.into_expr(), right.into_expr()))
    }

    pub fn nary<I, E>(op: NaryOp, operands: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        Self::Nary(Nary::new(
            op,
            operands.into_iter().map(IntoExpr::into_expr).collect(),
        ))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `self AND other`, folding `other` in when it is itself an `AND`.
    pub fn and<E: IntoExpr>(self, other: E) -> Self {
        self.combine(NaryOp::And, other.into_expr())
    }

    /// `self OR other`, folding `other` in when it is itself an `OR`.
    pub fn or<E: IntoExpr>(self, other: E) -> Self {
        self.combine(NaryOp::Or, other.into_expr())
    }

    fn combine(self, op: NaryOp, other: Expr) -> Self {
        match other {
            Expr::Nary(nary) if nary.op == op => {
                let mut operands = Vec::with_capacity(nary.operands.len() + 1);
                operands.push(self);
                operands.extend(nary.operands);
                Self::Nary(Nary::new(op, operands))
            }
            other => Self::Nary(Nary::new(op, vec![self, other])),
        }
    }

    /// Logical negation: comparisons flip to their opposite, anything else
    /// is wrapped in `NOT`.
    pub fn negate(self) -> Self {
        match self {
            Expr::Binary(binary) => match binary.op.negate() {
                Some(op) => Expr::Binary(Binary { op, ..binary }),
                None => Expr::unary(UnaryOp::Not, Expr::Binary(binary)),
            },
            other => Expr::unary(UnaryOp::Not, other),
        }
    }

    /// Output name, `expr AS "name"` in a select list.
    pub fn as_(self, name: impl Into<SmolStr>) -> Self {
        Self::As(As::new(self, name))
    }

    pub fn cast(self, type_name: impl Into<SmolStr>) -> Self {
        Self::Cast(Cast::new(self, type_name))
    }

    pub fn asc(self) -> Self {
        Self::Order(Order::new(self, Direction::Asc))
    }

    pub fn desc(self) -> Self {
        Self::Order(Order::new(self, Direction::Desc))
    }

    pub fn nulls_first(self) -> Self {
        Self::NullOrder(NullOrder::new(self, Nulls::First))
    }

    pub fn nulls_last(self) -> Self {
        Self::NullOrder(NullOrder::new(self, Nulls::Last))
    }

    /// Output name when this is an `AS` expression.
    pub(crate) fn output_name(&self) -> Option<&SmolStr> {
        match self {
            Expr::As(alias) => Some(&alias.name),
            _ => None,
        }
    }
}

impl FormatWriter for Expr {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        match self {
            Expr::Null => context.write_bind(Bind::Null),
            Expr::Value(bind) => context.write_bind(bind.clone()),
            Expr::Literal(bind) => value::write_literal(context, bind),
            Expr::Column(column) => column.format_writer(context),
            Expr::List(items) => {
                context.write_str("(")?;
                context.write_list(items, ", ")?;
                context.write_str(")")
            }
            Expr::Query(query) => {
                context.write_str("(")?;
                query.format_writer(context)?;
                context.write_str(")")
            }
            Expr::Unary(unary) => unary.format_writer(context),
            Expr::Binary(binary) => binary.format_writer(context),
            Expr::Nary(nary) => nary.format_writer(context),
            Expr::Function(function) => function.format_writer(context),
            Expr::Aggregate(aggregate) => aggregate.format_writer(context),
            Expr::Case(case) => case.format_writer(context),
            Expr::Conditional(conditional) => conditional.format_writer(context),
            Expr::As(alias) => alias.format_writer(context),
            Expr::Cast(cast) => cast.format_writer(context),
            Expr::Order(order) => order.format_writer(context),
            Expr::NullOrder(order) => order.format_writer(context),
            Expr::Rownum => context.write_str("ROWNUM"),
        }
    }
}

impl_to_sql!(Expr);

/// Writes a select-list style projection, `expr AS "name"` for output names.
pub(crate) fn write_projection<W: Write>(
    context: &mut FormatContext<'_, W>,
    columns: &[Expr],
) -> Result<()> {
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            context.write_str(", ")?;
        }
        match column {
            Expr::As(alias) => {
                alias.expression.format_writer(context)?;
                context.write_alias(&alias.name)?;
            }
            other => other.format_writer(context)?,
        }
    }
    Ok(())
}

pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for &Expr {
    fn into_expr(self) -> Expr {
        self.clone()
    }
}

impl<T> IntoExpr for T
where
    T: IntoBind,
{
    fn into_expr(self) -> Expr {
        match self.into_bind() {
            Bind::Null => Expr::Null,
            bind => Expr::Value(bind),
        }
    }
}

impl<E> IntoExpr for Vec<E>
where
    E: IntoExpr,
{
    fn into_expr(self) -> Expr {
        Expr::List(self.into_iter().map(IntoExpr::into_expr).collect())
    }
}

impl<E, const N: usize> IntoExpr for [E; N]
where
    E: IntoExpr,
{
    fn into_expr(self) -> Expr {
        Expr::List(self.into_iter().map(IntoExpr::into_expr).collect())
    }
}

macro_rules! impl_into_expr {
    ($($ty:ty => $variant:ident $(($wrap:path))?),* $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    Expr::$variant($($wrap)?(value))
                }
            }

            impl IntoExpr for $ty {
                fn into_expr(self) -> Expr {
                    Expr::from(self)
                }
            }

            impl IntoExpr for &$ty {
                fn into_expr(self) -> Expr {
                    Expr::from(self.clone())
                }
            }
        )*
    };
}

impl_into_expr! {
    Column => Column,
    Unary => Unary,
    Binary => Binary,
    Nary => Nary,
    Function => Function(Box::new),
    Aggregate => Aggregate(Box::new),
    Case => Case(Box::new),
    Conditional => Conditional,
    As => As,
    Cast => Cast,
    Order => Order,
    NullOrder => NullOrder,
    Query => Query(Box::new),
}

/// `NULL` sentinel.
pub fn null() -> Expr {
    Expr::Null
}

/// A literal value, booleans render as `(1 = 1)` / `(1 != 1)` on flavors
/// without boolean literals.
pub fn literal<T: IntoBind>(value: T) -> Expr {
    Expr::Literal(value.into_bind())
}

pub fn rownum() -> Expr {
    Expr::Rownum
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        Table,
        operators::{equal, less},
        tests::render,
    };

    use super::*;

    #[test]
    fn test_value_is_placeholder() {
        let (sql, params) = render(&1i32.into_expr());
        assert_eq!("%s", sql);
        assert_eq!(vec![Bind::I32(1)], params);
    }

    #[test]
    fn test_none_is_null_sentinel() {
        assert!(None::<i32>.into_expr().is_null());
        assert!(Bind::Null.into_expr().is_null());
    }

    #[test]
    fn test_list() {
        let t = Table::new("t");
        let list = exprs![t.column("c2"), 1, null()];
        let (sql, params) = render(&Expr::List(list.to_vec()));
        assert_eq!("(\"c2\", %s, %s)", sql);
        assert_eq!(vec![Bind::I32(1), Bind::Null], params);
    }

    #[test]
    fn test_and_flattens_right() {
        let t = Table::new("t");
        let left = literal(true).and(t.column("c1"));
        let right = literal(false).and(t.column("c2"));
        let (sql, params) = render(&left.and(right));
        assert_eq!("((%s AND \"c1\") AND %s AND \"c2\")", sql);
        assert_eq!(vec![Bind::Bool(true), Bind::Bool(false)], params);
    }

    #[test]
    fn test_or() {
        let t = Table::new("t");
        let expr = t.column("c1").into_expr().or(t.column("c2")).or(t.column("c3"));
        assert_eq!("((\"c1\" OR \"c2\") OR \"c3\")", render(&expr).0);
    }

    #[test]
    fn test_negate_comparison() {
        let t = Table::new("t");
        let expr = less(t.column("c1"), 5).negate();
        assert_eq!("(\"c1\" >= %s)", render(&expr).0);
        let twice = equal(t.column("c1"), 5).negate().negate();
        assert_eq!("(\"c1\" = %s)", render(&twice).0);
    }

    #[test]
    fn test_negate_other() {
        let t = Table::new("t");
        let expr = t.column("c").into_expr().negate();
        assert_eq!("(NOT \"c\")", render(&expr).0);
    }

    #[test]
    fn test_rownum() {
        assert_eq!("ROWNUM", render(&rownum()).0);
    }
}
