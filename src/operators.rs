//! Unary, binary and n-ary operators.
//!
//! Each operator variant gets a builder function, e.g. [`equal`], [`not`],
//! [`in_`], plus [`and_`] / [`or_`] for conjunctions.

use std::fmt::Write;

use sqlnode_derive::{BinaryOperator, UnaryOperator};

use crate::{
    Expr, IntoExpr,
    dialect::ParamStyle,
    error::Result,
    functions,
    writer::{FormatContext, FormatWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, UnaryOperator)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    SquareRoot,
    CubeRoot,
    Factorial,
    #[operator(name = "abs")]
    Abs,
    #[operator(name = "b_not")]
    BNot,
    Exists,
    Any,
    All,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "NOT",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::SquareRoot => "|/",
            UnaryOp::CubeRoot => "||/",
            UnaryOp::Factorial => "!!",
            UnaryOp::Abs => "@",
            UnaryOp::BNot => "~",
            UnaryOp::Exists => "EXISTS",
            UnaryOp::Any => "ANY",
            UnaryOp::All => "ALL",
        }
    }
}

/// `SOME` is spelled `ANY`.
pub fn some<E: IntoExpr>(operand: E) -> Expr {
    any(operand)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, BinaryOperator)]
pub enum BinaryOp {
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    Add,
    Sub,
    Mul,
    Div,
    #[operator(name = "mod_")]
    Mod,
    Pow,
    #[operator(name = "b_and")]
    BAnd,
    #[operator(name = "b_or")]
    BOr,
    #[operator(name = "b_xor")]
    BXor,
    #[operator(name = "lshift")]
    LShift,
    #[operator(name = "rshift")]
    RShift,
    Concat,
    Like,
    NotLike,
    #[operator(name = "ilike")]
    ILike,
    #[operator(name = "not_ilike")]
    NotILike,
    #[operator(name = "in_")]
    In,
    NotIn,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
            BinaryOp::BAnd => "&",
            BinaryOp::BOr => "|",
            BinaryOp::BXor => "#",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::Concat => "||",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
            BinaryOp::ILike => "ILIKE",
            BinaryOp::NotILike => "NOT ILIKE",
            BinaryOp::In => "IN",
            BinaryOp::NotIn => "NOT IN",
        }
    }

    /// The operator matching exactly the rows this one rejects.
    pub fn negate(self) -> Option<Self> {
        use BinaryOp::*;

        Some(match self {
            Less => GreaterEqual,
            GreaterEqual => Less,
            Greater => LessEqual,
            LessEqual => Greater,
            Equal => NotEqual,
            NotEqual => Equal,
            Like => NotLike,
            NotLike => Like,
            ILike => NotILike,
            NotILike => ILike,
            In => NotIn,
            NotIn => In,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaryOp {
    And,
    Or,
}

impl NaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            NaryOp::And => "AND",
            NaryOp::Or => "OR",
        }
    }
}

/// `(left AND right)`, folding `right` in when it is itself an `AND`.
pub fn and_<L: IntoExpr, R: IntoExpr>(left: L, right: R) -> Expr {
    left.into_expr().and(right)
}

/// `(left OR right)`, folding `right` in when it is itself an `OR`.
pub fn or_<L: IntoExpr, R: IntoExpr>(left: L, right: R) -> Expr {
    left.into_expr().or(right)
}

/// `(a AND b AND ...)`
pub fn all_of<I, E>(operands: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: IntoExpr,
{
    Expr::nary(NaryOp::And, operands)
}

/// `(a OR b OR ...)`
pub fn any_of<I, E>(operands: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: IntoExpr,
{
    Expr::nary(NaryOp::Or, operands)
}

#[derive(Debug, Clone)]
pub struct Unary {
    pub(crate) op: UnaryOp,
    pub(crate) operand: Box<Expr>,
}

impl Unary {
    pub fn new(op: UnaryOp, operand: Expr) -> Self {
        Self {
            op,
            operand: Box::new(operand),
        }
    }
}

impl FormatWriter for Unary {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        context.write_str("(")?;
        context.write_str(self.op.as_str())?;
        context.write_str(" ")?;
        self.operand.format_writer(context)?;
        context.write_str(")")
    }
}

#[derive(Debug, Clone)]
pub struct Binary {
    pub(crate) op: BinaryOp,
    pub(crate) left: Box<Expr>,
    pub(crate) right: Box<Expr>,
}

impl Binary {
    pub fn new(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn op(&self) -> BinaryOp {
        self.op
    }

    fn write_null_test<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<bool> {
        let test = match self.op {
            BinaryOp::Equal => " IS NULL)",
            BinaryOp::NotEqual => " IS NOT NULL)",
            _ => return Ok(false),
        };
        let operand = if self.left.is_null() {
            &self.right
        } else if self.right.is_null() {
            &self.left
        } else {
            return Ok(false);
        };
        context.write_str("(")?;
        operand.format_writer(context)?;
        context.write_str(test)?;
        Ok(true)
    }

    fn write_upper_like<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<bool> {
        let op = match self.op {
            BinaryOp::ILike => "LIKE",
            BinaryOp::NotILike => "NOT LIKE",
            _ => return Ok(false),
        };
        if context.flavor.ilike {
            return Ok(false);
        }
        context.write_str("(")?;
        functions::upper(self.left.as_ref().clone()).format_writer(context)?;
        context.write_str(" ")?;
        context.write_str(op)?;
        context.write_str(" ")?;
        functions::upper(self.right.as_ref().clone()).format_writer(context)?;
        context.write_str(")")?;
        Ok(true)
    }
}

impl FormatWriter for Binary {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        if self.write_null_test(context)? || self.write_upper_like(context)? {
            return Ok(());
        }
        let op = match self.op {
            // `%` must survive the driver's own formatting
            BinaryOp::Mod if context.flavor.param_style == ParamStyle::Format => "%%",
            op => op.as_str(),
        };
        context.write_str("(")?;
        self.left.format_writer(context)?;
        context.write_str(" ")?;
        context.write_str(op)?;
        context.write_str(" ")?;
        self.right.format_writer(context)?;
        context.write_str(")")
    }
}

#[derive(Debug, Clone)]
pub struct Nary {
    pub(crate) op: NaryOp,
    pub(crate) operands: Vec<Expr>,
}

impl Nary {
    pub fn new(op: NaryOp, operands: Vec<Expr>) -> Self {
        Self { op, operands }
    }
}

impl FormatWriter for Nary {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        let separator = match self.op {
            NaryOp::And => " AND ",
            NaryOp::Or => " OR ",
        };
        context.write_str("(")?;
        context.write_list(&self.operands, separator)?;
        context.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        Bind, ColumnSource, Flavor, ParamStyle, Table, exprs, literal, null,
        tests::{render, render_with},
    };

    use super::*;

    #[test]
    fn test_unary() {
        let t = Table::new("t");
        assert_eq!("(NOT \"c\")", render(&not(t.column("c"))).0);
        assert_eq!("(- \"c1\")", render(&neg(t.column("c1"))).0);
        assert_eq!("(@ \"c1\")", render(&abs(t.column("c1"))).0);
        assert_eq!("(|/ \"c1\")", render(&square_root(t.column("c1"))).0);
        assert_eq!("(~ \"c1\")", render(&b_not(t.column("c1"))).0);
        assert_eq!("(ANY \"c1\")", render(&some(t.column("c1"))).0);
    }

    #[test]
    fn test_binary() {
        let t = Table::new("t");
        let (sql, params) = render(&lshift(t.column("c1"), 2));
        assert_eq!("(\"c1\" << %s)", sql);
        assert_eq!(vec![Bind::I32(2)], params);
        assert_eq!("(\"c1\" ^ \"c2\")", render(&pow(t.column("c1"), t.column("c2"))).0);
        assert_eq!("(\"c1\" || \"c2\")", render(&concat(t.column("c1"), t.column("c2"))).0);
        assert_eq!("(\"c1\" # \"c2\")", render(&b_xor(t.column("c1"), t.column("c2"))).0);
    }

    #[test]
    fn test_mod_escapes_format_style() {
        let t = Table::new("t");
        let expr = mod_(t.column("c1"), t.column("c2"));
        assert_eq!("(\"c1\" %% \"c2\")", render(&expr).0);
        let qmark = Flavor {
            param_style: ParamStyle::Qmark,
            ..Flavor::default()
        };
        assert_eq!("(\"c1\" % \"c2\")", render_with(&expr, &qmark).0);
    }

    #[test]
    fn test_null_sentinel_on_either_side() {
        let t = Table::new("t");
        let (sql, params) = render(&equal(t.column("c1"), null()));
        assert_eq!("(\"c1\" IS NULL)", sql);
        assert!(params.is_empty());
        assert_eq!("(\"c1\" IS NULL)", render(&equal(null(), t.column("c1"))).0);
        assert_eq!("(\"c1\" IS NOT NULL)", render(&not_equal(t.column("c1"), None::<i32>)).0);
        assert_eq!("(\"c1\" IS NOT NULL)", render(&not_equal(null(), t.column("c1"))).0);
    }

    #[test]
    fn test_null_sentinel_with_value() {
        let (sql, params) = render(&equal("test", null()));
        assert_eq!("(%s IS NULL)", sql);
        assert_eq!(vec![Bind::String("test".into())], params);
    }

    #[test]
    fn test_null_elsewhere_is_a_param() {
        let t = Table::new("t");
        let (sql, params) = render(&less(t.column("c1"), null()));
        assert_eq!("(\"c1\" < %s)", sql);
        assert_eq!(vec![Bind::Null], params);
    }

    #[test]
    fn test_ilike_fallback() {
        let t = Table::new("t");
        let (sql, params) = render(&ilike(t.column("c1"), "foo"));
        assert_eq!("(UPPER(\"c1\") LIKE UPPER(%s))", sql);
        assert_eq!(vec![Bind::String("foo".into())], params);
        assert_eq!(
            "(UPPER(\"c1\") NOT LIKE UPPER(%s))",
            render(&not_ilike(t.column("c1"), "foo")).0
        );
    }

    #[test]
    fn test_ilike_native() {
        let t = Table::new("t");
        let flavor = Flavor {
            ilike: true,
            ..Flavor::default()
        };
        assert_eq!("(\"c1\" ILIKE %s)", render_with(&ilike(t.column("c1"), "foo"), &flavor).0);
        assert_eq!(
            "(\"c1\" NOT ILIKE %s)",
            render_with(&not_ilike(t.column("c1"), "foo"), &flavor).0
        );
    }

    #[test]
    fn test_in_list() {
        let t = Table::new("t");
        let (sql, params) = render(&in_(t.column("c1"), exprs![t.column("c2"), 1, null()]));
        assert_eq!("(\"c1\" IN (\"c2\", %s, %s))", sql);
        assert_eq!(vec![Bind::I32(1), Bind::Null], params);
    }

    #[test]
    fn test_in_values() {
        let t = Table::new("t");
        let (sql, params) = render(&not_in(t.column("c1"), vec![1, 2]));
        assert_eq!("(\"c1\" NOT IN (%s, %s))", sql);
        assert_eq!(vec![Bind::I32(1), Bind::I32(2)], params);
    }

    #[test]
    fn test_in_subquery() {
        let t1 = Table::new("t1");
        let t2 = Table::new("t2");
        let mut query = t2.select();
        query.columns([t2.column("c2")]);
        let (sql, _) = render(&in_(t1.column("c1"), &query));
        assert_eq!("(\"c1\" IN (SELECT \"a\".\"c2\" FROM \"t2\" AS \"a\"))", sql);
    }

    #[test]
    fn test_exists() {
        let t = Table::new("t");
        let mut query = t.select();
        query
            .columns([t.column("c1")])
            .where_(equal(t.column("c1"), "foo"));
        let (sql, params) = render(&exists(query));
        assert_eq!(
            "(EXISTS (SELECT \"a\".\"c1\" FROM \"t\" AS \"a\" WHERE (\"a\".\"c1\" = %s)))",
            sql
        );
        assert_eq!(vec![Bind::String("foo".into())], params);
    }

    #[test]
    fn test_nary() {
        let t = Table::new("t");
        let expr = all_of(exprs![t.column("c1"), t.column("c2"), literal(true)]);
        assert_eq!("(\"c1\" AND \"c2\" AND %s)", render(&expr).0);
        let expr = or_(t.column("c1"), any_of([t.column("c2"), t.column("c3")]));
        assert_eq!("(\"c1\" OR \"c2\" OR \"c3\")", render(&expr).0);
    }

    #[test]
    fn test_negate_table() {
        assert_eq!(Some(BinaryOp::GreaterEqual), BinaryOp::Less.negate());
        assert_eq!(Some(BinaryOp::LessEqual), BinaryOp::Greater.negate());
        assert_eq!(Some(BinaryOp::Equal), BinaryOp::NotEqual.negate());
        assert_eq!(Some(BinaryOp::NotILike), BinaryOp::ILike.negate());
        assert_eq!(Some(BinaryOp::In), BinaryOp::NotIn.negate());
        assert_eq!(None, BinaryOp::Add.negate());
    }
}
