//! `CASE` and the conditional functions.

use std::fmt::Write;

use crate::{
    Expr, IntoExpr,
    error::Result,
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

/// `CASE WHEN c THEN r ... [ELSE e] END`
#[derive(Debug, Clone, Default)]
pub struct Case {
    whens: Vec<(Expr, Expr)>,
    otherwise: Option<Expr>,
}

impl Case {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn when<C: IntoExpr, R: IntoExpr>(mut self, condition: C, result: R) -> Self {
        self.whens.push((condition.into_expr(), result.into_expr()));
        self
    }

    /// `ELSE result`
    pub fn otherwise<R: IntoExpr>(mut self, result: R) -> Self {
        self.otherwise = Some(result.into_expr());
        self
    }
}

impl FormatWriter for Case {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        context.write_str("CASE")?;
        for (condition, result) in &self.whens {
            context.write_str(" WHEN ")?;
            condition.format_writer(context)?;
            context.write_str(" THEN ")?;
            result.format_writer(context)?;
        }
        if let Some(otherwise) = &self.otherwise {
            context.write_str(" ELSE ")?;
            otherwise.format_writer(context)?;
        }
        context.write_str(" END")
    }
}

pub fn case() -> Case {
    Case::new()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionalKind {
    Coalesce,
    NullIf,
    Greatest,
    Least,
}

impl ConditionalKind {
    fn name(self) -> &'static str {
        match self {
            ConditionalKind::Coalesce => "COALESCE",
            ConditionalKind::NullIf => "NULLIF",
            ConditionalKind::Greatest => "GREATEST",
            ConditionalKind::Least => "LEAST",
        }
    }
}

/// `COALESCE(..)`, `NULLIF(..)`, `GREATEST(..)`, `LEAST(..)`
#[derive(Debug, Clone)]
pub struct Conditional {
    kind: ConditionalKind,
    values: Vec<Expr>,
}

impl Conditional {
    pub fn new<I, E>(kind: ConditionalKind, values: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        Self {
            kind,
            values: values.into_iter().map(IntoExpr::into_expr).collect(),
        }
    }
}

impl FormatWriter for Conditional {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        context.write_str(self.kind.name())?;
        context.write_str("(")?;
        context.write_list(&self.values, ", ")?;
        context.write_str(")")
    }
}

impl_to_sql!(Case, Conditional);

pub fn coalesce<I, E>(values: I) -> Conditional
where
    I: IntoIterator<Item = E>,
    E: IntoExpr,
{
    Conditional::new(ConditionalKind::Coalesce, values)
}

pub fn nullif<L: IntoExpr, R: IntoExpr>(left: L, right: R) -> Conditional {
    Conditional::new(ConditionalKind::NullIf, [left.into_expr(), right.into_expr()])
}

pub fn greatest<I, E>(values: I) -> Conditional
where
    I: IntoIterator<Item = E>,
    E: IntoExpr,
{
    Conditional::new(ConditionalKind::Greatest, values)
}

pub fn least<I, E>(values: I) -> Conditional
where
    I: IntoIterator<Item = E>,
    E: IntoExpr,
{
    Conditional::new(ConditionalKind::Least, values)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Bind, ColumnSource, Table, exprs, tests::render};

    use super::*;

    #[test]
    fn test_case() {
        let t = Table::new("t");
        let case = case()
            .when(t.column("c1"), "foo")
            .when(t.column("c2"), "bar")
            .otherwise(t.column("c3"));
        let (sql, params) = render(&case);
        assert_eq!("CASE WHEN \"c1\" THEN %s WHEN \"c2\" THEN %s ELSE \"c3\" END", sql);
        assert_eq!(
            vec![Bind::String("foo".into()), Bind::String("bar".into())],
            params
        );
    }

    #[test]
    fn test_case_without_else() {
        let t = Table::new("t");
        let (sql, _) = render(&case().when(t.column("c1"), 1));
        assert_eq!("CASE WHEN \"c1\" THEN %s END", sql);
    }

    #[test]
    fn test_coalesce() {
        let t = Table::new("t");
        let (sql, params) = render(&coalesce(exprs![t.column("c1"), t.column("c2"), "foo"]));
        assert_eq!("COALESCE(\"c1\", \"c2\", %s)", sql);
        assert_eq!(vec![Bind::String("foo".into())], params);
    }

    #[test]
    fn test_nullif_greatest_least() {
        let t = Table::new("t");
        assert_eq!("NULLIF(\"c1\", %s)", render(&nullif(t.column("c1"), 0)).0);
        assert_eq!(
            "GREATEST(\"c1\", \"c2\")",
            render(&greatest([t.column("c1"), t.column("c2")])).0
        );
        assert_eq!("LEAST(%s, %s)", render(&least([1, 2])).0);
    }
}
