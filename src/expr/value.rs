use std::fmt::Write;

use smol_str::SmolStr;

use crate::{
    bind::Bind,
    error::Result,
    writer::{FormatContext, FormatWriter},
};

use super::Expr;

pub(super) fn write_literal<W: Write>(context: &mut FormatContext<'_, W>, bind: &Bind) -> Result<()> {
    match bind {
        Bind::Bool(true) if context.flavor.no_boolean => context.write_str("(1 = 1)"),
        Bind::Bool(false) if context.flavor.no_boolean => context.write_str("(1 != 1)"),
        other => context.write_bind(other.clone()),
    }
}

/// An output name. Referenced as `"name"`, projected as `expr AS "name"`.
#[derive(Debug, Clone)]
pub struct As {
    pub(crate) expression: Box<Expr>,
    pub(crate) name: SmolStr,
}

impl As {
    pub fn new(expression: Expr, name: impl Into<SmolStr>) -> Self {
        Self {
            expression: Box::new(expression),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FormatWriter for As {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        context.write_ident(&self.name)
    }
}

/// `CAST(expr AS type)`
#[derive(Debug, Clone)]
pub struct Cast {
    pub(crate) expression: Box<Expr>,
    pub(crate) type_name: SmolStr,
}

impl Cast {
    pub fn new(expression: Expr, type_name: impl Into<SmolStr>) -> Self {
        Self {
            expression: Box::new(expression),
            type_name: type_name.into(),
        }
    }
}

impl FormatWriter for Cast {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        context.write_str("CAST(")?;
        self.expression.format_writer(context)?;
        context.write_str(" AS ")?;
        context.write_str(&self.type_name)?;
        context.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        Bind, ColumnSource, Flavor, IntoExpr, Table, literal,
        tests::{render, render_with},
    };

    #[test]
    fn test_literal() {
        let (sql, params) = render(&literal("foo"));
        assert_eq!("%s", sql);
        assert_eq!(vec![Bind::String("foo".into())], params);
    }

    #[test]
    fn test_boolean_literal_without_booleans() {
        let flavor = Flavor {
            no_boolean: true,
            ..Flavor::default()
        };
        let (sql, params) = render_with(&literal(true), &flavor);
        assert_eq!("(1 = 1)", sql);
        assert!(params.is_empty());
        assert_eq!("(1 != 1)", render_with(&literal(false), &flavor).0);
        // plain values are never rewritten
        assert_eq!("%s", render_with(&true.into_expr(), &flavor).0);
    }

    #[test]
    fn test_as_renders_name() {
        let t = Table::new("t");
        assert_eq!("\"foo\"", render(&t.column("c").into_expr().as_("foo")).0);
    }

    #[test]
    fn test_cast() {
        let t = Table::new("t");
        let (sql, _) = render(&t.column("c").into_expr().cast("INTEGER"));
        assert_eq!("CAST(\"c\" AS INTEGER)", sql);
        let (sql, params) = render(&5i32.into_expr().cast("TEXT"));
        assert_eq!("CAST(%s AS TEXT)", sql);
        assert_eq!(vec![Bind::I32(5)], params);
    }
}
