use std::fmt::Write;

use crate::{
    Expr, FromItem, IntoExpr, Select,
    error::Result,
    from::write_from_item,
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Full,
    FullOuter,
    Cross,
}

impl JoinType {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::LeftOuter => "LEFT OUTER",
            JoinType::Right => "RIGHT",
            JoinType::RightOuter => "RIGHT OUTER",
            JoinType::Full => "FULL",
            JoinType::FullOuter => "FULL OUTER",
            JoinType::Cross => "CROSS",
        }
    }
}

/// `left TYPE JOIN right [ON condition]`
///
/// Both sides are aliased as from-list items. The join itself has no
/// identity and cannot be addressed.
#[derive(Debug, Clone)]
pub struct Join {
    left: FromItem,
    right: FromItem,
    ty: JoinType,
    condition: Option<Expr>,
}

impl Join {
    pub fn new(left: impl Into<FromItem>, right: impl Into<FromItem>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            ty: JoinType::Inner,
            condition: None,
        }
    }

    pub fn kind(&mut self, ty: JoinType) -> &mut Self {
        self.ty = ty;
        self
    }

    pub fn on<E: IntoExpr>(&mut self, condition: E) -> &mut Self {
        self.condition = Some(condition.into_expr());
        self
    }

    /// Joins the result with another source.
    pub fn join(&self, right: impl Into<FromItem>) -> Join {
        Join::new(self, right)
    }

    /// `SELECT * FROM self`
    pub fn select(&self) -> Select {
        let mut select = Select::new();
        select.from(self);
        select
    }

    pub fn left(&self) -> &FromItem {
        &self.left
    }

    pub fn right(&self) -> &FromItem {
        &self.right
    }
}

impl FormatWriter for Join {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        write_from_item(context, &self.left)?;
        context.write_str(" ")?;
        context.write_str(self.ty.as_str())?;
        context.write_str(" JOIN ")?;
        write_from_item(context, &self.right)?;
        if let Some(condition) = &self.condition {
            context.write_str(" ON ")?;
            condition.format_writer(context)?;
        }
        Ok(())
    }
}

impl From<&Join> for FromItem {
    fn from(join: &Join) -> Self {
        FromItem::Join(Box::new(join.clone()))
    }
}

impl From<&mut Join> for FromItem {
    fn from(join: &mut Join) -> Self {
        FromItem::Join(Box::new(join.clone()))
    }
}

impl_to_sql!(Join);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{AliasScope, Bind, ColumnSource, Table, operators::equal, tests::render};

    use super::*;

    #[test]
    fn test_join_on() {
        let t1 = Table::new("t1");
        let t2 = Table::new("t2");
        let mut join = t1.join(&t2);
        join.on(equal(t1.column("c"), t2.column("c")));
        let _scope = AliasScope::enter();
        assert_eq!(
            "\"t1\" AS \"a\" INNER JOIN \"t2\" AS \"b\" ON (\"a\".\"c\" = \"b\".\"c\")",
            render(&join).0
        );
    }

    #[test]
    fn test_join_types() {
        let t1 = Table::new("t1");
        let t2 = Table::new("t2");
        let mut join = t1.join(&t2);
        join.kind(JoinType::LeftOuter);
        assert_eq!("\"t1\" LEFT OUTER JOIN \"t2\"", render(&join).0);
        join.kind(JoinType::Cross);
        assert_eq!("\"t1\" CROSS JOIN \"t2\"", render(&join).0);
    }

    #[test]
    fn test_join_condition_params() {
        let t1 = Table::new("t1");
        let t2 = Table::new("t2");
        let mut join = t1.join(&t2);
        join.on(equal(t2.column("c"), "foo"));
        let _scope = AliasScope::enter();
        let (sql, params) = render(&join);
        assert_eq!(
            "\"t1\" AS \"a\" INNER JOIN \"t2\" AS \"b\" ON (\"b\".\"c\" = %s)",
            sql
        );
        assert_eq!(vec![Bind::String("foo".into())], params);
    }

    #[test]
    fn test_nested_join() {
        let t1 = Table::new("t1");
        let t2 = Table::new("t2");
        let t3 = Table::new("t3");
        let join = t1.join(&t2).join(&t3);
        let _scope = AliasScope::enter();
        assert_eq!(
            "\"t1\" AS \"a\" INNER JOIN \"t2\" AS \"b\" INNER JOIN \"t3\" AS \"c\"",
            render(&join).0
        );
    }
}
