use std::fmt::Write;

use crate::{
    AliasScope, Expr, IntoExpr, Query, Select, Values,
    alias::SourceId,
    dialect::LimitStyle,
    error::Result,
    expr::ColumnSource,
    paginate::write_limit_offset,
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Union,
    Intersect,
    Except,
}

impl SetOp {
    pub fn as_str(self) -> &'static str {
        match self {
            SetOp::Union => "UNION",
            SetOp::Intersect => "INTERSECT",
            SetOp::Except => "EXCEPT",
        }
    }
}

/// Queries combined with `UNION`, `INTERSECT` or `EXCEPT`.
///
/// Ordering and paging apply to the combined result.
#[derive(Debug, Clone)]
pub struct Combine {
    pub(crate) id: SourceId,
    pub(crate) op: SetOp,
    pub(crate) all: bool,
    pub(crate) queries: Vec<Query>,
    pub(crate) order_by: Vec<Expr>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
}

impl Combine {
    pub fn new<I, Q>(op: SetOp, queries: I) -> Self
    where
        I: IntoIterator<Item = Q>,
        Q: Into<Query>,
    {
        Self {
            id: SourceId::next(),
            op,
            all: false,
            queries: queries.into_iter().map(Into::into).collect(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Keeps duplicate rows, `UNION ALL`.
    pub fn all(&mut self) -> &mut Self {
        self.all = true;
        self
    }

    pub fn push(&mut self, query: impl Into<Query>) -> &mut Self {
        self.queries.push(query.into());
        self
    }

    pub fn order_by<I, E>(&mut self, expressions: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.order_by = expressions.into_iter().map(IntoExpr::into_expr).collect();
        self
    }

    pub fn limit(&mut self, limit: impl Into<Option<i64>>) -> &mut Self {
        self.limit = limit.into();
        self
    }

    pub fn offset(&mut self, offset: impl Into<Option<i64>>) -> &mut Self {
        self.offset = offset.into();
        self
    }

    /// `SELECT * FROM (self)`
    pub fn select(&self) -> Select {
        let mut select = Select::new();
        select.from(self);
        select
    }

    fn write_combined<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        let _scope = AliasScope::enter();
        for (i, query) in self.queries.iter().enumerate() {
            if i > 0 {
                context.write_str(" ")?;
                context.write_str(self.op.as_str())?;
                context.write_str(if self.all { " ALL " } else { " " })?;
            }
            query.format_writer(context)?;
        }
        if !self.order_by.is_empty() {
            context.write_str(" ORDER BY ")?;
            context.write_list(&self.order_by, ", ")?;
        }
        write_limit_offset(context, self.limit, self.offset)
    }
}

impl FormatWriter for Combine {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        if context.flavor.limit_style == LimitStyle::Rownum
            && (self.limit.is_some() || self.offset.is_some())
        {
            tracing::trace!("paging combined query through a select");
            let mut inner = self.clone();
            inner.limit = None;
            inner.offset = None;
            let mut select = Select::new();
            select.from(inner).limit(self.limit).offset(self.offset);
            return select.format_writer(context);
        }
        self.write_combined(context)
    }
}

impl ColumnSource for Combine {
    fn source_id(&self) -> SourceId {
        self.id
    }
}

impl From<Combine> for Expr {
    fn from(combine: Combine) -> Self {
        Expr::Query(Box::new(Query::Combine(combine)))
    }
}

impl IntoExpr for Combine {
    fn into_expr(self) -> Expr {
        Expr::from(self)
    }
}

impl IntoExpr for &Combine {
    fn into_expr(self) -> Expr {
        Expr::from(self.clone())
    }
}

impl_to_sql!(Combine);

pub fn union<I, Q>(queries: I) -> Combine
where
    I: IntoIterator<Item = Q>,
    Q: Into<Query>,
{
    Combine::new(SetOp::Union, queries)
}

pub fn intersect<I, Q>(queries: I) -> Combine
where
    I: IntoIterator<Item = Q>,
    Q: Into<Query>,
{
    Combine::new(SetOp::Intersect, queries)
}

pub fn except<I, Q>(queries: I) -> Combine
where
    I: IntoIterator<Item = Q>,
    Q: Into<Query>,
{
    Combine::new(SetOp::Except, queries)
}

macro_rules! impl_set_ops {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                pub fn union(&self, other: impl Into<Query>) -> Combine {
                    Combine::new(SetOp::Union, [Query::from(self), other.into()])
                }

                pub fn union_all(&self, other: impl Into<Query>) -> Combine {
                    let mut combine = self.union(other);
                    combine.all();
                    combine
                }

                pub fn intersect(&self, other: impl Into<Query>) -> Combine {
                    Combine::new(SetOp::Intersect, [Query::from(self), other.into()])
                }

                pub fn except(&self, other: impl Into<Query>) -> Combine {
                    Combine::new(SetOp::Except, [Query::from(self), other.into()])
                }
            }
        )*
    };
}

impl_set_ops!(Select, Values, Combine);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        Bind, Flavor, Table, literal,
        operators::equal,
        tests::{render, render_with},
    };

    use super::*;

    #[test]
    fn test_union() {
        let t = Table::new("t");
        let mut query1 = t.select();
        let query2 = Table::new("t2").select();
        let mut combined = query1.union(&query2);
        assert_eq!(
            "SELECT * FROM \"t\" AS \"a\" UNION SELECT * FROM \"t2\" AS \"b\"",
            render(&combined).0
        );

        combined.all();
        assert_eq!(
            "SELECT * FROM \"t\" AS \"a\" UNION ALL SELECT * FROM \"t2\" AS \"b\"",
            render(&combined).0
        );
        assert_eq!(
            "SELECT * FROM (SELECT * FROM \"t\" AS \"b\" UNION ALL SELECT * FROM \"t2\" AS \"c\") AS \"a\"",
            render(&combined.select()).0
        );

        query1.where_(equal(t.column("c"), "foo"));
        let combined = query1.union_all(&query2);
        let (sql, params) = render(&combined);
        assert_eq!(
            "SELECT * FROM \"t\" AS \"a\" WHERE (\"a\".\"c\" = %s) UNION ALL SELECT * FROM \"t2\" AS \"b\"",
            sql
        );
        assert_eq!(vec![Bind::String("foo".into())], params);
    }

    #[test]
    fn test_single_member() {
        let t = Table::new("t");
        let mut query = t.select();
        query.where_(equal(t.column("c"), "foo"));
        let combined = union([&query]);
        assert_eq!(render(&query), render(&combined));
    }

    #[test]
    fn test_union_order() {
        let query1 = Table::new("t").select();
        let query2 = Table::new("t2").select();
        let mut combined = query1.union(&query2);
        combined.order_by([literal(1)]);
        let (sql, params) = render(&combined);
        assert_eq!(
            "SELECT * FROM \"t\" AS \"a\" UNION SELECT * FROM \"t2\" AS \"b\" ORDER BY %s",
            sql
        );
        assert_eq!(vec![Bind::I32(1)], params);
    }

    #[test]
    fn test_intersect_except() {
        let query1 = Table::new("t").select();
        let query2 = Table::new("t2").select();
        assert_eq!(
            "SELECT * FROM \"t\" AS \"a\" INTERSECT SELECT * FROM \"t2\" AS \"b\"",
            render(&query1.intersect(&query2)).0
        );
        assert_eq!(
            "SELECT * FROM \"t\" AS \"a\" EXCEPT SELECT * FROM \"t2\" AS \"b\"",
            render(&except([&query1, &query2])).0
        );
    }

    #[test]
    fn test_union_limit() {
        let query1 = Table::new("t").select();
        let query2 = Table::new("t2").select();
        let mut combined = query1.union(&query2);
        combined.limit(10).offset(20);
        assert_eq!(
            "SELECT * FROM \"t\" AS \"a\" UNION SELECT * FROM \"t2\" AS \"b\" LIMIT 10 OFFSET 20",
            render(&combined).0
        );
    }

    #[test]
    fn test_union_rownum() {
        let rownum = Flavor {
            limit_style: LimitStyle::Rownum,
            ..Flavor::default()
        };
        let query1 = Table::new("t").select();
        let query2 = Table::new("t2").select();
        let mut combined = query1.union(&query2);
        combined.limit(10);
        let (sql, params) = render_with(&combined, &rownum);
        assert_eq!(
            "SELECT \"a\".* FROM \
             (SELECT * FROM \
             (SELECT * FROM \"t\" AS \"c\" UNION SELECT * FROM \"t2\" AS \"d\") AS \"b\") AS \"a\" \
             WHERE (ROWNUM <= %s)",
            sql
        );
        assert_eq!(vec![Bind::I64(10)], params);
    }

    #[test]
    fn test_values_union() {
        let values = Values::new([[1]]);
        let (sql, params) = render(&values.union_all(&Values::new([[2]])));
        assert_eq!("VALUES (%s) UNION ALL VALUES (%s)", sql);
        assert_eq!(vec![Bind::I32(1), Bind::I32(2)], params);
    }
}
