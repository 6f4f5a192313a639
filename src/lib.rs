//! A composable SQL syntax tree rendered to parameterized text.
//!
//! Statements are built from sources ([`Table`], subqueries, functions,
//! [`Values`], [`With`]) and expressions, then rendered with [`ToSql`] into
//! text and the binds matching its placeholders. Sources are aliased `"a"`,
//! `"b"`, ... in the order the renderer meets them.
//!
//! ```
//! use sqlnode::{ColumnSource, Flavor, Table, ToSql, operators::equal};
//!
//! let user = Table::new("user");
//! let mut query = user.select();
//! query
//!     .columns([user.column("name")])
//!     .where_(equal(user.column("id"), 7));
//!
//! let sql = query.to_sql(&Flavor::default()).unwrap();
//! assert_eq!(
//!     r#"SELECT "a"."name" FROM "user" AS "a" WHERE ("a"."id" = %s)"#,
//!     sql.text
//! );
//! ```

/// Builds an array of [`Expr`] out of mixed operands.
#[macro_export]
macro_rules! exprs {
    () => {{
        let empty: [$crate::Expr; 0] = [];
        empty
    }};
    ( $($expr:expr),+ $(,)? ) => {
        [$( $crate::IntoExpr::into_expr($expr) ),+]
    };
}

pub mod aggregate;
pub mod alias;
mod bind;
pub mod conditionals;
pub mod dialect;
mod delete;
mod error;
mod expr;
mod from;
pub mod functions;
mod insert;
mod join;
mod lock;
pub mod operators;
mod paginate;
mod query;
mod select;
mod set;
mod table;
mod update;
pub mod window;
mod with;
mod writer;

pub use alias::{AliasScope, SourceId};
pub use bind::{Bind, IntoBind, to_numeric};
pub use delete::Delete;
pub use dialect::{Dialect, Flavor, HasDialect, LimitStyle, ParamStyle};
pub use error::{Error, Result};
pub use expr::{
    As, Cast, Column, ColumnSource, Direction, Expr, IntoExpr, NullOrder, Nulls, Order, column,
    literal, null, rownum,
};
pub use from::{FromItem, FromList, Lateral, Values, lateral};
pub use insert::{Insert, InsertValues};
pub use join::{Join, JoinType};
pub use lock::{Lock, LockStrength, LockWait};
pub use query::Query;
pub use select::Select;
pub use set::{Combine, SetOp, except, intersect, union};
pub use table::Table;
pub use update::Update;
pub use window::{Frame, FrameBound, Window};
pub use with::With;
pub use writer::{Sql, ToSql};

#[cfg(test)]
pub(crate) mod tests {
    use crate::{Bind, Flavor, writer};

    pub(crate) fn render<T: writer::FormatWriter + ?Sized>(node: &T) -> (String, Vec<Bind>) {
        render_with(node, &Flavor::default())
    }

    pub(crate) fn render_with<T: writer::FormatWriter + ?Sized>(
        node: &T,
        flavor: &Flavor,
    ) -> (String, Vec<Bind>) {
        writer::render(node, flavor).unwrap().into_parts()
    }
}
