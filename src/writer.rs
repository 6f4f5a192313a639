use std::fmt::Write;

use crate::{
    alias::{self, SourceId},
    bind::{Bind, Binds},
    dialect::{Flavor, HasDialect},
    error::Result,
};

pub(crate) trait FormatWriter {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()>;
}

pub(crate) struct FormatContext<'a, W: Write> {
    pub(crate) writer: &'a mut W,
    pub(crate) flavor: &'a Flavor,
    pub(crate) binds: Binds,
}

/// Text and binds rendered apart from the main writer.
pub(crate) struct Fragment {
    pub(crate) sql: String,
    pub(crate) binds: Binds,
}

impl Fragment {
    pub(crate) fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

impl<'a, W: Write> FormatContext<'a, W> {
    pub(crate) fn new(writer: &'a mut W, flavor: &'a Flavor) -> Self {
        Self {
            writer,
            flavor,
            binds: Binds::None,
        }
    }

    pub(crate) fn into_binds(self) -> Binds {
        self.binds
    }

    pub(crate) fn write_str(&mut self, value: &str) -> Result<()> {
        self.writer.write_str(value)?;
        Ok(())
    }

    pub(crate) fn write_ident(&mut self, part: &str) -> Result<()> {
        if part == "*" {
            self.writer.write_char('*')?;
            return Ok(());
        }

        let quote = self.flavor.quote;
        self.writer.write_char(quote)?;
        for ch in part.chars() {
            // double the quote if present
            if ch == quote {
                self.writer.write_char(quote)?;
            }
            self.writer.write_char(ch)?;
        }
        self.writer.write_char(quote)?;
        Ok(())
    }

    /// Writes ` AS "alias"`, or ` "alias"` for flavors without `AS`.
    pub(crate) fn write_alias(&mut self, alias: &str) -> Result<()> {
        if self.flavor.no_as {
            self.writer.write_char(' ')?;
        } else {
            self.writer.write_str(" AS ")?;
        }
        self.write_ident(alias)
    }

    /// Writes `"alias".` when `id` is aliased in the active scope.
    pub(crate) fn write_qualifier(&mut self, id: SourceId) -> Result<()> {
        let alias = alias::lookup(id);
        if !alias.is_empty() {
            self.write_ident(&alias)?;
            self.writer.write_char('.')?;
        }
        Ok(())
    }

    /// Writes `"alias"` of `id`, `""` outside of a scope.
    pub(crate) fn write_alias_of(&mut self, id: SourceId) -> Result<()> {
        let alias = alias::lookup(id);
        self.write_ident(&alias)
    }

    pub(crate) fn write_placeholder(&mut self) -> Result<()> {
        self.writer.write_str(self.flavor.param())?;
        Ok(())
    }

    pub(crate) fn write_bind(&mut self, bind: Bind) -> Result<()> {
        self.write_placeholder()?;
        self.binds.push(bind);
        Ok(())
    }

    pub(crate) fn write_list<T: FormatWriter>(&mut self, items: &[T], separator: &str) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.writer.write_str(separator)?;
            }
            item.format_writer(self)?;
        }
        Ok(())
    }

    /// Renders into a detached fragment, for clauses whose aliases must be
    /// assigned before they are written.
    pub(crate) fn capture<F>(&self, f: F) -> Result<Fragment>
    where
        F: FnOnce(&mut FormatContext<'_, String>) -> Result<()>,
    {
        let mut sql = String::new();
        let binds = {
            let mut context = FormatContext::new(&mut sql, self.flavor);
            f(&mut context)?;
            context.into_binds()
        };
        Ok(Fragment { sql, binds })
    }

    pub(crate) fn write_fragment(&mut self, fragment: Fragment) -> Result<()> {
        self.writer.write_str(&fragment.sql)?;
        self.binds.append(fragment.binds);
        Ok(())
    }
}

impl<T: FormatWriter + ?Sized> FormatWriter for &T {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        (**self).format_writer(context)
    }
}

impl<T: FormatWriter + ?Sized> FormatWriter for Box<T> {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        (**self).format_writer(context)
    }
}

/// Rendered statement text with its binds in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sql {
    pub text: String,
    pub params: Vec<Bind>,
}

impl Sql {
    pub fn into_parts(self) -> (String, Vec<Bind>) {
        (self.text, self.params)
    }

    /// Same statement with `:0`, `:1`, ... placeholders.
    pub fn to_numeric(self) -> Result<Sql> {
        let (text, params) = crate::bind::to_numeric(&self.text, self.params)?;
        Ok(Sql { text, params })
    }
}

pub trait ToSql {
    fn to_sql(&self, flavor: &Flavor) -> Result<Sql>;

    fn to_sql_as<D: HasDialect>(&self) -> Result<Sql> {
        self.to_sql(&D::flavor())
    }

    fn text(&self, flavor: &Flavor) -> Result<String> {
        Ok(self.to_sql(flavor)?.text)
    }

    fn params(&self, flavor: &Flavor) -> Result<Vec<Bind>> {
        Ok(self.to_sql(flavor)?.params)
    }
}

pub(crate) fn render<T: FormatWriter + ?Sized>(node: &T, flavor: &Flavor) -> Result<Sql> {
    let mut text = String::with_capacity(64);
    let binds = {
        let mut context = FormatContext::new(&mut text, flavor);
        node.format_writer(&mut context)?;
        context.into_binds()
    };
    tracing::debug!(len = text.len(), params = binds.len(), "rendered sql");
    Ok(Sql {
        text,
        params: binds.into_vec(),
    })
}

macro_rules! impl_to_sql {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::writer::ToSql for $ty {
                fn to_sql(&self, flavor: &$crate::dialect::Flavor) -> $crate::error::Result<$crate::writer::Sql> {
                    $crate::writer::render(self, flavor)
                }
            }
        )*
    };
}

pub(crate) use impl_to_sql;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Ident(&'static str);

    impl FormatWriter for Ident {
        fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
            context.write_ident(self.0)
        }
    }

    fn ident(value: &'static str, flavor: &Flavor) -> String {
        render(&Ident(value), flavor).unwrap().text
    }

    #[test]
    fn test_write_ident() {
        let flavor = Flavor::default();
        assert_eq!("\"users\"", ident("users", &flavor));
        assert_eq!("*", ident("*", &flavor));
        assert_eq!("\"first name\"", ident("first name", &flavor));
        assert_eq!("\"a\"\"b\"", ident("a\"b", &flavor));
    }

    #[test]
    fn test_write_ident_backtick() {
        let flavor = Flavor {
            quote: '`',
            ..Flavor::default()
        };
        assert_eq!("`users`", ident("users", &flavor));
        assert_eq!("`a``b`", ident("a`b", &flavor));
    }

    #[test]
    fn test_capture_then_splice() {
        let flavor = Flavor::default();
        let mut text = String::new();
        let mut context = FormatContext::new(&mut text, &flavor);
        let late = context
            .capture(|ctx| ctx.write_bind(Bind::I32(2)))
            .unwrap();
        context.write_bind(Bind::I32(1)).unwrap();
        context.write_str(" ").unwrap();
        context.write_fragment(late).unwrap();
        let binds = context.into_binds().into_vec();
        assert_eq!("%s %s", text);
        assert_eq!(vec![Bind::I32(1), Bind::I32(2)], binds);
    }

    #[test]
    fn test_write_alias_no_as() {
        let flavor = Flavor {
            no_as: true,
            ..Flavor::default()
        };
        let mut text = String::new();
        let mut context = FormatContext::new(&mut text, &flavor);
        context.write_alias("a").unwrap();
        assert_eq!(" \"a\"", text);
    }
}
