use std::{fmt, str::FromStr, sync::Arc};

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::{
    Expr,
    error::Error,
    functions::{Function, FunctionKind},
};

/// How `LIMIT` and `OFFSET` are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LimitStyle {
    /// `LIMIT n OFFSET m`
    #[default]
    Limit,
    /// `OFFSET (m) ROWS FETCH FIRST (n) ROWS ONLY`
    Fetch,
    /// nested selects filtering on `ROWNUM`
    Rownum,
}

impl FromStr for LimitStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "limit" => Ok(Self::Limit),
            "fetch" => Ok(Self::Fetch),
            "rownum" => Ok(Self::Rownum),
            other => Err(Error::UnknownLimitStyle(other.to_owned())),
        }
    }
}

/// Placeholder written for each bind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamStyle {
    /// `%s`
    #[default]
    Format,
    /// `?`
    Qmark,
}

impl ParamStyle {
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Format => "%s",
            Self::Qmark => "?",
        }
    }
}

impl FromStr for ParamStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "format" => Ok(Self::Format),
            "qmark" => Ok(Self::Qmark),
            other => Err(Error::UnknownParamStyle(other.to_owned())),
        }
    }
}

pub type FunctionMapper = Arc<dyn Fn(&Function) -> Expr + Send + Sync>;

/// Replacement builders for function kinds a dialect spells differently.
#[derive(Clone, Default)]
pub struct FunctionMapping(IndexMap<FunctionKind, FunctionMapper>);

impl FunctionMapping {
    pub fn insert<F>(&mut self, kind: FunctionKind, mapper: F)
    where
        F: Fn(&Function) -> Expr + Send + Sync + 'static,
    {
        self.0.insert(kind, Arc::new(mapper));
    }

    pub fn get(&self, kind: FunctionKind) -> Option<&FunctionMapper> {
        self.0.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for FunctionMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

/// Rendering settings of the targeted database.
#[derive(Debug, Clone)]
pub struct Flavor {
    pub limit_style: LimitStyle,
    /// Limit written when only an offset is set.
    pub max_limit: Option<i64>,
    pub param_style: ParamStyle,
    /// Native `ILIKE` support.
    pub ilike: bool,
    /// Omit the `AS` keyword in alias clauses.
    pub no_as: bool,
    /// No boolean literals, `true` renders as `(1 = 1)`.
    pub no_boolean: bool,
    /// Native `NULLS FIRST` / `NULLS LAST` support.
    pub null_ordering: bool,
    pub quote: char,
    pub function_mapping: FunctionMapping,
}

impl Default for Flavor {
    fn default() -> Self {
        Self {
            limit_style: LimitStyle::Limit,
            max_limit: None,
            param_style: ParamStyle::Format,
            ilike: false,
            no_as: false,
            no_boolean: false,
            null_ordering: true,
            quote: '"',
            function_mapping: FunctionMapping::default(),
        }
    }
}

impl Flavor {
    pub fn param(&self) -> &'static str {
        self.param_style.placeholder()
    }

    /// Substitutes every `kind` call with the result of `mapper`.
    ///
    /// The mapper sees the bare call. `FILTER` and `OVER` are written after
    /// the mapped expression.
    pub fn map_function<F>(mut self, kind: FunctionKind, mapper: F) -> Self
    where
        F: Fn(&Function) -> Expr + Send + Sync + 'static,
    {
        self.function_mapping.insert(kind, mapper);
        self
    }

    /// Renders `kind` under another name, keeping its call shape.
    pub fn rename_function(self, kind: FunctionKind, name: impl Into<SmolStr>) -> Self {
        let name = name.into();
        self.map_function(kind, move |function| {
            Expr::from(function.clone().renamed(name.clone()))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
    Oracle,
    SqlServer,
}

impl Dialect {
    pub fn flavor(self) -> Flavor {
        let base = Flavor::default();
        match self {
            Dialect::Postgres => Flavor { ilike: true, ..base },
            Dialect::MySql => Flavor {
                max_limit: Some(i64::MAX),
                quote: '`',
                null_ordering: false,
                ..base
            },
            Dialect::Sqlite => Flavor {
                max_limit: Some(-1),
                param_style: ParamStyle::Qmark,
                ..base
            },
            Dialect::Oracle => Flavor {
                limit_style: LimitStyle::Rownum,
                no_as: true,
                no_boolean: true,
                ..base
            },
            Dialect::SqlServer => Flavor {
                limit_style: LimitStyle::Fetch,
                param_style: ParamStyle::Qmark,
                no_boolean: true,
                null_ordering: false,
                ..base
            },
        }
    }
}

pub trait HasDialect {
    const DIALECT: Dialect;

    fn flavor() -> Flavor {
        Self::DIALECT.flavor()
    }
}

pub struct Postgres;

impl HasDialect for Postgres {
    const DIALECT: Dialect = Dialect::Postgres;
}

pub struct MySql;

impl HasDialect for MySql {
    const DIALECT: Dialect = Dialect::MySql;
}

pub struct Sqlite;

impl HasDialect for Sqlite {
    const DIALECT: Dialect = Dialect::Sqlite;
}

pub struct Oracle;

impl HasDialect for Oracle {
    const DIALECT: Dialect = Dialect::Oracle;
}

pub struct SqlServer;

impl HasDialect for SqlServer {
    const DIALECT: Dialect = Dialect::SqlServer;
}
