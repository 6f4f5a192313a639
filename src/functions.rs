//! SQL function calls.
//!
//! A [`Function`] is identified by its [`FunctionKind`], which fixes the
//! name and the call shape. Flavors may substitute a kind through their
//! function mapping before it is written.

use std::fmt::Write;

use smol_str::SmolStr;

use crate::{
    Expr, IntoExpr,
    alias::SourceId,
    error::Result,
    expr::ColumnSource,
    window::Window,
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    // mathematical
    Abs,
    Cbrt,
    Ceil,
    Degrees,
    Div,
    Exp,
    Floor,
    Ln,
    Log,
    Mod,
    Pi,
    Power,
    Radians,
    Random,
    Round,
    SetSeed,
    Sign,
    Sqrt,
    Trunc,
    WidthBucket,
    // trigonometric
    Acos,
    Asin,
    Atan,
    Atan2,
    Cos,
    Cot,
    Sin,
    Tan,
    // string
    BitLength,
    CharLength,
    Lower,
    OctetLength,
    Overlay,
    Position,
    Substring,
    Trim,
    Upper,
    // formatting
    ToChar,
    ToDate,
    ToNumber,
    ToTimestamp,
    // date and time
    Age,
    AtTimeZone,
    ClockTimestamp,
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    DatePart,
    DateTrunc,
    Extract,
    Isfinite,
    JustifyDays,
    JustifyHours,
    JustifyInterval,
    Localtime,
    Localtimestamp,
    Now,
    StatementTimestamp,
    Timeofday,
    TransactionTimestamp,
    // window
    RowNumber,
    Rank,
    DenseRank,
    PercentRank,
    CumeDist,
    Ntile,
    Lag,
    Lead,
    FirstValue,
    LastValue,
    NthValue,
    /// User named function, never remapped.
    Custom,
}

impl FunctionKind {
    pub fn name(self) -> &'static str {
        use FunctionKind::*;

        match self {
            Abs => "ABS",
            Cbrt => "CBRT",
            Ceil => "CEIL",
            Degrees => "DEGREES",
            Div => "DIV",
            Exp => "EXP",
            Floor => "FLOOR",
            Ln => "LN",
            Log => "LOG",
            Mod => "MOD",
            Pi => "PI",
            Power => "POWER",
            Radians => "RADIANS",
            Random => "RANDOM",
            Round => "ROUND",
            SetSeed => "SETSEED",
            Sign => "SIGN",
            Sqrt => "SQRT",
            Trunc => "TRUNC",
            WidthBucket => "WIDTH_BUCKET",
            Acos => "ACOS",
            Asin => "ASIN",
            Atan => "ATAN",
            Atan2 => "ATAN2",
            Cos => "COS",
            Cot => "COT",
            Sin => "SIN",
            Tan => "TAN",
            BitLength => "BIT_LENGTH",
            CharLength => "CHAR_LENGTH",
            Lower => "LOWER",
            OctetLength => "OCTET_LENGTH",
            Overlay => "OVERLAY",
            Position => "POSITION",
            Substring => "SUBSTRING",
            Trim => "TRIM",
            Upper => "UPPER",
            ToChar => "TO_CHAR",
            ToDate => "TO_DATE",
            ToNumber => "TO_NUMBER",
            ToTimestamp => "TO_TIMESTAMP",
            Age => "AGE",
            AtTimeZone => "AT TIME ZONE",
            ClockTimestamp => "CLOCK_TIMESTAMP",
            CurrentDate => "CURRENT_DATE",
            CurrentTime => "CURRENT_TIME",
            CurrentTimestamp => "CURRENT_TIMESTAMP",
            DatePart => "DATE_PART",
            DateTrunc => "DATE_TRUNC",
            Extract => "EXTRACT",
            Isfinite => "ISFINITE",
            JustifyDays => "JUSTIFY_DAYS",
            JustifyHours => "JUSTIFY_HOURS",
            JustifyInterval => "JUSTIFY_INTERVAL",
            Localtime => "LOCALTIME",
            Localtimestamp => "LOCALTIMESTAMP",
            Now => "NOW",
            StatementTimestamp => "STATEMENT_TIMESTAMP",
            Timeofday => "TIMEOFDAY",
            TransactionTimestamp => "TRANSACTION_TIMESTAMP",
            RowNumber => "ROW_NUMBER",
            Rank => "RANK",
            DenseRank => "DENSE_RANK",
            PercentRank => "PERCENT_RANK",
            CumeDist => "CUME_DIST",
            Ntile => "NTILE",
            Lag => "LAG",
            Lead => "LEAD",
            FirstValue => "FIRST_VALUE",
            LastValue => "LAST_VALUE",
            NthValue => "NTH_VALUE",
            Custom => "",
        }
    }

    fn shape(self) -> Shape {
        use FunctionKind::*;

        match self {
            Overlay => Shape::Keywords(&["", "PLACING", "FROM", "FOR"]),
            Position => Shape::Keywords(&["", "IN"]),
            Substring => Shape::Keywords(&["", "FROM", "FOR"]),
            Extract => Shape::Keywords(&["", "FROM"]),
            CurrentDate | CurrentTime | CurrentTimestamp | Localtime | Localtimestamp => {
                Shape::Bare
            }
            Trim => Shape::Trim(TrimPosition::Both),
            AtTimeZone => Shape::AtTimeZone,
            _ => Shape::Call,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimPosition {
    Both,
    Leading,
    Trailing,
}

impl TrimPosition {
    fn as_str(self) -> &'static str {
        match self {
            TrimPosition::Both => "BOTH",
            TrimPosition::Leading => "LEADING",
            TrimPosition::Trailing => "TRAILING",
        }
    }
}

/// How a call is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `NAME(a, b)`
    Call,
    /// `NAME(a KW b KW c)`, keywords paired with arguments
    Keywords(&'static [&'static str]),
    /// `NAME`
    Bare,
    /// `NAME(POSITION characters FROM string)`
    Trim(TrimPosition),
    /// `field AT TIME ZONE zone`
    AtTimeZone,
}

#[derive(Debug, Clone)]
pub struct Function {
    id: SourceId,
    kind: FunctionKind,
    name: SmolStr,
    shape: Shape,
    args: Vec<Expr>,
    filter: Option<Box<Expr>>,
    window: Option<Window>,
    columns_definitions: Vec<(SmolStr, SmolStr)>,
}

impl Function {
    pub fn new<I, E>(kind: FunctionKind, args: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        Self {
            id: SourceId::next(),
            kind,
            name: SmolStr::new_static(kind.name()),
            shape: kind.shape(),
            args: args.into_iter().map(IntoExpr::into_expr).collect(),
            filter: None,
            window: None,
            columns_definitions: Vec::new(),
        }
    }

    /// `NAME(args)` for functions outside the catalog.
    pub fn custom<I, E>(name: impl Into<SmolStr>, args: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        let mut function = Self::new(FunctionKind::Custom, args);
        function.name = name.into();
        function
    }

    /// Same call under another name. The result is never remapped again.
    pub fn renamed(mut self, name: impl Into<SmolStr>) -> Self {
        self.kind = FunctionKind::Custom;
        self.name = name.into();
        self
    }

    /// Output columns when used as a row source, `("c1" INT, ...)`.
    pub fn columns_definitions<I, N, T>(mut self, definitions: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<SmolStr>,
        T: Into<SmolStr>,
    {
        self.columns_definitions = definitions
            .into_iter()
            .map(|(name, ty)| (name.into(), ty.into()))
            .collect();
        self
    }

    /// `FILTER (WHERE condition)`
    pub fn filter<E: IntoExpr>(mut self, condition: E) -> Self {
        self.filter = Some(Box::new(condition.into_expr()));
        self
    }

    /// `OVER "window"`, the window is defined in the select's `WINDOW` clause.
    pub fn over(mut self, window: &Window) -> Self {
        self.window = Some(window.clone());
        self
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    pub(crate) fn write_columns_definitions<W: Write>(
        &self,
        context: &mut FormatContext<'_, W>,
    ) -> Result<()> {
        if self.columns_definitions.is_empty() {
            return Ok(());
        }
        context.write_str(" (")?;
        for (i, (name, ty)) in self.columns_definitions.iter().enumerate() {
            if i > 0 {
                context.write_str(", ")?;
            }
            context.write_ident(name)?;
            context.write_str(" ")?;
            context.write_str(ty)?;
        }
        context.write_str(")")
    }

    /// The call alone, without the clauses written around it.
    fn bare_call(&self) -> Function {
        Function {
            filter: None,
            window: None,
            columns_definitions: Vec::new(),
            ..self.clone()
        }
    }

    fn write_call<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        if self.kind != FunctionKind::Custom {
            if let Some(mapper) = context.flavor.function_mapping.get(self.kind) {
                let mapped = mapper(&self.bare_call());
                return mapped.format_writer(context);
            }
        }

        match self.shape {
            Shape::Call => {
                context.write_str(&self.name)?;
                context.write_str("(")?;
                context.write_list(&self.args, ", ")?;
                context.write_str(")")
            }
            Shape::Keywords(keywords) => {
                context.write_str(&self.name)?;
                context.write_str("(")?;
                for (i, (keyword, arg)) in keywords.iter().zip(&self.args).enumerate() {
                    if i > 0 {
                        context.write_str(" ")?;
                    }
                    if !keyword.is_empty() {
                        context.write_str(keyword)?;
                        context.write_str(" ")?;
                    }
                    arg.format_writer(context)?;
                }
                context.write_str(")")
            }
            Shape::Bare => context.write_str(&self.name),
            Shape::Trim(position) => {
                // args are (string, characters)
                context.write_str(&self.name)?;
                context.write_str("(")?;
                context.write_str(position.as_str())?;
                context.write_str(" ")?;
                if let Some(characters) = self.args.get(1) {
                    characters.format_writer(context)?;
                }
                context.write_str(" FROM ")?;
                if let Some(string) = self.args.first() {
                    string.format_writer(context)?;
                }
                context.write_str(")")
            }
            Shape::AtTimeZone => {
                if let Some(field) = self.args.first() {
                    field.format_writer(context)?;
                }
                context.write_str(" AT TIME ZONE ")?;
                match self.args.get(1) {
                    Some(zone) => zone.format_writer(context),
                    None => context.write_str("'UTC'"),
                }
            }
        }
    }
}

impl FormatWriter for Function {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        self.write_call(context)?;
        if let Some(filter) = &self.filter {
            context.write_str(" FILTER (WHERE ")?;
            filter.format_writer(context)?;
            context.write_str(")")?;
        }
        if let Some(window) = &self.window {
            context.write_str(" OVER ")?;
            context.write_alias_of(window.id())?;
        }
        Ok(())
    }
}

impl ColumnSource for Function {
    fn source_id(&self) -> SourceId {
        self.id
    }
}

impl_to_sql!(Function);

macro_rules! nullary {
    ($($fn_name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $fn_name() -> Function {
                Function::new(FunctionKind::$kind, Vec::<Expr>::new())
            }
        )*
    };
}

macro_rules! unary {
    ($($fn_name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $fn_name<E: IntoExpr>(value: E) -> Function {
                Function::new(FunctionKind::$kind, [value.into_expr()])
            }
        )*
    };
}

macro_rules! binary {
    ($($fn_name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $fn_name<L: IntoExpr, R: IntoExpr>(left: L, right: R) -> Function {
                Function::new(FunctionKind::$kind, [left.into_expr(), right.into_expr()])
            }
        )*
    };
}

nullary! {
    pi => Pi,
    random => Random,
    clock_timestamp => ClockTimestamp,
    current_date => CurrentDate,
    current_time => CurrentTime,
    current_timestamp => CurrentTimestamp,
    localtime => Localtime,
    localtimestamp => Localtimestamp,
    now => Now,
    statement_timestamp => StatementTimestamp,
    timeofday => Timeofday,
    transaction_timestamp => TransactionTimestamp,
}

unary! {
    abs => Abs,
    cbrt => Cbrt,
    ceil => Ceil,
    degrees => Degrees,
    exp => Exp,
    floor => Floor,
    ln => Ln,
    log => Log,
    radians => Radians,
    round => Round,
    set_seed => SetSeed,
    sign => Sign,
    sqrt => Sqrt,
    trunc => Trunc,
    acos => Acos,
    asin => Asin,
    atan => Atan,
    cos => Cos,
    cot => Cot,
    sin => Sin,
    tan => Tan,
    bit_length => BitLength,
    char_length => CharLength,
    lower => Lower,
    octet_length => OctetLength,
    upper => Upper,
    isfinite => Isfinite,
    justify_days => JustifyDays,
    justify_hours => JustifyHours,
    justify_interval => JustifyInterval,
}

binary! {
    div => Div,
    mod_ => Mod,
    power => Power,
    atan2 => Atan2,
    to_char => ToChar,
    to_date => ToDate,
    to_number => ToNumber,
    to_timestamp => ToTimestamp,
    date_part => DatePart,
    date_trunc => DateTrunc,
    position => Position,
    extract => Extract,
    at_time_zone => AtTimeZone,
}

/// `AGE(timestamp)` or `AGE(timestamp, timestamp)`
pub fn age<I, E>(args: I) -> Function
where
    I: IntoIterator<Item = E>,
    E: IntoExpr,
{
    Function::new(FunctionKind::Age, args)
}

pub fn width_bucket<A, B, C, D>(operand: A, low: B, high: C, count: D) -> Function
where
    A: IntoExpr,
    B: IntoExpr,
    C: IntoExpr,
    D: IntoExpr,
{
    Function::new(
        FunctionKind::WidthBucket,
        [operand.into_expr(), low.into_expr(), high.into_expr(), count.into_expr()],
    )
}

/// `OVERLAY(string PLACING replacement FROM start [FOR count])`
pub fn overlay<S, P, F>(string: S, placing: P, from: F, count: Option<Expr>) -> Function
where
    S: IntoExpr,
    P: IntoExpr,
    F: IntoExpr,
{
    let mut args = vec![string.into_expr(), placing.into_expr(), from.into_expr()];
    args.extend(count);
    Function::new(FunctionKind::Overlay, args)
}

/// `SUBSTRING(string FROM start [FOR count])`
pub fn substring<S, F>(string: S, from: F, count: Option<Expr>) -> Function
where
    S: IntoExpr,
    F: IntoExpr,
{
    let mut args = vec![string.into_expr(), from.into_expr()];
    args.extend(count);
    Function::new(FunctionKind::Substring, args)
}

/// `TRIM(BOTH ' ' FROM string)`
pub fn trim<S: IntoExpr>(string: S) -> Function {
    trim_with(string, TrimPosition::Both, " ")
}

pub fn trim_with<S, C>(string: S, position: TrimPosition, characters: C) -> Function
where
    S: IntoExpr,
    C: IntoExpr,
{
    let mut function = Function::new(
        FunctionKind::Trim,
        [string.into_expr(), characters.into_expr()],
    );
    function.shape = Shape::Trim(position);
    function
}

/// Window functions, written `NAME(args) OVER "w"`.
pub fn window_function<I, E>(kind: FunctionKind, args: I, window: &Window) -> Function
where
    I: IntoIterator<Item = E>,
    E: IntoExpr,
{
    Function::new(kind, args).over(window)
}

macro_rules! window_nullary {
    ($($fn_name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $fn_name(window: &Window) -> Function {
                window_function(FunctionKind::$kind, Vec::<Expr>::new(), window)
            }
        )*
    };
}

window_nullary! {
    row_number => RowNumber,
    rank => Rank,
    dense_rank => DenseRank,
    percent_rank => PercentRank,
    cume_dist => CumeDist,
}

pub fn ntile<E: IntoExpr>(buckets: E, window: &Window) -> Function {
    window_function(FunctionKind::Ntile, [buckets.into_expr()], window)
}

pub fn lag<E: IntoExpr>(value: E, window: &Window) -> Function {
    window_function(FunctionKind::Lag, [value.into_expr()], window)
}

pub fn lead<E: IntoExpr>(value: E, window: &Window) -> Function {
    window_function(FunctionKind::Lead, [value.into_expr()], window)
}

pub fn first_value<E: IntoExpr>(value: E, window: &Window) -> Function {
    window_function(FunctionKind::FirstValue, [value.into_expr()], window)
}

pub fn last_value<E: IntoExpr>(value: E, window: &Window) -> Function {
    window_function(FunctionKind::LastValue, [value.into_expr()], window)
}

pub fn nth_value<E: IntoExpr, N: IntoExpr>(value: E, nth: N, window: &Window) -> Function {
    window_function(FunctionKind::NthValue, [value.into_expr(), nth.into_expr()], window)
}
