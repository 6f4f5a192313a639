use crate::error::{Error, Result};

/// A value carried out of the sql text and handed to the driver alongside it.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Null,
    String(String),
    Bool(bool),
    F32(f32),
    F64(f64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    #[cfg(feature = "uuid")]
    Uuid(uuid::Uuid),
    #[cfg(feature = "json")]
    Json(serde_json::Value),
    #[cfg(feature = "chrono")]
    NaiveDate(chrono::NaiveDate),
    #[cfg(feature = "chrono")]
    NaiveDateTime(chrono::NaiveDateTime),
    #[cfg(feature = "chrono")]
    DateTimeUtc(chrono::DateTime<chrono::Utc>),
    #[cfg(feature = "time")]
    Date(time::Date),
    #[cfg(feature = "time")]
    PrimitiveDateTime(time::PrimitiveDateTime),
    #[cfg(feature = "time")]
    OffsetDateTime(time::OffsetDateTime),
}

impl Bind {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

pub(crate) type Binds = Array<Bind>;

// most nodes carry zero or one bind, only spill to a vec past that.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum Array<T> {
    #[default]
    None,
    One(T),
    Many(Vec<T>),
}

impl<T> Array<T> {
    pub(crate) fn push(&mut self, value: T) {
        *self = match std::mem::take(self) {
            Self::None => Self::One(value),
            Self::One(first) => Self::Many(vec![first, value]),
            Self::Many(mut many) => {
                many.push(value);
                Self::Many(many)
            }
        };
    }

    pub(crate) fn append(&mut self, other: Self) {
        let combined = match (std::mem::take(self), other) {
            (Self::None, rest) | (rest, Self::None) => rest,
            (Self::One(a), Self::One(b)) => Self::Many(vec![a, b]),
            (Self::One(a), Self::Many(mut b)) => {
                b.insert(0, a);
                Self::Many(b)
            }
            (Self::Many(mut a), Self::One(b)) => {
                a.push(b);
                Self::Many(a)
            }
            (Self::Many(mut a), Self::Many(mut b)) => {
                a.append(&mut b);
                Self::Many(a)
            }
        };
        *self = combined;
    }

    pub(crate) fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        match self {
            Self::None => &[],
            Self::One(one) => std::slice::from_ref(one),
            Self::Many(many) => many,
        }
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::None => Vec::new(),
            Self::One(one) => vec![one],
            Self::Many(many) => many,
        }
    }
}

pub trait IntoBind {
    fn into_bind(self) -> Bind;
}

impl IntoBind for Bind {
    fn into_bind(self) -> Bind {
        self
    }
}

impl<T> IntoBind for Option<T>
where
    T: IntoBind,
{
    fn into_bind(self) -> Bind {
        match self {
            Some(value) => value.into_bind(),
            None => Bind::Null,
        }
    }
}

impl IntoBind for &str {
    fn into_bind(self) -> Bind {
        Bind::String(self.to_owned())
    }
}

impl IntoBind for String {
    fn into_bind(self) -> Bind {
        Bind::String(self)
    }
}

impl IntoBind for &String {
    fn into_bind(self) -> Bind {
        Bind::String(self.clone())
    }
}

macro_rules! impl_into_bind {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoBind for $ty {
                fn into_bind(self) -> Bind {
                    Bind::$variant(self)
                }
            }
        )*
    };
}

impl_into_bind! {
    bool => Bool,
    f32 => F32,
    f64 => F64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
}

#[cfg(feature = "uuid")]
impl_into_bind! { uuid::Uuid => Uuid }

#[cfg(feature = "json")]
impl_into_bind! { serde_json::Value => Json }

#[cfg(feature = "chrono")]
impl_into_bind! {
    chrono::NaiveDate => NaiveDate,
    chrono::NaiveDateTime => NaiveDateTime,
    chrono::DateTime<chrono::Utc> => DateTimeUtc,
}

#[cfg(feature = "time")]
impl_into_bind! {
    time::Date => Date,
    time::PrimitiveDateTime => PrimitiveDateTime,
    time::OffsetDateTime => OffsetDateTime,
}

/// Rewrites `%s` placeholders into numbered `:0`, `:1`, ... placeholders.
///
/// `%%` collapses back to a single `%`. The params are returned untouched,
/// the count of placeholders must match them.
pub fn to_numeric(sql: &str, params: Vec<Bind>) -> Result<(String, Vec<Bind>)> {
    let mut out = String::with_capacity(sql.len() + params.len());
    let mut index = 0usize;
    let mut chars = sql.chars();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('s') => {
                out.push(':');
                out.push_str(&index.to_string());
                index += 1;
            }
            Some('%') => out.push('%'),
            Some(other) => return Err(Error::InvalidPlaceholder(other)),
            None => return Err(Error::InvalidPlaceholder(' ')),
        }
    }

    if index != params.len() {
        return Err(Error::ParamCountMismatch {
            placeholders: index,
            params: params.len(),
        });
    }
    Ok((out, params))
}
