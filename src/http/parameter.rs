//! Typed request parameters normalized to their wire form.

use std::fmt;

/// A query/path/header value before it is rendered onto the wire.
///
/// Two parameters are equal when their wire strings are equal, so
/// `Parameter::from(24) == Parameter::from("24")`.
#[derive(Debug, Clone)]
pub enum Parameter {
    String(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
}

impl Parameter {
    /// The normalized wire string.
    pub fn value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::String(s) => f.write_str(s),
            Parameter::Integer(i) => write!(f, "{}", i),
            Parameter::Unsigned(u) => write!(f, "{}", u),
            Parameter::Float(v) => write!(f, "{}", v),
            Parameter::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for Parameter {}

impl From<&str> for Parameter {
    fn from(s: &str) -> Self {
        Parameter::String(s.to_owned())
    }
}

impl From<String> for Parameter {
    fn from(s: String) -> Self {
        Parameter::String(s)
    }
}

impl From<&String> for Parameter {
    fn from(s: &String) -> Self {
        Parameter::String(s.clone())
    }
}

impl From<bool> for Parameter {
    fn from(b: bool) -> Self {
        Parameter::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl From<$ty> for Parameter {
                fn from(v: $ty) -> Self {
                    Parameter::$variant(v as $target)
                }
            }
        )+
    };
}

impl_from_number!(Integer as i64: i8, i16, i32, i64, isize);
impl_from_number!(Unsigned as u64: u8, u16, u32, u64, usize);
impl_from_number!(Float as f64: f32, f64);

/// A value that may be absent.
///
/// Builder methods take `impl IntoParameter`; `None` means "remove the key".
pub trait IntoParameter {
    fn into_parameter(self) -> Option<Parameter>;
}

macro_rules! impl_into_parameter {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoParameter for $ty {
                fn into_parameter(self) -> Option<Parameter> {
                    Some(Parameter::from(self))
                }
            }

            impl IntoParameter for Option<$ty> {
                fn into_parameter(self) -> Option<Parameter> {
                    self.map(Parameter::from)
                }
            }
        )+
    };
}

impl_into_parameter!(
    &str, String, &String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);

impl IntoParameter for Parameter {
    fn into_parameter(self) -> Option<Parameter> {
        Some(self)
    }
}

impl IntoParameter for Option<Parameter> {
    fn into_parameter(self) -> Option<Parameter> {
        self
    }
}
