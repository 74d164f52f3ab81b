//! Scalar value model shared by accessors and the coercion rules
//!
//! Every copyable property has a [`ValueType`]: a [`ScalarKind`] plus a flag
//! saying whether the slot can hold "no value". A bare `i32` field is the
//! required form and an `Option<i32>` field is the nullable (boxed) form of
//! the same kind. Values cross the type boundary as [`PropertyValue`].
//!
//! Copyright (c) 2025 Propcopy Team
//! Licensed under the Apache-2.0 license

use crate::error::{CopyError, Result};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt::{self, Write};

/// Closed set of scalar kinds a property can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// Arbitrary-precision decimal
    Decimal,
    Text,
    /// Date and time without offset (UTC instants are stored as naive UTC)
    DateTime,
}

impl ScalarKind {
    /// Short Rust-flavoured name used in messages
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Char => "char",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Decimal => "BigDecimal",
            ScalarKind::Text => "String",
            ScalarKind::DateTime => "NaiveDateTime",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a getter's result or a setter's argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueType {
    pub kind: ScalarKind,
    /// `true` for `Option<_>` slots
    pub nullable: bool,
}

impl ValueType {
    pub const fn required(kind: ScalarKind) -> Self {
        Self { kind, nullable: false }
    }

    pub const fn optional(kind: ScalarKind) -> Self {
        Self { kind, nullable: true }
    }

    pub fn is_textual(&self) -> bool {
        self.kind == ScalarKind::Text
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// A property value in transit between a getter and a setter
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// The getter returned `None`
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Decimal(BigDecimal),
    Text(String),
    DateTime(NaiveDateTime),
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Kind of the carried value, `None` for [`PropertyValue::Null`]
    pub fn kind(&self) -> Option<ScalarKind> {
        let kind = match self {
            PropertyValue::Null => return None,
            PropertyValue::Bool(_) => ScalarKind::Bool,
            PropertyValue::Char(_) => ScalarKind::Char,
            PropertyValue::I8(_) => ScalarKind::I8,
            PropertyValue::I16(_) => ScalarKind::I16,
            PropertyValue::I32(_) => ScalarKind::I32,
            PropertyValue::I64(_) => ScalarKind::I64,
            PropertyValue::F32(_) => ScalarKind::F32,
            PropertyValue::F64(_) => ScalarKind::F64,
            PropertyValue::Decimal(_) => ScalarKind::Decimal,
            PropertyValue::Text(_) => ScalarKind::Text,
            PropertyValue::DateTime(_) => ScalarKind::DateTime,
        };
        Some(kind)
    }

    /// Textual form of the value; date-times use `datetime_format`
    ///
    /// Returns `None` for [`PropertyValue::Null`]. Floats keep their decimal
    /// point (`2.0` renders as `"2.0"`). A pattern chrono cannot apply to a
    /// date-time without offset is a [`CopyError::Configuration`].
    pub fn render(&self, datetime_format: &str) -> Result<Option<String>> {
        let text = match self {
            PropertyValue::Null => return Ok(None),
            PropertyValue::Bool(v) => v.to_string(),
            PropertyValue::Char(v) => v.to_string(),
            PropertyValue::I8(v) => v.to_string(),
            PropertyValue::I16(v) => v.to_string(),
            PropertyValue::I32(v) => v.to_string(),
            PropertyValue::I64(v) => v.to_string(),
            PropertyValue::F32(v) => format!("{v:?}"),
            PropertyValue::F64(v) => format!("{v:?}"),
            PropertyValue::Decimal(v) => v.to_string(),
            PropertyValue::Text(v) => v.clone(),
            PropertyValue::DateTime(v) => {
                let mut text = String::new();
                write!(text, "{}", v.format(datetime_format)).map_err(|_| {
                    CopyError::Configuration {
                        message: format!("datetime_format '{datetime_format}' cannot render {v}"),
                        source: None,
                    }
                })?;
                text
            }
        };
        Ok(Some(text))
    }

    fn describe(&self) -> &'static str {
        self.kind().map_or("null", ScalarKind::name)
    }
}

/// Rust types that can sit behind a getter or setter
///
/// Implemented for the supported scalars and for `Option<T>` of each of
/// them, which is the nullable form of the same kind.
pub trait Scalar: Sized {
    const VALUE_TYPE: ValueType;

    fn into_value(self) -> PropertyValue;

    /// Recover the Rust value, handing the input back on a kind mismatch
    fn from_value(value: PropertyValue) -> std::result::Result<Self, PropertyValue>;
}

macro_rules! impl_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const VALUE_TYPE: ValueType = ValueType::required(ScalarKind::$kind);

                fn into_value(self) -> PropertyValue {
                    PropertyValue::$kind(self)
                }

                fn from_value(value: PropertyValue) -> std::result::Result<Self, PropertyValue> {
                    match value {
                        PropertyValue::$kind(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_scalar! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    BigDecimal => Decimal,
    String => Text,
    NaiveDateTime => DateTime,
}

impl Scalar for DateTime<Utc> {
    const VALUE_TYPE: ValueType = ValueType::required(ScalarKind::DateTime);

    fn into_value(self) -> PropertyValue {
        PropertyValue::DateTime(self.naive_utc())
    }

    fn from_value(value: PropertyValue) -> std::result::Result<Self, PropertyValue> {
        match value {
            PropertyValue::DateTime(v) => Ok(DateTime::from_naive_utc_and_offset(v, Utc)),
            other => Err(other),
        }
    }
}

impl<T: Scalar> Scalar for Option<T> {
    const VALUE_TYPE: ValueType = ValueType::optional(T::VALUE_TYPE.kind);

    fn into_value(self) -> PropertyValue {
        match self {
            Some(v) => v.into_value(),
            None => PropertyValue::Null,
        }
    }

    fn from_value(value: PropertyValue) -> std::result::Result<Self, PropertyValue> {
        match value {
            PropertyValue::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Error raised by generated setters when handed a value of the wrong kind
#[doc(hidden)]
pub fn value_mismatch<T: Scalar>(value: PropertyValue) -> anyhow::Error {
    anyhow::anyhow!(
        "expected {} but received {}",
        T::VALUE_TYPE,
        value.describe()
    )
}
