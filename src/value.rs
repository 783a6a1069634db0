//! Attribute and constant values.
//!
//! [`Value`] is the payload stored under every attribute name, whether the attribute is an
//! ordinary mutable attribute or a constant. The crate never inspects values beyond the
//! constant declaration entry, which must be a [`Value::List`] of [`Value::String`] names.

use std::fmt;

use crate::token::Token;

/// A dynamically typed attribute value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absence sentinel (declared constants without a value, unset attributes)
    #[default]
    None,
    /// Boolean value
    Boolean(bool),
    /// Character value
    Char(char),
    /// 32-bit signed integer
    I4(i32),
    /// 64-bit signed integer
    I8(i64),
    /// 64-bit unsigned integer
    U8(u64),
    /// 64-bit floating point
    R8(f64),
    /// String value
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Ordered collection of values
    List(Vec<Value>),
    /// Reference to a registered type
    Type(Token),
}

impl Value {
    /// Returns `true` if this is the absence sentinel
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Try to convert to a boolean value
    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            Value::I4(value) => Some(*value != 0),
            Value::I8(value) => Some(*value != 0),
            Value::U8(value) => Some(*value != 0),
            _ => None,
        }
    }

    /// Try to convert to a 32-bit integer value
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Boolean(value) => Some(i32::from(*value)),
            Value::I4(value) => Some(*value),
            Value::I8(value) => i32::try_from(*value).ok(),
            Value::U8(value) => i32::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Try to convert to a 64-bit integer value
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Boolean(value) => Some(i64::from(*value)),
            Value::I4(value) => Some(i64::from(*value)),
            Value::I8(value) => Some(*value),
            Value::U8(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Try to convert to a 64-bit floating point value
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I4(value) => Some(f64::from(*value)),
            #[allow(clippy::cast_precision_loss)]
            Value::I8(value) => Some(*value as f64),
            #[allow(clippy::cast_precision_loss)]
            Value::U8(value) => Some(*value as f64),
            Value::R8(value) => Some(*value),
            _ => None,
        }
    }

    /// Borrow the string payload, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the list payload, if this is a list
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the referenced type token, if this is a type reference
    #[must_use]
    pub fn as_type(&self) -> Option<Token> {
        match self {
            Value::Type(token) => Some(*token),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Boolean(_) => "bool",
            Value::Char(_) => "char",
            Value::I4(_) => "i32",
            Value::I8(_) => "i64",
            Value::U8(_) => "u64",
            Value::R8(_) => "f64",
            Value::String(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Type(_) => "type",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Char(value) => write!(f, "{value}"),
            Value::I4(value) => write!(f, "{value}"),
            Value::I8(value) => write!(f, "{value}"),
            Value::U8(value) => write!(f, "{value}"),
            Value::R8(value) => write!(f, "{value}"),
            Value::String(value) => write!(f, "{value}"),
            Value::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Value::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            Value::Type(token) => write!(f, "<type {token}>"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I4(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I8(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::U8(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::R8(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

impl From<Token> for Value {
    fn from(token: Token) -> Self {
        Value::Type(token)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

#[cfg(test)]
#[allow(clippy::approx_constant)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Value::from(42), Value::I4(42));
        assert_eq!(Value::from("hello there"), Value::String("hello there".into()));
        assert_eq!(Value::from(None::<i32>), Value::None);
        assert_eq!(Value::from(Some(-1)), Value::I4(-1));
        assert_eq!(Value::from(Token::new(3)).as_type(), Some(Token::new(3)));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::I8(7).as_i32(), Some(7));
        assert_eq!(Value::U8(u64::MAX).as_i64(), None);
        assert_eq!(Value::I4(0).as_boolean(), Some(false));
        assert_eq!(Value::R8(6.28318).as_f64(), Some(6.28318));
        assert_eq!(Value::String("x".into()).as_i32(), None);
        assert!(Value::default().is_none());

        let list = Value::List(vec!["rate".into()]);
        assert_eq!(list.as_list().map(<[Value]>::len), Some(1));
        assert_eq!(list.as_list().and_then(|names| names[0].as_str()), Some("rate"));
        assert!(Value::from("rate").as_list().is_none());
    }

    #[test]
    fn display() {
        let list = Value::List(vec![1.into(), "two".into(), Value::None]);
        assert_eq!(list.to_string(), "[1, two, None]");
        assert_eq!(Value::Bytes(vec![1, 2, 3]).to_string(), "<3 bytes>");
        assert_eq!(list.kind(), "list");
    }
}
