//! Values on the stylesheet side of the bridge.

use std::fmt;

/// A stylesheet script value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Null,
    Bool(bool),
    /// A number with an optional unit such as `px` or `%`.
    Number { value: f64, unit: Option<String> },
    /// A string; `quoted` controls whether it renders with quotes.
    String { text: String, quoted: bool },
    List(Vec<ScriptValue>),
}

impl ScriptValue {
    pub fn quoted(text: impl Into<String>) -> Self {
        ScriptValue::String {
            text: text.into(),
            quoted: true,
        }
    }

    pub fn unquoted(text: impl Into<String>) -> Self {
        ScriptValue::String {
            text: text.into(),
            quoted: false,
        }
    }

    pub fn number(value: f64) -> Self {
        ScriptValue::Number { value, unit: None }
    }

    pub fn with_unit(value: f64, unit: impl Into<String>) -> Self {
        ScriptValue::Number {
            value,
            unit: Some(unit.into()),
        }
    }

    /// The script type name, as used in type errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Null => "null",
            ScriptValue::Bool(_) => "bool",
            ScriptValue::Number { .. } => "number",
            ScriptValue::String { .. } => "string",
            ScriptValue::List(_) => "list",
        }
    }

    /// The text of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::String { text, .. } => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Null => write!(f, "null"),
            ScriptValue::Bool(b) => write!(f, "{}", b),
            ScriptValue::Number { value, unit } => {
                write!(f, "{}{}", value, unit.as_deref().unwrap_or(""))
            }
            ScriptValue::String { text, quoted: true } => write!(f, "\"{}\"", text),
            ScriptValue::String { text, quoted: false } => write!(f, "{}", text),
            ScriptValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}
