//! Conversion between stylesheet values and helper-runtime values.
//!
//! | stylesheet                     | runtime            |
//! |--------------------------------|--------------------|
//! | `null`                         | `Null`             |
//! | bool                           | `Boolean`          |
//! | unitless number                | `Number`           |
//! | number with a unit             | (rejected)         |
//! | string, quoted or not          | `String`           |
//! | list                           | `Array`            |
//! | (none)                         | `Object` rejected  |
//!
//! Strings coming back from the runtime are unquoted.

use crate::error::BridgeError;
use crate::script::ScriptValue;
use crate::value::Value;

/// Convert a stylesheet value for the helper runtime.
pub fn to_runtime(value: &ScriptValue) -> Result<Value, BridgeError> {
    Ok(match value {
        ScriptValue::Null => Value::Null,
        ScriptValue::Bool(b) => Value::Boolean(*b),
        ScriptValue::Number { value, unit: None } => Value::Number(*value),
        ScriptValue::Number { unit: Some(_), .. } => {
            return Err(BridgeError::Unmarshallable(value.to_string()));
        }
        ScriptValue::String { text, .. } => Value::String(text.clone()),
        ScriptValue::List(items) => {
            Value::Array(items.iter().map(to_runtime).collect::<Result<_, _>>()?)
        }
    })
}

/// Convert a helper-runtime value back into a stylesheet value.
pub fn from_runtime(value: Value) -> Result<ScriptValue, BridgeError> {
    Ok(match value {
        Value::Null => ScriptValue::Null,
        Value::Boolean(b) => ScriptValue::Bool(b),
        Value::Number(n) => ScriptValue::number(n),
        Value::String(s) => ScriptValue::unquoted(s),
        Value::Array(items) => ScriptValue::List(
            items
                .into_iter()
                .map(from_runtime)
                .collect::<Result<_, _>>()?,
        ),
        object @ Value::Object(_) => {
            return Err(BridgeError::Unmarshallable(object.to_string()));
        }
    })
}

/// Marshal `arg`, run `f` on the runtime side, and marshal the result back.
pub fn call_across<F>(arg: &ScriptValue, f: F) -> Result<ScriptValue, BridgeError>
where
    F: FnOnce(Value) -> Result<Value, BridgeError>,
{
    from_runtime(f(to_runtime(arg)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_list_round_trip_drops_quotes() {
        let value = ScriptValue::List(vec![
            ScriptValue::quoted("a.png"),
            ScriptValue::number(2.0),
            ScriptValue::Null,
        ]);
        let back = from_runtime(to_runtime(&value).unwrap()).unwrap();
        assert_eq!(
            back,
            ScriptValue::List(vec![
                ScriptValue::unquoted("a.png"),
                ScriptValue::number(2.0),
                ScriptValue::Null,
            ])
        );
    }

    #[test]
    fn test_number_with_unit_rejected() {
        let err = to_runtime(&ScriptValue::with_unit(10.0, "px")).unwrap_err();
        assert_eq!(err, BridgeError::Unmarshallable("10px".to_string()));
    }

    #[test]
    fn test_object_rejected() {
        let object = Value::Object(BTreeMap::from([("a".to_string(), Value::Null)]));
        assert!(matches!(
            from_runtime(object),
            Err(BridgeError::Unmarshallable(_))
        ));
    }

    #[test]
    fn test_call_across() {
        let result = call_across(&ScriptValue::quoted("x"), |v| {
            Ok(Value::String(format!("{}!", v)))
        })
        .unwrap();
        assert_eq!(result, ScriptValue::unquoted("x!"));
    }
}
