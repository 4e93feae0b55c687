//! Field-map helpers for encoding and decoding blob parameters.
//!
//! ```rust
//! use qcodec::{Params, params};
//! use serde_json::Value;
//!
//! let mut fields = Params::new();
//! fields.insert("name".to_string(), Value::String("echo".to_string()));
//!
//! let name = params::take_string(&mut fields, "name").expect("name should be present");
//! assert_eq!(name, "echo");
//! ```

use serde_json::Value;

use crate::{DecodeError, Params, Serializable, serialize};

pub fn encode_nested(value: &dyn Serializable) -> Value {
    Value::String(serialize(value))
}

pub fn encode_nested_list<T: Serializable>(items: &[T]) -> Value {
    Value::Array(items.iter().map(|item| encode_nested(item)).collect())
}

pub fn encode_string_map<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>) -> Value {
    let mut map = Params::new();
    for (key, value) in entries {
        map.insert(key.clone(), Value::String(value.clone()));
    }
    Value::Object(map)
}

pub fn encode_string_list(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

pub fn encode_opt_string(value: Option<&str>) -> Value {
    match value {
        Some(value) => Value::String(value.to_string()),
        None => Value::Null,
    }
}

pub fn take_value(fields: &mut Params, key: &str) -> Result<Value, DecodeError> {
    fields
        .remove(key)
        .ok_or_else(|| DecodeError::missing_field(key))
}

pub fn take_string(fields: &mut Params, key: &str) -> Result<String, DecodeError> {
    match take_value(fields, key)? {
        Value::String(value) => Ok(value),
        other => Err(DecodeError::invalid_field(format!(
            "field '{key}' must be a string, got {other}"
        ))),
    }
}

pub fn take_opt_string(fields: &mut Params, key: &str) -> Result<Option<String>, DecodeError> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(other) => Err(DecodeError::invalid_field(format!(
            "field '{key}' must be a string or null, got {other}"
        ))),
    }
}

pub fn take_u32(fields: &mut Params, key: &str) -> Result<u32, DecodeError> {
    let value = take_u64(fields, key)?;
    u32::try_from(value)
        .map_err(|_| DecodeError::invalid_field(format!("field '{key}' is out of range: {value}")))
}

pub fn take_u64(fields: &mut Params, key: &str) -> Result<u64, DecodeError> {
    match take_value(fields, key)? {
        Value::Number(value) => value.as_u64().ok_or_else(|| {
            DecodeError::invalid_field(format!("field '{key}' must be an unsigned integer"))
        }),
        other => Err(DecodeError::invalid_field(format!(
            "field '{key}' must be a number, got {other}"
        ))),
    }
}

pub fn take_opt_u32(fields: &mut Params, key: &str) -> Result<Option<u32>, DecodeError> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(value)) => value
            .as_u64()
            .and_then(|value| u32::try_from(value).ok())
            .map(Some)
            .ok_or_else(|| {
                DecodeError::invalid_field(format!(
                    "field '{key}' must be an unsigned 32-bit integer"
                ))
            }),
        Some(other) => Err(DecodeError::invalid_field(format!(
            "field '{key}' must be a number or null, got {other}"
        ))),
    }
}

pub fn take_f64(fields: &mut Params, key: &str) -> Result<f64, DecodeError> {
    match take_value(fields, key)? {
        Value::Number(value) => value.as_f64().ok_or_else(|| {
            DecodeError::invalid_field(format!("field '{key}' must be a finite number"))
        }),
        other => Err(DecodeError::invalid_field(format!(
            "field '{key}' must be a number, got {other}"
        ))),
    }
}

pub fn take_bool(fields: &mut Params, key: &str) -> Result<bool, DecodeError> {
    match take_value(fields, key)? {
        Value::Bool(value) => Ok(value),
        other => Err(DecodeError::invalid_field(format!(
            "field '{key}' must be a boolean, got {other}"
        ))),
    }
}

pub fn take_string_list(fields: &mut Params, key: &str) -> Result<Vec<String>, DecodeError> {
    match take_value(fields, key)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(value) => Ok(value),
                other => Err(DecodeError::invalid_field(format!(
                    "field '{key}' must contain only strings, got {other}"
                ))),
            })
            .collect(),
        other => Err(DecodeError::invalid_field(format!(
            "field '{key}' must be an array, got {other}"
        ))),
    }
}

pub fn take_opt_string_list(
    fields: &mut Params,
    key: &str,
) -> Result<Option<Vec<String>>, DecodeError> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(value) => Ok(value),
                other => Err(DecodeError::invalid_field(format!(
                    "field '{key}' must contain only strings, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(DecodeError::invalid_field(format!(
            "field '{key}' must be an array or null, got {other}"
        ))),
    }
}

pub fn take_string_map(
    fields: &mut Params,
    key: &str,
) -> Result<Vec<(String, String)>, DecodeError> {
    match take_value(fields, key)? {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(entry_key, entry_value)| match entry_value {
                Value::String(value) => Ok((entry_key, value)),
                other => Err(DecodeError::invalid_field(format!(
                    "field '{key}' must map strings to strings, got {other}"
                ))),
            })
            .collect(),
        other => Err(DecodeError::invalid_field(format!(
            "field '{key}' must be an object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn fields() -> Params {
        let mut fields = Params::new();
        fields.insert("name".to_string(), Value::String("echo".to_string()));
        fields.insert("count".to_string(), Value::from(3_u64));
        fields.insert("ratio".to_string(), Value::from(0.5_f64));
        fields.insert("enabled".to_string(), Value::Bool(true));
        fields.insert("missing_name".to_string(), Value::Null);
        fields
    }

    #[test]
    fn scalar_takes_extract_typed_values() {
        let mut fields = fields();

        assert_eq!(take_string(&mut fields, "name").unwrap(), "echo");
        assert_eq!(take_u32(&mut fields, "count").unwrap(), 3);
        assert_eq!(take_f64(&mut fields, "ratio").unwrap(), 0.5);
        assert!(take_bool(&mut fields, "enabled").unwrap());
        assert_eq!(take_opt_string(&mut fields, "missing_name").unwrap(), None);
        assert_eq!(take_opt_string(&mut fields, "absent").unwrap(), None);
    }

    #[test]
    fn takes_reject_mismatched_types() {
        let mut fields = fields();

        assert!(take_string(&mut fields, "count").is_err());
        assert!(take_u32(&mut fields, "ratio").is_err());
        assert!(take_bool(&mut fields, "name").is_err());
    }

    #[test]
    fn missing_required_field_is_reported_by_key() {
        let mut fields = Params::new();
        let error = take_string(&mut fields, "content").expect_err("missing should fail");
        assert!(error.message.contains("content"));
    }

    #[test]
    fn string_map_round_trips_entries() {
        let source = [
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ];
        let encoded = encode_string_map(source.iter().map(|(k, v)| (k, v)));

        let mut fields = Params::new();
        fields.insert("metadata".to_string(), encoded);

        let mut decoded = take_string_map(&mut fields, "metadata").unwrap();
        decoded.sort();
        assert_eq!(decoded, source);
    }
}
