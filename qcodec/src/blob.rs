//! Blob format: a type tag plus a serialized field map.
//!
//! The wire shape is `{"serialized_type": <tag>, "serialized_params":
//! {field: value, ...}}`, UTF-8 text. Field values are plain JSON scalars,
//! element-wise encoded sequences and maps, or nested blobs embedded as
//! strings.

use serde_json::Value;

use crate::DecodeError;

pub type Params = serde_json::Map<String, Value>;

const TYPE_KEY: &str = "serialized_type";
const PARAMS_KEY: &str = "serialized_params";

/// An object that can be rendered as a self-describing blob.
///
/// Implementations emit their concrete type tag and a flat field map; nested
/// serializable fields are embedded via [`serialize`] as blob strings.
pub trait Serializable {
    fn type_tag(&self) -> &'static str;

    fn serialize_params(&self) -> Params;
}

/// Render a serializable object as a blob string.
pub fn serialize(value: &dyn Serializable) -> String {
    let mut blob = Params::new();
    blob.insert(
        TYPE_KEY.to_string(),
        Value::String(value.type_tag().to_string()),
    );
    blob.insert(
        PARAMS_KEY.to_string(),
        Value::Object(value.serialize_params()),
    );
    Value::Object(blob).to_string()
}

/// A parsed blob envelope: the concrete type tag and its field map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub tag: String,
    pub params: Params,
}

/// Parse a blob string into its envelope parts.
pub fn parse_blob(text: &str) -> Result<Blob, DecodeError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| DecodeError::malformed(format!("blob is not valid JSON: {err}")))?;

    let Value::Object(mut envelope) = value else {
        return Err(DecodeError::malformed("blob must be a JSON object"));
    };

    let tag = match envelope.remove(TYPE_KEY) {
        Some(Value::String(tag)) => tag,
        Some(_) => {
            return Err(DecodeError::malformed(format!(
                "'{TYPE_KEY}' must be a string"
            )));
        }
        None => return Err(DecodeError::missing_field(TYPE_KEY)),
    };

    let params = match envelope.remove(PARAMS_KEY) {
        Some(Value::Object(params)) => params,
        Some(_) => {
            return Err(DecodeError::malformed(format!(
                "'{PARAMS_KEY}' must be an object"
            )));
        }
        None => return Err(DecodeError::missing_field(PARAMS_KEY)),
    };

    Ok(Blob { tag, params })
}

/// Probe whether a string parses as the blob envelope shape.
///
/// Used on decode to distinguish nested objects from ordinary string fields.
pub fn looks_like_blob(text: &str) -> bool {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(envelope)) => {
            envelope.contains_key(TYPE_KEY) && envelope.contains_key(PARAMS_KEY)
        }
        _ => false,
    }
}
