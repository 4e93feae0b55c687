//! Explicit tag-to-decoder registry built at startup.

use qcommon::Registry;

use crate::{DecodeError, Params, parse_blob};

pub type DecodeFn<T> = fn(&mut Params) -> Result<T, DecodeError>;

/// Maps concrete type tags to decoder functions.
///
/// Tags must be collision-free across every registered variant; registration
/// order is irrelevant.
pub struct CodecRegistry<T> {
    decoders: Registry<String, DecodeFn<T>>,
}

impl<T> Default for CodecRegistry<T> {
    fn default() -> Self {
        Self {
            decoders: Registry::new(),
        }
    }
}

impl<T> CodecRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tag: impl Into<String>, decode: DecodeFn<T>) {
        let tag = tag.into();
        let replaced = self.decoders.insert(tag.clone(), decode);
        debug_assert!(replaced.is_none(), "duplicate codec tag '{tag}'");
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode a blob string by resolving its tag to a registered decoder.
    pub fn decode(&self, text: &str) -> Result<T, DecodeError> {
        let mut blob = parse_blob(text)?;
        let decode = self
            .decoders
            .get(&blob.tag)
            .ok_or_else(|| DecodeError::unknown_tag(&blob.tag))?;

        decode(&mut blob.params)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::{DecodeErrorKind, Serializable, params, serialize};

    #[derive(Debug, PartialEq)]
    struct Marker {
        id: u64,
    }

    impl Serializable for Marker {
        fn type_tag(&self) -> &'static str {
            "Marker"
        }

        fn serialize_params(&self) -> Params {
            let mut fields = Params::new();
            fields.insert("id".to_string(), Value::from(self.id));
            fields
        }
    }

    fn registry() -> CodecRegistry<Marker> {
        let mut registry = CodecRegistry::new();
        registry.register("Marker", |fields| {
            Ok(Marker {
                id: params::take_u64(fields, "id")?,
            })
        });
        registry
    }

    #[test]
    fn decode_round_trips_registered_variant() {
        let registry = registry();
        let marker = Marker { id: 7 };

        let decoded = registry
            .decode(&serialize(&marker))
            .expect("decode should work");
        assert_eq!(decoded, marker);
    }

    #[test]
    fn decode_fails_for_unknown_tag() {
        let registry = registry();
        let error = registry
            .decode("{\"serialized_type\":\"Widget\",\"serialized_params\":{}}")
            .expect_err("unknown tag should fail");

        assert_eq!(error.kind, DecodeErrorKind::UnknownTag);
        assert!(error.message.contains("Widget"));
    }

    #[test]
    fn decode_surfaces_constructor_rejection() {
        let registry = registry();
        let error = registry
            .decode("{\"serialized_type\":\"Marker\",\"serialized_params\":{}}")
            .expect_err("missing field should fail");

        assert_eq!(error.kind, DecodeErrorKind::MissingField);
    }
}
