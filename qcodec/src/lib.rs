//! Self-describing text codec for heterogeneous object graphs.
//!
//! Objects serialize to a flat blob carrying their concrete type tag and a
//! field map; deserialization resolves the tag against an explicitly
//! registered set of variant decoders. Nested serializable values are
//! embedded as blob strings and recovered by probing on decode.
//!
//! ```rust
//! use qcodec::{CodecRegistry, Serializable, params, serialize};
//! use serde_json::Value;
//!
//! struct Note {
//!     text: String,
//! }
//!
//! impl Serializable for Note {
//!     fn type_tag(&self) -> &'static str {
//!         "Note"
//!     }
//!
//!     fn serialize_params(&self) -> qcodec::Params {
//!         let mut fields = qcodec::Params::new();
//!         fields.insert("text".to_string(), Value::String(self.text.clone()));
//!         fields
//!     }
//! }
//!
//! let mut registry = CodecRegistry::new();
//! registry.register("Note", |fields| {
//!     Ok(Note {
//!         text: params::take_string(fields, "text")?,
//!     })
//! });
//!
//! let note = Note { text: "hello".to_string() };
//! let decoded = registry.decode(&serialize(&note)).expect("decode should work");
//! assert_eq!(decoded.text, "hello");
//! ```

mod blob;
mod error;
pub mod params;
mod registry;

pub mod prelude {
    pub use crate::{
        Blob, CodecRegistry, DecodeError, DecodeErrorKind, Params, Serializable, looks_like_blob,
        parse_blob, serialize,
    };
}

pub use blob::{Blob, Params, Serializable, looks_like_blob, parse_blob, serialize};
pub use error::{DecodeError, DecodeErrorKind};
pub use registry::CodecRegistry;
