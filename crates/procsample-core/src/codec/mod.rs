//! Dual serialization: a schema-tagged binary encoding and a JSON encoding,
//! both operating on the same [`crate::model`] record types.

pub mod binary;
pub mod json;

pub use binary::BinaryEncoder;
