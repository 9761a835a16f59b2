//! Error taxonomy shared by every parser, profiler, and codec in this crate.

use std::path::PathBuf;

/// Everything that can go wrong while opening, reading, parsing, or decoding a sample.
#[derive(Debug)]
pub enum Error {
    /// The source file could not be opened, typically at profiler construction.
    Open { path: PathBuf, source: std::io::Error },
    /// A read failed mid-parse.
    Read { path: PathBuf, source: std::io::Error },
    /// A field's value could not be decoded.
    Parse { field: String, bytes: Vec<u8> },
    /// A numeric field overflowed its target type.
    Range { field: String },
    /// A binary-codec deserialize saw structurally invalid bytes.
    Schema { message: String },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Open { path, source } => {
                write!(f, "open {}: {}", path.display(), source)
            }
            Error::Read { path, source } => {
                write!(f, "read {}: {}", path.display(), source)
            }
            Error::Parse { field, bytes } => {
                write!(
                    f,
                    "parse {}: invalid value {:?}",
                    field,
                    String::from_utf8_lossy(bytes)
                )
            }
            Error::Range { field } => write!(f, "{}: value out of range", field),
            Error::Schema { message } => write!(f, "schema error: {}", message),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub(crate) fn parse(field: &str, bytes: &[u8]) -> Self {
        Error::Parse {
            field: field.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    pub(crate) fn range(field: &str) -> Self {
        Error::Range {
            field: field.to_string(),
        }
    }
}
