//! procsample-core — samples Linux host telemetry from `/proc` and `/sys`.
//!
//! Provides:
//! - `model` — the record types each profiler produces
//! - `parsers` — one incremental text parser per counter source
//! - `source`, `scanner`, `kv`, `decode` — the shared low-level reading/decoding primitives
//! - `profiler` — pairs a source handle with parser state behind a single `sample()` call
//! - `ticker` — drives a profiler on a fixed period, publishing onto data/error channels
//! - `delta` — turns two counter snapshots into a per-interval usage record
//! - `codec` — binary and JSON encodings of every record type
//! - `shortcuts` — process-wide lazily-initialized profilers for one-off sampling

pub mod codec;
pub mod decode;
pub mod delta;
pub mod error;
pub mod kv;
pub mod model;
pub mod parsers;
pub mod profiler;
pub mod scanner;
pub mod shortcuts;
pub mod source;
pub mod ticker;

pub use error::Error;
