//! Infer a JSON Schema (draft-04, -06 or -07) from example JSON values.
//!
//! ```
//! use json_schema_infer::{Inferrer, Settings, Value};
//! use json_schema_infer::policy::RequiredPolicy;
//! use serde_json::json;
//!
//! let inferrer = Inferrer::new(Settings {
//!     required: RequiredPolicy::Common,
//!     ..Settings::default()
//! });
//! let samples = [Value::from(json!({"a": 1})), Value::from(json!({"a": 2, "b": "x"}))];
//! let schema = inferrer.infer_for_samples(&samples);
//!
//! assert_eq!(schema["type"], "object");
//! assert_eq!(schema["required"], json!(["a"]));
//! assert_eq!(schema["properties"]["b"]["type"], "string");
//! ```
pub mod classify;
pub mod cli;
pub mod config;
pub mod driver;
pub mod format;
pub mod inference;
pub mod ir;
pub mod lower;
pub mod path;
pub mod policy;
pub mod render;
pub mod source;
pub mod value;

pub use classify::{IntegerCriterion, TypeSet, TypeTag};
pub use config::{ConfigError, Features, InferConfig, NumberRange, Settings};
pub use driver::{InferError, Inference, Inferrer};
pub use format::{Format, FormatInferrer};
pub use inference::Node;
pub use path::{Path, Segment};
pub use render::SpecVersion;
pub use source::{BsonStream, ExtJsonMode, JsonDocument, NdjsonStream, SourceError, ValueSource, VecSource};
pub use value::Value;
