//! Sample sources: anything that yields decoded values until it runs dry.
//! JSON text, whitespace-separated JSON and length-prefixed BSON streams ship
//! with the crate.
//!
//! End of input is `Ok(None)`, a decode failure is `Err`, and the two are
//! never confused: the driver keeps going on the first and aborts on the second.
use std::io::Read;

use serde_json::de::IoRead;
use serde_json::{Deserializer, StreamDeserializer};
use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid {format} in document #{index}: {source}")]
    Decode {
        format: &'static str,
        index: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("JSON pointer `{pointer}` selects nothing in document #{index}")]
    PointerNotFound { index: usize, pointer: String },
}

pub trait ValueSource {
    /// Next value, `Ok(None)` at a clean end of input.
    fn next_value(&mut self) -> Result<Option<Value>, SourceError>;
}

impl<S: ValueSource + ?Sized> ValueSource for &mut S {
    fn next_value(&mut self) -> Result<Option<Value>, SourceError> {
        (**self).next_value()
    }
}

/// Values already in memory.
pub struct VecSource {
    inner: std::vec::IntoIter<Value>,
}

impl VecSource {
    pub fn new(values: Vec<Value>) -> Self {
        Self { inner: values.into_iter() }
    }
}

impl ValueSource for VecSource {
    fn next_value(&mut self) -> Result<Option<Value>, SourceError> {
        Ok(self.inner.next())
    }
}

/// Optional JSON Pointer (`/data/items/0`) applied to every decoded document.
fn select(doc: serde_json::Value, pointer: Option<&str>, index: usize) -> Result<Value, SourceError> {
    match pointer {
        None => Ok(Value::from(doc)),
        Some(ptr) => {
            let mut doc = doc;
            match doc.pointer_mut(ptr) {
                Some(sub) => Ok(Value::from(sub.take())),
                None => Err(SourceError::PointerNotFound { index, pointer: ptr.to_string() }),
            }
        }
    }
}

fn json_error(index: usize, source: serde_json::Error) -> SourceError {
    SourceError::Decode { format: "JSON", index, source: Box::new(source) }
}

/// Exactly one JSON document.
pub struct JsonDocument<R> {
    reader: Option<R>,
    pointer: Option<String>,
}

impl<R: Read> JsonDocument<R> {
    pub fn new(reader: R) -> Self {
        Self { reader: Some(reader), pointer: None }
    }

    pub fn with_pointer(mut self, pointer: Option<String>) -> Self {
        self.pointer = pointer;
        self
    }
}

impl JsonDocument<std::io::Cursor<Vec<u8>>> {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(std::io::Cursor::new(text.into().into_bytes()))
    }
}

impl<R: Read> ValueSource for JsonDocument<R> {
    fn next_value(&mut self) -> Result<Option<Value>, SourceError> {
        let Some(reader) = self.reader.take() else {
            return Ok(None);
        };
        let doc: serde_json::Value =
            serde_json::from_reader(reader).map_err(|e| json_error(0, e))?;
        select(doc, self.pointer.as_deref(), 0).map(Some)
    }
}

/// Whitespace-separated JSON documents (NDJSON and friends).
pub struct NdjsonStream<R: Read> {
    inner: StreamDeserializer<'static, IoRead<R>, serde_json::Value>,
    pointer: Option<String>,
    index: usize,
}

impl<R: Read> NdjsonStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: Deserializer::from_reader(reader).into_iter(),
            pointer: None,
            index: 0,
        }
    }

    pub fn with_pointer(mut self, pointer: Option<String>) -> Self {
        self.pointer = pointer;
        self
    }
}

impl<R: Read> ValueSource for NdjsonStream<R> {
    fn next_value(&mut self) -> Result<Option<Value>, SourceError> {
        let index = self.index;
        match self.inner.next() {
            None => Ok(None),
            Some(Err(source)) if source.is_io() => Err(SourceError::Io(source.into())),
            Some(Err(source)) => Err(json_error(index, source)),
            Some(Ok(doc)) => {
                self.index += 1;
                select(doc, self.pointer.as_deref(), index).map(Some)
            }
        }
    }
}

// ---------------------------------- BSON ---------------------------------- //

/// Documents larger than this are rejected before any allocation.
const MAX_BSON_DOCUMENT: usize = 16 * 1024 * 1024;

/// How BSON-only types (ObjectId, DateTime, Decimal128, ...) become JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtJsonMode {
    /// `{"$oid": ...}`, `{"$date": "<iso>"}`, plain numbers.
    #[default]
    Relaxed,
    /// Type-preserving wrappers everywhere (`{"$numberInt": "1"}`).
    Canonical,
}

impl ExtJsonMode {
    pub const VALUES: &'static [&'static str] = &["relaxed", "canonical"];
}

impl std::str::FromStr for ExtJsonMode {
    type Err = crate::config::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relaxed" => Ok(ExtJsonMode::Relaxed),
            "canonical" | "extended" => Ok(ExtJsonMode::Canonical),
            other => Err(crate::config::ConfigError::unknown("extended JSON mode", other, Self::VALUES)),
        }
    }
}

/// Back-to-back BSON documents (a `mongodump` file, for one), each becoming
/// one value through MongoDB extended JSON.
pub struct BsonStream<R> {
    reader: R,
    mode: ExtJsonMode,
    pointer: Option<String>,
    index: usize,
}

impl<R: Read> BsonStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, mode: ExtJsonMode::default(), pointer: None, index: 0 }
    }

    pub fn with_mode(mut self, mode: ExtJsonMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_pointer(mut self, pointer: Option<String>) -> Self {
        self.pointer = pointer;
        self
    }

    fn bson_error(&self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> SourceError {
        SourceError::Decode { format: "BSON", index: self.index, source: source.into() }
    }

    /// The whole next document, length prefix included. `None` on a clean end.
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        let mut prefix = [0u8; 4];
        let mut filled = 0;
        while filled < prefix.len() {
            match self.reader.read(&mut prefix[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(self.bson_error("truncated length prefix")),
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(SourceError::Io(e)),
            }
        }
        let len = i32::from_le_bytes(prefix);
        let len = match usize::try_from(len) {
            Ok(len) if (5..=MAX_BSON_DOCUMENT).contains(&len) => len,
            _ => return Err(self.bson_error(format!("bad document length {len}"))),
        };
        let mut frame = vec![0u8; len];
        frame[..4].copy_from_slice(&prefix);
        self.reader.read_exact(&mut frame[4..]).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => self.bson_error(format!("truncated document, expected {len} bytes")),
            _ => SourceError::Io(e),
        })?;
        Ok(Some(frame))
    }
}

impl<R: Read> ValueSource for BsonStream<R> {
    fn next_value(&mut self) -> Result<Option<Value>, SourceError> {
        let Some(frame) = self.next_frame()? else {
            return Ok(None);
        };
        let doc = bson::Document::from_reader(frame.as_slice()).map_err(|e| self.bson_error(e))?;
        let json = match self.mode {
            ExtJsonMode::Relaxed => bson::Bson::Document(doc).into_relaxed_extjson(),
            ExtJsonMode::Canonical => bson::Bson::Document(doc).into_canonical_extjson(),
        };
        let index = self.index;
        self.index += 1;
        select(json, self.pointer.as_deref(), index).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<S: ValueSource>(mut src: S) -> Result<Vec<Value>, SourceError> {
        let mut out = Vec::new();
        while let Some(v) = src.next_value()? {
            out.push(v);
        }
        Ok(out)
    }

    #[test]
    fn single_document_yields_once() {
        let got = drain(JsonDocument::from_text(r#"[1, 2]"#)).unwrap();
        assert_eq!(got, [Value::Array(vec![Value::Integer(1), Value::Integer(2)])]);
    }

    #[test]
    fn ndjson_yields_each_line_then_ends() {
        let text = "{\"a\":1}\n{\"a\":2}\n\n";
        let got = drain(NdjsonStream::new(text.as_bytes())).unwrap();
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn decode_failure_is_not_end_of_stream() {
        let text = "{\"a\":1}\n{\"a\":";
        let mut src = NdjsonStream::new(text.as_bytes());
        assert!(src.next_value().unwrap().is_some());
        let err = src.next_value().unwrap_err();
        assert!(matches!(err, SourceError::Decode { index: 1, .. }), "{err}");
    }

    fn bson_bytes(docs: &[bson::Document]) -> Vec<u8> {
        let mut out = Vec::new();
        for doc in docs {
            doc.to_writer(&mut out).unwrap();
        }
        out
    }

    #[test]
    fn bson_stream_yields_each_document_then_ends() {
        let bytes = bson_bytes(&[bson::doc! {"a": 1, "s": "x"}, bson::doc! {"a": 2.5, "n": bson::Bson::Null}]);
        let got = drain(BsonStream::new(bytes.as_slice())).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].to_json(), serde_json::json!({"a": 1, "s": "x"}));
        assert_eq!(got[1].to_json(), serde_json::json!({"a": 2.5, "n": null}));
        assert!(drain(BsonStream::new(&[][..])).unwrap().is_empty());
    }

    #[test]
    fn bson_special_types_use_extended_json() {
        let oid = bson::oid::ObjectId::parse_str("5f1a2b3c4d5e6f7a8b9c0d1e").unwrap();
        let bytes = bson_bytes(&[bson::doc! {"_id": oid, "n": 7}]);

        let relaxed = drain(BsonStream::new(bytes.as_slice())).unwrap();
        assert_eq!(
            relaxed[0].to_json(),
            serde_json::json!({"_id": {"$oid": "5f1a2b3c4d5e6f7a8b9c0d1e"}, "n": 7})
        );

        let canonical = drain(BsonStream::new(bytes.as_slice()).with_mode(ExtJsonMode::Canonical)).unwrap();
        assert_eq!(canonical[0].to_json()["n"], serde_json::json!({"$numberInt": "7"}));
    }

    #[test]
    fn truncated_bson_is_a_decode_error() {
        let mut bytes = bson_bytes(&[bson::doc! {"a": 1}, bson::doc! {"a": 2}]);
        bytes.truncate(bytes.len() - 3);
        let mut src = BsonStream::new(bytes.as_slice());
        assert!(src.next_value().unwrap().is_some());
        let err = src.next_value().unwrap_err();
        assert!(matches!(err, SourceError::Decode { format: "BSON", index: 1, .. }), "{err}");

        // a stray byte after the last document is not a clean end either
        let mut bytes = bson_bytes(&[bson::doc! {"a": 1}]);
        bytes.push(0);
        assert!(drain(BsonStream::new(bytes.as_slice())).is_err());
    }

    #[test]
    fn pointer_selects_a_subtree() {
        let src = JsonDocument::from_text(r#"{"data": {"items": [true]}}"#)
            .with_pointer(Some("/data/items".into()));
        assert_eq!(drain(src).unwrap(), [Value::Array(vec![Value::Bool(true)])]);

        let missing = JsonDocument::from_text(r#"{"data": 1}"#).with_pointer(Some("/nope".into()));
        assert!(matches!(drain(missing), Err(SourceError::PointerNotFound { .. })));
    }
}
