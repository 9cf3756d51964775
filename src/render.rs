//! JSON Schema emission, one draft's vocabulary at a time.
//!
//! | concern            | draft-04                        | draft-06 / draft-07          |
//! |--------------------|---------------------------------|------------------------------|
//! | single-value enum  | `enum: [v]`                     | `const: v`                   |
//! | `examples`         | absent from the vocabulary      | emitted                      |
//! | exclusive bound    | `minimum` + `exclusiveMinimum: true` | `exclusiveMinimum: v`   |
use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};

use crate::classify::TypeSet;
use crate::config::ConfigError;
use crate::inference::num::decimal_to_json;
use crate::ir::{Additional, Bound, Decimal, Schema};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpecVersion {
    Draft04,
    Draft06,
    #[default]
    Draft07,
}

impl SpecVersion {
    pub const VALUES: &'static [&'static str] = &["draft-04", "draft-06", "draft-07"];

    pub fn as_str(self) -> &'static str {
        match self {
            SpecVersion::Draft04 => "draft-04",
            SpecVersion::Draft06 => "draft-06",
            SpecVersion::Draft07 => "draft-07",
        }
    }

    pub fn schema_uri(self) -> &'static str {
        match self {
            SpecVersion::Draft04 => "http://json-schema.org/draft-04/schema#",
            SpecVersion::Draft06 => "http://json-schema.org/draft-06/schema#",
            SpecVersion::Draft07 => "http://json-schema.org/draft-07/schema#",
        }
    }

    pub fn has_const(self) -> bool {
        self >= SpecVersion::Draft06
    }

    pub fn has_examples(self) -> bool {
        self >= SpecVersion::Draft06
    }

    /// `exclusiveMinimum: <number>` rather than a boolean modifier.
    pub fn has_numeric_exclusive_bounds(self) -> bool {
        self >= SpecVersion::Draft06
    }

    pub fn has_date_and_time_formats(self) -> bool {
        self >= SpecVersion::Draft07
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft-04" => Ok(SpecVersion::Draft04),
            "draft-06" => Ok(SpecVersion::Draft06),
            "draft-07" => Ok(SpecVersion::Draft07),
            other => Err(ConfigError::unknown("spec version", other, Self::VALUES)),
        }
    }
}

/// Top-level document: `$schema` first, then the root schema.
pub fn render_document(schema: &Schema, version: SpecVersion) -> Value {
    let mut o = Map::new();
    o.insert("$schema".into(), json!(version.schema_uri()));
    render_into(&mut o, schema, version);
    Value::Object(o)
}

/// A schema without `$schema`, for nesting.
pub fn render_schema(schema: &Schema, version: SpecVersion) -> Value {
    let mut o = Map::new();
    render_into(&mut o, schema, version);
    Value::Object(o)
}

fn render_into(o: &mut Map<String, Value>, s: &Schema, v: SpecVersion) {
    if let Some(ty) = render_types(s.types) {
        o.insert("type".into(), ty);
    }

    // ---- values ----
    match s.enum_.as_slice() {
        [] => {}
        [only] if v.has_const() => {
            o.insert("const".into(), only.clone());
        }
        values => {
            o.insert("enum".into(), Value::Array(values.to_vec()));
        }
    }

    // ---- numbers ----
    if let Some(d) = s.multiple_of {
        o.insert("multipleOf".into(), decimal(d));
    }
    if let Some(b) = s.minimum {
        render_bound(o, "minimum", "exclusiveMinimum", b, v);
    }
    if let Some(b) = s.maximum {
        render_bound(o, "maximum", "exclusiveMaximum", b, v);
    }

    // ---- strings ----
    if let Some(f) = s.format {
        o.insert("format".into(), json!(f.as_str()));
    }
    if let Some(n) = s.min_length {
        o.insert("minLength".into(), json!(n));
    }
    if let Some(n) = s.max_length {
        o.insert("maxLength".into(), json!(n));
    }

    // ---- arrays ----
    if let Some(item) = &s.items {
        o.insert("items".into(), render_schema(item, v));
    }
    if let Some(n) = s.min_items {
        o.insert("minItems".into(), json!(n));
    }
    if let Some(n) = s.max_items {
        o.insert("maxItems".into(), json!(n));
    }

    // ---- objects ----
    if !s.properties.is_empty() {
        let props: Map<String, Value> = s
            .properties
            .iter()
            .map(|p| (p.name.clone(), render_schema(&p.schema, v)))
            .collect();
        o.insert("properties".into(), Value::Object(props));
    }
    if !s.required.is_empty() {
        o.insert("required".into(), json!(s.required));
    }
    match &s.additional {
        None => {}
        Some(Additional::Allowed(b)) => {
            o.insert("additionalProperties".into(), json!(b));
        }
        Some(Additional::Types(types)) => {
            let mut inner = Map::new();
            if let Some(ty) = render_types(*types) {
                inner.insert("type".into(), ty);
            }
            o.insert("additionalProperties".into(), Value::Object(inner));
        }
    }
    if let Some(n) = s.min_properties {
        o.insert("minProperties".into(), json!(n));
    }
    if let Some(n) = s.max_properties {
        o.insert("maxProperties".into(), json!(n));
    }

    // ---- annotations ----
    if let Some(d) = &s.default {
        o.insert("default".into(), d.clone());
    }
    if !s.examples.is_empty() && v.has_examples() {
        o.insert("examples".into(), Value::Array(s.examples.clone()));
    }
}

fn render_types(types: TypeSet) -> Option<Value> {
    match types.len() {
        0 => None,
        1 => types.iter().next().map(|t| json!(t.as_str())),
        _ => Some(Value::Array(types.iter().map(|t| json!(t.as_str())).collect())),
    }
}

fn render_bound(o: &mut Map<String, Value>, inclusive_kw: &str, exclusive_kw: &str, b: Bound, v: SpecVersion) {
    let value = b.value.to_json();
    if !b.exclusive {
        o.insert(inclusive_kw.into(), value);
    } else if v.has_numeric_exclusive_bounds() {
        o.insert(exclusive_kw.into(), value);
    } else {
        o.insert(inclusive_kw.into(), value);
        o.insert(exclusive_kw.into(), Value::Bool(true));
    }
}

fn decimal(d: Decimal) -> Value {
    decimal_to_json(d.mantissa, d.scale)
}
