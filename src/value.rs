//! Generic sample values.
//!
//! Every decoder (JSON text, NDJSON streams, anything a caller plugs in) hands
//! the engine these, never its own tree type. Objects keep field order.
use indexmap::IndexMap;
use serde_json::Number;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i128),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Back to a `serde_json` tree (for `enum`, `default` and `examples`).
    ///
    /// Non-finite floats have no JSON spelling and come out as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => int_to_json(*i),
            Value::Float(f) => float_to_json(*f),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(xs) => serde_json::Value::Array(xs.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

pub(crate) fn int_to_json(i: i128) -> serde_json::Value {
    if let Ok(x) = i64::try_from(i) {
        serde_json::Value::from(x)
    } else if let Ok(x) = u64::try_from(i) {
        serde_json::Value::from(x)
    } else {
        float_to_json(i as f64)
    }
}

pub(crate) fn float_to_json(f: f64) -> serde_json::Value {
    Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Integer(i as i128)
    } else if let Some(u) = n.as_u64() {
        Value::Integer(u as i128)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => number_to_value(n),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(xs) => Value::Array(xs.iter().map(Value::from).collect()),
            serde_json::Value::Object(m) => Value::Object(
                m.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => number_to_value(&n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(xs) => Value::Array(xs.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(m) => Value::Object(
                m.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_split_into_integer_and_float() {
        assert_eq!(Value::from(json!(7)), Value::Integer(7));
        assert_eq!(Value::from(json!(u64::MAX)), Value::Integer(u64::MAX as i128));
        assert_eq!(Value::from(json!(2.5)), Value::Float(2.5));
        // serde_json keeps the float flavour of `2.0`
        assert_eq!(Value::from(json!(2.0)), Value::Float(2.0));
    }

    #[test]
    fn object_field_order_survives_both_directions() {
        let src = json!({"z": 1, "a": [true, null], "m": "x"});
        let v = Value::from(&src);
        match &v {
            Value::Object(m) => {
                let keys: Vec<&str> = m.keys().map(|k| k.as_str()).collect();
                assert_eq!(keys, ["z", "a", "m"]);
            }
            other => panic!("expected object, got {other:?}"),
        }
        assert_eq!(v.to_json(), src);
    }

    #[test]
    fn wide_integers_fall_back_to_float_json() {
        let big = Value::Integer(i128::MAX);
        assert!(big.to_json().is_f64());
        assert_eq!(Value::Integer(-3).to_json(), json!(-3));
    }
}
