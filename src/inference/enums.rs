use indexmap::IndexSet;
use ordered_float::OrderedFloat;

use crate::classify::IntegerCriterion;
use crate::value::{Value, float_to_json, int_to_json};

/// Hashable form of a primitive value. Whole floats fold into `Integer` so
/// `2` and `2.0` are one candidate, as JSON Schema equality says they are.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Null,
    Bool(bool),
    Integer(i128),
    Float(OrderedFloat<f64>),
    String(String),
}

impl Literal {
    pub fn of(v: &Value) -> Option<Self> {
        match v {
            Value::Null => Some(Literal::Null),
            Value::Bool(b) => Some(Literal::Bool(*b)),
            Value::Integer(i) => Some(Literal::Integer(*i)),
            Value::Float(f) => Some(match IntegerCriterion::MathematicalInteger.integral(*f) {
                Some(i) => Literal::Integer(i),
                None => Literal::Float(OrderedFloat(*f)),
            }),
            Value::String(s) => Some(Literal::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::Null => serde_json::Value::Null,
            Literal::Bool(b) => serde_json::Value::Bool(*b),
            Literal::Integer(i) => int_to_json(*i),
            Literal::Float(f) => float_to_json(f.0),
            Literal::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// Distinct primitive values in first-seen order, until the cap is passed.
#[derive(Clone, Debug, Default)]
pub struct EnumC {
    pub values: IndexSet<Literal>,
    /// Sticky: once past the cap, no enum for this path.
    pub overflowed: bool,
}

impl EnumC {
    pub fn observe(&mut self, v: &Value, cap: usize) {
        if self.overflowed {
            return;
        }
        let Some(lit) = Literal::of(v) else { return };
        if self.values.contains(&lit) {
            return;
        }
        if self.values.len() >= cap {
            self.overflow();
        } else {
            self.values.insert(lit);
        }
    }

    fn overflow(&mut self) {
        self.overflowed = true;
        self.values = IndexSet::new();
    }

    /// Candidates to emit, or `None` once overflowed or if nothing was seen.
    pub fn candidates(&self) -> Option<&IndexSet<Literal>> {
        (!self.overflowed && !self.values.is_empty()).then_some(&self.values)
    }

    pub(super) fn join(a: &Self, b: &Self, cap: usize) -> Self {
        let mut out = a.clone();
        if a.overflowed || b.overflowed {
            out.overflow();
            return out;
        }
        for lit in &b.values {
            out.values.insert(lit.clone());
        }
        if out.values.len() > cap {
            out.overflow();
        }
        out
    }
}
