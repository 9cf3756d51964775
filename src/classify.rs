//! Type tags and the integer criterion that decides `integer` vs `number`.
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl TypeTag {
    pub const ALL: [TypeTag; 7] = [
        TypeTag::Null,
        TypeTag::Boolean,
        TypeTag::Integer,
        TypeTag::Number,
        TypeTag::String,
        TypeTag::Array,
        TypeTag::Object,
    ];

    /// JSON Schema `type` keyword spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
        }
    }

    pub fn is_primitive(self) -> bool {
        !matches!(self, TypeTag::Array | TypeTag::Object)
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of type tags, iterated in `TypeTag::ALL` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeSet(u8);

impl TypeSet {
    pub fn insert(&mut self, tag: TypeTag) {
        self.0 |= tag.bit();
    }

    pub fn contains(&self, tag: TypeTag) -> bool {
        self.0 & tag.bit() != 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeTag> + '_ {
        TypeTag::ALL.into_iter().filter(|t| self.contains(*t))
    }

    pub fn all_primitive(&self) -> bool {
        !self.is_empty() && self.iter().all(TypeTag::is_primitive)
    }
}

impl FromIterator<TypeTag> for TypeSet {
    fn from_iter<I: IntoIterator<Item = TypeTag>>(iter: I) -> Self {
        let mut set = TypeSet::default();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

/// When does a number count as `integer`?
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegerCriterion {
    /// Any finite whole number (`2` and `2.0`) small enough to be held exactly.
    #[default]
    MathematicalInteger,
    /// Only values the decoder produced as integers; `2.0` stays a number.
    NonFloatingPoint,
}

impl IntegerCriterion {
    pub const VALUES: &'static [&'static str] = &["mathematical-integer", "non-floating-point"];

    /// The integral value of a float, if this criterion accepts it as one.
    pub fn integral(self, f: f64) -> Option<i128> {
        match self {
            IntegerCriterion::NonFloatingPoint => None,
            IntegerCriterion::MathematicalInteger => whole_float(f),
        }
    }

    pub fn classify(self, v: &Value) -> TypeTag {
        match v {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Integer(_) => TypeTag::Integer,
            Value::Float(f) => match self.integral(*f) {
                Some(_) => TypeTag::Integer,
                None => TypeTag::Number,
            },
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Object,
        }
    }
}

impl FromStr for IntegerCriterion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mathematical-integer" => Ok(IntegerCriterion::MathematicalInteger),
            "non-floating-point" => Ok(IntegerCriterion::NonFloatingPoint),
            other => Err(ConfigError::unknown("integer criterion", other, Self::VALUES)),
        }
    }
}

/// `f` as an `i128` when it is finite, has no fraction and fits.
pub(crate) fn whole_float(f: f64) -> Option<i128> {
    // 2^127 is exactly representable; anything at or past it does not fit.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if f.is_finite() && f.fract() == 0.0 && f >= -LIMIT && f < LIMIT {
        Some(f as i128)
    } else {
        None
    }
}
