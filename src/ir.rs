// Version-neutral schema tree: what the policies decided, before any draft's
// keyword spelling is chosen. No `Node` evidence in here.
use crate::classify::TypeSet;
use crate::format::Format;
use crate::inference::Num;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    /// Empty means unconstrained (no `type` keyword).
    pub types: TypeSet,

    // numbers
    pub minimum: Option<Bound>,
    pub maximum: Option<Bound>,
    pub multiple_of: Option<Decimal>,

    // strings
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub format: Option<Format>,

    // arrays
    pub items: Option<Box<Schema>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,

    // objects
    pub properties: Vec<Property>, // first-seen order
    pub required: Vec<String>,
    pub additional: Option<Additional>,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,

    // annotations
    pub enum_: Vec<serde_json::Value>,
    pub default: Option<serde_json::Value>,
    pub examples: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: String,
    pub schema: Schema,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bound {
    pub value: Num,
    pub exclusive: bool,
}

/// `mantissa × 10^-scale`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decimal {
    pub mantissa: u128,
    pub scale: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Additional {
    Allowed(bool),
    Types(TypeSet),
}

impl Schema {
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.iter().find(|p| p.name == name).map(|p| &p.schema)
    }
}
