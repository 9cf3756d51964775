//! Schema-node merger.
//!
//! Samples are folded, one at a time and in arrival order, into a tree of
//! `Node`s: one node per path, holding the union of type tags seen there and
//! one running aggregate per constraint kind (one-per-kind arms).
//!
//! Design goals:
//! - No history besides sufficient statistics (plus the bounded example and
//!   enum windows).
//! - Absence is not null: a missing field is never visited, an explicit
//!   `null` is.
//! - `join(earlier, later)` is associative and keeps arrival order, so partial
//!   folds over contiguous runs of samples combine into exactly the tree a
//!   single sequential fold would build.
pub mod arr;
pub mod enums;
pub mod examples;
pub mod num;
pub mod obj;
pub mod str;

use tracing::trace;

use crate::classify::TypeSet;
use crate::config::Settings;
use crate::format::formats_of;
use crate::path::{Path, Segment};
use crate::value::Value;

pub use arr::ArrC;
pub use enums::{EnumC, Literal};
pub use examples::{DefaultC, ExamplesC};
pub use num::{Gcd, Num, NumC};
pub use obj::{FieldC, ObjC};
pub use str::StrC;

// ------------------------------- Policy ---------------------------------- //

/// Distinct primitive values kept per path before giving up on an enum.
pub const ENUM_MAX_DISTINCT: usize = 40;

// -------------------------------- State ---------------------------------- //

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub types: TypeSet,
    /// Samples in which this path was present.
    pub seen: u64,
    pub num: Option<NumC>,
    pub str_: Option<StrC>,
    pub arr: Option<ArrC>,
    pub obj: Option<ObjC>,
    pub enum_: EnumC,
    pub examples: ExamplesC,
    pub defaults: DefaultC,
}

impl Node {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_bottom(&self) -> bool {
        self.types.is_empty()
    }

    /// Fold one value into this node.
    pub fn observe(&mut self, v: &Value, settings: &Settings) {
        let mut path = Path::root();
        self.observe_at(v, settings, &mut path);
    }

    fn observe_at(&mut self, v: &Value, settings: &Settings, path: &mut Path) {
        if self.is_bottom() {
            trace!(path = %path, "new schema node");
        }
        self.types.insert(settings.integer.classify(v));
        self.seen += 1;

        if settings.features.enums {
            self.enum_.observe(v, ENUM_MAX_DISTINCT);
        }
        self.examples.observe(v, settings.examples);
        self.defaults.observe(v, settings.default_value);

        match v {
            Value::Null | Value::Bool(_) => {}
            Value::Integer(_) | Value::Float(_) => {
                if let Some(n) = Num::of(v, settings.integer) {
                    match &mut self.num {
                        Some(num) => num.observe(n),
                        None => self.num = Some(NumC::new(n)),
                    }
                }
            }
            Value::String(s) => {
                let formats = formats_of(s, &settings.formats, settings.spec_version);
                match &mut self.str_ {
                    Some(str_c) => str_c.observe(s, &formats),
                    None => self.str_ = Some(StrC::new(s, formats)),
                }
            }
            Value::Array(xs) => observe_array(self.arr.get_or_insert_with(|| new_arr(xs.len())), xs, settings, path),
            Value::Object(map) => observe_object(self.obj.get_or_insert_with(|| new_obj(map.len())), map, settings, path),
        }
    }

    // ----------------------------- Join (⊔) ------------------------------ //

    /// Merge two trees; `a` holds the earlier samples.
    pub fn join(a: &Self, b: &Self, settings: &Settings) -> Self {
        Self {
            types: a.types.union(b.types),
            seen: a.seen + b.seen,
            num: join_arm(&a.num, &b.num, NumC::join),
            str_: join_arm(&a.str_, &b.str_, StrC::join),
            arr: join_arm(&a.arr, &b.arr, |x, y| ArrC::join(x, y, settings)),
            obj: join_arm(&a.obj, &b.obj, |x, y| ObjC::join(x, y, settings)),
            enum_: EnumC::join(&a.enum_, &b.enum_, ENUM_MAX_DISTINCT),
            examples: ExamplesC::join(&a.examples, &b.examples, settings.examples),
            defaults: DefaultC::join(&a.defaults, &b.defaults),
        }
    }

    // ------------------------------ Lookup ------------------------------- //

    /// Node at `path`, if any sample reached it.
    pub fn at(&self, path: &Path) -> Option<&Node> {
        let mut cur = self;
        for seg in path.segments() {
            cur = match seg {
                Segment::Items => cur.arr.as_ref()?.item.as_deref()?,
                Segment::Field(name) => &cur.obj.as_ref()?.fields.get(name)?.node,
            };
        }
        Some(cur)
    }

    /// Number of nodes in this tree, including this one.
    pub fn node_count(&self) -> usize {
        let items = self.arr.as_ref().and_then(|a| a.item.as_ref()).map_or(0, |n| n.node_count());
        let fields = self.obj.as_ref().map_or(0, |o| o.fields.values().map(|f| f.node.node_count()).sum());
        1 + items + fields
    }
}

fn join_arm<T: Clone>(a: &Option<T>, b: &Option<T>, f: impl FnOnce(&T, &T) -> T) -> Option<T> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(x.clone()),
        (Some(x), Some(y)) => Some(f(x, y)),
    }
}

fn new_arr(len: usize) -> ArrC {
    ArrC { len_min: len as u64, len_max: len as u64, ..ArrC::default() }
}

fn new_obj(size: usize) -> ObjC {
    ObjC { size_min: size as u64, size_max: size as u64, ..ObjC::default() }
}

fn observe_array(arr: &mut ArrC, xs: &[Value], settings: &Settings, path: &mut Path) {
    let len = xs.len() as u64;
    arr.len_min = arr.len_min.min(len);
    arr.len_max = arr.len_max.max(len);
    arr.samples += 1;
    if xs.is_empty() {
        return;
    }
    let item = arr.item.get_or_insert_with(Box::default);
    path.push(Segment::Items);
    for el in xs {
        item.observe_at(el, settings, path);
    }
    path.pop();
}

fn observe_object(obj: &mut ObjC, map: &indexmap::IndexMap<String, Value>, settings: &Settings, path: &mut Path) {
    let size = map.len() as u64;
    obj.size_min = obj.size_min.min(size);
    obj.size_max = obj.size_max.max(size);
    obj.seen_objects += 1;
    for (k, v) in map {
        let field = obj.fields.entry(k.clone()).or_default();
        field.present_in += 1;
        if !v.is_null() {
            field.non_null_in += 1;
        }
        path.push(Segment::Field(k.clone()));
        field.node.observe_at(v, settings, path);
        path.pop();
    }
}

// ------------------------------ Front API -------------------------------- //

/// Fold `values` in order; `None` when there were none.
pub fn infer_from_values<'a, I>(values: I, settings: &Settings) -> Option<Node>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut root: Option<Node> = None;
    for v in values {
        root.get_or_insert_with(Node::empty).observe(v, settings);
    }
    root
}

// ------------------------------- Tests ------------------------------------ //
