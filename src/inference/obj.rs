use indexmap::IndexMap;

use super::Node;
use crate::config::Settings;

#[derive(Clone, Debug, Default)]
pub struct ObjC {
    /// Fields in first-seen order.
    pub fields: IndexMap<String, FieldC>,
    pub seen_objects: u64,
    pub size_min: u64,
    pub size_max: u64,
}

#[derive(Clone, Debug, Default)]
pub struct FieldC {
    pub node: Node,
    pub present_in: u64,
    pub non_null_in: u64, // for "non-null-common"
}

impl ObjC {
    pub(super) fn join(a: &Self, b: &Self, settings: &Settings) -> Self {
        let mut out = Self {
            fields: IndexMap::with_capacity(a.fields.len().max(b.fields.len())),
            seen_objects: a.seen_objects + b.seen_objects,
            size_min: a.size_min.min(b.size_min),
            size_max: a.size_max.max(b.size_max),
        };

        // merge keys from a, in a's order
        for (k, fa) in &a.fields {
            let merged = match b.fields.get(k) {
                None => fa.clone(),
                Some(fb) => FieldC {
                    node: Node::join(&fa.node, &fb.node, settings),
                    present_in: fa.present_in + fb.present_in,
                    non_null_in: fa.non_null_in + fb.non_null_in,
                },
            };
            out.fields.insert(k.clone(), merged);
        }
        // then keys only in b
        for (k, fb) in &b.fields {
            if !out.fields.contains_key(k) {
                out.fields.insert(k.clone(), fb.clone());
            }
        }

        out
    }
}
