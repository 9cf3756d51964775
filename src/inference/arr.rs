use super::Node;
use crate::config::Settings;

#[derive(Clone, Debug, Default)]
pub struct ArrC {
    pub len_min: u64,
    pub len_max: u64,
    /// Every index of every array, merged. `None` while only empty arrays were seen.
    pub item: Option<Box<Node>>,
    /// Arrays observed at this path.
    pub samples: u64,
}

impl ArrC {
    pub(super) fn join(a: &Self, b: &Self, settings: &Settings) -> Self {
        let item = match (&a.item, &b.item) {
            (None, None) => None,
            (Some(x), None) | (None, Some(x)) => Some(x.clone()),
            (Some(x), Some(y)) => Some(Box::new(Node::join(x, y, settings))),
        };
        Self {
            len_min: a.len_min.min(b.len_min),
            len_max: a.len_max.max(b.len_max),
            item,
            samples: a.samples + b.samples,
        }
    }
}
