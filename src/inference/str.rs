use std::collections::BTreeSet;

use crate::format::Format;

#[derive(Clone, Debug)]
pub struct StrC {
    /// Length bounds in characters, not bytes.
    pub len_min: u64,
    pub len_max: u64,
    /// Formats every string so far matched. Only ever shrinks.
    pub formats: BTreeSet<Format>,
}

impl StrC {
    pub fn new(s: &str, formats: BTreeSet<Format>) -> Self {
        let len = s.chars().count() as u64;
        Self { len_min: len, len_max: len, formats }
    }

    pub fn observe(&mut self, s: &str, formats: &BTreeSet<Format>) {
        let len = s.chars().count() as u64;
        self.len_min = self.len_min.min(len);
        self.len_max = self.len_max.max(len);
        if !self.formats.is_empty() {
            self.formats = &self.formats & formats;
        }
    }

    /// The unanimous format, if one survived.
    pub fn format(&self) -> Option<Format> {
        self.formats.iter().next().copied()
    }

    pub(super) fn join(a: &Self, b: &Self) -> Self {
        Self {
            len_min: a.len_min.min(b.len_min),
            len_max: a.len_max.max(b.len_max),
            formats: &a.formats & &b.formats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(fs: &[Format]) -> BTreeSet<Format> {
        fs.iter().copied().collect()
    }

    #[test]
    fn lengths_count_characters() {
        let mut c = StrC::new("näïve", set(&[]));
        c.observe("ab", &set(&[]));
        assert_eq!((c.len_min, c.len_max), (2, 5));
    }

    #[test]
    fn one_dissenting_string_drops_the_format() {
        let mut c = StrC::new("a@b.com", set(&[Format::Email]));
        c.observe("c@d.com", &set(&[Format::Email]));
        assert_eq!(c.format(), Some(Format::Email));
        c.observe("nope", &set(&[]));
        assert_eq!(c.format(), None);
        // and it never comes back
        c.observe("e@f.com", &set(&[Format::Email]));
        assert_eq!(c.format(), None);
    }
}
