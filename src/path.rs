//! Schema positions shared across samples: a chain of field names and
//! array-item markers. Displayed pointer-style, e.g. `/orders/[]/sku`.
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Field(String),
    /// Every index of an array, merged.
    Items,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn push(&mut self, seg: Segment) {
        self.0.push(seg);
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.0.pop()
    }

    /// Parse the display form. `[]` is the item marker; `~1` and `~0` escape
    /// `/` and `~` inside field names, and `~2` escapes a literal `[]` name.
    pub fn parse(src: &str) -> Self {
        let mut out = Path::root();
        let trimmed = src.strip_prefix('/').unwrap_or(src);
        if trimmed.is_empty() {
            return out;
        }
        for raw in trimmed.split('/') {
            if raw == "[]" {
                out.push(Segment::Items);
            } else {
                let name = raw.replace("~2", "[]").replace("~1", "/").replace("~0", "~");
                out.push(Segment::Field(name));
            }
        }
        out
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for seg in &self.0 {
            match seg {
                Segment::Items => f.write_str("/[]")?,
                Segment::Field(name) if name == "[]" => f.write_str("/~2")?,
                Segment::Field(name) => {
                    write!(f, "/{}", name.replace('~', "~0").replace('/', "~1"))?
                }
            }
        }
        Ok(())
    }
}
