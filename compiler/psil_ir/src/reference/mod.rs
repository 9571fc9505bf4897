//! Qualified names.

use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;

/// A single identifier segment. Shared, since the same names are bound,
/// looked up, and recorded on code blocks over and over.
pub type Name = Rc<str>;

/// A `:`-separated path through the namespace tree.
///
/// A leading `:` anchors the path: `:a:b` looks `a` up in the namespace
/// resolution starts in, without searching outward. The empty reference
/// (`:` alone, or [`previous()`](Reference::previous) of a single-segment
/// reference) denotes that namespace itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reference {
    segments: SmallVec<[Name; 3]>,
    anchored: bool,
}

impl Reference {
    /// Build a reference from its segments.
    pub fn new<S: Into<Name>>(segments: impl IntoIterator<Item = S>) -> Self {
        Reference {
            segments: segments.into_iter().map(Into::into).collect(),
            anchored: false,
        }
    }

    /// Build a reference anchored at the starting namespace (`:a:b`).
    pub fn local<S: Into<Name>>(segments: impl IntoIterator<Item = S>) -> Self {
        Reference {
            anchored: true,
            ..Reference::new(segments)
        }
    }

    /// The empty reference.
    pub fn empty() -> Self {
        Reference::default()
    }

    /// Split `a:b:c` (or anchored `:a:b`) into a reference.
    ///
    /// Returns `None` for `""` and if any segment is empty. A lone `:` is
    /// the anchored empty reference.
    pub fn parse(path: &str) -> Option<Self> {
        let (anchored, rest) = match path.strip_prefix(':') {
            Some("") => return Some(Reference::local(std::iter::empty::<Name>())),
            Some(rest) => (true, rest),
            None => (false, path),
        };
        let segments: SmallVec<[Name; 3]> = rest.split(':').map(Name::from).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Reference { segments, anchored })
    }

    /// Returns `true` for references written with a leading `:`.
    #[inline]
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    #[inline]
    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` for references with more than one segment.
    #[inline]
    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }

    #[inline]
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(|s| &**s)
    }

    #[inline]
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(|s| &**s)
    }

    /// All segments but the last.
    ///
    /// Empty for single-segment (and empty) references. The anchor is
    /// kept.
    pub fn previous(&self) -> Reference {
        let keep = self.segments.len().saturating_sub(1);
        Reference {
            segments: self.segments[..keep].iter().cloned().collect(),
            anchored: self.anchored,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.anchored {
            f.write_str(":")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
