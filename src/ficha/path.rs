//! Field paths.
//!
//! Every value in a form is addressed by a dot-separated path. Plain
//! segments name fields, numeric segments index record-array elements:
//! `insumos.2.codigo_barras` is the `codigo_barras` field of the third
//! `insumos` entry.
//!
//! Paths address *positions*. Record-array entries additionally carry a
//! stable identity (see `form::records`) precisely because a numeric
//! segment goes stale the moment an earlier entry is removed.

use std::fmt;
use std::str::FromStr;

/// One path segment: a field name or a record-array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Name(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Name(n) => write!(f, "{}", n),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A path from the form root to one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Extends the path with a named child segment.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Name(name.to_string()));
        Self(segments)
    }

    /// Extends the path with an array index segment.
    pub fn index(&self, i: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(i));
        Self(segments)
    }

    /// Whether `prefix` is an ancestor of (or equal to) this path.
    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, segment) in self.0.iter().enumerate() {
            if pos > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for part in s.split('.') {
            if part.is_empty() {
                return Err(format!("Invalid path format: {}", s));
            }
            match part.parse::<usize>() {
                Ok(i) => segments.push(Segment::Index(i)),
                Err(_) => segments.push(Segment::Name(part.to_string())),
            }
        }
        Ok(Self(segments))
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            Self(vec![Segment::Name(s.to_string())])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_indexed_segments() {
        let path: FieldPath = "insumos.2.codigo_barras".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Name("insumos".into()),
                Segment::Index(2),
                Segment::Name("codigo_barras".into()),
            ]
        );
    }

    #[test]
    fn display_round_trips() {
        let raw = "registros.0.past_temp_agua";
        let path: FieldPath = raw.parse().unwrap();
        assert_eq!(path.to_string(), raw);
    }

    #[test]
    fn rejects_empty_segments() {
        assert!("a..b".parse::<FieldPath>().is_err());
    }

    #[test]
    fn builds_paths_incrementally() {
        let path = FieldPath::root().child("embalagens").index(1).child("total_caixas");
        assert_eq!(path.to_string(), "embalagens.1.total_caixas");
    }
}
