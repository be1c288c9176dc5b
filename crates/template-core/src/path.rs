//! Document paths such as `users[0].address.city`.
//!
//! Paths name a location inside the generated document. The walker keeps one
//! while it descends, and reference arguments are parsed into the same shape
//! so both sides render to an identical canonical string.

use crate::error::TemplateError;
use std::fmt;

/// A single step in a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object field
    Key(String),
    /// Array element
    Index(usize),
}

/// Location of a value inside a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a reference path like `a.b[0].c`.
    ///
    /// A backslash makes the next character part of the key, so `a\.b`
    /// names the single field `"a.b"`.
    pub fn parse(s: &str) -> Result<Self, TemplateError> {
        let invalid = || TemplateError::Malformed(format!("Invalid reference path: '{s}'"));
        if s.trim().is_empty() {
            return Err(invalid());
        }

        let mut segments = Vec::new();
        let mut key = String::new();
        let mut after_index = false;
        let mut after_dot = false;
        let mut chars = s.chars();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if key.is_empty() && !after_index {
                        return Err(invalid());
                    }
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    after_index = false;
                    after_dot = true;
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    } else if after_dot {
                        return Err(invalid());
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) => digits.push(d),
                            None => return Err(invalid()),
                        }
                    }
                    let index = digits.parse::<usize>().map_err(|_| invalid())?;
                    segments.push(PathSegment::Index(index));
                    after_index = true;
                    after_dot = false;
                }
                ']' => return Err(invalid()),
                c => {
                    if after_index {
                        return Err(invalid());
                    }
                    let c = if c == '\\' {
                        chars.next().ok_or_else(invalid)?
                    } else {
                        c
                    };
                    key.push(c);
                    after_dot = false;
                }
            }
        }

        if !key.is_empty() {
            segments.push(PathSegment::Key(key));
        } else if after_dot {
            return Err(invalid());
        }
        Ok(Self { segments })
    }

    /// Descend into an object field.
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Descend into an array element.
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Step back up one level.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True at the document root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments of this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Render the segments from `depth` onwards, i.e. the path relative to an
    /// ancestor located `depth` segments below the root.
    pub fn relative_to(&self, depth: usize) -> String {
        render(self.segments.get(depth..).unwrap_or_default())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.segments))
    }
}

fn render(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                for c in key.chars() {
                    if matches!(c, '.' | '[' | ']' | '\\') {
                        out.push('\\');
                    }
                    out.push(c);
                }
            }
            PathSegment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_render() {
        let path = Path::parse("users[2].address.city").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("users".to_string()),
                PathSegment::Index(2),
                PathSegment::Key("address".to_string()),
                PathSegment::Key("city".to_string()),
            ]
        );
        assert_eq!(path.to_string(), "users[2].address.city");
    }

    #[test]
    fn test_parse_nested_indices() {
        let path = Path::parse("grid[1][3]").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "grid[1][3]");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Path::parse("").is_err());
        assert!(Path::parse("a..b").is_err());
        assert!(Path::parse("a[x]").is_err());
        assert!(Path::parse("a[1").is_err());
        assert!(Path::parse("a[1]b").is_err());
    }

    #[test]
    fn test_push_pop_matches_parse() {
        let mut path = Path::root();
        path.push_key("tags");
        path.push_index(0);
        assert_eq!(path, Path::parse("tags[0]").unwrap());

        path.pop();
        path.push_index(1);
        assert_eq!(path.to_string(), "tags[1]");
    }

    #[test]
    fn test_special_characters_in_keys() {
        let mut dotted = Path::root();
        dotted.push_key("a.b");
        let mut nested = Path::root();
        nested.push_key("a");
        nested.push_key("b");

        assert_ne!(dotted.to_string(), nested.to_string());
        assert_eq!(dotted.to_string(), r"a\.b");
        assert_eq!(Path::parse(r"a\.b").unwrap(), dotted);
        assert_eq!(Path::parse("a.b").unwrap(), nested);

        let mut odd = Path::root();
        odd.push_key(r"x[0]\y");
        assert_eq!(Path::parse(&odd.to_string()).unwrap(), odd);
    }

    #[test]
    fn test_parse_rejects_dangling_separators() {
        assert!(Path::parse(".a").is_err());
        assert!(Path::parse("a.").is_err());
        assert!(Path::parse("a.[0]").is_err());
        assert!(Path::parse("a]").is_err());
        assert!(Path::parse(r"a\").is_err());
        assert_eq!(Path::parse("[2].x").unwrap().to_string(), "[2].x");
    }

    #[test]
    fn test_relative_to() {
        let path = Path::parse("items[4].owner.name").unwrap();
        assert_eq!(path.relative_to(2), "owner.name");
        assert_eq!(path.relative_to(0), "items[4].owner.name");
        assert_eq!(path.relative_to(10), "");
    }
}
