//! Segment parsing for slash-delimited path expressions
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

use super::error::PathError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

static PREDICATE_REGEX: OnceLock<Regex> = OnceLock::new();

fn predicate_regex() -> &'static Regex {
    PREDICATE_REGEX.get_or_init(|| {
        Regex::new(r"^\*\{([^=}]+)==?([^=}]*)\}").expect("Valid regex pattern")
    })
}

/// Equality filter attached to a wildcard segment, `*{field=literal}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: String,
    pub literal: String,
}

/// One unit of a path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Empty segment, leaves the cursor untouched
    Empty,
    /// Literal key
    Key(String),
    /// Wildcard over a sequence, optionally filtered
    Wildcard(Option<Predicate>),
}

impl Segment {
    /// Parse a single raw segment of `path`
    pub fn parse(raw: &str, path: &str) -> Result<Segment, PathError> {
        if raw.is_empty() {
            return Ok(Segment::Empty);
        }
        if !raw.starts_with('*') {
            return Ok(Segment::Key(raw.to_string()));
        }
        if !raw.contains('{') {
            return Ok(Segment::Wildcard(None));
        }

        let captures = predicate_regex().captures(raw).ok_or_else(|| {
            PathError::syntax(
                "expected a predicate of the form *{field=value}",
                raw,
                path,
            )
        })?;
        Ok(Segment::Wildcard(Some(Predicate {
            field: captures[1].to_string(),
            literal: captures[2].to_string(),
        })))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Empty => Ok(()),
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Wildcard(None) => write!(f, "*"),
            Segment::Wildcard(Some(p)) => write!(f, "*{{{}={}}}", p.field, p.literal),
        }
    }
}
