//! Half-open offset spans.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::ModelError;

/// A half-open `[start, end)` range of offsets into the document data,
/// counted in UTF-16 code units.
///
/// `start <= end` holds for every value; construction and decoding both
/// reject reversed offsets.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    start_offset: usize,
    end_offset: usize,
}

impl Span {
    /// Creates a span, failing if `start > end`.
    pub fn new(start: usize, end: usize) -> Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::InvalidSpan { start, end });
        }
        Ok(Self {
            start_offset: start,
            end_offset: end,
        })
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start_offset
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end_offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Returns true if `other` lies entirely inside this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start_offset <= other.start_offset && other.end_offset <= self.end_offset
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start_offset, self.end_offset)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_offset, self.end_offset)
    }
}

impl<'de> Deserialize<'de> for Span {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RawSpan {
            start_offset: usize,
            end_offset: usize,
        }

        let raw = RawSpan::deserialize(deserializer)?;
        Span::new(raw.start_offset, raw.end_offset).map_err(D::Error::custom)
    }
}
