//! Segments: contiguous line ranges that make up a compressed file.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CompactError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SegmentKind {
    /// Retained verbatim.
    Code,
    /// Replaced by a placeholder.
    Omitted,
    Metadata,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "CODE",
            Self::Omitted => "OMITTED",
            Self::Metadata => "METADATA",
        }
    }
}

/// A line range of a file. Lines are 1-based, inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Segment {
    pub fn new(kind: SegmentKind, content: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        Self { kind, content: content.into(), start_line, end_line, metadata: Map::new() }
    }

    pub fn code(content: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        Self::new(SegmentKind::Code, content, start_line, end_line)
    }

    pub fn omitted(content: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        Self::new(SegmentKind::Omitted, content, start_line, end_line)
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn line_count(&self) -> usize {
        self.end_line + 1 - self.start_line
    }

    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::Code
    }

    pub fn is_omitted(&self) -> bool {
        self.kind == SegmentKind::Omitted
    }

    /// The source text this segment stands for: the content itself for code,
    /// the audited original for formatted omissions.
    pub fn source_text(&self) -> &str {
        match self.metadata.get("original_content").and_then(Value::as_str) {
            Some(original) if self.is_omitted() => original,
            _ => &self.content,
        }
    }
}

/// Check that `segments` cover `1..=total_lines` in order, exactly once.
pub fn validate_coverage(segments: &[Segment], total_lines: usize) -> Result<()> {
    if segments.is_empty() {
        if total_lines == 0 {
            return Ok(());
        }
        return Err(CompactError::InvalidSegments(format!(
            "no segments for {} lines",
            total_lines
        )));
    }

    let mut expected = 1;
    for (idx, seg) in segments.iter().enumerate() {
        if seg.start_line > seg.end_line {
            return Err(CompactError::InvalidSegments(format!(
                "segment {} has inverted range {}..{}",
                idx, seg.start_line, seg.end_line
            )));
        }
        if seg.start_line != expected {
            let problem = if seg.start_line > expected { "gap" } else { "overlap" };
            return Err(CompactError::InvalidSegments(format!(
                "{} before segment {}: expected line {}, found {}",
                problem, idx, expected, seg.start_line
            )));
        }
        expected = seg.end_line + 1;
    }

    if expected != total_lines + 1 {
        return Err(CompactError::InvalidSegments(format!(
            "segments end at line {}, file has {} lines",
            expected - 1,
            total_lines
        )));
    }
    Ok(())
}
