//! Segment merging: coalesces fragments without dropping text.
//!
//! Gap text is always copied from the untouched source lines, never
//! synthesized, so a merged CODE segment is byte-identical to the range it
//! covers.

use cc_core::Segment;
use serde_json::Value;

pub const DEFAULT_MAX_GAP: usize = 3;

/// Merges adjacent segments of one file. Built per call around that file's
/// original lines.
pub struct SegmentMerger<'a> {
    lines: &'a [&'a str],
    max_gap: usize,
}

impl<'a> SegmentMerger<'a> {
    pub fn new(lines: &'a [&'a str], max_gap: usize) -> Self {
        Self { lines, max_gap }
    }

    pub fn merge(&self, segments: Vec<Segment>) -> Vec<Segment> {
        let mut out: Vec<Segment> = Vec::with_capacity(segments.len());

        for seg in segments {
            let Some(last) = out.last_mut() else {
                out.push(seg);
                continue;
            };

            if last.is_omitted() && seg.is_omitted() {
                merge_omitted(last, seg);
                continue;
            }

            if last.is_code() && seg.is_code() {
                let gap = seg.start_line.saturating_sub(last.end_line + 1);
                if gap <= self.max_gap {
                    if let Err(seg) = self.join_code(last, seg) {
                        out.push(seg);
                    }
                } else {
                    out.push(seg);
                }
                continue;
            }

            // CODE, short OMITTED, CODE: the omitted run is a gap.
            let bridges = seg.is_code()
                && last.is_omitted()
                && last.line_count() <= self.max_gap
                && out.len() >= 2
                && out[out.len() - 2].is_code();
            if bridges {
                let gap = out.pop();
                let joined = match out.last_mut() {
                    Some(prev) => self.join_code(prev, seg),
                    None => Err(seg),
                };
                if let Err(seg) = joined {
                    out.extend(gap);
                    out.push(seg);
                }
                continue;
            }

            out.push(seg);
        }
        out
    }

    /// Append `next` to `prev`, splicing in the original lines between them.
    /// Hands `next` back if the gap cannot be read from the source.
    fn join_code(&self, prev: &mut Segment, next: Segment) -> Result<(), Segment> {
        let gap_start = prev.end_line;
        let gap_end = next.start_line.saturating_sub(1);
        if gap_end < gap_start {
            return Err(next);
        }
        let Some(gap_lines) = self.lines.get(gap_start..gap_end) else {
            tracing::warn!(gap_start, gap_end, "gap outside source, not merging");
            return Err(next);
        };

        let mut content = std::mem::take(&mut prev.content);
        for line in gap_lines {
            content.push('\n');
            content.push_str(line);
        }
        content.push('\n');
        content.push_str(&next.content);
        prev.content = content;
        prev.end_line = next.end_line;
        prev.metadata.extend(next.metadata);

        if !gap_lines.is_empty() {
            let spliced = prev
                .metadata
                .get("gap_lines")
                .and_then(Value::as_u64)
                .unwrap_or(0)
                + gap_lines.len() as u64;
            prev.metadata.insert("merged_gap".into(), Value::Bool(true));
            prev.metadata.insert("gap_lines".into(), Value::from(spliced));
        }
        Ok(())
    }
}

fn merge_omitted(prev: &mut Segment, next: Segment) {
    prev.content.push('\n');
    prev.content.push_str(&next.content);
    prev.end_line = next.end_line;
    prev.metadata.extend(next.metadata);
}
