//! Turns a score vector into an ordered CODE/OMITTED segment sequence.

use cc_core::{Segment, SegmentKind};

#[derive(Debug, Clone, Copy)]
pub struct SegmentBuilder {
    threshold: f64,
    keep_threshold: usize,
}

impl SegmentBuilder {
    pub fn new(threshold: f64, keep_threshold: usize) -> Self {
        Self { threshold, keep_threshold: keep_threshold.max(1) }
    }

    fn classify(&self, score: f64) -> SegmentKind {
        if score >= self.threshold {
            SegmentKind::Code
        } else {
            SegmentKind::Omitted
        }
    }

    /// Split `lines` into runs at every classification change, then keep
    /// omitted runs shorter than `keep_threshold` as code: a placeholder would
    /// cost more than the lines it replaces.
    pub fn build(&self, lines: &[&str], scores: &[f64]) -> Vec<Segment> {
        // A line without a score is kept.
        let kind_at = |i: usize| self.classify(scores.get(i).copied().unwrap_or(1.0));
        let mut segments = Vec::new();
        let mut run_start = 0;

        for i in 1..=lines.len() {
            let boundary = i == lines.len() || kind_at(i) != kind_at(run_start);
            if boundary {
                let kind = kind_at(run_start);
                let content = lines[run_start..i].join("\n");
                segments.push(Segment::new(kind, content, run_start + 1, i));
                run_start = i;
            }
        }

        for seg in &mut segments {
            if seg.is_omitted() && seg.line_count() < self.keep_threshold {
                seg.kind = SegmentKind::Code;
            }
        }
        segments
    }
}
