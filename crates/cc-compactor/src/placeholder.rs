//! Placeholder rendering for omitted segments.

use cc_core::{ScoringMode, Segment, SegmentKind, SourceFile};
use serde_json::{Map, Value};

use crate::patterns::{self, PatternCategory};

/// Fill `{lines}` and `{issues}` in a placeholder template.
pub fn render_template(template: &str, lines: usize, issues: usize) -> String {
    template
        .replace("{lines}", &lines.to_string())
        .replace("{issues}", &issues.to_string())
}

/// Suffix listing detected categories, empty when none.
pub fn pattern_suffix(categories: &[PatternCategory]) -> String {
    if categories.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
    format!(" [patterns: {}]", names.join(", "))
}

pub struct PlaceholderFormatter<'a> {
    template: &'a str,
    mode: ScoringMode,
}

impl<'a> PlaceholderFormatter<'a> {
    pub fn new(template: &'a str, mode: ScoringMode) -> Self {
        Self { template, mode }
    }

    /// Replace every omitted segment's content with its placeholder. A segment
    /// whose placeholder would be as long as its text stays code.
    pub fn format(&self, segments: Vec<Segment>, file: &SourceFile) -> Vec<Segment> {
        segments
            .into_iter()
            .map(|seg| if seg.is_omitted() { self.format_one(seg, file) } else { seg })
            .collect()
    }

    fn format_one(&self, mut seg: Segment, file: &SourceFile) -> Segment {
        let line_count = seg.line_count();

        let mut severities: Map<String, Value> = Map::new();
        let mut issue_count = 0usize;
        for finding in file.findings_in(seg.start_line, seg.end_line) {
            issue_count += 1;
            let entry = severities
                .entry(finding.severity.as_str())
                .or_insert(Value::from(0u64));
            *entry = Value::from(entry.as_u64().unwrap_or(0) + 1);
        }

        let categories = patterns::library().categories_in_text(&seg.content);
        let placeholder = format!(
            "{}{}",
            render_template(self.template, line_count, issue_count),
            pattern_suffix(&categories)
        );

        // Omitting must never make the output longer.
        if placeholder.len() >= seg.content.len() {
            tracing::debug!(start = seg.start_line, end = seg.end_line, "placeholder not shorter, keeping code");
            seg.kind = SegmentKind::Code;
            seg.metadata.insert("placeholder_not_shorter".into(), Value::Bool(true));
            return seg;
        }

        let original = std::mem::replace(&mut seg.content, placeholder);

        let omitted_patterns: Vec<Value> = categories.iter().map(|c| Value::from(c.as_str())).collect();
        seg.metadata.insert("original_content".into(), Value::String(original));
        seg.metadata.insert("line_count".into(), Value::from(line_count));
        seg.metadata.insert("issue_count".into(), Value::from(issue_count));
        seg.metadata.insert("issue_severities".into(), Value::Object(severities));
        seg.metadata.insert("omitted_patterns".into(), Value::Array(omitted_patterns));
        seg.metadata.insert("scoring_mode".into(), Value::from(self.mode.as_str()));
        seg
    }
}
