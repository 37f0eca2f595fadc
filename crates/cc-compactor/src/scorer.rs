//! Line importance scoring.
//!
//! Every rule only raises a line's score, so the order the rules run in does
//! not change the result except for context spreading, which runs last.

use cc_core::{CompressionConfig, LineImportance, ScoringMode, SourceFile};
use regex::Regex;
use std::sync::LazyLock;

use crate::patterns;

/// Declaration lines always kept from `start_line`.
const SIGNATURE_LINES: usize = 5;
/// Further declaration lines given body context under `Contextual`.
const BODY_CONTEXT_LINES: usize = 5;
const BODY_CONTEXT_SCORE: f64 = 0.5;
/// Lines around a high/critical finding that are always kept.
const FINDING_RADIUS: usize = 2;
/// Scores at or above this spread to their neighbors.
const SPREAD_MIN: f64 = 0.9;
const SPREAD_SCORE: f64 = 0.8;

const CONTROL_FLOW_SCORE: f64 = 0.5;
const ASSIGN_RETURN_SCORE: f64 = 0.4;
const PLAIN_CODE_SCORE: f64 = 0.2;

static RE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(",
        r"import\s+(static\s+)?[\w.*]+(\s+as\s+\w+)?(\s*,\s*[\w.]+(\s+as\s+\w+)?)*\s*;?\s*$",
        r#"|import\s*\(\s*$|import\s+["']|import\s+.+\bfrom\s+["']"#,
        r"|from\s+[\w.]+\s+import\s+\S",
        r"|#include\b",
        r"|using\s+(namespace\s+)?[\w.:]+\s*;",
        r"|require\s*\(",
        r"|(pub(\([\w:]+\))?\s+)?use\s+\w+(::|;)",
        r"|extern\s+crate\b",
        r")",
    ))
    .unwrap()
});
static RE_CONTROL_FLOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(if|else|elif|for|while|switch|case|match|loop|break|continue)\b").unwrap()
});

const COMMENT_PREFIXES: &[&str] = &["#", "//", "/*", "*", "--", "\"\"\"", "'''"];

fn is_comment(trimmed: &str) -> bool {
    COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

#[inline]
fn raise(score: &mut f64, value: f64) {
    if value > *score {
        *score = value;
    }
}

/// Computes a [`LineImportance`] for one file.
#[derive(Debug, Clone)]
pub struct ImportanceScorer {
    mode: ScoringMode,
    keep_tags: Vec<String>,
}

impl ImportanceScorer {
    pub fn new(mode: ScoringMode, keep_tags: Vec<String>) -> Self {
        Self { mode, keep_tags }
    }

    pub fn from_config(config: &CompressionConfig) -> Self {
        Self::new(config.mode(), config.normalized_keep_tags())
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    /// Score each of `lines` using the metadata in `file`.
    pub fn score(&self, lines: &[&str], file: &SourceFile) -> LineImportance {
        let total = lines.len();
        let mut scores = vec![0.0; total];
        if total == 0 {
            return scores;
        }

        self.score_findings(&mut scores, file);
        self.score_declarations(&mut scores, file);
        self.score_keep_tags(&mut scores, lines);
        self.score_patterns(&mut scores, lines);
        self.score_heuristics(&mut scores, lines);
        self.spread_context(&mut scores);

        scores
    }

    fn score_findings(&self, scores: &mut [f64], file: &SourceFile) {
        let total = scores.len();
        for finding in &file.findings {
            if finding.line_number == 0 || finding.line_number > total {
                tracing::debug!(line = finding.line_number, path = %file.path, "finding outside file");
                continue;
            }
            let idx = finding.line_number - 1;
            raise(&mut scores[idx], 1.0);
            if finding.severity.is_severe() {
                let lo = idx.saturating_sub(FINDING_RADIUS);
                let hi = (idx + FINDING_RADIUS).min(total - 1);
                for s in &mut scores[lo..=hi] {
                    raise(s, 1.0);
                }
            }
        }
    }

    fn score_declarations(&self, scores: &mut [f64], file: &SourceFile) {
        let total = scores.len();
        for decl in &file.declarations {
            if decl.start_line == 0 || decl.start_line > total {
                continue;
            }
            let start = decl.start_line - 1;
            let sig_end = (start + SIGNATURE_LINES).min(total);
            for s in &mut scores[start..sig_end] {
                raise(s, 1.0);
            }

            if self.mode == ScoringMode::Contextual {
                let decl_end = decl.end_line.max(decl.start_line).min(total);
                let body_end = (sig_end + BODY_CONTEXT_LINES).min(decl_end);
                if body_end > sig_end {
                    for s in &mut scores[sig_end..body_end] {
                        raise(s, BODY_CONTEXT_SCORE);
                    }
                }
            }
        }
    }

    fn score_keep_tags(&self, scores: &mut [f64], lines: &[&str]) {
        if self.keep_tags.is_empty() {
            return;
        }
        let total = lines.len();
        for (i, line) in lines.iter().enumerate() {
            let lower = line.to_lowercase();
            if self.keep_tags.iter().any(|tag| lower.contains(tag.as_str())) {
                let lo = i.saturating_sub(1);
                let hi = (i + 1).min(total - 1);
                for s in &mut scores[lo..=hi] {
                    raise(s, 1.0);
                }
            }
        }
    }

    fn score_patterns(&self, scores: &mut [f64], lines: &[&str]) {
        let lib = patterns::library();
        for (s, line) in scores.iter_mut().zip(lines) {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(best) = lib.best_score(line) {
                raise(s, best);
            }
        }
    }

    fn score_heuristics(&self, scores: &mut [f64], lines: &[&str]) {
        for (s, line) in scores.iter_mut().zip(lines) {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if RE_IMPORT.is_match(line) {
                raise(s, 1.0);
            } else if is_comment(trimmed) {
                continue;
            } else if RE_CONTROL_FLOW.is_match(line) {
                raise(s, CONTROL_FLOW_SCORE);
            } else if line.contains("return") || line.contains('=') {
                raise(s, ASSIGN_RETURN_SCORE);
            } else {
                raise(s, PLAIN_CODE_SCORE);
            }
        }
    }

    fn spread_context(&self, scores: &mut [f64]) {
        let radius = self.mode.context_lines();
        let total = scores.len();
        let anchors: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter(|(_, s)| **s >= SPREAD_MIN)
            .map(|(i, _)| i)
            .collect();

        for i in anchors {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius).min(total - 1);
            for s in &mut scores[lo..=hi] {
                raise(s, SPREAD_SCORE);
            }
        }
    }
}
