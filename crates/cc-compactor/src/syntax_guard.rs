//! Post-compression structural checks.
//!
//! Bracket and keyword checks only warn. For Python the retained code is
//! parsed with tree-sitter, and when compression introduced a syntax error the
//! omitted segment closest to the failure is put back. One repair per call;
//! a second error after the repair stays a warning.

use cc_core::{Segment, SegmentKind};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tree_sitter::{Language, Parser};

/// A bracket problem in the retained code. Lines are original 1-based lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketIssue {
    Unexpected { line: usize, found: char },
    Mismatched { line: usize, found: char, expected: char },
    Unclosed { line: usize, open: char },
}

/// What the guard found and did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntaxReport {
    pub bracket_issues: Vec<BracketIssue>,
    /// Names of keyword pairs whose opening side compression removed.
    pub keyword_issues: Vec<&'static str>,
    /// Original line the reference parser failed on, if any.
    pub parse_error_line: Option<usize>,
    /// Line range of the omitted segment promoted back to code.
    pub repaired_segment: Option<(usize, usize)>,
}

impl SyntaxReport {
    pub fn is_clean(&self) -> bool {
        self.bracket_issues.is_empty() && self.keyword_issues.is_empty() && self.parse_error_line.is_none()
    }
}

struct KeywordPair {
    name: &'static str,
    opener: Regex,
    closer: Regex,
}

const KEYWORD_PAIR_TABLE: &[(&str, &str, &str)] = &[
    ("if/else", r"\bif\b", r"\b(else|elif)\b"),
    ("try/except", r"\btry\b", r"\b(except|finally)\b"),
    ("for/break", r"\bfor\b", r"\b(break|continue|pass)\b"),
    ("while/break", r"\bwhile\b", r"\b(break|continue|pass)\b"),
    ("class/method", r"(?m)^\s*(class|struct|impl)\b", r"(?m)^\s+(def|fn|function)\s+\w+"),
    ("def/return", r"\b(def|fn|function|func)\b", r"\breturn\b"),
];

static KEYWORD_PAIRS: LazyLock<Vec<KeywordPair>> = LazyLock::new(|| {
    KEYWORD_PAIR_TABLE
        .iter()
        .map(|(name, opener, closer)| KeywordPair {
            name: *name,
            opener: Regex::new(opener).unwrap(),
            closer: Regex::new(closer).unwrap(),
        })
        .collect()
});

/// Retained code concatenated, with the original line of every row.
struct CodeView {
    text: String,
    rows: Vec<usize>,
}

fn code_view(segments: &[Segment]) -> CodeView {
    let mut parts = Vec::new();
    let mut rows = Vec::new();
    for seg in segments.iter().filter(|s| s.is_code()) {
        for (k, _) in seg.content.split('\n').enumerate() {
            rows.push(seg.start_line + k);
        }
        parts.push(seg.content.as_str());
    }
    CodeView { text: parts.join("\n"), rows }
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Stack-based scan over `(){}[]`. Strings and comments are not skipped.
pub fn check_brackets(text: &str, rows: &[usize]) -> Vec<BracketIssue> {
    let mut issues = Vec::new();
    let mut stack: Vec<(char, usize)> = Vec::new();

    for (r, row) in text.split('\n').enumerate() {
        let line = rows.get(r).copied().unwrap_or(r + 1);
        for c in row.chars() {
            match c {
                '(' | '[' | '{' => stack.push((c, line)),
                ')' | ']' | '}' => match stack.pop() {
                    Some((open, _)) if closing_for(open) == c => {}
                    Some((open, _)) => issues.push(BracketIssue::Mismatched {
                        line,
                        found: c,
                        expected: closing_for(open),
                    }),
                    None => issues.push(BracketIssue::Unexpected { line, found: c }),
                },
                _ => {}
            }
        }
    }
    issues.extend(stack.into_iter().map(|(open, line)| BracketIssue::Unclosed { line, open }));
    issues
}

/// Pairs whose closing keyword survived while every opening one was dropped.
pub fn check_keyword_pairs(original: &str, retained: &str) -> Vec<&'static str> {
    KEYWORD_PAIRS
        .iter()
        .filter(|p| {
            p.closer.is_match(retained)
                && !p.opener.is_match(retained)
                && p.opener.is_match(original)
        })
        .map(|p| p.name)
        .collect()
}

/// Languages whose retained code is actually parsed.
pub fn is_reference_language(language: &str) -> bool {
    matches!(language.trim().to_lowercase().as_str(), "python" | "py")
}

/// 0-based row of the first ERROR or MISSING node, `None` if the text parses.
fn first_python_error(source: &str) -> Option<usize> {
    let lang = Language::from(tree_sitter_python::LANGUAGE);
    let mut parser = Parser::new();
    if let Err(err) = parser.set_language(&lang) {
        tracing::warn!(%err, "python grammar unavailable");
        return None;
    }
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }

    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Index of the omitted segment spanning `line`, else the nearest one.
/// Ties go to the segment after the line.
fn omitted_near(segments: &[Segment], line: usize) -> Option<usize> {
    segments
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_omitted())
        .min_by_key(|(_, s)| {
            if line < s.start_line {
                (s.start_line - line, 0)
            } else if line > s.end_line {
                (line - s.end_line, 1)
            } else {
                (0, 0)
            }
        })
        .map(|(i, _)| i)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxGuard;

impl SyntaxGuard {
    pub fn new() -> Self {
        Self
    }

    /// Check `segments` (omitted content still verbatim) against the original
    /// `lines`. Never fails; problems end up in the report and the log.
    pub fn check(&self, mut segments: Vec<Segment>, lines: &[&str], language: &str) -> (Vec<Segment>, SyntaxReport) {
        let mut report = SyntaxReport::default();
        if !segments.iter().any(|s| s.is_omitted()) {
            return (segments, report);
        }

        let view = code_view(&segments);
        let original = lines.join("\n");

        report.bracket_issues = check_brackets(&view.text, &view.rows);
        if !report.bracket_issues.is_empty() {
            tracing::warn!(issues = ?report.bracket_issues, "unbalanced brackets in retained code");
        }

        report.keyword_issues = check_keyword_pairs(&original, &view.text);
        if !report.keyword_issues.is_empty() {
            tracing::warn!(pairs = ?report.keyword_issues, "keyword pairs broken by compression");
        }

        if is_reference_language(language) {
            self.repair(&mut segments, &view, &original, &mut report);
        }
        (segments, report)
    }

    fn repair(&self, segments: &mut [Segment], view: &CodeView, original: &str, report: &mut SyntaxReport) {
        let Some(row) = first_python_error(&view.text) else {
            return;
        };
        let line = view
            .rows
            .get(row)
            .or_else(|| view.rows.last())
            .copied()
            .unwrap_or(1);
        report.parse_error_line = Some(line);

        if first_python_error(original).is_some() {
            tracing::debug!(line, "source does not parse either, leaving segments as they are");
            return;
        }

        let Some(idx) = omitted_near(segments, line) else {
            return;
        };
        let seg = &mut segments[idx];
        seg.kind = SegmentKind::Code;
        seg.metadata.insert("expanded_for_syntax".into(), Value::Bool(true));
        report.repaired_segment = Some((seg.start_line, seg.end_line));
        tracing::warn!(
            line,
            start = seg.start_line,
            end = seg.end_line,
            "compression broke syntax, restored omitted segment"
        );
    }
}
