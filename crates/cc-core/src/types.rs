use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Per-line retention priority, one value in `[0.0, 1.0]` per line.
pub type LineImportance = Vec<f64>;

/// Severity attached to a security finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
    #[serde(alias = "critical")]
    Critical,
}

impl Severity {
    /// High and critical findings pull their surrounding lines in too.
    pub fn is_severe(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// A declaration span reported by a language parser. Lines are 1-based, inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Declaration {
    pub kind: String,
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl Declaration {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        Self { kind: kind.into(), name: name.into(), start_line, end_line }
    }
}

/// A finding reported by an external security scanner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecurityFinding {
    pub line_number: usize,
    pub severity: Severity,
    pub description: String,
}

impl SecurityFinding {
    pub fn new(line_number: usize, severity: Severity, description: impl Into<String>) -> Self {
        Self { line_number, severity, description: description.into() }
    }
}

/// Full text of one source file plus the metadata extracted for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub language: String,
    pub content: String,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    #[serde(default)]
    pub findings: Vec<SecurityFinding>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, language: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            content: content.into(),
            declarations: Vec::new(),
            findings: Vec::new(),
        }
    }

    /// Parse a file record (`path`, `language`, `content`, optional
    /// `declarations` and `findings`) as handed over by the collector.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_declarations(mut self, declarations: Vec<Declaration>) -> Self {
        self.declarations = declarations;
        self
    }

    pub fn with_findings(mut self, findings: Vec<SecurityFinding>) -> Self {
        self.findings = findings;
        self
    }

    /// Content split on `\n`. A trailing newline yields a final empty line.
    pub fn lines(&self) -> Vec<&str> {
        self.content.split('\n').collect()
    }

    /// Findings whose line falls inside `start..=end`.
    pub fn findings_in(&self, start: usize, end: usize) -> impl Iterator<Item = &SecurityFinding> {
        self.findings
            .iter()
            .filter(move |f| f.line_number >= start && f.line_number <= end)
    }
}
