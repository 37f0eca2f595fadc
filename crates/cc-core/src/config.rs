//! Compression options as supplied by the CLI/config layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CompactError, Result};

pub const DEFAULT_PLACEHOLDER: &str = "[...code omitted ({lines} lines, {issues} issues)...]";

/// Compression level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    Low,
    Medium,
    High,
    Aggressive,
}

impl CompressionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Aggressive => "aggressive",
        }
    }

    pub fn mode(&self) -> ScoringMode {
        match self {
            Self::High | Self::Aggressive => ScoringMode::Essential,
            Self::Low | Self::Medium => ScoringMode::Contextual,
        }
    }
}

impl FromStr for CompressionLevel {
    type Err = CompactError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "aggressive" => Ok(Self::Aggressive),
            _ => Err(CompactError::UnknownLevel(s.to_string())),
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much context the scorer keeps around important lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Signatures and hot spots only.
    Essential,
    /// Also keeps some body context around declarations.
    Contextual,
}

impl ScoringMode {
    /// Lines scoring at or above this are kept.
    pub fn threshold(&self) -> f64 {
        match self {
            Self::Essential => 0.7,
            Self::Contextual => 0.4,
        }
    }

    pub fn context_lines(&self) -> usize {
        match self {
            Self::Essential => 1,
            Self::Contextual => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Contextual => "contextual",
        }
    }
}

/// Compression settings. Field names on the wire match the recognized
/// `compression_*` options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompressionConfig {
    #[serde(rename = "enable_compression")]
    pub enabled: bool,
    /// Kept as text so an unrecognized level degrades instead of failing.
    #[serde(rename = "compression_level")]
    pub level: String,
    #[serde(rename = "compression_keep_threshold")]
    pub keep_threshold: usize,
    #[serde(rename = "compression_keep_tags")]
    pub keep_tags: Vec<String>,
    #[serde(rename = "compression_placeholder")]
    pub placeholder_template: String,
}

impl CompressionConfig {
    pub fn new(level: CompressionLevel) -> Self {
        Self { level: level.as_str().into(), ..Self::default() }
    }

    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    /// Parse an option record such as
    /// `{"enable_compression": true, "compression_level": "high"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CompactError::Config(e.to_string()))
    }

    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level.as_str().into();
        self
    }

    pub fn with_keep_threshold(mut self, keep_threshold: usize) -> Self {
        self.keep_threshold = keep_threshold;
        self
    }

    pub fn with_keep_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_placeholder(mut self, template: impl Into<String>) -> Self {
        self.placeholder_template = template.into();
        self
    }

    /// The configured level, or `Medium` when it is not recognized.
    pub fn resolved_level(&self) -> CompressionLevel {
        match self.level.parse() {
            Ok(level) => level,
            Err(err) => {
                tracing::warn!(%err, "falling back to medium compression");
                CompressionLevel::Medium
            }
        }
    }

    pub fn mode(&self) -> ScoringMode {
        self.resolved_level().mode()
    }

    /// Minimum length of an omitted run; never below one line.
    pub fn effective_keep_threshold(&self) -> usize {
        self.keep_threshold.max(1)
    }

    /// Keep-tags lowercased, empty entries dropped.
    pub fn normalized_keep_tags(&self) -> Vec<String> {
        self.keep_tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: CompressionLevel::Medium.as_str().into(),
            keep_threshold: 3,
            keep_tags: vec!["important".into(), "keep".into(), "security".into()],
            placeholder_template: DEFAULT_PLACEHOLDER.into(),
        }
    }
}
