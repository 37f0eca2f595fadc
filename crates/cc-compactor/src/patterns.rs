//! Pattern library: named matchers for domain-significant idioms.
//!
//! The table is data: each row is a category, a tier and a regex. The scorer
//! only asks for the best tier score of a line.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Domain category a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternCategory {
    Security,
    ErrorHandling,
    Database,
    Api,
    Config,
    Async,
    Testing,
}

impl PatternCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::ErrorHandling => "error_handling",
            Self::Database => "database",
            Self::Api => "api",
            Self::Config => "config",
            Self::Async => "async",
            Self::Testing => "testing",
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            Self::Security | Self::ErrorHandling | Self::Database => Tier::Critical,
            Self::Api | Self::Config => Tier::High,
            Self::Async | Self::Testing => Tier::Moderate,
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Significance tier of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Moderate,
    High,
    Critical,
}

impl Tier {
    pub fn score(&self) -> f64 {
        match self {
            Self::Critical => 1.0,
            Self::High => 0.8,
            Self::Moderate => 0.6,
        }
    }
}

/// (category, pattern) rows. Several rows may share a category.
const PATTERN_TABLE: &[(PatternCategory, &str)] = &[
    (PatternCategory::Security, r"(?i)\b(password|passwd|secret|api[_-]?key|private[_-]?key|credentials?|authenticat\w*|authoriz\w*|encrypt\w*|decrypt\w*|sanitiz\w*|csrf|xss)\b"),
    (PatternCategory::Security, r"\b(eval|exec|system|popen)\s*\("),
    (PatternCategory::ErrorHandling, r"\b(try|catch|except|finally|raise|throw|throws|rescue)\b"),
    (PatternCategory::ErrorHandling, r"(\bpanic!|\.unwrap\(\)|\.expect\(|\bErr\(|\?;|\berror\b|\bException\b)"),
    (PatternCategory::Database, r"(?i)\b(select\s+.+\s+from|insert\s+into|update\s+\w+\s+set|delete\s+from|create\s+table|drop\s+table)\b"),
    (PatternCategory::Database, r"(?i)\b(cursor|transaction|rollback|commit\(|execute\(|query\()"),
    (PatternCategory::Api, r"(@(app|router|api|bp)\.(get|post|put|delete|patch|route)|\b(endpoint|route|handler)s?\b)"),
    (PatternCategory::Api, r"(?i)\b(http\w*|request|response|fetch)\b"),
    (PatternCategory::Api, r"\.(get|post|put|patch)\s*\("),
    (PatternCategory::Config, r"(?i)\b(config\w*|settings?|getenv|environ|dotenv|feature_flags?)\b"),
    (PatternCategory::Config, r"\benv::var\b|\bprocess\.env\b"),
    (PatternCategory::Async, r"\b(async|await|spawn|tokio|asyncio|coroutine|Promise|Future|goroutine)\b"),
    (PatternCategory::Async, r"\bgo\s+func\b|\bthreading\b"),
    (PatternCategory::Testing, r"(#\[test\]|@pytest|\bassert\w*!?|\bmock\w*|\bfixture\b|\bdescribe\(|\bit\(|\bdef\s+test_\w+)"),
];

struct Matcher {
    category: PatternCategory,
    re: Regex,
}

/// Compiled pattern table.
pub struct PatternLibrary {
    matchers: Vec<Matcher>,
}

static LIBRARY: LazyLock<PatternLibrary> = LazyLock::new(|| PatternLibrary::from_table(PATTERN_TABLE));

/// Process-wide pattern library, compiled on first use.
pub fn library() -> &'static PatternLibrary {
    &LIBRARY
}

impl PatternLibrary {
    /// Compile a table; rows whose regex fails to compile are skipped.
    pub fn from_table(table: &[(PatternCategory, &str)]) -> Self {
        let matchers = table
            .iter()
            .filter_map(|(category, pattern)| match Regex::new(pattern) {
                Ok(re) => Some(Matcher { category: *category, re }),
                Err(err) => {
                    tracing::warn!(category = %category, %err, "skipping invalid pattern");
                    None
                }
            })
            .collect();
        Self { matchers }
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Categories matching a single line, ordered and deduplicated.
    pub fn categories_in_line(&self, line: &str) -> Vec<PatternCategory> {
        self.categories_in_text(line)
    }

    /// Highest tier score among categories matching `line`.
    pub fn best_score(&self, line: &str) -> Option<f64> {
        self.matchers
            .iter()
            .filter(|m| m.re.is_match(line))
            .map(|m| m.category.tier().score())
            .fold(None, |best, s| Some(best.map_or(s, |b: f64| b.max(s))))
    }

    /// Categories detected anywhere in `text`, ordered and deduplicated.
    pub fn categories_in_text(&self, text: &str) -> Vec<PatternCategory> {
        let mut found: Vec<PatternCategory> = self
            .matchers
            .iter()
            .filter(|m| m.re.is_match(text))
            .map(|m| m.category)
            .collect();
        found.sort();
        found.dedup();
        found
    }
}
