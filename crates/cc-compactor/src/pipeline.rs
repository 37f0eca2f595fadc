//! Compression pipeline: scorer, builder, merger, syntax guard, formatter.

use cc_core::{validate_coverage, CompressionConfig, CompressionLevel, Result, ScoringMode, Segment, SourceFile};
use serde_json::Value;

use crate::builder::SegmentBuilder;
use crate::merger::{SegmentMerger, DEFAULT_MAX_GAP};
use crate::placeholder::PlaceholderFormatter;
use crate::scorer::ImportanceScorer;
use crate::syntax_guard::{SyntaxGuard, SyntaxReport};

/// Rough token estimate used for statistics only.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Compression result with statistics.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub segments: Vec<Segment>,
    pub output: String,
    pub original_lines: usize,
    pub omitted_lines: usize,
    pub original_len: usize,
    pub compressed_len: usize,
    pub mode: ScoringMode,
    pub syntax: SyntaxReport,
}

impl CompressionResult {
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 { return 1.0; }
        self.compressed_len as f64 / self.original_len as f64
    }

    pub fn reduction_pct(&self) -> f64 {
        if self.original_len == 0 { return 0.0; }
        (1.0 - self.ratio()) * 100.0
    }

    pub fn estimated_tokens_saved(&self) -> usize {
        (self.original_len.div_ceil(4)).saturating_sub(self.compressed_len.div_ceil(4))
    }

    pub fn omitted_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_omitted())
    }
}

/// Join segment contents, one segment per line block.
pub fn flatten(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.content.as_str()).collect::<Vec<_>>().join("\n")
}

/// Rebuild the source text from code content and the audited originals of
/// omitted segments.
pub fn reconstruct(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.source_text()).collect::<Vec<_>>().join("\n")
}

/// The compactor. Holds configuration only, so one instance can serve any
/// number of files, from any number of threads.
#[derive(Debug, Clone)]
pub struct Compactor {
    config: CompressionConfig,
    level: CompressionLevel,
    max_gap: usize,
}

impl Compactor {
    pub fn new(config: CompressionConfig) -> Self {
        let level = config.resolved_level();
        if !config.placeholder_template.contains("{lines}") {
            tracing::warn!(template = %config.placeholder_template, "placeholder has no {{lines}} slot");
        }
        Self { config, level, max_gap: DEFAULT_MAX_GAP }
    }

    pub fn with_max_gap(mut self, max_gap: usize) -> Self {
        self.max_gap = max_gap;
        self
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    pub fn mode(&self) -> ScoringMode {
        self.level.mode()
    }

    /// Segment a file. Disabled compression yields one CODE segment, empty
    /// content yields none.
    pub fn process(&self, file: &SourceFile) -> Vec<Segment> {
        self.run(file).0
    }

    /// Segment a file and collect statistics.
    pub fn compress(&self, file: &SourceFile) -> CompressionResult {
        let (segments, syntax) = self.run(file);
        let output = flatten(&segments);
        let original_lines = if file.content.is_empty() { 0 } else { file.content.split('\n').count() };
        let omitted_lines = segments.iter().filter(|s| s.is_omitted()).map(Segment::line_count).sum();

        CompressionResult {
            original_len: file.content.len(),
            compressed_len: output.len(),
            output,
            segments,
            original_lines,
            omitted_lines,
            mode: self.mode(),
            syntax,
        }
    }

    /// Like [`compress`](Self::compress), but fails with `InvalidSegments` if
    /// the segments do not tile the file.
    pub fn compress_validated(&self, file: &SourceFile) -> Result<CompressionResult> {
        let result = self.compress(file);
        validate_coverage(&result.segments, result.original_lines)?;
        Ok(result)
    }

    fn run(&self, file: &SourceFile) -> (Vec<Segment>, SyntaxReport) {
        if file.content.is_empty() {
            return (Vec::new(), SyntaxReport::default());
        }
        let lines = file.lines();
        if !self.config.enabled {
            let whole = Segment::code(file.content.as_str(), 1, lines.len())
                .with_meta("compression_applied", Value::Bool(false));
            return (vec![whole], SyntaxReport::default());
        }

        let mode = self.mode();
        let scorer = ImportanceScorer::new(mode, self.config.normalized_keep_tags());
        let scores = scorer.score(&lines, file);

        let builder = SegmentBuilder::new(mode.threshold(), self.config.effective_keep_threshold());
        let segments = builder.build(&lines, &scores);

        let merger = SegmentMerger::new(&lines, self.max_gap);
        let segments = merger.merge(segments);

        let (segments, syntax) = SyntaxGuard::new().check(segments, &lines, &file.language);

        let formatter = PlaceholderFormatter::new(&self.config.placeholder_template, mode);
        let segments = formatter.format(segments, file);

        tracing::debug!(
            path = %file.path,
            level = %self.level,
            segments = segments.len(),
            omitted = segments.iter().filter(|s| s.is_omitted()).count(),
            "compressed file"
        );
        (segments, syntax)
    }
}

impl Default for Compactor {
    fn default() -> Self {
        Self::new(CompressionConfig::default())
    }
}
