//! Line-importance code compactor.
//!
//! Stages:
//! 1. Scorer: per-line importance from findings, declarations, keep-tags and patterns
//! 2. Builder: CODE/OMITTED runs, short omissions kept as code
//! 3. Merger: coalesce runs, splicing original gap text back in
//! 4. Syntax guard: structural checks, one-shot repair for Python
//! 5. Placeholders: omitted runs rendered with counts and detected patterns

pub mod builder;
pub mod merger;
pub mod patterns;
pub mod pipeline;
pub mod placeholder;
pub mod scorer;
pub mod syntax_guard;

pub use cc_core::{
    CompressionConfig, CompressionLevel, Declaration, ScoringMode, SecurityFinding, Segment,
    SegmentKind, Severity, SourceFile,
};
pub use pipeline::{estimate_tokens, flatten, reconstruct, Compactor, CompressionResult};
pub use syntax_guard::SyntaxReport;
