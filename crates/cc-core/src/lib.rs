pub mod config;
pub mod error;
pub mod segment;
pub mod types;

pub use config::{CompressionConfig, CompressionLevel, ScoringMode};
pub use error::{CompactError, Result};
pub use segment::{validate_coverage, Segment, SegmentKind};
pub use types::{Declaration, LineImportance, SecurityFinding, Severity, SourceFile};

#[cfg(test)]
mod tests;
