use crate::*;
use crate::config::DEFAULT_PLACEHOLDER;

// ========== Config ==========

#[test]
fn test_config_defaults() {
    let cfg = CompressionConfig::default();
    assert!(cfg.enabled);
    assert_eq!(cfg.resolved_level(), CompressionLevel::Medium);
    assert_eq!(cfg.keep_threshold, 3);
    assert_eq!(cfg.placeholder_template, DEFAULT_PLACEHOLDER);
}

#[test]
fn test_config_from_json_option_names() {
    let json = r#"{
        "enable_compression": true,
        "compression_level": "aggressive",
        "compression_keep_threshold": 5,
        "compression_keep_tags": ["KEEP-ME"],
        "compression_placeholder": "<{lines} hidden>"
    }"#;
    let cfg = CompressionConfig::from_json(json).unwrap();
    assert_eq!(cfg.resolved_level(), CompressionLevel::Aggressive);
    assert_eq!(cfg.keep_threshold, 5);
    assert_eq!(cfg.normalized_keep_tags(), vec!["keep-me".to_string()]);
    assert_eq!(cfg.placeholder_template, "<{lines} hidden>");
}

#[test]
fn test_config_from_json_partial_uses_defaults() {
    let cfg = CompressionConfig::from_json(r#"{"compression_level": "high"}"#).unwrap();
    assert!(cfg.enabled);
    assert_eq!(cfg.keep_threshold, 3);
    assert_eq!(cfg.mode(), ScoringMode::Essential);
}

#[test]
fn test_config_from_json_malformed() {
    let err = CompressionConfig::from_json("{not json").unwrap_err();
    assert!(matches!(err, CompactError::Config(_)));
}

#[test]
fn test_config_negative_threshold_rejected() {
    let err = CompressionConfig::from_json(r#"{"compression_keep_threshold": -2}"#).unwrap_err();
    assert!(matches!(err, CompactError::Config(_)));
}

#[test]
fn test_config_unknown_level_falls_back() {
    let cfg = CompressionConfig { level: "ultra".into(), ..Default::default() };
    assert_eq!(cfg.resolved_level(), CompressionLevel::Medium);
    assert_eq!(cfg.mode(), ScoringMode::Contextual);
}

#[test]
fn test_config_zero_threshold_clamped() {
    let cfg = CompressionConfig::default().with_keep_threshold(0);
    assert_eq!(cfg.effective_keep_threshold(), 1);
}

#[test]
fn test_config_empty_tags_dropped() {
    let cfg = CompressionConfig::default().with_keep_tags(["", "  ", "Todo"]);
    assert_eq!(cfg.normalized_keep_tags(), vec!["todo".to_string()]);
}

// ========== Level / Mode ==========

#[test]
fn test_level_parse_case_insensitive() {
    assert_eq!("HIGH".parse::<CompressionLevel>().unwrap(), CompressionLevel::High);
    assert_eq!(" low ".parse::<CompressionLevel>().unwrap(), CompressionLevel::Low);
    assert!(matches!(
        "extreme".parse::<CompressionLevel>(),
        Err(CompactError::UnknownLevel(_))
    ));
}

#[test]
fn test_level_mode_mapping() {
    assert_eq!(CompressionLevel::Aggressive.mode(), ScoringMode::Essential);
    assert_eq!(CompressionLevel::High.mode(), ScoringMode::Essential);
    assert_eq!(CompressionLevel::Medium.mode(), ScoringMode::Contextual);
    assert_eq!(CompressionLevel::Low.mode(), ScoringMode::Contextual);
}

#[test]
fn test_mode_parameters() {
    assert_eq!(ScoringMode::Essential.threshold(), 0.7);
    assert_eq!(ScoringMode::Essential.context_lines(), 1);
    assert_eq!(ScoringMode::Contextual.threshold(), 0.4);
    assert_eq!(ScoringMode::Contextual.context_lines(), 2);
}

// ========== Types ==========

#[test]
fn test_severity_serde_accepts_both_cases() {
    let s: Severity = serde_json::from_str("\"critical\"").unwrap();
    assert_eq!(s, Severity::Critical);
    let s: Severity = serde_json::from_str("\"HIGH\"").unwrap();
    assert_eq!(s, Severity::High);
    assert_eq!(serde_json::to_string(&Severity::Low).unwrap(), "\"LOW\"");
}

#[test]
fn test_severity_is_severe() {
    assert!(Severity::High.is_severe());
    assert!(Severity::Critical.is_severe());
    assert!(!Severity::Medium.is_severe());
    assert!(!Severity::Low.is_severe());
}

#[test]
fn test_source_file_lines_trailing_newline() {
    let file = SourceFile::new("a.py", "python", "a\nb\n");
    assert_eq!(file.lines(), vec!["a", "b", ""]);
}

#[test]
fn test_source_file_findings_in_range() {
    let file = SourceFile::new("a.py", "python", "x").with_findings(vec![
        SecurityFinding::new(2, Severity::Low, "one"),
        SecurityFinding::new(5, Severity::High, "two"),
        SecurityFinding::new(9, Severity::Medium, "three"),
    ]);
    assert_eq!(file.findings_in(2, 5).count(), 2);
    assert_eq!(file.findings_in(6, 8).count(), 0);
}

#[test]
fn test_source_file_deserialize_without_metadata() {
    let file: SourceFile =
        serde_json::from_str(r#"{"path":"x.rs","language":"rust","content":"fn main() {}"}"#).unwrap();
    assert!(file.declarations.is_empty());
    assert!(file.findings.is_empty());
}

#[test]
fn test_source_file_from_json() {
    let json = r#"{"path": "a.py", "language": "python", "content": "x = 1",
        "findings": [{"line_number": 1, "severity": "high", "description": "d"}]}"#;
    let file = SourceFile::from_json(json).unwrap();
    assert_eq!(file.findings[0].severity, Severity::High);
    assert!(file.declarations.is_empty());
}

#[test]
fn test_source_file_from_json_malformed() {
    let err = SourceFile::from_json("{\"path\": 3}").unwrap_err();
    assert!(matches!(err, CompactError::Serialization(_)));
}

// ========== Segment ==========

#[test]
fn test_segment_serializes_type_field() {
    let seg = Segment::omitted("[...]", 3, 7).with_meta("line_count", 5);
    let json = serde_json::to_value(&seg).unwrap();
    assert_eq!(json["type"], "OMITTED");
    assert_eq!(json["start_line"], 3);
    assert_eq!(json["metadata"]["line_count"], 5);
}

#[test]
fn test_segment_kind_names_match_wire() {
    for kind in [SegmentKind::Code, SegmentKind::Omitted, SegmentKind::Metadata] {
        assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
    }
}

#[test]
fn test_segment_line_count() {
    assert_eq!(Segment::code("x", 4, 4).line_count(), 1);
    assert_eq!(Segment::code("x", 1, 10).line_count(), 10);
}

#[test]
fn test_segment_source_text_prefers_original() {
    let seg = Segment::omitted("[placeholder]", 1, 2).with_meta("original_content", "a\nb");
    assert_eq!(seg.source_text(), "a\nb");
    let code = Segment::code("c", 3, 3).with_meta("original_content", "ignored");
    assert_eq!(code.source_text(), "c");
}

#[test]
fn test_validate_coverage_ok() {
    let segs = vec![
        Segment::code("a", 1, 2),
        Segment::omitted("b", 3, 5),
        Segment::code("c", 6, 6),
    ];
    assert!(validate_coverage(&segs, 6).is_ok());
    assert!(validate_coverage(&[], 0).is_ok());
}

#[test]
fn test_validate_coverage_gap() {
    let segs = vec![Segment::code("a", 1, 2), Segment::code("c", 4, 4)];
    let err = validate_coverage(&segs, 4).unwrap_err();
    assert!(err.to_string().contains("gap"));
}

#[test]
fn test_validate_coverage_overlap() {
    let segs = vec![Segment::code("a", 1, 3), Segment::code("c", 3, 4)];
    let err = validate_coverage(&segs, 4).unwrap_err();
    assert!(err.to_string().contains("overlap"));
}

#[test]
fn test_validate_coverage_short() {
    let segs = vec![Segment::code("a", 1, 3)];
    assert!(validate_coverage(&segs, 5).is_err());
    assert!(validate_coverage(&[], 2).is_err());
}
