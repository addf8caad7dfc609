//! 결과 내보내기 -- JSON / CSV 직렬화
//!
//! 알 수 없는 형식 식별자는 어떤 I/O도 수행하기 전에 동기적으로
//! 호출자 에러가 됩니다 ([`ExportFormat::from_str`] 시점).
//!
//! - JSON: 전체 [`AnalysisResult`]를 직렬화하며, 타임스탬프는
//!   ISO-8601 문자열이 됩니다.
//! - CSV: 탐지당 한 행 (라인, 시각, 심각도, 규칙, 카테고리, 설명,
//!   100자로 절단한 매칭 텍스트, 소수점 2자리 신뢰도).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use logwarden_core::report::AnalysisResult;

use crate::error::AnalyzerError;

/// CSV 매칭 텍스트 절단 길이
const MATCHED_TEXT_MAX_LEN: usize = 100;

/// 내보내기 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON (결과 전체)
    Json,
    /// CSV (탐지 목록)
    Csv,
}

impl FromStr for ExportFormat {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(AnalyzerError::UnsupportedFormat(other.to_owned())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// 분석 결과를 바이트 스트림으로 내보냅니다.
pub fn export(result: &AnalysisResult, format: ExportFormat) -> Result<Vec<u8>, AnalyzerError> {
    match format {
        ExportFormat::Json => export_json(result),
        ExportFormat::Csv => Ok(export_csv(result)),
    }
}

/// 분석 결과를 파일로 내보냅니다.
pub fn export_to_file(
    result: &AnalysisResult,
    path: impl AsRef<Path>,
    format: ExportFormat,
) -> Result<(), AnalyzerError> {
    let bytes = export(result, format)?;
    std::fs::write(path.as_ref(), bytes).map_err(|e| AnalyzerError::Input {
        path: path.as_ref().display().to_string(),
        reason: e.to_string(),
    })
}

/// JSON으로 직렬화합니다.
fn export_json(result: &AnalysisResult) -> Result<Vec<u8>, AnalyzerError> {
    serde_json::to_vec_pretty(result).map_err(|e| AnalyzerError::Export(e.to_string()))
}

/// 탐지 목록을 CSV로 직렬화합니다.
fn export_csv(result: &AnalysisResult) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(
        "Line Number,Timestamp,Severity,Rule Name,Category,Description,Matched Text,Confidence\n",
    );

    for detection in &result.detections {
        let timestamp = detection
            .timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        let matched: String = detection
            .matched_text
            .chars()
            .take(MATCHED_TEXT_MAX_LEN)
            .collect();

        let row = [
            detection.line_number.to_string(),
            timestamp,
            detection.severity.to_string(),
            detection.rule_name.clone(),
            detection.category.clone(),
            detection.description.clone(),
            matched,
            format!("{:.2}", detection.confidence),
        ];

        let escaped: Vec<String> = row.iter().map(|field| escape_csv_field(field)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }

    out.into_bytes()
}

/// RFC 4180 방식으로 CSV 필드를 이스케이프합니다.
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logwarden_core::report::{AnalysisSummary, IpReport};
    use logwarden_core::types::{Detection, Severity};
    use std::collections::BTreeMap;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            source: "test.log".to_owned(),
            total_lines: 2,
            parsed_lines: 2,
            detections: vec![Detection {
                rule_name: "sql_injection".to_owned(),
                severity: Severity::High,
                description: "SQL injection attempt detected".to_owned(),
                matched_text: "' OR 1=1--".to_owned(),
                line_number: 2,
                timestamp: chrono::NaiveDateTime::parse_from_str(
                    "2023-10-10T13:55:36",
                    "%Y-%m-%dT%H:%M:%S",
                )
                .ok(),
                category: "web_attack".to_owned(),
                tags: vec!["sqli".to_owned()],
                confidence: 0.9,
            }],
            summary: AnalysisSummary::default(),
            analysis_time_secs: 0.01,
            log_types: BTreeMap::new(),
            ip_analysis: IpReport::default(),
            timeline: vec![],
        }
    }

    #[test]
    fn format_from_str_accepts_known() {
        assert_eq!(ExportFormat::from_str("json").unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::from_str("CSV").unwrap(), ExportFormat::Csv);
    }

    #[test]
    fn format_from_str_rejects_unknown() {
        let err = ExportFormat::from_str("xml").unwrap_err();
        assert!(matches!(err, AnalyzerError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn json_export_uses_iso8601_timestamps() {
        let bytes = export(&sample_result(), ExportFormat::Json).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("2023-10-10T13:55:36"));
        assert!(text.contains("sql_injection"));
    }

    #[test]
    fn json_export_roundtrip_preserves_detections() {
        let result = sample_result();
        let bytes = export(&result, ExportFormat::Json).unwrap();
        let back: AnalysisResult = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(back.detections.len(), 1);
        let d = &back.detections[0];
        assert_eq!(d.rule_name, "sql_injection");
        assert_eq!(d.severity, Severity::High);
        assert_eq!(d.category, "web_attack");
        assert_eq!(d.confidence, 0.9);
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let bytes = export(&sample_result(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Line Number,Timestamp,Severity"));
        assert!(lines[1].contains("sql_injection"));
        assert!(lines[1].contains("high"));
        assert!(lines[1].contains("0.90"));
        assert!(lines[1].contains("2023-10-10 13:55:36"));
    }

    #[test]
    fn csv_escapes_fields_with_commas_and_quotes() {
        let mut result = sample_result();
        result.detections[0].matched_text = "a,b \"quoted\"".to_owned();
        let bytes = export(&result, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"a,b \"\"quoted\"\"\""));
    }

    #[test]
    fn csv_truncates_matched_text() {
        let mut result = sample_result();
        result.detections[0].matched_text = "x".repeat(300);
        let bytes = export(&result, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains(&"x".repeat(100)));
        assert!(!row.contains(&"x".repeat(101)));
    }

    #[test]
    fn csv_missing_timestamp_is_empty_field() {
        let mut result = sample_result();
        result.detections[0].timestamp = None;
        let bytes = export(&result, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("2,,high,"));
    }

    #[test]
    fn export_to_file_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        export_to_file(&sample_result(), &path, ExportFormat::Json).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("sql_injection"));
    }
}
