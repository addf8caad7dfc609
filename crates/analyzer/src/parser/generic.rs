//! 범용 폴백 파서
//!
//! 어떤 형식에도 맞지 않는 비정형 로그를 처리합니다.
//! 체인의 마지막에 위치해야 하며, 정리 후 비어 있지 않은 모든 라인에 대해
//! 엔트리를 생성합니다.

use std::sync::LazyLock;

use regex::Regex;

use logwarden_core::pipeline::LineParser;
use logwarden_core::types::LogEntry;

use crate::util::{clean_line, extract_ips, normalize_timestamp};

/// 타임스탬프 스캔 범위 (라인 선두 문자 수)
const TIMESTAMP_SCAN_LEN: usize = 50;

/// 라인 선두에서 찾는 타임스탬프 형태들
static TIMESTAMP_SHAPES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}")
            .expect("hardcoded timestamp shape is valid"),
        Regex::new(r"\d{2}/\d{2}/\d{4}\s+\d{2}:\d{2}:\d{2}")
            .expect("hardcoded timestamp shape is valid"),
        Regex::new(r"[A-Za-z]{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2}")
            .expect("hardcoded timestamp shape is valid"),
    ]
});

/// 범용 폴백 파서
///
/// 타임스탬프는 라인 선두 50자 내에서 세 가지 형태를 스캔하고,
/// 출발지 IP는 라인 전체에서 IPv4 형태를 스캔합니다.
#[derive(Debug, Default)]
pub struct GenericLogParser;

impl LineParser for GenericLogParser {
    fn log_type(&self) -> &str {
        "generic"
    }

    fn can_parse(&self, _line: &str) -> bool {
        // 폴백 파서는 모든 라인을 수락
        true
    }

    fn parse(&self, line: &str, line_number: u64) -> Option<LogEntry> {
        let line = clean_line(line);
        if line.is_empty() {
            return None;
        }

        let head: String = line.chars().take(TIMESTAMP_SCAN_LEN).collect();
        let timestamp = TIMESTAMP_SHAPES
            .iter()
            .find_map(|shape| shape.find(&head))
            .and_then(|m| normalize_timestamp(m.as_str(), None));

        let source_ip = extract_ips(&line).into_iter().next();

        Some(LogEntry {
            raw_line: line.clone(),
            timestamp,
            source_ip,
            message: line,
            fields: Vec::new(),
            log_type: self.log_type().to_owned(),
            line_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_type_is_generic() {
        assert_eq!(GenericLogParser.log_type(), "generic");
    }

    #[test]
    fn can_parse_accepts_anything() {
        let parser = GenericLogParser;
        assert!(parser.can_parse("anything at all"));
        assert!(parser.can_parse(""));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert!(GenericLogParser.parse("", 1).is_none());
        assert!(GenericLogParser.parse("   \r", 1).is_none());
    }

    #[test]
    fn parse_plain_text_produces_entry() {
        let entry = GenericLogParser.parse("something happened", 9).unwrap();
        assert_eq!(entry.message, "something happened");
        assert_eq!(entry.log_type, "generic");
        assert_eq!(entry.line_number, 9);
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn parse_finds_iso_timestamp_in_head() {
        let entry = GenericLogParser
            .parse("2023-10-10 13:55:36 something happened", 1)
            .unwrap();
        assert!(entry.timestamp.is_some());
    }

    #[test]
    fn parse_finds_syslog_style_timestamp() {
        let entry = GenericLogParser
            .parse("Oct 10 13:55:36 something happened", 1)
            .unwrap();
        assert!(entry.timestamp.is_some());
    }

    #[test]
    fn parse_ignores_timestamp_beyond_scan_window() {
        let padding = "x".repeat(60);
        let entry = GenericLogParser
            .parse(&format!("{padding} 2023-10-10 13:55:36"), 1)
            .unwrap();
        assert_eq!(entry.timestamp, None);
    }

    #[test]
    fn parse_extracts_first_ip() {
        let entry = GenericLogParser
            .parse("traffic from 203.0.113.42 to 10.0.0.1", 1)
            .unwrap();
        assert_eq!(entry.source_ip.as_deref(), Some("203.0.113.42"));
    }

    #[test]
    fn parse_multibyte_line_does_not_panic() {
        let entry = GenericLogParser.parse("로그 메시지 世界 🌍", 1).unwrap();
        assert!(entry.message.contains("世界"));
    }

    // Property-based tests using proptest
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_arbitrary_text_does_not_panic(line in "\\PC*") {
                let _ = GenericLogParser.parse(&line, 1);
            }

            #[test]
            fn parse_nonempty_ascii_always_produces_entry(line in "[a-zA-Z0-9 ]{1,200}") {
                prop_assume!(!line.trim().is_empty());
                let entry = GenericLogParser.parse(&line, 1);
                prop_assert!(entry.is_some());
            }
        }
    }
}
