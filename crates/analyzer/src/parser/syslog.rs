//! Syslog RFC 3164 파서
//!
//! 클래식 BSD syslog 형식을 파싱합니다. `<PRI>` 태그는 선택이며,
//! 있으면 facility/severity로 분해합니다.
//!
//! # 형식
//! ```text
//! <PRI>MMM DD HH:MM:SS hostname tag: message
//!      MMM DD HH:MM:SS hostname tag: message
//! ```

use std::sync::LazyLock;

use regex::Regex;

use logwarden_core::pipeline::LineParser;
use logwarden_core::types::LogEntry;

use crate::util::{clean_line, extract_ips, normalize_timestamp};

/// Syslog 타임스탬프 형식 (예: Oct 10 13:55:36)
const SYSLOG_TIMESTAMP_FORMAT: &str = "%b %d %H:%M:%S";

/// PRI 태그 포함 RFC 3164 패턴
static PRI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(\d+)>([A-Za-z]{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})\s+(\S+)\s+([^:]+):\s*(.*)")
        .expect("hardcoded syslog PRI pattern is valid")
});

/// PRI 태그 없는 대체 패턴
static PLAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})\s+(\S+)\s+([^:]+):\s*(.*)")
        .expect("hardcoded syslog pattern is valid")
});

/// Syslog RFC 3164 파서
///
/// PRI가 있으면 `facility = pri >> 3`, `severity = pri & 7`로 분해하여
/// 추가 필드에 기록합니다. 출발지 IP는 메시지 본문에서 스캔합니다.
#[derive(Debug, Default)]
pub struct SyslogParser;

impl LineParser for SyslogParser {
    fn log_type(&self) -> &str {
        "syslog"
    }

    fn can_parse(&self, line: &str) -> bool {
        PRI_PATTERN.is_match(line) || PLAIN_PATTERN.is_match(line)
    }

    fn parse(&self, line: &str, line_number: u64) -> Option<LogEntry> {
        let line = clean_line(line);

        let (timestamp_str, message, fields) =
            if let Some(caps) = PRI_PATTERN.captures(&line) {
                let priority: u32 = caps[1].parse().ok()?;
                let fields = vec![
                    ("priority".to_owned(), priority.to_string()),
                    ("hostname".to_owned(), caps[3].to_owned()),
                    ("process".to_owned(), caps[4].to_owned()),
                    ("facility".to_owned(), (priority >> 3).to_string()),
                    ("severity".to_owned(), (priority & 7).to_string()),
                ];
                (caps[2].to_owned(), caps[5].to_owned(), fields)
            } else {
                let caps = PLAIN_PATTERN.captures(&line)?;
                let fields = vec![
                    ("hostname".to_owned(), caps[2].to_owned()),
                    ("process".to_owned(), caps[3].to_owned()),
                ];
                (caps[1].to_owned(), caps[4].to_owned(), fields)
            };

        let timestamp = normalize_timestamp(&timestamp_str, Some(SYSLOG_TIMESTAMP_FORMAT));

        // 출발지 IP는 메시지 본문에서 첫 번째 IPv4를 사용
        let source_ip = extract_ips(&message).into_iter().next();

        Some(LogEntry {
            raw_line: line,
            timestamp,
            source_ip,
            message,
            fields,
            log_type: self.log_type().to_owned(),
            line_number,
        })
    }
}
