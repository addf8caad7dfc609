//! Apache/Nginx 액세스 로그 파서
//!
//! Common Log Format과 Combined Log Format을 파싱합니다.
//!
//! # 형식
//! ```text
//! CLF:      IP - - [timestamp] "request" status size
//! Combined: IP - - [timestamp] "request" status size "referer" "user-agent"
//! ```

use std::sync::LazyLock;

use regex::Regex;

use logwarden_core::pipeline::LineParser;
use logwarden_core::types::LogEntry;

use crate::util::{clean_line, normalize_timestamp};

/// Apache 타임스탬프 형식 (예: 10/Oct/2023:13:55:36 +0000)
const APACHE_TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Common Log Format 패턴
static CLF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\S+)\s+\S+\s+\S+\s+\[([^\]]+)\]\s+"([^"]+)"\s+(\d+)\s+(\d+|-)"#)
        .expect("hardcoded CLF pattern is valid")
});

/// Combined Log Format 패턴 (referer, user-agent 포함)
static COMBINED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(\S+)\s+\S+\s+\S+\s+\[([^\]]+)\]\s+"([^"]+)"\s+(\d+)\s+(\d+|-)\s+"([^"]*)"\s+"([^"]*)""#,
    )
    .expect("hardcoded combined pattern is valid")
});

/// Apache/Nginx 액세스 로그 파서
///
/// Combined 형식을 먼저 시도하고 (더 많은 필드), 실패하면 CLF로 폴백합니다.
#[derive(Debug, Default)]
pub struct ApacheLogParser;

impl LineParser for ApacheLogParser {
    fn log_type(&self) -> &str {
        "apache_access"
    }

    fn can_parse(&self, line: &str) -> bool {
        CLF_PATTERN.is_match(line) || COMBINED_PATTERN.is_match(line)
    }

    fn parse(&self, line: &str, line_number: u64) -> Option<LogEntry> {
        let line = clean_line(line);

        let mut fields: Vec<(String, String)> = Vec::new();

        let (ip, timestamp_str, request, status, size) =
            if let Some(caps) = COMBINED_PATTERN.captures(&line) {
                fields.push(("referer".to_owned(), caps[6].to_owned()));
                fields.push(("user_agent".to_owned(), caps[7].to_owned()));
                (
                    caps[1].to_owned(),
                    caps[2].to_owned(),
                    caps[3].to_owned(),
                    caps[4].to_owned(),
                    caps[5].to_owned(),
                )
            } else {
                let caps = CLF_PATTERN.captures(&line)?;
                (
                    caps[1].to_owned(),
                    caps[2].to_owned(),
                    caps[3].to_owned(),
                    caps[4].to_owned(),
                    caps[5].to_owned(),
                )
            };

        fields.insert(0, ("request".to_owned(), request.clone()));
        fields.insert(1, ("status_code".to_owned(), status));
        let response_size = if size == "-" { "0".to_owned() } else { size };
        fields.insert(2, ("response_size".to_owned(), response_size));

        // 요청 라인을 method/url/protocol로 분해
        let request_parts: Vec<&str> = request.split(' ').collect();
        if request_parts.len() >= 2 {
            fields.push(("method".to_owned(), request_parts[0].to_owned()));
            fields.push(("url".to_owned(), request_parts[1].to_owned()));
            if request_parts.len() >= 3 {
                fields.push(("protocol".to_owned(), request_parts[2].to_owned()));
            }
        }

        let timestamp = normalize_timestamp(&timestamp_str, Some(APACHE_TIMESTAMP_FORMAT));

        Some(LogEntry {
            raw_line: line,
            timestamp,
            source_ip: Some(ip),
            message: request,
            fields,
            log_type: self.log_type().to_owned(),
            line_number,
        })
    }
}
