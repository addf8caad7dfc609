//! Windows 이벤트 로그 텍스트 파서
//!
//! 이벤트 뷰어 내보내기에서 흔한 탭/공백 구분 텍스트 형식을 파싱합니다.
//!
//! # 형식
//! ```text
//! YYYY-MM-DD HH:MM:SS LEVEL EVENT_ID TASK_CATEGORY MESSAGE
//! ```

use std::sync::LazyLock;

use regex::Regex;

use logwarden_core::pipeline::LineParser;
use logwarden_core::types::LogEntry;

use crate::util::{clean_line, extract_ips, normalize_timestamp};

/// Windows 이벤트 라인 패턴
static EVENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})\s+(\w+)\s+(\d+)\s+(\d+)\s+(.*)")
        .expect("hardcoded windows event pattern is valid")
});

/// Windows 이벤트 로그 파서
#[derive(Debug, Default)]
pub struct WindowsEventParser;

impl LineParser for WindowsEventParser {
    fn log_type(&self) -> &str {
        "windows_event"
    }

    fn can_parse(&self, line: &str) -> bool {
        EVENT_PATTERN.is_match(line)
    }

    fn parse(&self, line: &str, line_number: u64) -> Option<LogEntry> {
        let line = clean_line(line);
        let caps = EVENT_PATTERN.captures(&line)?;

        let timestamp_str = &caps[1];
        let message = caps[5].to_owned();

        // event_id와 task_category는 숫자여야 함 (패턴이 보장)
        let fields = vec![
            ("level".to_owned(), caps[2].to_owned()),
            ("event_id".to_owned(), caps[3].to_owned()),
            ("task_category".to_owned(), caps[4].to_owned()),
        ];

        let timestamp = normalize_timestamp(timestamp_str, None);
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
