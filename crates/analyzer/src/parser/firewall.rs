//! 방화벽 로그 파서 (iptables 계열)
//!
//! `kernel:` 태그와 `SRC=`/`DST=` 필드가 있는 커널 방화벽 로그를 파싱합니다.
//!
//! # 형식
//! ```text
//! MMM DD HH:MM:SS host kernel: IN=eth0 OUT= SRC=... DST=... PROTO=TCP SPT=... DPT=...
//! ```

use std::sync::LazyLock;

use regex::Regex;

use logwarden_core::pipeline::LineParser;
use logwarden_core::types::LogEntry;

use crate::util::{clean_line, normalize_timestamp};

/// iptables 필드 추출 패턴 (라인 내 검색)
static IPTABLES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"kernel:.*IN=(\S*)\s+OUT=(\S*)\s+.*SRC=(\S+)\s+DST=(\S+).*PROTO=(\S+).*SPT=(\d+).*DPT=(\d+)")
        .expect("hardcoded iptables pattern is valid")
});

/// 라인 선두의 syslog 스타일 타임스탬프 패턴
static LEADING_TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z]{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})")
        .expect("hardcoded timestamp pattern is valid")
});

/// 방화벽 로그 파서
///
/// 인터페이스/주소/프로토콜/포트를 하나의 결합 패턴으로 추출하고,
/// 타임스탬프는 선행 syslog 프리픽스에서 독립적으로 스캔합니다.
#[derive(Debug, Default)]
pub struct FirewallLogParser;

impl LineParser for FirewallLogParser {
    fn log_type(&self) -> &str {
        "firewall"
    }

    fn can_parse(&self, line: &str) -> bool {
        line.contains("kernel:") && (line.contains("SRC=") || line.contains("DST="))
    }

    fn parse(&self, line: &str, line_number: u64) -> Option<LogEntry> {
        let line = clean_line(line);
        let caps = IPTABLES_PATTERN.captures(&line)?;

        let src_ip = caps[3].to_owned();

        let fields = vec![
            ("in_interface".to_owned(), caps[1].to_owned()),
            ("out_interface".to_owned(), caps[2].to_owned()),
            ("destination_ip".to_owned(), caps[4].to_owned()),
            ("protocol".to_owned(), caps[5].to_owned()),
            ("source_port".to_owned(), caps[6].to_owned()),
            ("destination_port".to_owned(), caps[7].to_owned()),
        ];

        let timestamp = LEADING_TIMESTAMP_PATTERN
            .find(&line)
            .and_then(|m| normalize_timestamp(m.as_str(), Some("%b %d %H:%M:%S")));

        Some(LogEntry {
            raw_line: line.clone(),
            timestamp,
            source_ip: Some(src_ip),
            message: line,
            fields,
            log_type: self.log_type().to_owned(),
            line_number,
        })
    }
}
