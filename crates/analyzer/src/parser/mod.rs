//! 로그 파싱 모듈 -- 형식별 파서와 고정 우선순위 체인
//!
//! [`ParserChain`]은 형식별 파서를 고정된 우선순위로 평가합니다.
//! 각 파서는 core의 [`LineParser`](logwarden_core::pipeline::LineParser)
//! trait을 구현합니다.
//!
//! # 파서 우선순위 (변경 불가)
//! 1. Apache/Nginx CLF/Combined ([`ApacheLogParser`])
//! 2. Syslog RFC 3164 ([`SyslogParser`])
//! 3. Windows 이벤트 로그 ([`WindowsEventParser`])
//! 4. 방화벽/iptables ([`FirewallLogParser`])
//! 5. JSON 객체 ([`JsonLogParser`])
//! 6. 범용 폴백 ([`GenericLogParser`]) -- 항상 마지막
//!
//! # 커밋 규칙
//! `can_parse`가 true를 반환한 첫 번째 파서에 커밋합니다.
//! 그 파서의 `parse`가 실패하면 라인은 버려지며 뒤쪽 파서로 넘어가지 않습니다.
//!
//! # 사용 예시
//! ```ignore
//! use logwarden_analyzer::parser::ParserChain;
//!
//! let chain = ParserChain::with_defaults();
//! let entry = chain.parse_line(r#"192.168.1.1 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 5"#, 1);
//! ```

pub mod apache;
pub mod firewall;
pub mod generic;
pub mod json;
pub mod syslog;
pub mod windows;

pub use apache::ApacheLogParser;
pub use firewall::FirewallLogParser;
pub use generic::GenericLogParser;
pub use json::JsonLogParser;
pub use syslog::SyslogParser;
pub use windows::WindowsEventParser;

use std::collections::BTreeMap;

use logwarden_core::pipeline::LineParser;
use logwarden_core::types::LogEntry;

/// 파서 체인 -- 고정 우선순위의 형식별 파서 목록
///
/// 커스텀 파서는 폴백 바로 앞에 삽입되어 폴백의 종단 위치가 유지됩니다.
pub struct ParserChain {
    /// 등록된 파서 목록 (우선순위 순, 마지막은 항상 폴백)
    parsers: Vec<Box<dyn LineParser>>,
}

impl ParserChain {
    /// 기본 파서 세트로 체인을 생성합니다.
    pub fn with_defaults() -> Self {
        Self {
            parsers: vec![
                Box::new(ApacheLogParser),
                Box::new(SyslogParser),
                Box::new(WindowsEventParser),
                Box::new(FirewallLogParser),
                Box::new(JsonLogParser),
                Box::new(GenericLogParser), // 폴백은 반드시 마지막
            ],
        }
    }

    /// 커스텀 파서를 등록합니다.
    ///
    /// 폴백 파서 바로 앞에 삽입됩니다.
    pub fn register(&mut self, parser: Box<dyn LineParser>) {
        let insert_at = self.parsers.len().saturating_sub(1);
        self.parsers.insert(insert_at, parser);
    }

    /// 등록된 파서 형식 이름 목록을 반환합니다.
    pub fn registered_types(&self) -> Vec<&str> {
        self.parsers.iter().map(|p| p.log_type()).collect()
    }

    /// 라인 하나를 파싱합니다.
    ///
    /// `can_parse`가 true인 첫 번째 파서에 커밋합니다. 해당 파서의
    /// `parse`가 실패하면 `None`을 반환하며 다른 파서로 재시도하지 않습니다.
    pub fn parse_line(&self, line: &str, line_number: u64) -> Option<LogEntry> {
        self.parsers
            .iter()
            .find(|parser| parser.can_parse(line))
            .and_then(|parser| parser.parse(line, line_number))
    }

    /// 여러 라인을 파싱합니다.
    ///
    /// 라인 번호는 `start_line`부터 순서대로 매겨집니다.
    /// 파싱에 실패한 라인은 결과에서 조용히 제외됩니다.
    pub fn parse_lines(&self, lines: &[String], start_line: u64) -> Vec<LogEntry> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| self.parse_line(line, start_line + i as u64))
            .collect()
    }

    /// 파서 형식별 엔트리 수를 집계합니다.
    ///
    /// 형식 분포 리포팅에 사용됩니다.
    pub fn parser_stats(entries: &[LogEntry]) -> BTreeMap<String, u64> {
        let mut stats = BTreeMap::new();
        for entry in entries {
            *stats.entry(entry.log_type.clone()).or_insert(0) += 1;
        }
        stats
    }
}

impl Default for ParserChain {
    fn default() -> Self {
        Self::with_defaults()
    }
}
