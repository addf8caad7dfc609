//! JSON 로그 파서
//!
//! 한 줄짜리 JSON 객체 로그를 파싱합니다. 로그 라이브러리마다 필드 이름이
//! 다르므로 후보 필드 이름 목록을 순서대로 탐색하여 첫 번째 일치를 사용합니다.
//!
//! # 후보 필드
//! - 타임스탬프: `timestamp`, `time`, `@timestamp`, `datetime`, `date`
//! - 출발지 IP: `src_ip`, `source_ip`, `client_ip`, `remote_addr`, `ip`
//! - 메시지: `message`, `msg`, `log`, `event`, `description`

use logwarden_core::pipeline::LineParser;
use logwarden_core::types::LogEntry;

use crate::util::{clean_line, normalize_timestamp};

/// 타임스탬프 후보 필드 (우선순위 순)
const TIMESTAMP_FIELDS: &[&str] = &["timestamp", "time", "@timestamp", "datetime", "date"];

/// 출발지 IP 후보 필드 (우선순위 순)
const IP_FIELDS: &[&str] = &["src_ip", "source_ip", "client_ip", "remote_addr", "ip"];

/// 메시지 후보 필드 (우선순위 순)
const MESSAGE_FIELDS: &[&str] = &["message", "msg", "log", "event", "description"];

/// 메시지 후보가 없을 때 원본 라인에서 사용할 최대 길이
const MESSAGE_FALLBACK_LEN: usize = 200;

/// JSON 로그 파서
///
/// 라인이 `{`로 시작해 `}`로 끝나고 유효한 JSON 객체여야 합니다.
/// 파싱 불가능한 JSON은 엔트리를 만들지 않습니다.
#[derive(Debug, Default)]
pub struct JsonLogParser;

impl JsonLogParser {
    /// JSON 스칼라 값을 문자열로 변환합니다.
    fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// 후보 필드 목록에서 첫 번째로 존재하는 값을 문자열로 추출합니다.
    fn probe(obj: &serde_json::Map<String, serde_json::Value>, candidates: &[&str]) -> Option<String> {
        candidates
            .iter()
            .find_map(|field| obj.get(*field).and_then(Self::scalar_to_string))
    }

    /// JSON 객체를 평탄화하여 dot notation 필드 목록으로 변환합니다.
    fn flatten_object(value: &serde_json::Value, prefix: &str) -> Vec<(String, String)> {
        let mut fields = Vec::new();

        if let Some(obj) = value.as_object() {
            for (key, val) in obj {
                let field_name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };

                match val {
                    serde_json::Value::Object(_) => {
                        fields.extend(Self::flatten_object(val, &field_name));
                    }
                    serde_json::Value::Array(arr) => {
                        // 배열은 JSON 문자열로 직렬화
                        if let Ok(s) = serde_json::to_string(arr) {
                            fields.push((field_name, s));
                        }
                    }
                    serde_json::Value::Null => {
                        // null 값은 스킵
                    }
                    other => {
                        if let Some(s) = Self::scalar_to_string(other) {
                            fields.push((field_name, s));
                        }
                    }
                }
            }
        }

        fields
    }
}

impl LineParser for JsonLogParser {
    fn log_type(&self) -> &str {
        "json"
    }

    fn can_parse(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.starts_with('{') && trimmed.ends_with('}')
    }

    fn parse(&self, line: &str, line_number: u64) -> Option<LogEntry> {
        let line = clean_line(line);

        let value: serde_json::Value = serde_json::from_str(&line).ok()?;
        let obj = value.as_object()?;

        let timestamp = Self::probe(obj, TIMESTAMP_FIELDS)
            .and_then(|ts| normalize_timestamp(&ts, None));

        let source_ip = Self::probe(obj, IP_FIELDS);

        let message = Self::probe(obj, MESSAGE_FIELDS).unwrap_or_else(|| {
            // 메시지 후보가 없으면 원본 라인을 절단하여 사용
            line.chars().take(MESSAGE_FALLBACK_LEN).collect()
        });

        let fields = Self::flatten_object(&value, "");

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
