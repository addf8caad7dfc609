//! 공용 유틸리티 -- 타임스탬프 정규화, IP 추출, 라인 정리
//!
//! 파서 체인과 IP 분석기가 공유하는 텍스트 처리 헬퍼입니다.
//! 모든 타임스탬프는 timezone-naive로 정규화되어 비교 일관성을 보장합니다.

use std::net::IpAddr;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use regex::Regex;

/// IPv4 형태의 부분 문자열 패턴
static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").expect("hardcoded IPv4 pattern is valid")
});

/// 다양한 로그 형식에서 발견되는 타임스탬프 형식 목록
///
/// 순서대로 시도하며 첫 번째 성공을 사용합니다.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",       // 표준: 2025-01-01 12:00:00
    "%Y-%m-%d %H:%M:%S.%f",    // 소수점 초 포함
    "%Y-%m-%dT%H:%M:%S",       // ISO 8601
    "%Y-%m-%dT%H:%M:%S.%f",    // ISO 8601 소수점 초
    "%Y-%m-%dT%H:%M:%SZ",      // ISO 8601 UTC
    "%Y-%m-%dT%H:%M:%S.%fZ",   // ISO 8601 UTC 소수점 초
    "%d/%b/%Y:%H:%M:%S %z",    // Apache: 01/Jan/2025:12:00:00 +0000
    "%b %d %H:%M:%S",          // Syslog: Jan 1 12:00:00
    "%Y%m%d %H:%M:%S",         // 압축형: 20250101 12:00:00
];

/// 타임스탬프 문자열을 naive datetime으로 정규화합니다.
///
/// 형식 힌트가 주어지면 먼저 시도합니다. 어떤 형식도 맞지 않으면 `None`.
/// 타임존 오프셋이 있는 형식은 오프셋을 제거한 시각(벽시계 시각)을 반환하여
/// 전체 분석에서 naive 시각끼리 비교되도록 합니다.
pub fn normalize_timestamp(raw: &str, format_hint: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(hint) = format_hint {
        if let Some(ts) = try_parse_format(raw, hint) {
            return Some(ts);
        }
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| try_parse_format(raw, fmt))
}

/// 단일 형식으로 타임스탬프 파싱을 시도합니다.
fn try_parse_format(raw: &str, fmt: &str) -> Option<NaiveDateTime> {
    if fmt.contains("%z") {
        // 오프셋 포함 형식: 파싱 후 오프셋을 버리고 벽시계 시각만 유지
        return DateTime::parse_from_str(raw, fmt)
            .ok()
            .map(|dt| dt.naive_local());
    }

    if fmt == "%b %d %H:%M:%S" {
        // 연도가 없는 syslog 시각은 현재 연도를 가정
        let squashed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let with_year = format!("{} {}", Utc::now().year(), squashed);
        return NaiveDateTime::parse_from_str(&with_year, "%Y %b %d %H:%M:%S").ok();
    }

    NaiveDateTime::parse_from_str(raw, fmt).ok()
}

/// 로그 라인에서 NUL/CR과 앞뒤 공백을 제거합니다.
pub fn clean_line(line: &str) -> String {
    line.trim().replace(['\0', '\r'], "")
}

/// 텍스트에서 IPv4 형태의 부분 문자열을 순서대로 추출합니다.
pub fn extract_ips(text: &str) -> Vec<String> {
    IPV4_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// 문자열이 유효한 IP 주소인지 확인합니다 (IPv4/IPv6).
pub fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// IP가 사설 대역인지 확인합니다.
///
/// IPv4: RFC1918 (10/8, 172.16/12, 192.168/16) + loopback.
/// IPv6: loopback.
pub fn is_private_ip(ip: &str) -> bool {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_private() || v4.is_loopback(),
        Ok(IpAddr::V6(v6)) => v6.is_loopback(),
        Err(_) => false,
    }
}

/// 문자열의 Shannon 엔트로피를 계산합니다.
///
/// 인코딩/난독화된 페이로드는 일반 텍스트보다 높은 값을 보입니다.
/// 반환값은 `-Σ p·log2(p)` (바이트 빈도 기준), 빈 입력은 0.0입니다.
pub fn shannon_entropy(data: &str) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts = [0u64; 256];
    for byte in data.bytes() {
        counts[byte as usize] += 1;
    }

    let len = data.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn normalize_standard_format() {
        let ts = normalize_timestamp("2025-01-01 12:00:00", None).unwrap();
        assert_eq!(
            ts.date(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(ts.hour(), 12);
    }

    #[test]
    fn normalize_iso8601_variants() {
        assert!(normalize_timestamp("2025-01-01T12:00:00", None).is_some());
        assert!(normalize_timestamp("2025-01-01T12:00:00Z", None).is_some());
        assert!(normalize_timestamp("2025-01-01T12:00:00.123456Z", None).is_some());
    }

    #[test]
    fn normalize_apache_format_strips_offset() {
        let ts =
            normalize_timestamp("10/Oct/2023:13:55:36 +0900", Some("%d/%b/%Y:%H:%M:%S %z"))
                .unwrap();
        // 오프셋 변환 없이 벽시계 시각 유지
        assert_eq!(ts.hour(), 13);
        assert_eq!(ts.minute(), 55);
    }

    #[test]
    fn normalize_syslog_format_assumes_current_year() {
        let ts = normalize_timestamp("Jan 15 12:00:00", None).unwrap();
        assert_eq!(ts.date().month(), 1);
        assert_eq!(ts.date().day(), 15);
        assert_eq!(ts.date().year(), Utc::now().year());
    }

    #[test]
    fn normalize_syslog_format_single_digit_day() {
        // syslog는 한 자리 날짜를 공백 두 개로 패딩함
        let ts = normalize_timestamp("Jan  1 03:04:05", None).unwrap();
        assert_eq!(ts.date().day(), 1);
    }

    #[test]
    fn normalize_compact_format() {
        let ts = normalize_timestamp("20250101 12:00:00", None).unwrap();
        assert_eq!(ts.date().year(), 2025);
    }

    #[test]
    fn normalize_unknown_format_returns_none() {
        assert_eq!(normalize_timestamp("not a timestamp", None), None);
        assert_eq!(normalize_timestamp("", None), None);
    }

    #[test]
    fn normalize_hint_tried_first() {
        let ts = normalize_timestamp("01/Jan/2025:00:00:01 +0000", Some("%d/%b/%Y:%H:%M:%S %z"));
        assert!(ts.is_some());
    }

    #[test]
    fn clean_line_removes_nul_and_cr() {
        assert_eq!(clean_line("  log entry with\0null\r  "), "log entry withnull");
        assert_eq!(clean_line("plain"), "plain");
        assert_eq!(clean_line("   "), "");
    }

    #[test]
    fn extract_ips_finds_all_in_order() {
        let ips = extract_ips("Connection from 192.168.1.1 to 10.0.0.1");
        assert_eq!(ips, vec!["192.168.1.1", "10.0.0.1"]);
    }

    #[test]
    fn extract_ips_empty_text() {
        assert!(extract_ips("no addresses here").is_empty());
    }

    #[test]
    fn is_valid_ip_accepts_v4_and_v6() {
        assert!(is_valid_ip("192.168.1.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("invalid.ip"));
        assert!(!is_valid_ip("999.999.999.999"));
    }

    #[test]
    fn is_private_ip_rfc1918_ranges() {
        assert!(is_private_ip("10.0.0.1"));
        assert!(is_private_ip("172.16.0.1"));
        assert!(is_private_ip("192.168.1.1"));
        assert!(is_private_ip("127.0.0.1"));
        assert!(!is_private_ip("8.8.8.8"));
        assert!(!is_private_ip("203.0.113.42"));
        assert!(!is_private_ip("not-an-ip"));
    }

    #[test]
    fn entropy_of_uniform_string_is_zero() {
        assert_eq!(shannon_entropy("aaaa"), 0.0);
        assert_eq!(shannon_entropy(""), 0.0);
    }

    #[test]
    fn entropy_increases_with_randomness() {
        let low = shannon_entropy("aaaaaaaa");
        let mid = shannon_entropy("abababab");
        let high = shannon_entropy("a1B#x9Qz");
        assert!(low < mid);
        assert!(mid < high);
    }

    #[test]
    fn entropy_of_two_symbols_is_one_bit() {
        let e = shannon_entropy("abab");
        assert!((e - 1.0).abs() < 1e-9);
    }
}
