//! 내장 탐지 규칙 카탈로그
//!
//! 기업 환경 로그에서 흔히 보이는 공격 패턴을 커버하는 기본 규칙 세트입니다.
//! 카테고리: authentication, privilege_escalation, web_attack, network_attack,
//! file_access, malware, data_exfiltration, web_error.
//!
//! 반복 기반 휴리스틱(`multiple_failed_logins`, `credential_stuffing`)은
//! 단일 라인 정규식 근사입니다. 실제 반복은 여러 로그 라인에 걸쳐 일어나므로
//! 단일 라인 매칭으로는 관측할 수 없다는 한계를 그대로 갖습니다.

use logwarden_core::types::Severity;

use super::types::DetectionRule;

/// 규칙 하나를 생성하는 내부 헬퍼
fn rule(
    name: &str,
    description: &str,
    severity: Severity,
    pattern: &str,
    category: &str,
    tags: &[&str],
) -> DetectionRule {
    DetectionRule {
        name: name.to_owned(),
        description: description.to_owned(),
        severity,
        pattern: pattern.to_owned(),
        category: category.to_owned(),
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
    }
}

/// 내장 규칙 카탈로그를 생성합니다.
///
/// 반환 순서는 고정이며, 탐지 결과의 규칙 순서를 결정합니다.
pub fn builtin_rules() -> Vec<DetectionRule> {
    vec![
        // 인증 공격
        rule(
            "failed_login_attempt",
            "Failed login attempt detected",
            Severity::Medium,
            r"(failed login|authentication failed|invalid credentials|login failed|auth.*fail)",
            "authentication",
            &["bruteforce", "authentication"],
        ),
        rule(
            "multiple_failed_logins",
            "Multiple failed login attempts from same source",
            Severity::High,
            r"(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}).*failed.*login.*(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}.*failed.*login.*){2,}",
            "authentication",
            &["bruteforce", "authentication", "repeated"],
        ),
        rule(
            "privileged_escalation",
            "Potential privilege escalation attempt",
            Severity::High,
            r"(sudo|su |runas|privilege.*escalat|become.*root)",
            "privilege_escalation",
            &["privilege_escalation", "admin"],
        ),
        // 웹 공격
        rule(
            "sql_injection",
            "SQL injection attempt detected",
            Severity::High,
            r"('.*(union|select|insert|delete|drop|alter|exec|script).*'|'.*or.*1.*=.*1|'.*and.*1.*=.*1|(union|select|insert|delete|drop|alter).*from)",
            "web_attack",
            &["sqli", "injection", "web"],
        ),
        rule(
            "xss_attempt",
            "Cross-Site Scripting (XSS) attempt",
            Severity::High,
            r"(<script|javascript:|onload=|onerror=|<iframe|eval\(|document\.cookie)",
            "web_attack",
            &["xss", "injection", "web"],
        ),
        rule(
            "lfi_rfi_attempt",
            "Local/Remote File Inclusion attempt",
            Severity::High,
            r"(\.\./|\.\.\\|/etc/passwd|/etc/shadow|/windows/system32|\\windows\\system32|php://|file://|http://.*\?.*=http)",
            "web_attack",
            &["lfi", "rfi", "file_inclusion"],
        ),
        rule(
            "command_injection",
            "Command injection attempt",
            Severity::Critical,
            r"(;|\||&|`|\$\(|%0a|%0d|%3b|%7c)(cat |ls |id |whoami |nc |netcat |wget |curl |python |perl |bash |sh )",
            "web_attack",
            &["command_injection", "rce"],
        ),
        // 네트워크 공격
        rule(
            "port_scan",
            "Port scanning activity detected",
            Severity::Medium,
            r"(nmap|masscan|zmap|port.*scan|connection.*refused.*(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}).*){3,}",
            "network_attack",
            &["port_scan", "reconnaissance"],
        ),
        rule(
            "suspicious_user_agent",
            "Suspicious user agent detected",
            Severity::Medium,
            r"user.agent.*(sqlmap|nikto|nmap|burp|dirb|gobuster|wfuzz|hydra|medusa)",
            "network_attack",
            &["suspicious_ua", "scanning"],
        ),
        // 민감 파일 접근
        rule(
            "suspicious_file_access",
            "Access to suspicious files",
            Severity::High,
            r"(/etc/passwd|/etc/shadow|/windows/system32/sam|\.ssh/id_rsa|\.aws/credentials)",
            "file_access",
            &["sensitive_files", "credential_access"],
        ),
        // 멀웨어 및 의심 활동
        rule(
            "crypto_mining",
            "Cryptocurrency mining activity",
            Severity::Medium,
            r"(stratum\+tcp|pool\..*\.com|xmrig|ccminer|cryptonight|monero|bitcoin|ethereum)",
            "malware",
            &["cryptomining", "malware"],
        ),
        rule(
            "reverse_shell",
            "Reverse shell attempt",
            Severity::Critical,
            r"(nc.*-e|/bin/sh|/bin/bash.*-i|python.*socket.*exec|perl.*socket)",
            "malware",
            &["reverse_shell", "backdoor"],
        ),
        // 데이터 유출
        rule(
            "data_exfiltration",
            "Potential data exfiltration",
            Severity::High,
            r"(wget|curl|scp|rsync|ftp).*-O.*\.(sql|db|backup|dump|csv|xlsx?)",
            "data_exfiltration",
            &["exfiltration", "data_theft"],
        ),
        rule(
            "large_data_transfer",
            "Large data transfer detected",
            Severity::Medium,
            // content-length 10MB 이상
            r"(POST|PUT).*content-length:\s*([1-9]\d{7,})",
            "data_exfiltration",
            &["large_transfer", "exfiltration"],
        ),
        // 공격 징후일 수 있는 에러 상태
        rule(
            "http_error_spike",
            "HTTP error response (potential attack)",
            Severity::Low,
            r"HTTP/1\.[01].*[45]\d{2}",
            "web_error",
            &["http_error", "web"],
        ),
        rule(
            "directory_traversal",
            "Directory traversal attempt",
            Severity::High,
            r"(\.\./|\.\.\\|%2e%2e%2f|%2e%2e%5c|\\\.\.\\)",
            "web_attack",
            &["directory_traversal", "path_traversal"],
        ),
        // DNS 공격
        rule(
            "dns_tunneling",
            "Potential DNS tunneling",
            Severity::High,
            r"[a-f0-9]{20,}\..*\.(com|net|org)",
            "network_attack",
            &["dns_tunneling", "exfiltration"],
        ),
        // 크리덴셜 스터핑
        rule(
            "credential_stuffing",
            "Credential stuffing attack",
            Severity::High,
            r"(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}).*POST.*/login.*(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}.*POST.*/login.*){5,}",
            "authentication",
            &["credential_stuffing", "bruteforce"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_expected_size() {
        assert_eq!(builtin_rules().len(), 18);
    }

    #[test]
    fn rule_names_are_unique() {
        let rules = builtin_rules();
        let names: HashSet<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn all_rules_pass_validation() {
        for rule in builtin_rules() {
            rule.validate().unwrap();
        }
    }

    #[test]
    fn all_patterns_compile_case_insensitive() {
        for rule in builtin_rules() {
            RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build()
                .unwrap_or_else(|e| panic!("rule '{}' failed to compile: {e}", rule.name));
        }
    }

    #[test]
    fn expected_categories_present() {
        let rules = builtin_rules();
        let categories: HashSet<&str> = rules.iter().map(|r| r.category.as_str()).collect();
        for expected in [
            "authentication",
            "privilege_escalation",
            "web_attack",
            "network_attack",
            "file_access",
            "malware",
            "data_exfiltration",
            "web_error",
        ] {
            assert!(categories.contains(expected), "missing category {expected}");
        }
    }

    #[test]
    fn sql_injection_matches_classic_payload() {
        let rules = builtin_rules();
        let sqli = rules.iter().find(|r| r.name == "sql_injection").unwrap();
        let re = RegexBuilder::new(&sqli.pattern)
            .case_insensitive(true)
            .build()
            .unwrap();
        assert!(re.is_match("POST /login HTTP/1.1' OR 1=1--"));
        assert!(re.is_match("union select password from users"));
        assert!(!re.is_match("GET /index.html HTTP/1.1"));
    }

    #[test]
    fn directory_traversal_matches_dotdot() {
        let rules = builtin_rules();
        let rule = rules.iter().find(|r| r.name == "directory_traversal").unwrap();
        let re = RegexBuilder::new(&rule.pattern)
            .case_insensitive(true)
            .build()
            .unwrap();
        assert!(re.is_match("GET /admin/config.php?file=../../../etc/passwd"));
        assert!(re.is_match("%2e%2e%2fetc%2fpasswd"));
        assert!(!re.is_match("GET /normal/path HTTP/1.1"));
    }

    #[test]
    fn http_error_rule_ignores_success_status() {
        let rules = builtin_rules();
        let rule = rules.iter().find(|r| r.name == "http_error_spike").unwrap();
        let re = RegexBuilder::new(&rule.pattern)
            .case_insensitive(true)
            .build()
            .unwrap();
        assert!(re.is_match(r#""GET /missing HTTP/1.1" 404 234"#));
        assert!(!re.is_match(r#""GET /index.html HTTP/1.1" 200 2326"#));
    }

    #[test]
    fn command_injection_requires_separator_and_command() {
        let rules = builtin_rules();
        let rule = rules.iter().find(|r| r.name == "command_injection").unwrap();
        let re = RegexBuilder::new(&rule.pattern)
            .case_insensitive(true)
            .build()
            .unwrap();
        assert!(re.is_match("q=1;cat /etc/passwd"));
        assert!(re.is_match("x=`whoami `"));
        assert!(!re.is_match("concatenate files"));
    }
}
