//! 탐지 규칙 데이터 타입
//!
//! 규칙은 데이터입니다. 내장 카탈로그, YAML 규칙 파일, 호출자가 건네는
//! 레코드 모두 같은 [`DetectionRule`] 구조를 사용합니다.

use logwarden_core::types::Severity;
use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;

/// 탐지 규칙
///
/// # YAML 스키마
/// ```yaml
/// name: ssh_brute_force
/// description: Detects SSH brute force attempts
/// severity: high
/// pattern: "failed password.*ssh"
/// category: authentication
/// tags:
///   - bruteforce
///   - ssh
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRule {
    /// 규칙 고유 이름 (카탈로그 내에서 유일해야 함)
    pub name: String,
    /// 규칙 설명 (탐지 결과에 표시)
    #[serde(default)]
    pub description: String,
    /// 심각도
    pub severity: Severity,
    /// 대소문자 무시 정규식 패턴
    pub pattern: String,
    /// 위협 카테고리 (web_attack, authentication 등)
    pub category: String,
    /// 분류 태그
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DetectionRule {
    /// 규칙의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.name.is_empty() {
            return Err(AnalyzerError::RuleValidation {
                rule_name: "(empty)".to_owned(),
                reason: "rule name must not be empty".to_owned(),
            });
        }

        if self.name.len() > 256 {
            return Err(AnalyzerError::RuleValidation {
                rule_name: self.name.clone(),
                reason: "rule name must not exceed 256 characters".to_owned(),
            });
        }

        if self.pattern.is_empty() {
            return Err(AnalyzerError::RuleValidation {
                rule_name: self.name.clone(),
                reason: "rule pattern must not be empty".to_owned(),
            });
        }

        if self.category.is_empty() {
            return Err(AnalyzerError::RuleValidation {
                rule_name: self.name.clone(),
                reason: "rule category must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

/// 규칙 카탈로그
///
/// 엔진 객체마다 소유되는 가변 규칙 모음입니다. 프로세스 전역 공유 상태가
/// 없으므로 서로 다른 카탈로그를 가진 엔진이 여럿 공존할 수 있습니다.
///
/// 순회 순서는 추가 순서와 같아 탐지 결과가 결정적입니다.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// 규칙 목록 (추가 순서 유지)
    rules: Vec<DetectionRule>,
}

impl RuleSet {
    /// 빈 카탈로그를 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 내장 규칙 카탈로그로 생성합니다.
    pub fn with_builtin() -> Self {
        Self {
            rules: super::catalog::builtin_rules(),
        }
    }

    /// 규칙을 추가합니다.
    ///
    /// 같은 이름의 규칙이 이미 있으면 거부합니다.
    pub fn add(&mut self, rule: DetectionRule) -> Result<(), AnalyzerError> {
        rule.validate()?;
        if self.by_name(&rule.name).is_some() {
            return Err(AnalyzerError::RuleValidation {
                rule_name: rule.name.clone(),
                reason: "duplicate rule name".to_owned(),
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// 이름으로 규칙을 제거합니다.
    pub fn remove(&mut self, name: &str) -> Option<DetectionRule> {
        let idx = self.rules.iter().position(|r| r.name == name)?;
        Some(self.rules.remove(idx))
    }

    /// 이름으로 규칙을 찾습니다.
    pub fn by_name(&self, name: &str) -> Option<&DetectionRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// 카테고리로 규칙을 필터링합니다.
    pub fn by_category(&self, category: &str) -> Vec<&DetectionRule> {
        self.rules.iter().filter(|r| r.category == category).collect()
    }

    /// 심각도로 규칙을 필터링합니다.
    pub fn by_severity(&self, severity: Severity) -> Vec<&DetectionRule> {
        self.rules.iter().filter(|r| r.severity == severity).collect()
    }

    /// 규칙 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// 카탈로그가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 규칙을 추가 순서대로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = &DetectionRule> {
        self.rules.iter()
    }
}
