//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 모든 모듈이 공유하는 데이터 구조를 정의합니다.
//! 파서는 [`LogEntry`]를 생성하고, 규칙 엔진은 [`Detection`]을 생성합니다.
//! 두 타입 모두 생성 이후 변경되지 않습니다.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 심각도 레벨
///
/// 탐지된 위협의 심각도를 나타냅니다.
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Low < Medium < High < Critical`).
/// 필터링과 리스크 스코어링 모두 이 순서를 동일하게 사용합니다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 정보성/정찰 수준 활동
    #[default]
    Low,
    /// 모니터링이 필요한 의심 활동
    Medium,
    /// 조사가 필요한 보안 사고 가능성
    High,
    /// 즉시 대응이 필요한 공격
    Critical,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }

    /// 모든 심각도를 낮은 순서로 반환합니다.
    pub fn all() -> [Self; 4] {
        [Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// 로그 엔트리
///
/// 파싱된 로그 한 줄을 나타냅니다. 어떤 파서가 처리했는지와 무관하게
/// 분석 엔진이 다룰 수 있는 통합 형식입니다.
///
/// 타임스탬프는 항상 timezone-naive입니다. 파서가 타임존 오프셋을 읽더라도
/// 비교 일관성을 위해 오프셋을 제거한 시각만 저장합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 원본 로그 라인 (정리 후)
    pub raw_line: String,
    /// 파싱된 타임스탬프 (없을 수 있음)
    pub timestamp: Option<NaiveDateTime>,
    /// 출발지 IP (없을 수 있음)
    pub source_ip: Option<String>,
    /// 주 메시지 내용
    pub message: String,
    /// 형식별 추가 필드 (key-value 쌍)
    pub fields: Vec<(String, String)>,
    /// 처리한 파서의 형식 이름
    pub log_type: String,
    /// 원본 파일 내 라인 번호 (1부터 시작)
    pub line_number: u64,
}

impl LogEntry {
    /// 추가 필드에서 값을 찾습니다.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}] {}",
            self.line_number, self.log_type, self.message,
        )
    }
}

/// 위협 탐지 결과
///
/// 규칙이 로그 라인에 매칭되어 생성됩니다. 생성 이후 변경되지 않으며,
/// 분석기 결과 목록에 추가만 됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// 매칭된 규칙 이름
    pub rule_name: String,
    /// 위협 심각도
    pub severity: Severity,
    /// 위협 설명
    pub description: String,
    /// 패턴에 매칭된 텍스트 (첫 번째 매칭)
    pub matched_text: String,
    /// 매칭된 라인 번호
    pub line_number: u64,
    /// 해당 로그 라인의 타임스탬프 (없을 수 있음)
    pub timestamp: Option<NaiveDateTime>,
    /// 위협 카테고리 (web_attack, authentication 등)
    pub category: String,
    /// 규칙 분류 태그
    pub tags: Vec<String>,
    /// 탐지 신뢰도, 항상 [0.1, 1.0] 범위
    pub confidence: f64,
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} at line {} (confidence {:.2})",
            self.severity, self.rule_name, self.line_number, self.confidence,
        )
    }
}
