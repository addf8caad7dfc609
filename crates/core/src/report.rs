//! 분석 리포트 타입 -- 분석기 출력의 공통 어휘
//!
//! 한 번의 분석 호출이 생성하는 [`AnalysisResult`]와 그 하위 구조를 정의합니다.
//! 모든 집계 맵은 `BTreeMap`을 사용하여 직렬화 순서가 항상 결정적입니다.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{Detection, Severity};

/// 탐지 요약 통계
///
/// 탐지 목록을 심각도/카테고리/규칙별로 집계한 결과입니다.
/// 빈 목록은 에러가 아니라 0으로 채워진 요약을 만듭니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionSummary {
    /// 전체 탐지 수
    pub total: usize,
    /// 심각도별 탐지 수
    pub by_severity: BTreeMap<String, usize>,
    /// 카테고리별 탐지 수
    pub by_category: BTreeMap<String, usize>,
    /// 규칙별 탐지 수
    pub by_rule: BTreeMap<String, usize>,
    /// 평균 신뢰도 (탐지가 없으면 0.0)
    pub confidence_avg: f64,
}

/// 지리 정보 플레이스홀더
///
/// 외부 지리 정보 조회는 이 코어의 범위 밖입니다.
/// 모든 필드는 "Unknown"/false 고정값입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoInfo {
    /// 국가
    pub country: String,
    /// 도시
    pub city: String,
    /// ASN
    pub asn: String,
    /// Tor 출구 노드 여부
    pub is_tor: bool,
    /// VPN 여부
    pub is_vpn: bool,
}

impl Default for GeoInfo {
    fn default() -> Self {
        Self {
            country: "Unknown".to_owned(),
            city: "Unknown".to_owned(),
            asn: "Unknown".to_owned(),
            is_tor: false,
            is_vpn: false,
        }
    }
}

/// 단일 IP 주소의 활동 통계
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpStat {
    /// IP 주소
    pub ip: String,
    /// 로그에 등장한 횟수
    pub count: u64,
    /// 최초 등장 시각 (타임스탬프 있는 엔트리 기준 최솟값)
    pub first_seen: Option<NaiveDateTime>,
    /// 최종 등장 시각 (타임스탬프 있는 엔트리 기준 최댓값)
    pub last_seen: Option<NaiveDateTime>,
    /// 사설 대역 여부 (RFC1918 + loopback)
    pub is_private: bool,
    /// 이 IP와 연관된 탐지 목록 (matched_text에 IP가 포함된 탐지)
    pub detections: Vec<Detection>,
    /// 지리 정보 (공인 IP에만 부여되는 플레이스홀더)
    pub geolocation: GeoInfo,
}

/// IP 분석 리포트
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpReport {
    /// 고유 IP 수
    pub total_unique_ips: usize,
    /// 사설 IP 수
    pub private_ips: usize,
    /// 공인 IP 수
    pub public_ips: usize,
    /// 등장 횟수 상위 IP (최대 20개, 횟수 내림차순)
    pub top_ips: Vec<IpStat>,
    /// 탐지가 1건 이상 연관된 IP (개수 제한 없음)
    pub suspicious_ips: Vec<IpStat>,
}

/// 타임라인 버킷 내 개별 이벤트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// 규칙 이름
    pub rule: String,
    /// 심각도
    pub severity: Severity,
    /// 카테고리
    pub category: String,
    /// 라인 번호
    pub line: u64,
}

/// 시간별 타임라인 버킷
///
/// 탐지 타임스탬프를 정시(top of the hour)로 내림하여 묶은 집계 창입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineBucket {
    /// 버킷 시작 시각 (분/초 절삭)
    pub timestamp: NaiveDateTime,
    /// 버킷 내 전체 탐지 수
    pub total_detections: usize,
    /// 심각도별 탐지 수
    pub by_severity: BTreeMap<String, usize>,
    /// 카테고리별 탐지 수
    pub by_category: BTreeMap<String, usize>,
    /// 버킷 내 이벤트 목록 (상한 있음)
    pub events: Vec<TimelineEvent>,
}

/// 리스크 레벨
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// 낮음
    #[default]
    Low,
    /// 중간
    Medium,
    /// 높음
    High,
    /// 치명적
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// 종합 리스크 스코어
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskScore {
    /// 정규화된 점수, 항상 [0, 100]
    pub score: u32,
    /// 점수에서 파생된 레벨
    pub level: RiskLevel,
    /// 점수에 기여한 요인 설명
    pub factors: Vec<String>,
}

/// 상위 위협 집계 항목
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatCount {
    /// 규칙 이름
    pub rule: String,
    /// 발생 횟수
    pub count: usize,
    /// 규칙 심각도
    pub severity: Severity,
}

/// 분석 요약
///
/// [`DetectionSummary`]에 IP 통계, 상위 위협, 리스크 스코어를 더한 것입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// 탐지 집계
    #[serde(flatten)]
    pub detections: DetectionSummary,
    /// 파싱에 성공한 엔트리 수
    pub log_entries_parsed: usize,
    /// 고유 IP 수
    pub unique_ips: usize,
    /// 사설 IP 수
    pub private_ips: usize,
    /// 공인 IP 수
    pub public_ips: usize,
    /// 의심 IP 수
    pub suspicious_ips: usize,
    /// 상위 위협 (최대 10개, 횟수 내림차순)
    pub top_threats: Vec<ThreatCount>,
    /// 종합 리스크 스코어
    pub risk: RiskScore,
}

/// 분석 결과
///
/// 한 번의 analyze 호출이 만드는 최상위 출력입니다.
/// 생성 이후 변경되지 않으며, 내보내기 또는 폐기로 수명이 끝납니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 소스 식별자 (파일 경로 또는 텍스트 입력 이름)
    pub source: String,
    /// 처리한 전체 라인 수
    pub total_lines: u64,
    /// 파싱에 성공한 라인 수 (항상 total_lines 이하)
    pub parsed_lines: u64,
    /// 탐지 목록 (라인 순서, 라인 내에서는 규칙 카탈로그 순서)
    pub detections: Vec<Detection>,
    /// 분석 요약
    pub summary: AnalysisSummary,
    /// 분석 소요 시간 (초)
    pub analysis_time_secs: f64,
    /// 파서 형식별 엔트리 수
    pub log_types: BTreeMap<String, u64>,
    /// IP 분석 리포트
    pub ip_analysis: IpReport,
    /// 시간별 탐지 타임라인 (오름차순)
    pub timeline: Vec<TimelineBucket>,
}

impl AnalysisResult {
    /// 최소 심각도 이상의 탐지만 반환합니다.
    ///
    /// `severity >= min`인 탐지가 정확히 반환됩니다
    /// (순서 Low < Medium < High < Critical).
    pub fn detections_at_least(&self, min: Severity) -> Vec<&Detection> {
        self.detections
            .iter()
            .filter(|d| d.severity >= min)
            .collect()
    }

    /// 지정 카테고리의 탐지만 반환합니다.
    pub fn detections_in_category(&self, category: &str) -> Vec<&Detection> {
        self.detections
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }
}

/// 여러 분석 결과를 병합한 종합 리포트
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergedReport {
    /// 병합된 파일 수
    pub total_files: usize,
    /// 전체 라인 수
    pub total_lines: u64,
    /// 전체 탐지 수
    pub total_detections: usize,
    /// 전체 분석 소요 시간 (초)
    pub total_analysis_time_secs: f64,
    /// 소스 식별자 목록
    pub files: Vec<String>,
    /// 전체 탐지에 대한 재계산된 통합 요약
    pub combined_summary: DetectionSummary,
    /// 전체 파일에 걸친 규칙별 발생 횟수
    pub rule_occurrences: BTreeMap<String, u64>,
    /// 파일 경계를 넘어 시각순으로 정렬된 타임라인
    pub timeline: Vec<TimelineBucket>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(rule: &str, severity: Severity, category: &str) -> Detection {
        Detection {
            rule_name: rule.to_owned(),
            severity,
            description: String::new(),
            matched_text: "matched".to_owned(),
            line_number: 1,
            timestamp: None,
            category: category.to_owned(),
            tags: vec![],
            confidence: 0.9,
        }
    }

    fn result_with(detections: Vec<Detection>) -> AnalysisResult {
        AnalysisResult {
            source: "test".to_owned(),
            total_lines: 10,
            parsed_lines: 10,
            detections,
            summary: AnalysisSummary::default(),
            analysis_time_secs: 0.0,
            log_types: BTreeMap::new(),
            ip_analysis: IpReport::default(),
            timeline: vec![],
        }
    }

    #[test]
    fn geo_info_defaults_to_unknown() {
        let geo = GeoInfo::default();
        assert_eq!(geo.country, "Unknown");
        assert_eq!(geo.city, "Unknown");
        assert_eq!(geo.asn, "Unknown");
        assert!(!geo.is_tor);
        assert!(!geo.is_vpn);
    }

    #[test]
    fn filter_by_minimum_severity() {
        let result = result_with(vec![
            detection("a", Severity::Low, "web_error"),
            detection("b", Severity::Medium, "authentication"),
            detection("c", Severity::High, "web_attack"),
            detection("d", Severity::Critical, "malware"),
        ]);

        let filtered = result.detections_at_least(Severity::High);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|d| d.severity >= Severity::High));

        // 최소 레벨 Low는 전부 반환
        assert_eq!(result.detections_at_least(Severity::Low).len(), 4);
        // 경계 포함: Medium은 Medium 이상 3건
        assert_eq!(result.detections_at_least(Severity::Medium).len(), 3);
    }

    #[test]
    fn filter_by_category() {
        let result = result_with(vec![
            detection("a", Severity::High, "web_attack"),
            detection("b", Severity::High, "web_attack"),
            detection("c", Severity::Low, "web_error"),
        ]);
        assert_eq!(result.detections_in_category("web_attack").len(), 2);
        assert_eq!(result.detections_in_category("nonexistent").len(), 0);
    }

    #[test]
    fn risk_level_display() {
        assert_eq!(RiskLevel::Low.to_string(), "low");
        assert_eq!(RiskLevel::Critical.to_string(), "critical");
    }

    #[test]
    fn default_summary_is_zeroed() {
        let summary = DetectionSummary::default();
        assert_eq!(summary.total, 0);
        assert!(summary.by_severity.is_empty());
        assert_eq!(summary.confidence_avg, 0.0);
    }

    #[test]
    fn analysis_result_serialize_roundtrip() {
        let result = result_with(vec![detection("a", Severity::High, "web_attack")]);
        let json = serde_json::to_string(&result).unwrap();
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.source, "test");
        assert_eq!(back.detections.len(), 1);
        assert_eq!(back.detections[0].severity, Severity::High);
    }

    #[test]
    fn summary_flattens_detection_counts() {
        let mut summary = AnalysisSummary::default();
        summary.detections.total = 3;
        let json = serde_json::to_string(&summary).unwrap();
        // DetectionSummary 필드는 중첩 없이 평탄화되어야 함
        assert!(json.contains("\"total\":3"));
        assert!(!json.contains("\"detections\""));
    }
}
