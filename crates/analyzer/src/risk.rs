//! 리스크 스코어링 -- 탐지와 IP 지표 기반 종합 점수
//!
//! 점수 공식:
//! 1. 탐지별 가중치 {low 1, medium 3, high 7, critical 15} × 신뢰도의 합
//! 2. 의심 IP 1개당 +2
//! 3. 공인 IP가 50개를 넘으면 +5
//! 4. 정규화: clamp(0, 100, floor(합 / max(1, 탐지 수) × 10))
//!
//! 레벨: 80 이상 critical, 60 이상 high, 30 이상 medium, 그 외 low.
//! 탐지가 없으면 점수 0, 레벨 low, 요인 없음.

use logwarden_core::report::{IpReport, RiskLevel, RiskScore};
use logwarden_core::types::{Detection, Severity};

/// 공인 IP 수가 이 값을 넘으면 추가 가산점
const PUBLIC_IP_THRESHOLD: usize = 50;

/// 심각도별 점수 가중치
fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Low => 1.0,
        Severity::Medium => 3.0,
        Severity::High => 7.0,
        Severity::Critical => 15.0,
    }
}

/// 점수에서 리스크 레벨을 결정합니다.
fn level_for(score: u32) -> RiskLevel {
    match score {
        80.. => RiskLevel::Critical,
        60..=79 => RiskLevel::High,
        30..=59 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

/// 종합 리스크 스코어를 계산합니다.
pub fn calculate_risk(detections: &[Detection], ip_report: &IpReport) -> RiskScore {
    if detections.is_empty() {
        return RiskScore {
            score: 0,
            level: RiskLevel::Low,
            factors: Vec::new(),
        };
    }

    let mut base_score: f64 = detections
        .iter()
        .map(|d| severity_weight(d.severity) * d.confidence)
        .sum();

    let mut factors = Vec::new();

    let suspicious_count = ip_report.suspicious_ips.len();
    if suspicious_count > 0 {
        base_score += suspicious_count as f64 * 2.0;
        factors.push(format!("{suspicious_count} suspicious IP(s) detected"));
    }

    if ip_report.public_ips > PUBLIC_IP_THRESHOLD {
        base_score += 5.0;
        factors.push("High number of external IPs".to_owned());
    }

    let normalized = (base_score / detections.len().max(1) as f64 * 10.0).floor();
    let score = normalized.clamp(0.0, 100.0) as u32;

    RiskScore {
        score,
        level: level_for(score),
        factors,
    }
}
