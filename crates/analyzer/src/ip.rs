//! IP 활동 집계 -- 출발지 IP별 통계와 의심 IP 선별
//!
//! 유효한 출발지 IP를 가진 모든 엔트리에 대해 등장 횟수, 최초/최종 시각,
//! 사설/공인 분류를 유지합니다. 탐지와 IP의 연관은 규칙 매칭 중이 아니라
//! 사후에 각 탐지의 `matched_text`를 IPv4 부분 문자열로 스캔하여 결정합니다.

use std::collections::BTreeMap;

use logwarden_core::report::{GeoInfo, IpReport, IpStat};
use logwarden_core::types::{Detection, LogEntry};

use crate::util::{extract_ips, is_private_ip, is_valid_ip};

/// 엔트리와 탐지에서 IP 리포트를 생성합니다.
///
/// `top_limit`개의 상위 IP (등장 횟수 내림차순, 동률이면 IP 오름차순)와
/// 탐지가 1건 이상 연관된 의심 IP 전체를 반환합니다.
pub fn analyze_ips(
    entries: &[LogEntry],
    detections: &[Detection],
    top_limit: usize,
) -> IpReport {
    // BTreeMap으로 IP 오름차순 순회를 보장
    let mut stats: BTreeMap<String, IpStat> = BTreeMap::new();

    for entry in entries {
        let Some(ip) = entry.source_ip.as_deref() else {
            continue;
        };
        if !is_valid_ip(ip) {
            continue;
        }

        let stat = stats.entry(ip.to_owned()).or_insert_with(|| IpStat {
            ip: ip.to_owned(),
            count: 0,
            first_seen: None,
            last_seen: None,
            is_private: is_private_ip(ip),
            detections: Vec::new(),
            geolocation: GeoInfo::default(),
        });

        stat.count += 1;

        // 타임스탬프 없는 엔트리는 first/last 계산에서 무시
        if let Some(ts) = entry.timestamp {
            stat.first_seen = Some(stat.first_seen.map_or(ts, |cur| cur.min(ts)));
            stat.last_seen = Some(stat.last_seen.map_or(ts, |cur| cur.max(ts)));
        }
    }

    // 탐지의 matched_text에 등장하는 IP에 탐지를 연관
    for detection in detections {
        for ip in extract_ips(&detection.matched_text) {
            if let Some(stat) = stats.get_mut(&ip) {
                stat.detections.push(detection.clone());
            }
        }
    }

    let total_unique_ips = stats.len();
    let private_ips = stats.values().filter(|s| s.is_private).count();
    let public_ips = total_unique_ips - private_ips;

    let suspicious_ips: Vec<IpStat> = stats
        .values()
        .filter(|s| !s.detections.is_empty())
        .cloned()
        .collect();

    let mut top_ips: Vec<IpStat> = stats.into_values().collect();
    // 횟수 내림차순, 동률이면 IP 오름차순 (BTreeMap 순회가 이미 오름차순)
    top_ips.sort_by(|a, b| b.count.cmp(&a.count));
    top_ips.truncate(top_limit);

    IpReport {
        total_unique_ips,
        private_ips,
        public_ips,
        top_ips,
        suspicious_ips,
    }
}
