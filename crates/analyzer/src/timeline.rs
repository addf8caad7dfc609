//! 이벤트 타임라인 -- 탐지의 시간별 버킷 집계
//!
//! 탐지 타임스탬프를 정시(top of the hour)로 내림하여 버킷으로 묶습니다.
//! 타임스탬프가 없는 탐지는 타임라인에서만 제외되며
//! 전체 탐지 목록에는 그대로 남습니다.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};

use logwarden_core::report::{TimelineBucket, TimelineEvent};
use logwarden_core::types::Detection;

/// 탐지 목록에서 시간별 타임라인을 생성합니다.
///
/// 버킷은 시작 시각 오름차순으로 반환되며, 버킷당 이벤트 목록은
/// `event_cap`개로 제한됩니다 (집계 카운트는 제한 없음).
pub fn build_timeline(detections: &[Detection], event_cap: usize) -> Vec<TimelineBucket> {
    // BTreeMap 키 순회가 곧 시각 오름차순
    let mut buckets: BTreeMap<NaiveDateTime, TimelineBucket> = BTreeMap::new();

    for detection in detections {
        let Some(ts) = detection.timestamp else {
            continue;
        };
        let Some(hour_start) = ts.with_minute(0).and_then(|t| t.with_second(0)) else {
            continue;
        };
        let Some(hour_start) = hour_start.with_nanosecond(0) else {
            continue;
        };

        let bucket = buckets
            .entry(hour_start)
            .or_insert_with(|| TimelineBucket {
                timestamp: hour_start,
                total_detections: 0,
                by_severity: BTreeMap::new(),
                by_category: BTreeMap::new(),
                events: Vec::new(),
            });

        bucket.total_detections += 1;
        *bucket
            .by_severity
            .entry(detection.severity.to_string())
            .or_insert(0) += 1;
        *bucket
            .by_category
            .entry(detection.category.clone())
            .or_insert(0) += 1;

        if bucket.events.len() < event_cap {
            bucket.events.push(TimelineEvent {
                rule: detection.rule_name.clone(),
                severity: detection.severity,
                category: detection.category.clone(),
                line: detection.line_number,
            });
        }
    }

    buckets.into_values().collect()
}
