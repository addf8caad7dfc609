//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logwarden_`
//! - 모듈명: `analyzer_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logwarden_core::metrics::ANALYZER_LINES_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 심각도 레이블 키 (low, medium, high, critical)
pub const LABEL_SEVERITY: &str = "severity";

/// 파서 형식 레이블 키 (apache_access, syslog, json 등)
pub const LABEL_LOG_TYPE: &str = "log_type";

// ─── Analyzer 메트릭 ──────────────────────────────────────────────

/// 분석기: 처리된 전체 라인 수 (counter)
pub const ANALYZER_LINES_TOTAL: &str = "logwarden_analyzer_lines_total";

/// 분석기: 파싱에 성공한 라인 수 (counter)
pub const ANALYZER_LINES_PARSED_TOTAL: &str = "logwarden_analyzer_lines_parsed_total";

/// 분석기: 생성된 탐지 수 (counter)
pub const ANALYZER_DETECTIONS_TOTAL: &str = "logwarden_analyzer_detections_total";

/// 분석기: 디렉토리 스캔 중 실패한 파일 수 (counter)
pub const ANALYZER_FILES_FAILED_TOTAL: &str = "logwarden_analyzer_files_failed_total";
