#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`parser`]: 형식별 파서와 고정 우선순위 체인 (Apache, Syslog, Windows,
//!   방화벽, JSON, 범용 폴백)
//! - [`rule`]: 정규식 탐지 규칙 엔진, 내장 카탈로그, YAML 규칙 로더
//! - [`analyzer`]: 분석 오케스트레이션 (파일/디렉토리/텍스트, 결과 병합)
//! - [`reader`]: 청크 단위 라인 읽기 (gzip 해제, 손실 디코딩)
//! - [`ip`]: IP 활동 집계
//! - [`timeline`]: 시간별 탐지 타임라인
//! - [`risk`]: 종합 리스크 스코어
//! - [`export`]: JSON/CSV 내보내기
//! - [`config`]: 분석기 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//! - [`util`]: 타임스탬프/IP 정규화 헬퍼
//!
//! # 아키텍처
//!
//! ```text
//! ChunkedReader -> ParserChain -> RuleEngine -> (ip, timeline, risk) -> AnalysisResult -> export
//!      |               |              |
//!   gzip/lossy     6개 형식 파서   내장 18개 규칙
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod export;
pub mod reader;
pub mod util;

pub mod parser;
pub mod rule;

pub mod ip;
pub mod risk;
pub mod timeline;

// --- 주요 타입 re-export ---

// 분석기
pub use analyzer::LogAnalyzer;

// 설정
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};

// 에러
pub use error::AnalyzerError;

// 파서
pub use parser::ParserChain;

// 규칙 엔진
pub use rule::{DetectionRule, RuleEngine, RuleSet};

// 내보내기
pub use export::{ExportFormat, export, export_to_file};

// 리더
pub use reader::ChunkedReader;
