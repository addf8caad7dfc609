//! 분석기 설정
//!
//! [`AnalyzerConfig`]는 core의 [`WardenConfig`](logwarden_core::config::WardenConfig)를
//! 기반으로 분석기 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use logwarden_core::config::WardenConfig;
//! use logwarden_analyzer::config::AnalyzerConfig;
//!
//! let core_config = WardenConfig::default();
//! let config = AnalyzerConfig::from_core(&core_config);
//! ```

use std::path::PathBuf;

use crate::error::AnalyzerError;

/// 분석기 설정
///
/// core의 `[analyzer]`/`[rules]` 섹션에서 파생됩니다.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// 청크당 라인 수 (메모리 상한 제어)
    pub chunk_size: usize,
    /// 입력당 최대 처리 라인 수 (None이면 제한 없음)
    pub max_lines: Option<u64>,
    /// IP 리포트의 상위 IP 개수
    pub top_ip_limit: usize,
    /// 타임라인 버킷당 이벤트 상한
    pub timeline_event_cap: usize,
    /// 내장 규칙 카탈로그 사용 여부
    pub enable_builtin_rules: bool,
    /// 커스텀 규칙 YAML 디렉토리
    pub rule_dir: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10_000,
            max_lines: None,
            top_ip_limit: 20,
            timeline_event_cap: 100,
            enable_builtin_rules: true,
            rule_dir: None,
        }
    }
}

impl AnalyzerConfig {
    /// core의 `WardenConfig`에서 분석기 설정을 생성합니다.
    pub fn from_core(core: &logwarden_core::config::WardenConfig) -> Self {
        Self {
            chunk_size: core.analyzer.chunk_size,
            max_lines: core.analyzer.max_lines,
            top_ip_limit: core.analyzer.top_ip_limit,
            timeline_event_cap: core.analyzer.timeline_event_cap,
            enable_builtin_rules: core.rules.enable_builtin,
            rule_dir: core.rules.rule_dir.as_ref().map(PathBuf::from),
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        const MAX_CHUNK_SIZE: usize = 1_000_000;

        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(AnalyzerError::Config {
                field: "chunk_size".to_owned(),
                reason: format!("must be 1-{MAX_CHUNK_SIZE}"),
            });
        }

        if self.top_ip_limit == 0 {
            return Err(AnalyzerError::Config {
                field: "top_ip_limit".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.timeline_event_cap == 0 {
            return Err(AnalyzerError::Config {
                field: "timeline_event_cap".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        Ok(())
    }
}

/// 분석기 설정 빌더
#[derive(Default)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 청크 크기를 설정합니다.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// 최대 처리 라인 수를 설정합니다.
    pub fn max_lines(mut self, max: u64) -> Self {
        self.config.max_lines = Some(max);
        self
    }

    /// 상위 IP 개수를 설정합니다.
    pub fn top_ip_limit(mut self, limit: usize) -> Self {
        self.config.top_ip_limit = limit;
        self
    }

    /// 타임라인 이벤트 상한을 설정합니다.
    pub fn timeline_event_cap(mut self, cap: usize) -> Self {
        self.config.timeline_event_cap = cap;
        self
    }

    /// 내장 규칙 사용 여부를 설정합니다.
    pub fn enable_builtin_rules(mut self, enable: bool) -> Self {
        self.config.enable_builtin_rules = enable;
        self
    }

    /// 커스텀 규칙 디렉토리를 설정합니다.
    pub fn rule_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.rule_dir = Some(dir.into());
        self
    }

    /// 설정을 검증하고 `AnalyzerConfig`를 생성합니다.
    pub fn build(self) -> Result<AnalyzerConfig, AnalyzerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AnalyzerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.chunk_size, 10_000);
        assert_eq!(config.top_ip_limit, 20);
    }

    #[test]
    fn from_core_preserves_values() {
        let mut core = logwarden_core::config::WardenConfig::default();
        core.analyzer.chunk_size = 500;
        core.analyzer.max_lines = Some(2000);
        core.rules.enable_builtin = false;
        core.rules.rule_dir = Some("/etc/logwarden/rules".to_owned());

        let config = AnalyzerConfig::from_core(&core);
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.max_lines, Some(2000));
        assert!(!config.enable_builtin_rules);
        assert_eq!(
            config.rule_dir,
            Some(PathBuf::from("/etc/logwarden/rules"))
        );
    }

    #[test]
    fn validate_rejects_zero_chunk_size() {
        let config = AnalyzerConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeline_cap() {
        let config = AnalyzerConfig {
            timeline_event_cap: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_creates_valid_config() {
        let config = AnalyzerConfigBuilder::new()
            .chunk_size(100)
            .max_lines(1000)
            .top_ip_limit(5)
            .build()
            .unwrap();
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.max_lines, Some(1000));
        assert_eq!(config.top_ip_limit, 5);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let result = AnalyzerConfigBuilder::new().chunk_size(0).build();
        assert!(result.is_err());
    }
}
