//! 설정 관리 — logwarden.toml 파싱 및 런타임 설정
//!
//! [`WardenConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`LOGWARDEN_ANALYZER_CHUNK_SIZE=5000` 형식)
//! 2. 설정 파일 (`logwarden.toml`)
//! 3. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # fn example() -> Result<(), logwarden_core::error::WardenError> {
//! use logwarden_core::config::WardenConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = WardenConfig::load("logwarden.toml")?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = WardenConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, WardenError};

/// Logwarden 통합 설정
///
/// `logwarden.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 분석기 설정
    #[serde(default)]
    pub analyzer: AnalyzerSettings,
    /// 탐지 규칙 설정
    #[serde(default)]
    pub rules: RuleSettings,
}

impl WardenConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WardenError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WardenError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WardenError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                WardenError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, WardenError> {
        toml::from_str(toml_str).map_err(|e| {
            WardenError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGWARDEN_{SECTION}_{FIELD}`
    /// 예: `LOGWARDEN_ANALYZER_CHUNK_SIZE=5000`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGWARDEN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.data_dir, "LOGWARDEN_GENERAL_DATA_DIR");

        // Analyzer
        override_usize(
            &mut self.analyzer.chunk_size,
            "LOGWARDEN_ANALYZER_CHUNK_SIZE",
        );
        override_opt_u64(&mut self.analyzer.max_lines, "LOGWARDEN_ANALYZER_MAX_LINES");
        override_usize(
            &mut self.analyzer.top_ip_limit,
            "LOGWARDEN_ANALYZER_TOP_IP_LIMIT",
        );
        override_usize(
            &mut self.analyzer.timeline_event_cap,
            "LOGWARDEN_ANALYZER_TIMELINE_EVENT_CAP",
        );

        // Rules
        override_bool(&mut self.rules.enable_builtin, "LOGWARDEN_RULES_ENABLE_BUILTIN");
        override_opt_string(&mut self.rules.rule_dir, "LOGWARDEN_RULES_RULE_DIR");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), WardenError> {
        const MAX_CHUNK_SIZE: usize = 1_000_000;

        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        if self.analyzer.chunk_size == 0 || self.analyzer.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "analyzer.chunk_size".to_owned(),
                reason: format!("must be 1-{MAX_CHUNK_SIZE}"),
            }
            .into());
        }

        if self.analyzer.top_ip_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analyzer.top_ip_limit".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.analyzer.timeline_event_cap == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analyzer.timeline_event_cap".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 데이터 디렉토리
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            data_dir: "/var/lib/logwarden".to_owned(),
        }
    }
}

/// 분석기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// 청크당 라인 수 (메모리 상한 제어)
    pub chunk_size: usize,
    /// 입력당 최대 처리 라인 수 (None이면 제한 없음)
    pub max_lines: Option<u64>,
    /// IP 리포트의 상위 IP 개수
    pub top_ip_limit: usize,
    /// 타임라인 버킷당 이벤트 상한
    pub timeline_event_cap: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            chunk_size: 10_000,
            max_lines: None,
            top_ip_limit: 20,
            timeline_event_cap: 100,
        }
    }
}

/// 탐지 규칙 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    /// 내장 규칙 카탈로그 사용 여부
    pub enable_builtin: bool,
    /// 커스텀 규칙 YAML 디렉토리 (None이면 내장 규칙만)
    pub rule_dir: Option<String>,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            enable_builtin: true,
            rule_dir: None,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, key: &str) {
    if let Ok(value) = std::env::var(key) {
        *target = value;
    }
}

fn override_opt_string(target: &mut Option<String>, key: &str) {
    if let Ok(value) = std::env::var(key) {
        *target = Some(value);
    }
}

fn override_bool(target: &mut bool, key: &str) {
    if let Ok(value) = std::env::var(key) {
        match value.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(key, value, "ignoring non-boolean env override"),
        }
    }
}

fn override_usize(target: &mut usize, key: &str) {
    if let Ok(value) = std::env::var(key) {
        match value.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(key, value, "ignoring non-numeric env override"),
        }
    }
}

fn override_opt_u64(target: &mut Option<u64>, key: &str) {
    if let Ok(value) = std::env::var(key) {
        match value.parse::<u64>() {
            Ok(parsed) => *target = Some(parsed),
            Err(_) => warn!(key, value, "ignoring non-numeric env override"),
        }
    }
}
