//! 규칙 파일 로더 -- YAML 규칙 파일을 디스크에서 로드합니다.
//!
//! 규칙 디렉토리 내의 `.yml`/`.yaml` 파일을 스캔하고 파싱합니다.
//! 개별 파일 파싱 실패는 경고 로그를 남기고 건너뜁니다.

use std::collections::HashSet;
use std::path::Path;

use crate::error::AnalyzerError;

use super::types::DetectionRule;

/// 규칙 파일 크기 상한
const MAX_RULE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB
/// 규칙 수 상한
const MAX_RULES_COUNT: usize = 10_000;

/// 규칙 파일 로더
pub struct RuleLoader;

impl RuleLoader {
    /// 디렉토리에서 모든 YAML 규칙 파일을 로드합니다.
    ///
    /// `.yml` 또는 `.yaml` 확장자를 가진 파일만 처리합니다.
    /// 개별 파일 로딩 실패는 경고 로그를 남기고 건너뜁니다.
    /// 파일 이름 순으로 정렬하여 로드 순서가 결정적입니다.
    ///
    /// # Errors
    /// - 디렉토리를 읽을 수 없는 경우
    /// - 규칙 수가 상한을 초과하는 경우
    pub fn load_directory(dir: impl AsRef<Path>) -> Result<Vec<DetectionRule>, AnalyzerError> {
        let dir = dir.as_ref();

        let entries = std::fs::read_dir(dir).map_err(|e| AnalyzerError::RuleLoad {
            path: dir.display().to_string(),
            reason: format!("failed to read directory: {e}"),
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == "yml" || ext == "yaml")
            })
            .collect();
        paths.sort();

        let mut rules = Vec::new();
        let mut seen_names = HashSet::new();

        for path in paths {
            match Self::load_file(&path) {
                Ok(rule) => {
                    // 중복 이름 검사
                    if seen_names.contains(&rule.name) {
                        tracing::warn!(
                            rule_name = %rule.name,
                            path = %path.display(),
                            "duplicate rule name, skipping"
                        );
                        continue;
                    }
                    seen_names.insert(rule.name.clone());
                    rules.push(rule);
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to load rule file, skipping"
                    );
                }
            }

            if rules.len() > MAX_RULES_COUNT {
                return Err(AnalyzerError::RuleLoad {
                    path: dir.display().to_string(),
                    reason: format!("too many rules: max {MAX_RULES_COUNT}"),
                });
            }
        }

        tracing::info!(
            dir = %dir.display(),
            count = rules.len(),
            "loaded detection rules"
        );

        Ok(rules)
    }

    /// 단일 YAML 파일에서 규칙을 로드합니다.
    pub fn load_file(path: impl AsRef<Path>) -> Result<DetectionRule, AnalyzerError> {
        let path = path.as_ref();

        // 파일 크기 검증
        let metadata = std::fs::metadata(path).map_err(|e| AnalyzerError::RuleLoad {
            path: path.display().to_string(),
            reason: format!("failed to read file metadata: {e}"),
        })?;

        if metadata.len() > MAX_RULE_FILE_SIZE {
            return Err(AnalyzerError::RuleLoad {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {MAX_RULE_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AnalyzerError::RuleLoad {
            path: path.display().to_string(),
            reason: format!("failed to read file: {e}"),
        })?;

        Self::parse_yaml(&content, &path.display().to_string())
    }

    /// YAML 문자열을 파싱하여 규칙을 생성합니다.
    pub fn parse_yaml(yaml_str: &str, source: &str) -> Result<DetectionRule, AnalyzerError> {
        let rule: DetectionRule =
            serde_yaml::from_str(yaml_str).map_err(|e| AnalyzerError::RuleLoad {
                path: source.to_owned(),
                reason: format!("YAML parse error: {e}"),
            })?;

        // 유효성 검증
        rule.validate()?;

        Ok(rule)
    }
}
