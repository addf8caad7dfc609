//! 탐지 규칙 엔진 -- 정규식 카탈로그 매칭 및 신뢰도 산정
//!
//! [`RuleEngine`]은 활성 규칙의 컴파일된 패턴을 라인에 대해 평가하고,
//! 매칭된 규칙마다 [`Detection`]을 하나씩 생성합니다.
//!
//! # 아키텍처
//! - [`types`]: 규칙 데이터 구조와 카탈로그 ([`DetectionRule`], [`RuleSet`])
//! - [`catalog`]: 내장 규칙 세트
//! - [`loader`]: YAML 규칙 파일 로딩
//!
//! # 컴파일 규율
//! 패턴은 규칙 이름으로 캐싱되어 한 번만 컴파일됩니다. 컴파일 실패는
//! 경고 로그를 남기고 해당 규칙을 영구히 건너뜁니다 (배치를 중단하지 않음).
//! 카탈로그가 변경되면 (추가/제거/로드) 전체 캐시를 다시 컴파일합니다.

pub mod catalog;
pub mod loader;
pub mod types;

pub use catalog::builtin_rules;
pub use loader::RuleLoader;
pub use types::{DetectionRule, RuleSet};

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDateTime;
use regex::{Regex, RegexBuilder};

use logwarden_core::report::DetectionSummary;
use logwarden_core::types::{Detection, Severity};

use crate::error::AnalyzerError;

/// 신뢰도 기본값
const BASE_CONFIDENCE: f64 = 0.7;
/// 신뢰도 범위
const CONFIDENCE_RANGE: (f64, f64) = (0.1, 1.0);
/// 짧은 매칭으로 간주하는 길이
const SHORT_MATCH_LEN: usize = 5;

/// 규칙 엔진 -- 컴파일된 규칙 카탈로그 매칭 코디네이터
///
/// 규칙 카탈로그는 엔진 객체마다 소유되므로, 서로 다른 카탈로그를 가진
/// 엔진 여러 개가 안전하게 공존할 수 있습니다. 카탈로그 변경은 활성 분석
/// 호출 전에 수행되어야 하는 설정 시점 작업입니다.
///
/// # 사용 예시
/// ```ignore
/// use logwarden_analyzer::rule::RuleEngine;
///
/// let engine = RuleEngine::new();
/// let detections = engine.analyze_line("' OR 1=1--", 1, None);
/// ```
pub struct RuleEngine {
    /// 규칙 카탈로그 (순회 순서 = 탐지 순서)
    rules: RuleSet,
    /// 컴파일된 정규식 캐시: rule name -> Regex
    ///
    /// 컴파일에 실패한 규칙은 캐시에 없으며 매칭에서 제외됩니다.
    compiled: HashMap<String, Regex>,
}

impl RuleEngine {
    /// 내장 규칙 카탈로그로 엔진을 생성합니다.
    pub fn new() -> Self {
        Self::with_rules(RuleSet::with_builtin())
    }

    /// 빈 카탈로그로 엔진을 생성합니다.
    pub fn empty() -> Self {
        Self::with_rules(RuleSet::empty())
    }

    /// 주어진 카탈로그로 엔진을 생성합니다.
    pub fn with_rules(rules: RuleSet) -> Self {
        let mut engine = Self {
            rules,
            compiled: HashMap::new(),
        };
        engine.recompile();
        engine
    }

    /// 규칙을 추가하고 전체 캐시를 다시 컴파일합니다.
    pub fn add_rule(&mut self, rule: DetectionRule) -> Result<(), AnalyzerError> {
        self.rules.add(rule)?;
        self.recompile();
        Ok(())
    }

    /// 규칙을 제거하고 전체 캐시를 다시 컴파일합니다.
    pub fn remove_rule(&mut self, name: &str) -> Option<DetectionRule> {
        let removed = self.rules.remove(name);
        if removed.is_some() {
            self.recompile();
        }
        removed
    }

    /// 디렉토리에서 YAML 규칙 파일을 로드합니다.
    ///
    /// 로드된 규칙 수를 반환합니다. 중복 이름 규칙은 경고 후 건너뜁니다.
    pub fn load_rules_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, AnalyzerError> {
        let loaded = RuleLoader::load_directory(dir)?;
        let mut added = 0;
        for rule in loaded {
            match self.rules.add(rule) {
                Ok(()) => added += 1,
                Err(e) => tracing::warn!(error = %e, "skipping custom rule"),
            }
        }
        self.recompile();
        Ok(added)
    }

    /// 규칙 카탈로그를 반환합니다.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// 카탈로그의 규칙 수를 반환합니다.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// 컴파일에 성공하여 매칭에 참여하는 규칙 수를 반환합니다.
    pub fn active_rule_count(&self) -> usize {
        self.compiled.len()
    }

    /// 전체 패턴 캐시를 다시 컴파일합니다.
    ///
    /// 컴파일 실패는 경고 로그를 남기고 해당 규칙을 매칭에서 제외합니다.
    fn recompile(&mut self) {
        self.compiled.clear();
        for rule in self.rules.iter() {
            match RegexBuilder::new(&rule.pattern).case_insensitive(true).build() {
                Ok(regex) => {
                    self.compiled.insert(rule.name.clone(), regex);
                }
                Err(e) => {
                    tracing::warn!(
                        rule_name = %rule.name,
                        error = %e,
                        "failed to compile rule pattern, rule is inert"
                    );
                }
            }
        }
    }

    /// 라인 하나를 모든 활성 규칙에 대해 평가합니다.
    ///
    /// 매칭된 규칙마다 탐지를 정확히 하나 생성합니다 (매칭 횟수와 무관).
    /// `matched_text`는 첫 번째 매칭이며, 라인 번호와 타임스탬프는
    /// 호출자가 제공합니다.
    pub fn analyze_line(
        &self,
        line: &str,
        line_number: u64,
        timestamp: Option<NaiveDateTime>,
    ) -> Vec<Detection> {
        let mut detections = Vec::new();

        for rule in self.rules.iter() {
            let Some(regex) = self.compiled.get(&rule.name) else {
                continue;
            };

            let mut matches = regex.find_iter(line);
            let Some(first) = matches.next() else {
                continue;
            };
            let match_count = 1 + matches.count();

            let confidence =
                Self::calculate_confidence(rule.severity, match_count, first.as_str().len());

            detections.push(Detection {
                rule_name: rule.name.clone(),
                severity: rule.severity,
                description: rule.description.clone(),
                matched_text: first.as_str().to_owned(),
                line_number,
                timestamp,
                category: rule.category.clone(),
                tags: rule.tags.clone(),
                confidence,
            });
        }

        detections
    }

    /// 여러 라인을 순서대로 평가합니다.
    ///
    /// 라인 번호는 `start_line`부터 매겨지며, 탐지는 라인 순서대로
    /// 이어붙여집니다. 라인 간 중복 제거는 하지 않습니다.
    pub fn analyze_chunk(&self, lines: &[String], start_line: u64) -> Vec<Detection> {
        lines
            .iter()
            .enumerate()
            .flat_map(|(i, line)| self.analyze_line(line, start_line + i as u64, None))
            .collect()
    }

    /// 매칭 품질 기반 신뢰도를 산정합니다.
    ///
    /// 기본 0.7, 심각도 보너스 {low 0.0, medium 0.1, high 0.2, critical 0.3},
    /// 라인 내 복수 매칭 +0.1, 첫 매칭이 5자 미만이면 -0.1,
    /// 최종적으로 [0.1, 1.0]으로 클램프합니다.
    fn calculate_confidence(severity: Severity, match_count: usize, first_len: usize) -> f64 {
        let severity_boost = match severity {
            Severity::Low => 0.0,
            Severity::Medium => 0.1,
            Severity::High => 0.2,
            Severity::Critical => 0.3,
        };

        let mut confidence = BASE_CONFIDENCE + severity_boost;

        if match_count > 1 {
            confidence += 0.1;
        }

        if first_len < SHORT_MATCH_LEN {
            confidence -= 0.1;
        }

        confidence.clamp(CONFIDENCE_RANGE.0, CONFIDENCE_RANGE.1)
    }

    /// 탐지 목록을 집계하여 요약 통계를 생성합니다.
    ///
    /// 빈 목록은 에러가 아니라 0으로 채워진 요약을 만듭니다.
    pub fn summary(detections: &[Detection]) -> DetectionSummary {
        if detections.is_empty() {
            return DetectionSummary::default();
        }

        let mut summary = DetectionSummary {
            total: detections.len(),
            ..Default::default()
        };

        let mut confidence_sum = 0.0;
        for detection in detections {
            *summary
                .by_severity
                .entry(detection.severity.to_string())
                .or_insert(0) += 1;
            *summary
                .by_category
                .entry(detection.category.clone())
                .or_insert(0) += 1;
            *summary
                .by_rule
                .entry(detection.rule_name.clone())
                .or_insert(0) += 1;
            confidence_sum += detection.confidence;
        }

        summary.confidence_avg = confidence_sum / detections.len() as f64;
        summary
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
