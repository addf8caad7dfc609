//! 분석 오케스트레이션 -- 파일/디렉토리/텍스트를 AnalysisResult로 변환
//!
//! [`LogAnalyzer`]는 파서 체인과 규칙 엔진을 소유하고 청크 단위 읽기,
//! IP 집계, 타임라인 생성, 리스크 스코어링, 결과 병합을 조율합니다.
//!
//! # 내부 흐름
//! ```text
//! ChunkedReader -> ParserChain -> RuleEngine -> (ip, timeline, risk) -> AnalysisResult
//! ```
//!
//! 청크 처리는 (청크, 카탈로그 상태)의 순수 함수이며 결과는 원래 순서로
//! 이어붙여집니다. 규칙 카탈로그 변경은 분석 호출 전에 수행되어야 하는
//! 설정 시점 작업입니다.

use std::path::Path;
use std::time::Instant;

use metrics::counter;

use logwarden_core::metrics as metric_names;
use logwarden_core::pipeline::LineParser;
use logwarden_core::report::{AnalysisResult, AnalysisSummary, MergedReport, ThreatCount};
use logwarden_core::types::{Detection, LogEntry};

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::ip::analyze_ips;
use crate::parser::ParserChain;
use crate::reader::ChunkedReader;
use crate::risk::calculate_risk;
use crate::rule::{DetectionRule, RuleEngine, RuleSet};
use crate::timeline::build_timeline;

/// 요약에 포함할 상위 위협 개수
const TOP_THREAT_LIMIT: usize = 10;

/// 로그 분석기 -- 전체 분석 파이프라인의 진입점
///
/// # 사용 예시
/// ```ignore
/// use logwarden_analyzer::LogAnalyzer;
///
/// let analyzer = LogAnalyzer::new();
/// let result = analyzer.analyze_file("/var/log/access.log", None)?;
/// println!("risk: {}", result.summary.risk.score);
/// ```
pub struct LogAnalyzer {
    /// 파서 체인
    chain: ParserChain,
    /// 규칙 엔진
    engine: RuleEngine,
    /// 분석기 설정
    config: AnalyzerConfig,
}

impl LogAnalyzer {
    /// 기본 설정과 내장 규칙으로 분석기를 생성합니다.
    pub fn new() -> Self {
        Self {
            chain: ParserChain::with_defaults(),
            engine: RuleEngine::new(),
            config: AnalyzerConfig::default(),
        }
    }

    /// 설정으로 분석기를 생성합니다.
    ///
    /// `rule_dir`이 지정되어 있으면 커스텀 규칙을 로드합니다.
    pub fn with_config(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        config.validate()?;

        let rules = if config.enable_builtin_rules {
            RuleSet::with_builtin()
        } else {
            RuleSet::empty()
        };
        let mut engine = RuleEngine::with_rules(rules);

        if let Some(dir) = &config.rule_dir {
            engine.load_rules_from_dir(dir)?;
        }

        Ok(Self {
            chain: ParserChain::with_defaults(),
            engine,
            config,
        })
    }

    /// 내장 규칙에 호출자 제공 규칙을 더해 분석기를 생성합니다.
    ///
    /// 규칙 추가는 엔진의 패턴 캐시를 다시 컴파일합니다.
    pub fn with_custom_rules(rules: Vec<DetectionRule>) -> Result<Self, AnalyzerError> {
        let mut analyzer = Self::new();
        for rule in rules {
            analyzer.engine.add_rule(rule)?;
        }
        Ok(analyzer)
    }

    /// 규칙 엔진에 대한 불변 참조를 반환합니다.
    pub fn rule_engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// 규칙 엔진에 대한 가변 참조를 반환합니다.
    ///
    /// 카탈로그 변경은 분석 호출 전에 완료해야 합니다.
    pub fn rule_engine_mut(&mut self) -> &mut RuleEngine {
        &mut self.engine
    }

    /// 커스텀 파서를 등록합니다 (폴백 앞에 삽입).
    pub fn register_parser(&mut self, parser: Box<dyn LineParser>) {
        self.chain.register(parser);
    }

    /// 현재 설정을 반환합니다.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// 로그 파일 하나를 분석합니다.
    ///
    /// `.gz` 파일은 투명하게 해제됩니다. `max_lines`가 주어지면 설정값보다
    /// 우선하며, 청크 경계를 넘어 전체 처리량을 절단합니다.
    ///
    /// # Errors
    /// 파일을 열거나 읽을 수 없으면 경로를 명시한 에러 하나로 감싸 반환하며,
    /// 해당 파일의 부분 진행 결과는 폐기됩니다.
    pub fn analyze_file(
        &self,
        path: impl AsRef<Path>,
        max_lines: Option<u64>,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let path = path.as_ref();
        let start = Instant::now();

        let effective_max = max_lines.or(self.config.max_lines);
        let mut reader = ChunkedReader::open(path, self.config.chunk_size, effective_max)
            .map_err(|e| AnalyzerError::Input {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut entries = Vec::new();
        let mut detections = Vec::new();
        let mut total_lines: u64 = 0;

        loop {
            let chunk = reader.next_chunk().map_err(|e| AnalyzerError::Input {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            if chunk.is_empty() {
                break;
            }

            self.process_chunk(&chunk, total_lines + 1, &mut entries, &mut detections);
            total_lines += chunk.len() as u64;
        }

        Ok(self.build_result(
            path.display().to_string(),
            total_lines,
            entries,
            detections,
            start,
        ))
    }

    /// 로그 텍스트를 직접 분석합니다.
    pub fn analyze_text(&self, text: &str, source_name: &str) -> AnalysisResult {
        let start = Instant::now();

        let trimmed = text.trim();
        let lines: Vec<String> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.lines().map(str::to_owned).collect()
        };

        let mut entries = Vec::new();
        let mut detections = Vec::new();
        let mut total_lines: u64 = 0;

        for chunk in lines.chunks(self.config.chunk_size.max(1)) {
            self.process_chunk(chunk, total_lines + 1, &mut entries, &mut detections);
            total_lines += chunk.len() as u64;
        }

        self.build_result(source_name.to_owned(), total_lines, entries, detections, start)
    }

    /// 디렉토리의 패턴에 맞는 모든 파일을 분석합니다.
    ///
    /// 패턴은 `*` 와일드카드를 지원합니다 (예: `*.log`).
    /// 개별 파일 실패는 경고 로그를 남기고 제외되며 스캔은 항상 완료됩니다.
    pub fn analyze_directory(
        &self,
        dir: impl AsRef<Path>,
        pattern: &str,
    ) -> Result<Vec<AnalysisResult>, AnalyzerError> {
        let dir = dir.as_ref();

        let read = std::fs::read_dir(dir).map_err(|e| AnalyzerError::Input {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut paths: Vec<_> = read
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|name| wildcard_match(name, pattern))
            })
            .collect();
        paths.sort();

        let mut results = Vec::new();
        for path in paths {
            match self.analyze_file(&path, None) {
                Ok(result) => results.push(result),
                Err(e) => {
                    counter!(metric_names::ANALYZER_FILES_FAILED_TOTAL).increment(1);
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to analyze file, skipping"
                    );
                }
            }
        }

        Ok(results)
    }

    /// 여러 분석 결과를 하나의 종합 리포트로 병합합니다.
    ///
    /// 통합 요약은 탐지 합집합에 대해 다시 계산되며, 타임라인은
    /// 파일 경계를 넘어 시각순으로 정렬됩니다.
    pub fn merge_results(results: &[AnalysisResult]) -> MergedReport {
        let mut all_detections: Vec<Detection> = Vec::new();
        let mut rule_occurrences = std::collections::BTreeMap::new();
        let mut timeline: Vec<_> = Vec::new();

        for result in results {
            all_detections.extend(result.detections.iter().cloned());
            timeline.extend(result.timeline.iter().cloned());
            for detection in &result.detections {
                *rule_occurrences.entry(detection.rule_name.clone()).or_insert(0) += 1;
            }
        }

        timeline.sort_by_key(|bucket| bucket.timestamp);

        MergedReport {
            total_files: results.len(),
            total_lines: results.iter().map(|r| r.total_lines).sum(),
            total_detections: all_detections.len(),
            total_analysis_time_secs: results.iter().map(|r| r.analysis_time_secs).sum(),
            files: results.iter().map(|r| r.source.clone()).collect(),
            combined_summary: RuleEngine::summary(&all_detections),
            rule_occurrences,
            timeline,
        }
    }

    /// 청크 하나를 파싱하고 규칙 매칭합니다.
    ///
    /// 탐지의 타임스탬프는 같은 라인에서 파싱된 엔트리의 타임스탬프를
    /// 사용합니다 (파싱되지 않은 라인의 탐지는 타임스탬프 없음).
    fn process_chunk(
        &self,
        lines: &[String],
        start_line: u64,
        entries: &mut Vec<LogEntry>,
        detections: &mut Vec<Detection>,
    ) {
        let chunk_entries = self.chain.parse_lines(lines, start_line);

        let mut entry_iter = chunk_entries.iter().peekable();
        for (i, line) in lines.iter().enumerate() {
            let line_number = start_line + i as u64;

            // 엔트리는 라인 번호 오름차순이므로 한 번의 순회로 맞춰 붙임
            while entry_iter
                .peek()
                .is_some_and(|e| e.line_number < line_number)
            {
                entry_iter.next();
            }
            let timestamp = entry_iter
                .peek()
                .filter(|e| e.line_number == line_number)
                .and_then(|e| e.timestamp);

            detections.extend(self.engine.analyze_line(line, line_number, timestamp));
        }

        counter!(metric_names::ANALYZER_LINES_TOTAL).increment(lines.len() as u64);
        counter!(metric_names::ANALYZER_LINES_PARSED_TOTAL)
            .increment(chunk_entries.len() as u64);

        entries.extend(chunk_entries);
    }

    /// 집계 단계를 수행하고 최종 결과를 조립합니다.
    fn build_result(
        &self,
        source: String,
        total_lines: u64,
        entries: Vec<LogEntry>,
        detections: Vec<Detection>,
        start: Instant,
    ) -> AnalysisResult {
        counter!(metric_names::ANALYZER_DETECTIONS_TOTAL).increment(detections.len() as u64);

        let log_types = ParserChain::parser_stats(&entries);
        let ip_analysis = analyze_ips(&entries, &detections, self.config.top_ip_limit);
        let timeline = build_timeline(&detections, self.config.timeline_event_cap);

        let detection_summary = RuleEngine::summary(&detections);

        let mut top_threats: Vec<ThreatCount> = detection_summary
            .by_rule
            .iter()
            .filter_map(|(rule, count)| {
                detections
                    .iter()
                    .find(|d| &d.rule_name == rule)
                    .map(|d| ThreatCount {
                        rule: rule.clone(),
                        count: *count,
                        severity: d.severity,
                    })
            })
            .collect();
        // 횟수 내림차순, 동률이면 규칙 이름 오름차순 (by_rule 순회가 이미 오름차순)
        top_threats.sort_by(|a, b| b.count.cmp(&a.count));
        top_threats.truncate(TOP_THREAT_LIMIT);

        let risk = calculate_risk(&detections, &ip_analysis);

        let summary = AnalysisSummary {
            log_entries_parsed: entries.len(),
            unique_ips: ip_analysis.total_unique_ips,
            private_ips: ip_analysis.private_ips,
            public_ips: ip_analysis.public_ips,
            suspicious_ips: ip_analysis.suspicious_ips.len(),
            top_threats,
            risk,
            detections: detection_summary,
        };

        AnalysisResult {
            source,
            total_lines,
            parsed_lines: entries.len() as u64,
            detections,
            summary,
            analysis_time_secs: start.elapsed().as_secs_f64(),
            log_types,
            ip_analysis,
            timeline,
        }
    }
}

impl Default for LogAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// 단순 `*` 와일드카드 파일명 매칭
fn wildcard_match(name: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return name == pattern;
    }

    let mut pos = 0;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            if !name.starts_with(part) {
                return false;
            }
            pos = part.len();
        } else if i == parts.len() - 1 {
            return name.len() >= pos && name[pos..].ends_with(part);
        } else {
            match name[pos..].find(part) {
                Some(idx) => pos += idx + part.len(),
                None => return false,
            }
        }
    }
    true
}
