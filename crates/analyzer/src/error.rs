//! 분석기 에러 타입
//!
//! [`AnalyzerError`]는 분석기 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<AnalyzerError> for WardenError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use logwarden_core::error::{AnalysisError, WardenError};

/// 분석기 도메인 에러
///
/// 입력 읽기, 규칙 로딩/검증, 설정, 내보내기 등
/// 분석 파이프라인 내부의 모든 에러 상황을 포괄합니다.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// 입력 파일/스트림 읽기 실패
    ///
    /// 해당 입력의 부분 진행 결과는 폐기됩니다.
    #[error("input error: {path}: {reason}")]
    Input {
        /// 입력 경로 또는 소스 이름
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 규칙 유효성 검증 실패
    #[error("rule validation error: rule '{rule_name}': {reason}")]
    RuleValidation {
        /// 문제가 된 규칙 이름
        rule_name: String,
        /// 검증 실패 사유
        reason: String,
    },

    /// 규칙 파일 로딩 실패
    #[error("rule load error: {path}: {reason}")]
    RuleLoad {
        /// 규칙 파일 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 지원하지 않는 내보내기 형식
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// 결과 내보내기 실패
    #[error("export error: {0}")]
    Export(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<AnalyzerError> for WardenError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::Input { path, reason } => {
                WardenError::Analysis(AnalysisError::Input { path, reason })
            }
            AnalyzerError::UnsupportedFormat(_) | AnalyzerError::Export(_) => {
                WardenError::Analysis(AnalysisError::Export(err.to_string()))
            }
            AnalyzerError::Io(e) => WardenError::Io(e),
            other => WardenError::Analysis(AnalysisError::Rule(other.to_string())),
        }
    }
}
