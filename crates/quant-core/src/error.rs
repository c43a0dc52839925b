//! 시스템 공통 에러 타입.
//!
//! 이 모듈은 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum QuantError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 전략 에러
    #[error("전략 에러: {0}")]
    Strategy(String),

    /// 분석 위임 에러 (외부 추론 서비스)
    #[error("분석 위임 에러: {0}")]
    Delegate(String),

    /// 요청 한도 초과
    #[error("요청 한도 초과: {0}")]
    RateLimit(String),

    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 공통 작업을 위한 Result 타입.
pub type QuantResult<T> = Result<T, QuantError>;

impl QuantError {
    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, QuantError::Network(_) | QuantError::RateLimit(_))
    }
}

impl From<serde_json::Error> for QuantError {
    fn from(err: serde_json::Error) -> Self {
        QuantError::Serialization(err.to_string())
    }
}
