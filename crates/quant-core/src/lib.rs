//! # Quant Core
//!
//! 백테스트/분석 시스템의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 가격 봉(OHLCV) 및 지표 스냅샷
//! - 거래 기록 및 포지션 상태
//! - 자산 곡선 포인트
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
