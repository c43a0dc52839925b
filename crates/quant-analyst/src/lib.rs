//! # Quant Analyst
//!
//! 다중 분석가 위원회 의사결정 레이어를 제공합니다:
//! - `AnalystDelegate` 트레이트와 4가지 규칙 기반 분석가
//! - 외부 추론 서비스 위임 (토큰 캐시 포함)
//! - 타임아웃이 있는 병렬 코디네이터
//! - 신뢰도 가중 다수결 위원회

pub mod analysts;
pub mod committee;
pub mod context;
pub mod delegate;
pub mod remote;
pub mod verdict;

pub use analysts::{FundamentalAnalyst, RiskAnalyst, SentimentAnalyst, TechnicalAnalyst};
pub use committee::{Committee, CommitteeDecision};
pub use context::{AnalystContext, Fundamentals};
pub use delegate::{AnalystCoordinator, AnalystDelegate};
pub use remote::{RemoteDelegate, RemoteDelegateConfig, TokenCache};
pub use verdict::{AnalystRole, AnalystVerdict, Rating, RiskLevel};
