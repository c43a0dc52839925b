//! # Quant Strategy
//!
//! 봉 단위 전략 평가 레이어를 제공합니다:
//! - `Strategy` 트레이트와 6가지 전략 변형
//! - 심볼 -> 체제(regime) 배정 레지스트리
//! - 스크리닝과 2단계 디스패치를 수행하는 적응형 코디네이터

pub mod coordinator;
pub mod registry;
pub mod strategies;
pub mod traits;

pub use coordinator::{AdaptiveCoordinator, CoordinatorStrategy, StrategyDispatch};
pub use registry::{Regime, RegimeMap};
pub use strategies::{
    BreakoutStrategy, ConservativeStrategy, DefensiveStrategy, MeanReversionStrategy,
    RelaxedStrategy, TrendFollowingStrategy,
};
pub use traits::{Strategy, StrategySignal};
