//! # Quant Backtest
//!
//! 과거 데이터로 전략을 시뮬레이션하고 성과를 분석합니다.
//!
//! - **시뮬레이션 엔진**: 심볼당 단일 롱/플랫 상태 머신
//! - **성과 분석**: 수익률, 최대 낙폭, 샤프 비율, 승률 등
//! - **배치 러너**: 여러 심볼을 병렬로 실행, 협조적 취소 지원

pub mod engine;
pub mod performance;
pub mod runner;

pub use engine::{BacktestConfig, BacktestEngine, BacktestError, BacktestReport, BacktestResult};
pub use performance::{BacktestTargets, PerformanceMetrics, TargetCheck};
pub use runner::{BatchJob, BatchOutcome, BatchRunner};
