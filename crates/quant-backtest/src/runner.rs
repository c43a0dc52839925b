//! 다중 심볼 배치 러너.
//!
//! 심볼별 백테스트는 서로 독립이므로 가변 상태 공유 없이 완전
//! 병렬로 실행합니다. 한 심볼의 실패는 기록만 남기고 배치는
//! 계속 진행됩니다.

use crate::engine::{BacktestConfig, BacktestEngine, BacktestError, BacktestReport};
use futures::future::join_all;
use quant_core::{IndicatorSet, PriceBar};
use quant_strategy::{AdaptiveCoordinator, Regime, Strategy};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// 배치 작업 하나 (심볼 + 시계열).
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// 심볼
    pub symbol: String,
    /// 시계열
    pub series: Vec<(PriceBar, IndicatorSet)>,
    /// 강제할 체제 (None이면 코디네이터가 스크리닝 포함 전체 결정)
    pub regime: Option<Regime>,
}

impl BatchJob {
    /// 코디네이터 주도 작업을 생성합니다.
    pub fn new(symbol: impl Into<String>, series: Vec<(PriceBar, IndicatorSet)>) -> Self {
        Self {
            symbol: symbol.into(),
            series,
            regime: None,
        }
    }

    /// 특정 체제를 강제합니다.
    pub fn with_regime(mut self, regime: Regime) -> Self {
        self.regime = Some(regime);
        self
    }
}

/// 심볼 하나의 배치 결과.
#[derive(Debug)]
pub struct BatchOutcome {
    /// 심볼
    pub symbol: String,
    /// 실행 결과
    pub result: Result<BacktestReport, BacktestError>,
}

/// 배치 러너.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    engine: BacktestEngine,
    coordinator: AdaptiveCoordinator,
    cancel: CancellationToken,
}

impl BatchRunner {
    /// 새 배치 러너를 생성합니다.
    pub fn new(config: BacktestConfig) -> Self {
        Self {
            engine: BacktestEngine::new(config),
            coordinator: AdaptiveCoordinator::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// 코디네이터를 교체합니다.
    pub fn with_coordinator(mut self, coordinator: AdaptiveCoordinator) -> Self {
        self.coordinator = coordinator;
        self
    }

    /// 취소 토큰을 연결합니다.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// 모든 작업을 병렬로 실행하고 입력 순서대로 결과를 반환합니다.
    pub async fn run(&self, jobs: Vec<BatchJob>) -> Vec<BatchOutcome> {
        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let engine = self.engine.clone();
                let coordinator = self.coordinator.clone();
                let cancel = self.cancel.clone();
                let symbol = job.symbol.clone();

                let handle = tokio::task::spawn_blocking(move || {
                    let strategy: Box<dyn Strategy> = match job.regime {
                        Some(regime) => regime.strategy(),
                        None => Box::new(coordinator.pinned(job.symbol.clone())),
                    };
                    engine.run_cancellable(&job.symbol, &job.series, strategy.as_ref(), &cancel)
                });
                (symbol, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        let joined = join_all(handles.into_iter().map(|(symbol, handle)| async move {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(BacktestError::Data(format!(
                    "worker task failed: {}",
                    join_err
                ))),
            };
            BatchOutcome { symbol, result }
        }))
        .await;

        for outcome in joined {
            if let Err(err) = &outcome.result {
                warn!(symbol = %outcome.symbol, error = %err, "Batch job failed");
            }
            outcomes.push(outcome);
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn rising_series(bars: usize) -> Vec<(PriceBar, IndicatorSet)> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..bars)
            .map(|i| {
                let close = Decimal::from(100 + i as i64);
                let ts = start + Duration::days(i as i64);
                let price = 100.0 + i as f64;
                (
                    PriceBar::new(ts, close, close, close, close, dec!(1000)),
                    IndicatorSet::new()
                        .with_current_price(price)
                        .with_sma(price - 2.0, price - 5.0, price - 10.0)
                        .with_rsi(55.0),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_batch() {
        let config = BacktestConfig::new(dec!(100_000)).with_min_bars(10);
        let runner = BatchRunner::new(config);

        let jobs = vec![
            BatchJob::new("AAPL", rising_series(30)),
            // 봉 부족으로 실패해야 하는 작업
            BatchJob::new("NVDA", rising_series(3)),
        ];

        let outcomes = runner.run(jobs).await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].symbol, "AAPL");
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(BacktestError::InsufficientData { .. })
        ));
    }

    #[tokio::test]
    async fn test_forced_regime_is_used() {
        let config = BacktestConfig::new(dec!(100_000)).with_min_bars(10);
        let runner = BatchRunner::new(config);

        let jobs = vec![BatchJob::new("AAPL", rising_series(30)).with_regime(Regime::Breakout)];
        let outcomes = runner.run(jobs).await;

        let report = outcomes[0].result.as_ref().unwrap();
        // 상승 시계열에서 돌파 전략은 첫 봉에 진입한다
        assert!(report.trade_count >= 1);
    }

    #[tokio::test]
    async fn test_cancelled_batch_returns_cancelled_errors() {
        let token = CancellationToken::new();
        token.cancel();

        let config = BacktestConfig::new(dec!(100_000)).with_min_bars(10);
        let runner = BatchRunner::new(config).with_cancellation(token);

        let outcomes = runner.run(vec![BatchJob::new("AAPL", rising_series(30))]).await;
        assert!(matches!(
            outcomes[0].result,
            Err(BacktestError::Cancelled)
        ));
    }
}
