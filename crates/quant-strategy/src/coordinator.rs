//! 적응형 전략 코디네이터.
//!
//! 봉 하나를 받아 2단계로 판단합니다:
//! 1. 스크리닝 - 기본 모멘텀 게이트를 통과하지 못하면 즉시 관망
//! 2. 체제 조회 후 해당 전략 변형에 위임
//!
//! 스크리닝은 결정적이고 멱등합니다.

use crate::registry::{Regime, RegimeMap};
use chrono::{DateTime, Utc};
use quant_core::{IndicatorSet, PriceBar, TradeAction};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 코디네이터의 디스패치 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyDispatch {
    /// 최종 판단
    pub action: TradeAction,
    /// 사용된 전략 이름
    pub strategy_used: String,
    /// 배정된 체제 레이블
    pub regime: String,
    /// 판단 신뢰도 [0, 1]
    pub confidence: f64,
    /// 판단 근거
    pub reasoning: Vec<String>,
    /// 판단 시점
    pub timestamp: DateTime<Utc>,
}

/// 적응형 전략 코디네이터.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveCoordinator {
    regimes: RegimeMap,
}

impl AdaptiveCoordinator {
    /// 기본 배정 테이블로 코디네이터를 생성합니다.
    pub fn new() -> Self {
        Self {
            regimes: RegimeMap::with_default_assignments(),
        }
    }

    /// 지정한 배정 테이블로 코디네이터를 생성합니다.
    pub fn with_regimes(regimes: RegimeMap) -> Self {
        Self { regimes }
    }

    /// 스크리닝 게이트.
    ///
    /// 가격과 SMA20이 모두 양수로 존재해야 하며, 가격이 SMA20 위에
    /// 있거나 RSI가 50을 넘어야 통과합니다. RSI가 계산되지 않았으면
    /// RSI 쪽 조건은 통과하지 못합니다.
    pub fn screen(&self, bar: &PriceBar, indicators: &IndicatorSet) -> Result<(), String> {
        let price = match crate::strategies::effective_price(bar, indicators) {
            Some(p) if p > 0.0 => p,
            _ => return Err("No valid price".to_string()),
        };

        let sma_20 = match indicators.sma_20 {
            Some(s) if s > 0.0 => s,
            _ => return Err("SMA20 unavailable".to_string()),
        };

        let momentum_ok =
            price > sma_20 || indicators.rsi_14.map(|rsi| rsi > 50.0).unwrap_or(false);
        if momentum_ok {
            Ok(())
        } else {
            Err("Failed momentum screen (price below SMA20, weak RSI)".to_string())
        }
    }

    /// 심볼 하나의 봉을 평가하여 디스패치 결과를 반환합니다.
    pub fn dispatch(
        &self,
        symbol: &str,
        bar: &PriceBar,
        indicators: &IndicatorSet,
    ) -> StrategyDispatch {
        let regime = self.regimes.lookup(symbol);

        if let Err(reason) = self.screen(bar, indicators) {
            debug!(symbol = %symbol, reason = %reason, "Screening rejected bar");
            return StrategyDispatch {
                action: TradeAction::Hold,
                strategy_used: "screening".to_string(),
                regime: regime.label().to_string(),
                confidence: 0.9,
                reasoning: vec![reason],
                timestamp: bar.timestamp,
            };
        }

        let strategy = regime.strategy();
        let signal = strategy.evaluate(bar, indicators);
        let confidence = if signal.action == TradeAction::Hold {
            0.5
        } else {
            0.75
        };

        debug!(
            symbol = %symbol,
            regime = %regime,
            action = %signal.action,
            "Strategy dispatched"
        );

        StrategyDispatch {
            action: signal.action,
            strategy_used: strategy.name().to_string(),
            regime: regime.label().to_string(),
            confidence,
            reasoning: signal.reasons,
            timestamp: bar.timestamp,
        }
    }

    /// 심볼의 체제를 조회합니다.
    pub fn regime_for(&self, symbol: &str) -> Regime {
        self.regimes.lookup(symbol)
    }

    /// 특정 심볼에 고정된 `Strategy` 어댑터를 만듭니다.
    ///
    /// 백테스트 엔진처럼 심볼 문맥 없이 봉만 넘기는 소비자가
    /// 코디네이터 전체(스크리닝 포함)를 전략으로 쓸 수 있게 합니다.
    pub fn pinned(&self, symbol: impl Into<String>) -> CoordinatorStrategy {
        CoordinatorStrategy {
            coordinator: self.clone(),
            symbol: symbol.into(),
        }
    }
}

/// 심볼 하나에 고정된 코디네이터 어댑터.
#[derive(Debug, Clone)]
pub struct CoordinatorStrategy {
    coordinator: AdaptiveCoordinator,
    symbol: String,
}

impl crate::traits::Strategy for CoordinatorStrategy {
    fn name(&self) -> &str {
        "adaptive"
    }

    fn evaluate(
        &self,
        bar: &PriceBar,
        indicators: &IndicatorSet,
    ) -> crate::traits::StrategySignal {
        let dispatch = self.coordinator.dispatch(&self.symbol, bar, indicators);
        crate::traits::StrategySignal::new(dispatch.action, dispatch.reasoning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::bar;
    use rust_decimal_macros::dec;

    #[test]
    fn test_screen_failure_holds_with_high_confidence() {
        let b = bar(dec!(95));
        let indicators = IndicatorSet::new()
            .with_current_price(95.0)
            .with_sma(100.0, 100.0, 100.0)
            .with_rsi(45.0);

        let coordinator = AdaptiveCoordinator::new();
        let dispatch = coordinator.dispatch("AAPL", &b, &indicators);

        assert_eq!(dispatch.action, TradeAction::Hold);
        assert_eq!(dispatch.strategy_used, "screening");
        assert!((dispatch.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_passes_on_rsi_leg() {
        let b = bar(dec!(95));
        // 가격은 SMA20 아래지만 RSI > 50 으로 통과
        let indicators = IndicatorSet::new()
            .with_current_price(95.0)
            .with_sma(100.0, 90.0, 80.0)
            .with_rsi(55.0);

        let coordinator = AdaptiveCoordinator::new();
        assert!(coordinator.screen(&b, &indicators).is_ok());
    }

    #[test]
    fn test_screen_requires_sma_20() {
        let b = bar(dec!(100));
        let indicators = IndicatorSet::new().with_current_price(100.0).with_rsi(60.0);

        let coordinator = AdaptiveCoordinator::new();
        assert!(coordinator.screen(&b, &indicators).is_err());
    }

    #[test]
    fn test_screen_absent_rsi_does_not_pass_rsi_leg() {
        let b = bar(dec!(95));
        let indicators = IndicatorSet::new()
            .with_current_price(95.0)
            .with_sma(100.0, 100.0, 100.0);

        let coordinator = AdaptiveCoordinator::new();
        assert!(coordinator.screen(&b, &indicators).is_err());
    }

    #[test]
    fn test_action_confidence_levels() {
        // NVDA -> breakout; 가격이 SMA50 위, RSI > 50 -> 매수
        let b = bar(dec!(110));
        let indicators = IndicatorSet::new()
            .with_current_price(110.0)
            .with_sma(105.0, 100.0, 95.0)
            .with_rsi(60.0);

        let coordinator = AdaptiveCoordinator::new();
        let dispatch = coordinator.dispatch("NVDA", &b, &indicators);

        assert_eq!(dispatch.action, TradeAction::Buy);
        assert_eq!(dispatch.strategy_used, "breakout");
        assert!((dispatch.confidence - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_is_idempotent() {
        let b = bar(dec!(110));
        let indicators = IndicatorSet::new()
            .with_current_price(110.0)
            .with_sma(105.0, 100.0, 95.0)
            .with_rsi(60.0);

        let coordinator = AdaptiveCoordinator::new();
        let first = coordinator.dispatch("AAPL", &b, &indicators);
        let second = coordinator.dispatch("AAPL", &b, &indicators);

        assert_eq!(first.action, second.action);
        assert_eq!(first.reasoning, second.reasoning);
    }
}
