//! 방어적 전략.
//!
//! 깊은 과매도에서만 매수하고, 장기 추세가 꺾인 상태(데드 크로스)
//! 에서 반등이 나올 때만 매도하는 소극적 전략입니다.

use crate::traits::{Strategy, StrategySignal};
use quant_core::{IndicatorSet, PriceBar, TradeAction};

/// 방어적 전략.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefensiveStrategy;

impl DefensiveStrategy {
    /// 새 방어적 전략을 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for DefensiveStrategy {
    fn name(&self) -> &str {
        "defensive"
    }

    fn evaluate(&self, _bar: &PriceBar, indicators: &IndicatorSet) -> StrategySignal {
        if let Some(rsi) = indicators.rsi_14 {
            if rsi < 35.0 {
                return StrategySignal::new(
                    TradeAction::Buy,
                    vec![format!("Deep oversold ({:.1})", rsi)],
                );
            }

            if let (Some(sma_50), Some(sma_200)) = (indicators.sma_50, indicators.sma_200) {
                if sma_50 < sma_200 && rsi > 50.0 {
                    return StrategySignal::new(
                        TradeAction::Sell,
                        vec!["Downtrend rally (SMA50 < SMA200)".to_string()],
                    );
                }
            }
        }

        StrategySignal::hold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::bar;
    use quant_core::IndicatorSet;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deep_oversold_buys() {
        let b = bar(dec!(80));
        let indicators = IndicatorSet::new().with_rsi(32.0);

        let signal = DefensiveStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Buy);
    }

    #[test]
    fn test_downtrend_rally_sells() {
        let b = bar(dec!(95));
        let indicators = IndicatorSet::new()
            .with_rsi(55.0)
            .with_sma(96.0, 95.0, 100.0);

        let signal = DefensiveStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Sell);
    }

    #[test]
    fn test_uptrend_rally_holds() {
        let b = bar(dec!(105));
        let indicators = IndicatorSet::new()
            .with_rsi(55.0)
            .with_sma(104.0, 103.0, 100.0);

        let signal = DefensiveStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Hold);
    }
}
