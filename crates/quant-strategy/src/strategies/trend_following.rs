//! 추세 추종 전략.
//!
//! 상승 추세 정렬(가격 > 장기 이동평균, 중립 RSI, MACD 모멘텀)에서
//! 매수하고, 추세 이탈 또는 과매수에서 매도합니다. 조건 1개면
//! 행동하며 매수를 먼저 평가합니다.

use crate::traits::{Strategy, StrategySignal};
use quant_core::{IndicatorSet, PriceBar, TradeAction};

/// 추세 추종 전략.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendFollowingStrategy;

impl TrendFollowingStrategy {
    /// 새 추세 추종 전략을 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for TrendFollowingStrategy {
    fn name(&self) -> &str {
        "trend_following"
    }

    fn evaluate(&self, bar: &PriceBar, indicators: &IndicatorSet) -> StrategySignal {
        let price = super::effective_price(bar, indicators);
        let mut buy_reasons: Vec<String> = Vec::new();
        let mut sell_reasons: Vec<String> = Vec::new();

        if let (Some(price), Some(sma_50)) = (price, indicators.sma_50) {
            if price > sma_50 {
                buy_reasons.push("Price above SMA50".to_string());
            } else if price < sma_50 {
                sell_reasons.push("Price below SMA50".to_string());
            }
        }

        if let Some(rsi) = indicators.rsi_14 {
            if (35.0..=65.0).contains(&rsi) {
                buy_reasons.push(format!("RSI in trend range ({:.1})", rsi));
            } else if rsi > 70.0 {
                sell_reasons.push(format!("RSI overbought ({:.1})", rsi));
            }
        }

        if let Some(macd) = indicators.macd {
            let bullish = match indicators.macd_signal {
                Some(signal) => macd > signal,
                None => macd > 0.0,
            };
            if bullish {
                buy_reasons.push("MACD momentum positive".to_string());
            }
        }

        if let (Some(price), Some(sma_20)) = (price, indicators.sma_20) {
            if price > sma_20 {
                buy_reasons.push("Price above SMA20".to_string());
            }
        }

        if !buy_reasons.is_empty() {
            StrategySignal::new(TradeAction::Buy, buy_reasons)
        } else if !sell_reasons.is_empty() {
            StrategySignal::new(TradeAction::Sell, sell_reasons)
        } else {
            StrategySignal::hold()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::bar;
    use quant_core::IndicatorSet;
    use rust_decimal_macros::dec;

    #[test]
    fn test_uptrend_alignment_buys() {
        let b = bar(dec!(110));
        let indicators = IndicatorSet::new()
            .with_current_price(110.0)
            .with_sma(105.0, 100.0, 95.0)
            .with_rsi(55.0)
            .with_macd(1.0, 0.5);

        let signal = TrendFollowingStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Buy);
        assert!(signal.reasons.len() >= 3);
    }

    #[test]
    fn test_trend_break_sells() {
        let b = bar(dec!(90));
        let indicators = IndicatorSet::new()
            .with_current_price(90.0)
            .with_sma(95.0, 100.0, 105.0)
            .with_rsi(72.0);

        let signal = TrendFollowingStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Sell);
    }

    #[test]
    fn test_macd_sign_fallback_without_signal_line() {
        let b = bar(dec!(100));
        let mut indicators = IndicatorSet::new();
        indicators.macd = Some(0.4);

        let signal = TrendFollowingStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Buy);
    }
}
