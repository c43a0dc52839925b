//! 평균회귀 전략.
//!
//! 가격이 20일 이동평균에서 일정 비율 이상 이탈하거나 RSI가
//! 낮을 때 매수하고, 반대편 이탈에서 매도합니다.

use crate::traits::{Strategy, StrategySignal};
use quant_core::{IndicatorSet, PriceBar, TradeAction};

/// 평균회귀 전략.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanReversionStrategy;

impl MeanReversionStrategy {
    /// 새 평균회귀 전략을 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for MeanReversionStrategy {
    fn name(&self) -> &str {
        "mean_reversion"
    }

    fn evaluate(&self, bar: &PriceBar, indicators: &IndicatorSet) -> StrategySignal {
        let price = super::effective_price(bar, indicators);
        let mut buy_reasons: Vec<String> = Vec::new();
        let mut sell_reasons: Vec<String> = Vec::new();

        if let Some(rsi) = indicators.rsi_14 {
            if rsi < 40.0 {
                buy_reasons.push(format!("RSI low ({:.1})", rsi));
            } else if rsi > 60.0 {
                sell_reasons.push(format!("RSI high ({:.1})", rsi));
            }
        }

        if let (Some(price), Some(sma_20)) = (price, indicators.sma_20) {
            if price <= sma_20 * 0.98 {
                buy_reasons.push("Price stretched below SMA20".to_string());
            } else if price >= sma_20 * 1.02 {
                sell_reasons.push("Price stretched above SMA20".to_string());
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
    fn test_stretch_below_mean_buys() {
        let b = bar(dec!(97));
        let indicators = IndicatorSet::new()
            .with_current_price(97.0)
            .with_sma(100.0, 100.0, 100.0)
            .with_rsi(50.0);

        let signal = MeanReversionStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Buy);
    }

    #[test]
    fn test_stretch_above_mean_sells() {
        let b = bar(dec!(103));
        let indicators = IndicatorSet::new()
            .with_current_price(103.0)
            .with_sma(100.0, 100.0, 100.0)
            .with_rsi(50.0);

        let signal = MeanReversionStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Sell);
    }

    #[test]
    fn test_within_band_holds() {
        let b = bar(dec!(101));
        let indicators = IndicatorSet::new()
            .with_current_price(101.0)
            .with_sma(100.0, 100.0, 100.0)
            .with_rsi(50.0);

        let signal = MeanReversionStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Hold);
    }
}
