//! 완화된 다중 조건 전략.
//!
//! 보수적 전략과 같은 지표 축(RSI, MACD, SMA20)을 사용하지만
//! 임계값이 느슨하고(RSI 40/60) 조건 1개만으로 행동합니다.
//! 매수 근거를 먼저 평가합니다.

use crate::traits::{Strategy, StrategySignal};
use quant_core::{IndicatorSet, PriceBar, TradeAction};

/// 완화된 전략.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelaxedStrategy;

impl RelaxedStrategy {
    /// 새 완화된 전략을 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for RelaxedStrategy {
    fn name(&self) -> &str {
        "relaxed"
    }

    fn evaluate(&self, bar: &PriceBar, indicators: &IndicatorSet) -> StrategySignal {
        let mut buy_reasons: Vec<String> = Vec::new();
        let mut sell_reasons: Vec<String> = Vec::new();

        if let Some(rsi) = indicators.rsi_14 {
            if rsi < 40.0 {
                buy_reasons.push(format!("RSI low ({:.1})", rsi));
            } else if rsi > 60.0 {
                sell_reasons.push(format!("RSI high ({:.1})", rsi));
            }
        }

        if let (Some(macd), Some(signal)) = (indicators.macd, indicators.macd_signal) {
            if macd > signal {
                buy_reasons.push("MACD above signal line".to_string());
            } else if macd < signal {
                sell_reasons.push("MACD below signal line".to_string());
            }
        }

        if let Some(price) = super::effective_price(bar, indicators) {
            if let Some(sma_20) = indicators.sma_20 {
                if price > sma_20 {
                    buy_reasons.push("Price above SMA20".to_string());
                } else if price < sma_20 {
                    sell_reasons.push("Price below SMA20".to_string());
                }
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
