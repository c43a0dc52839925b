//! 돌파 전략.
//!
//! 가격이 50일 이동평균 위로 올라서거나 RSI 모멘텀이 중립을
//! 넘으면 매수하고, 이동평균 대비 5% 하향 이탈 또는 모멘텀
//! 소멸에서 매도합니다.

use crate::traits::{Strategy, StrategySignal};
use quant_core::{IndicatorSet, PriceBar, TradeAction};

/// 돌파 전략.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakoutStrategy;

impl BreakoutStrategy {
    /// 새 돌파 전략을 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for BreakoutStrategy {
    fn name(&self) -> &str {
        "breakout"
    }

    fn evaluate(&self, bar: &PriceBar, indicators: &IndicatorSet) -> StrategySignal {
        let price = super::effective_price(bar, indicators);
        let mut buy_reasons: Vec<String> = Vec::new();
        let mut sell_reasons: Vec<String> = Vec::new();

        if let (Some(price), Some(sma_50)) = (price, indicators.sma_50) {
            if price > sma_50 {
                buy_reasons.push("Price broke above SMA50".to_string());
            } else if price < sma_50 * 0.95 {
                sell_reasons.push("Price broke below SMA50 band".to_string());
            }
        }

        if let Some(rsi) = indicators.rsi_14 {
            if rsi > 50.0 {
                buy_reasons.push(format!("RSI momentum ({:.1})", rsi));
            } else if rsi < 40.0 {
                sell_reasons.push(format!("RSI momentum lost ({:.1})", rsi));
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
