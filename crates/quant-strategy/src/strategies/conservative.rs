//! 보수적 다중 조건 전략.
//!
//! 7개 지표 조건을 독립적으로 평가하여 매수/매도 근거를 집계합니다.
//! 매수는 매수 조건 2개 이상과 매도 조건 0개를 동시에 요구하며,
//! 매도는 매도 조건 2개 이상 또는 (매도 1개이면서 매수 0개)일 때
//! 발동합니다. 상충 근거가 있으면 관망합니다.

use crate::traits::{Strategy, StrategySignal};
use quant_core::{IndicatorSet, PriceBar, TradeAction};

/// 보수적 전략.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConservativeStrategy;

impl ConservativeStrategy {
    /// 새 보수적 전략을 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for ConservativeStrategy {
    fn name(&self) -> &str {
        "conservative"
    }

    fn evaluate(&self, bar: &PriceBar, indicators: &IndicatorSet) -> StrategySignal {
        let mut buy_reasons: Vec<String> = Vec::new();
        let mut sell_reasons: Vec<String> = Vec::new();

        if let Some(rsi) = indicators.rsi_14 {
            if rsi < 30.0 {
                buy_reasons.push(format!("RSI oversold ({:.1})", rsi));
            } else if rsi > 70.0 {
                sell_reasons.push(format!("RSI overbought ({:.1})", rsi));
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

        if let (Some(k), Some(d)) = (indicators.stoch_k, indicators.stoch_d) {
            if k < 20.0 && k > d {
                buy_reasons.push("Stochastic oversold cross".to_string());
            } else if k > 80.0 && k < d {
                sell_reasons.push("Stochastic overbought cross".to_string());
            }
        }

        if let Some(cci) = indicators.cci {
            if cci < -100.0 {
                buy_reasons.push(format!("CCI oversold ({:.1})", cci));
            } else if cci > 100.0 {
                sell_reasons.push(format!("CCI overbought ({:.1})", cci));
            }
        }

        if let Some(sentiment) = indicators.sentiment_score {
            if sentiment > 0.5 {
                buy_reasons.push(format!("Strong positive sentiment ({:.2})", sentiment));
            } else if sentiment < -0.5 {
                sell_reasons.push(format!("Strong negative sentiment ({:.2})", sentiment));
            }
        }

        if buy_reasons.len() >= 2 && sell_reasons.is_empty() {
            StrategySignal::new(TradeAction::Buy, buy_reasons)
        } else if sell_reasons.len() >= 2
            || (sell_reasons.len() == 1 && buy_reasons.is_empty())
        {
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
    fn test_buy_requires_two_conditions_and_no_sell() {
        let b = bar(dec!(105));
        // RSI 과매도 + 가격이 SMA20 위
        let indicators = IndicatorSet::new()
            .with_current_price(105.0)
            .with_rsi(25.0)
            .with_sma(100.0, 95.0, 90.0);

        let signal = ConservativeStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Buy);
        assert_eq!(signal.reasons.len(), 2);
    }

    #[test]
    fn test_conflicting_evidence_holds() {
        let b = bar(dec!(95));
        // RSI 과매도(매수)지만 가격이 SMA20 아래(매도)
        let indicators = IndicatorSet::new()
            .with_current_price(95.0)
            .with_rsi(25.0)
            .with_sma(100.0, 95.0, 90.0);

        let signal = ConservativeStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Hold);
    }

    #[test]
    fn test_single_sell_condition_without_buy_sells() {
        let b = bar(dec!(100));
        let indicators = IndicatorSet::new().with_current_price(100.0).with_rsi(75.0);

        let signal = ConservativeStrategy::new().evaluate(&b, &indicators);
        assert_eq!(signal.action, TradeAction::Sell);
        assert_eq!(signal.reasons.len(), 1);
    }

    #[test]
    fn test_absent_indicators_are_skipped() {
        let b = bar(dec!(100));
        let signal = ConservativeStrategy::new().evaluate(&b, &IndicatorSet::new());
        assert_eq!(signal.action, TradeAction::Hold);
        assert!(signal.reasons.is_empty());
    }
}
