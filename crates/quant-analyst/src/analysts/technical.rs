//! 기술적 분석가.
//!
//! 추세 정렬(SMA50 vs SMA200, 가격 vs SMA50)과 RSI 모멘텀을
//! 결합하여 등급을 판정합니다.

use crate::context::AnalystContext;
use crate::delegate::AnalystDelegate;
use crate::verdict::{AnalystRole, AnalystVerdict, Rating};
use async_trait::async_trait;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// 기술적 분석가.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicalAnalyst;

impl TechnicalAnalyst {
    /// 새 기술적 분석가를 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnalystDelegate for TechnicalAnalyst {
    fn role(&self) -> AnalystRole {
        AnalystRole::Technical
    }

    async fn analyze(&self, ctx: &AnalystContext) -> AnalystVerdict {
        let Some(indicators) = &ctx.indicators else {
            return AnalystVerdict::failed(self.role(), ctx.symbol.clone(), "no technical data");
        };

        let price = indicators.current_price.unwrap_or(0.0);
        let sma_50 = indicators.sma_50;
        let sma_200 = indicators.sma_200;
        let rsi = indicators.rsi_14.unwrap_or(50.0);

        let uptrend = matches!((sma_50, sma_200), (Some(s50), Some(s200)) if s50 > s200);
        let above_sma50 = matches!(sma_50, Some(s50) if price > s50);
        let oversold = rsi < 30.0;
        let overbought = rsi > 70.0;

        let (rating, confidence) = if uptrend && above_sma50 && !overbought {
            (Rating::Buy, 0.7)
        } else if overbought {
            (Rating::Sell, 0.6)
        } else if oversold && uptrend {
            (Rating::Buy, 0.65)
        } else {
            (Rating::Hold, 0.5)
        };

        let reasoning = vec![
            format!(
                "Trend: {}",
                if uptrend { "up (SMA50 > SMA200)" } else { "down/sideways" }
            ),
            format!(
                "RSI={:.1} ({})",
                rsi,
                if oversold {
                    "oversold"
                } else if overbought {
                    "overbought"
                } else {
                    "neutral"
                }
            ),
            format!(
                "Price {} SMA50",
                if above_sma50 { "above" } else { "below" }
            ),
        ];

        let mut verdict = AnalystVerdict::new(self.role(), ctx.symbol.clone(), rating, confidence)
            .with_reasoning(reasoning);
        if let Some(s50) = sma_50.and_then(Decimal::from_f64) {
            verdict = verdict.with_support_level(s50);
        }
        verdict
    }
}
