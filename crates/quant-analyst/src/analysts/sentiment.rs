//! 감성 분석가.
//!
//! 뉴스/소셜 종합 감성 점수([-1, 1])의 부호와 크기를 등급과
//! 신뢰도로 변환합니다. 임계값은 ±0.3입니다.

use crate::context::AnalystContext;
use crate::delegate::AnalystDelegate;
use crate::verdict::{AnalystRole, AnalystVerdict, Rating};
use async_trait::async_trait;

/// 신뢰도 상한.
const MAX_CONFIDENCE: f64 = 0.9;

/// 감성 분석가.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyst;

impl SentimentAnalyst {
    /// 새 감성 분석가를 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnalystDelegate for SentimentAnalyst {
    fn role(&self) -> AnalystRole {
        AnalystRole::Sentiment
    }

    async fn analyze(&self, ctx: &AnalystContext) -> AnalystVerdict {
        let Some(score) = ctx.sentiment else {
            return AnalystVerdict::failed(self.role(), ctx.symbol.clone(), "no sentiment data");
        };

        let (rating, confidence) = if score > 0.3 {
            (Rating::Buy, (0.6 + score * 0.4).min(MAX_CONFIDENCE))
        } else if score < -0.3 {
            (Rating::Sell, (0.6 + score.abs() * 0.4).min(MAX_CONFIDENCE))
        } else {
            (Rating::Hold, 0.5)
        };

        let tone = if score > 0.3 {
            "positive"
        } else if score < -0.3 {
            "negative"
        } else {
            "neutral"
        };

        AnalystVerdict::new(self.role(), ctx.symbol.clone(), rating, confidence)
            .with_reasoning(vec![format!("Composite sentiment={:.2} ({})", score, tone)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_positive_sentiment_buys() {
        let ctx = AnalystContext::new("AAPL").with_sentiment(0.5);
        let verdict = SentimentAnalyst::new().analyze(&ctx).await;
        assert_eq!(verdict.rating, Rating::Buy);
        assert!((verdict.confidence - 0.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_strong_negative_sentiment_caps_confidence() {
        let ctx = AnalystContext::new("AAPL").with_sentiment(-0.9);
        let verdict = SentimentAnalyst::new().analyze(&ctx).await;
        assert_eq!(verdict.rating, Rating::Sell);
        assert!((verdict.confidence - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_neutral_band_holds() {
        let ctx = AnalystContext::new("AAPL").with_sentiment(0.2);
        let verdict = SentimentAnalyst::new().analyze(&ctx).await;
        assert_eq!(verdict.rating, Rating::Hold);
        assert!((verdict.confidence - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_missing_sentiment_failed() {
        let verdict = SentimentAnalyst::new()
            .analyze(&AnalystContext::new("AAPL"))
            .await;
        assert!(verdict.is_failed());
    }
}
