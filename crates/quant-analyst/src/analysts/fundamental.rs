//! 펀더멘털 분석가.
//!
//! 밸류에이션(P/E), 수익성(ROE), 성장성(매출 성장률)을 점수화합니다.
//! 점수 3 이상 매수, 1 이상 관망, 그 외 매도.

use crate::context::AnalystContext;
use crate::delegate::AnalystDelegate;
use crate::verdict::{AnalystRole, AnalystVerdict, Rating};
use async_trait::async_trait;

/// 신뢰도 상한.
const MAX_CONFIDENCE: f64 = 0.9;

/// 펀더멘털 분석가.
#[derive(Debug, Clone, Copy, Default)]
pub struct FundamentalAnalyst;

impl FundamentalAnalyst {
    /// 새 펀더멘털 분석가를 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnalystDelegate for FundamentalAnalyst {
    fn role(&self) -> AnalystRole {
        AnalystRole::Fundamental
    }

    async fn analyze(&self, ctx: &AnalystContext) -> AnalystVerdict {
        let Some(fundamentals) = &ctx.fundamentals else {
            return AnalystVerdict::failed(self.role(), ctx.symbol.clone(), "no fundamental data");
        };

        let mut score = 0u8;
        let mut reasoning: Vec<String> = Vec::new();

        if let Some(pe) = fundamentals.pe_ratio {
            if pe < 25.0 {
                score += 1;
            }
            if pe < 20.0 {
                score += 1;
            }
            reasoning.push(format!(
                "P/E={:.1} ({})",
                pe,
                if pe < 20.0 {
                    "undervalued"
                } else if pe <= 30.0 {
                    "fair"
                } else {
                    "expensive"
                }
            ));
        }

        if let Some(roe) = fundamentals.roe {
            if roe > 0.25 {
                score += 1;
            }
            reasoning.push(format!(
                "ROE={:.1}% ({})",
                roe * 100.0,
                if roe > 0.25 { "strong" } else { "moderate" }
            ));
        }

        if let Some(growth) = fundamentals.revenue_growth {
            if growth > 0.15 {
                score += 1;
            }
            reasoning.push(format!(
                "Revenue growth={:.1}% ({})",
                growth * 100.0,
                if growth > 0.15 { "high" } else { "moderate" }
            ));
        }

        let rating = if score >= 3 {
            Rating::Buy
        } else if score >= 1 {
            Rating::Hold
        } else {
            Rating::Sell
        };
        let confidence = (0.5 + f64::from(score) * 0.1).min(MAX_CONFIDENCE);

        AnalystVerdict::new(self.role(), ctx.symbol.clone(), rating, confidence)
            .with_reasoning(reasoning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Fundamentals;

    fn ctx(pe: f64, roe: f64, growth: f64) -> AnalystContext {
        AnalystContext::new("AAPL").with_fundamentals(Fundamentals {
            pe_ratio: Some(pe),
            roe: Some(roe),
            revenue_growth: Some(growth),
        })
    }

    #[tokio::test]
    async fn test_strong_fundamentals_buy() {
        // 4점 만점: P/E<20(+2), ROE>25%(+1), 성장>15%(+1)
        let verdict = FundamentalAnalyst::new().analyze(&ctx(15.0, 0.30, 0.20)).await;
        assert_eq!(verdict.rating, Rating::Buy);
        assert!((verdict.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_weak_fundamentals_sell() {
        let verdict = FundamentalAnalyst::new().analyze(&ctx(40.0, 0.10, 0.05)).await;
        assert_eq!(verdict.rating, Rating::Sell);
        assert!((verdict.confidence - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_middling_fundamentals_hold() {
        // P/E<25만 충족 (1점)
        let verdict = FundamentalAnalyst::new().analyze(&ctx(23.0, 0.10, 0.05)).await;
        assert_eq!(verdict.rating, Rating::Hold);
        assert!((verdict.confidence - 0.6).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_missing_data_is_failed_verdict() {
        let verdict = FundamentalAnalyst::new()
            .analyze(&AnalystContext::new("AAPL"))
            .await;
        assert!(verdict.is_failed());
    }
}
