//! 분석 입력 번들.

use quant_core::IndicatorSet;
use serde::{Deserialize, Serialize};

/// 펀더멘털 지표.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// 주가수익비율 (P/E)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    /// 자기자본이익률 (ROE, 분수)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roe: Option<f64>,
    /// 매출 성장률 (분수)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_growth: Option<f64>,
}

/// 심볼 하나에 대한 분석 입력 번들.
///
/// 각 분석가는 자신이 필요한 섹션만 읽습니다. 섹션이 없으면
/// 해당 분석가는 실패 의견을 반환하고 파이프라인은 계속됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalystContext {
    /// 심볼
    pub symbol: String,
    /// 펀더멘털 지표
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundamentals: Option<Fundamentals>,
    /// 기술적 지표 스냅샷
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSet>,
    /// 감성 종합 점수 ([-1, 1])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f64>,
    /// 거시 체제 레이블 (예: "bull", "bear", "recession")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_regime: Option<String>,
}

impl AnalystContext {
    /// 새 컨텍스트를 생성합니다.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// 펀더멘털을 설정합니다.
    pub fn with_fundamentals(mut self, fundamentals: Fundamentals) -> Self {
        self.fundamentals = Some(fundamentals);
        self
    }

    /// 기술적 지표를 설정합니다.
    pub fn with_indicators(mut self, indicators: IndicatorSet) -> Self {
        self.indicators = Some(indicators);
        self
    }

    /// 감성 점수를 설정합니다.
    pub fn with_sentiment(mut self, score: f64) -> Self {
        self.sentiment = Some(score);
        self
    }

    /// 거시 체제를 설정합니다.
    pub fn with_macro_regime(mut self, regime: impl Into<String>) -> Self {
        self.macro_regime = Some(regime.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_roundtrip() {
        let ctx = AnalystContext::new("AAPL")
            .with_sentiment(0.4)
            .with_macro_regime("bull");

        let json = serde_json::to_string(&ctx).unwrap();
        let parsed: AnalystContext = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.symbol, "AAPL");
        assert_eq!(parsed.sentiment, Some(0.4));
        assert!(parsed.fundamentals.is_none());
    }
}
