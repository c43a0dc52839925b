//! 분석가 의견 타입.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 분석가 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalystRole {
    /// 펀더멘털 분석
    Fundamental,
    /// 기술적 분석
    Technical,
    /// 감성 분석
    Sentiment,
    /// 리스크 관리
    Risk,
}

impl std::fmt::Display for AnalystRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AnalystRole::Fundamental => "fundamental",
            AnalystRole::Technical => "technical",
            AnalystRole::Sentiment => "sentiment",
            AnalystRole::Risk => "risk",
        };
        f.write_str(s)
    }
}

/// 분석가 등급 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rating {
    /// 매수
    Buy,
    /// 관망
    Hold,
    /// 매도
    Sell,
}

/// 리스크 수준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// 낮음
    Low,
    /// 중간
    Medium,
    /// 높음
    High,
}

/// 분석가 한 명의 의견.
///
/// 위임 실패는 예외가 아니라 `error`가 채워진 의견으로 표현됩니다.
/// 신뢰도는 생성 시점에 [0, 1]로 클램프됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystVerdict {
    /// 의견 ID
    pub id: Uuid,
    /// 분석가 역할
    pub role: AnalystRole,
    /// 심볼
    pub symbol: String,
    /// 등급 판정
    pub rating: Rating,
    /// 신뢰도 [0, 1]
    pub confidence: f64,
    /// 판단 근거
    pub reasoning: Vec<String>,
    /// 목표 주가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_price: Option<Decimal>,
    /// 지지선
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_level: Option<Decimal>,
    /// 저항선
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance_level: Option<Decimal>,
    /// 리스크 수준 (리스크 분석가)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    /// 포지션 한도 (계좌 대비 분수, 리스크 분석가)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_limit: Option<f64>,
    /// 권고 손절가 (리스크 분석가)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    /// 권고 익절가 (리스크 분석가)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    /// 실패 사유 (실패한 의견에만)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 생성 시점
    pub timestamp: DateTime<Utc>,
}

impl AnalystVerdict {
    /// 새 의견을 생성합니다. 신뢰도는 [0, 1]로 클램프됩니다.
    pub fn new(
        role: AnalystRole,
        symbol: impl Into<String>,
        rating: Rating,
        confidence: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            symbol: symbol.into(),
            rating,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: Vec::new(),
            target_price: None,
            support_level: None,
            resistance_level: None,
            risk_level: None,
            position_limit: None,
            stop_loss: None,
            take_profit: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// 실패한 의견을 생성합니다 (관망, 신뢰도 0, 실패 사유 기록).
    pub fn failed(role: AnalystRole, symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut verdict = Self::new(role, symbol, Rating::Hold, 0.0);
        verdict.error = Some(reason.into());
        verdict
    }

    /// 판단 근거를 추가합니다.
    pub fn with_reasoning(mut self, reasoning: Vec<String>) -> Self {
        self.reasoning = reasoning;
        self
    }

    /// 지지선을 설정합니다.
    pub fn with_support_level(mut self, level: Decimal) -> Self {
        self.support_level = Some(level);
        self
    }

    /// 목표 주가를 설정합니다.
    pub fn with_target_price(mut self, price: Decimal) -> Self {
        self.target_price = Some(price);
        self
    }

    /// 리스크 권고를 설정합니다.
    pub fn with_risk_guidance(
        mut self,
        risk_level: RiskLevel,
        position_limit: f64,
        stop_loss: Decimal,
        take_profit: Decimal,
    ) -> Self {
        self.risk_level = Some(risk_level);
        self.position_limit = Some(position_limit.clamp(0.0, 1.0));
        self.stop_loss = Some(stop_loss);
        self.take_profit = Some(take_profit);
        self
    }

    /// 실패한 의견인지 확인합니다.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
