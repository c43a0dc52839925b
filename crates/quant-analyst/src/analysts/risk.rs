//! 리스크 분석가.
//!
//! 거시 체제에서 리스크 수준과 포지션 한도를 결정하고,
//! 현재가 기준 손절/익절 권고가를 계산합니다. 리스크 의견은
//! 방향 투표에 참여하지 않고 위원회의 사이징 입력이 됩니다.

use crate::context::AnalystContext;
use crate::delegate::AnalystDelegate;
use crate::verdict::{AnalystRole, AnalystVerdict, Rating, RiskLevel};
use async_trait::async_trait;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// 리스크 분석가.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAnalyst;

impl RiskAnalyst {
    /// 새 리스크 분석가를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    fn guidance_for(regime: &str) -> (RiskLevel, f64) {
        let lowered = regime.to_lowercase();
        if lowered.contains("recession") {
            (RiskLevel::High, 0.10)
        } else if lowered.contains("bear") {
            (RiskLevel::High, 0.15)
        } else if lowered.contains("bull") {
            (RiskLevel::Low, 0.40)
        } else {
            (RiskLevel::Medium, 0.25)
        }
    }
}

#[async_trait]
impl AnalystDelegate for RiskAnalyst {
    fn role(&self) -> AnalystRole {
        AnalystRole::Risk
    }

    async fn analyze(&self, ctx: &AnalystContext) -> AnalystVerdict {
        let regime = ctx.macro_regime.as_deref().unwrap_or("unknown");
        let (risk_level, position_limit) = Self::guidance_for(regime);

        let price = ctx
            .indicators
            .as_ref()
            .and_then(|i| i.current_price)
            .and_then(Decimal::from_f64);
        let Some(price) = price.filter(|p| *p > Decimal::ZERO) else {
            return AnalystVerdict::failed(self.role(), ctx.symbol.clone(), "no current price");
        };

        let stop_loss = price * Decimal::new(92, 2);
        let take_profit = price * Decimal::new(115, 2);

        AnalystVerdict::new(self.role(), ctx.symbol.clone(), Rating::Hold, 0.8)
            .with_reasoning(vec![
                format!("Market regime: {}", regime),
                format!("Recommended position limit: {:.0}%", position_limit * 100.0),
            ])
            .with_risk_guidance(risk_level, position_limit, stop_loss, take_profit)
    }
}
