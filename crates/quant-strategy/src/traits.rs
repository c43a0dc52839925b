//! 전략 트레이트 및 신호 타입.

use quant_core::{IndicatorSet, PriceBar, TradeAction};
use serde::{Deserialize, Serialize};

/// 전략이 봉 하나를 평가한 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySignal {
    /// 판단 (매수/매도/관망)
    pub action: TradeAction,
    /// 판단 근거 (충족된 조건 설명)
    pub reasons: Vec<String>,
}

impl StrategySignal {
    /// 신호를 생성합니다.
    pub fn new(action: TradeAction, reasons: Vec<String>) -> Self {
        Self { action, reasons }
    }

    /// 관망 신호를 생성합니다.
    pub fn hold() -> Self {
        Self {
            action: TradeAction::Hold,
            reasons: Vec::new(),
        }
    }
}

/// 봉 단위 전략 평가 트레이트.
///
/// 구현체는 순수해야 합니다: 동일한 입력에 대해 항상 동일한 신호를
/// 반환하며 내부 상태를 갖지 않습니다. 계산되지 않은 지표(`None`)는
/// 조건 실패가 아니라 해당 조건을 건너뛰는 것으로 처리합니다.
pub trait Strategy: Send + Sync {
    /// 전략 이름.
    fn name(&self) -> &str;

    /// 봉 하나와 지표 스냅샷을 평가하여 신호를 반환합니다.
    fn evaluate(&self, bar: &PriceBar, indicators: &IndicatorSet) -> StrategySignal;
}
