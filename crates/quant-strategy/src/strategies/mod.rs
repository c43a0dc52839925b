//! 전략 변형 구현.

pub mod breakout;
pub mod conservative;
pub mod defensive;
pub mod mean_reversion;
pub mod relaxed;
pub mod trend_following;

pub use breakout::BreakoutStrategy;
pub use conservative::ConservativeStrategy;
pub use defensive::DefensiveStrategy;
pub use mean_reversion::MeanReversionStrategy;
pub use relaxed::RelaxedStrategy;
pub use trend_following::TrendFollowingStrategy;

use quant_core::{IndicatorSet, PriceBar};
use rust_decimal::prelude::ToPrimitive;

/// 평가에 사용할 현재가.
///
/// 지표 스냅샷의 `current_price`를 우선하고, 없으면 봉 종가를 사용합니다.
pub(crate) fn effective_price(bar: &PriceBar, indicators: &IndicatorSet) -> Option<f64> {
    indicators.current_price.or_else(|| bar.close.to_f64())
}
