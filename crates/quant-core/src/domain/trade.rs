//! 거래 기록 및 포지션 상태.
//!
//! 이 모듈은 시뮬레이션 원장 관련 타입을 정의합니다:
//! - `TradeAction` - 전략이 봉마다 내는 판단
//! - `Side` - 체결된 거래의 방향
//! - `Trade` - 개별 체결 기록 (추가 전용 원장 항목)
//! - `Position` - 심볼당 단일 롱/플랫 포지션
//! - `EquityPoint` - 봉별 시가평가 자산

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 전략이 봉 하나를 평가하여 내는 판단.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    /// 매수
    Buy,
    /// 매도
    Sell,
    /// 관망
    Hold,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
            TradeAction::Hold => write!(f, "HOLD"),
        }
    }
}

/// 체결된 거래의 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// 체결된 거래 기록.
///
/// 원장은 추가 전용입니다. `pnl`은 매도 시에만 기록되며
/// 진입가 대비 분수 수익률입니다 (예: 0.05 = +5%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// 내부 거래 ID
    pub id: Uuid,
    /// 체결 시점 (봉 타임스탬프)
    pub date: DateTime<Utc>,
    /// 거래 방향
    pub side: Side,
    /// 체결 가격 (봉 종가)
    pub price: Decimal,
    /// 체결 수량
    pub shares: Decimal,
    /// 체결 금액 (가격 × 수량)
    pub value: Decimal,
    /// 분수 수익률 (매도 시에만)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnl: Option<Decimal>,
}

impl Trade {
    /// 매수 기록을 생성합니다.
    pub fn buy(date: DateTime<Utc>, price: Decimal, shares: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            side: Side::Buy,
            price,
            shares,
            value: price * shares,
            pnl: None,
        }
    }

    /// 매도 기록을 생성합니다.
    pub fn sell(date: DateTime<Utc>, price: Decimal, shares: Decimal, pnl: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            side: Side::Sell,
            price,
            shares,
            value: price * shares,
            pnl: Some(pnl),
        }
    }

    /// 수익 거래인지 확인합니다.
    pub fn is_winning(&self) -> bool {
        self.pnl.map(|p| p > Decimal::ZERO).unwrap_or(false)
    }
}

/// 심볼 시뮬레이션당 하나뿐인 포지션 상태.
///
/// 공매도와 부분 청산은 지원하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Position {
    /// 무포지션
    Flat,
    /// 롱 포지션
    Long {
        /// 진입 가격
        entry_price: Decimal,
        /// 보유 수량
        shares: Decimal,
        /// 진입 시점
        entry_date: DateTime<Utc>,
    },
}

impl Position {
    /// 포지션 보유 여부를 확인합니다.
    pub fn is_long(&self) -> bool {
        matches!(self, Position::Long { .. })
    }
}

/// 봉별 시가평가 자산 포인트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// 봉 타임스탬프
    pub date: DateTime<Utc>,
    /// 시가평가 자산 (현금 + 보유 주식 평가액)
    pub equity: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_buy_trade_has_no_pnl() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        let trade = Trade::buy(ts, dec!(100), dec!(10));

        assert_eq!(trade.side, Side::Buy);
        assert_eq!(trade.value, dec!(1000));
        assert!(trade.pnl.is_none());
        assert!(!trade.is_winning());
    }

    #[test]
    fn test_sell_trade_pnl() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap();
        let trade = Trade::sell(ts, dec!(110), dec!(10), dec!(0.10));

        assert_eq!(trade.pnl, Some(dec!(0.10)));
        assert!(trade.is_winning());
    }

    #[test]
    fn test_position_state() {
        let flat = Position::Flat;
        assert!(!flat.is_long());

        let ts = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        let long = Position::Long {
            entry_price: dec!(100),
            shares: dec!(10),
            entry_date: ts,
        };
        assert!(long.is_long());
    }

    #[test]
    fn test_trade_action_serde_format() {
        let json = serde_json::to_string(&TradeAction::Buy).unwrap();
        assert_eq!(json, "\"BUY\"");

        let parsed: TradeAction = serde_json::from_str("\"HOLD\"").unwrap();
        assert_eq!(parsed, TradeAction::Hold);
    }
}
