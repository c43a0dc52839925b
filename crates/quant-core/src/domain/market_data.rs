//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 시뮬레이션 입력 타입을 정의합니다:
//! - `PriceBar` - 거래 세션 하나의 OHLCV 데이터
//! - `IndicatorSet` - 봉 하나에 대한 파생 지표 스냅샷

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 거래 세션 하나의 OHLCV 가격 봉.
///
/// 시계열은 타임스탬프 오름차순으로 정렬되어 있어야 합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 세션 타임스탬프
    pub timestamp: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

impl PriceBar {
    /// 새 가격 봉을 생성합니다.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }
}

/// 봉 하나에 대한 파생 지표 스냅샷.
///
/// 모든 필드는 `Option`입니다. 워밍업 기간이 부족하면 해당 지표는
/// 계산되지 않은 상태(`None`)이며, 소비자는 이를 0으로 취급하지 말고
/// 건너뛰어야 합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// 현재가 (보통 봉의 종가)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    /// 20일 단순이동평균
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_20: Option<f64>,
    /// 50일 단순이동평균
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_50: Option<f64>,
    /// 200일 단순이동평균
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_200: Option<f64>,
    /// 20일 지수이동평균
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_20: Option<f64>,
    /// 14일 RSI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi_14: Option<f64>,
    /// MACD 라인
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    /// MACD 시그널 라인
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    /// MACD 히스토그램
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_histogram: Option<f64>,
    /// 스토캐스틱 %K
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stoch_k: Option<f64>,
    /// 스토캐스틱 %D
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stoch_d: Option<f64>,
    /// CCI (Commodity Channel Index)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cci: Option<f64>,
    /// 뉴스/소셜 감성 점수 ([-1, 1])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
}

impl IndicatorSet {
    /// 빈 지표 스냅샷을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재가를 설정합니다.
    pub fn with_current_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    /// 이동평균 값들을 설정합니다.
    pub fn with_sma(mut self, sma_20: f64, sma_50: f64, sma_200: f64) -> Self {
        self.sma_20 = Some(sma_20);
        self.sma_50 = Some(sma_50);
        self.sma_200 = Some(sma_200);
        self
    }

    /// RSI를 설정합니다.
    pub fn with_rsi(mut self, rsi: f64) -> Self {
        self.rsi_14 = Some(rsi);
        self
    }

    /// MACD 값들을 설정합니다.
    pub fn with_macd(mut self, macd: f64, signal: f64) -> Self {
        self.macd = Some(macd);
        self.macd_signal = Some(signal);
        self.macd_histogram = Some(macd - signal);
        self
    }

    /// 스토캐스틱 값들을 설정합니다.
    pub fn with_stochastic(mut self, k: f64, d: f64) -> Self {
        self.stoch_k = Some(k);
        self.stoch_d = Some(d);
        self
    }

    /// CCI를 설정합니다.
    pub fn with_cci(mut self, cci: f64) -> Self {
        self.cci = Some(cci);
        self
    }

    /// 감성 점수를 설정합니다.
    pub fn with_sentiment(mut self, score: f64) -> Self {
        self.sentiment_score = Some(score);
        self
    }
}
