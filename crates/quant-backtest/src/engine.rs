//! 백테스트 시뮬레이션 엔진.
//!
//! 심볼 하나의 시계열을 봉 단위로 순회하며 전략 신호를 체결하는
//! 단일 롱/플랫 상태 머신입니다.
//!
//! # 체결 규칙
//!
//! - 플랫 + 매수 신호: 봉 종가로 전액 진입 (수량 = 자본 / 종가)
//! - 롱 + 매도 신호: 봉 종가로 전량 청산, 분수 수익률을 자본에 곱셈 적용
//! - 그 외 조합은 무시
//! - 시뮬레이션 종료 시 미청산 포지션은 강제 청산하지 않고
//!   시가평가로 최종 자산에 반영
//!
//! 시뮬레이션 로직에는 난수도 벽시계도 없으므로 동일 입력은
//! 항상 동일한 리포트를 만듭니다.

use chrono::{DateTime, Utc};
use quant_core::{EquityPoint, IndicatorSet, Position, PriceBar, Trade, TradeAction};
use quant_strategy::Strategy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::performance::PerformanceMetrics;

/// 백테스트 오류.
#[derive(Debug, Error)]
pub enum BacktestError {
    /// 설정 오류
    #[error("백테스트 설정 오류: {0}")]
    Config(String),

    /// 데이터 오류 (정렬 위반 등)
    #[error("데이터 오류: {0}")]
    Data(String),

    /// 데이터 부족
    #[error("데이터 부족: 최소 {required}개 봉 필요, {actual}개 수신")]
    InsufficientData { required: usize, actual: usize },

    /// 실행 취소됨
    #[error("백테스트가 취소되었습니다")]
    Cancelled,
}

/// 백테스트 결과 타입.
pub type BacktestResult<T> = Result<T, BacktestError>;

/// 백테스트 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// 초기 자본금
    #[serde(default = "default_initial_capital")]
    pub initial_capital: Decimal,

    /// 시뮬레이션에 필요한 최소 봉 개수
    #[serde(default = "default_min_bars")]
    pub min_bars: usize,

    /// 리포트에 포함할 최근 거래 수
    #[serde(default = "default_max_recent_trades")]
    pub max_recent_trades: usize,

    /// 손절 비율 (진입가 대비 분수, 예: 0.05 = -5%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss_pct: Option<Decimal>,

    /// 익절 비율 (진입가 대비 분수, 예: 0.15 = +15%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit_pct: Option<Decimal>,

    /// 무위험 이자율 (연율, 샤프 비율 계산용)
    #[serde(default)]
    pub risk_free_rate: f64,
}

// 설정 기본값 함수들 (serde default용)
fn default_initial_capital() -> Decimal {
    Decimal::new(100_000, 0)
}
fn default_min_bars() -> usize {
    60
}
fn default_max_recent_trades() -> usize {
    10
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: default_initial_capital(),
            min_bars: default_min_bars(),
            max_recent_trades: default_max_recent_trades(),
            stop_loss_pct: None,
            take_profit_pct: None,
            risk_free_rate: 0.0,
        }
    }
}

impl BacktestConfig {
    /// 새 백테스트 설정을 생성합니다.
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            ..Default::default()
        }
    }

    /// 최소 봉 개수 설정.
    pub fn with_min_bars(mut self, min_bars: usize) -> Self {
        self.min_bars = min_bars;
        self
    }

    /// 손절/익절 오버레이 설정.
    pub fn with_stop_take(mut self, stop_loss_pct: Decimal, take_profit_pct: Decimal) -> Self {
        self.stop_loss_pct = Some(stop_loss_pct);
        self.take_profit_pct = Some(take_profit_pct);
        self
    }

    /// 무위험 이자율 설정.
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// 설정 유효성을 검사합니다.
    pub fn validate(&self) -> BacktestResult<()> {
        if self.initial_capital <= Decimal::ZERO {
            return Err(BacktestError::Config(
                "initial_capital must be positive".to_string(),
            ));
        }
        if self.min_bars < 2 {
            return Err(BacktestError::Config(
                "min_bars must be at least 2".to_string(),
            ));
        }
        for (name, pct) in [
            ("stop_loss_pct", self.stop_loss_pct),
            ("take_profit_pct", self.take_profit_pct),
        ] {
            if let Some(p) = pct {
                if p <= Decimal::ZERO || p >= Decimal::ONE {
                    return Err(BacktestError::Config(format!(
                        "{} must be within (0, 1)",
                        name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl From<&quant_core::BacktestSettings> for BacktestConfig {
    fn from(settings: &quant_core::BacktestSettings) -> Self {
        Self {
            initial_capital: settings.initial_capital,
            min_bars: settings.min_bars,
            max_recent_trades: settings.max_recent_trades,
            stop_loss_pct: settings.stop_loss_pct,
            take_profit_pct: settings.take_profit_pct,
            risk_free_rate: settings.risk_free_rate,
        }
    }
}

/// 백테스트 리포트.
///
/// 거래 카운터는 전체 원장 기준으로 계산되며, `trades`에는
/// 가장 최근 `max_recent_trades`개만 담깁니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// 심볼
    pub symbol: String,
    /// 시작 시점
    pub start_date: DateTime<Utc>,
    /// 종료 시점
    pub end_date: DateTime<Utc>,
    /// 봉 개수
    pub bar_count: usize,
    /// 초기 자본금
    pub initial_capital: Decimal,
    /// 최종 자산 (시가평가)
    pub final_equity: Decimal,
    /// 성과 지표
    pub metrics: PerformanceMetrics,
    /// 총 체결 수 (매수 + 매도)
    pub trade_count: usize,
    /// 완료된 매수-매도 왕복 수
    pub completed_rounds: usize,
    /// 최근 거래 기록
    pub trades: Vec<Trade>,
    /// 자산 곡선
    pub equity_curve: Vec<EquityPoint>,
}

impl BacktestReport {
    /// 사람이 읽기 쉬운 요약 블록을 만듭니다.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{:=<60}\n", ""));
        out.push_str(&format!("Backtest Report - {}\n", self.symbol));
        out.push_str(&format!("{:=<60}\n", ""));
        out.push_str(&format!(
            "Period: {} ~ {} ({} bars)\n",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
            self.bar_count
        ));
        out.push_str(&format!(
            "Capital: {} -> {}\n",
            self.initial_capital, self.final_equity
        ));
        out.push_str(&format!(
            "Total return: {:+.2}%  CAGR: {:+.2}%\n",
            self.metrics.total_return_pct, self.metrics.cagr_pct
        ));
        out.push_str(&format!(
            "Max drawdown: {:.2}%  Sharpe: {:.2}\n",
            self.metrics.max_drawdown_pct, self.metrics.sharpe_ratio
        ));
        out.push_str(&format!(
            "Win rate: {:.1}%  Profit factor: {}\n",
            self.metrics.win_rate_pct,
            self.metrics
                .profit_factor
                .map(|pf| format!("{:.2}", pf))
                .unwrap_or_else(|| "inf".to_string())
        ));
        out.push_str(&format!(
            "Trades: {} ({} completed rounds, avg holding {:.1} days)\n",
            self.trade_count, self.completed_rounds, self.metrics.avg_holding_days
        ));
        out.push_str(&format!("{:=<60}", ""));
        out
    }
}

/// 백테스트 엔진.
#[derive(Debug, Clone, Default)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    /// 새 백테스트 엔진을 생성합니다.
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// 엔진 설정.
    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// 시계열 하나에 대해 백테스트를 실행합니다.
    pub fn run(
        &self,
        symbol: &str,
        series: &[(PriceBar, IndicatorSet)],
        strategy: &dyn Strategy,
    ) -> BacktestResult<BacktestReport> {
        self.run_cancellable(symbol, series, strategy, &CancellationToken::new())
    }

    /// 취소 토큰을 받는 백테스트 실행.
    ///
    /// 토큰이 취소되면 다음 봉 경계에서 `BacktestError::Cancelled`로
    /// 중단합니다. 원장과 자산 곡선은 봉 단위로만 갱신되므로 부분
    /// 체결 상태는 남지 않습니다.
    pub fn run_cancellable(
        &self,
        symbol: &str,
        series: &[(PriceBar, IndicatorSet)],
        strategy: &dyn Strategy,
        cancel: &CancellationToken,
    ) -> BacktestResult<BacktestReport> {
        self.config.validate()?;

        if series.is_empty() {
            return Err(BacktestError::Data("empty series".to_string()));
        }
        if series.len() < self.config.min_bars {
            return Err(BacktestError::InsufficientData {
                required: self.config.min_bars,
                actual: series.len(),
            });
        }
        for window in series.windows(2) {
            if window[1].0.timestamp <= window[0].0.timestamp {
                return Err(BacktestError::Data(
                    "series is not strictly time-ordered".to_string(),
                ));
            }
        }

        let span = quant_core::simulation_span!("backtest", symbol, strategy.name());
        let _guard = span.enter();

        info!(bars = series.len(), "Starting backtest");

        let mut capital = self.config.initial_capital;
        let mut position = Position::Flat;
        let mut trades: Vec<Trade> = Vec::new();
        let mut equity_curve: Vec<EquityPoint> = Vec::with_capacity(series.len());

        for (bar, indicators) in series {
            if cancel.is_cancelled() {
                return Err(BacktestError::Cancelled);
            }

            let mut action = strategy.evaluate(bar, indicators).action;

            // 손절/익절 오버레이 (설정 시, 전략 신호에 우선)
            if let Position::Long { entry_price, .. } = position {
                if let Some(sl) = self.config.stop_loss_pct {
                    if bar.close <= entry_price * (Decimal::ONE - sl) {
                        debug!(entry = %entry_price, close = %bar.close, "Stop loss triggered");
                        action = TradeAction::Sell;
                    }
                }
                if let Some(tp) = self.config.take_profit_pct {
                    if bar.close >= entry_price * (Decimal::ONE + tp) {
                        debug!(entry = %entry_price, close = %bar.close, "Take profit triggered");
                        action = TradeAction::Sell;
                    }
                }
            }

            match (position, action) {
                (Position::Flat, TradeAction::Buy) if bar.close > Decimal::ZERO => {
                    let shares = capital / bar.close;
                    trades.push(Trade::buy(bar.timestamp, bar.close, shares));
                    position = Position::Long {
                        entry_price: bar.close,
                        shares,
                        entry_date: bar.timestamp,
                    };
                }
                (Position::Long { entry_price, shares, .. }, TradeAction::Sell)
                    if entry_price > Decimal::ZERO =>
                {
                    let pnl = (bar.close - entry_price) / entry_price;
                    capital *= Decimal::ONE + pnl;
                    trades.push(Trade::sell(bar.timestamp, bar.close, shares, pnl));
                    position = Position::Flat;
                }
                _ => {}
            }

            let equity = match position {
                Position::Long { shares, .. } => shares * bar.close,
                Position::Flat => capital,
            };
            equity_curve.push(EquityPoint {
                date: bar.timestamp,
                equity,
            });
        }

        // 미청산 포지션은 시가평가로만 반영
        let final_equity = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.config.initial_capital);

        let metrics = PerformanceMetrics::evaluate(
            &equity_curve,
            &trades,
            self.config.initial_capital,
            self.config.risk_free_rate,
        );

        let trade_count = trades.len();
        let buys = trades.iter().filter(|t| t.pnl.is_none()).count();
        let sells = trade_count - buys;
        let completed_rounds = buys.min(sells);

        let recent_start = trade_count.saturating_sub(self.config.max_recent_trades);
        let recent_trades = trades[recent_start..].to_vec();

        info!(
            final_equity = %final_equity,
            trades = trade_count,
            return_pct = metrics.total_return_pct,
            "Backtest completed"
        );

        Ok(BacktestReport {
            symbol: symbol.to_string(),
            start_date: series[0].0.timestamp,
            end_date: series[series.len() - 1].0.timestamp,
            bar_count: series.len(),
            initial_capital: self.config.initial_capital,
            final_equity,
            metrics,
            trade_count,
            completed_rounds,
            trades: recent_trades,
            equity_curve,
        })
    }
}
