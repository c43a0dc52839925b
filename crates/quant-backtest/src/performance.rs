//! 성과 지표 계산 모듈.
//!
//! 자산 곡선과 거래 원장에서 성과 지표를 계산합니다:
//! - 총 수익률 / 연환산 수익률 (CAGR)
//! - 최대 낙폭 (항상 0 이상인 백분율)
//! - 샤프 비율 (자산 곡선의 일간 수익률 기준, 252일 연율화)
//! - 승률, 손익비, 평균 보유 기간
//!
//! 분모가 0이 되는 모든 경로(거래 없음, 변동 없음)는 0 또는
//! `None`으로 수렴하며 절대 패닉하지 않습니다.

use quant_core::{EquityPoint, Side, Trade};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 연간 거래일 수 (연율화 계산에 사용).
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// 성과 지표.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// 총 수익률 (%)
    pub total_return_pct: f64,
    /// 연환산 수익률 (%)
    pub cagr_pct: f64,
    /// 최대 낙폭 (%, 항상 >= 0)
    pub max_drawdown_pct: f64,
    /// 샤프 비율
    pub sharpe_ratio: f64,
    /// 승률 (%, 완료된 매도 기준)
    pub win_rate_pct: f64,
    /// 손익비 (손실 거래가 없으면 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_factor: Option<f64>,
    /// 평균 보유 기간 (일)
    pub avg_holding_days: f64,
    /// 완료된 매도 수
    pub completed_sells: usize,
    /// 수익 매도 수
    pub winning_sells: usize,
}

impl PerformanceMetrics {
    /// 자산 곡선과 거래 원장에서 지표를 계산합니다.
    pub fn evaluate(
        equity_curve: &[EquityPoint],
        trades: &[Trade],
        initial_capital: Decimal,
        risk_free_rate: f64,
    ) -> Self {
        let mut metrics = Self::default();
        if equity_curve.is_empty() || initial_capital <= Decimal::ZERO {
            return metrics;
        }

        let initial = initial_capital.to_f64().unwrap_or(0.0);
        let equity: Vec<f64> = equity_curve
            .iter()
            .map(|p| p.equity.to_f64().unwrap_or(0.0))
            .collect();
        let final_value = equity[equity.len() - 1];

        if initial > 0.0 {
            metrics.total_return_pct = (final_value - initial) / initial * 100.0;
        }

        // CAGR (252 거래일 연환산)
        let years = equity.len() as f64 / TRADING_DAYS_PER_YEAR;
        if years > 0.0 && final_value > 0.0 && initial > 0.0 {
            metrics.cagr_pct = ((final_value / initial).powf(1.0 / years) - 1.0) * 100.0;
        }

        metrics.max_drawdown_pct = max_drawdown_pct(&equity);

        // 일간 수익률 기반 샤프 비율
        let daily_returns: Vec<f64> = equity
            .windows(2)
            .filter(|w| w[0] > 0.0)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect();
        metrics.sharpe_ratio = sharpe_ratio(&daily_returns, risk_free_rate);

        // 거래 분석 (분수 수익률 기준)
        let sells: Vec<&Trade> = trades.iter().filter(|t| t.side == Side::Sell).collect();
        metrics.completed_sells = sells.len();
        metrics.winning_sells = sells.iter().filter(|t| t.is_winning()).count();
        if !sells.is_empty() {
            metrics.win_rate_pct =
                metrics.winning_sells as f64 / sells.len() as f64 * 100.0;
        }

        let mut winning_pnl = 0.0;
        let mut losing_pnl = 0.0;
        for sell in &sells {
            let pnl = sell.pnl.and_then(|p| p.to_f64()).unwrap_or(0.0);
            if pnl > 0.0 {
                winning_pnl += pnl;
            } else {
                losing_pnl += pnl.abs();
            }
        }
        metrics.profit_factor = if losing_pnl > 0.0 {
            Some(winning_pnl / losing_pnl)
        } else if winning_pnl > 0.0 {
            None // 손실 없음: 손익비 정의 불가 (무한대)
        } else {
            Some(0.0)
        };

        metrics.avg_holding_days = avg_holding_days(trades);
        metrics
    }

    /// 전략 반복 개선에 사용하는 종합 점수.
    ///
    /// 수익률 40%, 샤프 30%, 승률 10% 가중에 낙폭 구간별 감점을
    /// 더한 값입니다.
    pub fn score(&self) -> f64 {
        let mut score =
            self.total_return_pct * 0.4 + self.sharpe_ratio * 10.0 * 0.3 + self.win_rate_pct * 0.1;
        if self.max_drawdown_pct > 20.0 {
            score -= 50.0;
        } else if self.max_drawdown_pct > 10.0 {
            score -= 20.0;
        }
        score
    }
}

/// 최대 낙폭을 계산합니다 (%, 항상 >= 0).
///
/// 감소 구간이 없는 곡선의 낙폭은 정확히 0입니다.
fn max_drawdown_pct(equity: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0;
    for &value in equity {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (peak - value) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// 샤프 비율 (252일 연율화, 표본 표준편차).
fn sharpe_ratio(daily_returns: &[f64], risk_free_rate: f64) -> f64 {
    if daily_returns.len() < 2 {
        return 0.0;
    }
    let n = daily_returns.len() as f64;
    let mean = daily_returns.iter().sum::<f64>() / n;
    let variance = daily_returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);
    let std = variance.sqrt();
    if std == 0.0 {
        return 0.0;
    }
    let excess = mean - risk_free_rate / TRADING_DAYS_PER_YEAR;
    TRADING_DAYS_PER_YEAR.sqrt() * excess / std
}

/// 매수-매도 쌍의 평균 보유 기간 (일).
fn avg_holding_days(trades: &[Trade]) -> f64 {
    let buys: Vec<&Trade> = trades.iter().filter(|t| t.side == Side::Buy).collect();
    let sells: Vec<&Trade> = trades.iter().filter(|t| t.side == Side::Sell).collect();

    let rounds = buys.len().min(sells.len());
    if rounds == 0 {
        return 0.0;
    }

    let total_days: i64 = (0..rounds)
        .map(|i| (sells[i].date - buys[i].date).num_days().max(0))
        .sum();
    total_days as f64 / rounds as f64
}

/// 전략 반복 목표 지표.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestTargets {
    /// 최저 총 수익률 (%)
    pub min_total_return_pct: f64,
    /// 최대 허용 낙폭 (%)
    pub max_drawdown_pct: f64,
    /// 최저 샤프 비율
    pub min_sharpe_ratio: f64,
    /// 최저 승률 (%)
    pub min_win_rate_pct: f64,
    /// 최소 거래 횟수
    pub min_trades: usize,
    /// 최저 손익비
    pub min_profit_factor: f64,
}

impl Default for BacktestTargets {
    fn default() -> Self {
        Self {
            min_total_return_pct: 20.0,
            max_drawdown_pct: 15.0,
            min_sharpe_ratio: 1.5,
            min_win_rate_pct: 55.0,
            min_trades: 20,
            min_profit_factor: 1.5,
        }
    }
}

/// 목표 지표 검사 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetCheck {
    /// 전체 통과 여부
    pub passed: bool,
    /// 미달 지표 이름
    pub failed_metrics: Vec<String>,
}

impl BacktestTargets {
    /// 지표가 목표를 달성했는지 검사합니다.
    pub fn check(&self, metrics: &PerformanceMetrics, total_trades: usize) -> TargetCheck {
        let mut failed: Vec<String> = Vec::new();

        if metrics.total_return_pct < self.min_total_return_pct {
            failed.push("total_return".to_string());
        }
        if metrics.max_drawdown_pct > self.max_drawdown_pct {
            failed.push("max_drawdown".to_string());
        }
        if metrics.sharpe_ratio < self.min_sharpe_ratio {
            failed.push("sharpe_ratio".to_string());
        }
        if metrics.win_rate_pct < self.min_win_rate_pct {
            failed.push("win_rate".to_string());
        }
        if total_trades < self.min_trades {
            failed.push("total_trades".to_string());
        }
        // 손실 거래가 없으면 (None) 손익비는 통과로 간주
        if let Some(pf) = metrics.profit_factor {
            if pf < self.min_profit_factor {
                failed.push("profit_factor".to_string());
            }
        }

        TargetCheck {
            passed: failed.is_empty(),
            failed_metrics: failed,
        }
    }
}
