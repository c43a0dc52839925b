//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 백테스트 설정
    #[serde(default)]
    pub backtest: BacktestSettings,
    /// 분석 위원회 설정
    #[serde(default)]
    pub analyst: AnalystSettings,
    /// 원격 추론 서비스 설정
    #[serde(default)]
    pub delegate: DelegateSettings,
    /// 전략 배정 설정
    #[serde(default)]
    pub strategy: StrategySettings,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 백테스트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BacktestSettings {
    /// 초기 자본금
    pub initial_capital: Decimal,
    /// 시뮬레이션에 필요한 최소 봉 개수
    pub min_bars: usize,
    /// 리포트에 포함할 최근 거래 수
    pub max_recent_trades: usize,
    /// 손절 비율 (진입가 대비, 예: 0.08 = -8%)
    #[serde(default)]
    pub stop_loss_pct: Option<Decimal>,
    /// 익절 비율 (진입가 대비, 예: 0.15 = +15%)
    #[serde(default)]
    pub take_profit_pct: Option<Decimal>,
    /// 무위험 수익률 (연율)
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

fn default_risk_free_rate() -> f64 {
    0.0
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            initial_capital: Decimal::new(100_000, 0),
            min_bars: 60,
            max_recent_trades: 10,
            stop_loss_pct: None,
            take_profit_pct: None,
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

/// 분석 위원회 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalystSettings {
    /// 개별 분석가 호출 타임아웃 (초)
    pub analyst_timeout_secs: u64,
    /// 의결에 필요한 최소 지지 분석가 수
    pub min_supporters: usize,
    /// 실행에 필요한 최소 신뢰도
    pub min_confidence: f64,
    /// 리스크 한도 미지정 시 기본 포지션 한도
    pub default_position_limit: f64,
}

impl Default for AnalystSettings {
    fn default() -> Self {
        Self {
            analyst_timeout_secs: 30,
            min_supporters: 2,
            min_confidence: 0.6,
            default_position_limit: 0.25,
        }
    }
}

/// 원격 추론 서비스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DelegateSettings {
    /// 원격 위임 활성화 여부
    pub enabled: bool,
    /// 추론 서비스 기본 URL
    #[serde(default)]
    pub base_url: String,
    /// API 키
    #[serde(default)]
    pub api_key: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_delegate_timeout")]
    pub timeout_secs: u64,
    /// 토큰 유효 기간 (초)
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

fn default_delegate_timeout() -> u64 {
    30
}
fn default_token_ttl() -> u64 {
    3600
}

impl Default for DelegateSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            api_key: String::new(),
            timeout_secs: default_delegate_timeout(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

/// 전략 배정 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StrategySettings {
    /// 종목별 전략 배정 오버라이드 (심볼 -> 전략 이름)
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드 (없으면 기본값 사용)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("QUANT")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backtest_settings() {
        let settings = BacktestSettings::default();
        assert_eq!(settings.initial_capital, Decimal::new(100_000, 0));
        assert_eq!(settings.min_bars, 60);
        assert!(settings.stop_loss_pct.is_none());
    }

    #[test]
    fn test_default_analyst_settings() {
        let settings = AnalystSettings::default();
        assert_eq!(settings.min_supporters, 2);
        assert!((settings.min_confidence - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [backtest]
            initial_capital = "50000"
            min_bars = 60
            max_recent_trades = 5
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.backtest.initial_capital, Decimal::new(50_000, 0));
        assert_eq!(config.backtest.max_recent_trades, 5);
        assert_eq!(config.analyst.analyst_timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }
}
