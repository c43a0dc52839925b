//! 백테스트 명령어.
//!
//! 봉 + 지표 스냅샷이 담긴 JSON 시계열 파일로 전략을 백테스트합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 적응형 코디네이터(스크리닝 + 체제 배정)로 백테스트
//! quant backtest -i data/aapl_daily.json -s AAPL
//!
//! # 특정 전략 변형 고정
//! quant backtest -i data/nvda_daily.json -s NVDA --strategy breakout
//!
//! # 결과를 JSON으로 저장
//! quant backtest -i data/aapl_daily.json -s AAPL -o reports/aapl.json
//! ```

use anyhow::{anyhow, Context, Result};
use quant_backtest::{BacktestConfig, BacktestEngine, BacktestReport, BacktestTargets};
use quant_core::{AppConfig, IndicatorSet, PriceBar, QuantError};
use quant_strategy::{AdaptiveCoordinator, Regime, RegimeMap, Strategy};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// 백테스트 CLI 설정.
#[derive(Debug, Clone)]
pub struct BacktestCliConfig {
    /// 시계열 JSON 파일 경로
    pub input: String,
    /// 심볼 (미지정 시 파일 이름에서 유추)
    pub symbol: Option<String>,
    /// 전략 변형 이름 (미지정 시 적응형 코디네이터)
    pub strategy: Option<String>,
    /// 결과 저장 경로 (옵션)
    pub output: Option<String>,
}

/// 시계열 파일의 레코드 하나 (봉 + 지표 스냅샷).
#[derive(Debug, Deserialize)]
pub struct SeriesRecord {
    #[serde(flatten)]
    pub bar: PriceBar,
    #[serde(flatten)]
    pub indicators: IndicatorSet,
}

/// 백테스트 실행.
pub fn run_backtest(config: BacktestCliConfig, app_config: &AppConfig) -> Result<BacktestReport> {
    let symbol = resolve_symbol(&config);
    let series = load_series(&config.input)?;
    info!(symbol = %symbol, bars = series.len(), "Loaded price series");

    let engine = BacktestEngine::new(BacktestConfig::from(&app_config.backtest));

    let strategy: Box<dyn Strategy> = match &config.strategy {
        Some(name) => {
            let regime: Regime = name
                .parse()
                .map_err(|e: String| anyhow!("{} (지원: trend_following, mean_reversion, breakout, defensive, conservative, relaxed)", e))?;
            regime.strategy()
        }
        None => {
            let coordinator = AdaptiveCoordinator::with_regimes(RegimeMap::from_overrides(
                &app_config.strategy.overrides,
            ));
            Box::new(coordinator.pinned(symbol.clone()))
        }
    };

    let report = engine
        .run(&symbol, &series, strategy.as_ref())
        .with_context(|| format!("백테스트 실패: {}", symbol))?;

    println!("\n{}", report.summary());

    let check = BacktestTargets::default().check(&report.metrics, report.trade_count);
    if check.passed {
        println!("\n✅ 목표 지표 전체 달성");
    } else {
        println!("\n⚠️  목표 미달 지표: {}", check.failed_metrics.join(", "));
    }

    if let Some(output) = &config.output {
        super::write_json(&report, output)?;
        info!("Report saved to: {}", output);
        println!("\n결과 저장됨: {}", output);
    }

    Ok(report)
}

/// 심볼 결정: 인자 우선, 없으면 파일 이름에서 유추.
fn resolve_symbol(config: &BacktestCliConfig) -> String {
    config
        .symbol
        .clone()
        .unwrap_or_else(|| {
            Path::new(&config.input)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string()
        })
        .to_uppercase()
}

/// 시계열 JSON 파일 로드.
fn load_series(path: &str) -> Result<Vec<(PriceBar, IndicatorSet)>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| QuantError::NotFound(format!("{}: {}", path, e)))
        .with_context(|| format!("시계열 파일을 열 수 없습니다: {}", path))?;
    let records: Vec<SeriesRecord> = serde_json::from_str(&content)
        .map_err(QuantError::from)
        .with_context(|| format!("시계열 파싱 실패: {}", path))?;

    Ok(records
        .into_iter()
        .map(|r| (r.bar, r.indicators))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_resolve_symbol_prefers_argument() {
        let config = BacktestCliConfig {
            input: "data/aapl_daily.json".to_string(),
            symbol: Some("msft".to_string()),
            strategy: None,
            output: None,
        };
        assert_eq!(resolve_symbol(&config), "MSFT");
    }

    #[test]
    fn test_resolve_symbol_falls_back_to_file_stem() {
        let config = BacktestCliConfig {
            input: "data/nvda.json".to_string(),
            symbol: None,
            strategy: None,
            output: None,
        };
        assert_eq!(resolve_symbol(&config), "NVDA");
    }

    #[test]
    fn test_malformed_series_surfaces_serialization_error() {
        let path = std::env::temp_dir().join("quant_cli_bad_series.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_series(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuantError>(),
            Some(QuantError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_series_file_surfaces_not_found() {
        let err = load_series("data/does_not_exist.json").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuantError>(),
            Some(QuantError::NotFound(_))
        ));
    }

    #[test]
    fn test_series_record_parses_flat_layout() {
        let json = r#"{
            "timestamp": "2024-03-04T00:00:00Z",
            "open": "100", "high": "102", "low": "99", "close": "101", "volume": "100000",
            "rsi_14": 55.0, "sma_20": 98.5
        }"#;
        let record: SeriesRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.bar.close, dec!(101));
        assert_eq!(record.indicators.rsi_14, Some(55.0));
        assert!(record.indicators.macd.is_none());
    }
}
