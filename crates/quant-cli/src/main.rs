//! 백테스트/분석 위원회 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # JSON 시계열로 적응형 백테스트
//! quant backtest -i data/aapl_daily.json -s AAPL
//!
//! # 특정 전략 변형 고정 + 리포트 저장
//! quant backtest -i data/nvda_daily.json -s NVDA --strategy breakout -o reports/nvda.json
//!
//! # 분석 컨텍스트로 위원회 의결
//! quant analyze -i data/aapl_context.json -o decisions/aapl.json
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use quant_core::{init_logging, AppConfig, LogConfig, QuantError};
use tracing::error;

mod commands;

use commands::analyze::{run_analyze, AnalyzeCliConfig};
use commands::backtest::{run_backtest, BacktestCliConfig};

#[derive(Parser)]
#[command(name = "quant")]
#[command(about = "Quant desk CLI - 백테스트 엔진과 분석 위원회", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// JSON 시계열 파일로 백테스트 실행
    Backtest {
        /// 봉 + 지표 시계열 JSON 파일
        #[arg(short, long)]
        input: String,

        /// 심볼 (미지정 시 파일 이름에서 유추)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 전략 변형 (trend_following, mean_reversion, breakout,
        /// defensive, conservative, relaxed; 미지정 시 적응형)
        #[arg(long)]
        strategy: Option<String>,

        /// 리포트 저장 경로 (JSON)
        #[arg(short, long)]
        output: Option<String>,

        /// 설정 파일
        #[arg(short, long, default_value = "config/default.toml")]
        config: String,
    },

    /// 분석 컨텍스트 파일로 위원회 의결 실행
    Analyze {
        /// 분석 컨텍스트 JSON 파일
        #[arg(short, long)]
        input: String,

        /// 의결 저장 경로 (JSON)
        #[arg(short, long)]
        output: Option<String>,

        /// 설정 파일
        #[arg(short, long, default_value = "config/default.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Commands::Backtest { config, .. } => config.clone(),
        Commands::Analyze { config, .. } => config.clone(),
    };
    let app_config = AppConfig::load(&config_path)
        .map_err(|e| QuantError::Config(e.to_string()))
        .with_context(|| format!("설정 로드 실패: {}", config_path))?;

    init_logging(LogConfig::from_settings(&app_config.logging))
        .map_err(|e| anyhow!("로깅 초기화 실패: {}", e))?;

    match cli.command {
        Commands::Backtest {
            input,
            symbol,
            strategy,
            output,
            ..
        } => {
            let cli_config = BacktestCliConfig {
                input,
                symbol,
                strategy,
                output,
            };

            if let Err(e) = run_backtest(cli_config, &app_config) {
                error!("Backtest failed: {:#}", e);
                return Err(e);
            }
        }

        Commands::Analyze { input, output, .. } => {
            let cli_config = AnalyzeCliConfig { input, output };

            if let Err(e) = run_analyze(cli_config, &app_config).await {
                error!("Analysis failed: {:#}", e);
                return Err(e);
            }
        }
    }

    Ok(())
}
