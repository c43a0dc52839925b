//! 분석 위원회 명령어.
//!
//! 분석 컨텍스트 JSON 파일을 읽어 분석가들을 병렬 실행하고
//! 위원회 의결을 출력합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 규칙 기반 분석가 4명으로 의결
//! quant analyze -i data/aapl_context.json
//!
//! # 의결을 JSON으로 저장
//! quant analyze -i data/aapl_context.json -o decisions/aapl.json
//! ```

use anyhow::{Context, Result};
use quant_analyst::{
    AnalystContext, AnalystCoordinator, AnalystDelegate, AnalystRole, Committee,
    CommitteeDecision, FundamentalAnalyst, RemoteDelegate, RemoteDelegateConfig, RiskAnalyst,
    SentimentAnalyst, TechnicalAnalyst,
};
use quant_core::{AppConfig, QuantError};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 분석 명령 CLI 설정.
#[derive(Debug, Clone)]
pub struct AnalyzeCliConfig {
    /// 분석 컨텍스트 JSON 파일 경로
    pub input: String,
    /// 의결 저장 경로 (옵션)
    pub output: Option<String>,
}

/// 분석 위원회 실행.
pub async fn run_analyze(
    config: AnalyzeCliConfig,
    app_config: &AppConfig,
) -> Result<CommitteeDecision> {
    let ctx = load_context(&config.input)?;
    info!(symbol = %ctx.symbol, "Loaded analyst context");

    let delegates = build_delegates(app_config)?;
    let coordinator = AnalystCoordinator::new(delegates)
        .with_timeout(Duration::from_secs(app_config.analyst.analyst_timeout_secs));

    let verdicts = coordinator.run(&ctx).await;
    for verdict in &verdicts {
        match &verdict.error {
            Some(reason) => println!("  {} : 실패 ({})", verdict.role, reason),
            None => println!(
                "  {} : {:?} (신뢰도 {:.2})",
                verdict.role, verdict.rating, verdict.confidence
            ),
        }
    }

    let decision = Committee::from_settings(&app_config.analyst).aggregate(&ctx.symbol, &verdicts);

    println!("\n위원회 의결 - {}", decision.symbol);
    println!(
        "  액션: {}  신뢰도: {:.2}  포지션 비중: {:.0}%",
        decision.final_action,
        decision.confidence,
        decision.quantity_pct * 100.0
    );
    if let (Some(sl), Some(tp)) = (decision.stop_loss, decision.take_profit) {
        println!("  손절: {}  익절: {}", sl, tp);
    }
    for factor in &decision.key_factors {
        println!("  근거: {}", factor);
    }
    for concern in &decision.risk_concerns {
        println!("  리스크: {}", concern);
    }

    if let Some(output) = &config.output {
        super::write_json(&decision, output)?;
        info!("Decision saved to: {}", output);
        println!("\n의결 저장됨: {}", output);
    }

    Ok(decision)
}

/// 설정에 따라 분석가 집합을 구성합니다.
///
/// 원격 위임이 활성화되어 있으면 네 역할 모두 원격 서비스에
/// 위임하고, 아니면 규칙 기반 분석가를 사용합니다.
fn build_delegates(app_config: &AppConfig) -> Result<Vec<Arc<dyn AnalystDelegate>>> {
    if app_config.delegate.enabled {
        let remote_config = RemoteDelegateConfig::from_settings(&app_config.delegate);
        let mut delegates: Vec<Arc<dyn AnalystDelegate>> = Vec::new();
        for role in [
            AnalystRole::Fundamental,
            AnalystRole::Technical,
            AnalystRole::Sentiment,
            AnalystRole::Risk,
        ] {
            delegates.push(Arc::new(
                RemoteDelegate::new(role, remote_config.clone())
                    .context("원격 위임 HTTP 클라이언트 생성 실패")?,
            ));
        }
        Ok(delegates)
    } else {
        Ok(vec![
            Arc::new(FundamentalAnalyst::new()),
            Arc::new(TechnicalAnalyst::new()),
            Arc::new(SentimentAnalyst::new()),
            Arc::new(RiskAnalyst::new()),
        ])
    }
}

/// 분석 컨텍스트 JSON 파일 로드.
fn load_context(path: &str) -> Result<AnalystContext> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| QuantError::NotFound(format!("{}: {}", path, e)))
        .with_context(|| format!("컨텍스트 파일을 열 수 없습니다: {}", path))?;
    serde_json::from_str(&content)
        .map_err(QuantError::from)
        .with_context(|| format!("컨텍스트 파싱 실패: {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_based_delegates_cover_all_roles() {
        let delegates = build_delegates(&AppConfig::default()).unwrap();
        assert_eq!(delegates.len(), 4);

        let roles: Vec<AnalystRole> = delegates.iter().map(|d| d.role()).collect();
        assert!(roles.contains(&AnalystRole::Fundamental));
        assert!(roles.contains(&AnalystRole::Risk));
    }

    #[test]
    fn test_malformed_context_surfaces_serialization_error() {
        let path = std::env::temp_dir().join("quant_cli_bad_context.json");
        std::fs::write(&path, "{ broken").unwrap();

        let err = load_context(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuantError>(),
            Some(QuantError::Serialization(_))
        ));
    }
}
