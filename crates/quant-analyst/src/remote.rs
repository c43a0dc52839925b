//! 원격 추론 서비스 위임.
//!
//! 처리 기능:
//! - 접근 토큰 발급 및 캐시 (POST /v1/token)
//! - 역할별 분석 요청 (POST /v1/analysts/{role})
//!
//! `AnalystDelegate` 계약에 따라 모든 전송/파싱 실패는
//! 실패 의견으로 변환되어 반환됩니다.

use crate::context::AnalystContext;
use crate::delegate::AnalystDelegate;
use crate::verdict::{AnalystRole, AnalystVerdict, Rating, RiskLevel};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use quant_core::DelegateSettings;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// 기본 요청 타임아웃 (초).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 기본 토큰 수명 (초). 응답에 만료 시간이 없을 때 사용합니다.
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// 원격 위임 설정.
#[derive(Debug, Clone)]
pub struct RemoteDelegateConfig {
    /// 추론 서비스 기본 URL
    pub base_url: String,
    /// API 키
    pub api_key: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 토큰 수명 폴백 (초)
    pub token_ttl_secs: i64,
}

impl RemoteDelegateConfig {
    /// 새 설정을 생성합니다.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// 앱 설정에서 생성합니다.
    pub fn from_settings(settings: &DelegateSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            timeout_secs: settings.timeout_secs,
            token_ttl_secs: settings.token_ttl_secs as i64,
        }
    }

    /// 요청 타임아웃을 설정합니다.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// 만료 추적이 포함된 접근 토큰 캐시.
#[derive(Debug, Clone)]
pub struct TokenCache {
    /// 접근 토큰
    pub token: String,
    /// 만료 시각
    pub expires_at: DateTime<Utc>,
}

impl TokenCache {
    /// 새 토큰 캐시를 생성합니다.
    pub fn new(token: String, expires_at: DateTime<Utc>) -> Self {
        Self { token, expires_at }
    }

    /// 토큰이 유효한지 확인합니다.
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

/// 토큰 발급 응답.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// 토큰 발급 요청.
#[derive(Serialize)]
struct TokenRequest<'a> {
    api_key: &'a str,
}

/// 원격 서비스가 반환하는 의견 페이로드.
#[derive(Debug, Deserialize)]
struct VerdictPayload {
    rating: Rating,
    confidence: f64,
    #[serde(default)]
    reasoning: Vec<String>,
    #[serde(default)]
    target_price: Option<Decimal>,
    #[serde(default)]
    support_level: Option<Decimal>,
    #[serde(default)]
    resistance_level: Option<Decimal>,
    #[serde(default)]
    risk_level: Option<RiskLevel>,
    #[serde(default)]
    position_limit: Option<f64>,
    #[serde(default)]
    stop_loss: Option<Decimal>,
    #[serde(default)]
    take_profit: Option<Decimal>,
}

/// 원격 추론 서비스 위임.
///
/// 역할 하나를 원격 서비스의 역할별 엔드포인트에 매핑합니다.
/// 토큰은 만료까지 캐시되며 만료 시 자동 재발급됩니다.
pub struct RemoteDelegate {
    role: AnalystRole,
    config: RemoteDelegateConfig,
    client: Client,
    token: Arc<RwLock<Option<TokenCache>>>,
}

impl RemoteDelegate {
    /// 새 원격 위임을 생성합니다.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `reqwest::Error`를 반환합니다.
    pub fn new(role: AnalystRole, config: RemoteDelegateConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            role,
            config,
            client,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// 유효한 접근 토큰 반환, 필요시 재발급.
    async fn get_token(&self) -> Result<String, String> {
        {
            let guard = self.token.read().await;
            if let Some(ref cached) = *guard {
                if cached.is_valid() {
                    debug!(expires_at = %cached.expires_at, "Using cached delegate token");
                    return Ok(cached.token.clone());
                }
            }
        }

        self.refresh_token().await
    }

    /// 토큰 강제 재발급.
    async fn refresh_token(&self) -> Result<String, String> {
        let url = format!("{}/v1/token", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .json(&TokenRequest {
                api_key: &self.config.api_key,
            })
            .send()
            .await
            .map_err(|e| format!("token request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("token request failed: HTTP {}", status));
        }

        let token_resp: TokenResponse = response
            .json()
            .await
            .map_err(|e| format!("token response parse failed: {}", e))?;

        let ttl = token_resp.expires_in.unwrap_or(self.config.token_ttl_secs);
        let cache = TokenCache::new(token_resp.access_token, Utc::now() + Duration::seconds(ttl));

        debug!(expires_at = %cache.expires_at, "Delegate token refreshed");

        let token = cache.token.clone();
        {
            let mut guard = self.token.write().await;
            *guard = Some(cache);
        }

        Ok(token)
    }

    /// 원격 분석 요청을 수행합니다.
    async fn request_verdict(&self, ctx: &AnalystContext) -> Result<VerdictPayload, String> {
        let token = self.get_token().await?;
        let url = format!("{}/v1/analysts/{}", self.config.base_url, self.role);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(ctx)
            .send()
            .await
            .map_err(|e| format!("analysis request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("analysis request failed: HTTP {}", status));
        }

        response
            .json::<VerdictPayload>()
            .await
            .map_err(|e| format!("analysis response parse failed: {}", e))
    }
}

#[async_trait]
impl AnalystDelegate for RemoteDelegate {
    fn role(&self) -> AnalystRole {
        self.role
    }

    async fn analyze(&self, ctx: &AnalystContext) -> AnalystVerdict {
        let payload = match self.request_verdict(ctx).await {
            Ok(payload) => payload,
            Err(reason) => {
                warn!(role = %self.role, symbol = %ctx.symbol, reason = %reason, "Remote delegate failed");
                return AnalystVerdict::failed(self.role, ctx.symbol.clone(), reason);
            }
        };

        let mut verdict = AnalystVerdict::new(
            self.role,
            ctx.symbol.clone(),
            payload.rating,
            payload.confidence,
        )
        .with_reasoning(payload.reasoning);
        verdict.target_price = payload.target_price;
        verdict.support_level = payload.support_level;
        verdict.resistance_level = payload.resistance_level;
        verdict.risk_level = payload.risk_level;
        verdict.position_limit = payload.position_limit.map(|p| p.clamp(0.0, 1.0));
        verdict.stop_loss = payload.stop_loss;
        verdict.take_profit = payload.take_profit;
        verdict
    }
}
