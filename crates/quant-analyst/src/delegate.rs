//! 분석 위임 트레이트 및 병렬 코디네이터.

use crate::context::AnalystContext;
use crate::verdict::{AnalystRole, AnalystVerdict};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// 기본 분석가 타임아웃 (초).
const DEFAULT_ANALYST_TIMEOUT_SECS: u64 = 30;

/// 분석가 하나를 나타내는 위임 트레이트.
///
/// 계약상 실패하지 않습니다: 모든 내부 오류(네트워크, 파싱, 입력
/// 부재)는 `AnalystVerdict::failed`로 표현되어 반환됩니다.
#[async_trait]
pub trait AnalystDelegate: Send + Sync {
    /// 분석가 역할.
    fn role(&self) -> AnalystRole;

    /// 컨텍스트를 분석하여 의견을 반환합니다.
    async fn analyze(&self, ctx: &AnalystContext) -> AnalystVerdict;
}

/// 분석가들을 병렬로 실행하는 코디네이터.
///
/// 위원회는 모든 분석가가 완료(또는 타임아웃)될 때까지 기다립니다.
/// 타임아웃된 분석가는 실패 의견으로 대체됩니다.
pub struct AnalystCoordinator {
    delegates: Vec<Arc<dyn AnalystDelegate>>,
    timeout: Duration,
}

impl AnalystCoordinator {
    /// 새 코디네이터를 생성합니다.
    pub fn new(delegates: Vec<Arc<dyn AnalystDelegate>>) -> Self {
        Self {
            delegates,
            timeout: Duration::from_secs(DEFAULT_ANALYST_TIMEOUT_SECS),
        }
    }

    /// 분석가 타임아웃을 설정합니다.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 등록된 분석가 수.
    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    /// 분석가가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }

    /// 모든 분석가를 동시에 실행하고 의견을 수집합니다.
    pub async fn run(&self, ctx: &AnalystContext) -> Vec<AnalystVerdict> {
        let futures = self.delegates.iter().map(|delegate| {
            let delegate = Arc::clone(delegate);
            async move {
                let role = delegate.role();
                match tokio::time::timeout(self.timeout, delegate.analyze(ctx)).await {
                    Ok(verdict) => verdict,
                    Err(_) => {
                        warn!(role = %role, symbol = %ctx.symbol, "Analyst timed out");
                        AnalystVerdict::failed(role, ctx.symbol.clone(), "analysis timed out")
                    }
                }
            }
        });

        join_all(futures).await
    }
}
