//! 체제(regime) 레지스트리.
//!
//! 심볼을 시장 체제에 배정하고, 체제에서 전략 인스턴스를
//! 생성하는 명시적 조회 테이블입니다.

use crate::strategies::{
    BreakoutStrategy, ConservativeStrategy, DefensiveStrategy, MeanReversionStrategy,
    RelaxedStrategy, TrendFollowingStrategy,
};
use crate::traits::Strategy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 시장 체제.
///
/// 각 체제는 하나의 전략 변형에 대응합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// 추세 추종
    TrendFollowing,
    /// 평균회귀
    MeanReversion,
    /// 돌파
    Breakout,
    /// 방어적
    Defensive,
    /// 보수적 다중 조건
    Conservative,
    /// 완화된 다중 조건
    Relaxed,
}

impl Regime {
    /// 체제에 대응하는 전략 인스턴스를 생성합니다.
    pub fn strategy(&self) -> Box<dyn Strategy> {
        match self {
            Regime::TrendFollowing => Box::new(TrendFollowingStrategy::new()),
            Regime::MeanReversion => Box::new(MeanReversionStrategy::new()),
            Regime::Breakout => Box::new(BreakoutStrategy::new()),
            Regime::Defensive => Box::new(DefensiveStrategy::new()),
            Regime::Conservative => Box::new(ConservativeStrategy::new()),
            Regime::Relaxed => Box::new(RelaxedStrategy::new()),
        }
    }

    /// 체제 레이블.
    pub fn label(&self) -> &'static str {
        match self {
            Regime::TrendFollowing => "trend_following",
            Regime::MeanReversion => "mean_reversion",
            Regime::Breakout => "breakout",
            Regime::Defensive => "defensive",
            Regime::Conservative => "conservative",
            Regime::Relaxed => "relaxed",
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Regime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trend_following" | "trend" => Ok(Regime::TrendFollowing),
            "mean_reversion" => Ok(Regime::MeanReversion),
            "breakout" => Ok(Regime::Breakout),
            "defensive" => Ok(Regime::Defensive),
            "conservative" => Ok(Regime::Conservative),
            "relaxed" => Ok(Regime::Relaxed),
            _ => Err(format!("Unknown regime: {}", s)),
        }
    }
}

/// 심볼 -> 체제 배정 테이블.
///
/// 조회는 대소문자를 구분하지 않으며, 배정이 없는 심볼은
/// 기본 체제(추세 추종)로 떨어집니다.
#[derive(Debug, Clone)]
pub struct RegimeMap {
    assignments: HashMap<String, Regime>,
    default: Regime,
}

impl Default for RegimeMap {
    fn default() -> Self {
        Self::with_default_assignments()
    }
}

impl RegimeMap {
    /// 빈 배정 테이블을 생성합니다.
    pub fn new() -> Self {
        Self {
            assignments: HashMap::new(),
            default: Regime::TrendFollowing,
        }
    }

    /// 기본 유니버스 배정이 채워진 테이블을 생성합니다.
    pub fn with_default_assignments() -> Self {
        let mut map = Self::new();
        for symbol in ["GOOGL", "AAPL", "MSFT"] {
            map.assign(symbol, Regime::TrendFollowing);
        }
        for symbol in ["META", "AMZN"] {
            map.assign(symbol, Regime::MeanReversion);
        }
        for symbol in ["NVDA", "AMD", "TSLA", "INTC"] {
            map.assign(symbol, Regime::Breakout);
        }
        map.assign("NFLX", Regime::Defensive);
        map
    }

    /// 설정의 오버라이드 테이블(심볼 -> 체제 이름)로 테이블을 생성합니다.
    ///
    /// 알 수 없는 체제 이름은 경고 로그 후 무시합니다.
    pub fn from_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut map = Self::with_default_assignments();
        for (symbol, name) in overrides {
            match name.parse::<Regime>() {
                Ok(regime) => map.assign(symbol, regime),
                Err(_) => {
                    tracing::warn!(symbol = %symbol, regime = %name, "Ignoring unknown regime override");
                }
            }
        }
        map
    }

    /// 심볼에 체제를 배정합니다.
    pub fn assign(&mut self, symbol: impl AsRef<str>, regime: Regime) {
        self.assignments
            .insert(symbol.as_ref().to_uppercase(), regime);
    }

    /// 기본 체제를 변경합니다.
    pub fn with_default(mut self, regime: Regime) -> Self {
        self.default = regime;
        self
    }

    /// 심볼의 체제를 조회합니다 (대소문자 무시).
    pub fn lookup(&self, symbol: &str) -> Regime {
        self.assignments
            .get(&symbol.to_uppercase())
            .copied()
            .unwrap_or(self.default)
    }
}
