//! 신뢰도 가중 다수결 위원회.
//!
//! 방향 의견(펀더멘털/기술/감성)은 등급별 신뢰도 합산으로
//! 투표하고, 리스크 의견은 포지션 사이징과 손절/익절 입력으로만
//! 쓰입니다. 매수/매도 실행에는 최소 지지 수와 신뢰도 하한이
//! 추가로 요구됩니다.

use crate::verdict::{AnalystRole, AnalystVerdict, Rating};
use chrono::{DateTime, Utc};
use quant_core::{AnalystSettings, TradeAction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 위원회 최종 의결.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitteeDecision {
    /// 심볼
    pub symbol: String,
    /// 최종 액션
    pub final_action: TradeAction,
    /// 의결 신뢰도 [0, 1]
    pub confidence: f64,
    /// 권고 포지션 비중 (계좌 대비 분수, 관망이면 0)
    pub quantity_pct: f64,
    /// 권고 손절가 (리스크 의견에서 전파)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    /// 권고 익절가 (리스크 의견에서 전파)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
    /// 승리 의견들의 핵심 근거
    pub key_factors: Vec<String>,
    /// 리스크 우려 사항 (리스크 근거 + 실패한 분석가)
    pub risk_concerns: Vec<String>,
    /// 의결 시점
    pub timestamp: DateTime<Utc>,
}

/// 분석가 의견을 최종 의결로 집계하는 위원회.
#[derive(Debug, Clone)]
pub struct Committee {
    /// 매수/매도 의결에 필요한 최소 지지 분석가 수
    min_supporters: usize,
    /// 매수/매도 의결에 필요한 최소 신뢰도
    min_confidence: f64,
    /// 리스크 한도 미지정 시 기본 포지션 한도
    default_position_limit: f64,
}

impl Default for Committee {
    fn default() -> Self {
        Self::from_settings(&AnalystSettings::default())
    }
}

impl Committee {
    /// 새 위원회를 생성합니다.
    pub fn new(min_supporters: usize, min_confidence: f64, default_position_limit: f64) -> Self {
        Self {
            min_supporters,
            min_confidence: min_confidence.clamp(0.0, 1.0),
            default_position_limit: default_position_limit.clamp(0.0, 1.0),
        }
    }

    /// 앱 설정에서 생성합니다.
    pub fn from_settings(settings: &AnalystSettings) -> Self {
        Self::new(
            settings.min_supporters,
            settings.min_confidence,
            settings.default_position_limit,
        )
    }

    /// 의견들을 집계하여 최종 의결을 생성합니다.
    ///
    /// 의견이 없거나 전부 실패한 경우 신뢰도 0의 관망으로
    /// 의결합니다. `final_action`은 항상 채워집니다.
    pub fn aggregate(&self, symbol: &str, verdicts: &[AnalystVerdict]) -> CommitteeDecision {
        let risk_verdict = verdicts
            .iter()
            .find(|v| v.role == AnalystRole::Risk && !v.is_failed());

        let mut risk_concerns: Vec<String> = risk_verdict
            .map(|v| v.reasoning.clone())
            .unwrap_or_default();
        for failed in verdicts.iter().filter(|v| v.is_failed()) {
            risk_concerns.push(format!(
                "{} analyst unavailable: {}",
                failed.role,
                failed.error.as_deref().unwrap_or("unknown")
            ));
        }

        // 방향 투표: 실패/리스크 의견 제외
        let votes: Vec<&AnalystVerdict> = verdicts
            .iter()
            .filter(|v| !v.is_failed() && v.role != AnalystRole::Risk)
            .collect();

        if votes.is_empty() {
            info!(symbol = %symbol, "No usable analyst votes, holding");
            return CommitteeDecision {
                symbol: symbol.to_string(),
                final_action: TradeAction::Hold,
                confidence: 0.0,
                quantity_pct: 0.0,
                stop_loss: risk_verdict.and_then(|v| v.stop_loss),
                take_profit: risk_verdict.and_then(|v| v.take_profit),
                key_factors: Vec::new(),
                risk_concerns,
                timestamp: Utc::now(),
            };
        }

        let mut buckets: [(Rating, f64, usize); 3] = [
            (Rating::Buy, 0.0, 0),
            (Rating::Hold, 0.0, 0),
            (Rating::Sell, 0.0, 0),
        ];
        for vote in &votes {
            let weight = vote.confidence.clamp(0.0, 1.0);
            for bucket in &mut buckets {
                if bucket.0 == vote.rating {
                    bucket.1 += weight;
                    bucket.2 += 1;
                }
            }
        }
        let total_mass: f64 = buckets.iter().map(|b| b.1).sum();

        // 최대 버킷 선택, 최대 질량 동률은 무조건 관망으로
        let (mut winner, mut winner_mass, mut supporters) = (Rating::Hold, f64::MIN, 0usize);
        let mut tied_at_max = false;
        for (rating, mass, count) in buckets {
            if mass > winner_mass {
                winner = rating;
                winner_mass = mass;
                supporters = count;
                tied_at_max = false;
            } else if mass == winner_mass {
                tied_at_max = true;
            }
        }
        if tied_at_max && winner != Rating::Hold {
            debug!(symbol = %symbol, mass = winner_mass, "Vote tie at maximum, holding");
            let (_, hold_mass, hold_count) = buckets[1];
            winner = Rating::Hold;
            winner_mass = hold_mass;
            supporters = hold_count;
        }

        let confidence = if total_mass > 0.0 {
            (winner_mass / total_mass).clamp(0.0, 1.0)
        } else {
            0.0
        };

        // 매수/매도는 최소 지지 수와 신뢰도 하한을 추가로 요구
        let final_action = match winner {
            Rating::Buy | Rating::Sell
                if supporters < self.min_supporters || confidence < self.min_confidence =>
            {
                debug!(
                    symbol = %symbol,
                    supporters,
                    confidence,
                    "Action demoted to hold (insufficient support)"
                );
                TradeAction::Hold
            }
            Rating::Buy => TradeAction::Buy,
            Rating::Sell => TradeAction::Sell,
            Rating::Hold => TradeAction::Hold,
        };

        let position_limit = risk_verdict
            .and_then(|v| v.position_limit)
            .unwrap_or(self.default_position_limit);
        let quantity_pct = if final_action == TradeAction::Hold {
            0.0
        } else {
            confidence.min(position_limit).clamp(0.0, 1.0)
        };

        let key_factors: Vec<String> = votes
            .iter()
            .filter(|v| v.rating == winner)
            .flat_map(|v| v.reasoning.iter().cloned())
            .collect();

        info!(
            symbol = %symbol,
            action = %final_action,
            confidence,
            quantity_pct,
            "Committee decision"
        );

        CommitteeDecision {
            symbol: symbol.to_string(),
            final_action,
            confidence,
            quantity_pct,
            stop_loss: risk_verdict.and_then(|v| v.stop_loss),
            take_profit: risk_verdict.and_then(|v| v.take_profit),
            key_factors,
            risk_concerns,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::RiskLevel;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn verdict(role: AnalystRole, rating: Rating, confidence: f64) -> AnalystVerdict {
        AnalystVerdict::new(role, "AAPL", rating, confidence)
    }

    fn risk_verdict(position_limit: f64) -> AnalystVerdict {
        AnalystVerdict::new(AnalystRole::Risk, "AAPL", Rating::Hold, 0.8)
            .with_reasoning(vec!["Market regime: bull".to_string()])
            .with_risk_guidance(RiskLevel::Low, position_limit, dec!(92), dec!(115))
    }

    #[test]
    fn test_empty_input_holds_with_zero_confidence() {
        let decision = Committee::default().aggregate("AAPL", &[]);
        assert_eq!(decision.final_action, TradeAction::Hold);
        assert_eq!(decision.confidence, 0.0);
        assert_eq!(decision.quantity_pct, 0.0);
    }

    #[test]
    fn test_all_failed_holds_and_records_concerns() {
        let verdicts = vec![
            AnalystVerdict::failed(AnalystRole::Fundamental, "AAPL", "no data"),
            AnalystVerdict::failed(AnalystRole::Technical, "AAPL", "timed out"),
        ];
        let decision = Committee::default().aggregate("AAPL", &verdicts);
        assert_eq!(decision.final_action, TradeAction::Hold);
        assert_eq!(decision.confidence, 0.0);
        assert_eq!(decision.risk_concerns.len(), 2);
        assert!(decision.risk_concerns[0].contains("fundamental"));
    }

    #[test]
    fn test_majority_buy_with_enough_support_executes() {
        // BUY 버킷 1.5 대 HOLD 버킷 0.5 -> 신뢰도 0.75
        let verdicts = vec![
            verdict(AnalystRole::Fundamental, Rating::Buy, 0.8),
            verdict(AnalystRole::Technical, Rating::Buy, 0.7),
            verdict(AnalystRole::Sentiment, Rating::Hold, 0.5),
            risk_verdict(0.40),
        ];
        let decision = Committee::default().aggregate("AAPL", &verdicts);
        assert_eq!(decision.final_action, TradeAction::Buy);
        assert!((decision.confidence - 0.75).abs() < 1e-9);
        assert!((decision.quantity_pct - 0.40).abs() < 1e-9);
        assert_eq!(decision.stop_loss, Some(dec!(92)));
        assert_eq!(decision.take_profit, Some(dec!(115)));
        assert_eq!(decision.key_factors.len(), 0); // 근거 미기재 의견들
    }

    #[test]
    fn test_single_supporter_demoted_to_hold() {
        let verdicts = vec![
            verdict(AnalystRole::Technical, Rating::Buy, 0.9),
            AnalystVerdict::failed(AnalystRole::Fundamental, "AAPL", "no data"),
        ];
        let decision = Committee::default().aggregate("AAPL", &verdicts);
        assert_eq!(decision.final_action, TradeAction::Hold);
        assert_eq!(decision.quantity_pct, 0.0);
    }

    #[test]
    fn test_low_confidence_majority_demoted_to_hold() {
        // SELL 버킷 0.55 대 BUY 0.5 + HOLD 0.5 -> 신뢰도 약 0.355
        let verdicts = vec![
            verdict(AnalystRole::Fundamental, Rating::Sell, 0.3),
            verdict(AnalystRole::Technical, Rating::Sell, 0.25),
            verdict(AnalystRole::Sentiment, Rating::Buy, 0.5),
            verdict(AnalystRole::Sentiment, Rating::Hold, 0.5),
        ];
        let decision = Committee::default().aggregate("AAPL", &verdicts);
        assert_eq!(decision.final_action, TradeAction::Hold);
    }

    #[test]
    fn test_buy_sell_tie_resolves_to_hold() {
        // 지지/신뢰도 하한이 없어도 최대 질량 동률은 관망으로 귀결
        let committee = Committee::new(1, 0.0, 0.25);
        let verdicts = vec![
            verdict(AnalystRole::Fundamental, Rating::Buy, 0.9)
                .with_reasoning(vec!["P/E=12.0 (undervalued)".to_string()]),
            verdict(AnalystRole::Technical, Rating::Sell, 0.9),
        ];

        let decision = committee.aggregate("AAPL", &verdicts);
        assert_eq!(decision.final_action, TradeAction::Hold);
        assert_eq!(decision.quantity_pct, 0.0);
        // 신뢰도와 근거도 매수 버킷이 아니라 관망 버킷 기준
        assert_eq!(decision.confidence, 0.0);
        assert!(decision.key_factors.is_empty());
    }

    #[test]
    fn test_hold_tie_with_direction_still_holds() {
        let committee = Committee::new(1, 0.0, 0.25);
        let verdicts = vec![
            verdict(AnalystRole::Fundamental, Rating::Buy, 0.6),
            verdict(AnalystRole::Technical, Rating::Hold, 0.6),
        ];

        let decision = committee.aggregate("AAPL", &verdicts);
        assert_eq!(decision.final_action, TradeAction::Hold);
        assert!((decision.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_quantity_capped_by_position_limit() {
        let verdicts = vec![
            verdict(AnalystRole::Fundamental, Rating::Buy, 0.9),
            verdict(AnalystRole::Technical, Rating::Buy, 0.9),
            risk_verdict(0.10),
        ];
        let decision = Committee::default().aggregate("AAPL", &verdicts);
        assert_eq!(decision.final_action, TradeAction::Buy);
        assert!((decision.quantity_pct - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_missing_risk_verdict_uses_default_limit() {
        let verdicts = vec![
            verdict(AnalystRole::Fundamental, Rating::Buy, 0.9),
            verdict(AnalystRole::Technical, Rating::Buy, 0.9),
        ];
        let decision = Committee::default().aggregate("AAPL", &verdicts);
        assert_eq!(decision.final_action, TradeAction::Buy);
        assert!((decision.quantity_pct - 0.25).abs() < 1e-9);
        assert!(decision.stop_loss.is_none());
    }

    #[test]
    fn test_risk_verdict_does_not_vote() {
        // 리스크 의견이 관망이어도 방향 투표에서 제외
        let verdicts = vec![
            verdict(AnalystRole::Fundamental, Rating::Buy, 0.8),
            verdict(AnalystRole::Technical, Rating::Buy, 0.7),
            risk_verdict(0.40),
        ];
        let decision = Committee::default().aggregate("AAPL", &verdicts);
        assert_eq!(decision.final_action, TradeAction::Buy);
        assert_eq!(decision.confidence, 1.0);
    }

    #[test]
    fn test_key_factors_come_from_winning_votes() {
        let verdicts = vec![
            verdict(AnalystRole::Fundamental, Rating::Buy, 0.8)
                .with_reasoning(vec!["P/E=15.0 (undervalued)".to_string()]),
            verdict(AnalystRole::Technical, Rating::Buy, 0.7)
                .with_reasoning(vec!["Trend: up (SMA50 > SMA200)".to_string()]),
            verdict(AnalystRole::Sentiment, Rating::Sell, 0.4)
                .with_reasoning(vec!["Composite sentiment=-0.50 (negative)".to_string()]),
        ];
        let decision = Committee::default().aggregate("AAPL", &verdicts);
        assert_eq!(decision.final_action, TradeAction::Buy);
        assert_eq!(decision.key_factors.len(), 2);
        assert!(decision.key_factors.iter().all(|f| !f.contains("sentiment")));
    }

    fn arb_verdict() -> impl Strategy<Value = AnalystVerdict> {
        (
            prop_oneof![
                Just(AnalystRole::Fundamental),
                Just(AnalystRole::Technical),
                Just(AnalystRole::Sentiment),
                Just(AnalystRole::Risk),
            ],
            prop_oneof![Just(Rating::Buy), Just(Rating::Hold), Just(Rating::Sell)],
            -1.0f64..2.0,
            proptest::bool::ANY,
        )
            .prop_map(|(role, rating, confidence, failed)| {
                if failed {
                    AnalystVerdict::failed(role, "AAPL", "synthetic failure")
                } else {
                    AnalystVerdict::new(role, "AAPL", rating, confidence)
                }
            })
    }

    proptest! {
        #[test]
        fn prop_confidence_and_quantity_are_bounded(
            verdicts in proptest::collection::vec(arb_verdict(), 0..8)
        ) {
            let decision = Committee::default().aggregate("AAPL", &verdicts);
            prop_assert!((0.0..=1.0).contains(&decision.confidence));
            prop_assert!((0.0..=1.0).contains(&decision.quantity_pct));
        }

        #[test]
        fn prop_hold_never_sizes_a_position(
            verdicts in proptest::collection::vec(arb_verdict(), 0..8)
        ) {
            let decision = Committee::default().aggregate("AAPL", &verdicts);
            if decision.final_action == TradeAction::Hold {
                prop_assert_eq!(decision.quantity_pct, 0.0);
            }
        }
    }
}
