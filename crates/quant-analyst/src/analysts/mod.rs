//! 규칙 기반 분석가 구현.

pub mod fundamental;
pub mod risk;
pub mod sentiment;
pub mod technical;

pub use fundamental::FundamentalAnalyst;
pub use risk::RiskAnalyst;
pub use sentiment::SentimentAnalyst;
pub use technical::TechnicalAnalyst;
