//! CLI 하위 명령 구현.

pub mod analyze;
pub mod backtest;

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// 직렬화 가능한 결과를 JSON 파일로 저장합니다.
pub fn write_json<T: Serialize>(value: &T, path: &str) -> Result<()> {
    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
