use anyhow::Result;
use serde::Serialize;

/// Render a report as pretty-printed JSON
pub fn render<T: Serialize>(report: &T) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}
