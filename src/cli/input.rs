//! Reading retrieved passages from files

use std::path::Path;

use anyhow::Context;

/// Read passages from `path`
pub fn load_passages(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read passages file {}", path.display()))?;

    parse_passages(&text).with_context(|| format!("Invalid passages file {}", path.display()))
}

/// Parse a JSON array of strings, or else one passage per non-empty line
pub fn parse_passages(text: &str) -> anyhow::Result<Vec<String>> {
    let trimmed = text.trim_start();

    if trimmed.starts_with('[') {
        let passages: Vec<String> =
            serde_json::from_str(trimmed).context("Expected a JSON array of strings")?;
        return Ok(passages);
    }

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
