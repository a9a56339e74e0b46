use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

use crate::scoring::ScoringRequest;

/// Serialization of a request file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// `.yaml` and `.yml` files are YAML; anything else, stdin included, is JSON.
    pub fn from_path(path: Option<&Path>) -> Self {
        let is_yaml = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);
        if is_yaml {
            InputFormat::Yaml
        } else {
            InputFormat::Json
        }
    }
}

/// Read a file, or stdin when the path is absent or `-`.
pub fn read_source(path: Option<&Path>) -> Result<(String, InputFormat)> {
    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))?;
            Ok((content, InputFormat::from_path(Some(path))))
        }
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read request from stdin")?;
            Ok((content, InputFormat::Json))
        }
    }
}

fn parse<T: DeserializeOwned>(content: &str, format: InputFormat) -> Result<T> {
    match format {
        InputFormat::Json => serde_json::from_str(content).context("Invalid JSON input"),
        InputFormat::Yaml => serde_saphyr::from_str(content).context("Invalid YAML input"),
    }
}

/// Parse a single scoring request.
pub fn parse_request(content: &str, format: InputFormat) -> Result<ScoringRequest> {
    parse(content, format)
}

/// Parse a list of scoring requests.
pub fn parse_requests(content: &str, format: InputFormat) -> Result<Vec<ScoringRequest>> {
    parse(content, format)
}
