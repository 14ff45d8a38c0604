//! Connection settings from file and flags

use anyhow::{Context, Result};
use azur_core::protocol::ConnectionConfig;
use std::fs;
use std::path::Path;

/// Build the connection config: defaults, then the JSON file (if any), then
/// the `--port` flag.
pub fn load(path: Option<&Path>, port: Option<&str>) -> Result<ConnectionConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<ConnectionConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ConnectionConfig::default(),
    };

    if let Some(port) = port {
        config.port_name = port.to_string();
    }

    Ok(config)
}
