//! Configuration loading and parsing (Athen.toml)

use anyhow::{bail, Context, Result};
use athen_core::{HostConfig, DEFAULT_PORT};
use serde::Deserialize;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// File name looked up in the project directory
pub const CONFIG_FILE_NAME: &str = "Athen.toml";

/// On-disk layout of Athen.toml
#[derive(Debug, Clone, Deserialize)]
struct AthenToml {
    ip: String,
    port: Option<u16>,
    #[serde(default, rename = "async")]
    async_opts: AsyncOptions,
    documents: toml::Table,
}

#[derive(Debug, Clone, Deserialize)]
struct AsyncOptions {
    #[serde(default = "default_safe_async")]
    safe_async: bool,
}

impl Default for AsyncOptions {
    fn default() -> Self {
        Self {
            safe_async: default_safe_async(),
        }
    }
}

fn default_safe_async() -> bool {
    true
}

/// Path of Athen.toml inside `project_dir`
pub fn config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(CONFIG_FILE_NAME)
}

/// Load configuration from `<project_dir>/Athen.toml`
pub fn load_config(project_dir: &Path) -> Result<HostConfig> {
    let path = config_path(project_dir);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// Parse Athen.toml contents into a validated host configuration
pub fn parse_config(content: &str) -> Result<HostConfig> {
    let raw: AthenToml = toml::from_str(content)?;

    let ip: IpAddr = raw
        .ip
        .parse()
        .with_context(|| format!("Could not parse IP address `{}`", raw.ip))?;

    let mut config = HostConfig::new()
        .with_address(ip, raw.port.unwrap_or(DEFAULT_PORT))
        .with_safe_async(raw.async_opts.safe_async);

    for (route, value) in &raw.documents {
        let Some(entry) = value.as_str() else {
            bail!(
                "Document `{}` must name a catalog entry as a string, found {}",
                route,
                value
            );
        };
        config = config.add_document(route.as_str(), entry);
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            ip = "127.0.0.1"
            port = 8080

            [async]
            safe_async = false

            [documents]
            hello = "hello"
            state = "data"
        "#;

        let config = parse_config(toml_content).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert!(!config.safe_async);
        assert_eq!(config.documents.len(), 2);
        assert_eq!(config.documents[0].route, "hello");
        assert_eq!(config.documents[1].entry, "data");
    }

    #[test]
    fn test_optional_sections_default() {
        let config = parse_config("ip = \"0.0.0.0\"\n[documents]\n").unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.safe_async);
        assert!(config.documents.is_empty());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_config("ip = \"not-an-ip\"\n[documents]\n").is_err());
        assert!(parse_config("ip = \"127.0.0.1\"\n").is_err());
        assert!(parse_config("ip = \"127.0.0.1\"\n[documents]\nhello = 3\n").is_err());
    }

    #[test]
    fn test_load_config_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            config_path(dir.path()),
            "ip = \"127.0.0.1\"\n[documents]\nhello = \"hello\"\n",
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.documents.len(), 1);

        let missing = tempfile::tempdir().unwrap();
        let err = load_config(missing.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_tolerates_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            config_path(dir.path()),
            "ip = \"127.0.0.1\"\n[documents]\nhello = \"hello\"\n",
        )
        .unwrap();

        let with_slash = PathBuf::from(format!("{}/", dir.path().display()));
        assert_eq!(config_path(&with_slash), config_path(dir.path()));

        let config = load_config(&with_slash).unwrap();
        assert_eq!(config.documents[0].route, "hello");
    }
}
