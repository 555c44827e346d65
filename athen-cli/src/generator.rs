//! Project scaffolding (`athen gen`)

use crate::config::config_path;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Starter configuration written by `athen gen`
pub const CONFIG_TEMPLATE: &str = r#"ip = "127.0.0.1"
port = 8080

[async]
safe_async = true

[documents]
hello = "hello"
"#;

/// Write a starter Athen.toml into `project_dir`
///
/// The directory is created when missing. An existing Athen.toml is never
/// overwritten.
pub fn generate_files(project_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(project_dir)
        .with_context(|| format!("Unable to create directory {:?}", project_dir))?;

    let path = config_path(project_dir);
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .with_context(|| format!("Unable to create {:?}", path))?;
    file.write_all(CONFIG_TEMPLATE.as_bytes())
        .with_context(|| format!("Unable to write to {:?}", path))?;

    log::info!("Wrote {:?}", path);
    Ok(path)
}
