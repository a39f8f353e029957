use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use crate::config::Config;

/// Write the default config to `path`, creating parent directories.
///
/// Refuses to replace an existing file unless `force` is set. The file is
/// written atomically so a half-written config is never left behind.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let yaml = serde_saphyr::to_string(&Config::default())
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit().context("Failed to save config")?;

    tracing::info!("wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("qbit-calc-init-{}", std::process::id()));
        let path = dir.join("nested").join("config.yaml");

        write_default_config(&path, false).unwrap();
        let loaded = crate::config::load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, Config::default());

        let err = write_default_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        write_default_config(&path, true).unwrap();

        std::fs::remove_dir_all(&dir).ok();
    }
}
