//! Configuration for cairn
//!
//! Stored as `config.toml` in the data dir. A missing file means defaults.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;

use crate::compaction::AgeThresholds;
use crate::error::{CairnError, Result};
use crate::render::RenderOptions;

pub use types::{
    CairnConfig, CompactionConfig, IngestConfig, PathsConfig, PruneConfig, RenderConfig,
    SummarizerConfig, CONFIG_FORMAT_VERSION,
};

/// Config file name inside the data dir
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the data dir
pub const DATA_DIR_ENV: &str = "CAIRN_DATA_DIR";

/// Resolve the data dir: explicit flag, then `CAIRN_DATA_DIR`, then the platform data dir
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|d| d.join("cairn"))
        .unwrap_or_else(|| PathBuf::from(".cairn"))
}

/// Seconds as a chrono duration, clamped to the representable range
pub fn saturating_seconds(value: i64) -> Duration {
    Duration::try_seconds(value).unwrap_or(if value < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    })
}

fn secs(value: u64) -> Duration {
    saturating_seconds(i64::try_from(value).unwrap_or(i64::MAX))
}

impl CairnConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: CairnConfig = toml::from_str(&content)?;
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(CairnError::invalid_value(
                "config version",
                format!(
                    "{} (newest supported: {})",
                    config.version, CONFIG_FORMAT_VERSION
                ),
            ));
        }
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CairnError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject values that would make the engine misbehave
    pub fn validate(&self) -> Result<()> {
        let c = &self.compaction;
        if !(c.summary_after_secs <= c.oneliner_after_secs
            && c.oneliner_after_secs <= c.tag_after_secs)
        {
            return Err(CairnError::invalid_value(
                "compaction thresholds (must be non-decreasing)",
                format!(
                    "{}/{}/{}",
                    c.summary_after_secs, c.oneliner_after_secs, c.tag_after_secs
                ),
            ));
        }
        if self.render.chars_per_token == 0 {
            return Err(CairnError::invalid_value("render.chars_per_token", 0));
        }
        if self.ingest.max_chunk_bytes == 0 {
            return Err(CairnError::invalid_value("ingest.max_chunk_bytes", 0));
        }
        Ok(())
    }

    pub fn age_thresholds(&self) -> AgeThresholds {
        AgeThresholds {
            summary: secs(self.compaction.summary_after_secs),
            oneliner: secs(self.compaction.oneliner_after_secs),
            tag: secs(self.compaction.tag_after_secs),
        }
    }

    pub fn max_orphan_age(&self) -> Duration {
        secs(self.prune.max_orphan_age_secs)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::from_tokens(self.render.token_budget, self.render.chars_per_token)
            .with_header(self.render.header.clone())
    }
}

impl SummarizerConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl PathsConfig {
    fn resolve(data_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            data_dir.join(path)
        }
    }

    pub fn snapshot_in(&self, data_dir: &Path) -> PathBuf {
        Self::resolve(data_dir, &self.snapshot)
    }

    pub fn cursor_in(&self, data_dir: &Path) -> PathBuf {
        Self::resolve(data_dir, &self.cursor)
    }

    pub fn briefing_in(&self, data_dir: &Path) -> PathBuf {
        Self::resolve(data_dir, &self.briefing)
    }
}
