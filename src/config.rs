use crate::util::ring_buffer::EvictPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Optional settings read from `cbuf.toml`. Command-line flags win over these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// "clamp" (evict past empty leaves it empty) or "strict" (report an error)
    pub evict_policy: EvictPolicy,
    /// Exit with status 1 when the session ends on a protocol or buffer error.
    pub strict_exit: bool,
    /// Print a one-line diagnostic to stderr when the session ends on an error.
    pub diagnostics: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive used when RUST_LOG is unset and no -v is given
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            evict_policy: EvictPolicy::Clamp,
            strict_exit:  false,
            diagnostics:  true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "error".into() }
    }
}

// ── Load ──────────────────────────────────────────────────────────────

impl Config {
    /// Load from the default location, falling back to defaults if it is
    /// missing or unreadable.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| Self::from_file(&p).ok())
            .unwrap_or_default()
    }

    /// Load from an explicit path. Unlike `load`, failures are errors.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cbuf").join("cbuf.toml"))
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
