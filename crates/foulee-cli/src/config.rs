//! Configuration file management for foulee.
//!
//! Provides a TOML-based config file at `~/.config/foulee/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Simulated generation delay used when nothing else is configured.
pub const DEFAULT_DELAY_MS: u64 = 800;

/// Bind address used by `foulee serve` when nothing else is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub calendar: CalendarSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarSection {
    /// Milliseconds between a valid submission and the plan showing up.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for CalendarSection {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerSection {
    /// Socket address for `foulee serve`.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_owned(),
        }
    }
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_bind() -> String {
    DEFAULT_BIND.to_owned()
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the foulee config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/foulee` or `~/.config/foulee`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("foulee");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("foulee")
}

/// Return the path to the foulee config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone)]
pub struct FouleeConfig {
    pub delay: Duration,
    pub bind: SocketAddr,
}

impl FouleeConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Delay: `cli_delay_ms` > `FOULEE_DELAY_MS` env > `calendar.delay_ms` > 800
    /// - Bind: `cli_bind` > `FOULEE_BIND` env > `server.bind` > `127.0.0.1:3000`
    pub fn resolve(cli_delay_ms: Option<u64>, cli_bind: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let delay_ms = if let Some(ms) = cli_delay_ms {
            ms
        } else if let Ok(raw) = std::env::var("FOULEE_DELAY_MS") {
            raw.trim()
                .parse()
                .with_context(|| format!("FOULEE_DELAY_MS is not a number: {raw:?}"))?
        } else if let Some(ref cfg) = file_config {
            cfg.calendar.delay_ms
        } else {
            DEFAULT_DELAY_MS
        };

        let bind = if let Some(addr) = cli_bind {
            addr.to_owned()
        } else if let Ok(addr) = std::env::var("FOULEE_BIND") {
            addr
        } else if let Some(ref cfg) = file_config {
            cfg.server.bind.clone()
        } else {
            DEFAULT_BIND.to_owned()
        };
        let bind: SocketAddr = bind
            .parse()
            .with_context(|| format!("invalid bind address: {bind:?}"))?;

        Ok(Self {
            delay: Duration::from_millis(delay_ms),
            bind,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
