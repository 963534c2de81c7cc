//! Shared profile arguments for `foulee validate` and `foulee generate`.
//!
//! Fields come from flags, a `[profile]` table in a TOML file, or both; a
//! flag always wins over the file value for the same field.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use foulee_core::RawProfileInput;

#[derive(Debug, Default, Args)]
pub struct ProfileArgs {
    /// Sex: homme, femme, or autre (male/female/other also accepted)
    #[arg(long)]
    pub sex: Option<String>,
    /// Age in years
    #[arg(long, allow_hyphen_values = true)]
    pub age: Option<String>,
    /// Height in centimeters
    #[arg(long, allow_hyphen_values = true)]
    pub height: Option<String>,
    /// Weight in kilograms (decimals allowed)
    #[arg(long, allow_hyphen_values = true)]
    pub weight: Option<String>,
    /// Goal marathon time, HH:MM:SS
    #[arg(long)]
    pub goal_time: Option<String>,
    /// TOML file with a [profile] table holding the same fields
    #[arg(long)]
    pub profile: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profile: RawProfileInput,
}

/// Read the `[profile]` table from a TOML file.
pub fn load_profile_file(path: &Path) -> Result<RawProfileInput> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile file {}", path.display()))?;
    let file: ProfileFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse profile file {}", path.display()))?;
    Ok(file.profile)
}

impl ProfileArgs {
    /// Assemble the raw input: file values first, then flag overrides.
    pub fn to_raw(&self) -> Result<RawProfileInput> {
        let mut raw = match &self.profile {
            Some(path) => load_profile_file(path)?,
            None => RawProfileInput::default(),
        };

        raw.merge(RawProfileInput {
            sex: self.sex.clone(),
            age: self.age.clone().unwrap_or_default(),
            height: self.height.clone().unwrap_or_default(),
            weight: self.weight.clone().unwrap_or_default(),
            goal_time: self.goal_time.clone().unwrap_or_default(),
        });
        Ok(raw)
    }
}
