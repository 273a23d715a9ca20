//! YAML configuration file.
//!
//! One entry per remote, plus an optional default. Passwords are Gerrit
//! HTTP passwords, not account passwords.
//!
//! ```yaml
//! default_remote: upstream
//! remotes:
//!   upstream:
//!     url: https://gerrit-review.googlesource.com
//!     username: jdoe
//!     http_password: somelongstring4685
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub remotes: BTreeMap<String, Remote>,
    pub default_remote: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Remote {
    pub url: String,
    pub username: String,
    pub http_password: String,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_path()?,
        };
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).context("malformed config file")
    }

    /// Picks a remote: an explicit name, the configured default, or the
    /// only remote when exactly one exists.
    pub fn select_remote<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Remote)> {
        let name = match (name, &self.default_remote) {
            (Some(name), _) => name,
            (None, Some(default)) => default.as_str(),
            (None, None) if self.remotes.len() == 1 => {
                self.remotes.keys().next().unwrap().as_str()
            }
            (None, None) if self.remotes.is_empty() => bail!("no remotes configured"),
            (None, None) => bail!("several remotes configured but no default_remote set"),
        };
        let remote = self
            .remotes
            .get(name)
            .with_context(|| format!("remote {name:?} not found in config"))?;
        Ok((name, remote))
    }
}

fn default_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("cannot determine the user config directory")?;
    Ok(dir.join("ger").join("config.yml"))
}
