//! Configuration file (`teleop.toml`).
//!
//! ```toml
//! [link]
//! endpoint = "10.17.6.2:80"
//! bind     = "0.0.0.0:0"
//! dry_run  = false
//!
//! [source]
//! kind        = "sim"        # sim | replay | leap
//! replay_path = "frames.jsonl"
//! replay_fps  = 30
//! loop_replay = false
//!
//! [overlay]
//! enabled = true
//! ```

use std::net::SocketAddrV4;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use teleop_core::{Error, Result, DEFAULT_ENDPOINT};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "teleop.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub link:    LinkConfig,
    #[serde(default)]
    pub source:  SourceConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// Outbound command link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Actuator controller, IPv4 `addr:port`.
    pub endpoint: String,
    /// Local address the sending socket binds to.
    pub bind:     String,
    /// Run the pipeline but discard every command.
    pub dry_run:  bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bind:     "0.0.0.0:0".to_string(),
            dry_run:  false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Mouse over the overlay window plays the tracked hand.
    Sim,
    /// Frames recorded in a JSON-lines file.
    Replay,
    /// LeapMotion controller (needs the `leap` feature).
    Leap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind:        SourceKind,
    pub replay_path: Option<PathBuf>,
    /// Replay cadence, frames per second.
    pub replay_fps:  u32,
    pub loop_replay: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            kind:        SourceKind::Sim,
            replay_path: None,
            replay_fps:  30,
            loop_replay: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig { enabled: true }
    }
}

impl Config {
    /// Check values are usable.  Returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.endpoint()?;
        self.bind_addr()?;
        if !(1..=240).contains(&self.source.replay_fps) {
            return Err(Error::Config(format!(
                "replay_fps must be in [1, 240], got {}", self.source.replay_fps
            )));
        }
        match self.source.kind {
            SourceKind::Replay if self.source.replay_path.is_none() => {
                return Err(Error::Config("replay source needs replay_path".to_string()));
            }
            SourceKind::Sim if !self.overlay.enabled => {
                return Err(Error::Config(
                    "sim source is driven from the overlay window; it cannot run headless".to_string(),
                ));
            }
            _ => {}
        }
        Ok(())
    }

    pub fn endpoint(&self) -> Result<SocketAddrV4> {
        parse_v4("endpoint", &self.link.endpoint)
    }

    pub fn bind_addr(&self) -> Result<SocketAddrV4> {
        parse_v4("bind", &self.link.bind)
    }

    /// Parse a config file.  Not validated here: command-line overrides
    /// may still complete it, so call [`Config::validate`] after applying them.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// `teleop.toml` in the working directory if present, else defaults.
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

fn parse_v4(field: &str, value: &str) -> Result<SocketAddrV4> {
    value.parse().map_err(|_| {
        Error::Config(format!("{} must be an IPv4 address:port, got {:?}", field, value))
    })
}
