//! Command-line interface.  Flags override the config file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, SourceKind};

/// Hand-tracked drive controller: streams drive commands to the robot over UDP
#[derive(Parser, Debug)]
#[command(name = "teleop_link")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (default: ./teleop.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Frame source
    #[arg(short, long, value_enum)]
    pub source: Option<SourceKind>,

    /// Replay file (JSON lines); implies `--source replay`
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Actuator controller address, IPv4 addr:port
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Run the pipeline without sending anything
    #[arg(long)]
    pub dry_run: bool,

    /// No overlay window
    #[arg(long)]
    pub headless: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Enable debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Fold command-line overrides into `cfg`.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(path) = &self.replay {
            cfg.source.replay_path = Some(path.clone());
            cfg.source.kind = SourceKind::Replay;
        }
        if let Some(kind) = self.source {
            cfg.source.kind = kind;
        }
        if let Some(ep) = &self.endpoint {
            cfg.link.endpoint = ep.clone();
        }
        if self.dry_run {
            cfg.link.dry_run = true;
        }
        if self.headless {
            cfg.overlay.enabled = false;
        }
    }
}
