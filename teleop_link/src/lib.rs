//! # teleop_link
//!
//! Runs the [`teleop_core`] pipeline against a live frame source and streams
//! the drive command to the robot, with an optional control-surface overlay.
//!
//! ## Frame sources
//!
//! | Source | Flag | Notes |
//! |---|---|---|
//! | Simulation | `--source sim` (default) | pointer over the overlay is the tracked hand |
//! | Replay | `--replay FILE` | JSON lines, one frame per line |
//! | LeapMotion | `--source leap` | needs `--features leap` and LeapC |
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Pointer, left half | left hand tracked (Fire / Intake triggers) |
//! | Pointer, right half | right hand tracked (motor pad) |
//! | Pointer outside window | nobody tracked |
//! | hold `Space` | pointed hand reported as inferred |
//! | hold `B` | both hands inferred |
//! | `Q` / `Escape` | quit |

pub mod config;
pub mod cli;
pub mod sources;
pub mod replay;
pub mod overlay;
pub mod app;
