//! # teleop_core
//!
//! Turns tracked operator hand positions into a two-axis drive command and a
//! discrete action trigger, and streams the drive command as one UDP datagram
//! per sensor frame.
//!
//! ## Control surface
//!
//! All positions live on a 640×480 surface (screen orientation, y grows
//! downward).
//!
//! ```text
//!  0                220  280   320                         640
//!  ┌──────────────────────────┬─────────────────────────────┐ 0
//!  │                          │                             │
//!  │                ┌────┐    ├─────────────────────────────┤ 120
//!  │                │FIRE│    │          MOTOR PAD          │
//!  │                └────┘    │          ┌───────┐          │ 180
//!  │                          │          │ dead  │          │
//!  │                          │          └───────┘          │
//!  │                ┌────┐    │                             │ 320
//!  │                │INTK│    ├─────────────────────────────┤ 360
//!  │                └────┘    │                             │ 380
//!  └──────────────────────────┴─────────────────────────────┘ 480
//! ```
//!
//! | Hand | Region | Effect |
//! |---|---|---|
//! | Left | Fire trigger | action = `Fire` |
//! | Left | Intake trigger | action = `Intake` |
//! | Left | anywhere else | action = `None` |
//! | Right | motor pad | speed = dead zone + square-root curve |
//! | Right | outside pad | speed held |
//!
//! Every output is *latched*: a hand that is not confidently tracked leaves
//! its position, and everything derived from it, exactly as it was.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use teleop_core::{HandFrame, JointSample, Pipeline, Point, UdpTransmitter};
//!
//! let link = UdpTransmitter::open("0.0.0.0:0".parse().unwrap(),
//!                                 "10.17.6.2:80".parse().unwrap()).unwrap();
//! let mut pipeline = Pipeline::new(link);
//!
//! let frame = HandFrame {
//!     left:  JointSample::tracked(Point::new(250.0, 150.0)),
//!     right: JointSample::tracked(Point::new(640.0, 240.0)),
//! };
//! let report = pipeline.cycle(&frame);
//! assert_eq!(report.command.as_str(), "1.00 0.00");
//! ```

pub mod joint;
pub mod region;
pub mod curve;
pub mod action;
pub mod command;
pub mod state;
pub mod source;

pub use joint::{Hand, HandFrame, JointSample, JointTracker, LatchOutcome, Point, TrackingConfidence};
pub use region::{ControlRegion, Rect, RegionClassifier, RegionId, SURFACE_H, SURFACE_W};
pub use curve::{SpeedCurve, SpeedVector};
pub use action::{ActionState, ActionStateMachine};
pub use command::{Command, CommandSink, NullSink, UdpTransmitter, DEFAULT_ENDPOINT};
pub use state::{ControlState, CycleReport, LinkStats, Pipeline};
pub use source::{spawn_frame_source, FrameSource, SourceEvent};

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that can leave the core.
///
/// Tracking loss and out-of-region points are not here: they are absorbed
/// into the hold-last-value contract and only show up in [`CycleReport`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No usable frame source, or the tracking stream could not be enabled.
    #[error("sensor unavailable: {0}")]
    SensorUnavailable(String),

    /// A datagram could not be handed to the network stack.
    #[error("transmit failed: {0}")]
    Transmit(#[source] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("replay line {line}: {message}")]
    Replay { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
