//! Replay of recorded frames from a JSON-lines file.
//!
//! One frame per line:
//!
//! ```text
//! # comment lines and blank lines are skipped
//! {"left":{"x":250,"y":150,"confidence":"tracked"},"right":{"x":0,"y":0,"confidence":"not_tracked"}}
//! {"right":{"x":640,"y":240,"confidence":"tracked"}}
//! ```
//!
//! A missing hand is `NotTracked`.

use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use teleop_core::{Error, FrameSource, HandFrame, Result, SourceEvent};
use tracing::info;

/// Parse a whole replay document.  Line numbers in errors are 1-based.
pub fn parse_frames(text: &str) -> Result<Vec<HandFrame>> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| {
            let l = l.trim();
            !l.is_empty() && !l.starts_with('#')
        })
        .map(|(i, l)| {
            serde_json::from_str(l.trim()).map_err(|e| Error::Replay {
                line:    i + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Plays a fixed list of frames at a fixed rate, optionally looping.
pub struct ReplayFrameSource {
    frames:  Vec<HandFrame>,
    period:  Duration,
    looping: bool,
}

impl ReplayFrameSource {
    /// Read and parse the whole file up front.  An unreadable or empty file
    /// means there is no usable frame source.
    pub fn open(path: &Path, fps: u32, looping: bool) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::SensorUnavailable(format!("cannot read replay {}: {}", path.display(), e))
        })?;
        let frames = parse_frames(&text)?;
        if frames.is_empty() {
            return Err(Error::SensorUnavailable(format!(
                "replay {} contains no frames", path.display()
            )));
        }
        info!(path = %path.display(), frames = frames.len(), fps, "replay loaded");
        Ok(Self::from_frames(frames, fps, looping))
    }

    pub fn from_frames(frames: Vec<HandFrame>, fps: u32, looping: bool) -> Self {
        ReplayFrameSource {
            frames,
            period: Duration::from_secs(1) / fps.max(1),
            looping,
        }
    }

    pub fn len(&self) -> usize { self.frames.len() }

    pub fn is_empty(&self) -> bool { self.frames.is_empty() }
}

impl FrameSource for ReplayFrameSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        loop {
            for frame in &self.frames {
                if tx.send(SourceEvent::Frame(*frame)).is_err() { return; }
                thread::sleep(self.period);
            }
            if !self.looping { return; }
        }
    }
}
