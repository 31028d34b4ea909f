//! Top-level application loop.
//!
//! `AppState` owns the pipeline and the status line.  `run` wires a frame
//! source, the command sink, and (optionally) the overlay together and drives
//! one pipeline cycle per frame.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use teleop_core::{
    spawn_frame_source, CommandSink, Error, LinkStats, NullSink, Pipeline, Result, SourceEvent,
    UdpTransmitter,
};
use tracing::{info, warn};

use crate::config::{Config, SourceKind};
use crate::overlay::Overlay;
use crate::replay::ReplayFrameSource;
use crate::sources::SimFrameSource;

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow { Continue, Stop }

pub struct AppState<S: CommandSink> {
    pipeline:   Pipeline<S>,
    pub status: String,
}

impl<S: CommandSink> AppState<S> {
    pub fn new(sink: S) -> Self {
        AppState {
            pipeline: Pipeline::new(sink),
            status:   "Waiting for frames".to_string(),
        }
    }

    /// Process one source event.  Only an unavailable sensor is an error.
    pub fn handle_event(&mut self, event: SourceEvent) -> Result<Flow> {
        match event {
            SourceEvent::Frame(frame) => {
                let report = self.pipeline.cycle(&frame);
                let state = self.pipeline.state();
                self.status = format!(
                    "{}  cmd {}  frames {}  dropped {}",
                    state.action_state(),
                    report.command,
                    self.pipeline.stats().frames,
                    self.pipeline.stats().dropped,
                );
                Ok(Flow::Continue)
            }
            SourceEvent::Unavailable(reason) => Err(Error::SensorUnavailable(reason)),
            SourceEvent::Quit => Ok(Flow::Stop),
        }
    }

    pub fn pipeline(&self) -> &Pipeline<S> { &self.pipeline }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Overlay redraw interval.  Also the simulator's sampling period, since it
/// reads the pointer once per redraw.
pub const RENDER_TICK: Duration = Duration::from_millis(33);

/// Run one cycle per event, each as soon as it arrives, until `deadline`.
///
/// Returns `Flow::Stop` on quit or when the source is gone.  A source that
/// outpaces the caller still yields at the deadline so the overlay keeps
/// redrawing.
pub fn pump<S: CommandSink>(
    app:      &mut AppState<S>,
    frames:   &Receiver<SourceEvent>,
    deadline: Instant,
) -> Result<Flow> {
    loop {
        let wait = deadline.saturating_duration_since(Instant::now());
        match frames.recv_timeout(wait) {
            Ok(event) => {
                if app.handle_event(event)? == Flow::Stop { return Ok(Flow::Stop); }
                if Instant::now() >= deadline { return Ok(Flow::Continue); }
            }
            Err(RecvTimeoutError::Timeout)      => return Ok(Flow::Continue),
            Err(RecvTimeoutError::Disconnected) => return Ok(Flow::Stop),
        }
    }
}

/// Open the command link for `cfg`: UDP, or a null sink for dry runs.
pub fn open_sink(cfg: &Config) -> Result<Box<dyn CommandSink>> {
    if cfg.link.dry_run {
        info!("dry run: commands are discarded");
        return Ok(Box::new(NullSink));
    }
    let tx = UdpTransmitter::open(cfg.bind_addr()?, cfg.endpoint()?)?;
    info!(endpoint = %tx.endpoint(), local = %tx.local_addr()?, "command link open");
    Ok(Box::new(tx))
}

/// Run the full application until the source ends, the operator quits, or
/// the window closes.  Returns the link statistics on a clean exit.
pub fn run(cfg: &Config) -> Result<LinkStats> {
    cfg.validate()?;
    let mut app = AppState::new(open_sink(cfg)?);

    // ── Source (and the overlay, which the simulator needs) ──────────────
    let (sim_tx, sim_rx) = mpsc::channel();
    let frames: Receiver<SourceEvent> = match cfg.source.kind {
        SourceKind::Sim => spawn_frame_source(SimFrameSource { rx: sim_rx }),
        SourceKind::Replay => {
            let path = cfg.source.replay_path.as_deref()
                .ok_or_else(|| Error::Config("replay source needs replay_path".to_string()))?;
            spawn_frame_source(ReplayFrameSource::open(
                path, cfg.source.replay_fps, cfg.source.loop_replay,
            )?)
        }
        SourceKind::Leap => spawn_leap()?,
    };

    let mut overlay = if cfg.overlay.enabled {
        let sim = (cfg.source.kind == SourceKind::Sim).then(|| sim_tx.clone());
        match Overlay::new(sim) {
            Ok(o) => Some(o),
            Err(e) if cfg.source.kind == SourceKind::Sim => {
                return Err(Error::SensorUnavailable(format!("simulation window: {}", e)));
            }
            Err(e) => {
                warn!("overlay unavailable ({}); running headless", e);
                None
            }
        }
    } else {
        None
    };
    drop(sim_tx);

    info!(source = ?cfg.source.kind, overlay = overlay.is_some(), "running");

    // ── Main loop ─────────────────────────────────────────────────────────
    match overlay.as_mut() {
        Some(vis) => {
            loop {
                // 1. Poll window input (feeds the simulator)
                if !vis.poll_input() { break; }

                // 2. Cycle frames as they arrive until the next redraw
                if pump(&mut app, &frames, Instant::now() + RENDER_TICK)? == Flow::Stop { break; }

                // 3. Render
                let p = app.pipeline();
                vis.render(&p.state(), p.regions(), p.curve(), &app.status);
            }
        }
        None => {
            for event in frames.iter() {
                if app.handle_event(event)? == Flow::Stop { break; }
            }
        }
    }

    let stats = app.pipeline().stats();
    info!(
        frames = stats.frames, sent = stats.sent,
        dropped = stats.dropped, ambiguous = stats.ambiguous,
        "stopped"
    );
    Ok(stats)
}

#[cfg(feature = "leap")]
fn spawn_leap() -> Result<Receiver<SourceEvent>> {
    Ok(spawn_frame_source(crate::sources::LeapFrameSource))
}

#[cfg(not(feature = "leap"))]
fn spawn_leap() -> Result<Receiver<SourceEvent>> {
    Err(Error::SensorUnavailable(
        "built without LeapMotion support (rebuild with --features leap)".to_string(),
    ))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
