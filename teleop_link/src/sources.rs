//! Frame sources for LeapMotion hardware and overlay-window simulation.
//!
//! Both deliver [`SourceEvent`]s through the [`FrameSource`] trait; the
//! pipeline cannot tell them apart.  The replay source lives in
//! [`crate::replay`].

use std::sync::mpsc::{Receiver, Sender};

use teleop_core::{FrameSource, HandFrame, JointSample, Point, SourceEvent, SURFACE_W};

// ════════════════════════════════════════════════════════════════════════════
// LeapFrameSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Frame source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Each tracking event becomes one frame.  The palm of the first left and
/// first right hand is projected onto the control surface: the horizontal
/// axis spans `LEAP_X_MM`, palm height spans `LEAP_Y_MM` (higher palm =
/// smaller surface y).  A hand missing from the frame is `NotTracked`.
#[cfg(feature = "leap")]
pub struct LeapFrameSource;

/// Horizontal palm range (mm, device frame) mapped onto surface x `0..640`.
pub const LEAP_X_MM: (f32, f32) = (-250.0, 250.0);
/// Palm height range (mm above the device) mapped onto surface y `480..0`.
pub const LEAP_Y_MM: (f32, f32) = (80.0, 480.0);

/// Project a palm position (mm) onto the control surface.
pub fn leap_to_surface(x_mm: f32, y_mm: f32) -> Point {
    let u = (x_mm - LEAP_X_MM.0) / (LEAP_X_MM.1 - LEAP_X_MM.0);
    let v = (y_mm - LEAP_Y_MM.0) / (LEAP_Y_MM.1 - LEAP_Y_MM.0);
    Point::new(
        u as f64 * SURFACE_W,
        (1.0 - v as f64) * teleop_core::SURFACE_H,
    )
}

#[cfg(feature = "leap")]
impl FrameSource for LeapFrameSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        use leaprs::*;
        use tracing::{debug, info};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                let _ = tx.send(SourceEvent::Unavailable(format!("LeapC connection: {:?}", e)));
                return;
            }
        };
        if let Err(e) = connection.open() {
            let _ = tx.send(SourceEvent::Unavailable(format!("LeapMotion device: {:?}", e)));
            return;
        }
        info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(e) => {
                    debug!("leap poll: {:?}", e);
                    continue;
                }
            };

            if let Event::Tracking(frame) = msg.event() {
                let mut out = HandFrame::untracked();
                for hand in frame.hands() {
                    let p = hand.palm().position();
                    let sample = JointSample::tracked(leap_to_surface(p.x, p.y));
                    match hand.hand_type() {
                        HandType::Left  if !out.left.is_tracked()  => out.left  = sample,
                        HandType::Right if !out.right.is_tracked() => out.right = sample,
                        _ => {}
                    }
                }
                if tx.send(SourceEvent::Frame(out)).is_err() { return; }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource — pointer simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input sampled from the overlay window once per window update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer inside the window, in surface pixels.
    Pointer { x: f32, y: f32, hold: SimHold },
    /// Pointer left the window: nobody in view.
    NoPointer,
    Quit,
}

/// Keys held while the pointer moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimHold {
    #[default]
    None,
    /// Space: the pointed-at hand reports `Inferred`.
    PointedInferred,
    /// B: both hands report `Inferred`.
    BothInferred,
}

/// Translate one window sample into a sensor frame.
///
/// The surface's left half belongs to the left hand (triggers), the right
/// half to the right hand (motor pad); the hand that isn't pointed at is
/// reported `NotTracked`.
pub fn sim_frame(x: f32, y: f32, hold: SimHold) -> HandFrame {
    let p = Point::new(x as f64, y as f64);
    let pointed = match hold {
        SimHold::None => JointSample::tracked(p),
        SimHold::PointedInferred | SimHold::BothInferred => JointSample::inferred(p),
    };
    let other = match hold {
        SimHold::BothInferred => JointSample::inferred(p),
        _ => JointSample::lost(),
    };
    if p.x < SURFACE_W / 2.0 {
        HandFrame { left: pointed, right: other }
    } else {
        HandFrame { left: other, right: pointed }
    }
}

/// Frame source driven by [`SimInput`] events from the overlay window.
///
/// The window sends `SimInput` here; this translator converts them to
/// frames.  This decouples the window event loop from the pipeline.
pub struct SimFrameSource {
    pub rx: Receiver<SimInput>,
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        for input in self.rx {
            let event = match input {
                SimInput::Pointer { x, y, hold } => SourceEvent::Frame(sim_frame(x, y, hold)),
                SimInput::NoPointer             => SourceEvent::Frame(HandFrame::untracked()),
                SimInput::Quit                  => {
                    let _ = tx.send(SourceEvent::Quit);
                    return;
                }
            };
            if tx.send(event).is_err() { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
