//! Per-frame state transition and the pipeline that owns the state and the
//! outbound link.
//!
//! One cycle: latch hands → re-evaluate action (left tracked) → re-map speed
//! (right tracked and in pad) → transmit the current speed.  Each cycle runs
//! to completion before the next frame is taken; the pipeline is owned by a
//! single consumer and needs no locking.

use tracing::{debug, info, trace, warn};

use crate::action::{ActionState, ActionStateMachine};
use crate::command::{Command, CommandSink};
use crate::curve::{SpeedCurve, SpeedVector};
use crate::joint::{HandFrame, JointTracker, LatchOutcome, Point};
use crate::region::RegionClassifier;

// ════════════════════════════════════════════════════════════════════════════
// ControlState
// ════════════════════════════════════════════════════════════════════════════

/// Everything that persists between frames.  Also the read-only snapshot
/// handed to the overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlState {
    pub hands:  JointTracker,
    pub action: ActionStateMachine,
    pub speed:  SpeedVector,
}

/// What happened during one cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    pub left:           LatchOutcome,
    pub right:          LatchOutcome,
    /// Both hands were only inferred.
    pub ambiguous:      bool,
    pub action_changed: bool,
    pub speed_updated:  bool,
    /// Right hand was tracked but outside the motor pad; speed held.
    pub right_off_pad:  bool,
    pub command:        Command,
    /// False if the sink reported a failure (only set by [`Pipeline::cycle`]).
    pub delivered:      bool,
}

impl ControlState {
    pub fn left_hand(&self)  -> Point       { self.hands.left() }
    pub fn right_hand(&self) -> Point       { self.hands.right() }
    pub fn action_state(&self) -> ActionState { self.action.state() }

    /// Pure transition: the state after `frame`, and a report of the cycle.
    pub fn advance(
        &self,
        frame: &HandFrame,
        regions: &RegionClassifier,
        curve: &SpeedCurve,
    ) -> (ControlState, CycleReport) {
        let mut next = *self;
        let obs = next.hands.observe(frame);

        let mut action_changed = false;
        if obs.left == LatchOutcome::Updated {
            action_changed = next.action.set(next.hands.left(), regions);
        }

        let mut speed_updated = false;
        let mut right_off_pad = false;
        if obs.right == LatchOutcome::Updated {
            let p = next.hands.right();
            if regions.in_pad(p) {
                next.speed = curve.map(p);
                speed_updated = true;
            } else {
                right_off_pad = true;
            }
        }

        let report = CycleReport {
            left: obs.left,
            right: obs.right,
            ambiguous: obs.ambiguous,
            action_changed,
            speed_updated,
            right_off_pad,
            command: Command::from_speed(&next.speed),
            delivered: true,
        };
        (next, report)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LinkStats
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub frames:    u64,
    pub sent:      u64,
    pub dropped:   u64,
    pub ambiguous: u64,
}

// ════════════════════════════════════════════════════════════════════════════
// Pipeline
// ════════════════════════════════════════════════════════════════════════════

/// Owns the control state, the fixed layout, and the command sink.
pub struct Pipeline<S: CommandSink> {
    regions:  RegionClassifier,
    curve:    SpeedCurve,
    state:    ControlState,
    sink:     S,
    stats:    LinkStats,
    /// Whether the previous frame had any tracked hand; for acquire/lose logs.
    tracking: bool,
}

impl<S: CommandSink> Pipeline<S> {
    pub fn new(sink: S) -> Self {
        Self::with_regions(RegionClassifier::default(), sink)
    }

    pub fn with_regions(regions: RegionClassifier, sink: S) -> Self {
        let curve = SpeedCurve::for_pad(&regions.motor_pad().rect);
        Pipeline {
            regions,
            curve,
            state:    ControlState::default(),
            sink,
            stats:    LinkStats::default(),
            tracking: false,
        }
    }

    /// Run one full cycle for `frame` and transmit the resulting command.
    ///
    /// Never fails: a transmit error is logged, counted, and superseded by
    /// the next frame's datagram.
    pub fn cycle(&mut self, frame: &HandFrame) -> CycleReport {
        let (next, mut report) = self.state.advance(frame, &self.regions, &self.curve);
        self.state = next;
        self.stats.frames += 1;

        let tracking = frame.any_tracked();
        if tracking != self.tracking {
            if tracking {
                info!("tracked subject found");
            } else {
                info!("tracking lost; holding last command");
            }
            self.tracking = tracking;
        }
        if report.ambiguous {
            self.stats.ambiguous += 1;
        }
        if report.action_changed {
            debug!(action = %self.state.action_state(), "action changed");
        }
        if report.right_off_pad {
            trace!(right = ?self.state.right_hand(), "right hand outside motor pad");
        }

        match self.sink.send(&report.command) {
            Ok(()) => {
                self.stats.sent += 1;
                trace!(command = %report.command, "sent");
            }
            Err(e) => {
                self.stats.dropped += 1;
                report.delivered = false;
                warn!(command = %report.command, error = %e, "command dropped");
            }
        }
        report
    }

    pub fn state(&self)   -> ControlState       { self.state }
    pub fn stats(&self)   -> LinkStats          { self.stats }
    pub fn regions(&self) -> &RegionClassifier  { &self.regions }
    pub fn curve(&self)   -> &SpeedCurve        { &self.curve }
    pub fn sink(&self)    -> &S                 { &self.sink }

    /// Release the sink (and with it, the socket).
    pub fn into_sink(self) -> S { self.sink }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::JointSample;
    use crate::{Error, Result};

    #[derive(Default)]
    struct Recorder {
        sent: Vec<String>,
        fail_next: bool,
    }

    impl CommandSink for Recorder {
        fn send(&mut self, command: &Command) -> Result<()> {
            if std::mem::take(&mut self.fail_next) {
                return Err(Error::Transmit(std::io::ErrorKind::WouldBlock.into()));
            }
            self.sent.push(command.as_str().to_string());
            Ok(())
        }
    }

    fn pipeline() -> Pipeline<Recorder> {
        Pipeline::new(Recorder::default())
    }

    fn right(x: f64, y: f64) -> HandFrame {
        HandFrame { left: JointSample::lost(), right: JointSample::tracked(Point::new(x, y)) }
    }

    fn left(x: f64, y: f64) -> HandFrame {
        HandFrame { left: JointSample::tracked(Point::new(x, y)), right: JointSample::lost() }
    }

    #[test]
    fn scenario_centre_is_stop() {
        let mut p = pipeline();
        assert_eq!(p.cycle(&right(480.0, 240.0)).command.as_str(), "0.00 0.00");
    }

    #[test]
    fn scenario_right_edge_full_x() {
        let mut p = pipeline();
        assert_eq!(p.cycle(&right(640.0, 240.0)).command.as_str(), "1.00 0.00");
    }

    #[test]
    fn scenario_left_hand_actions() {
        let mut p = pipeline();
        p.cycle(&left(250.0, 150.0));
        assert_eq!(p.state().action_state(), ActionState::Fire);
        p.cycle(&left(250.0, 350.0));
        assert_eq!(p.state().action_state(), ActionState::Intake);
        p.cycle(&left(10.0, 10.0));
        assert_eq!(p.state().action_state(), ActionState::None);
    }

    #[test]
    fn hold_last_speed_through_loss_and_off_pad() {
        let mut p = pipeline();
        p.cycle(&right(600.0, 150.0));
        let held = p.state().speed;
        assert_ne!(held, SpeedVector::ZERO);

        p.cycle(&HandFrame::untracked());
        assert_eq!(p.state().speed, held);

        let r = p.cycle(&right(100.0, 100.0));
        assert!(r.right_off_pad);
        assert!(!r.speed_updated);
        assert_eq!(p.state().speed, held);
        // The hand position still moved even though speed did not.
        assert_eq!(p.state().right_hand(), Point::new(100.0, 100.0));
    }

    #[test]
    fn fire_stays_latched_after_left_hand_is_lost() {
        let mut p = pipeline();
        p.cycle(&left(250.0, 150.0));
        for _ in 0..30 {
            p.cycle(&HandFrame::untracked());
        }
        assert_eq!(p.state().action_state(), ActionState::Fire);
    }

    #[test]
    fn inferred_left_hand_does_not_clear_action() {
        let mut p = pipeline();
        p.cycle(&left(250.0, 350.0));
        p.cycle(&HandFrame {
            left:  JointSample::inferred(Point::new(10.0, 10.0)),
            right: JointSample::lost(),
        });
        assert_eq!(p.state().action_state(), ActionState::Intake);
    }

    #[test]
    fn same_frame_twice_is_idempotent() {
        let frame = HandFrame {
            left:  JointSample::tracked(Point::new(250.0, 150.0)),
            right: JointSample::tracked(Point::new(560.0, 300.0)),
        };
        let mut p = pipeline();
        p.cycle(&frame);
        let once = p.state();
        p.cycle(&frame);
        assert_eq!(p.state(), once);
    }

    #[test]
    fn one_datagram_per_frame_even_when_untracked() {
        let mut p = pipeline();
        p.cycle(&right(640.0, 240.0));
        p.cycle(&HandFrame::untracked());
        p.cycle(&HandFrame::untracked());
        assert_eq!(p.sink().sent, vec!["1.00 0.00", "1.00 0.00", "1.00 0.00"]);
        assert_eq!(p.stats().frames, 3);
        assert_eq!(p.stats().sent, 3);
    }

    #[test]
    fn transmit_failure_is_absorbed() {
        let mut p = pipeline();
        p.sink.fail_next = true;
        let r = p.cycle(&right(640.0, 240.0));
        assert!(!r.delivered);
        let r = p.cycle(&right(640.0, 240.0));
        assert!(r.delivered);
        assert_eq!(p.stats().dropped, 1);
        assert_eq!(p.sink().sent, vec!["1.00 0.00"]);
    }

    #[test]
    fn ambiguous_frames_are_counted_and_change_nothing() {
        let mut p = pipeline();
        p.cycle(&right(640.0, 240.0));
        let before = p.state();
        let r = p.cycle(&HandFrame {
            left:  JointSample::inferred(Point::new(250.0, 150.0)),
            right: JointSample::inferred(Point::new(320.0, 240.0)),
        });
        assert!(r.ambiguous);
        assert_eq!(p.state(), before);
        assert_eq!(p.stats().ambiguous, 1);
    }

    #[test]
    fn advance_is_pure() {
        let s = ControlState::default();
        let regions = RegionClassifier::new();
        let curve = SpeedCurve::for_pad(&regions.motor_pad().rect);
        let (next, _) = s.advance(&right(640.0, 240.0), &regions, &curve);
        assert_eq!(s, ControlState::default());
        assert_eq!(next.speed, SpeedVector::new(1.0, 0.0));
    }
}
