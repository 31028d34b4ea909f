//! Hand samples and the latch that holds the last confidently tracked
//! position of each hand.

use serde::{Deserialize, Serialize};
use tracing::warn;

// ════════════════════════════════════════════════════════════════════════════
// Point
// ════════════════════════════════════════════════════════════════════════════

/// A position on the control surface, in surface pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Frame shape delivered by a frame source
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hand { Left, Right }

/// Per-joint confidence as reported by the sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingConfidence {
    #[default]
    NotTracked,
    /// The sensor guessed the position from neighbouring joints.
    Inferred,
    Tracked,
}

/// One joint reading: where the sensor thinks the hand is, and how sure it is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    #[serde(flatten)]
    pub position:   Point,
    #[serde(default)]
    pub confidence: TrackingConfidence,
}

impl JointSample {
    pub const fn new(position: Point, confidence: TrackingConfidence) -> Self {
        JointSample { position, confidence }
    }

    pub const fn tracked(position: Point) -> Self {
        Self::new(position, TrackingConfidence::Tracked)
    }

    pub const fn inferred(position: Point) -> Self {
        Self::new(position, TrackingConfidence::Inferred)
    }

    pub const fn lost() -> Self {
        Self::new(Point::ORIGIN, TrackingConfidence::NotTracked)
    }

    pub fn is_tracked(&self) -> bool {
        self.confidence == TrackingConfidence::Tracked
    }
}

/// Both hands of the single acted-upon subject for one sensor frame.
///
/// A frame with nobody in view is simply both hands `NotTracked`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    #[serde(default)]
    pub left:  JointSample,
    #[serde(default)]
    pub right: JointSample,
}

impl HandFrame {
    pub fn untracked() -> Self {
        HandFrame::default()
    }

    /// Both hands reported at low confidence in the same frame.
    pub fn is_ambiguous(&self) -> bool {
        self.left.confidence == TrackingConfidence::Inferred
            && self.right.confidence == TrackingConfidence::Inferred
    }

    pub fn any_tracked(&self) -> bool {
        self.left.is_tracked() || self.right.is_tracked()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JointTracker
// ════════════════════════════════════════════════════════════════════════════

/// Result of offering a sample to the latch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LatchOutcome { Updated, Unchanged }

/// What one frame did to the two latches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameObservation {
    pub left:      LatchOutcome,
    pub right:     LatchOutcome,
    pub ambiguous: bool,
}

/// Last confidently tracked position of each hand.
///
/// Both hands start at the origin; after the first `Tracked` sample for a
/// hand, only another `Tracked` sample can move it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JointTracker {
    left:  Point,
    right: Point,
}

impl JointTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(&self)  -> Point { self.left }
    pub fn right(&self) -> Point { self.right }

    /// Latch `position` for `hand` if and only if it is `Tracked`.
    pub fn update(
        &mut self,
        hand: Hand,
        position: Point,
        confidence: TrackingConfidence,
    ) -> LatchOutcome {
        if confidence != TrackingConfidence::Tracked {
            return LatchOutcome::Unchanged;
        }
        match hand {
            Hand::Left  => self.left  = position,
            Hand::Right => self.right = position,
        }
        LatchOutcome::Updated
    }

    /// Apply a whole frame.  Emits an advisory warning when both hands are
    /// only inferred; state is not affected by it.
    pub fn observe(&mut self, frame: &HandFrame) -> FrameObservation {
        let ambiguous = frame.is_ambiguous();
        if ambiguous {
            warn!(
                left  = ?frame.left.position,
                right = ?frame.right.position,
                "both hands inferred; positions may be unreliable"
            );
        }
        FrameObservation {
            left:  self.update(Hand::Left,  frame.left.position,  frame.left.confidence),
            right: self.update(Hand::Right, frame.right.position, frame.right.confidence),
            ambiguous,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_origin() {
        let t = JointTracker::new();
        assert_eq!(t.left(), Point::ORIGIN);
        assert_eq!(t.right(), Point::ORIGIN);
    }

    #[test]
    fn tracked_sample_overwrites() {
        let mut t = JointTracker::new();
        let out = t.update(Hand::Right, Point::new(500.0, 200.0), TrackingConfidence::Tracked);
        assert_eq!(out, LatchOutcome::Updated);
        assert_eq!(t.right(), Point::new(500.0, 200.0));
        assert_eq!(t.left(), Point::ORIGIN);
    }

    #[test]
    fn low_confidence_samples_are_ignored() {
        let mut t = JointTracker::new();
        t.update(Hand::Left, Point::new(250.0, 150.0), TrackingConfidence::Tracked);
        for c in [TrackingConfidence::Inferred, TrackingConfidence::NotTracked] {
            let out = t.update(Hand::Left, Point::new(1.0, 1.0), c);
            assert_eq!(out, LatchOutcome::Unchanged);
        }
        assert_eq!(t.left(), Point::new(250.0, 150.0));
    }

    #[test]
    fn never_returns_to_origin_after_tracking() {
        let mut t = JointTracker::new();
        t.update(Hand::Right, Point::new(400.0, 300.0), TrackingConfidence::Tracked);
        for _ in 0..10 {
            t.observe(&HandFrame::untracked());
        }
        assert_eq!(t.right(), Point::new(400.0, 300.0));
    }

    #[test]
    fn both_inferred_is_flagged_but_changes_nothing() {
        let mut t = JointTracker::new();
        t.update(Hand::Left, Point::new(10.0, 10.0), TrackingConfidence::Tracked);
        let before = t;
        let obs = t.observe(&HandFrame {
            left:  JointSample::inferred(Point::new(250.0, 150.0)),
            right: JointSample::inferred(Point::new(480.0, 240.0)),
        });
        assert!(obs.ambiguous);
        assert_eq!(obs.left, LatchOutcome::Unchanged);
        assert_eq!(obs.right, LatchOutcome::Unchanged);
        assert_eq!(t, before);
    }

    #[test]
    fn one_inferred_hand_is_not_ambiguous() {
        let frame = HandFrame {
            left:  JointSample::inferred(Point::ORIGIN),
            right: JointSample::lost(),
        };
        assert!(!frame.is_ambiguous());
    }
}
