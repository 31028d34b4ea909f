//! Named rectangles on the control surface and the hit tests against them.

use crate::action::ActionState;
use crate::joint::Point;

pub const SURFACE_W: f64 = 640.0;
pub const SURFACE_H: f64 = 480.0;

// ════════════════════════════════════════════════════════════════════════════
// Rect
// ════════════════════════════════════════════════════════════════════════════

/// Axis-aligned rectangle, `x0 <= x1`, `y0 <= y1`.
///
/// `inclusive` selects whether points lying on an edge count as inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub inclusive: bool,
}

impl Rect {
    /// Interior only; edges are outside.
    pub const fn open(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect { x0, y0, x1, y1, inclusive: false }
    }

    /// Interior plus edges.
    pub const fn closed(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect { x0, y0, x1, y1, inclusive: true }
    }

    pub fn contains(&self, p: Point) -> bool {
        if self.inclusive {
            p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
        } else {
            p.x > self.x0 && p.x < self.x1 && p.y > self.y0 && p.y < self.y1
        }
    }

    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    pub fn half_width(&self)  -> f64 { (self.x1 - self.x0) / 2.0 }
    pub fn half_height(&self) -> f64 { (self.y1 - self.y0) / 2.0 }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ControlRegion
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionId {
    FireTrigger,
    IntakeTrigger,
    MotorPad,
}

impl RegionId {
    pub fn label(&self) -> &'static str {
        match self {
            RegionId::FireTrigger   => "Fire",
            RegionId::IntakeTrigger => "Intake",
            RegionId::MotorPad      => "Motor pad",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlRegion {
    pub id:   RegionId,
    pub rect: Rect,
}

// ════════════════════════════════════════════════════════════════════════════
// RegionClassifier
// ════════════════════════════════════════════════════════════════════════════

/// The fixed region layout of the control surface.
///
/// Trigger edges are outside their trigger; pad edges are inside the pad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionClassifier {
    fire:      ControlRegion,
    intake:    ControlRegion,
    motor_pad: ControlRegion,
}

impl Default for RegionClassifier {
    fn default() -> Self {
        RegionClassifier {
            fire: ControlRegion {
                id:   RegionId::FireTrigger,
                rect: Rect::open(220.0, 120.0, 280.0, 180.0),
            },
            intake: ControlRegion {
                id:   RegionId::IntakeTrigger,
                rect: Rect::open(220.0, 320.0, 280.0, 380.0),
            },
            motor_pad: ControlRegion {
                id:   RegionId::MotorPad,
                rect: Rect::closed(320.0, 120.0, SURFACE_W, 360.0),
            },
        }
    }
}

impl RegionClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default layout with the two triggers moved.
    #[cfg(test)]
    fn with_triggers(fire: Rect, intake: Rect) -> Self {
        let mut c = Self::default();
        c.fire.rect = fire;
        c.intake.rect = intake;
        c
    }

    /// Which action the left hand is asking for.  Fire is tested first, so it
    /// wins if the triggers are ever laid out to overlap.
    pub fn classify_left(&self, p: Point) -> ActionState {
        if self.fire.rect.contains(p) {
            ActionState::Fire
        } else if self.intake.rect.contains(p) {
            ActionState::Intake
        } else {
            ActionState::None
        }
    }

    pub fn in_pad(&self, p: Point) -> bool {
        self.motor_pad.rect.contains(p)
    }

    pub fn motor_pad(&self) -> &ControlRegion { &self.motor_pad }

    /// All regions in evaluation order.
    pub fn regions(&self) -> [ControlRegion; 3] {
        [self.fire, self.intake, self.motor_pad]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_trigger_hit() {
        let c = RegionClassifier::new();
        assert_eq!(c.classify_left(Point::new(250.0, 150.0)), ActionState::Fire);
    }

    #[test]
    fn intake_trigger_hit() {
        let c = RegionClassifier::new();
        assert_eq!(c.classify_left(Point::new(250.0, 350.0)), ActionState::Intake);
    }

    #[test]
    fn overlapping_triggers_resolve_to_fire() {
        let c = RegionClassifier::with_triggers(
            Rect::open(200.0, 100.0, 300.0, 200.0),
            Rect::open(250.0, 150.0, 300.0, 250.0),
        );
        assert!(c.fire.rect.overlaps(&c.intake.rect));
        assert_eq!(c.classify_left(Point::new(275.0, 175.0)), ActionState::Fire);
        assert_eq!(c.classify_left(Point::new(275.0, 225.0)), ActionState::Intake);
        assert_eq!(c.classify_left(Point::new(225.0, 125.0)), ActionState::Fire);
    }

    #[test]
    fn far_corner_is_none() {
        let c = RegionClassifier::new();
        assert_eq!(c.classify_left(Point::new(10.0, 10.0)), ActionState::None);
    }

    #[test]
    fn trigger_edges_are_outside() {
        let c = RegionClassifier::new();
        assert_eq!(c.classify_left(Point::new(220.0, 150.0)), ActionState::None);
        assert_eq!(c.classify_left(Point::new(250.0, 180.0)), ActionState::None);
        assert_eq!(c.classify_left(Point::new(280.0, 350.0)), ActionState::None);
    }

    #[test]
    fn triggers_never_both_match() {
        let c = RegionClassifier::new();
        let [fire, intake, _] = c.regions();
        assert!(!fire.rect.overlaps(&intake.rect));
        for x in (200..=300).step_by(5) {
            for y in (100..=400).step_by(5) {
                let p = Point::new(x as f64, y as f64);
                assert!(!(fire.rect.contains(p) && intake.rect.contains(p)), "{:?}", p);
            }
        }
    }

    #[test]
    fn pad_edges_are_inside() {
        let c = RegionClassifier::new();
        assert!(c.in_pad(Point::new(320.0, 240.0)));
        assert!(c.in_pad(Point::new(640.0, 240.0)));
        assert!(c.in_pad(Point::new(480.0, 120.0)));
        assert!(c.in_pad(Point::new(480.0, 360.0)));
    }

    #[test]
    fn outside_pad() {
        let c = RegionClassifier::new();
        assert!(!c.in_pad(Point::new(319.0, 240.0)));
        assert!(!c.in_pad(Point::new(480.0, 361.0)));
        assert!(!c.in_pad(Point::new(480.0, 100.0)));
    }

    #[test]
    fn pad_geometry() {
        let pad = RegionClassifier::new().motor_pad().rect;
        assert_eq!(pad.center(), Point::new(480.0, 240.0));
        assert_eq!(pad.half_width(), 160.0);
        assert_eq!(pad.half_height(), 120.0);
    }
}
