//! Motor-pad response curve.
//!
//! A point inside the pad is re-expressed relative to the pad centre (with
//! "up" positive), small offsets are zeroed by a dead zone, and each axis is
//! normalised by the pad's half extent and shaped with a square root.  The
//! square root gives fine control near the centre and reaches full magnitude
//! at the pad edge.

use crate::joint::Point;
use crate::region::Rect;

/// Two independent drive components, each nominally in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpeedVector {
    pub x: f64,
    pub y: f64,
}

impl SpeedVector {
    pub const ZERO: SpeedVector = SpeedVector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        SpeedVector { x, y }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SpeedCurve
// ════════════════════════════════════════════════════════════════════════════

/// Dead zone + square-root shaping over a rectangular pad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedCurve {
    center:      Point,
    half_width:  f64,
    half_height: f64,
    /// Offsets with magnitude strictly below this are treated as zero.
    dead_zone:   f64,
}

pub const DEAD_ZONE_PX: f64 = 50.0;

impl SpeedCurve {
    pub fn for_pad(pad: &Rect) -> Self {
        SpeedCurve {
            center:      pad.center(),
            half_width:  pad.half_width(),
            half_height: pad.half_height(),
            dead_zone:   DEAD_ZONE_PX,
        }
    }

    /// The square around the pad centre in which both axes read zero.
    pub fn dead_zone_rect(&self) -> Rect {
        Rect::open(
            self.center.x - self.dead_zone,
            self.center.y - self.dead_zone,
            self.center.x + self.dead_zone,
            self.center.y + self.dead_zone,
        )
    }

    /// Surface point → pad-local offset, screen y flipped.
    pub fn rebase(&self, p: Point) -> (f64, f64) {
        (p.x - self.center.x, -(p.y - self.center.y))
    }

    /// Map a point that lies inside the pad.
    ///
    /// The curve does not clamp.  Offsets beyond the pad's half extent are
    /// outside its domain; callers must check `in_pad` first.
    ///
    /// # Panics
    ///
    /// In debug builds, if `p` is further from the centre than the pad
    /// half extents.
    pub fn map(&self, p: Point) -> SpeedVector {
        let (lx, ly) = self.rebase(p);
        debug_assert!(
            lx.abs() <= self.half_width && ly.abs() <= self.half_height,
            "point {:?} lies outside the motor pad", p
        );
        SpeedVector {
            x: shape(self.dead(lx), self.half_width),
            y: shape(self.dead(ly), self.half_height),
        }
    }

    fn dead(&self, v: f64) -> f64 {
        if v.abs() < self.dead_zone { 0.0 } else { v }
    }
}

/// `sign(v) · sqrt(|v| / extent)`; zero maps to positive zero.
fn shape(v: f64, extent: f64) -> f64 {
    let magnitude = (v.abs() / extent).sqrt();
    if v < 0.0 { -magnitude } else { magnitude }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionClassifier;

    fn curve() -> SpeedCurve {
        SpeedCurve::for_pad(&RegionClassifier::new().motor_pad().rect)
    }

    #[test]
    fn centre_is_dead() {
        assert_eq!(curve().map(Point::new(480.0, 240.0)), SpeedVector::ZERO);
    }

    #[test]
    fn right_edge_is_full_forward_x() {
        let s = curve().map(Point::new(640.0, 240.0));
        assert_eq!(s.x, 1.0);
        assert_eq!(s.y, 0.0);
    }

    #[test]
    fn left_edge_is_full_reverse_x() {
        assert_eq!(curve().map(Point::new(320.0, 240.0)).x, -1.0);
    }

    #[test]
    fn screen_up_is_positive_y() {
        let c = curve();
        assert_eq!(c.map(Point::new(480.0, 120.0)).y, 1.0);
        assert_eq!(c.map(Point::new(480.0, 360.0)).y, -1.0);
    }

    #[test]
    fn dead_zone_is_exact_zero_per_axis() {
        let c = curve();
        for off in [-49.9, -25.0, -0.5, 0.0, 0.5, 25.0, 49.9] {
            let s = c.map(Point::new(480.0 + off, 240.0 + off));
            assert_eq!(s.x, 0.0, "x offset {}", off);
            assert_eq!(s.y, 0.0, "y offset {}", off);
            assert!(s.x.is_sign_positive() && s.y.is_sign_positive());
        }
    }

    #[test]
    fn dead_zone_edge_is_live() {
        let s = curve().map(Point::new(530.0, 240.0));
        assert!((s.x - (50.0f64 / 160.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn axes_are_independent() {
        // x in its dead zone, y well outside
        let s = curve().map(Point::new(490.0, 180.0));
        assert_eq!(s.x, 0.0);
        assert!((s.y - 0.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn monotonic_outside_dead_zone() {
        let c = curve();
        let mut prev = 0.0;
        for lx in 50..=160 {
            let s = c.map(Point::new(480.0 + lx as f64, 240.0));
            assert!(s.x >= prev, "lx={}", lx);
            prev = s.x;
        }
        let mut prev = 0.0;
        for ly in 50..=120 {
            let s = c.map(Point::new(480.0, 240.0 + ly as f64));
            assert!(s.y.abs() >= prev, "ly={}", ly);
            prev = s.y.abs();
        }
    }

    #[test]
    fn sign_follows_offset() {
        let c = curve();
        for (x, y) in [(340.0, 130.0), (620.0, 130.0), (340.0, 350.0), (620.0, 350.0)] {
            let (lx, ly) = c.rebase(Point::new(x, y));
            let s = c.map(Point::new(x, y));
            assert_eq!(s.x.signum(), lx.signum());
            assert_eq!(s.y.signum(), ly.signum());
        }
    }

    #[test]
    fn output_stays_within_unit_range_over_pad() {
        let c = curve();
        for x in (320..=640).step_by(8) {
            for y in (120..=360).step_by(8) {
                let s = c.map(Point::new(x as f64, y as f64));
                assert!(s.x.abs() <= 1.0 && s.y.abs() <= 1.0);
            }
        }
    }

    #[test]
    fn dead_zone_rect_is_centred() {
        let r = curve().dead_zone_rect();
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (430.0, 190.0, 530.0, 290.0));
    }
}
