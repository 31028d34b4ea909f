//! Software-rendered control-surface overlay using `minifb`.
//!
//! Layout (surface pixels, 1:1 with the window):
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │ FIRE / INTAKE / NONE         │  SPEED 0.00 0.00             │
//! │            ┌────┐            ├──────────────────────────────┤
//! │            │FIRE│            │        ┌──────────┐          │
//! │            └────┘            │        │ dead zone│          │
//! │            ┌──────┐          │        └──────────┘          │
//! │            │INTAKE│          ├──────────────────────────────┤
//! │            └──────┘          │                              │
//! │ status                       │                              │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! The overlay only reads [`ControlState`]; in simulation mode it also
//! samples the pointer and forwards it as [`SimInput`].

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use teleop_core::{
    Command, ControlState, Point, Rect, RegionClassifier, RegionId, SpeedCurve,
};

use crate::sources::{SimHold, SimInput};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:       usize = 640;
pub const WIN_H:       usize = 480;
const CENTRE_LINE_W:   usize = 5;
const HAND_RADIUS:     usize = 10;
const TEXT_SCALE:      usize = 3;
const BG_COLOR:        u32   = 0xFF000000;
const LINE_COLOR:      u32   = 0xFFFFFFFF;
const PAD_COLOR:       u32   = 0xFF8A2BE2;  // blue violet
const DEAD_ZONE_COLOR: u32   = 0xFFEE82EE;  // violet
const TRIGGER_COLOR:   u32   = 0xFFDB7093;  // pale violet red
const TEXT_COLOR:      u32   = 0xFFFFFF00;
const LEFT_HAND:       u32   = 0xFFFF0000;
const RIGHT_HAND:      u32   = 0xFF0000FF;
const STATUS_COLOR:    u32   = 0xFF888888;

// ════════════════════════════════════════════════════════════════════════════
// Overlay
// ════════════════════════════════════════════════════════════════════════════

pub struct Overlay {
    window: Window,
    buf:    Vec<u32>,
    /// Present only when the simulator is the frame source.
    sim_tx: Option<Sender<SimInput>>,
}

impl Overlay {
    pub fn new(sim_tx: Option<Sender<SimInput>>) -> Result<Self, String> {
        let mut window = Window::new(
            "Teleop Link — control surface",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        // The app loop paces redraws while it waits on frames.
        window.limit_update_rate(None);

        Ok(Overlay {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
        })
    }

    /// Sample keyboard and pointer.  Returns false when the window should close.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let quit = self.window.is_key_pressed(Key::Q, KeyRepeat::No)
                || self.window.is_key_pressed(Key::Escape, KeyRepeat::No);

        let Some(tx) = &self.sim_tx else { return !quit; };

        if quit {
            let _ = tx.send(SimInput::Quit);
            return false;
        }

        let hold = if self.window.is_key_down(Key::B) {
            SimHold::BothInferred
        } else if self.window.is_key_down(Key::Space) {
            SimHold::PointedInferred
        } else {
            SimHold::None
        };

        let input = match self.window.get_mouse_pos(MouseMode::Discard) {
            Some((x, y)) => SimInput::Pointer { x, y, hold },
            None         => SimInput::NoPointer,
        };
        let _ = tx.send(input);
        true
    }

    /// Render one frame from the pipeline's snapshot.
    pub fn render(
        &mut self,
        state:   &ControlState,
        regions: &RegionClassifier,
        curve:   &SpeedCurve,
        status:  &str,
    ) {
        self.buf.fill(BG_COLOR);

        // ── Centre line ───────────────────────────────────────────────────
        self.fill_rect(WIN_W / 2 - CENTRE_LINE_W / 2, 0, CENTRE_LINE_W, WIN_H, LINE_COLOR);

        // ── Regions ───────────────────────────────────────────────────────
        for region in regions.regions() {
            let color = match region.id {
                RegionId::MotorPad => PAD_COLOR,
                RegionId::FireTrigger | RegionId::IntakeTrigger => TRIGGER_COLOR,
            };
            self.draw_region(&region.rect, color);
            if region.id != RegionId::MotorPad {
                let (x, y) = px(Point::new(region.rect.x0 + 5.0, region.rect.y0 + 10.0));
                self.draw_text(&region.id.label().to_uppercase(), x, y, 2, TEXT_COLOR);
            }
        }
        self.draw_region(&curve.dead_zone_rect(), DEAD_ZONE_COLOR);

        // ── Readouts ──────────────────────────────────────────────────────
        let speed = format!("SPEED {}", Command::from_speed(&state.speed));
        self.draw_text(&speed, 360, 80, TEXT_SCALE, TEXT_COLOR);
        self.draw_text(state.action_state().name(), 20, 80, TEXT_SCALE, TEXT_COLOR);

        // ── Hands ─────────────────────────────────────────────────────────
        let (lx, ly) = px(state.left_hand());
        let (rx, ry) = px(state.right_hand());
        self.fill_circle(lx, ly, HAND_RADIUS, LEFT_HAND);
        self.fill_circle(rx, ry, HAND_RADIUS, RIGHT_HAND);

        // ── Status / legend ───────────────────────────────────────────────
        self.draw_text(status, 10, WIN_H - 30, 1, STATUS_COLOR);
        if self.sim_tx.is_some() {
            self.draw_text(
                "pointer=hand  space=inferred  b=both inferred  q=quit",
                10, WIN_H - 14, 1, STATUS_COLOR,
            );
        }

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    fn draw_region(&mut self, r: &Rect, fill: u32) {
        let (x0, y0) = px(Point::new(r.x0, r.y0));
        let (x1, y1) = px(Point::new(r.x1, r.y1));
        let (w, h) = (x1.saturating_sub(x0), y1.saturating_sub(y0));
        self.fill_rect(x0, y0, w, h, fill);
        self.draw_border(x0, y0, w, h, LINE_COLOR);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x+w).min(WIN_W) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y+h).min(WIN_H) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn fill_circle(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        let r = r as isize;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx*dx + dy*dy > r*r { continue; }
                let (x, y) = (cx as isize + dx, cy as isize + dy);
                if x >= 0 && y >= 0 {
                    self.set_pixel(x as usize, y as usize, color);
                }
            }
        }
    }

    /// 3×5 bitmap font, each glyph pixel drawn as a `scale`×`scale` block.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale;
            if cx + 4 * scale > WIN_W { break; }
        }
    }
}

/// Surface point → pixel, clamped into the window.
fn px(p: Point) -> (usize, usize) {
    let x = p.x.round().clamp(0.0, (WIN_W - 1) as f64) as usize;
    let y = p.y.round().clamp(0.0, (WIN_H - 1) as f64) as usize;
    (x, y)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}
