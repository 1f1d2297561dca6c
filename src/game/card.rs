//! Card entity: geometry, face state and the per-card animation records.
//! Animations are plain data advanced by the frame loop; nothing here touches
//! the DOM, so the whole module runs under native `cargo test`.

use std::f64::consts::PI;

pub const CARD_WIDTH: f64 = 90.0;
pub const CARD_HEIGHT: f64 = 120.0;

/// One flip takes this long.
pub const FLIP_DURATION_MS: f64 = 300.0;
/// Matched cards glow for this long.
pub const GLOW_DURATION_MS: f64 = 1000.0;

/// In-flight flip interpolation from `start` toward `target` (0 = back
/// fully shown, 1 = front fully shown).
#[derive(Clone, Copy, Debug)]
struct FlipAnim {
    start_ms: f64,
    start: f64,
    target: f64,
}

#[derive(Debug)]
pub struct Card {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub symbol: &'static str,
    pub face_up: bool,
    pub matched: bool,
    /// 0.0 shows the back, 1.0 the front; never leaves [0,1].
    pub flip_progress: f64,
    /// Glow intensity in [0,1]; 0 outside the post-match glow window.
    pub glow: f64,
    flip: Option<FlipAnim>,
    glow_start_ms: Option<f64>,
}

impl Card {
    pub fn new(x: f64, y: f64, symbol: &'static str) -> Self {
        Self {
            x,
            y,
            w: CARD_WIDTH,
            h: CARD_HEIGHT,
            symbol,
            face_up: false,
            matched: false,
            flip_progress: 0.0,
            glow: 0.0,
            flip: None,
            glow_start_ms: None,
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    pub fn animating(&self) -> bool {
        self.flip.is_some()
    }

    /// Start turning toward the opposite face. Ignored while a flip is in
    /// flight or once the card is matched, so a card never carries two
    /// concurrent flips.
    pub fn begin_flip(&mut self, now: f64) {
        if self.flip.is_some() || self.matched {
            return;
        }
        self.face_up = !self.face_up;
        self.flip = Some(FlipAnim {
            start_ms: now,
            start: self.flip_progress,
            target: if self.face_up { 1.0 } else { 0.0 },
        });
    }

    /// Lock the card face-up as matched and open the glow window. If a flip
    /// is mid-air it is re-aimed at the front from its current progress.
    pub fn begin_match(&mut self, now: f64) {
        self.matched = true;
        self.face_up = true;
        match self.flip.as_mut() {
            Some(anim) => {
                anim.start_ms = now;
                anim.start = self.flip_progress;
                anim.target = 1.0;
            }
            None => self.flip_progress = 1.0,
        }
        self.glow_start_ms = Some(now);
    }

    /// Advance the animation records. Called once per frame.
    pub fn advance(&mut self, now: f64) {
        if let Some(anim) = self.flip {
            let t = ((now - anim.start_ms) / FLIP_DURATION_MS).clamp(0.0, 1.0);
            if t >= 1.0 {
                self.flip_progress = anim.target;
                self.flip = None;
            } else {
                let eased = 0.5 - (t * PI).cos() / 2.0;
                self.flip_progress = anim.start + (anim.target - anim.start) * eased;
            }
        }
        if let Some(start) = self.glow_start_ms {
            let elapsed = now - start;
            if elapsed >= GLOW_DURATION_MS {
                self.glow = 0.0;
                self.glow_start_ms = None;
            } else {
                self.glow = (elapsed * 0.01).sin() / 2.0 + 0.5;
            }
        }
    }
}
