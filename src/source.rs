//! Frame source seam and the deterministic synthetic camera
//!
//! The real grabber is an external camera driver; this module defines the
//! minimal capability the session needs from it (`is_frame_new` + `grab`)
//! and provides a seeded synthetic camera so the CLI demo and tests can
//! drive full sessions without hardware.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::frame::{Frame, FrameFormat};

/// Sequential producer of image frames
pub trait FrameSource {
    /// Format every grabbed frame will have
    fn format(&self) -> FrameFormat;

    /// Whether a new frame is ready this tick
    fn is_frame_new(&mut self) -> bool;

    /// Grab the next frame
    fn grab(&mut self) -> Frame;
}

/// Deterministic camera double
///
/// Renders a fixed gradient scene with small per-pixel sensor noise, and
/// periodically "shakes" for a few frames by shifting the whole scene's
/// brightness, which drives the motion score far above any sane threshold.
/// Identical seeds produce identical frame sequences.
pub struct SyntheticCamera {
    format: FrameFormat,
    base: Vec<u8>,
    rng: StdRng,
    frame_index: usize,
    noise_amplitude: u8,
    shake_every: usize,
    shake_frames: usize,
    shake_amplitude: u8,
}

impl SyntheticCamera {
    pub fn new(format: FrameFormat, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let base = (0..format.byte_len())
            .map(|i| ((i % 251) as u8).wrapping_add(rng.gen_range(0..8)))
            .collect();
        Self {
            format,
            base,
            rng,
            frame_index: 0,
            noise_amplitude: 1,
            shake_every: 0,
            shake_frames: 3,
            shake_amplitude: 60,
        }
    }

    /// Shake the scene for a few frames every `every` frames (0 disables)
    pub fn with_shake_every(mut self, every: usize) -> Self {
        self.shake_every = every;
        self
    }

    /// Per-pixel sensor noise amplitude (default 1, well under any
    /// reasonable motion threshold)
    pub fn with_noise_amplitude(mut self, amplitude: u8) -> Self {
        self.noise_amplitude = amplitude;
        self
    }

    fn shaking(&self) -> bool {
        self.shake_every != 0
            && self.frame_index % self.shake_every < self.shake_frames
            && self.frame_index >= self.shake_every
    }
}

impl FrameSource for SyntheticCamera {
    fn format(&self) -> FrameFormat {
        self.format
    }

    fn is_frame_new(&mut self) -> bool {
        true
    }

    fn grab(&mut self) -> Frame {
        let shake = if self.shaking() { self.shake_amplitude } else { 0 };
        let noise = self.noise_amplitude;
        let rng = &mut self.rng;
        let data = self
            .base
            .iter()
            .map(|&b| {
                let jitter = if noise == 0 { 0 } else { rng.gen_range(0..=noise) };
                b.saturating_add(jitter).saturating_add(shake)
            })
            .collect();
        self.frame_index += 1;
        Frame::from_data(self.format, data)
    }
}
