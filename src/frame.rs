//! Frame buffers and motion scoring
//!
//! The gate owns two buffers primed from the frame source's format: the
//! previous-frame buffer (overwritten every tick) and the undistorted
//! display buffer. Format compatibility is checked on every tick so a
//! source that changes shape mid-run degrades to a skipped tick instead of
//! corrupting gate state.

use serde::{Deserialize, Serialize};

use crate::error::GateError;

/// Shape and layout of a frame: interleaved 8-bit channels, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameFormat {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl FrameFormat {
    pub fn new(width: u32, height: u32, channels: u32) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Total number of bytes in one frame of this format
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// Compact "WxHxC" description used in mismatch errors
    pub fn describe(&self) -> String {
        format!("{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// An owned image frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    format: FrameFormat,
    data: Vec<u8>,
}

impl Frame {
    /// Create a frame from raw interleaved pixel data
    ///
    /// # Panics
    /// Panics if `data` length does not match the format. Frame producers
    /// construct frames from buffers they size themselves, so a mismatch
    /// here is a programming error, not a runtime condition.
    pub fn from_data(format: FrameFormat, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            format.byte_len(),
            "frame data length does not match format {}",
            format.describe()
        );
        Self { format, data }
    }

    /// Prime a zeroed frame matching another source's format
    ///
    /// This is how the gate sets up its previous-frame and display buffers
    /// before the first real frame arrives.
    pub fn mimic(format: &FrameFormat) -> Self {
        Self {
            format: *format,
            data: vec![0; format.byte_len()],
        }
    }

    pub fn format(&self) -> &FrameFormat {
        &self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Overwrite this frame's pixels with another frame's
    ///
    /// # Returns
    /// * `Ok(())` - Pixels copied
    /// * `Err(GateError)` - Format mismatch, buffer untouched
    pub fn copy_from(&mut self, other: &Frame) -> Result<(), GateError> {
        check_formats(&self.format, &other.format)?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }
}

/// Verify two frames share a format
pub fn check_formats(expected: &FrameFormat, actual: &FrameFormat) -> Result<(), GateError> {
    if expected != actual {
        return Err(GateError::FormatMismatch {
            expected: expected.describe(),
            actual: actual.describe(),
        });
    }
    Ok(())
}

/// Mean absolute per-pixel difference between two frames
///
/// Averaging order is fixed and reproduced exactly by tests: for each
/// channel, accumulate the absolute differences in f64 and divide by the
/// pixel count to get that channel's mean; the motion score is the
/// unweighted mean of the channel means. For single-channel frames this is
/// just the mean absolute difference.
///
/// # Returns
/// * `Ok(f64)` - Motion score in [0, 255]
/// * `Err(GateError)` - Frames differ in format
pub fn motion_score(a: &Frame, b: &Frame) -> Result<f64, GateError> {
    check_formats(a.format(), b.format())?;

    let format = a.format();
    let channels = format.channels as usize;
    let pixels = format.width as usize * format.height as usize;
    if pixels == 0 || channels == 0 {
        return Ok(0.0);
    }

    let mut channel_sums = vec![0.0f64; channels];
    for (pa, pb) in a.data().chunks_exact(channels).zip(b.data().chunks_exact(channels)) {
        for c in 0..channels {
            channel_sums[c] += (pa[c] as f64 - pb[c] as f64).abs();
        }
    }

    let mean_of_means: f64 =
        channel_sums.iter().map(|sum| sum / pixels as f64).sum::<f64>() / channels as f64;
    Ok(mean_of_means)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_filled(format: FrameFormat, value: u8) -> Frame {
        Frame::from_data(format, vec![value; format.byte_len()])
    }

    #[test]
    fn test_mimic_is_zeroed() {
        let format = FrameFormat::new(4, 3, 3);
        let frame = Frame::mimic(&format);
        assert_eq!(frame.format(), &format);
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_identical_frames_score_zero() {
        let format = FrameFormat::new(8, 8, 3);
        let a = frame_filled(format, 120);
        let b = frame_filled(format, 120);
        assert_eq!(motion_score(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_uniform_difference() {
        let format = FrameFormat::new(8, 8, 3);
        let a = frame_filled(format, 100);
        let b = frame_filled(format, 110);
        // Every channel differs by exactly 10, so the mean of channel means
        // is exactly 10.
        assert_eq!(motion_score(&a, &b).unwrap(), 10.0);
    }

    #[test]
    fn test_channel_means_averaged_unweighted() {
        // 2 pixels, 2 channels. Channel 0 differs by 0 and 4 (mean 2),
        // channel 1 differs by 8 and 8 (mean 8). Score = (2 + 8) / 2 = 5.
        let format = FrameFormat::new(2, 1, 2);
        let a = Frame::from_data(format, vec![10, 0, 10, 0]);
        let b = Frame::from_data(format, vec![10, 8, 14, 8]);
        assert_eq!(motion_score(&a, &b).unwrap(), 5.0);
    }

    #[test]
    fn test_difference_is_symmetric() {
        let format = FrameFormat::new(3, 3, 1);
        let a = Frame::from_data(format, vec![0, 50, 100, 150, 200, 250, 10, 20, 30]);
        let b = Frame::from_data(format, vec![5, 45, 110, 140, 220, 240, 15, 10, 40]);
        assert_eq!(
            motion_score(&a, &b).unwrap(),
            motion_score(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_single_channel_exact_mean() {
        let format = FrameFormat::new(2, 2, 1);
        let a = Frame::from_data(format, vec![0, 0, 0, 0]);
        let b = Frame::from_data(format, vec![1, 2, 3, 4]);
        // (1 + 2 + 3 + 4) / 4 = 2.5
        assert_eq!(motion_score(&a, &b).unwrap(), 2.5);
    }

    #[test]
    fn test_format_mismatch_rejected() {
        let a = frame_filled(FrameFormat::new(4, 4, 3), 0);
        let b = frame_filled(FrameFormat::new(4, 4, 1), 0);
        assert!(matches!(
            motion_score(&a, &b),
            Err(GateError::FormatMismatch { .. })
        ));
    }

    #[test]
    fn test_copy_from_format_mismatch_leaves_buffer() {
        let mut dst = frame_filled(FrameFormat::new(4, 4, 3), 7);
        let src = frame_filled(FrameFormat::new(2, 2, 3), 9);
        assert!(dst.copy_from(&src).is_err());
        assert!(dst.data().iter().all(|&b| b == 7));
    }

    #[test]
    fn test_copy_from_overwrites() {
        let format = FrameFormat::new(4, 4, 3);
        let mut dst = frame_filled(format, 7);
        let src = frame_filled(format, 9);
        dst.copy_from(&src).unwrap();
        assert!(dst.data().iter().all(|&b| b == 9));
    }
}
