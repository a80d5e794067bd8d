//! Decoded audio sample storage.

/// A fully decoded, immutable block of audio samples.
///
/// Samples are interleaved `f32` in `[-1, 1]`. Buffers are shared between the
/// owning node and the render voice via `Arc` and never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from interleaved samples.
    ///
    /// A `channels` of zero is treated as mono so frame arithmetic never
    /// divides by zero.
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: channels.max(1),
            sample_rate,
        }
    }

    /// Interleaved sample data.
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of interleaved channels.
    #[inline]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Sample rate the audio was recorded at, in Hz.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of sample frames (one frame spans all channels).
    #[inline]
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / f64::from(self.sample_rate)
        }
    }

    /// The frame at `index`, mixed down to mono by averaging channels.
    ///
    /// Returns 0.0 for out-of-range indices.
    #[inline]
    pub fn frame_mono(&self, index: usize) -> f32 {
        let ch = self.channels as usize;
        let start = index * ch;
        match self.samples.get(start..start + ch) {
            Some(frame) => frame.iter().sum::<f32>() / ch as f32,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_accounting() {
        let buf = AudioBuffer::new(vec![0.0; 96], 2, 48000);
        assert_eq!(buf.frames(), 48);
        assert_eq!(buf.channels(), 2);
        assert!((buf.duration_secs() - 0.001).abs() < 1e-9);
    }

    #[test]
    fn mono_mixdown_averages_channels() {
        let buf = AudioBuffer::new(vec![1.0, 0.0, -1.0, -1.0], 2, 44100);
        assert!((buf.frame_mono(0) - 0.5).abs() < 1e-6);
        assert!((buf.frame_mono(1) + 1.0).abs() < 1e-6);
        assert_eq!(buf.frame_mono(2), 0.0);
    }

    #[test]
    fn zero_channels_is_treated_as_mono() {
        let buf = AudioBuffer::new(vec![0.25; 4], 0, 44100);
        assert_eq!(buf.channels(), 1);
        assert_eq!(buf.frames(), 4);
    }
}
