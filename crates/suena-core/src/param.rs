//! Gain smoothing for zipper-free level changes.
//!
//! Voices read their gain target from an atomic cell once per block; applying
//! the new value instantly would produce audible steps. [`SmoothedGain`] is a
//! one-pole lowpass over the target value, advanced once per sample.

/// A gain value smoothed with a one-pole lowpass.
///
/// `y[n] = y[n-1] + coeff * (target - y[n-1])`, where the coefficient is
/// derived from the smoothing time constant and the sample rate.
#[derive(Debug, Clone)]
pub struct SmoothedGain {
    current: f32,
    target: f32,
    coeff: f32,
}

/// Default smoothing time constant in milliseconds.
const SMOOTHING_MS: f32 = 5.0;

impl SmoothedGain {
    /// Create a smoothed gain at `initial`, settled, for the given sample rate.
    pub fn new(initial: f32, sample_rate: f32) -> Self {
        let coeff = if sample_rate <= 0.0 {
            1.0
        } else {
            let samples_per_tau = SMOOTHING_MS / 1000.0 * sample_rate;
            1.0 - (-1.0 / samples_per_tau).exp()
        };
        Self {
            current: initial,
            target: initial,
            coeff,
        }
    }

    /// Set the value the gain smooths toward.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Advance by one sample and return the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the gain has effectively reached its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Jump to the target immediately. Used when a voice (re)starts so the
    /// first rendered block does not fade in from a stale level.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }
}
