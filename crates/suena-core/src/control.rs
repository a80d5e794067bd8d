//! Lock-free parameter cells shared between façade nodes and render voices.
//!
//! Façade objects live on the host thread; their voices run wherever the
//! graph is rendered. Parameters cross that boundary through atomic cells:
//! each write is a single atomic store, each voice reads once per block, so
//! updates are tear-free without taking the graph lock.

use std::sync::atomic::{AtomicU8, AtomicU32, AtomicU64, Ordering};

/// An `f32` stored as atomic bits.
#[derive(Debug)]
pub struct AtomicF32 {
    bits: AtomicU32,
}

impl AtomicF32 {
    /// Create a cell holding `value`.
    pub fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    /// Read the current value.
    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Store a new value.
    #[inline]
    pub fn store(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// An `f64` stored as atomic bits. Used for transport positions, where f32
/// precision drifts after minutes of playback.
#[derive(Debug)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    /// Create a cell holding `value`.
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    /// Read the current value.
    #[inline]
    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Store a new value.
    #[inline]
    pub fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Transport state of a playable node.
///
/// Kept separate from the numeric rate parameter: pausing freezes the
/// position without touching the rate, and a rate of zero while `Playing`
/// simply holds position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Transport {
    /// Not producing output; position is at the start.
    Stopped = 0,
    /// Advancing position at the current rate.
    Playing = 1,
    /// Holding position; resuming continues from the frozen offset.
    Paused = 2,
}

/// A [`Transport`] stored atomically.
#[derive(Debug)]
pub struct AtomicTransport {
    state: AtomicU8,
}

impl AtomicTransport {
    /// Create a cell holding `state`.
    pub fn new(state: Transport) -> Self {
        Self {
            state: AtomicU8::new(state as u8),
        }
    }

    /// Read the current transport state.
    #[inline]
    pub fn load(&self) -> Transport {
        match self.state.load(Ordering::Relaxed) {
            1 => Transport::Playing,
            2 => Transport::Paused,
            _ => Transport::Stopped,
        }
    }

    /// Store a new transport state.
    #[inline]
    pub fn store(&self, state: Transport) {
        self.state.store(state as u8, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_cell_roundtrip() {
        let cell = AtomicF32::new(1.5);
        assert_eq!(cell.load(), 1.5);
        cell.store(-0.25);
        assert_eq!(cell.load(), -0.25);
    }

    #[test]
    fn f64_cell_roundtrip() {
        let cell = AtomicF64::new(0.0);
        cell.store(48_000.125);
        assert_eq!(cell.load(), 48_000.125);
    }

    #[test]
    fn transport_roundtrip() {
        let cell = AtomicTransport::new(Transport::Stopped);
        cell.store(Transport::Playing);
        assert_eq!(cell.load(), Transport::Playing);
        cell.store(Transport::Paused);
        assert_eq!(cell.load(), Transport::Paused);
    }
}
