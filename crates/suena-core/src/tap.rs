//! Capture point for analysis nodes.
//!
//! A tap node sums everything connected to it per render block and hands the
//! summed signal to a [`TapSink`], a fixed-capacity ring of the most recent
//! samples. Analyzers read the ring on their own schedule, so capture and
//! consumption are decoupled.

use std::sync::Mutex;

/// Fixed-capacity ring buffer of the most recent samples seen by a tap node.
#[derive(Debug)]
pub struct TapSink {
    ring: Mutex<Ring>,
}

#[derive(Debug)]
struct Ring {
    data: Vec<f32>,
    write_pos: usize,
}

impl TapSink {
    /// Create a sink holding the last `capacity` samples. The ring starts
    /// zero-filled, so readers before the first capture see silence.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: Mutex::new(Ring {
                data: vec![0.0; capacity.max(1)],
                write_pos: 0,
            }),
        }
    }

    /// Number of samples the sink retains.
    pub fn capacity(&self) -> usize {
        match self.ring.lock() {
            Ok(ring) => ring.data.len(),
            Err(poisoned) => poisoned.into_inner().data.len(),
        }
    }

    /// Append a rendered block, overwriting the oldest samples.
    pub fn capture(&self, block: &[f32]) {
        let mut ring = match self.ring.lock() {
            Ok(ring) => ring,
            Err(poisoned) => poisoned.into_inner(),
        };
        let cap = ring.data.len();
        // Only the last `cap` samples of an oversized block can survive.
        let tail = &block[block.len().saturating_sub(cap)..];
        let mut pos = ring.write_pos;
        for &sample in tail {
            ring.data[pos] = sample;
            pos = (pos + 1) % cap;
        }
        ring.write_pos = pos;
    }

    /// Copy the most recent `out.len()` samples into `out`, oldest first.
    ///
    /// Requests longer than the capacity are front-padded with silence.
    pub fn latest(&self, out: &mut [f32]) {
        let ring = match self.ring.lock() {
            Ok(ring) => ring,
            Err(poisoned) => poisoned.into_inner(),
        };
        let cap = ring.data.len();
        let n = out.len().min(cap);
        let pad = out.len() - n;
        out[..pad].fill(0.0);
        for (i, slot) in out[pad..].iter_mut().enumerate() {
            let idx = (ring.write_pos + cap - n + i) % cap;
            *slot = ring.data[idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sink_reads_silence() {
        let sink = TapSink::new(8);
        let mut out = [1.0f32; 4];
        sink.latest(&mut out);
        assert_eq!(out, [0.0; 4]);
    }

    #[test]
    fn latest_returns_most_recent_in_order() {
        let sink = TapSink::new(4);
        sink.capture(&[1.0, 2.0, 3.0]);
        sink.capture(&[4.0, 5.0]);
        let mut out = [0.0f32; 4];
        sink.latest(&mut out);
        assert_eq!(out, [2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn oversized_capture_keeps_tail() {
        let sink = TapSink::new(3);
        sink.capture(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut out = [0.0f32; 3];
        sink.latest(&mut out);
        assert_eq!(out, [3.0, 4.0, 5.0]);
    }

    #[test]
    fn short_read_sees_newest_samples() {
        let sink = TapSink::new(8);
        sink.capture(&[1.0, 2.0, 3.0, 4.0]);
        let mut out = [0.0f32; 2];
        sink.latest(&mut out);
        assert_eq!(out, [3.0, 4.0]);
    }
}
