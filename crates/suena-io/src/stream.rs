//! Device output via cpal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream};
use suena_core::AudioContext;

use crate::{Error, Result};

/// Extract device name via `description()` (cpal 0.17+).
fn device_name(device: &Device) -> String {
    device
        .description()
        .map(|d| d.name().to_string())
        .unwrap_or_else(|_| "<unknown>".into())
}

/// A running output stream driving an [`AudioContext`].
///
/// Opens the default output device and renders the context's master mix
/// from the device callback, duplicating the mono mix across the device's
/// channels. The stream plays until the handle is dropped.
pub struct OutputStream {
    _stream: Stream,
    running: Arc<AtomicBool>,
    sample_rate: u32,
    channels: u16,
}

impl OutputStream {
    /// Opens the default output device and starts rendering `ctx`.
    ///
    /// The device is driven at its own default configuration; if its sample
    /// rate differs from the context's, playback speed shifts accordingly
    /// and a warning is logged.
    pub fn open(ctx: &AudioContext) -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(Error::NoDevice)?;
        let config = device
            .default_output_config()
            .map_err(|e| Error::Stream(e.to_string()))?;

        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(Error::UnsupportedFormat(format!(
                "{:?}",
                config.sample_format()
            )));
        }

        let sample_rate = config.sample_rate();
        let channels = config.channels();
        if (sample_rate as f32 - ctx.sample_rate()).abs() > f32::EPSILON {
            tracing::warn!(
                "device runs at {sample_rate} Hz but the context renders at {} Hz",
                ctx.sample_rate()
            );
        }
        tracing::info!(
            "output stream on {} ({channels} ch, {sample_rate} Hz)",
            device_name(&device)
        );

        let running = Arc::new(AtomicBool::new(true));
        let callback_running = Arc::clone(&running);
        let callback_ctx = ctx.clone();
        let mut mono: Vec<f32> = Vec::new();

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !callback_running.load(Ordering::SeqCst) {
                        data.fill(0.0);
                        return;
                    }
                    let frames = data.len() / channels as usize;
                    mono.resize(frames, 0.0);
                    callback_ctx.render(&mut mono);
                    for (frame, &sample) in data.chunks_mut(channels as usize).zip(mono.iter()) {
                        frame.fill(sample);
                    }
                },
                |err| tracing::error!("output stream error: {err}"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            running,
            sample_rate,
            channels,
        })
    }

    /// Sample rate the device runs at, in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count of the device.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}

impl Drop for OutputStream {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
