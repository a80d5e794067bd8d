//! WAV file reading and writing.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};
use suena_core::AudioBuffer;

use crate::Result;

/// Read a WAV file into an [`AudioBuffer`].
///
/// Integer PCM is scaled to `[-1, 1]`; float data is taken as-is. Channels
/// stay interleaved; the playback voice mixes down at render time.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok(AudioBuffer::new(samples, spec.channels, spec.sample_rate))
}

/// Write an [`AudioBuffer`] to a 32-bit float WAV file.
pub fn write_wav<P: AsRef<Path>>(path: P, buffer: &AudioBuffer) -> Result<()> {
    let spec = hound::WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in buffer.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn roundtrip_f32() {
        let samples: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();
        let buffer = AudioBuffer::new(samples.clone(), 1, 48000);

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &buffer).unwrap();

        let loaded = read_wav(file.path()).unwrap();
        assert_eq!(loaded.sample_rate(), 48000);
        assert_eq!(loaded.channels(), 1);
        assert_eq!(loaded.samples().len(), samples.len());
        for (a, b) in samples.iter().zip(loaded.samples().iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn stereo_stays_interleaved() {
        let samples = vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
        let buffer = AudioBuffer::new(samples.clone(), 2, 44100);

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &buffer).unwrap();

        let loaded = read_wav(file.path()).unwrap();
        assert_eq!(loaded.channels(), 2);
        assert_eq!(loaded.frames(), 3);
        for (a, b) in samples.iter().zip(loaded.samples().iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn pcm16_is_scaled_to_unit_range() {
        let file = NamedTempFile::new().unwrap();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(file.path(), spec).unwrap();
        writer.write_sample(i16::MAX).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(i16::MIN).unwrap();
        writer.finalize().unwrap();

        let loaded = read_wav(file.path()).unwrap();
        let samples = loaded.samples();
        assert!((samples[0] - 1.0).abs() < 1e-3);
        assert_eq!(samples[1], 0.0);
        assert!((samples[2] + 1.0).abs() < 1e-3);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_wav("/definitely/not/here.wav").is_err());
    }
}
