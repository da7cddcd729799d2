use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Mono 16-bit PCM audio tagged with its sample rate
///
/// Produced by the TTS engine or by the resampler. Each stage takes
/// ownership of the buffer; nothing is shared across requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcmBuffer {
    /// Signed 16-bit samples, mono
    pub samples: Vec<i16>,

    /// Sample rate of the audio in Hz
    pub sample_rate: u32,
}

impl PcmBuffer {
    /// Create a buffer from samples at the given rate
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of frames (equals sample count for mono audio)
    pub fn frames(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer contains no audio
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the duration of this audio in seconds
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Convert to normalized f32 samples in [-1.0, 1.0)
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples.iter().map(|&s| s as f32 / 32768.0).collect()
    }

    /// Build a buffer from normalized f32 samples, clamping out-of-range values
    pub fn from_f32(samples: &[f32], sample_rate: u32) -> Self {
        let samples = samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
            .collect();
        Self {
            samples,
            sample_rate,
        }
    }

    /// Write headerless signed 16-bit little-endian PCM
    ///
    /// This is the on-disk cache and playback format; the sample rate is
    /// implied entirely by configuration and never stored in the file.
    pub fn write_raw(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for sample in &self.samples {
            writer.write_all(&sample.to_le_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read headerless s16le PCM, tagging it with the given rate
    pub fn read_raw(path: &Path, sample_rate: u32) -> Result<Self> {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;

        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Export as a WAV file, mainly useful for inspecting cached utterances
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec)
            .map_err(|e| crate::TelespeakError::Io(format!("Failed to create WAV file: {}", e)))?;
        for &sample in &self.samples {
            writer
                .write_sample(sample)
                .map_err(|e| crate::TelespeakError::Io(format!("Failed to write WAV: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| crate::TelespeakError::Io(format!("Failed to finalize WAV: {}", e)))?;
        Ok(())
    }
}
