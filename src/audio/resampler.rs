use crate::audio::PcmBuffer;
use crate::{Result, TelespeakError};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Frames fed to the interpolation filter per call
const CHUNK_FRAMES: usize = 1024;

/// Band-limited sinc resampler for mono audio
///
/// Wraps a rubato `SincFixedIn` and hides its fixed-chunk interface: input is
/// processed in zero-padded chunks, the filter delay is skipped, and the
/// output is truncated to exactly `floor(frames * target / source)` frames,
/// so the result matches a single-call computation regardless of chunking.
pub struct AudioResampler {
    resampler: SincFixedIn<f32>,
    source_rate: u32,
    target_rate: u32,
}

impl AudioResampler {
    /// Create a resampler converting `source_rate` to `target_rate`
    pub fn new(source_rate: u32, target_rate: u32) -> Result<Self> {
        if source_rate == 0 || target_rate == 0 {
            return Err(TelespeakError::Resample(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let resample_ratio = target_rate as f64 / source_rate as f64;

        // Short sinc with linear interpolation: the fast quality variant,
        // plenty for telephony-band speech
        let params = SincInterpolationParameters {
            sinc_len: 128,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 128,
            window: WindowFunction::Blackman2,
        };

        let resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, CHUNK_FRAMES, 1)
            .map_err(|e| TelespeakError::Resample(format!("Failed to create resampler: {}", e)))?;

        debug!(
            "Created resampler: {} Hz -> {} Hz (ratio {:.4})",
            source_rate, target_rate, resample_ratio
        );

        Ok(Self {
            resampler,
            source_rate,
            target_rate,
        })
    }

    /// Output frame count for a given input frame count
    ///
    /// Truncating, with the ratio computed in double precision.
    pub fn expected_output_frames(&self, input_frames: usize) -> usize {
        (input_frames as f64 * self.target_rate as f64 / self.source_rate as f64).floor() as usize
    }

    /// Get the source sample rate
    pub fn source_rate(&self) -> u32 {
        self.source_rate
    }

    /// Get the target sample rate
    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    /// Resample normalized mono samples
    ///
    /// Returns exactly `expected_output_frames(input.len())` samples.
    pub fn process(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let expected = self.expected_output_frames(input.len());
        let delay = self.resampler.output_delay();
        let needed = delay + expected;

        let mut produced: Vec<f32> = Vec::with_capacity(needed + CHUNK_FRAMES);
        let mut offset = 0;

        // Keep feeding fixed-size chunks, zero-padded past the end of the
        // input, until the filter has flushed the delayed tail
        while produced.len() < needed {
            let mut chunk = vec![vec![0.0f32; CHUNK_FRAMES]];
            if offset < input.len() {
                let take = (input.len() - offset).min(CHUNK_FRAMES);
                chunk[0][..take].copy_from_slice(&input[offset..offset + take]);
                offset += take;
            }

            let output = self
                .resampler
                .process(&chunk, None)
                .map_err(|e| TelespeakError::Resample(format!("Resampling failed: {}", e)))?;
            produced.extend_from_slice(&output[0]);
        }

        debug!(
            "Resampled {} frames -> {} frames",
            input.len(),
            expected
        );

        Ok(produced[delay..delay + expected].to_vec())
    }
}

/// Resample a PCM buffer to the target rate in one step
///
/// Pure transform: converts to normalized floats, runs the interpolation
/// filter, and converts back to 16-bit PCM. Equal rates pass the buffer
/// through unchanged.
pub fn resample(buffer: &PcmBuffer, target_rate: u32) -> Result<PcmBuffer> {
    if buffer.sample_rate == target_rate {
        return Ok(buffer.clone());
    }

    let mut resampler = AudioResampler::new(buffer.sample_rate, target_rate)?;
    let output = resampler.process(&buffer.to_f32())?;
    Ok(PcmBuffer::from_f32(&output, target_rate))
}
