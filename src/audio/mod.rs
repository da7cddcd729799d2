//! PCM buffers and sample-rate conversion
//!
//! This module provides:
//! - 16-bit mono PCM buffers with raw file I/O
//! - Band-limited sinc resampling to the telephony target rates

pub mod buffer;
pub mod resampler;

pub use buffer::PcmBuffer;
pub use resampler::{resample, AudioResampler};
