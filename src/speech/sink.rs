use crate::audio::PcmBuffer;
use crossbeam_channel::{bounded, Receiver, Sender};

/// What the engine should do after delivering a chunk
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkControl {
    /// Keep synthesizing
    Continue,

    /// Stop before producing the next chunk
    Stop,
}

/// Receives successive PCM chunks from a synthesizing engine
pub trait PcmSink {
    /// Accept one chunk of 16-bit mono samples
    fn write(&mut self, chunk: &[i16]) -> SinkControl;
}

/// Accumulates every chunk into a single in-memory buffer
///
/// This is the orchestrator's collector: the whole utterance is synthesized
/// before resampling and playback begin.
#[derive(Default)]
pub struct BufferSink {
    samples: Vec<i16>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of samples collected so far
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Take ownership of the collected audio, tagging it with the rate the
    /// engine reported at initialization
    pub fn into_buffer(self, sample_rate: u32) -> PcmBuffer {
        PcmBuffer::new(self.samples, sample_rate)
    }
}

impl PcmSink for BufferSink {
    fn write(&mut self, chunk: &[i16]) -> SinkControl {
        self.samples.extend_from_slice(chunk);
        SinkControl::Continue
    }
}

/// Forwards chunks over a bounded channel
///
/// For engines that synthesize on a thread of their own: the bounded channel
/// gives backpressure, and a dropped receiver turns into the stop signal.
pub struct ChannelSink {
    tx: Sender<Vec<i16>>,
}

impl ChannelSink {
    /// Create a sink and the receiving end, with room for `capacity` chunks
    pub fn new(capacity: usize) -> (Self, Receiver<Vec<i16>>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx }, rx)
    }
}

impl PcmSink for ChannelSink {
    fn write(&mut self, chunk: &[i16]) -> SinkControl {
        match self.tx.send(chunk.to_vec()) {
            Ok(()) => SinkControl::Continue,
            Err(_) => SinkControl::Stop,
        }
    }
}
