//! TTS engine contract and synthesis sinks
//!
//! The engine is an external collaborator driven synchronously: it pushes
//! successive PCM chunks into an injected sink, and the sink's return value
//! is the continue/stop signal the engine checks before the next chunk.

pub mod engine;
pub mod sink;

pub use engine::{TtsEngine, VoiceParams};
pub use sink::{BufferSink, ChannelSink, PcmSink, SinkControl};
