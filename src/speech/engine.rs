use crate::config::Config;
use crate::speech::sink::PcmSink;
use crate::Result;

/// Engine voice parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoiceParams {
    /// Speaking rate in words per minute
    pub speed: u32,

    /// Amplitude, 0-200
    pub volume: u32,

    /// Pause between words, in 10 ms units
    pub word_gap: u32,

    /// Base pitch, 0-99
    pub pitch: u32,

    /// Capital-letter indication mode
    pub capitals: u32,
}

impl VoiceParams {
    /// Take the parameters from the configuration snapshot
    pub fn from_config(config: &Config) -> Self {
        Self {
            speed: config.voice.speed,
            volume: config.voice.volume,
            word_gap: config.voice.wordgap,
            pitch: config.voice.pitch,
            capitals: config.voice.capitals,
        }
    }
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Synchronous text-to-speech engine
///
/// The orchestrator drives one engine per request on the calling thread;
/// `synthesize` blocks for the full duration of synthesis.
pub trait TtsEngine {
    /// Prepare the engine for synchronous output with the given internal
    /// buffer length; returns the native sample rate it will produce at
    fn initialize(&mut self, buffer_ms: u32) -> Result<u32>;

    /// Select the voice by name
    fn set_voice(&mut self, voice: &str) -> Result<()>;

    /// Apply voice parameters
    fn set_params(&mut self, params: &VoiceParams) -> Result<()>;

    /// Synthesize text, pushing successive 16-bit mono PCM chunks into the
    /// sink at the native rate. Once the sink returns
    /// [`SinkControl::Stop`](crate::speech::SinkControl::Stop), the engine
    /// must not produce another chunk.
    fn synthesize(&mut self, text: &str, sink: &mut dyn PcmSink) -> Result<()>;
}
