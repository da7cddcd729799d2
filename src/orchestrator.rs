//! Per-request synthesis pipeline
//!
//! Drives one utterance from text to played audio on the calling thread:
//! cache check, synthesis, resampling to the target rate, playback, and a
//! best-effort cache write. Synthesis, resample, and playback failures are
//! terminal for the request; there are no retries and no degraded fallback.

use crate::audio::{resample, PcmBuffer};
use crate::cache::{CacheManager, TextFingerprint};
use crate::config::Config;
use crate::speech::{BufferSink, TtsEngine, VoiceParams};
use crate::telephony::{answer_if_not_up, PlaybackChannel, PlaybackOutcome};
use crate::Result;
use tempfile::Builder;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Interrupt-key set meaning "any DTMF digit"
pub const DIGIT_ANY: &str = "0123456789*#";

/// Engine-internal synthesis buffer length, in milliseconds
const SYNTH_BUFFER_MS: u32 = 2000;

/// One utterance to speak on a channel
///
/// Immutable once built; created per invocation and discarded after playback.
#[derive(Clone, Debug)]
pub struct SayRequest {
    /// Request ID for log correlation
    pub id: Uuid,

    /// Text to synthesize, with any surrounding quotes stripped
    pub text: String,

    /// Keys that may cut playback short; None plays to the end
    pub interrupt_keys: Option<String>,

    /// Voice overriding the configured default
    pub voice_override: Option<String>,
}

impl SayRequest {
    /// Create a request for the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: strip_quotes(&text.into()).to_string(),
            interrupt_keys: None,
            voice_override: None,
        }
    }

    /// Set the interrupt keys; `"any"` expands to every DTMF digit
    pub fn with_interrupt(mut self, keys: impl Into<String>) -> Self {
        let keys = keys.into();
        self.interrupt_keys = Some(if keys.eq_ignore_ascii_case("any") {
            DIGIT_ANY.to_string()
        } else {
            keys
        });
        self
    }

    /// Override the configured voice for this request
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice_override = Some(voice.into());
        self
    }
}

/// Strip surrounding whitespace and one pair of enclosing double quotes
fn strip_quotes(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

/// Speak one request on a channel
///
/// Cache hits stream the previously rendered file and skip the engine
/// entirely. Misses synthesize at the engine's native rate, resample to the
/// configured target rate when the two differ, play the result, and then
/// commit it to the cache best-effort. The rendered temp file is removed on
/// every exit path, including all failure states.
pub fn say(
    engine: &mut dyn TtsEngine,
    chan: &mut dyn PlaybackChannel,
    config: &Config,
    request: &SayRequest,
) -> Result<PlaybackOutcome> {
    if request.text.is_empty() {
        warn!("No text passed for synthesis");
        return Ok(PlaybackOutcome::Completed);
    }

    let interrupt = request.interrupt_keys.as_deref().unwrap_or("");
    let voice = request
        .voice_override
        .as_deref()
        .unwrap_or(&config.voice.voice);
    let target_rate = config.target_sample_rate();

    debug!(
        request = %request.id,
        text = %request.text,
        interrupt,
        voice,
        target_rate,
        "Processing say request"
    );

    let cache = CacheManager::from_config(config);
    let fingerprint = TextFingerprint::of(&request.text);
    let mut write_cache = false;

    if let Some(entry) = cache.entry_path(&fingerprint) {
        if entry.is_file() {
            debug!(request = %request.id, "Cache hit: {}", entry.display());
            answer_if_not_up(chan)?;
            let language = chan.language().to_string();
            match chan.stream_file(&entry, &language) {
                Ok(()) => {
                    let outcome = chan.wait_stream(interrupt);
                    chan.stop_stream();
                    return outcome;
                }
                Err(e) => {
                    // Stale or unreadable entry; synthesize fresh instead
                    error!(
                        channel = chan.name(),
                        "Streaming cache entry failed: {}", e
                    );
                }
            }
        } else {
            debug!(request = %request.id, "Cache entry does not yet exist");
            write_cache = true;
        }
    }

    // SYNTHESIZE
    let native_rate = engine.initialize(SYNTH_BUFFER_MS)?;
    engine.set_voice(voice)?;
    engine.set_params(&VoiceParams::from_config(config))?;

    let mut sink = BufferSink::new();
    engine.synthesize(&request.text, &mut sink)?;
    let buffer = sink.into_buffer(native_rate);
    debug!(
        request = %request.id,
        frames = buffer.frames(),
        native_rate,
        "Synthesis complete"
    );

    // RESAMPLE, only when the native rate differs from the target
    let buffer = if native_rate != target_rate {
        resample(&buffer, target_rate)?
    } else {
        buffer
    };

    // Unique temp file, deleted on drop whichever way this function exits
    let temp = render_to_temp(&buffer, target_rate)?;

    // PLAY
    answer_if_not_up(chan)?;
    let language = chan.language().to_string();
    if let Err(e) = chan.stream_file(temp.path(), &language) {
        error!(channel = chan.name(), "Streaming failed: {}", e);
        return Err(e);
    }
    let outcome = chan.wait_stream(interrupt);
    chan.stop_stream();
    let outcome = outcome?;

    // CACHE_WRITE, best-effort: the caller has already heard the result
    if write_cache {
        if let Err(e) = cache.commit(temp.path(), &fingerprint) {
            warn!(request = %request.id, "{}", e);
        }
    }

    Ok(outcome)
}

/// Write the rendered buffer to a uniquely named temp file
///
/// The suffix encodes the target rate the way the telephony side expects
/// headerless PCM to be named.
fn render_to_temp(buffer: &PcmBuffer, target_rate: u32) -> Result<tempfile::NamedTempFile> {
    let suffix = if target_rate == 16000 { ".sln16" } else { ".sln" };
    let temp = Builder::new().prefix("tspk_").suffix(suffix).tempfile()?;
    buffer.write_raw(temp.path())?;
    Ok(temp)
}
