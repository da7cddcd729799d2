//! Configuration snapshot loaded from a toml file
//!
//! Mirrors the `[general]` and `[voice]` sections of the engine config file.
//! A missing or invalid file falls back to built-in defaults with a warning;
//! configuration problems are never fatal. During request processing the
//! snapshot is read-only; reloads replace it wholesale via [`ConfigHandle`].

use parking_lot::RwLock;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Sample rate used when the configured one is unsupported
pub const DEFAULT_SAMPLE_RATE: u32 = 8000;

/// Target rates the telephony side can play
pub const SUPPORTED_SAMPLE_RATES: [u32; 2] = [8000, 16000];

/// Complete configuration snapshot
#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub voice: VoiceConfig,
}

/// `[general]` section: cache and output-rate settings
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct General {
    /// Reuse previously rendered utterances
    pub usecache: bool,

    /// Flat directory holding cache entries
    pub cachedir: PathBuf,

    /// Target sample rate, 8000 or 16000 Hz
    pub samplerate: u32,
}

/// `[voice]` section: engine voice parameters
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VoiceConfig {
    /// Default voice name, overridable per request
    pub voice: String,

    /// Speaking rate in words per minute
    pub speed: u32,

    /// Amplitude, 0-200
    pub volume: u32,

    /// Pause between words, in 10 ms units
    pub wordgap: u32,

    /// Base pitch, 0-99
    pub pitch: u32,

    /// Capital-letter indication mode
    pub capitals: u32,
}

impl Default for General {
    fn default() -> Self {
        Self {
            usecache: false,
            cachedir: PathBuf::from("/tmp"),
            samplerate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            voice: "default".to_string(),
            speed: 150,
            volume: 100,
            wordgap: 1,
            pitch: 50,
            capitals: 0,
        }
    }
}

impl Config {
    /// Load a configuration file, falling back to defaults on any problem
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "Unable to read config file {}: {}. Using default settings",
                    path.display(),
                    e
                );
                return Self::default();
            }
        };

        let config: Config = match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Invalid config file {}: {}. Using default settings",
                    path.display(),
                    e
                );
                Self::default()
            }
        };

        config.validated()
    }

    /// Parse configuration from a toml string, applying the same validation
    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        Ok(toml::from_str::<Config>(raw)?.validated())
    }

    fn validated(mut self) -> Self {
        if !SUPPORTED_SAMPLE_RATES.contains(&self.general.samplerate) {
            warn!(
                "Unsupported sample rate: {}. Falling back to {}",
                self.general.samplerate, DEFAULT_SAMPLE_RATE
            );
            self.general.samplerate = DEFAULT_SAMPLE_RATE;
        }
        self
    }

    /// The one output rate every request is rendered at
    pub fn target_sample_rate(&self) -> u32 {
        self.general.samplerate
    }
}

/// Live configuration holder shared across request threads
///
/// Requests take an `Arc` snapshot and never observe a partial update; a
/// reload swaps the whole snapshot.
pub struct ConfigHandle {
    inner: RwLock<Arc<Config>>,
}

impl ConfigHandle {
    /// Wrap an already loaded configuration
    pub fn new(config: Config) -> Self {
        Self {
            inner: RwLock::new(Arc::new(config)),
        }
    }

    /// Load the configuration file and wrap it
    pub fn load(path: &Path) -> Self {
        Self::new(Config::load(path))
    }

    /// Get the current snapshot
    pub fn snapshot(&self) -> Arc<Config> {
        self.inner.read().clone()
    }

    /// Re-read the file and replace the snapshot wholesale
    pub fn reload(&self, path: &Path) {
        *self.inner.write() = Arc::new(Config::load(path));
    }
}
