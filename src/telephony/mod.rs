//! Playback collaborator contract
//!
//! The host telephony platform supplies the channel; this crate only drives
//! it: answer if needed, stream a rendered file, wait for it to finish or be
//! interrupted by a matching keypress.

use crate::Result;
use std::path::Path;

/// How a playback finished
///
/// An interrupting keypress is a normal completion, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The file played to the end
    Completed,

    /// Playback was cut short by this key
    Interrupted(char),
}

/// One call leg able to play audio files
pub trait PlaybackChannel {
    /// Channel name, for logging
    fn name(&self) -> &str;

    /// Language of the caller, passed through to file streaming
    fn language(&self) -> &str;

    /// Whether the channel has been answered
    fn is_up(&self) -> bool;

    /// Answer the channel
    fn answer(&mut self) -> Result<()>;

    /// Start streaming an audio file to the caller
    fn stream_file(&mut self, path: &Path, language: &str) -> Result<()>;

    /// Block until the stream ends or one of `interrupt_keys` is pressed
    fn wait_stream(&mut self, interrupt_keys: &str) -> Result<PlaybackOutcome>;

    /// Stop any in-progress stream
    fn stop_stream(&mut self);
}

/// Answer the channel unless it is already up
pub fn answer_if_not_up(chan: &mut dyn PlaybackChannel) -> Result<()> {
    if chan.is_up() {
        Ok(())
    } else {
        chan.answer()
    }
}
