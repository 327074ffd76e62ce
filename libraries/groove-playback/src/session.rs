//! Audio engine seam
//!
//! The playback core never decodes audio. It hands a locator to whatever
//! implements `PlaybackSession` (a browser element, a desktop engine, a mock)
//! and listens for `SessionEvent`s coming back.

use crate::error::Result;
use groove_core::AudioLocator;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Audio engine driven by the player
///
/// Implementors start, restart and stop a single stream. `play` replaces
/// whatever was playing.
pub trait PlaybackSession: Send {
    /// Start playing the audio at `locator` from the beginning
    ///
    /// # Returns
    /// * `Ok(())` - Playback started
    /// * `Err(_)` - The engine could not open or start the stream
    fn play(&mut self, locator: &AudioLocator) -> Result<()>;

    /// Seek the current stream back to zero and keep playing
    fn restart(&mut self) -> Result<()>;

    /// Hold the current stream at its position
    fn pause(&mut self) -> Result<()>;

    /// Continue a paused stream
    fn resume(&mut self) -> Result<()>;

    /// Jump to `position` from the start of the current stream
    ///
    /// # Returns
    /// * `Ok(())` - Seek successful
    /// * `Err(_)` - The stream cannot seek there
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Stop and release the current stream; never fails
    fn stop(&mut self);
}

/// Callback from the audio engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Current track played to its natural end
    Ended,

    /// Periodic position report
    Progress { elapsed: Duration, total: Duration },
}

/// Position of the current track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub elapsed: Duration,
    pub total: Duration,
}

impl Progress {
    pub fn new(elapsed: Duration, total: Duration) -> Self {
        Self { elapsed, total }
    }

    /// Played fraction in `[0.0, 1.0]`; zero while the total is unknown
    pub fn fraction(&self) -> f64 {
        if self.total.is_zero() {
            return 0.0;
        }
        (self.elapsed.as_secs_f64() / self.total.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// `m:ss / m:ss`
    pub fn display(&self) -> String {
        format!(
            "{} / {}",
            format_clock(self.elapsed),
            format_clock(self.total)
        )
    }
}

fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Session that records calls, for unit tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSession {
    pub played: Vec<AudioLocator>,
    pub restarts: usize,
    pub stops: usize,
    pub paused: bool,
    pub seeks: Vec<Duration>,
    pub fail_play: bool,
}

#[cfg(test)]
impl PlaybackSession for RecordingSession {
    fn play(&mut self, locator: &AudioLocator) -> Result<()> {
        if self.fail_play {
            return Err(crate::error::PlaybackError::session("device unavailable"));
        }
        self.played.push(locator.clone());
        Ok(())
    }

    fn restart(&mut self) -> Result<()> {
        self.restarts += 1;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.paused = true;
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        self.paused = false;
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.seeks.push(position);
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}
