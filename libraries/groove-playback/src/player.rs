//! Player - connects the queue to the audio engine
//!
//! Coordinates queue store, track cache, transport and the playback session.
//! Views only ever write the store; `sync` is how their selection reaches the
//! audio engine. Session callbacks come back through `handle_session_event`.

use crate::cache::TrackCache;
use crate::config::PlaybackConfig;
use crate::error::PlaybackError;
use crate::events::PlaybackEvent;
use crate::queue::QueueStore;
use crate::session::{PlaybackSession, Progress, SessionEvent};
use crate::transport::TransportController;
use crate::types::{AdvanceTrigger, Transition};
use groove_core::{TrackId, TrackRef};
use std::time::Duration;
use tracing::{debug, error, info, trace};

/// Playback front for one application session
///
/// Never fails outward: a track that cannot be resolved or started is
/// logged, reported as [`PlaybackEvent::Error`] and leaves nothing playing.
pub struct Player<S: PlaybackSession> {
    store: QueueStore,
    cache: TrackCache,
    transport: TransportController,
    session: S,

    now_playing: Option<TrackRef>,
    progress: Progress,
    paused: bool,

    // Cleared on navigation away from the view that owns playback
    attached: bool,
}

impl<S: PlaybackSession> Player<S> {
    pub fn new(
        store: QueueStore,
        cache: TrackCache,
        transport: TransportController,
        session: S,
    ) -> Self {
        Self {
            store,
            cache,
            transport,
            session,
            now_playing: None,
            progress: Progress::default(),
            paused: false,
            attached: true,
        }
    }

    pub fn from_config(
        store: QueueStore,
        cache: TrackCache,
        config: &PlaybackConfig,
        session: S,
    ) -> Self {
        Self::new(store, cache, TransportController::from_config(config), session)
    }

    // ===== Playback Control =====

    /// Start whatever the store says is active, if it is not already playing
    ///
    /// Returns `true` if a new track was started. Stops the session when the
    /// store has no active track any more (e.g. after a reset).
    pub fn sync(&mut self) -> bool {
        match self.store.active_id() {
            None => {
                if self.now_playing.is_some() {
                    debug!("No active track, stopping");
                    self.halt();
                }
                false
            }
            Some(id) if self.is_current(&id) => false,
            Some(id) => self.start(&id),
        }
    }

    /// Skip forward
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Transition {
        let transition = self.transport.advance(&self.store, AdvanceTrigger::Skip);
        self.apply(&transition);
        transition
    }

    /// Skip backward
    pub fn previous(&mut self) -> Transition {
        let transition = self.transport.retreat(&self.store);
        self.apply(&transition);
        transition
    }

    /// Play/pause button
    ///
    /// With nothing loaded, starts the active track. Returns whether audio is
    /// running afterwards.
    pub fn toggle_play(&mut self) -> bool {
        if self.now_playing.is_none() {
            self.sync();
            return self.is_playing();
        }

        let result = if self.paused {
            self.session.resume()
        } else {
            self.session.pause()
        };

        match result {
            Ok(()) => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "Play state toggled");
                self.store.emit(PlaybackEvent::PlayingChanged {
                    playing: !self.paused,
                });
            }
            Err(e) => self.fail(e),
        }
        self.is_playing()
    }

    /// Move the current track to `position`, clamped to its known length
    ///
    /// A failed seek is reported but the track keeps playing.
    pub fn seek(&mut self, position: Duration) {
        if self.now_playing.is_none() {
            trace!("Nothing loaded, ignoring seek");
            return;
        }

        let position = if self.progress.total.is_zero() {
            position
        } else {
            position.min(self.progress.total)
        };

        match self.session.seek(position) {
            Ok(()) => self.record_progress(position, self.progress.total),
            Err(e) => self.report(&e),
        }
    }

    /// React to a session callback
    ///
    /// Returns the transport transition for `Ended`, `None` otherwise or
    /// when detached.
    pub fn handle_session_event(&mut self, event: SessionEvent) -> Option<Transition> {
        if !self.attached {
            trace!(?event, "Detached, ignoring session event");
            return None;
        }

        match event {
            SessionEvent::Ended => {
                // Loop check first, then advance
                let transition = self.transport.on_track_end(&self.store);
                self.apply(&transition);
                Some(transition)
            }
            SessionEvent::Progress { elapsed, total } => {
                self.record_progress(elapsed, total);
                None
            }
        }
    }

    /// Stop audio and ignore session events until [`attach`](Self::attach)
    ///
    /// The queue store is left as is; another view can pick it up.
    pub fn detach(&mut self) {
        debug!("Player detached");
        self.halt();
        self.attached = false;
    }

    /// Resume reacting to session events; call [`sync`](Self::sync) to start
    /// the active track again
    pub fn attach(&mut self) {
        debug!("Player attached");
        self.attached = true;
    }

    // ===== State Queries =====

    pub fn now_playing(&self) -> Option<&TrackRef> {
        self.now_playing.as_ref()
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// A track is loaded and not paused
    pub fn is_playing(&self) -> bool {
        self.now_playing.is_some() && !self.paused
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn store(&self) -> &QueueStore {
        &self.store
    }

    pub fn cache(&self) -> &TrackCache {
        &self.cache
    }

    pub fn transport_mut(&mut self) -> &mut TransportController {
        &mut self.transport
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    // ===== Internal =====

    fn is_current(&self, id: &TrackId) -> bool {
        self.now_playing
            .as_ref()
            .is_some_and(|track| track.id() == id)
    }

    fn apply(&mut self, transition: &Transition) {
        match transition {
            // Shuffle can pick the same track again; it still starts over
            Transition::Activated(id) => {
                self.start(id);
            }
            Transition::Restarted(id) => self.restart(id),
            Transition::Idle => trace!("Nothing to play"),
        }
    }

    fn start(&mut self, id: &TrackId) -> bool {
        let track = match self.cache.resolve(id) {
            Ok(track) => track,
            Err(e) => {
                self.fail(e);
                return false;
            }
        };

        if let Err(e) = self.session.play(track.audio()) {
            self.fail(e);
            return false;
        }

        info!(track_id = %id, title = track.title(), "Now playing");
        self.now_playing = Some(track);
        self.progress = Progress::default();
        self.paused = false;
        true
    }

    fn restart(&mut self, id: &TrackId) {
        if !self.is_current(id) {
            self.start(id);
            return;
        }

        match self.session.restart() {
            Ok(()) => {
                debug!(track_id = %id, "Restarted");
                self.progress = Progress::default();
                self.paused = false;
            }
            Err(e) => self.fail(e),
        }
    }

    fn halt(&mut self) {
        self.session.stop();
        self.now_playing = None;
        self.progress = Progress::default();
        self.paused = false;
    }

    fn record_progress(&mut self, elapsed: Duration, total: Duration) {
        self.progress = Progress::new(elapsed, total);
        self.store.emit(PlaybackEvent::PositionUpdate {
            elapsed_secs: elapsed.as_secs(),
            total_secs: total.as_secs(),
        });
    }

    fn report(&self, e: &PlaybackError) {
        error!(error = %e, "Playback failed");
        self.store.emit(PlaybackEvent::Error {
            message: e.to_string(),
        });
    }

    fn fail(&mut self, e: PlaybackError) {
        self.report(&e);
        self.halt();
    }
}
