use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::audio::MediaBackend;
use crate::library::{
    ListingSource, Track, TrackList, TrackOrigin, builtin_tracks, is_audio_file, is_builtin_id,
    load_custom_tracks, save_custom_tracks, track_name_from_file, tracks_from_listing,
};
use crate::session::{AdminSecret, AdminSession};
use crate::storage::Storage;
use crate::visualizer::{Frame, Visualizer};

use super::error::PlayerError;
use super::pending::PendingPlay;
use super::state::{PlaybackState, PlayerState};

/// Where the track list comes from.
pub enum TrackSource<L> {
    /// Built-in `(name, src)` defaults plus persisted admin uploads.
    Local { defaults: Vec<(String, String)> },
    /// A remote directory listing mapped into `music_dir`.
    Remote {
        listing: L,
        music_dir: String,
        extensions: Vec<String>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Follow-up input the UI should collect.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Prompt {
    Auth,
    FileSelection,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Toggle {
    Started,
    Paused,
    Prompt(Prompt),
    /// Play was rejected and playback moved on to the track at this index.
    Recovered(usize),
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub volume: f32,
    pub advance_settle: Duration,
    pub upload_settle: Duration,
    pub secret: Option<AdminSecret>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            volume: 0.5,
            advance_settle: Duration::from_millis(300),
            upload_settle: Duration::from_millis(500),
            secret: None,
        }
    }
}

/// Id for an uploaded track: `custom-<unix millis>-<9 base36 chars>`.
pub fn new_upload_id(now: DateTime<Utc>) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = rand::random::<u64>();
    let suffix: String = (0..9)
        .map(|_| {
            let d = DIGITS[(n % 36) as usize] as char;
            n /= 36;
            d
        })
        .collect();
    format!("custom-{}-{suffix}", now.timestamp_millis())
}

pub struct Controller<M, S, L> {
    media: M,
    storage: S,
    source: TrackSource<L>,
    session: AdminSession,
    options: ControllerOptions,
    state: PlayerState,
    pending: PendingPlay,
    analysis_attempted: bool,
    visualizer: Visualizer,
}

impl<M, S, L> Controller<M, S, L>
where
    M: MediaBackend,
    S: Storage,
    L: ListingSource,
{
    pub fn new(
        media: M,
        storage: S,
        source: TrackSource<L>,
        session: AdminSession,
        options: ControllerOptions,
    ) -> Self {
        let volume = options.volume.clamp(0.0, 1.0);
        Self {
            media,
            storage,
            source,
            session,
            state: PlayerState::new(volume),
            options,
            pending: PendingPlay::new(),
            analysis_attempted: false,
            visualizer: Visualizer::new(),
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.source, TrackSource::Remote { .. })
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    /// Visualizer frame for `elapsed` since startup; `None` after teardown.
    pub fn frame(&self, elapsed: Duration) -> Option<Frame> {
        self.visualizer.frame(
            elapsed,
            self.state.playback == PlaybackState::Playing,
            self.state.is_active(),
        )
    }

    /// Seed the track list, make the first track current and start the visualizer.
    ///
    /// Returns the number of tracks. A failed listing fetch leaves the list empty.
    pub async fn initialize(&mut self) -> Result<usize, PlayerError> {
        self.media.set_volume(self.state.volume);
        self.visualizer.start();

        let fetched = match &self.source {
            TrackSource::Local { defaults } => {
                let builtins = builtin_tracks(defaults.iter().map(|(n, s)| (n.as_str(), s.as_str())));
                let custom = load_custom_tracks(&self.storage);
                log::info!("loaded {} built-in and {} custom tracks", builtins.len(), custom.len());
                Ok(TrackList::from_tracks(builtins.into_iter().chain(custom)))
            }
            TrackSource::Remote {
                listing,
                music_dir,
                extensions,
            } => listing
                .fetch()
                .await
                .map(|entries| tracks_from_listing(&entries, music_dir, extensions)),
        };

        let result = match fetched {
            Ok(tracks) => {
                self.state.tracks = tracks;
                Ok(self.state.tracks.len())
            }
            Err(e) => {
                log::error!("failed to fetch track listing: {e}");
                self.state.tracks = TrackList::new();
                Err(PlayerError::RemoteFetchFailure(e))
            }
        };

        self.state.reset_current();
        self.load_current().await;
        result
    }

    /// Probe `track`'s source the same way playback would open it.
    pub async fn probe_availability(&self, track: &Track) -> bool {
        let ok = self.media.probe(&track.src).await;
        log::debug!("track {:?} available: {ok}", track.id);
        ok
    }

    /// Load the current track's source and re-derive `current_valid`.
    async fn load_current(&mut self) {
        self.state.playback = PlaybackState::Idle;
        self.state.sync_track_name();
        let Some(track) = self.state.current_track().cloned() else {
            self.state.current_valid = false;
            return;
        };
        self.media.load(&track.src);
        self.state.current_valid = self.probe_availability(&track).await;
        if !self.state.current_valid {
            log::warn!("track {:?} is unavailable", track.name);
        }
    }

    async fn reprobe_current(&mut self) {
        self.state.sync_track_name();
        self.state.current_valid = match self.state.current_track().cloned() {
            Some(track) => self.probe_availability(&track).await,
            None => false,
        };
    }

    /// Make the track at `index` current without starting it.
    pub async fn select_track(&mut self, index: usize) -> Result<(), PlayerError> {
        if index >= self.state.tracks.len() {
            return Err(PlayerError::InvalidIndex(index));
        }
        self.pending.cancel();
        self.media.stop();
        self.state.current = Some(index);
        self.load_current().await;
        log::info!("selected track {index} ({})", self.state.track_name);
        Ok(())
    }

    fn ensure_analysis(&mut self) {
        if self.analysis_attempted {
            return;
        }
        self.analysis_attempted = true;
        match self.media.attach_analyser() {
            Ok(analyser) => self.visualizer.attach(analyser),
            Err(e) => log::warn!("audio analysis unavailable: {e}"),
        }
    }

    pub async fn toggle_playback(&mut self) -> Result<Toggle, PlayerError> {
        if self.state.tracks.is_empty() {
            return match self.source {
                TrackSource::Local { .. } if self.session.is_authenticated() => {
                    Ok(Toggle::Prompt(Prompt::FileSelection))
                }
                TrackSource::Local { .. } => Ok(Toggle::Prompt(Prompt::Auth)),
                TrackSource::Remote { .. } => Err(PlayerError::NoTracks),
            };
        }
        if !self.state.current_valid {
            return Err(PlayerError::TrackUnavailable);
        }

        match self.state.playback {
            PlaybackState::Playing => {
                self.pending.cancel();
                self.media.pause();
                self.state.playback = PlaybackState::Paused;
                log::info!("paused {}", self.state.track_name);
                Ok(Toggle::Paused)
            }
            PlaybackState::Idle | PlaybackState::Paused => {
                self.pending.cancel();
                self.ensure_analysis();
                match self.media.play().await {
                    Ok(()) => {
                        self.state.playback = PlaybackState::Playing;
                        log::info!("playing {}", self.state.track_name);
                        Ok(Toggle::Started)
                    }
                    Err(e) => {
                        log::error!("play failed for {}: {e}", self.state.track_name);
                        self.state.playback = PlaybackState::Paused;
                        self.state.current_valid = false;
                        if self.state.tracks.len() > 1 {
                            let index = self.advance(Direction::Forward).await?;
                            Ok(Toggle::Recovered(index))
                        } else {
                            Err(PlayerError::PlaybackFailure(e))
                        }
                    }
                }
            }
        }
    }

    /// Move to the next available track in `direction`, then autoplay it
    /// after the settle delay. Returns the new index.
    pub async fn advance(&mut self, direction: Direction) -> Result<usize, PlayerError> {
        let len = self.state.tracks.len();
        if len == 0 {
            return Err(PlayerError::NoTracks);
        }
        let start = self.state.current.unwrap_or(0);

        for step in 1..=len {
            let index = match direction {
                Direction::Forward => (start + step) % len,
                Direction::Backward => (start + len - step % len) % len,
            };
            let Some(track) = self.state.tracks.get(index).cloned() else {
                continue;
            };
            if !self.probe_availability(&track).await {
                continue;
            }

            self.pending.cancel();
            self.media.stop();
            self.state.current = Some(index);
            self.media.load(&track.src);
            self.state.current_valid = true;
            self.state.playback = PlaybackState::Idle;
            self.state.sync_track_name();
            self.pending.schedule(Instant::now() + self.options.advance_settle);
            log::info!("advanced to track {index} ({})", track.name);
            return Ok(index);
        }

        log::warn!("no playable tracks found");
        Err(PlayerError::NoAvailableTracks)
    }

    /// Fire a due settle-and-play. Returns whether playback started.
    pub async fn poll_pending(&mut self, now: Instant) -> Result<bool, PlayerError> {
        if !self.pending.take_due(now) {
            return Ok(false);
        }
        if !self.state.current_valid {
            log::debug!("skipping delayed play of unavailable track");
            return Ok(false);
        }

        self.ensure_analysis();
        match self.media.play().await {
            Ok(()) => {
                self.state.playback = PlaybackState::Playing;
                log::info!("playing {}", self.state.track_name);
                Ok(true)
            }
            Err(e) => {
                log::error!("delayed play failed for {}: {e}", self.state.track_name);
                self.state.playback = PlaybackState::Paused;
                self.state.current_valid = false;
                Err(PlayerError::PlaybackFailure(e))
            }
        }
    }

    /// Clamp `volume` into `[0, 1]` and apply it. Returns the applied value.
    pub fn set_volume(&mut self, volume: f32) -> Result<f32, PlayerError> {
        if !volume.is_finite() {
            return Err(PlayerError::InvalidVolume);
        }
        let volume = volume.clamp(0.0, 1.0);
        self.media.set_volume(volume);
        self.state.volume = volume;
        Ok(volume)
    }

    fn require_local(&self) -> Result<(), PlayerError> {
        match self.source {
            TrackSource::Local { .. } => Ok(()),
            TrackSource::Remote { .. } => Err(PlayerError::Unsupported),
        }
    }

    fn require_admin(&self) -> Result<(), PlayerError> {
        self.require_local()?;
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(PlayerError::NotAuthorized)
        }
    }

    /// Check `password` against the configured secret and open an admin session.
    pub fn authenticate(&mut self, password: &str) -> Result<Prompt, PlayerError> {
        self.require_local()?;
        let Some(secret) = self.options.secret.as_ref() else {
            log::warn!("admin login attempted but no admin password is configured");
            return Err(PlayerError::AuthFailure);
        };
        if !secret.matches(password) {
            log::warn!("admin login failed");
            return Err(PlayerError::AuthFailure);
        }

        if let Err(e) = self.session.establish(&mut self.storage, Utc::now()) {
            log::error!("failed to persist admin session: {e}");
        }
        log::info!("admin session established");
        Ok(Prompt::FileSelection)
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear(&mut self.storage) {
            log::error!("failed to clear admin session: {e}");
        }
        log::info!("admin session closed");
    }

    fn persist_custom(&mut self) {
        if let Err(e) = save_custom_tracks(&mut self.storage, self.state.tracks.custom()) {
            log::error!("failed to save custom tracks: {e}");
        }
    }

    /// Add the audio file at `path` as a custom track, make it current and
    /// autoplay it after the upload settle delay. Returns the track name.
    pub async fn upload_track(&mut self, path: &Path) -> Result<String, PlayerError> {
        self.require_admin()?;
        if !is_audio_file(path) {
            return Err(PlayerError::UploadFailure(format!(
                "{} is not an audio file",
                path.display()
            )));
        }
        let bytes = std::fs::read(path)
            .map_err(|e| PlayerError::UploadFailure(format!("{}: {e}", path.display())))?;

        let id = new_upload_id(Utc::now());
        let name = track_name_from_file(path);
        let src = self.media.register_blob(&id, bytes);
        let track = Track::new(id, name.clone(), src, TrackOrigin::Custom);
        let index = self.state.tracks.push(track).map_err(|dup| {
            self.media.release_blob(&dup.src);
            PlayerError::UploadFailure(format!("duplicate track id {}", dup.id))
        })?;
        self.persist_custom();

        self.pending.cancel();
        self.media.stop();
        self.state.current = Some(index);
        self.load_current().await;
        self.pending.schedule(Instant::now() + self.options.upload_settle);
        log::info!("uploaded track {name:?}");
        Ok(name)
    }

    /// Remove a custom track by id.
    pub async fn remove_track(&mut self, id: &str) -> Result<(), PlayerError> {
        self.require_admin()?;
        if is_builtin_id(id) {
            return Err(PlayerError::RemoveRestriction);
        }
        let index = self
            .state
            .tracks
            .position(id)
            .ok_or_else(|| PlayerError::UnknownTrack(id.to_string()))?;
        let removed = self
            .state
            .tracks
            .remove(index)
            .ok_or(PlayerError::RemoveRestriction)?;
        self.persist_custom();
        self.media.release_blob(&removed.src);
        log::info!("removed track {:?}", removed.name);

        match self.state.current {
            Some(current) if current == index => {
                self.pending.cancel();
                self.media.stop();
                self.state.reset_current();
                self.load_current().await;
            }
            Some(current) if index < current => {
                self.state.current = Some(current - 1);
                self.reprobe_current().await;
            }
            _ => self.reprobe_current().await,
        }
        Ok(())
    }

    /// Rebuild the track list from the remote listing. Returns the new track count.
    ///
    /// On failure the previous list and position are kept.
    pub async fn refresh(&mut self) -> Result<usize, PlayerError> {
        let TrackSource::Remote {
            listing,
            music_dir,
            extensions,
        } = &self.source
        else {
            return Err(PlayerError::Unsupported);
        };

        let tracks = match listing.fetch().await {
            Ok(entries) => tracks_from_listing(&entries, music_dir, extensions),
            Err(e) => {
                log::error!("failed to refresh track listing: {e}");
                return Err(PlayerError::RemoteFetchFailure(e));
            }
        };

        self.pending.cancel();
        self.media.stop();
        self.state.tracks = tracks;
        self.state.reset_current();
        self.load_current().await;
        log::info!("refreshed track listing: {} tracks", self.state.tracks.len());
        Ok(self.state.tracks.len())
    }

    /// Cancel pending work, stop the visualizer and release the output.
    pub fn teardown(&mut self) {
        self.pending.cancel();
        self.visualizer.stop();
        self.media.stop();
        self.media.shutdown();
    }
}
