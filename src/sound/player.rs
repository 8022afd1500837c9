//! Audio player implementation using rodio.
//!
//! `RodioAudioPlayer` keeps two sinks: one for the ticking loop played while
//! the countdown runs, and one for the looping completion track. Both loop
//! until explicitly stopped.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::embedded;
use super::error::SoundError;
use super::source::{SoundLibrary, TrackSource};
use crate::types::MusicOption;

/// Volume of the ticking loop relative to the completion music.
pub const TICKING_VOLUME: f32 = 0.3;

/// Volume of the completion track.
pub const MUSIC_VOLUME: f32 = 1.0;

/// An audio player backed by the default output device.
pub struct RodioAudioPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Where tracks are looked up.
    library: SoundLibrary,
    /// Sink playing the ticking loop, if any.
    ticking: Mutex<Option<Sink>>,
    /// Sink playing the completion track, if any.
    music: Mutex<Option<Sink>>,
    /// Whether playback is disabled.
    disabled: bool,
}

impl RodioAudioPlayer {
    /// Creates a new audio player.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::OutputStream` if no audio output device
    /// is available.
    pub fn new(library: SoundLibrary, disabled: bool) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            library,
            ticking: Mutex::new(None),
            music: Mutex::new(None),
            disabled,
        })
    }

    /// Starts the ticking loop, replacing any loop already playing.
    pub fn start_ticking(&self) -> Result<(), SoundError> {
        self.stop_ticking();

        if self.is_disabled() {
            debug!("Sound playback disabled, skipping ticking");
            return Ok(());
        }

        let sink = self.new_sink(TICKING_VOLUME)?;
        let track = self.library.ticking_track();
        debug!("Starting ticking loop: {}", track.name());
        self.append_looped(&sink, &track, embedded::ticking_period)?;

        Self::store(&self.ticking, sink);
        Ok(())
    }

    /// Stops the ticking loop.
    pub fn stop_ticking(&self) {
        if Self::take(&self.ticking) {
            debug!("Ticking loop stopped");
        }
    }

    /// Starts the completion track for `music`, stopping ticking and any
    /// other music first.
    pub fn play_completion_track(&self, music: MusicOption) -> Result<(), SoundError> {
        self.stop_music();
        self.stop_ticking();

        if self.is_disabled() {
            debug!("Sound playback disabled, skipping completion track");
            return Ok(());
        }

        let sink = self.new_sink(MUSIC_VOLUME)?;
        let track = self.library.completion_track(music);
        debug!("Playing completion track: {}", track.name());
        self.append_looped(&sink, &track, embedded::fanfare)?;

        Self::store(&self.music, sink);
        Ok(())
    }

    /// Stops the completion track.
    pub fn stop_music(&self) {
        if Self::take(&self.music) {
            debug!("Completion track stopped");
        }
    }

    /// Returns true if sound playback is currently disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn new_sink(&self, volume: f32) -> Result<Sink, SoundError> {
        let sink = Sink::try_new(&self.stream_handle)?;
        sink.set_volume(volume);
        Ok(sink)
    }

    /// Appends `track` looped forever, falling back to the built-in source
    /// when the file cannot be played.
    fn append_looped(
        &self,
        sink: &Sink,
        track: &TrackSource,
        builtin: fn() -> embedded::BuiltinSource,
    ) -> Result<(), SoundError> {
        if let TrackSource::File { name, path } = track {
            match open_decoder(path) {
                Ok(decoder) => {
                    sink.append(decoder.repeat_infinite());
                    return Ok(());
                }
                Err(e) if e.should_fallback_to_builtin() => {
                    warn!(
                        "Failed to open track '{}': {}, falling back to built-in audio",
                        name, e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        sink.append(builtin().repeat_infinite());
        Ok(())
    }

    fn store(slot: &Mutex<Option<Sink>>, sink: Sink) {
        match slot.lock() {
            Ok(mut guard) => *guard = Some(sink),
            Err(_) => {
                warn!("Audio sink lock poisoned, stopping new sink");
                sink.stop();
            }
        }
    }

    /// Stops and drops the sink in `slot`. Returns true if one was playing.
    fn take(slot: &Mutex<Option<Sink>>) -> bool {
        let sink = match slot.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match sink {
            Some(sink) => {
                sink.stop();
                true
            }
            None => false,
        }
    }
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file = File::open(path).map_err(|source| SoundError::OpenTrack {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|source| SoundError::DecodeTrack {
        path: path.to_path_buf(),
        source,
    })
}

impl std::fmt::Debug for RodioAudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAudioPlayer")
            .field("library", &self.library)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

/// Creates an audio player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player(library: SoundLibrary, disabled: bool) -> Option<Arc<RodioAudioPlayer>> {
    match RodioAudioPlayer::new(library, disabled) {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
