//! Track resolution.
//!
//! Tracks are looked up by file stem in an optional sounds directory
//! (`storm-dance.mp3`, `clock-ticking-60-second-countdown.wav`, ...).
//! Anything that cannot be found resolves to the built-in synthesized audio.

use std::path::{Path, PathBuf};

use crate::types::MusicOption;

/// File stem of the ticking loop.
pub const TICKING_TRACK: &str = "clock-ticking-60-second-countdown";

/// Supported audio file extensions, in lookup order.
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "flac", "ogg", "aiff"];

/// Where a track's audio comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSource {
    /// A file on disk.
    File {
        /// Track name (file stem).
        name: String,
        /// Full path to the file.
        path: PathBuf,
    },
    /// Synthesized audio compiled into the binary.
    Builtin {
        /// Track name the built-in audio stands in for.
        name: String,
    },
}

impl TrackSource {
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::Builtin { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Builtin { name } => name,
        }
    }

    #[must_use]
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin { .. })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Builtin { .. } => None,
        }
    }
}

/// Resolves track names against a sounds directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundLibrary {
    dir: Option<PathBuf>,
}

impl SoundLibrary {
    /// A library backed by `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// A library that always resolves to built-in audio.
    #[must_use]
    pub fn builtin_only() -> Self {
        Self { dir: None }
    }

    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Resolves a track by file stem.
    #[must_use]
    pub fn resolve(&self, stem: &str) -> TrackSource {
        let Some(dir) = &self.dir else {
            return TrackSource::builtin(stem);
        };

        SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", stem, ext)))
            .find(|path| path.is_file())
            .map(|path| TrackSource::file(stem, path))
            .unwrap_or_else(|| TrackSource::builtin(stem))
    }

    /// Resolves the completion track for a music option.
    #[must_use]
    pub fn completion_track(&self, music: MusicOption) -> TrackSource {
        self.resolve(music.id())
    }

    /// Resolves the ticking loop.
    #[must_use]
    pub fn ticking_track(&self) -> TrackSource {
        self.resolve(TICKING_TRACK)
    }

    /// Lists every supported audio file in the sounds directory, sorted by name.
    #[must_use]
    pub fn discover(&self) -> Vec<TrackSource> {
        let Some(dir) = &self.dir else {
            return Vec::new();
        };

        let mut tracks: Vec<TrackSource> = std::fs::read_dir(dir)
            .into_iter()
            .flatten()
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase())
                    .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
            })
            .filter_map(|path| {
                let stem = path.file_stem()?.to_string_lossy().into_owned();
                Some(TrackSource::file(stem, path))
            })
            .collect();

        tracks.sort_by(|a, b| a.name().cmp(b.name()));
        tracks
    }
}
