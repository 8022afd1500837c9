//! Sound system error types.
//!
//! Every audio failure is recoverable: the countdown keeps going whether or
//! not the ticking or completion music could be played.

use std::path::PathBuf;

use rodio::decoder::DecoderError;
use rodio::{PlayError, StreamError};
use thiserror::Error;

/// Errors produced while setting up or starting playback.
#[derive(Debug, Error)]
pub enum SoundError {
    /// The default output device could not be opened.
    #[error("オーディオ出力を開けません: {0}")]
    OutputStream(#[from] StreamError),

    /// A sink could not be attached to the output stream.
    #[error("オーディオの再生を開始できません: {0}")]
    Sink(#[from] PlayError),

    /// A track file in the sounds directory could not be opened.
    #[error("サウンドファイルを開けません: {}: {source}", path.display())]
    OpenTrack {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A track file was opened but is not a playable format.
    #[error("サウンドファイルをデコードできません: {}: {source}", path.display())]
    DecodeTrack {
        path: PathBuf,
        #[source]
        source: DecoderError,
    },
}

impl SoundError {
    /// Returns true if the output device is the problem.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::OutputStream(_) | Self::Sink(_))
    }

    /// Returns true if a track file is the problem.
    #[must_use]
    pub fn is_track_error(&self) -> bool {
        matches!(self, Self::OpenTrack { .. } | Self::DecodeTrack { .. })
    }

    /// Built-in audio can stand in for a broken track file, but not for a
    /// missing device.
    #[must_use]
    pub fn should_fallback_to_builtin(&self) -> bool {
        self.is_track_error()
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::OutputStream(_) | Self::Sink(_) => "--no-sound でサウンドを無効にできます",
            Self::OpenTrack { .. } => "--sounds-dir のファイル名と権限を確認してください",
            Self::DecodeTrack { .. } => "mp3, wav, flac, ogg のいずれかに変換してください",
        }
    }
}
