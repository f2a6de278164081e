//! Short synthesized cues for app events, played through rodio.
//!
//! Audio is best-effort: a missing output device degrades to silence
//! rather than failing the UI.

use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Echoed reply arrived in a chat thread
    ReplyArrived,
    /// A note was stored or merged
    NoteStored,
    /// An overlay was spawned
    OverlayOpened,
}

impl SoundCue {
    fn tone(&self) -> (f32, Duration) {
        match self {
            SoundCue::ReplyArrived => (660.0, Duration::from_millis(120)),
            SoundCue::NoteStored => (520.0, Duration::from_millis(90)),
            SoundCue::OverlayOpened => (440.0, Duration::from_millis(70)),
        }
    }
}

pub struct SoundPlayer {
    // Stream must stay alive for the sinks to keep playing
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    enabled: bool,
}

impl SoundPlayer {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self {
                _stream: None,
                stream_handle: None,
                enabled: false,
            };
        }
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok((stream, handle)) => (Some(stream), Some(handle)),
            Err(e) => {
                tracing::warn!("Audio output unavailable, sounds disabled: {}", e);
                (None, None)
            }
        };
        Self {
            _stream: stream,
            stream_handle,
            enabled,
        }
    }

    pub fn is_available(&self) -> bool {
        self.enabled && self.stream_handle.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Mute/unmute at runtime. Enabling only works when the output stream
    /// came up at startup.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled && self.stream_handle.is_some();
    }

    /// Fire and forget; playback errors are logged, never surfaced
    pub fn play(&self, cue: SoundCue) {
        let Some(handle) = self.stream_handle.as_ref() else {
            return;
        };
        if !self.enabled {
            return;
        }
        let (freq, duration) = cue.tone();
        match Sink::try_new(handle) {
            Ok(sink) => {
                let source = SineWave::new(freq).take_duration(duration).amplify(0.20);
                sink.append(source);
                sink.detach();
            }
            Err(e) => {
                tracing::debug!("Failed to create audio sink: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_player_never_plays() {
        let player = SoundPlayer::new(false);
        assert!(!player.is_available());
        // Should be a no-op, not a panic
        player.play(SoundCue::ReplyArrived);
    }

    #[test]
    fn test_cue_tones_distinct() {
        assert_ne!(
            SoundCue::ReplyArrived.tone().0,
            SoundCue::NoteStored.tone().0
        );
    }
}
