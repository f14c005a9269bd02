//! Sine-wave tones on the default output device

use std::time::Duration;

use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Source};
use tracing::debug;

use super::{AudioError, Tone};

/// An open output device. Tones are mixed onto it without blocking the caller.
pub struct Speaker {
    // the device closes when the stream is dropped
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl Speaker {
    pub fn open() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            debug!("No output device: {}", e);
            AudioError::DeviceNotAvailable
        })?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    pub fn play(&self, tone: Tone) -> Result<(), AudioError> {
        self.handle
            .play_raw(tone_source(tone))
            .map_err(|e| AudioError::PlaybackFailed(e.to_string()))
    }
}

/// Sine source for one tone, preceded by silence for its offset
pub fn tone_source(tone: Tone) -> impl Source<Item = f32> + Send + 'static {
    SineWave::new(tone.frequency_hz as f32)
        .take_duration(Duration::from_millis(tone.duration_ms))
        .amplify(tone.volume)
        .delay(Duration::from_millis(tone.delay_ms))
}
