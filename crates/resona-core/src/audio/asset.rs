// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the `Audio` asset handle.

use super::{
    AudioBackend, AudioId, AudioLoopTiming, LoopError, LoopRegion, LoopSpec, Wave, WaveLoader,
};
use crate::asset::AssetHandle;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// A shared handle to one audio resource owned by an [`AudioBackend`].
///
/// `Audio` holds only an [`AudioId`] and the backend it belongs to. Clones share
/// the id; the backend is told to release the resource when the last clone is
/// dropped. Every operation is a direct, synchronous call into the backend, in
/// the order the calls are made.
///
/// A default-constructed `Audio` is empty: it holds [`AudioId::NULL`], has no
/// backend, and every query returns its type's zero value.
///
/// # Examples
///
/// ```ignore
/// let audio = Audio::with_loop(backend, wave, LoopSpec::BeginDuration(0.5))?;
/// audio.play(Duration::from_millis(200));
/// ```
#[derive(Clone, Default)]
pub struct Audio {
    handle: AssetHandle<AudioId>,
    backend: Option<Arc<dyn AudioBackend>>,
}

impl Audio {
    /// Submits `wave` to `backend`. Looping is disabled.
    pub fn new(backend: Arc<dyn AudioBackend>, wave: Wave) -> Self {
        let id = backend.create(wave);
        if id.is_null_asset() {
            log::warn!("Audio backend refused to create a resource; handle is empty");
            return Self::default();
        }

        log::debug!("Created audio asset {id}");
        let releaser = backend.clone();
        Self {
            handle: AssetHandle::new(id, move |id| {
                log::debug!("Releasing audio asset {id}");
                releaser.release(id);
            }),
            backend: Some(backend),
        }
    }

    /// Submits `wave` to `backend` and applies the loop request.
    ///
    /// # Errors
    ///
    /// Fails if the loop request is invalid for the wave. The resource created
    /// for the wave is released in that case.
    pub fn with_loop(
        backend: Arc<dyn AudioBackend>,
        wave: Wave,
        spec: impl Into<LoopSpec>,
    ) -> Result<Self, LoopError> {
        let audio = Self::new(backend, wave);
        audio.set_loop(spec)?;
        Ok(audio)
    }

    /// Submits `wave` to `backend` with optional loop positions in samples.
    pub fn with_loop_timing(
        backend: Arc<dyn AudioBackend>,
        wave: Wave,
        timing: Option<AudioLoopTiming>,
    ) -> Result<Self, LoopError> {
        Self::with_loop(backend, wave, timing)
    }

    /// Decodes the file at `path` with `loader` and submits the result.
    pub fn from_file(
        backend: Arc<dyn AudioBackend>,
        loader: &dyn WaveLoader,
        path: impl AsRef<Path>,
    ) -> Result<Self, AudioError> {
        Self::from_file_with_loop(backend, loader, path, LoopSpec::None)
    }

    /// Decodes the file at `path` with `loader`, submits it and applies the loop request.
    pub fn from_file_with_loop(
        backend: Arc<dyn AudioBackend>,
        loader: &dyn WaveLoader,
        path: impl AsRef<Path>,
        spec: impl Into<LoopSpec>,
    ) -> Result<Self, AudioError> {
        let wave = loader.load_file(path.as_ref()).map_err(AudioError::Load)?;
        Ok(Self::with_loop(backend, wave, spec)?)
    }

    /// Detaches this handle from its resource, leaving it empty.
    ///
    /// The resource itself is released once no other clone refers to it.
    pub fn release(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` if the handle holds [`AudioId::NULL`].
    pub fn is_empty(&self) -> bool {
        self.handle.is_null()
    }

    /// Returns the id of the resource.
    pub fn id(&self) -> AudioId {
        self.handle.id()
    }

    fn backend(&self) -> Option<&dyn AudioBackend> {
        if self.handle.is_null() {
            return None;
        }
        self.backend.as_deref()
    }

    /// Runs `f` against the backend, or returns `default` on an empty handle.
    fn query<R>(&self, default: R, f: impl FnOnce(&dyn AudioBackend, AudioId) -> R) -> R {
        match self.backend() {
            Some(backend) => f(backend, self.id()),
            None => default,
        }
    }

    fn command(&self, f: impl FnOnce(&dyn AudioBackend, AudioId)) {
        self.query((), f);
    }

    /// Returns the sampling rate in Hz.
    pub fn sampling_rate(&self) -> u32 {
        self.query(0, |backend, id| backend.sampling_rate(id))
    }

    /// Returns the number of samples (frames).
    pub fn samples(&self) -> u64 {
        self.query(0, |backend, id| backend.samples(id))
    }

    /// Returns the sample buffer held by the backend.
    pub fn wave(&self) -> Option<Arc<Wave>> {
        self.query(None, |backend, id| backend.wave(id))
    }

    /// Replaces the loop configuration and returns the region sent to the backend.
    ///
    /// `set_loop(true)` loops the whole track and `set_loop(false)` disables looping.
    ///
    /// # Errors
    ///
    /// Returns the [`LoopError`] produced by [`LoopSpec::resolve`]; the backend is
    /// left untouched in that case.
    pub fn set_loop(&self, spec: impl Into<LoopSpec>) -> Result<LoopRegion, LoopError> {
        let spec = spec.into();
        let region = spec
            .resolve(self.samples(), self.sampling_rate())
            .inspect_err(|err| log::warn!("Rejected loop {spec:?} on {}: {err}", self.id()))?;

        self.command(|backend, id| backend.set_loop(id, region));
        Ok(region)
    }

    /// Loops the whole track when `enabled`, otherwise disables looping.
    pub fn set_loop_enabled(&self, enabled: bool) -> Result<LoopRegion, LoopError> {
        self.set_loop(enabled)
    }

    /// Starts or resumes playback with a linear fade-in.
    ///
    /// Returns `true` if the audio was already playing.
    pub fn play(&self, fade_in: Duration) -> bool {
        self.query(false, |backend, id| backend.play(id, fade_in))
    }

    /// Fades out, then pauses. The playback position is kept.
    pub fn pause(&self, fade_out: Duration) {
        self.command(|backend, id| backend.pause(id, fade_out));
    }

    /// Fades out, then stops and rewinds to the start.
    pub fn stop(&self, fade_out: Duration) {
        self.command(|backend, id| backend.stop(id, fade_out));
    }

    /// Plays an overlapping fire-and-forget copy of the sound.
    pub fn play_one_shot(&self, volume: f64, pitch: f64) {
        self.command(|backend, id| backend.play_one_shot(id, volume, pitch));
    }

    /// Immediately stops every voice started by [`Audio::play_one_shot`].
    pub fn stop_all_shots(&self) {
        self.command(|backend, id| backend.stop_all_shots(id));
    }

    /// Returns `true` while playing.
    pub fn is_playing(&self) -> bool {
        self.query(false, |backend, id| backend.is_playing(id))
    }

    /// Returns `true` while paused.
    pub fn is_paused(&self) -> bool {
        self.query(false, |backend, id| backend.is_paused(id))
    }

    /// Returns the playback position, in samples.
    pub fn pos_sample(&self) -> i64 {
        self.query(0, |backend, id| backend.pos_sample(id))
    }

    /// Returns the backend's stream position, in samples.
    pub fn stream_pos_sample(&self) -> i64 {
        self.query(0, |backend, id| backend.stream_pos_sample(id))
    }

    /// Returns the samples consumed since playback started, across loop wraps.
    pub fn samples_played(&self) -> i64 {
        self.query(0, |backend, id| backend.samples_played(id))
    }

    /// Returns the length in seconds, or `0.0` when the rate is unknown.
    pub fn length_sec(&self) -> f64 {
        let rate = self.sampling_rate();
        if rate == 0 {
            return 0.0;
        }
        self.samples() as f64 / rate as f64
    }

    /// Returns the playback position in seconds.
    pub fn pos_sec(&self) -> f64 {
        let rate = self.sampling_rate();
        if rate == 0 {
            return 0.0;
        }
        self.pos_sample() as f64 / rate as f64
    }

    /// Sets both channel gains. Values are clamped to `[0, 1]`.
    pub fn set_volume(&self, volume: f64) {
        self.set_volume_lr(volume, volume);
    }

    /// Sets the left and right gains. Each is clamped to `[0, 1]`.
    pub fn set_volume_lr(&self, left: f64, right: f64) {
        let volume = (clamp_unit(left), clamp_unit(right));
        self.command(|backend, id| backend.set_volume(id, volume));
    }

    /// Returns the `(left, right)` gains.
    pub fn volume_lr(&self) -> (f64, f64) {
        self.query((0.0, 0.0), |backend, id| backend.volume(id))
    }

    /// Sets the playback speed multiplier. Range checks are left to the backend.
    pub fn set_speed(&self, speed: f64) {
        self.command(|backend, id| backend.set_speed(id, speed));
    }

    /// Shifts the playback speed by `semitone` equal-tempered semitones.
    pub fn set_speed_by_semitone(&self, semitone: i32) {
        self.set_speed(semitone_to_ratio(semitone));
    }

    /// Returns the playback speed multiplier.
    pub fn speed(&self) -> f64 {
        self.query(0.0, |backend, id| backend.speed(id))
    }

    /// Returns the lowest speed the backend accepts.
    pub fn min_speed(&self) -> f64 {
        self.query(0.0, |backend, id| backend.min_max_speed(id).0)
    }

    /// Returns the highest speed the backend accepts.
    pub fn max_speed(&self) -> f64 {
        self.query(0.0, |backend, id| backend.min_max_speed(id).1)
    }
}

/// Returns the frequency ratio of `semitone` equal-tempered semitones: `2^(n/12)`.
pub fn semitone_to_ratio(semitone: i32) -> f64 {
    (semitone as f64 / 12.0).exp2()
}

fn clamp_unit(value: f64) -> f64 {
    // `clamp` passes NaN through.
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

impl PartialEq for Audio {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Audio {}

impl Hash for Audio {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Audio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Audio").field("handle", &self.handle).finish()
    }
}

/// An error raised while building an [`Audio`] from a file.
#[derive(Debug)]
pub enum AudioError {
    /// The file could not be read or decoded.
    Load(anyhow::Error),
    /// The requested loop does not fit the decoded wave.
    Loop(LoopError),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Load(err) => write!(f, "Failed to load audio: {err:#}"),
            AudioError::Loop(err) => write!(f, "Invalid loop: {err}"),
        }
    }
}

impl std::error::Error for AudioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AudioError::Load(err) => Some(err.as_ref()),
            AudioError::Loop(err) => Some(err),
        }
    }
}

impl From<LoopError> for AudioError {
    fn from(err: LoopError) -> Self {
        AudioError::Loop(err)
    }
}
