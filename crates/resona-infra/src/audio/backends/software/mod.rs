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

//! An in-process mixer implementing [`AudioBackend`].

mod arena;
mod voice;

use arena::Arena;
use resona_core::audio::{AudioBackend, AudioId, LoopRegion, MixerConfig, StreamInfo, Wave};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use voice::{PlaybackState, Voice};

/// A software mixer that owns decoded waves and renders them on demand.
///
/// Resources live in a generational arena keyed by [`AudioId`]; releasing an id
/// frees its slot immediately. [`SoftwareAudioBackend::mix`] renders every
/// playing resource into an interleaved buffer and is meant to be driven by an
/// [`AudioDevice`](resona_core::audio::AudioDevice) callback, or called
/// directly for offline rendering.
///
/// All state sits behind one mutex shared by the control calls and the mixing
/// callback.
pub struct SoftwareAudioBackend {
    config: MixerConfig,
    speed_range: (f64, f64),
    voices: Mutex<Arena<Voice>>,
}

impl SoftwareAudioBackend {
    /// Creates an empty mixer.
    ///
    /// An invalid speed range is repaired with a warning: non-finite or
    /// non-positive bounds fall back to the defaults and inverted bounds are
    /// swapped.
    pub fn new(config: MixerConfig) -> Self {
        let speed_range = sanitize_speed_range(&config);
        log::info!(
            "Software audio backend ready ({} Hz, {} channel(s), speed {}..={})",
            config.output_sample_rate,
            config.channels,
            speed_range.0,
            speed_range.1
        );
        Self {
            config,
            speed_range,
            voices: Mutex::new(Arena::new()),
        }
    }

    /// Creates an empty mixer wrapped for sharing with handles and devices.
    pub fn shared(config: MixerConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// Returns the configuration the mixer was created with.
    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    /// Returns the number of live resources.
    pub fn resource_count(&self) -> usize {
        self.lock().len()
    }

    /// Returns the number of one-shot voices still sounding for `id`.
    pub fn active_shots(&self, id: AudioId) -> usize {
        self.with_voice(id, 0, |voice| voice.shot_count())
    }

    /// Returns the loop region currently applied to `id`.
    pub fn loop_region(&self, id: AudioId) -> LoopRegion {
        self.with_voice(id, LoopRegion::DISABLED, |voice| voice.loop_region())
    }

    /// Mixes all playing resources into `output`, overwriting its contents.
    ///
    /// `output` is interleaved according to `stream`. Incomplete trailing
    /// frames are left silent.
    pub fn mix(&self, output: &mut [f32], stream: &StreamInfo) {
        output.fill(0.0);
        if stream.channels == 0 || stream.sample_rate == 0 {
            return;
        }

        let mut voices = self.lock();
        for voice in voices.iter_mut() {
            voice.render(output, stream);
            voice.render_shots(output, stream);
        }
        drop(voices);

        let master = self.config.master_volume as f32;
        for sample in output.iter_mut() {
            *sample = (*sample * master).clamp(-1.0, 1.0);
        }
    }

    /// Renders `frames` frames with the configured stream layout.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let stream = self.config.stream_info();
        let mut output = vec![0.0; frames * stream.channels as usize];
        self.mix(&mut output, &stream);
        output
    }

    fn lock(&self) -> MutexGuard<'_, Arena<Voice>> {
        self.voices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_voice<R>(&self, id: AudioId, default: R, f: impl FnOnce(&mut Voice) -> R) -> R {
        match self.lock().get_mut(id) {
            Some(voice) => f(voice),
            None => default,
        }
    }

    fn clamp_speed(&self, speed: f64) -> f64 {
        let (min, max) = self.speed_range;
        if speed.is_nan() {
            return 1.0_f64.clamp(min, max);
        }
        speed.clamp(min, max)
    }
}

fn sanitize_speed_range(config: &MixerConfig) -> (f64, f64) {
    let Err(err) = config.validate() else {
        return (config.min_speed, config.max_speed);
    };

    let defaults = MixerConfig::default();
    let bound = |speed: f64, fallback: f64| {
        if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            fallback
        }
    };
    let min = bound(config.min_speed, defaults.min_speed);
    let max = bound(config.max_speed, defaults.max_speed);
    let range = if min <= max { (min, max) } else { (max, min) };
    log::warn!("Invalid mixer speed range: {err:#}; using {}..={}", range.0, range.1);
    range
}

impl Default for SoftwareAudioBackend {
    fn default() -> Self {
        Self::new(MixerConfig::default())
    }
}

impl AudioBackend for SoftwareAudioBackend {
    fn create(&self, wave: Wave) -> AudioId {
        if wave.is_empty() || wave.sample_rate == 0 {
            log::warn!(
                "Refusing to create an audio resource from an empty wave ({} samples, {} Hz)",
                wave.samples.len(),
                wave.sample_rate
            );
            return AudioId::NULL;
        }

        let id = self.lock().insert(Voice::new(Arc::new(wave)));
        log::debug!("Software backend created {id}");
        id
    }

    fn release(&self, id: AudioId) {
        if self.lock().remove(id).is_some() {
            log::debug!("Software backend released {id}");
        }
    }

    fn sampling_rate(&self, id: AudioId) -> u32 {
        self.lock()
            .get(id)
            .map_or(0, |voice| voice.wave().sample_rate)
    }

    fn samples(&self, id: AudioId) -> u64 {
        self.lock()
            .get(id)
            .map_or(0, |voice| voice.wave().len_samples())
    }

    fn wave(&self, id: AudioId) -> Option<Arc<Wave>> {
        self.lock().get(id).map(|voice| voice.wave().clone())
    }

    fn set_loop(&self, id: AudioId, region: LoopRegion) {
        self.with_voice(id, (), |voice| voice.set_loop(region));
    }

    fn play(&self, id: AudioId, fade_in: Duration) -> bool {
        self.with_voice(id, false, |voice| voice.play(fade_in.as_secs_f64()))
    }

    fn pause(&self, id: AudioId, fade_out: Duration) {
        self.with_voice(id, (), |voice| voice.pause(fade_out.as_secs_f64()));
    }

    fn stop(&self, id: AudioId, fade_out: Duration) {
        self.with_voice(id, (), |voice| voice.stop(fade_out.as_secs_f64()));
    }

    fn play_one_shot(&self, id: AudioId, volume: f64, pitch: f64) {
        let volume = if volume.is_nan() { 0.0 } else { volume.max(0.0) };
        let pitch = self.clamp_speed(pitch);
        let max_shots = self.config.max_one_shots;
        self.with_voice(id, (), |voice| voice.push_shot(volume, pitch, max_shots));
    }

    fn stop_all_shots(&self, id: AudioId) {
        self.with_voice(id, (), |voice| voice.stop_all_shots());
    }

    fn is_playing(&self, id: AudioId) -> bool {
        self.with_voice(id, false, |voice| voice.state() == PlaybackState::Playing)
    }

    fn is_paused(&self, id: AudioId) -> bool {
        self.with_voice(id, false, |voice| voice.state() == PlaybackState::Paused)
    }

    fn pos_sample(&self, id: AudioId) -> i64 {
        self.with_voice(id, 0, |voice| voice.pos_sample())
    }

    fn stream_pos_sample(&self, id: AudioId) -> i64 {
        self.with_voice(id, 0, |voice| voice.stream_pos_sample())
    }

    fn samples_played(&self, id: AudioId) -> i64 {
        self.with_voice(id, 0, |voice| voice.samples_played())
    }

    fn set_volume(&self, id: AudioId, volume: (f64, f64)) {
        self.with_voice(id, (), |voice| voice.set_volume(volume));
    }

    fn volume(&self, id: AudioId) -> (f64, f64) {
        self.with_voice(id, (0.0, 0.0), |voice| voice.volume())
    }

    fn set_speed(&self, id: AudioId, speed: f64) {
        let clamped = self.clamp_speed(speed);
        if clamped != speed {
            log::debug!("Speed {speed} for {id} clamped to {clamped}");
        }
        self.with_voice(id, (), |voice| voice.set_speed(clamped));
    }

    fn speed(&self, id: AudioId) -> f64 {
        self.with_voice(id, 0.0, |voice| voice.speed())
    }

    fn min_max_speed(&self, id: AudioId) -> (f64, f64) {
        self.with_voice(id, (0.0, 0.0), |_| self.speed_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MixerConfig {
        MixerConfig {
            output_sample_rate: 100,
            channels: 2,
            ..MixerConfig::default()
        }
    }

    #[test]
    fn test_create_and_release() {
        let backend = SoftwareAudioBackend::new(config());
        let id = backend.create(Wave::silence(50, 100));
        assert!(!id.is_null_asset());
        assert_eq!(backend.resource_count(), 1);
        assert_eq!(backend.samples(id), 50);
        assert_eq!(backend.sampling_rate(id), 100);

        backend.release(id);
        assert_eq!(backend.resource_count(), 0);
        assert_eq!(backend.samples(id), 0);
        assert!(backend.wave(id).is_none());
    }

    #[test]
    fn test_empty_wave_is_refused() {
        let backend = SoftwareAudioBackend::new(config());
        assert_eq!(backend.create(Wave::default()), AudioId::NULL);
        assert_eq!(backend.create(Wave::silence(10, 0)), AudioId::NULL);
        assert_eq!(backend.resource_count(), 0);
    }

    #[test]
    fn test_unknown_id_queries_are_zero() {
        let backend = SoftwareAudioBackend::new(config());
        assert!(!backend.play(AudioId::NULL, Duration::ZERO));
        assert!(!backend.is_playing(AudioId::NULL));
        assert_eq!(backend.pos_sample(AudioId::NULL), 0);
        assert_eq!(backend.speed(AudioId::NULL), 0.0);
        assert_eq!(backend.min_max_speed(AudioId::NULL), (0.0, 0.0));
    }

    #[test]
    fn test_speed_is_clamped_to_config() {
        let backend = SoftwareAudioBackend::new(config());
        let id = backend.create(Wave::silence(10, 100));

        backend.set_speed(id, 10.0);
        assert_eq!(backend.speed(id), 2.0);
        backend.set_speed(id, -1.0);
        assert_eq!(backend.speed(id), 1.0 / 1024.0);
        backend.set_speed(id, f64::NAN);
        assert_eq!(backend.speed(id), 1.0);
        assert_eq!(backend.min_max_speed(id), (1.0 / 1024.0, 2.0));
    }

    #[test]
    fn test_inverted_speed_range_is_swapped() {
        let backend = SoftwareAudioBackend::new(MixerConfig {
            min_speed: 3.0,
            max_speed: 2.0,
            ..config()
        });
        let id = backend.create(Wave::silence(10, 100));
        assert_eq!(backend.min_max_speed(id), (2.0, 3.0));

        backend.set_speed(id, 1.0);
        assert_eq!(backend.speed(id), 2.0);
        backend.play_one_shot(id, 1.0, 10.0);
        assert_eq!(backend.active_shots(id), 1);
    }

    #[test]
    fn test_non_finite_speed_bounds_fall_back_to_defaults() {
        let backend = SoftwareAudioBackend::new(MixerConfig {
            min_speed: f64::NAN,
            max_speed: f64::INFINITY,
            ..config()
        });
        let id = backend.create(Wave::silence(10, 100));
        assert_eq!(backend.min_max_speed(id), (1.0 / 1024.0, 2.0));

        backend.set_speed(id, 5.0);
        assert_eq!(backend.speed(id), 2.0);
    }

    #[test]
    fn test_mix_applies_volume_and_limiter() {
        let backend = SoftwareAudioBackend::new(config());
        let loud = backend.create(Wave::from_mono(vec![0.8; 100], 100));
        let other = backend.create(Wave::from_mono(vec![0.8; 100], 100));
        backend.set_volume(other, (1.0, 0.0));
        backend.play(loud, Duration::ZERO);
        backend.play(other, Duration::ZERO);

        let out = backend.render(4);
        assert_eq!(out[0], 1.0); // 1.6 clipped
        assert!((out[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_zero_channel_stream_is_ignored() {
        let backend = SoftwareAudioBackend::new(config());
        let id = backend.create(Wave::from_mono(vec![1.0; 10], 100));
        backend.play(id, Duration::ZERO);

        let mut out = [1.0f32; 4];
        backend.mix(
            &mut out,
            &StreamInfo {
                channels: 0,
                sample_rate: 100,
            },
        );
        assert_eq!(out, [0.0; 4]);
        assert_eq!(backend.pos_sample(id), 0);
    }

    #[test]
    fn test_one_shots_respect_limit() {
        let backend = SoftwareAudioBackend::new(MixerConfig {
            max_one_shots: 2,
            ..config()
        });
        let id = backend.create(Wave::from_mono(vec![0.1; 100], 100));
        for _ in 0..4 {
            backend.play_one_shot(id, 1.0, 1.0);
        }
        assert_eq!(backend.active_shots(id), 2);

        let out = backend.render(1);
        assert!((out[0] - 0.2).abs() < 1e-6);

        backend.stop_all_shots(id);
        assert_eq!(backend.active_shots(id), 0);
        assert!(!backend.is_playing(id));
    }
}
