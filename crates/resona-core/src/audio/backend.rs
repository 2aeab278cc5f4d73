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

//! Defines the abstract `AudioBackend` trait.

use super::{AudioId, LoopRegion, Wave};
use std::sync::Arc;
use std::time::Duration;

/// The abstract contract for the service that owns audio resources and plays them.
///
/// The backend is the single source of truth for playback state. Handles only
/// keep an [`AudioId`] and forward to it. Every method takes `&self`: the backend
/// is shared between handles on any thread and is responsible for its own
/// synchronization.
///
/// Queries for an id the backend does not know (including [`AudioId::NULL`])
/// return the type's zero value rather than failing.
pub trait AudioBackend: Send + Sync {
    /// Takes ownership of `wave` and returns the id of the new resource.
    ///
    /// Returns [`AudioId::NULL`] if the resource could not be created.
    fn create(&self, wave: Wave) -> AudioId;

    /// Drops the resource. Unknown ids are ignored.
    fn release(&self, id: AudioId);

    /// Returns the sampling rate of the resource in Hz.
    fn sampling_rate(&self, id: AudioId) -> u32;

    /// Returns the number of samples (frames) in the resource.
    fn samples(&self, id: AudioId) -> u64;

    /// Returns the sample buffer the resource was created from.
    fn wave(&self, id: AudioId) -> Option<Arc<Wave>>;

    /// Replaces the loop configuration of the resource.
    fn set_loop(&self, id: AudioId, region: LoopRegion);

    /// Starts or resumes playback, ramping the gain up from zero over `fade_in`.
    ///
    /// Returns `true` if the resource was already playing before the call.
    fn play(&self, id: AudioId, fade_in: Duration) -> bool;

    /// Ramps the gain to zero over `fade_out`, then holds the playback cursor.
    fn pause(&self, id: AudioId, fade_out: Duration);

    /// Ramps the gain to zero over `fade_out`, then rewinds the playback cursor.
    fn stop(&self, id: AudioId, fade_out: Duration);

    /// Fires an independent, non-looping voice at the given gain and pitch.
    fn play_one_shot(&self, id: AudioId, volume: f64, pitch: f64);

    /// Immediately silences every one-shot voice of the resource.
    fn stop_all_shots(&self, id: AudioId);

    /// Returns `true` while the main voice is playing.
    fn is_playing(&self, id: AudioId) -> bool;

    /// Returns `true` while the main voice is paused.
    fn is_paused(&self, id: AudioId) -> bool;

    /// Returns the logical playback cursor, in samples.
    fn pos_sample(&self, id: AudioId) -> i64;

    /// Returns the decode/stream cursor, in samples.
    fn stream_pos_sample(&self, id: AudioId) -> i64;

    /// Returns the number of samples consumed since playback started.
    fn samples_played(&self, id: AudioId) -> i64;

    /// Sets the `(left, right)` channel gains.
    fn set_volume(&self, id: AudioId, volume: (f64, f64));

    /// Returns the `(left, right)` channel gains.
    fn volume(&self, id: AudioId) -> (f64, f64);

    /// Sets the playback speed multiplier. The backend enforces its own range.
    fn set_speed(&self, id: AudioId, speed: f64);

    /// Returns the playback speed multiplier.
    fn speed(&self, id: AudioId) -> f64;

    /// Returns the `(min, max)` speed multipliers the backend accepts.
    fn min_max_speed(&self, id: AudioId) -> (f64, f64);
}
