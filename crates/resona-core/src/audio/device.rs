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

//! Defines the abstract `AudioDevice` trait.

use anyhow::Result;

/// A struct providing information about the audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    /// The number of channels (e.g., 2 for stereo).
    pub channels: u16,
    /// The number of samples per second (e.g., 44100 Hz).
    pub sample_rate: u32,
}

/// The callback a device invokes whenever it needs more interleaved samples.
pub type MixCallback = Box<dyn FnMut(&mut [f32], &StreamInfo) + Send>;

/// The abstract contract for a hardware audio output.
///
/// This trait is the boundary between the mixer and the platform-specific code
/// that talks to the sound card. Its design is callback-driven: the mixer hands
/// over a function that the device calls whenever it needs more audio data.
pub trait AudioDevice: Send + Sync {
    /// Initializes and starts the audio stream.
    ///
    /// This method consumes the `AudioDevice` as it typically runs for the lifetime
    /// of the application.
    ///
    /// # Arguments
    ///
    /// * `on_mix_needed`: A closure that will be called repeatedly by the device,
    ///   usually on a dedicated audio thread. It must fill the provided buffer with
    ///   the next chunk of interleaved samples (`[L, R, L, R, ...]`).
    fn start(self: Box<Self>, on_mix_needed: MixCallback) -> Result<()>;
}
