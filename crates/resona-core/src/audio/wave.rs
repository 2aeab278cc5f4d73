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

//! Defines the decoded sample buffer handed to an audio backend.

/// A decoded sound, ready to be handed to a backend.
///
/// Samples are stored interleaved in `f32` format. For stereo, samples are
/// ordered `[L, R, L, R, ...]` and values are expected to be in `[-1.0, 1.0]`.
/// A "sample" in the public API (sample counts, loop positions) always means one
/// frame, i.e. one value per channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wave {
    /// The raw, interleaved audio samples.
    pub samples: Vec<f32>,
    /// The number of channels in the audio data (e.g., 1 for mono, 2 for stereo).
    pub channels: u16,
    /// The number of frames per second (e.g., 44100 Hz).
    pub sample_rate: u32,
}

impl Wave {
    /// Creates a wave from interleaved samples.
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples,
            channels,
            sample_rate,
        }
    }

    /// Creates a single-channel wave.
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self::new(samples, 1, sample_rate)
    }

    /// Creates a mono wave of `frames` zero samples.
    pub fn silence(frames: usize, sample_rate: u32) -> Self {
        Self::from_mono(vec![0.0; frames], sample_rate)
    }

    /// Returns the number of frames in the wave.
    pub fn len_samples(&self) -> u64 {
        if self.channels == 0 {
            return 0;
        }
        (self.samples.len() / self.channels as usize) as u64
    }

    /// Returns `true` if the wave holds no complete frame.
    pub fn is_empty(&self) -> bool {
        self.len_samples() == 0
    }

    /// Returns the playback length in seconds, or `0.0` for a zero sample rate.
    pub fn length_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len_samples() as f64 / self.sample_rate as f64
    }

    /// Returns the frame at `index` as a `(left, right)` pair.
    ///
    /// Mono frames are duplicated on both sides; channels past the second are
    /// ignored. Out-of-range indices read as silence.
    pub fn frame(&self, index: u64) -> (f32, f32) {
        let channels = self.channels as usize;
        if channels == 0 || index >= self.len_samples() {
            return (0.0, 0.0);
        }
        let base = index as usize * channels;
        let left = self.samples[base];
        let right = if channels > 1 {
            self.samples[base + 1]
        } else {
            left
        };
        (left, right)
    }
}
