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

//! Implements a wave loader for `.wav` audio files.

use crate::WaveLoadError;
use resona_core::audio::{Wave, WaveLoader};
use std::io::Cursor;

/// A `WaveLoader` that decodes audio data from the WAV format.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavLoader;

impl WavLoader {
    /// Creates a new instance of `WavLoader`.
    pub fn new() -> Self {
        Self
    }

    /// Parses a byte slice representing a `.wav` file into a `Wave`.
    ///
    /// Integer samples of any depth up to 32 bits are normalized to `[-1.0, 1.0)`.
    pub fn decode(&self, bytes: &[u8]) -> Result<Wave, WaveLoadError> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                    return Err(WaveLoadError::UnsupportedBitDepth(spec.bits_per_sample));
                }
                let max_value = (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|s| s as f32 / max_value))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        log::debug!(
            "Decoded WAV: {} channel(s) at {} Hz, {} samples",
            spec.channels,
            spec.sample_rate,
            samples.len()
        );

        Ok(Wave::new(samples, spec.channels, spec.sample_rate))
    }
}

impl WaveLoader for WavLoader {
    fn load(&self, bytes: &[u8]) -> anyhow::Result<Wave> {
        Ok(self.decode(bytes)?)
    }
}
