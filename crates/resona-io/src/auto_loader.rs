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

//! A loader that picks the right decoder for the bytes it is given.

use crate::{SymphoniaLoader, WavLoader, WaveLoadError};
use resona_core::audio::{Wave, WaveLoader};
use std::path::Path;

/// Decodes WAV files with [`WavLoader`] and everything else with [`SymphoniaLoader`].
///
/// WAV files that `hound` cannot read (e.g. compressed WAVE formats) are retried
/// with `symphonia`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoWaveLoader {
    wav: WavLoader,
    symphonia: SymphoniaLoader,
}

impl AutoWaveLoader {
    /// Creates a new instance of `AutoWaveLoader`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `bytes`, using `extension` as a hint for non-WAV containers.
    pub fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<Wave, WaveLoadError> {
        if is_riff_wave(bytes) {
            match self.wav.decode(bytes) {
                Ok(wave) => return Ok(wave),
                Err(err) => log::debug!("hound rejected WAV data ({err}), retrying with symphonia"),
            }
        }
        self.symphonia.decode(bytes, extension)
    }
}

impl WaveLoader for AutoWaveLoader {
    fn load(&self, bytes: &[u8]) -> anyhow::Result<Wave> {
        Ok(self.decode(bytes, None)?)
    }

    fn load_file(&self, path: &Path) -> anyhow::Result<Wave> {
        use anyhow::Context;

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read audio file '{}'", path.display()))?;
        let extension = path.extension().and_then(|ext| ext.to_str());
        let wave = self
            .decode(&bytes, extension)
            .with_context(|| format!("Failed to decode audio file '{}'", path.display()))?;

        log::info!(
            "Loaded '{}': {} samples at {} Hz",
            path.display(),
            wave.len_samples(),
            wave.sample_rate
        );
        Ok(wave)
    }
}

fn is_riff_wave(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_riff_signature() {
        assert!(is_riff_wave(b"RIFF\0\0\0\0WAVEfmt "));
        assert!(!is_riff_wave(b"OggS\0\0\0\0\0\0\0\0"));
        assert!(!is_riff_wave(b"RIFF"));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(AutoWaveLoader::new().decode(&[0; 32], None).is_err());
    }
}
