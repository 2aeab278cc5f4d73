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

use super::StreamInfo;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of a mixing backend.
///
/// Missing fields fall back to [`MixerConfig::default`] when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// Output sampling rate used when no device dictates one.
    pub output_sample_rate: u32,
    /// Output channel count used when no device dictates one.
    pub channels: u16,
    /// Lowest accepted playback speed multiplier.
    pub min_speed: f64,
    /// Highest accepted playback speed multiplier.
    pub max_speed: f64,
    /// Maximum number of simultaneous one-shot voices per resource.
    /// The oldest voice is dropped when a new one would exceed it.
    pub max_one_shots: usize,
    /// Gain applied to the final mix.
    pub master_volume: f64,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            output_sample_rate: 44100,
            channels: 2,
            min_speed: 1.0 / 1024.0,
            max_speed: 2.0,
            max_one_shots: 16,
            master_volume: 1.0,
        }
    }
}

impl MixerConfig {
    /// Load the configuration from a JSON string
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save the configuration to a JSON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Checks that the speed range is a non-empty range of finite, positive multipliers.
    pub fn validate(&self) -> anyhow::Result<()> {
        let valid = |speed: f64| speed.is_finite() && speed > 0.0;
        anyhow::ensure!(
            valid(self.min_speed) && valid(self.max_speed),
            "speed bounds must be finite and positive (min_speed = {}, max_speed = {})",
            self.min_speed,
            self.max_speed
        );
        anyhow::ensure!(
            self.min_speed <= self.max_speed,
            "min_speed ({}) exceeds max_speed ({})",
            self.min_speed,
            self.max_speed
        );
        Ok(())
    }

    /// The stream layout to render when no device is attached.
    pub fn stream_info(&self) -> StreamInfo {
        StreamInfo {
            channels: self.channels,
            sample_rate: self.output_sample_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MixerConfig::from_json(r#"{ "max_speed": 4.0 }"#).unwrap();
        assert_eq!(config.max_speed, 4.0);
        assert_eq!(config.output_sample_rate, 44100);
        assert_eq!(config.max_one_shots, 16);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixer.json");

        let config = MixerConfig {
            output_sample_rate: 48000,
            master_volume: 0.5,
            ..MixerConfig::default()
        };
        config.to_file(&path).unwrap();

        assert_eq!(MixerConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_inverted_speed_range_is_rejected() {
        let err = MixerConfig::from_json(r#"{ "min_speed": 3.0, "max_speed": 2.0 }"#).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_non_positive_speed_is_rejected() {
        assert!(MixerConfig::from_json(r#"{ "min_speed": 0.0 }"#).is_err());
        assert!(MixerConfig::from_json(r#"{ "max_speed": -1.0 }"#).is_err());
        assert!(MixerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixer.json");
        std::fs::write(&path, r#"{ "min_speed": 4.0, "max_speed": 1.0 }"#).unwrap();
        assert!(MixerConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(MixerConfig::from_file("/nonexistent/mixer.json").is_err());
    }
}
