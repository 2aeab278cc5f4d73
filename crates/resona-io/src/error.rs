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

//! Errors raised while decoding audio files.

use thiserror::Error;

/// A failure to turn encoded bytes into a [`Wave`](resona_core::Wave).
#[derive(Debug, Error)]
pub enum WaveLoadError {
    /// The RIFF/WAVE container or its samples could not be parsed.
    #[error("Failed to parse WAV data: {0}")]
    Wav(#[from] hound::Error),
    /// Container detection or the codec failed.
    #[error("Failed to decode audio stream: {0}")]
    Decode(#[from] symphonia::core::errors::Error),
    /// The container holds no track to play.
    #[error("No default audio track found")]
    NoDefaultTrack,
    /// The track does not declare its sampling rate.
    #[error("Unknown sample rate")]
    UnknownSampleRate,
    /// The track does not declare its channel layout.
    #[error("Unknown channel count")]
    UnknownChannels,
    /// Integer samples wider than 32 bits, or of zero width.
    #[error("Unsupported WAV bit depth: {0}")]
    UnsupportedBitDepth(u16),
}
