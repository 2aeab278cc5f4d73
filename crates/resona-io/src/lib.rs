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

//! # Resona IO
//!
//! Decoders that turn encoded audio files into [`Wave`](resona_core::Wave)s.
//! Every loader implements [`WaveLoader`](resona_core::audio::WaveLoader) so it
//! can be handed to [`Audio::from_file`](resona_core::Audio::from_file).

#![warn(missing_docs)]

mod auto_loader;
mod error;
mod symphonia_loader;
mod wav_loader;

pub use auto_loader::AutoWaveLoader;
pub use error::WaveLoadError;
pub use symphonia_loader::SymphoniaLoader;
pub use wav_loader::WavLoader;
