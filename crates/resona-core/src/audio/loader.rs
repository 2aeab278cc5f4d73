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

//! Defines the `WaveLoader` trait used to turn files into [`Wave`]s.

use super::Wave;
use anyhow::{Context, Result};
use std::path::Path;

/// Decodes encoded audio into a [`Wave`].
///
/// Implementations live outside of the core crate; the audio handle only needs
/// this contract to support construction from a file path.
pub trait WaveLoader: Send + Sync {
    /// Decodes an in-memory encoded file.
    fn load(&self, bytes: &[u8]) -> Result<Wave>;

    /// Reads and decodes the file at `path`.
    fn load_file(&self, path: &Path) -> Result<Wave> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read audio file '{}'", path.display()))?;
        self.load(&bytes)
            .with_context(|| format!("Failed to decode audio file '{}'", path.display()))
    }
}
