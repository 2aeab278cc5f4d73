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

use crate::asset::AssetId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque identifier of an audio resource held by an [`AudioBackend`](super::AudioBackend).
///
/// The raw value is chosen by the backend. Zero is reserved for [`AudioId::NULL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AudioId(u64);

impl AudioId {
    /// The identifier of no resource. Empty handles hold this value.
    pub const NULL: AudioId = AudioId(0);

    /// Wraps a raw backend value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw backend value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is [`AudioId::NULL`].
    pub const fn is_null_asset(self) -> bool {
        self.0 == 0
    }
}

impl AssetId for AudioId {
    const NULL: Self = AudioId::NULL;
}

impl fmt::Display for AudioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null_asset() {
            write!(f, "AudioId(null)")
        } else {
            write!(f, "AudioId({:#x})", self.0)
        }
    }
}
