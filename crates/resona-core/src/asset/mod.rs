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

//! Provides the foundational traits and primitive types for Resona's asset system.
//!
//! The key components are:
//! - The [`AssetId`] trait: Identifiers with a distinguished null value.
//! - [`AssetHandle`]: A reference-counted holder of one identifier that notifies
//!   its owner when the last clone goes away.

mod handle;

pub use handle::*;

use std::fmt::Debug;
use std::hash::Hash;

/// An opaque identifier of a backend-resident resource.
///
/// Every identifier type reserves one value, [`AssetId::NULL`], meaning
/// "no resource". Handles holding the null identifier are empty.
pub trait AssetId: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// The identifier that refers to no resource.
    const NULL: Self;

    /// Returns `true` if this is the null identifier.
    fn is_null(self) -> bool {
        self == Self::NULL
    }
}
