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

//! Audio asset handles and the contracts they are built on.
//!
//! [`Audio`] is the user-facing handle. It holds an [`AudioId`] and an explicit
//! reference to the [`AudioBackend`] that owns the resource, and forwards every
//! operation to it after normalizing parameters. Loop requests are expressed as a
//! [`LoopSpec`] and reduced to a canonical [`LoopRegion`] before the backend
//! sees them.

mod asset;
mod backend;
mod config;
mod device;
mod id;
mod loader;
mod loop_region;
mod wave;

pub use asset::*;
pub use backend::*;
pub use config::*;
pub use device::*;
pub use id::*;
pub use loader::*;
pub use loop_region::*;
pub use wave::*;
