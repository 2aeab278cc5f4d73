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

use super::AssetId;
use std::{fmt, sync::Arc};

type ReleaseFn<Id> = Box<dyn FnOnce(Id) + Send + Sync>;

struct HandleInner<Id: AssetId> {
    id: Id,
    on_release: Option<ReleaseFn<Id>>,
}

impl<Id: AssetId> Drop for HandleInner<Id> {
    fn drop(&mut self) {
        if let Some(release) = self.on_release.take() {
            if !self.id.is_null() {
                release(self.id);
            }
        }
    }
}

/// A thread-safe, reference-counted handle to a backend-resident asset.
///
/// The handle owns no asset data, only the identifier. Cloning a handle is cheap,
/// as it only increments the reference count. When the last clone is dropped the
/// release callback supplied at construction runs exactly once with the id.
pub struct AssetHandle<Id: AssetId>(Arc<HandleInner<Id>>);

impl<Id: AssetId> AssetHandle<Id> {
    /// Creates a handle for `id` that calls `on_release` when the last clone drops.
    pub fn new(id: Id, on_release: impl FnOnce(Id) + Send + Sync + 'static) -> Self {
        Self(Arc::new(HandleInner {
            id,
            on_release: Some(Box::new(on_release)),
        }))
    }

    /// Creates an empty handle holding [`AssetId::NULL`].
    pub fn null() -> Self {
        Self(Arc::new(HandleInner {
            id: Id::NULL,
            on_release: None,
        }))
    }

    /// Returns the identifier held by this handle.
    pub fn id(&self) -> Id {
        self.0.id
    }

    /// Returns `true` if the handle holds the null identifier.
    pub fn is_null(&self) -> bool {
        self.0.id.is_null()
    }

    /// Returns the number of live clones sharing this handle's identifier.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl<Id: AssetId> Default for AssetHandle<Id> {
    fn default() -> Self {
        Self::null()
    }
}

impl<Id: AssetId> Clone for AssetHandle<Id> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Id: AssetId> fmt::Debug for AssetHandle<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHandle")
            .field("id", &self.0.id)
            .field("refs", &Arc::strong_count(&self.0))
            .finish()
    }
}
