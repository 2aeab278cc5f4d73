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

//! Generational storage for backend resources, addressed by [`AudioId`].

use resona_core::audio::AudioId;

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A slot arena handing out [`AudioId`]s.
///
/// An id packs the slot generation in its high 32 bits and the slot index in
/// its low 32 bits. Generations start at 1, so no live id is ever null, and a
/// slot's generation is bumped on removal so stale ids stop resolving.
pub(super) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Arena<T> {
    pub(super) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub(super) fn insert(&mut self, value: T) -> AudioId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 1,
                    value: None,
                });
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.value = Some(value);
        self.len += 1;
        encode(slot.generation, index)
    }

    pub(super) fn remove(&mut self, id: AudioId) -> Option<T> {
        let (generation, index) = decode(id);
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != generation {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = match slot.generation.wrapping_add(1) {
            0 => 1,
            next => next,
        };
        self.free.push(index);
        self.len -= 1;
        Some(value)
    }

    pub(super) fn get(&self, id: AudioId) -> Option<&T> {
        let (generation, index) = decode(id);
        self.slots
            .get(index as usize)
            .filter(|slot| slot.generation == generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub(super) fn get_mut(&mut self, id: AudioId) -> Option<&mut T> {
        let (generation, index) = decode(id);
        self.slots
            .get_mut(index as usize)
            .filter(|slot| slot.generation == generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub(super) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|slot| slot.value.as_mut())
    }

    pub(super) fn len(&self) -> usize {
        self.len
    }
}

fn encode(generation: u32, index: u32) -> AudioId {
    AudioId::from_raw(((generation as u64) << 32) | index as u64)
}

fn decode(id: AudioId) -> (u32, u32) {
    let raw = id.raw();
    ((raw >> 32) as u32, raw as u32)
}
