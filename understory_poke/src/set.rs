// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena of touchables with stable generational ids.

use alloc::vec::Vec;

use crate::touchable::Touchable;

/// Stable handle for a touchable in a [`TouchableSet`] (generational).
///
/// Ids of removed touchables never alias a later insertion into the same
/// slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TouchableId(u32, u32);

impl TouchableId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Touchable slots are intentionally 32-bit."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Debug)]
struct Entry {
    touchable: Touchable,
    enabled: bool,
}

/// Owns the touchables a set of probes can interact with.
///
/// Candidates are always visited in ascending slot order, which makes
/// first-found tie-breaks in candidate selection reproducible.
#[derive(Debug, Default)]
pub struct TouchableSet {
    slots: Vec<Slot>,
    free_list: Vec<usize>,
    len: usize,
}

impl TouchableSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an enabled touchable and return its id.
    pub fn insert(&mut self, touchable: Touchable) -> TouchableId {
        let entry = Some(Entry {
            touchable,
            enabled: true,
        });
        self.len += 1;
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx];
            slot.generation = slot.generation.wrapping_add(1);
            slot.entry = entry;
            TouchableId::new(idx, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 1,
                entry,
            });
            TouchableId::new(self.slots.len() - 1, 1)
        }
    }

    /// Remove a touchable, returning it if the id was live.
    pub fn remove(&mut self, id: TouchableId) -> Option<Touchable> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        let entry = slot.entry.take()?;
        self.free_list.push(id.idx());
        self.len -= 1;
        Some(entry.touchable)
    }

    /// Whether `id` refers to a live touchable.
    pub fn contains(&self, id: TouchableId) -> bool {
        self.entry(id).is_some()
    }

    /// Borrow a live touchable.
    pub fn get(&self, id: TouchableId) -> Option<&Touchable> {
        self.entry(id).map(|e| &e.touchable)
    }

    /// Mutably borrow a live touchable, for example to move it.
    pub fn get_mut(&mut self, id: TouchableId) -> Option<&mut Touchable> {
        self.entry_mut(id).map(|e| &mut e.touchable)
    }

    /// Enable or disable a touchable. Disabled touchables are skipped by
    /// candidate selection. Returns `false` for a stale id.
    pub fn set_enabled(&mut self, id: TouchableId, enabled: bool) -> bool {
        match self.entry_mut(id) {
            Some(e) => {
                e.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Whether a live touchable is enabled.
    pub fn is_enabled(&self, id: TouchableId) -> bool {
        self.entry(id).is_some_and(|e| e.enabled)
    }

    /// Number of live touchables.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set has no live touchables.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate enabled touchables in ascending slot order.
    pub fn candidates(&self) -> impl Iterator<Item = (TouchableId, &Touchable)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            let entry = slot.entry.as_ref()?;
            entry
                .enabled
                .then(|| (TouchableId::new(idx, slot.generation), &entry.touchable))
        })
    }

    fn entry(&self, id: TouchableId) -> Option<&Entry> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: TouchableId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.entry.as_mut()
    }
}
