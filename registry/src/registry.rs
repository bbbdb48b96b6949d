//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use crate::Token;
use std::fmt;
use std::iter::{Enumerate, FusedIterator};
use std::slice;
use tracing::trace;

/// A single arena slot
///
/// `generation` is bumped every time the occupant is removed, so tokens issued
/// for a previous occupant no longer match.
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generation-tagged store of owned objects reachable only through [`Token`]s
///
/// All operations are O(1) except iteration. Tokens stay valid until the
/// matching [`remove`](HandleRegistry::remove) returns; afterwards every
/// lookup with them fails cleanly, even once the slot is reused.
pub struct HandleRegistry<T> {
    slots: Vec<Slot<T>>,
    /// Indices of vacant slots, reused last-in first-out
    free: Vec<usize>,
    len: usize,
}

impl<T> HandleRegistry<T> {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty registry with room for `capacity` entries before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the registry holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Takes ownership of `value` and returns a fresh token for it.
    pub fn insert(&mut self, value: T) -> Token<T> {
        self.insert_with(|_| value)
    }

    /// Builds the entry from the token it will be stored under.
    ///
    /// Lets an object carry its own token without a second lookup.
    pub fn insert_with<F>(&mut self, build: F) -> Token<T>
    where
        F: FnOnce(Token<T>) -> T,
    {
        let token = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                debug_assert!(slot.value.is_none(), "free list points at an occupied slot");
                let token = Token::new(index, slot.generation);
                slot.value = Some(build(token));
                token
            }
            None => {
                let index = self.slots.len();
                let token = Token::new(index, 0);
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(build(token)),
                });
                token
            }
        };
        self.len += 1;
        trace!(token = %token, "registry insert");
        token
    }

    /// Returns `true` if `token` refers to a live entry
    pub fn contains(&self, token: Token<T>) -> bool {
        self.get(token).is_some()
    }

    /// Looks up the entry for `token`.
    ///
    /// Returns `None` when the slot is vacant or its generation no longer
    /// matches the token.
    pub fn get(&self, token: Token<T>) -> Option<&T> {
        self.slots
            .get(token.index())
            .filter(|slot| slot.generation == token.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    /// Mutable variant of [`get`](HandleRegistry::get)
    pub fn get_mut(&mut self, token: Token<T>) -> Option<&mut T> {
        self.slots
            .get_mut(token.index())
            .filter(|slot| slot.generation == token.generation())
            .and_then(|slot| slot.value.as_mut())
    }

    /// Removes the entry for `token`, handing ownership back to the caller.
    ///
    /// The slot generation is bumped before this returns, so `token` (and any
    /// copy of it) is invalid from here on. Returns `None` if the token was
    /// already invalid.
    pub fn remove(&mut self, token: Token<T>) -> Option<T> {
        let slot = self.slots.get_mut(token.index())?;
        if slot.generation != token.generation() {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(token.index());
        self.len -= 1;
        trace!(token = %token, "registry remove");
        Some(value)
    }

    /// Visits every live entry in slot order.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(Token<T>, &T),
    {
        for (token, value) in self.iter() {
            visitor(token, value);
        }
    }

    /// Visits every live entry mutably in slot order.
    pub fn for_each_mut<F>(&mut self, mut visitor: F)
    where
        F: FnMut(Token<T>, &mut T),
    {
        for (token, value) in self.iter_mut() {
            visitor(token, value);
        }
    }

    /// Iterates over `(token, &entry)` pairs of live entries
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots.iter().enumerate(),
            remaining: self.len,
        }
    }

    /// Iterates over `(token, &mut entry)` pairs of live entries
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            slots: self.slots.iter_mut().enumerate(),
            remaining: self.len,
        }
    }

    /// Removes every live entry and returns them with the tokens they had.
    ///
    /// Every outstanding token is invalidated. Slots are retained for reuse.
    pub fn drain(&mut self) -> Vec<(Token<T>, T)> {
        let mut drained = Vec::with_capacity(self.len);
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Some(value) = slot.value.take() {
                drained.push((Token::new(index, slot.generation), value));
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
            }
        }
        self.len = 0;
        drained
    }

    /// Destroys every live entry
    pub fn clear(&mut self) {
        drop(self.drain());
    }
}

impl<T> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HandleRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleRegistry")
            .field("len", &self.len)
            .field("slots", &self.slots.len())
            .field("free", &self.free.len())
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a HandleRegistry<T> {
    type Item = (Token<T>, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over live entries, see [`HandleRegistry::iter`]
pub struct Iter<'a, T> {
    slots: Enumerate<slice::Iter<'a, Slot<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Token<T>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        for (index, slot) in self.slots.by_ref() {
            if let Some(value) = slot.value.as_ref() {
                self.remaining -= 1;
                return Some((Token::new(index, slot.generation), value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable iterator over live entries, see [`HandleRegistry::iter_mut`]
pub struct IterMut<'a, T> {
    slots: Enumerate<slice::IterMut<'a, Slot<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = (Token<T>, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        for (index, slot) in self.slots.by_ref() {
            let generation = slot.generation;
            if let Some(value) = slot.value.as_mut() {
                self.remaining -= 1;
                return Some((Token::new(index, generation), value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}
