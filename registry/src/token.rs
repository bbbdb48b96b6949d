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

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Opaque handle to an entry of a [`HandleRegistry`](crate::HandleRegistry).
///
/// A token pairs a slot index with the generation the slot had when the entry
/// was inserted. The type parameter ties the token to the entity type stored in
/// the registry that minted it, so a session token can never be used to look up
/// an entry of some other registry type.
pub struct Token<T> {
    index: usize,
    generation: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> Token<T> {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        Self {
            index,
            generation,
            marker: PhantomData,
        }
    }

    /// Slot index inside the registry
    pub fn index(&self) -> usize {
        self.index
    }

    /// Generation of the slot at the time the entry was inserted
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

// Manual impls so that `T` itself is not required to be Copy/Eq/Hash.

impl<T> Clone for Token<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Token<T> {}

impl<T> PartialEq for Token<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Token<T> {}

impl<T> PartialOrd for Token<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Token<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.index, self.generation).cmp(&(other.index, other.generation))
    }
}

impl<T> Hash for Token<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<T> fmt::Display for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct NotCopy;

    #[test]
    fn test_token_is_copy_without_entity_bounds() {
        let token: Token<NotCopy> = Token::new(3, 7);
        let copy = token;
        assert_eq!(token, copy);
        assert_eq!(copy.index(), 3);
        assert_eq!(copy.generation(), 7);
    }

    #[test]
    fn test_token_equality_includes_generation() {
        let a: Token<NotCopy> = Token::new(1, 0);
        let b: Token<NotCopy> = Token::new(1, 1);
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn test_token_hash() {
        let mut set = HashSet::new();
        set.insert(Token::<NotCopy>::new(0, 0));
        set.insert(Token::<NotCopy>::new(0, 0));
        set.insert(Token::<NotCopy>::new(0, 1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_token_display() {
        let token: Token<NotCopy> = Token::new(4, 2);
        assert_eq!(token.to_string(), "4.2");
        assert!(format!("{:?}", token).contains("generation: 2"));
    }
}
