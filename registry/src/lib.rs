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

//! # Telshell Handle Registry
//!
//! A slot arena that owns objects of a single entity type and hands out
//! [`Token`]s in their place. A token is a capability to look an object up,
//! not a reference to it: once the object is removed every lookup with the old
//! token fails, even after the slot has been reused by a newer object.
//!
//! ```rust
//! use telshell_registry::HandleRegistry;
//!
//! let mut registry = HandleRegistry::new();
//! let token = registry.insert(String::from("session"));
//! assert_eq!(registry.get(token).map(String::as_str), Some("session"));
//!
//! assert_eq!(registry.remove(token), Some(String::from("session")));
//! assert!(registry.get(token).is_none());
//! assert!(registry.remove(token).is_none());
//! ```

mod registry;
mod token;

pub use self::registry::{HandleRegistry, Iter, IterMut};
pub use self::token::Token;
