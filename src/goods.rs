//! Goods

use std::{fmt::Debug, hash::Hash};

/// An identifier for a desired item type.
///
/// The allocation engine only relies on equality and hashing to group offers by good, so plain
/// strings and composite keys (e.g. a card name paired with its set) both work. `Clone` is needed
/// to build the lookup indices and `Debug` to name the good in error messages.
pub trait Good: Eq + Hash + Clone + Debug {}

impl<T> Good for T where T: Eq + Hash + Clone + Debug {}
