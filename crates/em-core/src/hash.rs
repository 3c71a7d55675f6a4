//! Fast hash map and hash set type aliases.
//!
//! Keys in this workspace are short strings (class names, attribute names,
//! locale tags) produced by the application itself, so the Fx hash from
//! `rustc-hash` is used instead of the DoS-resistant default hasher.
//!
//! # Examples
//!
//! ```
//! use em_core::{FxHashMap, FxHashSet};
//!
//! let mut orders: FxHashMap<&str, usize> = FxHashMap::default();
//! orders.insert("Order", 0);
//!
//! let processed: FxHashSet<&str> = FxHashSet::default();
//! assert!(processed.is_empty());
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;
