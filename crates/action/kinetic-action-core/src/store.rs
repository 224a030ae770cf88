//! Ordered keyed storage used for an action's properties, values and auxiliary data.
//!
//! Insertion order is preserved so iteration (value updates, origin snapshots)
//! is deterministic across frames.

use indexmap::IndexMap;

use crate::props::Props;

/// Ordered `String -> T` map with single and bulk writes.
///
/// Reads of unknown keys return `None`; nothing is validated.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyedStore<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for KeyedStore<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> KeyedStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key)
    }

    /// The whole map, in insertion order.
    #[inline]
    pub fn all(&self) -> &IndexMap<String, T> {
        &self.entries
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Write a single entry, returning the replaced one. Existing keys keep their position.
    pub fn set(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        self.entries.insert(key.into(), value)
    }

    /// Bulk write: matching keys are overwritten, the rest are preserved.
    pub fn extend<K, I>(&mut self, partial: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        for (key, value) in partial {
            self.entries.insert(key.into(), value);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut T)> {
        self.entries.iter_mut()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> KeyedStore<T> {
    /// Create a store pre-seeded with a copy of `defaults`.
    pub fn with_defaults<'a, I>(defaults: I) -> Self
    where
        T: 'a,
        I: IntoIterator<Item = (&'a String, &'a T)>,
    {
        let mut store = Self::new();
        store.merge_defaults(defaults);
        store
    }

    /// Insert every default whose key is still absent.
    pub fn merge_defaults<'a, I>(&mut self, defaults: I)
    where
        T: 'a,
        I: IntoIterator<Item = (&'a String, &'a T)>,
    {
        for (key, value) in defaults {
            if !self.entries.contains_key(key) {
                self.entries.insert(key.clone(), value.clone());
            }
        }
    }
}

impl KeyedStore<serde_json::Value> {
    /// Numeric reading; absent or non-numeric entries read as `None`.
    #[inline]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.entries.get(key).and_then(serde_json::Value::as_f64)
    }

    /// Copy the store into a property object.
    pub fn snapshot(&self) -> Props {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
