//! String interner implementation using `DashMap` for concurrent access.
//!
//! The front-end itself is single-threaded (§5), but the interner is kept
//! thread-safe anyway, matching how the teacher's own string table is
//! built: it costs nothing at this scale and lets a caller run independent
//! front-ends for multiple packages on separate threads (§5: "callers
//! wishing to process multiple packages in parallel must instantiate
//! independent front-ends per package") while sharing one identifier table.
//!
//! # Performance characteristics
//!
//! - Interning (hit): O(1) hash lookup.
//! - Interning (miss): O(1) hash insert plus one allocation.
//! - Resolving a handle back to a string: O(1) vector index.

use dashmap::DashMap;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{LazyLock, RwLock};

use ahash::AHasher;

use super::InternerStats;

/// Global string table instance, initialized lazily on first use.
pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

/// Thread-safe string table backing [`super::Ident`].
///
/// Strings are allocated on the heap and leaked to obtain `'static`
/// references, which is acceptable because the table lives for the entire
/// process and interned strings are never removed.
pub struct StringTable {
    /// Maps the interned string itself to its index, for the common
    /// "already interned" path. Keyed on the string rather than its hash
    /// alone, so a hash collision between two distinct identifiers can never
    /// alias them to the same `Ident`.
    index_by_str: DashMap<&'static str, u32, BuildHasherDefault<AHasher>>,
    /// Dense storage of the leaked strings themselves, indexed by the value
    /// `Ident` wraps.
    strings: RwLock<Vec<&'static str>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl StringTable {
    fn new() -> Self {
        Self {
            index_by_str: DashMap::default(),
            strings: RwLock::new(Vec::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Intern `s`, returning a stable index usable by [`super::Ident`].
    pub fn intern(&self, s: &str) -> u32 {
        if let Some(existing) = self.index_by_str.get(s) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return *existing;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let mut strings = self.strings.write().unwrap();
        // Re-check under the write lock in case another thread interned the
        // same string between the read above and acquiring this lock.
        if let Some(existing) = self.index_by_str.get(s) {
            return *existing;
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let index = strings.len() as u32;
        strings.push(leaked);
        self.index_by_str.insert(leaked, index);
        index
    }

    /// Resolve an index back to its string.
    pub fn resolve(&self, index: u32) -> &'static str {
        self.strings.read().unwrap()[index as usize]
    }

    /// Current interner statistics.
    pub fn stats(&self) -> InternerStats {
        InternerStats {
            count: self.strings.read().unwrap().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_then_resolve_round_trips() {
        let table = StringTable::new();
        let idx = table.intern("hello");
        assert_eq!(table.resolve(idx), "hello");
    }

    #[test]
    fn interning_twice_reuses_the_index() {
        let table = StringTable::new();
        let a = table.intern("world");
        let b = table.intern("world");
        assert_eq!(a, b);
        assert_eq!(table.stats().hits, 1);
        assert_eq!(table.stats().misses, 1);
    }
}
