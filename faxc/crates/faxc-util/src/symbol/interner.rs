//! String interner backing [`super::Symbol`], using DashMap for concurrent
//! access and AHash for fast hashing of identifier text.

use ahash::AHasher;
use dashmap::DashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use super::Symbol;

/// Global string table. Initialized on first use; pre-interns the
/// language's reserved words so they get small, stable indices.
pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

/// Number of symbols reserved for keywords (see [`super::KW_FN`] and siblings).
const RESERVED_SYMBOLS_END: u32 = 16;

pub struct StringTable {
    map: DashMap<u64, (&'static str, u32), ahash::RandomState>,
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity_and_hasher(64, ahash::RandomState::new()),
            next_index: AtomicU32::new(RESERVED_SYMBOLS_END),
        }
    }

    fn initialize_known_symbols(&self) {
        const KNOWN: [&str; 9] =
            ["fn", "using", "if", "then", "else", "binary", "unary", "let", "in"];
        for (idx, text) in KNOWN.iter().enumerate() {
            let interned: &'static str = Box::leak((*text).to_owned().into_boxed_str());
            self.map.insert(Self::hash_string(text), (interned, idx as u32));
        }
    }

    /// Interns `string`, returning its symbol. Thread-safe.
    pub fn intern(&self, string: &str) -> Symbol {
        let hash = Self::hash_string(string);
        if let Some(entry) = self.map.get(&hash) {
            if entry.value().0 == string {
                return Symbol { index: entry.value().1 };
            }
        }
        match self.map.entry(hash) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                if entry.get().0 == string {
                    Symbol { index: entry.get().1 }
                } else {
                    self.handle_collision(string, hash)
                }
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let interned: &'static str = Box::leak(string.to_owned().into_boxed_str());
                let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
                entry.insert((interned, idx));
                Symbol { index: idx }
            }
        }
    }

    /// Linear-probes past a hash collision; exceedingly rare for the
    /// identifier sets this compiler ever sees.
    fn handle_collision(&self, string: &str, original_hash: u64) -> Symbol {
        const PROBE_PRIME: u64 = 0x9e3779b97f4a7c15;
        let mut probe_hash = original_hash;
        loop {
            probe_hash = probe_hash.wrapping_add(PROBE_PRIME);
            match self.map.entry(probe_hash) {
                dashmap::mapref::entry::Entry::Occupied(entry) if entry.get().0 == string => {
                    return Symbol { index: entry.get().1 };
                }
                dashmap::mapref::entry::Entry::Occupied(_) => continue,
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    let interned: &'static str = Box::leak(string.to_owned().into_boxed_str());
                    let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
                    entry.insert((interned, idx));
                    return Symbol { index: idx };
                }
            }
        }
    }

    /// Looks up the text for a symbol. Linear in the number of interned
    /// strings; callers should keep text around rather than calling this
    /// in hot loops.
    pub fn get(&self, index: u32) -> &'static str {
        self.map
            .iter()
            .find(|entry| entry.value().1 == index)
            .map(|entry| entry.value().0)
            .unwrap_or("")
    }

    fn hash_string(string: &str) -> u64 {
        let mut hasher = AHasher::default();
        string.hash(&mut hasher);
        hasher.finish()
    }
}
