//! Transposition table: a fixed-size hash table of 4-way buckets holding
//! 128-bit entries (a 64-bit key and a 64-bit data word), sized from a
//! target megabyte count to the largest power-of-two bucket count that
//! fits. The data word has two interpretations depending on the owner: a
//! search entry (depth/eval/move/flags) or a perft entry (depth/count).
//! Only perft uses this table directly in this crate, since search is out
//! of scope, but the search layout is part of the table's wire format and
//! is kept so a host embedding this table for search can rely on it.

use std::mem;

use crate::board::Move;

#[cfg(feature = "logging")]
use log::{debug, trace};

/// Default table size in MiB, used by [`TranspositionTable::default`].
pub const DEFAULT_TT_MB: usize = 32;

const HASH_SIZE_MIN_MB: usize = 1;
const HASH_SIZE_MAX_MB: usize = 1 << 16;
const BUCKET_SIZE: usize = 4;

#[derive(Clone, Copy, Default)]
struct Slot {
    key: u64,
    data: u64,
}

impl Slot {
    fn is_empty(self) -> bool {
        self.key == 0 && self.data == 0
    }
}

type Bucket = [Slot; BUCKET_SIZE];

/// A search-result entry as packed into the TT data word:
/// `{depth:16, eval:16, move:16, flags:8, reserved:8}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SearchEntry {
    pub(crate) depth: u16,
    pub(crate) eval: i16,
    pub(crate) mv: Move,
    pub(crate) flags: u8,
}

impl SearchEntry {
    fn pack(self) -> u64 {
        (u64::from(self.depth) << 48)
            | (u64::from(self.eval as u16) << 32)
            | (u64::from(self.mv.as_u16()) << 16)
            | (u64::from(self.flags) << 8)
    }

    fn unpack(data: u64) -> Self {
        SearchEntry {
            depth: (data >> 48) as u16,
            eval: ((data >> 32) as u16) as i16,
            mv: Move::from_u16((data >> 16) as u16),
            flags: ((data >> 8) & 0xFF) as u8,
        }
    }
}

/// A perft-memoization entry as packed into the TT data word:
/// `{depth:16, count:48}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PerftEntry {
    pub(crate) depth: u16,
    pub(crate) count: u64,
}

impl PerftEntry {
    fn pack(self) -> u64 {
        (u64::from(self.depth) << 48) | (self.count & 0x0000_FFFF_FFFF_FFFF)
    }

    fn unpack(data: u64) -> Self {
        PerftEntry {
            depth: (data >> 48) as u16,
            count: data & 0x0000_FFFF_FFFF_FFFF,
        }
    }
}

/// Fixed-size, power-of-two-bucketed transposition table. Shared by the
/// perft driver for memoizing subtree node counts; a full search owner
/// would share the same table via the `SearchEntry` half of the API.
pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    mask: usize,
}

impl TranspositionTable {
    /// Builds a table sized from `size_mb`, clamped to
    /// `[HASH_SIZE_MIN_MB, HASH_SIZE_MAX_MB]` and rounded down to the
    /// largest power-of-two bucket count that fits in that budget.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let clamped = size_mb.clamp(HASH_SIZE_MIN_MB, HASH_SIZE_MAX_MB);
        let bucket_bytes = mem::size_of::<Bucket>();
        let mut num_buckets = (clamped * 1024 * 1024) / bucket_bytes;
        num_buckets = num_buckets.next_power_of_two();
        if num_buckets > 1 && num_buckets * bucket_bytes > clamped * 1024 * 1024 {
            num_buckets /= 2;
        }
        if num_buckets == 0 {
            num_buckets = 1;
        }
        #[cfg(feature = "logging")]
        debug!("transposition table: {size_mb} MiB requested, {num_buckets} buckets allocated");
        TranspositionTable {
            buckets: vec![[Slot::default(); BUCKET_SIZE]; num_buckets],
            mask: num_buckets - 1,
        }
    }

    #[inline]
    fn bucket_index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Clears every entry without reallocating.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = [Slot::default(); BUCKET_SIZE];
        }
    }

    /// Resizes the table, discarding all prior entries.
    pub fn resize(&mut self, size_mb: usize) {
        *self = TranspositionTable::new(size_mb);
    }

    fn probe_raw(&self, key: u64) -> Option<u64> {
        let bucket = &self.buckets[self.bucket_index(key)];
        bucket
            .iter()
            .find(|s| !s.is_empty() && s.key == key)
            .map(|s| s.data)
    }

    /// Stores `data` under `key`. An existing slot for `key` is updated in
    /// place; otherwise the first empty slot in the bucket is filled. Once
    /// a bucket is full of distinct keys, storing a new key is a no-op:
    /// this table never evicts, trading capacity for a branch-free store.
    fn store_raw(&mut self, key: u64, data: u64) {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        if let Some(slot) = bucket.iter_mut().find(|s| !s.is_empty() && s.key == key) {
            slot.data = data;
            return;
        }
        if let Some(slot) = bucket.iter_mut().find(|s| s.is_empty()) {
            *slot = Slot { key, data };
        }
    }

    pub(crate) fn probe_perft(&self, key: u64) -> Option<PerftEntry> {
        let result = self.probe_raw(key).map(PerftEntry::unpack);
        #[cfg(feature = "logging")]
        trace!(
            "tt perft probe {key:#018x}: {}",
            if result.is_some() { "hit" } else { "miss" }
        );
        result
    }

    pub(crate) fn store_perft(&mut self, key: u64, entry: PerftEntry) {
        self.store_raw(key, entry.pack());
    }

    #[allow(dead_code)]
    pub(crate) fn probe_search(&self, key: u64) -> Option<SearchEntry> {
        self.probe_raw(key).map(SearchEntry::unpack)
    }

    #[allow(dead_code)]
    pub(crate) fn store_search(&mut self, key: u64, entry: SearchEntry) {
        self.store_raw(key, entry.pack());
    }

}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_TT_MB)
    }
}
