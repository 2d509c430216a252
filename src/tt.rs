//! Transposition table shared by all search threads.
//!
//! Every slot is two `AtomicU64`s: the packed payload and `key ^ payload`.
//! Writers store both words with relaxed ordering and no lock, so a reader
//! racing a writer can observe one word from each store. Such a torn slot
//! fails the `key ^ payload == key` check and is reported as a miss; a miss
//! only costs search effort, never correctness. The race is accepted for
//! throughput and is the reason the checksum exists.

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::board::search::MIN_MATE;
use crate::board::Move;

/// Largest accepted table size in MiB
pub const MAX_HASH_MB: usize = 1 << 16;

/// Slots sampled for [`TranspositionTable::hashfull`]
const HASHFULL_SAMPLE: usize = 1000;

/// Relation of a stored score to the true value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeType {
    /// Empty slot marker; never stored
    None = 0,
    /// Exact score
    Pv = 1,
    /// Fail high: score is a lower bound
    Cut = 2,
    /// Fail low: score is an upper bound
    All = 3,
}

impl NodeType {
    const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            1 => NodeType::Pv,
            2 => NodeType::Cut,
            3 => NodeType::All,
            _ => NodeType::None,
        }
    }
}

/// Unpacked table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    /// Score normalized to the root; see [`score_from_tt`]
    pub score: i32,
    pub eval: i32,
    pub best_move: Move,
    pub depth: i32,
    pub node_type: NodeType,
}

/// Payload layout:
/// - bits 0-15:  score (i16)
/// - bits 16-31: static eval (i16)
/// - bits 32-47: move
/// - bits 48-55: depth (u8)
/// - bits 56-63: node type
fn pack(score: i32, eval: i32, mv: Move, depth: i32, node_type: NodeType) -> u64 {
    let score = score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16 as u16;
    let eval = eval.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16 as u16;
    let depth = depth.clamp(0, i32::from(u8::MAX)) as u8;

    u64::from(score)
        | (u64::from(eval) << 16)
        | (u64::from(mv.as_u16()) << 32)
        | (u64::from(depth) << 48)
        | ((node_type as u64) << 56)
}

fn unpack(data: u64) -> TTEntry {
    TTEntry {
        score: i32::from(data as u16 as i16),
        eval: i32::from((data >> 16) as u16 as i16),
        best_move: Move::from_u16((data >> 32) as u16),
        depth: i32::from((data >> 48) as u8),
        node_type: NodeType::from_bits((data >> 56) as u8),
    }
}

#[repr(C)]
struct TTSlot {
    /// Stores: key ^ data
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl TTSlot {
    fn new() -> Self {
        TTSlot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    /// The key this slot claims to hold, and its payload.
    #[inline]
    fn load(&self) -> (u64, u64) {
        let data = self.data.load(Ordering::Relaxed);
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        (key_xor ^ data, data)
    }

    #[inline]
    fn store(&self, key: u64, data: u64) {
        self.data.store(data, Ordering::Relaxed);
        self.key_xor.store(key ^ data, Ordering::Relaxed);
    }

    fn clear(&self) {
        self.data.store(0, Ordering::Relaxed);
        self.key_xor.store(0, Ordering::Relaxed);
    }
}

/// Fixed-size, power-of-two, single-slot-per-index hash table.
pub struct TranspositionTable {
    slots: Box<[TTSlot]>,
    mask: usize,
}

impl TranspositionTable {
    /// Table using at most `size_mb` MiB, clamped to `[1, MAX_HASH_MB]`.
    ///
    /// The slot count is the largest power of two that fits the budget.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let size_mb = size_mb.clamp(1, MAX_HASH_MB);
        let budget = (size_mb << 20) / mem::size_of::<TTSlot>();
        let len = if budget.is_power_of_two() {
            budget
        } else {
            budget.next_power_of_two() >> 1
        };

        let slots: Box<[TTSlot]> = (0..len).map(|_| TTSlot::new()).collect();
        debug!("transposition table: {size_mb} MiB, {len} slots");

        TranspositionTable {
            slots,
            mask: len - 1,
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    fn slot(&self, key: u64) -> &TTSlot {
        &self.slots[(key as usize) & self.mask]
    }

    /// Entry stored for `key`, if the slot holds it and passes the checksum.
    #[must_use]
    pub fn probe(&self, key: u64) -> Option<TTEntry> {
        let (stored_key, data) = self.slot(key).load();
        if data == 0 || stored_key != key {
            return None;
        }
        let entry = unpack(data);
        (entry.node_type != NodeType::None).then_some(entry)
    }

    /// Store a search result.
    ///
    /// PV results always replace. Otherwise a slot holding another position,
    /// or one searched less than four plies deeper, is overwritten. Storing
    /// without a move keeps the move already known for the same position.
    pub fn save(&self, key: u64, score: i32, eval: i32, mv: Move, depth: i32, node_type: NodeType) {
        let slot = self.slot(key);
        let (stored_key, old) = slot.load();
        let same_position = old != 0 && stored_key == key;
        let old_depth = if same_position { unpack(old).depth } else { 0 };

        if node_type == NodeType::Pv || !same_position || depth + 4 > old_depth {
            let mv = if mv.is_null() && same_position {
                unpack(old).best_move
            } else {
                mv
            };
            slot.store(key, pack(score, eval, mv, depth, node_type));
        }
    }

    /// Occupancy in per mille, sampled over the first slots.
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        let sample = self.slots.len().min(HASHFULL_SAMPLE);
        if sample == 0 {
            return 0;
        }
        let used = self.slots[..sample]
            .iter()
            .filter(|slot| slot.data.load(Ordering::Relaxed) != 0)
            .count();
        (used * 1000 / sample) as u32
    }

    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.clear();
        }
    }
}

/// Make a mate score relative to the node at `ply` before storing it.
#[inline]
#[must_use]
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MIN_MATE {
        score + ply as i32
    } else if score <= -MIN_MATE {
        score - ply as i32
    } else {
        score
    }
}

/// Re-root a stored mate score at the probing node's `ply`.
#[inline]
#[must_use]
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MIN_MATE {
        score - ply as i32
    } else if score <= -MIN_MATE {
        score + ply as i32
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::search::MATE;
    use crate::board::Square;

    fn some_move() -> Move {
        Move::new(Square::E1, Square::G1)
    }

    #[test]
    fn test_save_then_probe_returns_entry() {
        let tt = TranspositionTable::new(1);
        let key = 0x1234_5678_9ABC_DEF0;
        tt.save(key, -245, 37, some_move(), 9, NodeType::Cut);

        let entry = tt.probe(key).expect("entry stored");
        assert_eq!(entry.score, -245);
        assert_eq!(entry.eval, 37);
        assert_eq!(entry.best_move, some_move());
        assert_eq!(entry.depth, 9);
        assert_eq!(entry.node_type, NodeType::Cut);
    }

    #[test]
    fn test_other_key_in_same_slot_misses() {
        let tt = TranspositionTable::new(1);
        let key = 0x0000_0000_0000_0042;
        let alias = key | (1 << 63);
        tt.save(key, 10, 10, some_move(), 3, NodeType::Pv);
        assert!(tt.probe(alias).is_none());
    }

    #[test]
    fn test_torn_slot_is_a_miss() {
        let tt = TranspositionTable::new(1);
        let key = 0xDEAD_BEEF_0000_0001;
        tt.save(key, 10, 10, some_move(), 3, NodeType::Pv);
        // Payload of a later write without its matching key word.
        let slot = tt.slot(key);
        slot.data
            .store(pack(99, 0, Move::null(), 12, NodeType::Cut), Ordering::Relaxed);
        assert!(tt.probe(key).is_none());
    }

    #[test]
    fn test_shallow_result_does_not_replace_deep_one() {
        let tt = TranspositionTable::new(1);
        let key = 77;
        tt.save(key, 50, 0, some_move(), 12, NodeType::Cut);
        tt.save(key, -50, 0, Move::null(), 4, NodeType::All);
        assert_eq!(tt.probe(key).unwrap().depth, 12);

        tt.save(key, 20, 0, Move::null(), 9, NodeType::All);
        let entry = tt.probe(key).unwrap();
        assert_eq!(entry.depth, 9);
        assert_eq!(entry.best_move, some_move());
    }

    #[test]
    fn test_pv_always_replaces() {
        let tt = TranspositionTable::new(1);
        let key = 91;
        tt.save(key, 50, 0, some_move(), 30, NodeType::Cut);
        tt.save(key, 7, 0, some_move(), 1, NodeType::Pv);
        assert_eq!(tt.probe(key).unwrap().node_type, NodeType::Pv);
    }

    #[test]
    fn test_slot_count_is_power_of_two_within_budget() {
        for mb in [1, 3, 16, 33] {
            let tt = TranspositionTable::new(mb);
            assert!(tt.len().is_power_of_two());
            assert!(tt.len() * mem::size_of::<TTSlot>() <= mb << 20);
            assert!(tt.len() * 2 * mem::size_of::<TTSlot>() > mb << 20);
        }
    }

    #[test]
    fn test_clear_and_hashfull() {
        let tt = TranspositionTable::new(1);
        assert_eq!(tt.hashfull(), 0);
        for key in 0..500u64 {
            tt.save(key, 0, 0, some_move(), 1, NodeType::All);
        }
        assert_eq!(tt.hashfull(), 500);
        tt.clear();
        assert_eq!(tt.hashfull(), 0);
        assert!(tt.probe(1).is_none());
    }

    #[test]
    fn test_mate_scores_are_ply_relative() {
        let mate_in_3_from_ply_5 = MATE - 8;
        let stored = score_to_tt(mate_in_3_from_ply_5, 5);
        assert_eq!(stored, MATE - 3);
        assert_eq!(score_from_tt(stored, 2), MATE - 5);
        assert_eq!(score_from_tt(score_to_tt(-MATE + 9, 4), 4), -MATE + 9);
        assert_eq!(score_to_tt(150, 10), 150);
    }
}
