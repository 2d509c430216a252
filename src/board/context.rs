//! Immutable lookup context shared by positions of one engine instance.

use std::sync::Arc;

use super::attack_tables::AttackTables;
use crate::zobrist::ZobristKeys;

/// Attack tables and Zobrist keys, built once and read-only afterwards.
///
/// Positions hold an `Arc<BoardContext>`; cloning a position for another
/// search thread shares the tables instead of rebuilding them.
pub struct BoardContext {
    attacks: AttackTables,
    zobrist: ZobristKeys,
}

impl BoardContext {
    #[must_use]
    pub fn new() -> Self {
        BoardContext {
            attacks: AttackTables::new(),
            zobrist: ZobristKeys::new(),
        }
    }

    /// Build a fresh context behind an `Arc`.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    #[inline]
    #[must_use]
    pub fn attacks(&self) -> &AttackTables {
        &self.attacks
    }

    #[inline]
    #[must_use]
    pub fn zobrist(&self) -> &ZobristKeys {
        &self.zobrist
    }
}

impl Default for BoardContext {
    fn default() -> Self {
        Self::new()
    }
}
