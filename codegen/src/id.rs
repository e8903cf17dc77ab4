// id.rs — Stable identifiers for declarations, instances, and reactions
//
// Declarations are addressed by their position in `Program::reactors`,
// instances by their slot in the `InstanceTree` arena. Both are allocated in
// source order, so iteration over either is deterministic.

use serde::{Deserialize, Serialize};

/// Index of a reactor class declaration within a `Program`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReactorId(pub u32);

/// Index of a reactor instance within an `InstanceTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

/// Identity of a reaction: its declaring reactor plus its position in that
/// reactor's reaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReactionKey {
    pub reactor: ReactorId,
    pub index: u32,
}

impl ReactionKey {
    pub fn new(reactor: ReactorId, index: usize) -> Self {
        Self {
            reactor,
            index: index as u32,
        }
    }
}

impl ReactorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl InstanceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
