//! # In-Memory Chain
//!
//! Reference validation oracle that tracks block linkage only: a block is
//! valid when its parent is known and its height follows the parent's.
//! Blocks with an unknown parent wait in the orphan pool until the parent
//! is applied. No proof-of-work, kernel or range-proof checks happen here.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

use mw_05_block_pipeline::{BlockStatus, ValidationFault, ValidationOracle};
use shared_types::{FullBlock, Hash};

struct ChainState {
    /// Height of every applied block, by hash.
    heights: HashMap<Hash, u64>,
    tip: (Hash, u64),
    orphans: HashMap<Hash, FullBlock>,
}

impl ChainState {
    fn apply(&mut self, block: &FullBlock, parent_height: u64) -> BlockStatus {
        if block.height() != parent_height + 1 {
            return BlockStatus::Invalid;
        }

        self.heights.insert(*block.hash(), block.height());
        if block.height() > self.tip.1 {
            self.tip = (*block.hash(), block.height());
        }
        BlockStatus::Valid
    }

    fn resolvable_orphan(&self) -> Option<Hash> {
        self.orphans
            .iter()
            .find(|(_, orphan)| self.heights.contains_key(orphan.previous_hash()))
            .map(|(hash, _)| *hash)
    }
}

/// Linkage-only chain with an orphan pool.
pub struct InMemoryChain {
    state: RwLock<ChainState>,
}

impl InMemoryChain {
    pub fn new(genesis: FullBlock) -> Self {
        info!("Chain initialised at genesis {}", genesis);
        let genesis_hash = *genesis.hash();
        Self {
            state: RwLock::new(ChainState {
                heights: HashMap::from([(genesis_hash, genesis.height())]),
                tip: (genesis_hash, genesis.height()),
                orphans: HashMap::new(),
            }),
        }
    }

    pub fn height(&self) -> u64 {
        self.state.read().tip.1
    }

    pub fn tip(&self) -> Hash {
        self.state.read().tip.0
    }

    /// Whether the block has been applied to the chain.
    pub fn contains(&self, hash: &Hash) -> bool {
        self.state.read().heights.contains_key(hash)
    }

    pub fn orphan_count(&self) -> usize {
        self.state.read().orphans.len()
    }
}

impl ValidationOracle for InMemoryChain {
    fn add_block(&self, block: &FullBlock) -> Result<BlockStatus, ValidationFault> {
        let mut state = self.state.write();
        let hash = *block.hash();

        if state.heights.contains_key(&hash) || state.orphans.contains_key(&hash) {
            return Ok(BlockStatus::AlreadyProcessed);
        }

        let status = match state.heights.get(block.previous_hash()).copied() {
            Some(parent_height) => state.apply(block, parent_height),
            None => {
                state.orphans.insert(hash, block.clone());
                BlockStatus::Orphan
            }
        };

        debug!("Block {} -> {:?}", block, status);
        Ok(status)
    }

    fn process_next_orphan(&self) -> bool {
        let mut state = self.state.write();

        let Some(hash) = state.resolvable_orphan() else {
            return false;
        };
        let Some(orphan) = state.orphans.remove(&hash) else {
            return false;
        };
        let Some(parent_height) = state.heights.get(orphan.previous_hash()).copied() else {
            return false;
        };

        let status = state.apply(&orphan, parent_height);
        debug!("Orphan {} -> {:?}", orphan, status);
        true
    }
}
