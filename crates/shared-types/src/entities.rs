//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Chain**: `BlockHeader`, `TransactionBody`, `FullBlock`
//! - **Networking**: `ConnectionId`

use sha2::{Digest, Sha256};
use std::fmt;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte SHA-256 hash.
pub type Hash = [u8; 32];

/// The all-zero hash, used as the parent of a genesis block.
pub const ZERO_HASH: Hash = [0u8; 32];

/// A 33-byte Pedersen commitment (compressed point).
pub type Commitment = [u8; 33];

/// Renders the first four bytes of a hash as hex, for log lines.
pub fn short_hash(hash: &Hash) -> String {
    hex::encode(&hash[..4])
}

/// The header of a block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockHeader {
    /// Header version.
    pub version: u16,
    /// Height in the chain (0 = genesis).
    pub height: u64,
    /// Hash of the parent block.
    pub previous_hash: Hash,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// Root of the output commitment MMR.
    pub output_root: Hash,
    /// Root of the kernel MMR.
    pub kernel_root: Hash,
    /// Cumulative difficulty up to and including this block.
    pub total_difficulty: u64,
    /// Proof-of-work nonce.
    pub nonce: u64,
}

impl BlockHeader {
    /// Compute the header hash.
    ///
    /// Fields are fed to SHA-256 in declaration order, integers little-endian.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.previous_hash);
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.output_root);
        hasher.update(self.kernel_root);
        hasher.update(self.total_difficulty.to_le_bytes());
        hasher.update(self.nonce.to_le_bytes());
        hasher.finalize().into()
    }
}

/// The transaction body of a block: inputs spent, outputs created and the
/// kernel excesses proving the balance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionBody {
    pub inputs: Vec<Commitment>,
    pub outputs: Vec<Commitment>,
    pub kernels: Vec<Commitment>,
}

impl TransactionBody {
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty() && self.kernels.is_empty()
    }
}

/// A complete block as received from a peer.
///
/// The hash is computed once in [`FullBlock::new`]; two blocks are equal when
/// their hashes are equal.
#[derive(Debug, Clone)]
pub struct FullBlock {
    header: BlockHeader,
    body: TransactionBody,
    hash: Hash,
}

impl FullBlock {
    pub fn new(header: BlockHeader, body: TransactionBody) -> Self {
        let hash = header.hash();
        Self { header, body, hash }
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    pub fn previous_hash(&self) -> &Hash {
        &self.header.previous_hash
    }
}

impl PartialEq for FullBlock {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for FullBlock {}

impl fmt::Display for FullBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.header.height, short_hash(&self.hash))
    }
}

// =============================================================================
// CLUSTER B: NETWORKING
// =============================================================================

/// Identifier of a live peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

impl From<u64> for ConnectionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
