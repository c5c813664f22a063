//! Header chain core: canonical header encoding, Merkle commitments,
//! proof-of-work and the append-only chain that ties them together.

pub mod chain;
pub mod constants;
pub mod error;
pub mod genesis;
pub mod hasher;
pub mod header;
pub mod merkle;
pub mod mine;
pub mod pow;
pub mod store;

pub type Hash = [u8; constants::HASH_SIZE];

pub use chain::{Chain, Verdict};
pub use error::{ChainError, Rejection};
pub use genesis::{genesis_header, genesis_template};
pub use hasher::{Hasher, Sha256Hasher};
pub use header::BlockHeader;
pub use merkle::{merkle_root_with, MerkleTree};
pub use store::{HeaderStore, MemoryStore};
