use crate::constants::{GENESIS_DIFFICULTY, GENESIS_LEAF, GENESIS_NONCE, GENESIS_TIMESTAMP};
use crate::hasher::{Hasher, Sha256Hasher};
use crate::header::BlockHeader;
use crate::merkle::merkle_root_with;

/// Genesis header with nonce 0, ready for a nonce search under `hasher`.
pub fn genesis_template<H: Hasher + ?Sized>(hasher: &H, difficulty: u32) -> BlockHeader {
    let merkle_root = merkle_root_with(&[GENESIS_LEAF], hasher).unwrap_or_default();
    BlockHeader::new(
        0,
        hasher.hash(&[]),
        GENESIS_TIMESTAMP,
        difficulty,
        merkle_root,
        0,
    )
}

/// The canonical SHA-256 genesis header.
pub fn genesis_header() -> BlockHeader {
    genesis_template(&Sha256Hasher, GENESIS_DIFFICULTY).with_nonce(GENESIS_NONCE)
}
