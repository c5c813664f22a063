use crate::constants::{HASH_SIZE, HEADER_SIZE};
use crate::error::ChainError;
use crate::Hash;
use serde::{Deserialize, Serialize};

/// Fixed-field block header. Values are never edited in place; `with_nonce`
/// and friends return a new header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    height: u32,
    #[serde(with = "hex")]
    prev: Hash,
    timestamp: u32,
    difficulty: u32,
    #[serde(with = "hex")]
    merkle_root: Hash,
    nonce: u32,
}

impl BlockHeader {
    pub fn new(
        height: u32,
        prev: Hash,
        timestamp: u32,
        difficulty: u32,
        merkle_root: Hash,
        nonce: u32,
    ) -> Self {
        Self {
            height,
            prev,
            timestamp,
            difficulty,
            merkle_root,
            nonce,
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn prev(&self) -> &Hash {
        &self.prev
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn merkle_root(&self) -> &Hash {
        &self.merkle_root
    }

    pub fn nonce(&self) -> u32 {
        self.nonce
    }

    pub fn with_nonce(&self, nonce: u32) -> Self {
        Self { nonce, ..*self }
    }

    pub fn with_prev(&self, prev: Hash) -> Self {
        Self { prev, ..*self }
    }

    /// Canonical big-endian layout; this is the hash preimage and the
    /// persisted form.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.height.to_be_bytes());
        out[4..36].copy_from_slice(&self.prev);
        out[36..40].copy_from_slice(&self.timestamp.to_be_bytes());
        out[40..44].copy_from_slice(&self.difficulty.to_be_bytes());
        out[44..76].copy_from_slice(&self.merkle_root);
        out[76..80].copy_from_slice(&self.nonce.to_be_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ChainError> {
        let bytes: &[u8; HEADER_SIZE] = bytes.try_into().map_err(|_| {
            ChainError::Format(format!(
                "header must be {HEADER_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self {
            height: be_u32(bytes, 0),
            prev: hash_at(bytes, 4),
            timestamp: be_u32(bytes, 36),
            difficulty: be_u32(bytes, 40),
            merkle_root: hash_at(bytes, 44),
            nonce: be_u32(bytes, 76),
        })
    }
}

fn be_u32(bytes: &[u8; HEADER_SIZE], at: usize) -> u32 {
    let mut arr = [0u8; 4];
    arr.copy_from_slice(&bytes[at..at + 4]);
    u32::from_be_bytes(arr)
}

fn hash_at(bytes: &[u8; HEADER_SIZE], at: usize) -> Hash {
    let mut arr = [0u8; HASH_SIZE];
    arr.copy_from_slice(&bytes[at..at + HASH_SIZE]);
    arr
}
