use crate::constants::HASH_SIZE;
use crate::Hash;
use sha2::{Digest, Sha256};

/// One-way function every chain and Merkle computation routes through.
///
/// Any `Fn(&[u8]) -> Hash` closure is a `Hasher`, so tests can inject a
/// deterministic substitute without defining a type.
pub trait Hasher {
    fn hash(&self, data: &[u8]) -> Hash;
}

/// The default hasher: plain SHA-256.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash(&self, data: &[u8]) -> Hash {
        let digest = Sha256::digest(data);
        let mut out = [0u8; HASH_SIZE];
        out.copy_from_slice(&digest[..]);
        out
    }
}

impl<F> Hasher for F
where
    F: Fn(&[u8]) -> Hash,
{
    fn hash(&self, data: &[u8]) -> Hash {
        self(data)
    }
}
