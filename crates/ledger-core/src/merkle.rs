use crate::hasher::{Hasher, Sha256Hasher};
use crate::Hash;

/// Commitment over an ordered list of opaque leaves.
#[derive(Clone, Debug)]
pub struct MerkleTree<H = Sha256Hasher> {
    leaves: Vec<Vec<u8>>,
    hasher: H,
}

impl MerkleTree<Sha256Hasher> {
    pub fn new<I, L>(leaves: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        Self::with_hasher(leaves, Sha256Hasher)
    }
}

impl<H: Hasher> MerkleTree<H> {
    pub fn with_hasher<I, L>(leaves: I, hasher: H) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        Self {
            leaves: leaves.into_iter().map(|l| l.as_ref().to_vec()).collect(),
            hasher,
        }
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Root of the tree, `None` when there are no leaves.
    pub fn digest(&self) -> Option<Hash> {
        merkle_root_with(&self.leaves, &self.hasher)
    }
}

/// Pairwise reduction: an odd level duplicates its last hash before pairing.
/// A single leaf yields `hash(leaf)`.
pub fn merkle_root_with<L, H>(leaves: &[L], hasher: &H) -> Option<Hash>
where
    L: AsRef<[u8]>,
    H: Hasher + ?Sized,
{
    if leaves.is_empty() {
        return None;
    }
    let mut level: Vec<Hash> = leaves.iter().map(|l| hasher.hash(l.as_ref())).collect();

    let mut buf = [0u8; 64];
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            let last = level[level.len() - 1];
            level.push(last);
        }
        level = level
            .chunks_exact(2)
            .map(|pair| {
                buf[..32].copy_from_slice(&pair[0]);
                buf[32..].copy_from_slice(&pair[1]);
                hasher.hash(&buf)
            })
            .collect();
    }
    level.pop()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAVES_HEX: [&str; 5] = [
        "db3e68ef01baa018d3aa4c8d37f5c044c56b5b399967606660353fd4519aba63",
        "433c5bab332f40f1e1bfddcfc668f91f7a52c5912e3d37ffe906b0d0aa5a7532",
        "eb47d9f3a6c379b5c5a3792312251fce8213b7d7179d108feddb462b074f96c8",
        "3c9a87a39900c2b0813325051bc9d058c0d64fbb7987ce4e72489a73314f1c02",
        "93e99ac4b00d21a57d0d995d107cecbb7ab01a5a296e5a5ebcec35f9c884c582",
    ];

    fn leaves(n: usize) -> Vec<Vec<u8>> {
        LEAVES_HEX[..n]
            .iter()
            .map(|h| hex::decode(h).unwrap())
            .collect()
    }

    fn h(data: &[u8]) -> Hash {
        Sha256Hasher.hash(data)
    }

    fn pair(a: Hash, b: Hash) -> Hash {
        h(&[a, b].concat())
    }

    #[test]
    fn empty_tree_has_no_digest() {
        let tree = MerkleTree::new(Vec::<Vec<u8>>::new());
        assert!(tree.is_empty());
        assert_eq!(tree.digest(), None);
    }

    #[test]
    fn single_leaf_is_its_hash() {
        let l = leaves(1);
        assert_eq!(MerkleTree::new(&l).digest(), Some(h(&l[0])));
    }

    #[test]
    fn two_leaves() {
        let l = leaves(2);
        let expected = pair(h(&l[0]), h(&l[1]));
        assert_eq!(MerkleTree::new(&l).digest(), Some(expected));
    }

    #[test]
    fn three_leaves_duplicate_the_last() {
        let l = leaves(3);
        let left = pair(h(&l[0]), h(&l[1]));
        let right = pair(h(&l[2]), h(&l[2]));
        assert_eq!(MerkleTree::new(&l).digest(), Some(pair(left, right)));
    }

    #[test]
    fn five_leaves_duplicate_on_every_odd_level() {
        let l = leaves(5);
        let a = pair(h(&l[0]), h(&l[1]));
        let b = pair(h(&l[2]), h(&l[3]));
        let c = pair(h(&l[4]), h(&l[4]));
        let ab = pair(a, b);
        let cc = pair(c, c);
        assert_eq!(MerkleTree::new(&l).digest(), Some(pair(ab, cc)));
    }

    #[test]
    fn leaf_order_matters() {
        let mut l = leaves(4);
        let root = MerkleTree::new(&l).digest();
        l.swap(0, 1);
        assert_ne!(MerkleTree::new(&l).digest(), root);
    }

    #[test]
    fn custom_hasher_is_used() {
        let zero = |_: &[u8]| [0u8; 32];
        let tree = MerkleTree::with_hasher(leaves(3), zero);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.digest(), Some([0u8; 32]));
    }
}
