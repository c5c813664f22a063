use crate::error::ChainError;
use crate::hasher::Hasher;
use crate::header::BlockHeader;
use crate::pow::meets_difficulty;
use rayon::prelude::*;
use std::ops::RangeInclusive;
use tracing::info;

/// Brute-force search from nonce 0 until the header hash meets `difficulty`.
/// Every other field of `template` is kept as-is.
pub fn mine<H: Hasher + ?Sized>(
    template: &BlockHeader,
    hasher: &H,
    difficulty: u32,
) -> Result<BlockHeader, ChainError> {
    mine_range(template, hasher, difficulty, 0..=u32::MAX)
}

pub fn mine_range<H: Hasher + ?Sized>(
    template: &BlockHeader,
    hasher: &H,
    difficulty: u32,
    nonces: RangeInclusive<u32>,
) -> Result<BlockHeader, ChainError> {
    for nonce in nonces {
        let candidate = template.with_nonce(nonce);
        let hash = hasher.hash(&candidate.encode());
        if meets_difficulty(&hash, difficulty) {
            info!(
                "Mined block {} with nonce {} and hash {}",
                candidate.height(),
                nonce,
                hex::encode(hash)
            );
            return Ok(candidate);
        }
    }
    Err(ChainError::NonceSpaceExhausted(difficulty))
}

/// Same result as [`mine`], with the nonce range split across rayon workers.
pub fn mine_parallel<H: Hasher + Sync + ?Sized>(
    template: &BlockHeader,
    hasher: &H,
    difficulty: u32,
) -> Result<BlockHeader, ChainError> {
    let base = *template;
    let found = (0u32..=u32::MAX)
        .into_par_iter()
        .find_first(|nonce| {
            let hash = hasher.hash(&base.with_nonce(*nonce).encode());
            meets_difficulty(&hash, difficulty)
        })
        .ok_or(ChainError::NonceSpaceExhausted(difficulty))?;

    let mined = base.with_nonce(found);
    info!(
        "Mined block {} with nonce {} and hash {} (parallel)",
        mined.height(),
        found,
        hex::encode(hasher.hash(&mined.encode()))
    );
    Ok(mined)
}
