use crate::Hash;
use thiserror::Error;

/// Soft reasons a candidate cannot extend the chain. `can_append` reports
/// these as a verdict; `append` raises them as `ChainError::Rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("bad block height: expected {expected}, got {got}")]
    HeightMismatch { expected: u64, got: u32 },
    #[error("bad prev hash: does not match the current tip")]
    PrevMismatch,
    #[error("bad prev hash pointer: prev block not in chain")]
    PrevUnknown,
    #[error("can't append block: prev at height {at} isn't the end of chain")]
    PrevNotTip { at: u32 },
    #[error("block difficulty {got} is not at current level {expected}")]
    DifficultyMismatch { expected: u32, got: u32 },
}

impl Rejection {
    /// Height, prev or index-position disagreement with the tip.
    pub fn is_link_error(&self) -> bool {
        !matches!(self, Rejection::DifficultyMismatch { .. })
    }
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("malformed header: {0}")]
    Format(String),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("block hash {} does not meet difficulty {difficulty}", hex::encode(.hash))]
    ProofOfWork { hash: Hash, difficulty: u32 },

    #[error("block {} already inserted", hex::encode(.0))]
    DuplicateInsert(Hash),

    #[error("chain already holds a genesis block")]
    AlreadyInitialized,

    #[error("nonce space exhausted at difficulty {0}")]
    NonceSpaceExhausted(u32),

    #[error("invalid history at height {height}: {reason}")]
    InvalidHistory { height: u32, reason: String },
}
