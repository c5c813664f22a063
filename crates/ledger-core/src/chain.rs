use crate::error::{ChainError, Rejection};
use crate::genesis::genesis_header;
use crate::hasher::{Hasher, Sha256Hasher};
use crate::header::BlockHeader;
use crate::pow::meets_difficulty;
use crate::store::HeaderStore;
use crate::Hash;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Outcome of the soft checks in [`Chain::can_append`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    /// Diagnostic text; empty when accepted.
    pub fn reason(&self) -> String {
        match self {
            Verdict::Accept => String::new(),
            Verdict::Reject(r) => r.to_string(),
        }
    }
}

/// Linear header chain with a hash → height index.
///
/// Genesis always sits at height 0 and every later header must extend the
/// current tip; there is no fork handling. Mutation takes `&mut self`, so
/// sharing a chain between threads needs an outer lock.
pub struct Chain<H = Sha256Hasher> {
    headers: Vec<BlockHeader>,
    index: HashMap<Hash, u32>,
    hasher: H,
    difficulty: u32,
}

impl Chain<Sha256Hasher> {
    /// SHA-256 chain seeded with the canonical genesis header.
    pub fn with_default_genesis(difficulty: u32) -> Result<Self, ChainError> {
        Self::new(genesis_header(), Sha256Hasher, difficulty)
    }
}

impl<H: Hasher> Chain<H> {
    /// Builds a chain whose first entry is `genesis`. Genesis defines the
    /// chain, so it is inserted without validation.
    pub fn new(genesis: BlockHeader, hasher: H, difficulty: u32) -> Result<Self, ChainError> {
        let mut chain = Self::empty(hasher, difficulty);
        chain.force_append(genesis)?;
        info!(
            "chain initialised at difficulty {} with genesis {}",
            difficulty,
            hex::encode(chain.tip_hash())
        );
        Ok(chain)
    }

    /// Rebuilds a chain from stored headers. Only duplicates are refused here;
    /// call [`Chain::validate`] to check the history.
    pub fn from_headers<I>(headers: I, hasher: H, difficulty: u32) -> Result<Self, ChainError>
    where
        I: IntoIterator<Item = BlockHeader>,
    {
        let mut chain = Self::empty(hasher, difficulty);
        for header in headers {
            chain.commit(header)?;
        }
        if chain.is_empty() {
            return Err(ChainError::InvalidHistory {
                height: 0,
                reason: "no genesis header".into(),
            });
        }
        Ok(chain)
    }

    /// Loads and validates the stored history, or seeds an empty store with
    /// `genesis`. A stored history rooted at a different genesis is refused.
    pub fn restore<S>(
        store: &S,
        genesis: BlockHeader,
        hasher: H,
        difficulty: u32,
    ) -> anyhow::Result<Self>
    where
        S: HeaderStore + ?Sized,
    {
        let headers = store.load_headers()?;
        if headers.is_empty() {
            let chain = Self::new(genesis, hasher, difficulty)?;
            store.put_header(&genesis)?;
            return Ok(chain);
        }
        let chain = Self::from_headers(headers, hasher, difficulty)?;
        if chain.get_by_height(0) != Some(&genesis) {
            return Err(ChainError::InvalidHistory {
                height: 0,
                reason: "genesis differs".into(),
            }
            .into());
        }
        chain.validate()?;
        debug!("restored chain of {} headers", chain.len());
        Ok(chain)
    }

    fn empty(hasher: H, difficulty: u32) -> Self {
        Self {
            headers: Vec::new(),
            index: HashMap::new(),
            hasher,
            difficulty,
        }
    }

    fn force_append(&mut self, genesis: BlockHeader) -> Result<usize, ChainError> {
        if !self.headers.is_empty() {
            return Err(ChainError::AlreadyInitialized);
        }
        self.commit(genesis)
    }

    fn commit(&mut self, header: BlockHeader) -> Result<usize, ChainError> {
        let hash = self.hash_header(&header);
        if self.index.contains_key(&hash) {
            return Err(ChainError::DuplicateInsert(hash));
        }
        let height = u32::try_from(self.headers.len())
            .map_err(|_| ChainError::Format("chain height exceeds u32".into()))?;
        self.index.insert(hash, height);
        self.headers.push(header);
        debug!("committed block {} at height {}", hex::encode(hash), height);
        Ok(self.headers.len())
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn tip(&self) -> Option<&BlockHeader> {
        self.headers.last()
    }

    pub fn headers(&self) -> impl Iterator<Item = &BlockHeader> + '_ {
        self.headers.iter()
    }

    pub fn hash_header(&self, header: &BlockHeader) -> Hash {
        self.hasher.hash(&header.encode())
    }

    /// Hash of the tip's encoding, or of the empty input for an empty chain.
    pub fn tip_hash(&self) -> Hash {
        match self.tip() {
            Some(tip) => self.hash_header(tip),
            None => self.hasher.hash(&[]),
        }
    }

    /// Next header on top of the tip, stamped with the current time.
    pub fn create_candidate(
        &self,
        merkle_root: Hash,
        nonce: u32,
    ) -> Result<BlockHeader, ChainError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ChainError::Format("system clock is before the unix epoch".into()))?
            .as_secs();
        let timestamp = u32::try_from(now)
            .map_err(|_| ChainError::Format(format!("timestamp {now} exceeds u32")))?;
        self.create_candidate_at(merkle_root, nonce, timestamp)
    }

    pub fn create_candidate_at(
        &self,
        merkle_root: Hash,
        nonce: u32,
        timestamp: u32,
    ) -> Result<BlockHeader, ChainError> {
        let height = u32::try_from(self.len())
            .map_err(|_| ChainError::Format("chain height exceeds u32".into()))?;
        let candidate = BlockHeader::new(
            height,
            self.tip_hash(),
            timestamp,
            self.difficulty,
            merkle_root,
            nonce,
        );
        debug!("candidate at height {}", height);
        Ok(candidate)
    }

    /// Runs the append checks in order and stops at the first failure.
    ///
    /// Link and difficulty problems come back as `Verdict::Reject`. A header
    /// that misses the proof-of-work target is always an `Err`, because it
    /// means the caller's mining is broken.
    pub fn can_append(&self, candidate: &BlockHeader) -> Result<Verdict, ChainError> {
        let len = self.len();
        if u64::from(candidate.height()) != len as u64 {
            return Ok(Verdict::Reject(Rejection::HeightMismatch {
                expected: len as u64,
                got: candidate.height(),
            }));
        }
        if candidate.prev() != &self.tip_hash() {
            return Ok(Verdict::Reject(Rejection::PrevMismatch));
        }
        let Some(&at) = self.index.get(candidate.prev()) else {
            return Ok(Verdict::Reject(Rejection::PrevUnknown));
        };
        if at as usize + 1 != len {
            return Ok(Verdict::Reject(Rejection::PrevNotTip { at }));
        }
        if candidate.difficulty() != self.difficulty {
            return Ok(Verdict::Reject(Rejection::DifficultyMismatch {
                expected: self.difficulty,
                got: candidate.difficulty(),
            }));
        }

        let hash = self.hash_header(candidate);
        if !meets_difficulty(&hash, self.difficulty) {
            return Err(ChainError::ProofOfWork {
                hash,
                difficulty: self.difficulty,
            });
        }
        Ok(Verdict::Accept)
    }

    /// Validates and commits `candidate`, returning the new chain length.
    /// State is untouched on every error path.
    pub fn append(&mut self, candidate: BlockHeader) -> Result<usize, ChainError> {
        if let Verdict::Reject(rejection) = self.can_append(&candidate)? {
            warn!(
                "rejected block at height {}: {}",
                candidate.height(),
                rejection
            );
            return Err(rejection.into());
        }
        self.commit(candidate)
    }

    pub fn get_by_hash(&self, hash: &Hash) -> Option<&BlockHeader> {
        self.index
            .get(hash)
            .and_then(|&height| self.headers.get(height as usize))
    }

    pub fn get_by_height(&self, height: u32) -> Option<&BlockHeader> {
        self.headers.get(height as usize)
    }

    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(e) => {
                debug!("chain invalid: {e}");
                false
            }
        }
    }

    /// Walks the stored history from genesis to tip and reports the first
    /// inconsistency.
    pub fn validate(&self) -> Result<(), ChainError> {
        let invalid = |height: u32, reason: &str| ChainError::InvalidHistory {
            height,
            reason: reason.to_string(),
        };

        if self.index.len() != self.headers.len() {
            return Err(invalid(0, "index size differs from chain length"));
        }

        let mut prev_hash: Option<Hash> = None;
        for (i, header) in self.headers.iter().enumerate() {
            let height =
                u32::try_from(i).map_err(|_| invalid(u32::MAX, "height exceeds u32"))?;
            if header.height() != height {
                return Err(invalid(height, "height out of sequence"));
            }
            let hash = self.hash_header(header);
            if self.index.get(&hash) != Some(&height) {
                return Err(invalid(height, "index disagrees with stored position"));
            }
            match prev_hash {
                None => {
                    if header.prev() != &self.hasher.hash(&[]) {
                        return Err(invalid(height, "genesis prev is not the empty-input hash"));
                    }
                }
                Some(expected) => {
                    if header.prev() != &expected {
                        return Err(invalid(height, "prev does not link to predecessor"));
                    }
                    if header.difficulty() != self.difficulty {
                        return Err(invalid(height, "difficulty differs from chain setting"));
                    }
                    if !meets_difficulty(&hash, self.difficulty) {
                        return Err(invalid(height, "proof of work not met"));
                    }
                }
            }
            prev_hash = Some(hash);
        }
        Ok(())
    }
}
