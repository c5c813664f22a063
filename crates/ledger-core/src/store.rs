use crate::constants::HEADER_SIZE;
use crate::header::BlockHeader;
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Trait the storage backends implement so a chain can be persisted and
/// restored. Lives in `ledger-core` to avoid a circular dependency.
///
/// Headers are keyed by height and kept in their canonical encoding.
pub trait HeaderStore: Send + Sync {
    fn put_header(&self, header: &BlockHeader) -> Result<()>;
    fn get_header(&self, height: u32) -> Result<Option<BlockHeader>>;
    fn tip_height(&self) -> Result<Option<u32>>;
    /// All headers in height order.
    fn load_headers(&self) -> Result<Vec<BlockHeader>>;
}

#[derive(Default)]
pub struct MemoryStore {
    headers: Mutex<BTreeMap<u32, [u8; HEADER_SIZE]>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_headers<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<u32, [u8; HEADER_SIZE]>) -> T,
    ) -> Result<T> {
        let mut guard = self
            .headers
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

impl HeaderStore for MemoryStore {
    fn put_header(&self, header: &BlockHeader) -> Result<()> {
        self.with_headers(|h| {
            h.insert(header.height(), header.encode());
        })
    }

    fn get_header(&self, height: u32) -> Result<Option<BlockHeader>> {
        let raw = self.with_headers(|h| h.get(&height).copied())?;
        Ok(raw.map(|b| BlockHeader::decode(&b)).transpose()?)
    }

    fn tip_height(&self) -> Result<Option<u32>> {
        self.with_headers(|h| h.keys().next_back().copied())
    }

    fn load_headers(&self) -> Result<Vec<BlockHeader>> {
        let raw: Vec<[u8; HEADER_SIZE]> =
            self.with_headers(|h| h.values().copied().collect())?;
        raw.iter()
            .map(|b| BlockHeader::decode(b).map_err(Into::into))
            .collect()
    }
}
