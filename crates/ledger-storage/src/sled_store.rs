use anyhow::{bail, Context, Result};
use ledger_core::{BlockHeader, HeaderStore};
use sled::{Db, IVec, Tree};
use std::path::Path;
use tracing::{debug, info};

const TREE_HEADERS: &str = "headers";

/// Sled-backed header store. Keys are big-endian heights so iteration is in
/// height order; values are the canonical header encoding.
#[derive(Clone)]
pub struct SledStore {
  db: Db,
  headers: Tree,
}

impl SledStore {
  pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let db = sled::open(path)
      .with_context(|| format!("opening sled store at {}", path.display()))?;
    let headers = db.open_tree(TREE_HEADERS)?;
    info!("sled store opened at {}", path.display());
    Ok(Self { db, headers })
  }

  pub fn clear(&self) -> Result<()> {
    self.headers.clear()?;
    self.db.flush()?;
    Ok(())
  }

  pub fn flush(&self) -> Result<()> {
    self.db.flush()?;
    Ok(())
  }
}

fn decode(key: &[u8], value: &IVec) -> Result<BlockHeader> {
  let header =
    BlockHeader::decode(value).with_context(|| format!("decoding stored header {key:?}"))?;
  if key != header.height().to_be_bytes() {
    bail!(
      "stored header at key {key:?} claims height {}",
      header.height()
    );
  }
  Ok(header)
}

impl HeaderStore for SledStore {
  fn put_header(&self, header: &BlockHeader) -> Result<()> {
    let key = header.height().to_be_bytes();
    self.headers.insert(key, &header.encode()[..])?;
    self.db.flush()?;
    debug!("stored header at height {}", header.height());
    Ok(())
  }

  fn get_header(&self, height: u32) -> Result<Option<BlockHeader>> {
    let key = height.to_be_bytes();
    self
      .headers
      .get(key)?
      .map(|v| decode(&key, &v))
      .transpose()
  }

  fn tip_height(&self) -> Result<Option<u32>> {
    let tip = self
      .headers
      .last()?
      .map(|(k, v)| decode(&k, &v))
      .transpose()?;
    Ok(tip.map(|h| h.height()))
  }

  fn load_headers(&self) -> Result<Vec<BlockHeader>> {
    self
      .headers
      .iter()
      .map(|entry| {
        let (k, v) = entry?;
        decode(&k, &v)
      })
      .collect()
  }
}
