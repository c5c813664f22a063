mod helpers;

use helpers::{create_temp_store, teardown_store};
use ledger_core::{
    genesis_header, merkle_root_with, mine::mine, BlockHeader, Chain, HeaderStore, Sha256Hasher,
};
use ledger_storage::SledStore;
use rand::Rng;
use tempfile::tempdir;

fn extend(chain: &mut Chain, store: &SledStore, blocks: u32) -> anyhow::Result<()> {
    for _ in 0..blocks {
        let height = chain.len() as u32;
        let leaves = [format!("payload {height}").into_bytes()];
        let root = merkle_root_with(&leaves, chain.hasher()).unwrap_or_default();
        let candidate = chain.create_candidate_at(root, 0, 1_600_000_000 + height)?;
        let mined = mine(&candidate, chain.hasher(), chain.difficulty())?;
        chain.append(mined)?;
        store.put_header(&mined)?;
    }
    Ok(())
}

#[test]
fn test_storage_round_trip() -> anyhow::Result<()> {
    let (temp_dir, store) = create_temp_store();
    let mut rng = rand::thread_rng();
    let mut headers = Vec::new();
    for height in 0..100u32 {
        let header =
            BlockHeader::new(height, rng.gen(), rng.gen(), rng.gen(), rng.gen(), rng.gen());
        store.put_header(&header)?;
        headers.push(header);
    }

    for header in &headers {
        let retrieved = store.get_header(header.height())?.expect("Header should exist");
        assert_eq!(&retrieved, header);
    }
    assert_eq!(store.tip_height()?, Some(99));
    assert_eq!(store.load_headers()?, headers);
    assert_eq!(store.get_header(100)?, None);

    teardown_store(temp_dir, store);
    Ok(())
}

#[test]
fn test_empty_store() -> anyhow::Result<()> {
    let (temp_dir, store) = create_temp_store();
    assert_eq!(store.tip_height()?, None);
    assert!(store.load_headers()?.is_empty());
    teardown_store(temp_dir, store);
    Ok(())
}

#[test]
fn test_load_orders_by_height() -> anyhow::Result<()> {
    let (temp_dir, store) = create_temp_store();
    // 256 sorts before 1 if keys were little-endian
    for height in [256u32, 1, 0, 2] {
        store.put_header(&BlockHeader::new(height, [0u8; 32], 0, 0, [0u8; 32], 0))?;
    }
    let heights: Vec<u32> = store.load_headers()?.iter().map(|h| h.height()).collect();
    assert_eq!(heights, vec![0, 1, 2, 256]);
    assert_eq!(store.tip_height()?, Some(256));
    teardown_store(temp_dir, store);
    Ok(())
}

#[test]
fn test_chain_persistence() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().to_path_buf();
    let tip_hash;

    {
        let store = SledStore::open(&db_path)?;
        let mut chain = Chain::restore(&store, genesis_header(), Sha256Hasher, 1)?;
        assert_eq!(chain.len(), 1);
        extend(&mut chain, &store, 3)?;
        tip_hash = chain.tip_hash();
        store.flush()?;
    }

    {
        let store = SledStore::open(&db_path)?;
        let chain = Chain::restore(&store, genesis_header(), Sha256Hasher, 1)?;
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.tip_hash(), tip_hash);
        assert!(chain.is_valid());
        assert_eq!(store.get_header(0)?, Some(genesis_header()));
    }

    temp_dir.close()?;
    Ok(())
}

#[test]
fn test_corrupted_value_fails_closed() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().to_path_buf();

    {
        let store = SledStore::open(&db_path)?;
        store.put_header(&genesis_header())?;
        store.flush()?;
    }

    // Overwrite the stored bytes through raw sled
    {
        let sled_db = sled::open(&db_path)?;
        let headers = sled_db.open_tree("headers")?;
        let previous = headers.insert(0u32.to_be_bytes(), vec![0u8; 10])?;
        assert!(previous.is_some(), "Expected to overwrite the genesis header");
        sled_db.flush()?;
    }

    let store = SledStore::open(&db_path)?;
    assert!(store.get_header(0).is_err());
    assert!(store.load_headers().is_err());
    assert!(Chain::restore(&store, genesis_header(), Sha256Hasher, 1).is_err());

    drop(store);
    temp_dir.close()?;
    Ok(())
}

#[test]
fn test_misplaced_header_is_rejected() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().to_path_buf();

    {
        let sled_db = sled::open(&db_path)?;
        let headers = sled_db.open_tree("headers")?;
        headers.insert(7u32.to_be_bytes(), &genesis_header().encode()[..])?;
        sled_db.flush()?;
    }

    let store = SledStore::open(&db_path)?;
    assert!(store.get_header(7).is_err());

    drop(store);
    temp_dir.close()?;
    Ok(())
}

#[test]
fn test_storage_trait_compliance() {
    fn assert_store_trait<T: HeaderStore>() {}
    assert_store_trait::<SledStore>();
}
