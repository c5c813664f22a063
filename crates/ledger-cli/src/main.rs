mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::ChainConfig;
use ledger_core::{
    constants::DEFAULT_DIFFICULTY,
    genesis_header, genesis_template,
    mine::{mine, mine_parallel},
    BlockHeader, Chain, Hash, HeaderStore, Hasher, MerkleTree, Sha256Hasher,
};
use ledger_storage::SledStore;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ledger-cli")]
#[command(about = "Mining and inspection driver for the header chain")]
struct Cli {
    /// TOML file with chain parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the genesis nonce for a difficulty
    Genesis {
        #[arg(long)]
        difficulty: Option<u32>,
    },
    /// Mine blocks on top of the stored chain
    Mine {
        /// Data directory for sled
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Number of blocks to mine
        #[arg(long, default_value_t = 1)]
        blocks: u32,
        #[arg(long)]
        difficulty: Option<u32>,
        /// Leaf data committed by every mined block
        #[arg(long = "leaf")]
        leaves: Vec<String>,
        /// Split the nonce search across all cores
        #[arg(long)]
        parallel: bool,
    },
    /// Check the stored history end to end
    Verify {
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print a stored header as JSON
    Show {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Defaults to the tip
        #[arg(long)]
        height: Option<u32>,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load_toml(path)?,
        None => ChainConfig::default(),
    };

    match cli.cmd {
        Command::Genesis { difficulty } => {
            let difficulty = difficulty.or(config.difficulty).unwrap_or(DEFAULT_DIFFICULTY);
            let template = genesis_template(&Sha256Hasher, difficulty);
            let found = mine(&template, &Sha256Hasher, difficulty)?;
            println!("difficulty {difficulty}");
            println!("nonce {}", found.nonce());
            println!("hash {}", hex::encode(header_hash(&found)));
        }
        Command::Mine {
            data_dir,
            blocks,
            difficulty,
            leaves,
            parallel,
        } => {
            let store = open_store(data_dir, &config, true)?;
            let fallback = difficulty.or(config.difficulty).unwrap_or(DEFAULT_DIFFICULTY);
            let mut chain = open_chain(&store, fallback)?;
            if let Some(requested) = difficulty {
                if requested != chain.difficulty() {
                    bail!(
                        "stored chain is mined at difficulty {}, not {requested}",
                        chain.difficulty()
                    );
                }
            }

            for _ in 0..blocks {
                let height = chain.len();
                let mut data: Vec<Vec<u8>> =
                    leaves.iter().map(|l| l.as_bytes().to_vec()).collect();
                data.push(format!("block {height}").into_bytes());
                let root = MerkleTree::new(&data).digest().unwrap_or_default();

                let candidate = chain.create_candidate(root, 0)?;
                let mined = if parallel {
                    mine_parallel(&candidate, chain.hasher(), chain.difficulty())?
                } else {
                    mine(&candidate, chain.hasher(), chain.difficulty())?
                };
                chain.append(mined)?;
                store.put_header(&mined)?;
                println!(
                    "height {} nonce {} hash {}",
                    mined.height(),
                    mined.nonce(),
                    hex::encode(chain.tip_hash())
                );
            }
            store.flush()?;
        }
        Command::Verify { data_dir } => {
            let store = open_store(data_dir, &config, false)?;
            let chain = open_chain(&store, config.difficulty.unwrap_or(DEFAULT_DIFFICULTY))?;
            println!(
                "valid chain of {} headers, tip {}",
                chain.len(),
                hex::encode(chain.tip_hash())
            );
        }
        Command::Show { data_dir, height } => {
            let store = open_store(data_dir, &config, false)?;
            let height = match height {
                Some(h) => h,
                None => store.tip_height()?.context("store is empty")?,
            };
            let header = store
                .get_header(height)?
                .with_context(|| format!("no header at height {height}"))?;
            let out = serde_json::json!({
                "hash": hex::encode(header_hash(&header)),
                "header": header,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn header_hash(header: &BlockHeader) -> Hash {
    Sha256Hasher.hash(&header.encode())
}

/// Only `mine` may create a fresh store; inspection commands need one to exist.
fn open_store(
    data_dir: Option<PathBuf>,
    config: &ChainConfig,
    create: bool,
) -> Result<SledStore> {
    let dir = data_dir
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from("./data"));
    if !create && !dir.is_dir() {
        bail!("no chain data at {}", dir.display());
    }
    SledStore::open(&dir)
}

/// A stored chain keeps the difficulty it was mined at; `fallback` only
/// applies while the store holds nothing past genesis.
fn open_chain(store: &SledStore, fallback: u32) -> Result<Chain> {
    let difficulty = match store.tip_height()? {
        Some(h) if h > 0 => match store.get_header(h)? {
            Some(tip) => tip.difficulty(),
            None => fallback,
        },
        _ => fallback,
    };
    let chain = Chain::restore(store, genesis_header(), Sha256Hasher, difficulty)
        .context("restoring chain from store")?;
    info!(
        "chain has {} headers at difficulty {}",
        chain.len(),
        chain.difficulty()
    );
    Ok(chain)
}
