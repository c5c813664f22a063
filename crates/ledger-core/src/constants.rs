pub const HASH_SIZE: usize = 32;
/// height + prev + timestamp + difficulty + merkle_root + nonce
pub const HEADER_SIZE: usize = 4 + HASH_SIZE + 4 + 4 + HASH_SIZE + 4;

pub const DEFAULT_DIFFICULTY: u32 = 1;

pub const GENESIS_TIMESTAMP: u32 = 1_572_328_964;
pub const GENESIS_DIFFICULTY: u32 = 1;
/// Smallest nonce meeting `GENESIS_DIFFICULTY` under SHA-256.
pub const GENESIS_NONCE: u32 = 21;
pub const GENESIS_LEAF: [u8; 14] = [
    0x00, 0x00, 0xDE, 0xAD, 0xBE, 0xEF, 0xBA, 0xDC, 0xAF, 0xFE, 0xBA, 0xAD, 0xF0, 0x0D,
];
