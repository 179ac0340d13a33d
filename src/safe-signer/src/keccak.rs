use ethereum_types::H256;
use sha3::{Digest, Keccak256};

/// Compute the keccak-256 hash of the given bytes.
pub fn keccak_hash(data: &[u8]) -> H256 {
    H256::from_slice(Keccak256::digest(data).as_slice())
}
