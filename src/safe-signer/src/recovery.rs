use ethereum_types::{H160, H256, U256};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::error::{Result, SignatureError};
use crate::keccak::keccak_hash;
use crate::signature::Signature;

/// Prefix hashed in front of a 32-byte payload under the `eth_sign`
/// ("personal message") convention, per EIP-191. The trailing `32` is the
/// ASCII decimal length of the payload, not a binary length byte.
pub const ETH_SIGN_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// How the `v` byte of a packed signature is to be interpreted.
///
/// The classification is closed and exhaustive; which hash reaches the
/// recovery primitive depends on it, so the thresholds must not drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
    /// `v` of 0 or 1: the authorization is pre-recorded on chain (contract
    /// signature or approved hash) and `r` carries the signer address in
    /// the last 20 of its 32 big-endian bytes. No cryptographic recovery.
    ApprovedHash,
    /// `v` above 30: a standard recovery id shifted by +4 to avoid
    /// colliding with the approved-hash markers, signed over the
    /// `eth_sign` prefixed hash.
    PersonalMessage,
    /// Anything else (27 or 28 in practice): signed over the transaction
    /// hash directly.
    Ecdsa,
}

impl SignatureKind {
    pub fn from_v(v: u64) -> Self {
        match v {
            0 | 1 => Self::ApprovedHash,
            v if v > 30 => Self::PersonalMessage,
            _ => Self::Ecdsa,
        }
    }
}

/// Cryptographic capabilities required by signer recovery. Implementations
/// must be deterministic; [`Secp256k1Crypto`] is the production one.
pub trait Crypto {
    /// Keccak-256 of `data`.
    fn keccak256(&self, data: &[u8]) -> H256;

    /// Recover the uncompressed public key (64 bytes, without the SEC1 tag
    /// byte) from a prehashed message. `recovery_id` must be in `0..=3`.
    fn recover_public_key(
        &self,
        digest: &H256,
        recovery_id: u8,
        r: &U256,
        s: &U256,
    ) -> Result<Vec<u8>>;

    /// EIP-55 checksummed rendering of an address.
    fn to_checksum(&self, address: &H160) -> String;
}

/// Default [`Crypto`] backed by `k256` and `sha3`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1Crypto;

impl Crypto for Secp256k1Crypto {
    fn keccak256(&self, data: &[u8]) -> H256 {
        keccak_hash(data)
    }

    fn recover_public_key(
        &self,
        digest: &H256,
        recovery_id: u8,
        r: &U256,
        s: &U256,
    ) -> Result<Vec<u8>> {
        let recovery_id = RecoveryId::from_byte(recovery_id).ok_or_else(|| {
            SignatureError::InvalidSignature(format!("invalid recovery id {recovery_id}"))
        })?;

        let mut rs = [0u8; 64];
        r.to_big_endian(&mut rs[..32]);
        s.to_big_endian(&mut rs[32..]);
        let signature = EcdsaSignature::from_slice(&rs)
            .map_err(|e| SignatureError::InvalidSignature(format!("malformed r/s pair: {e}")))?;

        let key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &signature, recovery_id)
            .map_err(|e| {
                SignatureError::InvalidSignature(format!("public key recovery failed: {e}"))
            })?;

        Ok(key.to_encoded_point(false).as_bytes()[1..].to_vec())
    }

    fn to_checksum(&self, address: &H160) -> String {
        ethers_core::utils::to_checksum(address, None)
    }
}

/// Determine the checksummed address that produced `signature` over
/// `tx_hash`, using the default secp256k1 backend.
pub fn recover_signer(tx_hash: &H256, signature: &Signature) -> Result<String> {
    recover_signer_with(&Secp256k1Crypto, tx_hash, signature)
}

/// Same as [`recover_signer`], with an explicit [`Crypto`] implementation.
pub fn recover_signer_with<C: Crypto>(
    crypto: &C,
    tx_hash: &H256,
    signature: &Signature,
) -> Result<String> {
    let kind = SignatureKind::from_v(signature.v);
    log::trace!("recovering signer, v = {} classified as {kind:?}", signature.v);

    let address = match kind {
        SignatureKind::ApprovedHash => {
            // `r` is not an ECDSA component here: its 32-byte big-endian
            // form carries the signer address in the last 20 bytes.
            let mut r_bytes = [0u8; 32];
            signature.r.to_big_endian(&mut r_bytes);
            H160::from_slice(&r_bytes[12..])
        }
        SignatureKind::PersonalMessage => {
            let mut message = Vec::with_capacity(ETH_SIGN_PREFIX.len() + H256::len_bytes());
            message.extend_from_slice(ETH_SIGN_PREFIX);
            message.extend_from_slice(tx_hash.as_bytes());
            let signed_hash = crypto.keccak256(&message);

            let public_key = crypto.recover_public_key(
                &signed_hash,
                recovery_id(signature.v - 4)?,
                &signature.r,
                &signature.s,
            )?;
            public_key_to_address(crypto, &public_key)
        }
        SignatureKind::Ecdsa => {
            let public_key = crypto.recover_public_key(
                tx_hash,
                recovery_id(signature.v)?,
                &signature.r,
                &signature.s,
            )?;
            public_key_to_address(crypto, &public_key)
        }
    };

    Ok(crypto.to_checksum(&address))
}

/// Last 20 bytes of the keccak-256 hash of the raw public key.
fn public_key_to_address<C: Crypto>(crypto: &C, public_key: &[u8]) -> H160 {
    let hash = crypto.keccak256(public_key);
    H160::from_slice(&hash.as_bytes()[12..])
}

fn recovery_id(v: u64) -> Result<u8> {
    v.checked_sub(27)
        .filter(|id| *id <= 3)
        .map(|id| id as u8)
        .ok_or_else(|| {
            SignatureError::InvalidSignature(format!("v = {v} is outside the recoverable range"))
        })
}
