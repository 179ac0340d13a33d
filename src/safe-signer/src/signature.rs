use ethereum_types::U256;
use serde::{Deserialize, Serialize};

use crate::bytes::Bytes;
use crate::error::{Result, SignatureError};

/// Wire size of one packed signature record.
pub const SIGNATURE_LENGTH: usize = 65;

/// One signature of a multisig transaction.
///
/// `v` is kept wider than its one-byte wire width so that the shifted values
/// used by signer recovery (`v - 4`) never underflow before validation.
/// `r` and `s` are 256-bit by construction and occupy exactly 32 big-endian
/// bytes each on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Signature {
    pub v: u64,
    pub r: U256,
    pub s: U256,
}

impl Signature {
    /// Upper limit for the signature S field
    /// (`0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0`).
    /// See comment to `Signature::check_malleability()` for more details.
    pub const S_UPPER_LIMIT: U256 = U256([
        0xDFE9_2F46_681B_20A0,
        0x5D57_6E73_57A4_501D,
        0xFFFF_FFFF_FFFF_FFFF,
        0x7FFF_FFFF_FFFF_FFFF,
    ]);

    /// Decode the signature at `position` out of a packed bundle of
    /// `{bytes32 r}{bytes32 s}{uint8 v}` records. Slot `i` occupies bytes
    /// `[65*i, 65*i + 65)`; the bundle carries no count field, so the caller
    /// must know how many records it holds.
    pub fn split(bundle: impl AsRef<[u8]>, position: usize) -> Result<Self> {
        let bundle = bundle.as_ref();
        // The slot offset is caller controlled; a position whose offset
        // overflows usize must surface as `OutOfRange`, not wrap around the
        // length check and decode a record straddling two slots.
        let end = SIGNATURE_LENGTH
            .checked_mul(position)
            .and_then(|offset| offset.checked_add(SIGNATURE_LENGTH))
            .filter(|end| *end <= bundle.len())
            .ok_or_else(|| SignatureError::OutOfRange {
                position,
                expected: SIGNATURE_LENGTH
                    .saturating_mul(position)
                    .saturating_add(SIGNATURE_LENGTH),
                actual: bundle.len(),
            })?;
        let offset = end - SIGNATURE_LENGTH;

        Ok(Self {
            v: bundle[offset + 64] as u64,
            r: U256::from_big_endian(&bundle[offset..offset + 32]),
            s: U256::from_big_endian(&bundle[offset + 32..offset + 64]),
        })
    }

    /// Encode as `{bytes32 r}{bytes32 s}{uint8 v}`.
    ///
    /// The wire order differs from the `(v, r, s)` field order used across
    /// the API; deployed wallet contracts parse bundles in this order, so it
    /// must not change.
    pub fn to_bytes(&self) -> Result<[u8; SIGNATURE_LENGTH]> {
        let v = u8::try_from(self.v).map_err(|_| {
            SignatureError::ValueOverflow(format!("v = {} does not fit in one byte", self.v))
        })?;

        let mut out = [0u8; SIGNATURE_LENGTH];
        self.r.to_big_endian(&mut out[..32]);
        self.s.to_big_endian(&mut out[32..64]);
        out[64] = v;
        Ok(out)
    }

    /// This comment is adapted from OpenZeppelin `ECDSA::tryRecover()`.
    ///
    /// EIP-2 still allows signature malleability for ecrecover(). Appendix F
    /// of the Ethereum Yellow paper defines the valid range for s as
    /// 0 < s < secp256k1n / 2 + 1. A signature with s in the upper half of
    /// the curve order has a second valid form with the complementary s and
    /// flipped v, so unique-signature schemes must reject the upper range.
    pub fn check_malleability(s: &U256) -> Result<()> {
        if s > &Self::S_UPPER_LIMIT {
            return Err(SignatureError::InvalidSignature(format!(
                "S value in signature should not exceed {}",
                Self::S_UPPER_LIMIT
            )));
        }

        Ok(())
    }
}

/// Concatenate signatures into the packed fixed-slot bundle form, 65 bytes
/// per record in input order. An empty input yields empty bytes.
pub fn signatures_to_bytes<'a>(
    signatures: impl IntoIterator<Item = &'a Signature>,
) -> Result<Bytes> {
    let mut out = Vec::new();
    for signature in signatures {
        out.extend_from_slice(&signature.to_bytes()?);
    }
    Ok(out.into())
}
