//! Codec and signer recovery for packed multisig wallet signatures.
//!
//! A confirmation for a multisig transaction travels as one 65-byte record
//! `{bytes32 r}{bytes32 s}{uint8 v}`, and a transaction carries the records
//! of all confirming owners concatenated into a single bundle. This crate
//! decodes a record out of a bundle ([`Signature::split`]), encodes records
//! back into the packed form ([`signatures_to_bytes`]), and determines which
//! checksummed address produced a signature over a transaction hash
//! ([`recover_signer`]), dispatching on the signature kind encoded in `v`.
//!
//! All operations are pure and stateless; errors propagate immediately as
//! [`SignatureError`].

pub mod bytes;
pub mod error;
pub mod keccak;
pub mod recovery;
pub mod signature;

pub use crate::bytes::Bytes;
pub use crate::error::{Result, SignatureError};
pub use crate::recovery::{
    recover_signer, recover_signer_with, Crypto, Secp256k1Crypto, SignatureKind, ETH_SIGN_PREFIX,
};
pub use crate::signature::{signatures_to_bytes, Signature, SIGNATURE_LENGTH};
