//! Digest and signature engine for Nado typed data.
//!
//! Implements the standard EIP-712 hash:
//! `keccak256(0x1901 ‖ domainSeparator ‖ hashStruct(message))`, and ECDSA
//! signing/recovery over that digest. Nothing here holds keys; the signer is
//! borrowed for the duration of one call.
//!
//! # Architecture
//!
//! ```text
//! auth::LinkedSigners ── active signer ──┐
//!                                        ▼
//! NadoMessage ──► TypedData ──► ExecuteSigner ──► SignedTx / PlaceTriggerOrder
//!                     │                                  │
//!                     └──────── digest ──────────────────┘
//! ```

pub mod signer;

use alloy_primitives::{keccak256, Address, FixedBytes, Signature, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolValue;
use tracing::debug;

use crate::eip712::{gen_order_verifying_contract, TypedData};
use crate::tx::Order;
use crate::{Error, Result};

pub use signer::{ExecuteSigner, SignedTx};

/// Compute the EIP-712 typed data hash from its two halves.
pub fn compute_typed_data_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let prefix = FixedBytes::<2>::from([0x19, 0x01]);
    let data = (prefix, domain_separator, struct_hash).abi_encode_packed();
    keccak256(&data)
}

/// The 32-byte digest signed for `typed_data`.
pub fn digest(typed_data: &TypedData) -> Result<B256> {
    typed_data
        .to_eip712()?
        .eip712_signing_hash()
        .map_err(|e| typed_data.hash_error(e))
}

/// Digest as `0x`-prefixed hex.
pub fn digest_hex(typed_data: &TypedData) -> Result<String> {
    Ok(format!("0x{}", hex::encode(digest(typed_data)?)))
}

/// Sign the digest of `typed_data`.
pub fn sign_typed_data(typed_data: &TypedData, signer: &PrivateKeySigner) -> Result<Signature> {
    let digest = digest(typed_data)?;

    let signature = signer
        .sign_hash_sync(&digest)
        .map_err(|e| Error::signing(format!("Failed to sign {}: {e}", typed_data.primary_type)))?;

    debug!(
        primary_type = %typed_data.primary_type,
        signer = %signer.address(),
        digest = %digest,
        "signed typed data"
    );

    Ok(signature)
}

/// Signature as `0x` + 130 hex chars (r ‖ s ‖ v).
pub fn signature_to_hex(signature: &Signature) -> String {
    format!("0x{}", hex::encode(signature.as_bytes()))
}

pub fn signature_from_hex(s: &str) -> Result<Signature> {
    let raw = hex::decode(s.trim().trim_start_matches("0x"))
        .map_err(|e| Error::signing(format!("Invalid signature hex: {e}")))?;
    Signature::try_from(raw.as_slice())
        .map_err(|e| Error::signing(format!("Invalid signature: {e}")))
}

/// Recover the address that produced `signature` over `typed_data`.
pub fn recover_signer(typed_data: &TypedData, signature: &Signature) -> Result<Address> {
    let digest = digest(typed_data)?;
    signature
        .recover_address_from_prehash(&digest)
        .map_err(|e| Error::signing(format!("Failed to recover signer: {e}")))
}

/// Whether `signature` over `typed_data` was produced by `expected`.
pub fn verify_typed_data(
    typed_data: &TypedData,
    signature: &Signature,
    expected: Address,
) -> Result<bool> {
    Ok(recover_signer(typed_data, signature)? == expected)
}

/// Digest identifying an order on `product_id`, as referenced by
/// cancellations and trigger dependencies.
pub fn get_order_digest(order: &Order, product_id: u32, chain_id: u64) -> Result<B256> {
    let typed_data =
        TypedData::from_message(order, gen_order_verifying_contract(product_id), chain_id)?;
    digest(&typed_data)
}
