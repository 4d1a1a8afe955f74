//! Typed-data construction for Nado transactions.

use std::collections::BTreeMap;

use alloy_dyn_abi::eip712::TypedData as Eip712TypedData;
use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::domain::{eip712_domain_type, Eip712Domain, EIP712_DOMAIN_TYPE};
use super::types::{Eip712Field, TxType};
use crate::tx::NadoMessage;
use crate::{Error, Result};

/// Struct definitions keyed by type name.
pub type Types = BTreeMap<String, Vec<Eip712Field>>;

/// EIP-712 typed data: domain, schemas, primary type and message.
///
/// Built fresh for every signing operation and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    pub types: Types,
    pub primary_type: String,
    pub domain: Eip712Domain,
    pub message: Map<String, Value>,
}

impl TypedData {
    /// Typed data for a strongly-typed transaction record.
    pub fn from_message<M: NadoMessage>(
        msg: &M,
        verifying_contract: Address,
        chain_id: u64,
    ) -> Result<Self> {
        Ok(build_typed_data(
            M::TX_TYPE,
            msg.to_message()?,
            verifying_contract,
            chain_id,
        ))
    }

    /// Resolve into `alloy-dyn-abi` typed data, which owns the EIP-712 encoding.
    ///
    /// Message values are only coerced to their declared types when hashed.
    pub fn to_eip712(&self) -> Result<Eip712TypedData> {
        let json = serde_json::to_value(self)?;
        serde_json::from_value(json).map_err(|e| {
            Error::encoding(format!("Invalid {} typed data: {e}", self.primary_type))
        })
    }

    /// `hashStruct` of the domain.
    pub fn domain_separator(&self) -> Result<B256> {
        Ok(self.to_eip712()?.domain().separator())
    }

    /// `hashStruct` of the message under the primary type.
    pub fn struct_hash(&self) -> Result<B256> {
        self.to_eip712()?
            .hash_struct()
            .map_err(|e| self.hash_error(e))
    }

    pub(crate) fn hash_error(&self, e: alloy_dyn_abi::Error) -> Error {
        Error::encoding(format!("Failed to hash {}: {e}", self.primary_type))
    }

    /// The EIP-712 signing digest.
    pub fn digest(&self) -> Result<B256> {
        crate::signing::digest(self)
    }

    pub fn digest_hex(&self) -> Result<String> {
        crate::signing::digest_hex(self)
    }
}

/// Assemble typed data for `tx`.
///
/// The message is attached verbatim; values must already be in wire form
/// (integers as decimal strings, bytes as hex).
pub fn build_typed_data(
    tx: TxType,
    message: Map<String, Value>,
    verifying_contract: Address,
    chain_id: u64,
) -> TypedData {
    let schema = tx.schema();

    let mut types = Types::new();
    types.insert(EIP712_DOMAIN_TYPE.to_string(), eip712_domain_type());
    types.insert(schema.primary_type.to_string(), schema.eip712_fields());

    TypedData {
        types,
        primary_type: schema.primary_type.to_string(),
        domain: Eip712Domain::nado(verifying_contract, chain_id),
        message,
    }
}
