//! EIP-712 domain for Nado executes.
//!
//! Every Nado transaction is signed under the same domain name and version;
//! only the chain id and verifying contract change. Orders are verified
//! per product, so each product gets its own synthetic verifying contract.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

use super::types::Eip712Field;

/// Domain name shared by all Nado transactions.
pub const NADO_DOMAIN_NAME: &str = "Nado";

/// Domain version shared by all Nado transactions.
pub const NADO_DOMAIN_VERSION: &str = "0.0.1";

/// Primary type name of the domain struct.
pub const EIP712_DOMAIN_TYPE: &str = "EIP712Domain";

/// EIP-712 domain separator input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl Eip712Domain {
    /// The Nado domain for a verifying contract on a chain.
    pub fn nado(verifying_contract: Address, chain_id: u64) -> Self {
        Self {
            name: NADO_DOMAIN_NAME.to_string(),
            version: NADO_DOMAIN_VERSION.to_string(),
            chain_id,
            verifying_contract,
        }
    }

    /// Compute the EIP-712 domain separator hash.
    pub fn separator(&self) -> B256 {
        let domain_type_hash = keccak256(
            b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
        );

        let name_hash = keccak256(self.name.as_bytes());
        let version_hash = keccak256(self.version.as_bytes());

        // encodeData pads every member to 32 bytes, addresses included.
        let contract_padded = B256::left_padding_from(self.verifying_contract.as_slice());

        let encoded = (
            domain_type_hash,
            name_hash,
            version_hash,
            U256::from(self.chain_id),
            contract_padded,
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }
}

/// The domain struct schema shared by every transaction kind.
pub fn eip712_domain_type() -> Vec<Eip712Field> {
    [
        ("name", "string"),
        ("version", "string"),
        ("chainId", "uint256"),
        ("verifyingContract", "address"),
    ]
    .into_iter()
    .map(|(name, ty)| Eip712Field::new(name, ty))
    .collect()
}

/// Verifying contract for orders on `product_id`: the id as a big-endian,
/// zero-padded 20-byte address.
pub fn gen_order_verifying_contract(product_id: u32) -> Address {
    let mut raw = [0u8; 20];
    raw[16..].copy_from_slice(&product_id.to_be_bytes());
    Address::from(raw)
}

/// Lowercase `0x`-prefixed hex of an address.
pub fn address_to_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}
