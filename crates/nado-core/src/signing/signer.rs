//! Transaction signer for the Nado execute API.
//!
//! Binds a private key to a chain/endpoint configuration and picks the right
//! verifying contract per transaction: orders are signed against their
//! product's contract, everything else against the endpoint.

use std::fmt;

use alloy_primitives::{Address, B256};
use alloy_signer_local::PrivateKeySigner;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{digest, sign_typed_data, signature_to_hex};
use crate::config::Config;
use crate::eip712::{gen_order_verifying_contract, TxType, TypedData};
use crate::subaccount::bytes32_to_hex;
use crate::tx::{NadoMessage, Order};
use crate::{Error, Result};

/// A record with its signature and digest, both `0x` hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTx<M> {
    pub tx: M,
    pub signature: String,
    pub digest: String,
}

/// Signer for Nado transactions.
#[derive(Clone)]
pub struct ExecuteSigner {
    signer: PrivateKeySigner,
    config: Config,
}

impl ExecuteSigner {
    pub fn new(signer: PrivateKeySigner, config: Config) -> Self {
        Self { signer, config }
    }

    /// Get the signer's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Verifying contract for `tx`.
    ///
    /// `place_order` requires `product_id`; all other types use the endpoint
    /// address and ignore it.
    pub fn verifying_contract(&self, tx: TxType, product_id: Option<u32>) -> Result<Address> {
        if tx.uses_product_verifying_contract() {
            let product_id = product_id.ok_or_else(|| {
                Error::missing_config(format!("product_id is required to sign {tx}"))
            })?;
            Ok(gen_order_verifying_contract(product_id))
        } else {
            self.config.endpoint_addr()
        }
    }

    /// Typed data for `msg` under this signer's chain and contracts.
    pub fn typed_data<M: NadoMessage>(
        &self,
        msg: &M,
        product_id: Option<u32>,
    ) -> Result<TypedData> {
        let contract = self.verifying_contract(M::TX_TYPE, product_id)?;
        TypedData::from_message(msg, contract, self.config.chain_id()?)
    }

    /// Sign an order for `product_id`.
    #[instrument(
        skip(self, order),
        fields(sender = %bytes32_to_hex(&order.sender), nonce = order.nonce)
    )]
    pub fn sign_order(&self, order: Order, product_id: u32) -> Result<SignedTx<Order>> {
        let typed_data = self.typed_data(&order, Some(product_id))?;
        self.finish(order, &typed_data)
    }

    /// Sign any non-order transaction against the endpoint contract.
    #[instrument(skip(self, tx), fields(tx_type = %M::TX_TYPE))]
    pub fn sign_tx<M: NadoMessage>(&self, tx: M) -> Result<SignedTx<M>> {
        if M::TX_TYPE.uses_product_verifying_contract() {
            return Err(Error::schema(format!(
                "{} must be signed with sign_order",
                M::TX_TYPE
            )));
        }
        let typed_data = self.typed_data(&tx, None)?;
        self.finish(tx, &typed_data)
    }

    /// Digest of an order on `product_id` without signing it.
    pub fn order_digest(&self, order: &Order, product_id: u32) -> Result<B256> {
        digest(&self.typed_data(order, Some(product_id))?)
    }

    fn finish<M>(&self, tx: M, typed_data: &TypedData) -> Result<SignedTx<M>> {
        let digest = digest(typed_data)?;
        let signature = sign_typed_data(typed_data, &self.signer)?;

        debug!(primary_type = %typed_data.primary_type, digest = %digest, "transaction signed");

        Ok(SignedTx {
            tx,
            signature: signature_to_hex(&signature),
            digest: format!("0x{}", hex::encode(digest)),
        })
    }
}

impl fmt::Debug for ExecuteSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteSigner")
            .field("address", &self.address())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
