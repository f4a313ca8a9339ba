//! Gateway implementation over JSON-RPC.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::json;
use tokio::time::Instant;

use basevault_core::chain::{
    Address, ChainReadGateway, TxHash, TxReceipt, TxStatus, UserPosition, WalletGateway,
    WriteCall,
};
use basevault_core::errors::{ChainError, Error, Result};

use crate::abi;
use crate::errors::RpcClientError;
use crate::rpc_client::RpcClient;

const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptResponse {
    status: String,
    transaction_hash: String,
}

/// [`ChainReadGateway`] and [`WalletGateway`] against a JSON-RPC endpoint
/// with node-managed accounts (`eth_sendTransaction`).
///
/// Constructed per session with the connected account and the token/vault
/// contract addresses. Reads go through `eth_call` at the latest block;
/// submissions are followed by receipt polling.
pub struct JsonRpcGateway {
    client: RpcClient,
    sender: Address,
    token: Address,
    vault: Address,
    receipt_poll_interval: Duration,
    receipt_timeout: Duration,
}

impl JsonRpcGateway {
    pub fn new(
        endpoint: impl Into<String>,
        sender: Address,
        token: Address,
        vault: Address,
    ) -> Self {
        Self {
            client: RpcClient::new(endpoint),
            sender,
            token,
            vault,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
        }
    }

    pub fn with_receipt_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.receipt_poll_interval = interval;
        self.receipt_timeout = timeout;
        self
    }

    async fn eth_call(&self, to: &Address, data: Vec<u8>) -> Result<String> {
        let result: String = self
            .client
            .call(
                "eth_call",
                json!([{ "to": to.as_str(), "data": abi::to_hex(&data) }, "latest"]),
            )
            .await
            .map_err(Error::from)?;
        Ok(result)
    }

    /// The contract a write call is addressed to.
    fn write_target(&self, call: &WriteCall) -> &Address {
        match call {
            WriteCall::Approve { .. } => &self.token,
            WriteCall::Deposit { .. }
            | WriteCall::Redeem { .. }
            | WriteCall::InvestInSymbiotic { .. } => &self.vault,
        }
    }
}

#[async_trait]
impl ChainReadGateway for JsonRpcGateway {
    async fn chain_id(&self) -> Result<u64> {
        let quantity: String = self
            .client
            .call("eth_chainId", json!([]))
            .await
            .map_err(Error::from)?;
        Ok(abi::decode_quantity(&quantity).map_err(Error::from)?)
    }

    async fn position(&self, address: &Address) -> Result<UserPosition> {
        let data = abi::encode_user(address).map_err(Error::from)?;
        let result = self.eth_call(&self.vault, data).await?;
        Ok(abi::decode_user_position(&result).map_err(Error::from)?)
    }

    async fn token_balance(&self, address: &Address) -> Result<u128> {
        let data = abi::encode_balance_of(address).map_err(Error::from)?;
        let result = self.eth_call(&self.token, data).await?;
        Ok(abi::decode_u256(&result).map_err(Error::from)?)
    }

    async fn allowance(&self, owner: &Address) -> Result<u128> {
        let data = abi::encode_allowance(owner, &self.vault).map_err(Error::from)?;
        let result = self.eth_call(&self.token, data).await?;
        Ok(abi::decode_u256(&result).map_err(Error::from)?)
    }

    async fn min_staking_time(&self) -> Result<u64> {
        let result = self.eth_call(&self.vault, abi::encode_min_staking_time()).await?;
        Ok(abi::decode_u64(&result).map_err(Error::from)?)
    }
}

#[async_trait]
impl WalletGateway for JsonRpcGateway {
    async fn submit(&self, call: WriteCall) -> Result<TxHash> {
        call.validate()?;
        let data = abi::encode_write(&call).map_err(Error::from)?;
        let to = self.write_target(&call);

        debug!("Submitting {} to {}", call.name(), to);
        let tx_hash: String = self
            .client
            .call(
                "eth_sendTransaction",
                json!([{
                    "from": self.sender.as_str(),
                    "to": to.as_str(),
                    "data": abi::to_hex(&data),
                }]),
            )
            .await
            .map_err(Error::from)?;
        Ok(TxHash(tx_hash))
    }

    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> Result<TxReceipt> {
        let deadline = Instant::now() + self.receipt_timeout;

        loop {
            let receipt: Option<ReceiptResponse> = self
                .client
                .call_nullable("eth_getTransactionReceipt", json!([tx_hash.0]))
                .await
                .map_err(Error::from)?;

            if let Some(receipt) = receipt {
                let status = if receipt.status == "0x1" {
                    TxStatus::Success
                } else {
                    TxStatus::Reverted
                };
                return Ok(TxReceipt {
                    tx_hash: TxHash(receipt.transaction_hash),
                    status,
                });
            }

            if Instant::now() >= deadline {
                return Err(ChainError::ReceiptTimeout {
                    tx_hash: tx_hash.0.clone(),
                }
                .into());
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }
}
