//! Ethereum JSON-RPC gateway for BaseVault.
//!
//! This crate implements the `ChainReadGateway` and `WalletGateway` traits
//! from `basevault-core` against a JSON-RPC endpoint with node-managed
//! accounts. The call surface is the fixed, enumerated contract of the
//! client engine: four reads and four writes with hand-encoded ABI words.
//! Nothing here interprets contract internals; on-chain accounting is
//! queried, not modeled.

pub mod abi;
pub mod errors;
pub mod gateway;
pub mod rpc_client;

pub use errors::RpcClientError;
pub use gateway::JsonRpcGateway;
pub use rpc_client::RpcClient;
