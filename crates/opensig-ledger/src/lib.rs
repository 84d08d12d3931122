#![deny(missing_docs)]

//! # opensig-ledger
//!
//! Ledger access for OpenSig: the [`LedgerGateway`] contract, the raw
//! failure shapes transports produce, a live HTTP transport, a file-driven
//! fixture transport for deterministic tests, and a blockchain.info gateway.
//!
//! The transport is chosen per gateway instance; there is no process-wide
//! switch.
//!
//! # Example
//!
//! ```no_run
//! use opensig_ledger::{BlockchainInfo, BlockchainInfoConfig, TransportStrategy};
//!
//! let live = BlockchainInfo::new(BlockchainInfoConfig::default(), TransportStrategy::http());
//! let replay = BlockchainInfo::new(
//!     BlockchainInfoConfig::default(),
//!     TransportStrategy::fixture("tests/fixtures/balance"),
//! );
//! ```

pub mod blockchain_info;
pub mod error;
pub mod fixture;
pub mod gateway;
pub mod transport;
pub mod types;


pub use blockchain_info::BlockchainInfo;
pub use error::{LedgerError, LedgerFailure, RequestContext};
pub use fixture::FixtureTransport;
pub use gateway::LedgerGateway;
pub use transport::{HttpTransport, Transport, TransportStrategy};
pub use types::{BlockchainInfoConfig, SignatureRecord, UnspentOutput};
