#![deny(missing_docs)]

//! # opensig
//!
//! File-derived blockchain identities and proof-of-existence signatures.
//!
//! Hashing a file gives a deterministic private key, and so an address that
//! belongs to that exact content. Signing a file means paying a small amount
//! from your own address to the file's address; verifying it means listing
//! the transactions that paid into that address.
//!
//! # Example
//!
//! ```no_run
//! use opensig::{OpenSig, OpenSigConfig, SignOptions};
//!
//! # async fn run() -> opensig::Result<()> {
//! let opensig = OpenSig::from_config(&OpenSigConfig::default());
//! let receipt = opensig
//!     .sign("contract.pdf", "L33c5Gv8Ggt99PFDPieZ5fk56u1dZVChjGsHbrRAz9yagytNs32a", SignOptions::default())
//!     .await?;
//! println!("{}", receipt.transaction_id);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod deriver;
pub mod error;
pub mod filesystem;
pub mod format;
pub mod identity;
pub mod logging;
pub mod pipeline;
pub mod receipt;
pub mod selector;
pub mod signature;


pub use classify::classify;
pub use config::{LedgerConfig, OpenSigConfig, TransportMode};
pub use deriver::{classify_token, resolve_identity, resolve_public_address, PublicAddress, Token, TokenKind};
pub use error::{ErrorCode, OpenSigError, Result};
pub use identity::Identity;
pub use logging::{init_logging, LogFormat};
pub use pipeline::{OpenSig, SendOptions, SignOptions, Stage};
pub use receipt::{Party, PublishResponse, Receipt};
pub use selector::{select, InputSelection, Payment, Target};
pub use signature::SignatureFormat;

pub use opensig_ledger::{SignatureRecord, UnspentOutput};
