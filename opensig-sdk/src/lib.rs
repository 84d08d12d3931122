#![deny(missing_docs)]

//! OpenSig SDK - Complete SDK.
//!
//! Re-exports all OpenSig components for convenient single-crate usage.

pub use opensig;
pub use opensig_ledger as ledger;
pub use opensig_primitives as primitives;
pub use opensig_transaction as transaction;

pub use opensig::{
    Identity, OpenSig, OpenSigConfig, OpenSigError, Payment, Receipt, SendOptions, SignOptions,
};
