//! Payment-transaction construction for an account-less, UTXO-based
//! wallet: coin selection, size-proportional fee estimation, dust policy,
//! and the two-pass build that ties them together. Ledger queries and
//! cryptographic signing live behind traits ([`ledger::LedgerQuery`],
//! [`assembler::TxAssembler`]) so the core stays a pure computation layer.

pub mod api;
pub mod assembler;
pub mod error;
pub mod fees;
pub mod ledger;
pub mod model;
pub mod normalize;
pub mod selection;
