//! Single-writer UTXO-set indexer: ingests a linear chain of blocks over
//! HTTP, keeps a persistent unspent-output set, answers per-address
//! balances, and can rewind the chain to any prior height.

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod sync;
