//! # minisign_vanity
//!
//! Parallel brute-force search for minisign keys whose public key text
//! matches a set of regular expressions.
//!
//! ## Architecture
//!
//! - `crypto`: Key generation and minisign encodings
//! - `matcher`: The pattern set every candidate is tested against
//! - `worker`: Parallel search, result handoff, cancellation and progress
//! - `keyfile`: Writing the winning keypair to disk
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod error;
pub mod keyfile;
pub mod matcher;
pub mod worker;

pub use config::Config;
pub use crypto::{Candidate, KeyGenerator, KeyId, Keypair, OsKeyGenerator, PublicKey};
pub use error::VanityError;
pub use keyfile::KeyFiles;
pub use matcher::PatternSet;
pub use worker::{CancelToken, SearchResult, WorkerPool};
