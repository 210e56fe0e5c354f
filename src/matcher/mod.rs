//! Pattern matching for public key text.
//!
//! A candidate is accepted only when every regular expression in the
//! [`PatternSet`] matches its public key text.

mod pattern;

pub use pattern::PatternSet;
