//! Cryptographic primitives for Rusty Coin

pub mod hash;
pub mod keypair;
pub mod signature;
