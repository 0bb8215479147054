//! Utils Module - Helper Functions & Shared Constants

pub mod abi;
pub mod constants;

pub use constants::*;
