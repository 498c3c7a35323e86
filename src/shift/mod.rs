//! Shift-code subsystem
//!
//! Three pieces, all pure:
//! - `code`: the compact `<base>[:<overtime>[:L]]` wire representation
//! - `normalizer`: free-form spreadsheet text → canonical base code
//! - `catalog`: built-in shift definitions and custom-code minting

pub mod catalog;
pub mod code;
pub mod normalizer;

pub use catalog::{default_catalog, mint_custom, codes};
pub use code::{decode, encode, ShiftAssignment};
pub use normalizer::normalize;
