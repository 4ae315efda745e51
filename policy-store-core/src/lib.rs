//! Core types for Policy Store
//!
//! This crate contains the in-memory policy model shared by the adapter
//! and its callers, plus the line codec that maps rules to and from the
//! stored text format.

pub mod codec;
pub mod error;
pub mod model;

pub use codec::{
    array_to_string, decode_text, encode_model, CsvLineCodec, LineCodec, LineDecoder, LineEncoder,
};
pub use error::CoreError;
pub use model::{PolicyModel, Rule, POLICY_SECTIONS};
