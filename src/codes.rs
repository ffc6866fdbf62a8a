//! LDPC codes supported by the decoder.
//!
//! Each submodule provides the [`CodeStructure`](crate::code::CodeStructure)
//! of a code variant.

pub mod ieee802_3an;
