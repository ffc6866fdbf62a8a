//! # IEEE 802.3an LDPC decoder
//!
//! `ldpc_8023an` is a hardware-compliant decoder for quasi-cyclic LDPC codes
//! with the geometry of the IEEE 802.3an (10GBASE-T) code: 2048 variable nodes
//! and 384 check nodes of degree 32. It reproduces bit by bit the behavior of
//! a fixed-point decoder core: the saturating datapath, the layered and
//! two-phase message passing schedules, and the extra iteration that the
//! hardware performs after all the parity checks are satisfied.
//!
//! It can be used as a Rust library, from C through a small C API, or as a
//! CLI tool. See [`decoder`] for the decoder itself and [`cli`] for the
//! usage of the CLI tool. The built-in code in [`codes::ieee802_3an`] is a
//! stand-in with the 802.3an geometry, not the matrix of the standard.

#![warn(missing_docs)]

pub mod cli;
pub mod code;
pub mod codes;
pub mod decoder;
pub mod vectors;

mod c_api;
