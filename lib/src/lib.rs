// Copyright (c) 2025-2026 The Trezoreum Developers

//! Trezor hardware wallet interface library
//!
//! Drives the Trezor wire protocol over an abstract byte channel: device
//! unlock (PIN / passphrase negotiation with transparent button
//! confirmation handling), Ethereum address derivation and the chunked
//! sign-transaction workflow with EIP-155 signature normalization.
//!
//! Private key material never leaves the device; the library streams the
//! transaction payload across, validates the returned signature and
//! recovers the sender address as a sanity check.
//!
//! See [Trezoreum] for the device handle, [transport::Transport] for the
//! channel contract and [proto] for message definitions and the wire
//! codec.

/// Re-export `trezoreum-proto` for consumers
pub use trezoreum_proto as proto;

/// Transport channel abstraction, consumed by the protocol engine
pub mod transport;

mod handle;
pub use handle::{TrezorState, Trezoreum};

mod error;
pub use error::Error;

pub mod eth;

pub mod path;
