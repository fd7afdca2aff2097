// Copyright (c) 2025-2026 The Trezoreum Developers

use trezoreum_proto as proto;

/// Trezor interface library error type.
///
/// No failure is retried internally apart from the transparent button
/// confirmation loop, and signing has no partial success: either a fully
/// validated signed transaction is returned or none at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport channel failure, surfaced verbatim
    #[error("transport error: {0}")]
    Transport(#[source] anyhow::Error),

    /// Device returned an explicit failure message
    #[error("device rejected request: {message}")]
    DeviceRejected {
        /// Human readable message extracted from the failure reply
        message: String,
    },

    /// Reply type matched no expected variant (protocol desynchronization
    /// or schema version mismatch)
    #[error("unexpected reply: got {actual}, expected one of {expected:?}")]
    UnexpectedReply {
        /// Names of every expected catalog variant
        expected: Vec<String>,
        /// Name of the variant actually received
        actual: String,
    },

    /// Codec failure at the frame or payload level
    #[error(transparent)]
    Proto(#[from] proto::Error),

    /// Device enumeration came back empty
    #[error("couldn't find any trezor devices")]
    NoDeviceFound,

    /// Declared-unimplemented operation
    #[error("not supported: {0}")]
    NotSupported(&'static str),

    /// Signing reply lacked a complete signature
    #[error("device reply lacks a signature")]
    MissingSignature,

    /// Signature failed validation or sender recovery
    #[error("signature failed validation")]
    SignatureInvalid,

    /// Device returned an address of the wrong length
    #[error("device returned a {0} byte address, expected 20")]
    InvalidAddress(usize),
}
