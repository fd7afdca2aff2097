// Copyright (c) 2025-2026 The Trezoreum Developers

//! Protocol definitions for Trezor device communication
//!
//! This crate provides the closed message catalog exchanged with the device
//! and the wire framing around it. Messages are protobuf-encoded ([prost])
//! with field numbers matching the firmware 1.7.x era schema; each message
//! carries a stable numeric type tag used in the frame header.
//!
//! The tag mapping is a compile-time property of the [Message] enum: a
//! variant without a registered tag cannot be constructed, and unknown tags
//! received from the device surface as [Error::UnknownMessageType].

use num_enum::TryFromPrimitive;
use prost::Message as _;
use strum::Display;

pub mod common;
pub mod ethereum;
pub mod management;
pub mod wire;

use common::{
    ButtonAck, ButtonRequest, Failure, PassphraseAck, PassphraseRequest, PinMatrixAck,
    PinMatrixRequest, Success,
};
use ethereum::{
    EthereumAddress, EthereumGetAddress, EthereumSignTx, EthereumTxAck, EthereumTxRequest,
};
use management::{Features, Initialize, Ping};

/// Protocol codec error type
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// Frame header named a tag outside the message catalog
    #[error("unknown message type {0}")]
    UnknownMessageType(u16),

    /// Frame shorter than its header, or header length disagreeing with
    /// the payload
    #[error("malformed wire frame")]
    MalformedFrame,

    /// Payload failed protobuf decoding
    #[error("malformed message payload: {0}")]
    MalformedPayload(#[from] prost::DecodeError),
}

macro_rules! message_catalog {
    ($($name:ident = $tag:literal,)+) => {
        /// Wire type tags for the message catalog.
        ///
        /// Values match the `MessageType` enumeration of the Trezor
        /// protobuf schema; the [Display] name is the bare variant name
        /// used in diagnostics.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
        #[repr(u16)]
        pub enum MessageType {
            $($name = $tag,)+
        }

        /// A typed protocol message, tagged with its catalog variant.
        #[derive(Clone, Debug, PartialEq)]
        pub enum Message {
            $($name($name),)+
        }

        impl Message {
            /// Wire type tag for this message
            pub fn message_type(&self) -> MessageType {
                match self {
                    $(Message::$name(_) => MessageType::$name,)+
                }
            }

            /// Serialize the message payload (without frame header)
            pub fn encode_payload(&self) -> Vec<u8> {
                match self {
                    $(Message::$name(m) => m.encode_to_vec(),)+
                }
            }

            /// Decode a payload for the given catalog variant
            pub fn decode(kind: MessageType, payload: &[u8]) -> Result<Self, Error> {
                let msg = match kind {
                    $(MessageType::$name => Message::$name($name::decode(payload)?),)+
                };
                Ok(msg)
            }
        }

        $(
            impl From<$name> for Message {
                fn from(m: $name) -> Self {
                    Message::$name(m)
                }
            }
        )+
    };
}

message_catalog! {
    Initialize = 0,
    Ping = 1,
    Success = 2,
    Failure = 3,
    Features = 17,
    PinMatrixRequest = 18,
    PinMatrixAck = 19,
    ButtonRequest = 26,
    ButtonAck = 27,
    PassphraseRequest = 41,
    PassphraseAck = 42,
    EthereumGetAddress = 56,
    EthereumAddress = 57,
    EthereumSignTx = 58,
    EthereumTxRequest = 59,
    EthereumTxAck = 60,
}
