// Copyright (c) 2025-2026 The Trezoreum Developers

//! Messages shared by every device workflow: success / failure replies,
//! physical confirmation prompts and PIN / passphrase negotiation.

/// Response: success of the previous request
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Success {
    /// Human readable description of the action
    #[prost(string, optional, tag = "1")]
    pub message: Option<String>,
}

/// Response: failure of the previous request
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Failure {
    /// Computer readable definition of the error state
    #[prost(uint32, optional, tag = "1")]
    pub code: Option<u32>,
    /// Human readable message
    #[prost(string, optional, tag = "2")]
    pub message: Option<String>,
}

/// Response: the device is waiting for a hardware button press
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ButtonRequest {
    /// Computer readable definition of the requested action
    #[prost(uint32, optional, tag = "1")]
    pub code: Option<u32>,
    /// Additional context
    #[prost(string, optional, tag = "2")]
    pub data: Option<String>,
}

/// Request: host acknowledges a [ButtonRequest], continuing the workflow
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ButtonAck {}

/// Response: the device is waiting for a PIN entered via the matrix scheme
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PinMatrixRequest {
    /// Matrix style requested by the device
    #[prost(uint32, optional, tag = "1")]
    pub kind: Option<u32>,
}

/// Request: host sends the matrix-encoded PIN
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PinMatrixAck {
    /// PIN encoded by matrix position
    #[prost(string, required, tag = "1")]
    pub pin: String,
}

/// Response: the device is waiting for a passphrase
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PassphraseRequest {}

/// Request: host sends the passphrase
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PassphraseAck {
    /// Seed passphrase, sent in clear
    #[prost(string, required, tag = "1")]
    pub passphrase: String,
}
