// Copyright (c) 2025-2026 The Trezoreum Developers

//! Ethereum coin messages: address derivation and the chunked
//! sign-transaction exchange.
//!
//! Field numbers follow the pre-1.8.0 firmware schema where the recipient
//! and derived address travel as raw bytes rather than hex strings.

/// Request: derive the Ethereum address for a BIP-32 path
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumGetAddress {
    /// BIP-32 path components from the master node
    #[prost(uint32, repeated, tag = "1")]
    pub address_n: Vec<u32>,
    /// Show the address on the device display before replying
    #[prost(bool, optional, tag = "2")]
    pub show_display: Option<bool>,
}

/// Response: address derived from the device seed
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumAddress {
    /// Raw 20-byte Ethereum address
    #[prost(bytes = "vec", required, tag = "1")]
    pub address: Vec<u8>,
}

/// Request: initiate transaction signing.
///
/// Scalar fields are trimmed big-endian byte strings. At most the first
/// 1024 bytes of call data ride in `data_initial_chunk`; the device
/// requests the remainder through [EthereumTxRequest].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumSignTx {
    /// BIP-32 path components from the master node
    #[prost(uint32, repeated, tag = "1")]
    pub address_n: Vec<u32>,
    /// Transaction nonce, <= 256 bit unsigned big-endian
    #[prost(bytes = "vec", optional, tag = "2")]
    pub nonce: Option<Vec<u8>>,
    /// Gas price in wei, <= 256 bit unsigned big-endian
    #[prost(bytes = "vec", optional, tag = "3")]
    pub gas_price: Option<Vec<u8>>,
    /// Gas limit, <= 256 bit unsigned big-endian
    #[prost(bytes = "vec", optional, tag = "4")]
    pub gas_limit: Option<Vec<u8>>,
    /// Raw recipient address, absent for contract creation
    #[prost(bytes = "vec", optional, tag = "5")]
    pub to: Option<Vec<u8>>,
    /// Value in wei, <= 256 bit unsigned big-endian
    #[prost(bytes = "vec", optional, tag = "6")]
    pub value: Option<Vec<u8>>,
    /// First chunk of the call data (<= 1024 bytes)
    #[prost(bytes = "vec", optional, tag = "7")]
    pub data_initial_chunk: Option<Vec<u8>>,
    /// Total call data length
    #[prost(uint32, optional, tag = "8")]
    pub data_length: Option<u32>,
    /// EIP-155 chain id; the device only supports 32 bits
    #[prost(uint32, optional, tag = "9")]
    pub chain_id: Option<u32>,
}

/// Response: the device requests more call data, or returns the signature.
///
/// While `data_length` is set the device awaits that many more bytes via
/// [EthereumTxAck]; otherwise all three signature fields are present.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumTxRequest {
    /// Number of call data bytes being requested (<= 1024)
    #[prost(uint32, optional, tag = "1")]
    pub data_length: Option<u32>,
    /// Signature recovery byte, chain-id folded in when one was supplied
    #[prost(uint32, optional, tag = "2")]
    pub signature_v: Option<u32>,
    /// Signature r component (32 bytes)
    #[prost(bytes = "vec", optional, tag = "3")]
    pub signature_r: Option<Vec<u8>>,
    /// Signature s component (32 bytes)
    #[prost(bytes = "vec", optional, tag = "4")]
    pub signature_s: Option<Vec<u8>>,
}

/// Request: next chunk of call data, answering an [EthereumTxRequest]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EthereumTxAck {
    /// Exactly the number of bytes the device asked for
    #[prost(bytes = "vec", optional, tag = "1")]
    pub data_chunk: Option<Vec<u8>>,
}
