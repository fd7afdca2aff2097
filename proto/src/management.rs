// Copyright (c) 2025-2026 The Trezoreum Developers

//! Device management messages: session initialization and the capability
//! probing ping.

/// Request: reset the device workflow state and ask for device details
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Initialize {}

/// Request: ping the device, optionally forcing protection prompts.
///
/// Setting the protection flags makes the device demand its PIN /
/// passphrase before answering, which is how the unlock state is probed.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ping {
    /// Message to echo back in the [Success][crate::common::Success] reply
    #[prost(string, optional, tag = "1")]
    pub message: Option<String>,
    /// Require a hardware button press before answering
    #[prost(bool, optional, tag = "2")]
    pub button_protection: Option<bool>,
    /// Require the PIN before answering
    #[prost(bool, optional, tag = "3")]
    pub pin_protection: Option<bool>,
    /// Require the passphrase before answering
    #[prost(bool, optional, tag = "4")]
    pub passphrase_protection: Option<bool>,
}

/// Response: device metadata reported on [Initialize]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Features {
    /// Manufacturer, e.g. "trezor.io"
    #[prost(string, optional, tag = "1")]
    pub vendor: Option<String>,
    /// Major firmware version
    #[prost(uint32, optional, tag = "2")]
    pub major_version: Option<u32>,
    /// Minor firmware version
    #[prost(uint32, optional, tag = "3")]
    pub minor_version: Option<u32>,
    /// Patch firmware version
    #[prost(uint32, optional, tag = "4")]
    pub patch_version: Option<u32>,
    /// Device is running its bootloader
    #[prost(bool, optional, tag = "5")]
    pub bootloader_mode: Option<bool>,
    /// Unique device identifier
    #[prost(string, optional, tag = "6")]
    pub device_id: Option<String>,
    /// Device is protected by a PIN
    #[prost(bool, optional, tag = "7")]
    pub pin_protection: Option<bool>,
    /// Seed is encrypted with a passphrase
    #[prost(bool, optional, tag = "8")]
    pub passphrase_protection: Option<bool>,
    /// Device language
    #[prost(string, optional, tag = "9")]
    pub language: Option<String>,
    /// User-assigned label
    #[prost(string, optional, tag = "10")]
    pub label: Option<String>,
    /// Device contains a seed
    #[prost(bool, optional, tag = "12")]
    pub initialized: Option<bool>,
    /// Device model
    #[prost(string, optional, tag = "21")]
    pub model: Option<String>,
}

impl Features {
    /// Firmware version as a dotted string for display
    pub fn version(&self) -> String {
        format!(
            "{}.{}.{}",
            self.major_version.unwrap_or_default(),
            self.minor_version.unwrap_or_default(),
            self.patch_version.unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_version_string() {
        let features = Features {
            major_version: Some(1),
            minor_version: Some(7),
            patch_version: Some(3),
            ..Default::default()
        };
        assert_eq!(features.version(), "1.7.3");
    }
}
