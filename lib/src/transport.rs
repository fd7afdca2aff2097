// Copyright (c) 2025-2026 The Trezoreum Developers

//! Transport channel abstraction for hiding underlying bus types
//!
//! Implementations own the physical link (USB HID, trezord bridge,
//! emulator socket); the protocol engine only performs strictly
//! sequential call round trips through an acquired session.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

/// Cancellation signal threaded through every transport call.
///
/// The engine propagates the signal without enforcing a deadline of its
/// own; a transport honouring it aborts the in-flight round trip once the
/// value flips to `true`.
pub type CancelSignal = watch::Receiver<bool>;

/// Cloneable trigger for a handle's cancellation signal.
///
/// Every handle operation borrows the handle exclusively for the duration
/// of the call, so the trigger must be taken out before the call starts;
/// firing it aborts the in-flight round trip in any transport that
/// honours the signal.
#[derive(Clone)]
pub struct Canceller {
    tx: Arc<watch::Sender<bool>>,
}

impl Canceller {
    pub(crate) fn new(tx: Arc<watch::Sender<bool>>) -> Self {
        Self { tx }
    }

    /// Flip the cancellation signal for the in-flight call
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Descriptor for one enumerated device
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Bus path used to acquire the device
    pub path: String,
    /// Session left over from a previous acquisition, if any
    pub session: Option<String>,
}

/// Byte-oriented channel to a physical device.
///
/// A session is bound to one device acquisition and becomes invalid once
/// the device is released or re-enumerated. `call` blocks until a full
/// reply frame is available or the transport fails.
#[async_trait]
pub trait Transport: Send {
    /// List connected devices
    async fn enumerate(&mut self) -> anyhow::Result<Vec<DeviceDescriptor>>;

    /// Take exclusive ownership of a device, superseding `prior_session`
    async fn acquire(&mut self, path: &str, prior_session: Option<&str>)
        -> anyhow::Result<String>;

    /// Send one frame and block until the full reply frame arrives
    async fn call(
        &mut self,
        frame: &[u8],
        session: &str,
        cancel: &CancelSignal,
    ) -> anyhow::Result<Vec<u8>>;
}

/// Platform capabilities resolved once at transport construction.
///
/// Transports take this as an opaque configuration object so the protocol
/// engine itself stays platform-agnostic.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UsbCapabilities {
    /// Sync cancellation is available through the patched libusb
    pub allow_cancel: bool,
    /// Kernel driver must be detached before claiming the interface
    pub detach_kernel_driver: bool,
    /// HID devices are reached through libusb rather than hidapi
    pub only_libusb: bool,
}

impl UsbCapabilities {
    /// Resolve capabilities for the compile target
    pub fn detect() -> Self {
        Self {
            allow_cancel: cfg!(not(target_os = "freebsd")),
            detach_kernel_driver: cfg!(target_os = "linux"),
            only_libusb: cfg!(any(target_os = "freebsd", target_os = "linux")),
        }
    }
}
