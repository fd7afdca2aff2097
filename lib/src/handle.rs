// Copyright (c) 2025-2026 The Trezoreum Developers

//! Handle for a connected Trezor device
//!
//! This drives the wire protocol for one device: the request / reply
//! exchange engine (with transparent button confirmation handling), the
//! unlock state machine, address derivation and the chunked transaction
//! signing workflow.

use std::sync::Arc;

use ethereum_types::Address;
use log::debug;
use tokio::sync::watch;

use trezoreum_proto::{
    common::{ButtonAck, PinMatrixAck},
    ethereum::{EthereumGetAddress, EthereumSignTx, EthereumTxAck},
    management::{Features, Initialize, Ping},
    wire, Message, MessageType,
};

use crate::{
    eth::{trimmed_be, Signature, SignedTransaction, Signer, Transaction},
    path::DerivationPath,
    transport::{CancelSignal, Canceller, Transport},
    Error,
};

/// Largest call data chunk the device accepts inline in the initiation
/// message; anything beyond is streamed on request
const MAX_INLINE_DATA: usize = 1024;

/// Unlock progression states for a connected device
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum TrezorState {
    /// Unlocked and ready to derive addresses or sign
    Ready,
    /// Expecting a PIN to unlock
    WaitingForPin,
    /// Expecting a passphrase to unlock
    WaitingForPassphrase,
    /// Error / indeterminate state
    Unexpected,
}

/// Unpack an exchange result into the expected message variant.
///
/// `exchange` only returns replies from the expected set, so the
/// fallthrough arm maps to a desynchronization error rather than a panic.
macro_rules! expect_reply {
    ($reply:expr, $variant:ident) => {
        match $reply {
            Message::$variant(m) => m,
            other => {
                return Err(Error::UnexpectedReply {
                    expected: vec![MessageType::$variant.to_string()],
                    actual: other.message_type().to_string(),
                })
            }
        }
    };
}

/// Handle driving the wire protocol for one connected Trezor.
///
/// The handle owns its transport session exclusively for the lifetime of
/// the connection and performs strictly sequential exchanges: one request
/// in flight at a time, each blocking the caller until the full reply
/// frame arrives. Concurrent use requires waiting on the current call;
/// sessions are never shared.
pub struct Trezoreum<T: Transport> {
    transport: T,
    session: String,
    cancel_tx: Arc<watch::Sender<bool>>,
    cancel_rx: CancelSignal,
}

impl<T: Transport> Trezoreum<T> {
    /// Wrap a transport channel.
    ///
    /// No device communication happens until [init](Self::init).
    pub fn new(transport: T) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        Self {
            transport,
            session: String::new(),
            cancel_tx: Arc::new(cancel_tx),
            cancel_rx,
        }
    }

    /// Trigger for abandoning an in-flight exchange.
    ///
    /// Handle operations hold an exclusive borrow while they run, so the
    /// trigger must be obtained before starting the exchange it is meant
    /// to abort; the engine itself enforces no deadline. Typical use is a
    /// stalled button confirmation wait the user gives up on.
    pub fn canceller(&self) -> Canceller {
        Canceller::new(self.cancel_tx.clone())
    }

    /// Perform one logical request, transparently absorbing button
    /// confirmation prompts.
    ///
    /// Returns the first reply whose type matches one of `expected`. A
    /// `Failure` reply is terminal and never retried; every `ButtonRequest`
    /// is acknowledged and the exchange repeated, without bound, until
    /// physical user action (or the cancel signal) resolves it. Any other
    /// reply type is a protocol error naming the full expected set.
    ///
    /// This is the sole point of transport I/O in the library.
    async fn exchange(
        &mut self,
        request: Message,
        expected: &[MessageType],
    ) -> Result<Message, Error> {
        debug!("-> {}", request.message_type());
        let mut frame = wire::encode(&request);

        loop {
            let reply = self
                .transport
                .call(&frame, &self.session, &self.cancel_rx)
                .await
                .map_err(Error::Transport)?;

            let (kind, payload) = wire::split_frame(&reply)?;
            debug!("<- {kind}");

            if kind == MessageType::Failure {
                let mut message = String::new();
                if let Message::Failure(failure) = Message::decode(kind, payload)? {
                    message = failure.message.unwrap_or_default();
                }
                return Err(Error::DeviceRejected { message });
            }

            if kind == MessageType::ButtonRequest {
                // Device is waiting for physical confirmation: ack and
                // repeat the exchange with the same expectations
                frame = wire::encode(&ButtonAck::default().into());
                continue;
            }

            if expected.contains(&kind) {
                return Ok(Message::decode(kind, payload)?);
            }

            return Err(Error::UnexpectedReply {
                expected: expected.iter().map(|k| k.to_string()).collect(),
                actual: kind.to_string(),
            });
        }
    }

    /// Connect to the first enumerated device and probe its unlock state.
    ///
    /// Acquires an exclusive session, resets the device workflow and pings
    /// it with PIN and passphrase protection requested; the reply selects
    /// the returned state. Operates on a single device: when several are
    /// connected the first enumerated one is used (documented limitation).
    pub async fn init(&mut self) -> Result<(Features, TrezorState), Error> {
        let devices = self
            .transport
            .enumerate()
            .await
            .map_err(Error::Transport)?;
        let device = devices.first().cloned().ok_or(Error::NoDeviceFound)?;

        debug!("acquiring device at {}", device.path);
        self.session = self
            .transport
            .acquire(&device.path, device.session.as_deref())
            .await
            .map_err(Error::Transport)?;

        let features = expect_reply!(
            self.exchange(Initialize::default().into(), &[MessageType::Features])
                .await?,
            Features
        );
        debug!(
            "connected to {} {} (firmware {})",
            features.vendor.clone().unwrap_or_default(),
            features.model.clone().unwrap_or_default(),
            features.version()
        );

        // Manual ping forcing the device to demand its PIN and passphrase;
        // the reply type tells us which unlock step comes next
        let ping = Ping {
            pin_protection: Some(true),
            passphrase_protection: Some(true),
            ..Default::default()
        };
        let state = match self
            .exchange(
                ping.into(),
                &[
                    MessageType::PinMatrixRequest,
                    MessageType::PassphraseRequest,
                    MessageType::Success,
                ],
            )
            .await?
        {
            Message::PinMatrixRequest(_) => TrezorState::WaitingForPin,
            Message::PassphraseRequest(_) => TrezorState::WaitingForPassphrase,
            _ => TrezorState::Ready,
        };

        Ok((features, state))
    }

    /// Submit the matrix-encoded PIN.
    ///
    /// Errors propagate untouched; a wrong PIN surfaces as
    /// [Error::DeviceRejected] with the device's message.
    pub async fn unlock_by_pin(&mut self, pin: &str) -> Result<TrezorState, Error> {
        let ack = PinMatrixAck {
            pin: pin.to_string(),
        };
        let state = match self
            .exchange(
                ack.into(),
                &[MessageType::Success, MessageType::PassphraseRequest],
            )
            .await?
        {
            Message::PassphraseRequest(_) => TrezorState::WaitingForPassphrase,
            _ => TrezorState::Ready,
        };
        Ok(state)
    }

    /// Passphrase unlock is not implemented by this library
    pub async fn unlock_by_passphrase(&mut self, _passphrase: &str) -> Result<TrezorState, Error> {
        Err(Error::NotSupported("passphrase unlock"))
    }

    /// Resolve a derivation path to an Ethereum address on the device.
    ///
    /// Every call re-queries the device; nothing is cached.
    pub async fn derive(&mut self, path: &DerivationPath) -> Result<Address, Error> {
        debug!("deriving address for {path}");

        let request = EthereumGetAddress {
            address_n: path.components().to_vec(),
            ..Default::default()
        };
        let reply = expect_reply!(
            self.exchange(request.into(), &[MessageType::EthereumAddress])
                .await?,
            EthereumAddress
        );

        if reply.address.len() != Address::len_bytes() {
            return Err(Error::InvalidAddress(reply.address.len()));
        }
        debug!("device address: 0x{}", hex::encode(&reply.address));

        Ok(Address::from_slice(&reply.address))
    }

    /// Stream a transaction to the device for signing.
    ///
    /// The initiation message carries at most the first 1024 bytes of call
    /// data; the device requests the remainder chunk by chunk. The reply
    /// signature is validated, de-normalized for EIP-155 when a chain id
    /// is supplied, injected into the transaction and checked by
    /// recovering the sender. Returns the sender address and the signed
    /// transaction; there is no partial success.
    pub async fn sign(
        &mut self,
        path: &DerivationPath,
        tx: &Transaction,
        chain_id: Option<u64>,
    ) -> Result<(Address, SignedTransaction), Error> {
        debug!(
            "signing {} byte transaction for {path} (chain id {chain_id:?})",
            tx.data.len()
        );

        let mut request = EthereumSignTx {
            address_n: path.components().to_vec(),
            nonce: Some(trimmed_be(tx.nonce)),
            gas_price: Some(trimmed_be(tx.gas_price)),
            gas_limit: Some(trimmed_be(tx.gas_limit)),
            // Recipient only when this is not a contract creation
            to: tx.to.map(|to| to.as_bytes().to_vec()),
            value: Some(trimmed_be(tx.value)),
            data_length: Some(tx.data.len() as u32),
            ..Default::default()
        };

        let mut pending: &[u8] = &tx.data;
        if pending.len() > MAX_INLINE_DATA {
            request.data_initial_chunk = Some(pending[..MAX_INLINE_DATA].to_vec());
            pending = &pending[MAX_INLINE_DATA..];
        } else {
            request.data_initial_chunk = Some(pending.to_vec());
            pending = &[];
        }
        if let Some(id) = chain_id {
            // The device field is 32 bit; larger chain ids are truncated
            // (known firmware limitation, kept as-is)
            request.chain_id = Some(id as u32);
        }

        let mut reply = expect_reply!(
            self.exchange(request.into(), &[MessageType::EthereumTxRequest])
                .await?,
            EthereumTxRequest
        );

        // Stream until the device stops asking for data: the loop ends
        // once the requested length no longer fits the remaining bytes,
        // which coincides with the signature reply
        while let Some(length) = reply.data_length {
            let length = length as usize;
            if length > pending.len() {
                break;
            }
            let (chunk, rest) = pending.split_at(length);
            pending = rest;

            debug!("streaming {length} byte chunk, {} left", pending.len());
            let ack = EthereumTxAck {
                data_chunk: Some(chunk.to_vec()),
            };
            reply = expect_reply!(
                self.exchange(ack.into(), &[MessageType::EthereumTxRequest])
                    .await?,
                EthereumTxRequest
            );
        }

        // The final reply must carry a complete signature
        let r = reply.signature_r.unwrap_or_default();
        let s = reply.signature_s.unwrap_or_default();
        let v_raw = reply.signature_v.unwrap_or_default();
        if r.is_empty() || s.is_empty() || v_raw == 0 {
            return Err(Error::MissingSignature);
        }
        if r.len() != 32 || s.len() != 32 {
            return Err(Error::SignatureInvalid);
        }

        let signer = match chain_id {
            None => Signer::Legacy,
            Some(id) => Signer::Eip155(id),
        };
        // With a chain id the device folds `chain_id * 2 + 35` into the
        // recovery byte (EIP-155); undo that before injection, with the
        // same wrapping byte arithmetic the encoding uses
        let v = match chain_id {
            None => v_raw as u8,
            Some(id) => (v_raw as u8).wrapping_sub(id.wrapping_mul(2).wrapping_add(35) as u8),
        };

        let mut signature = Signature {
            r: [0; 32],
            s: [0; 32],
            v,
        };
        signature.r.copy_from_slice(&r);
        signature.s.copy_from_slice(&s);

        let (sender, signed) = tx.with_signature(signer, &signature)?;
        debug!("signed transaction {:?} from {sender:?}", signed.hash());

        Ok((sender, signed))
    }
}
