// Copyright (c) 2025-2026 The Trezoreum Developers

//! Shared scripted-transport harness for protocol scenario tests

// Not every test target uses every helper
#![allow(unused)]

use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::LevelFilter;
use simplelog::SimpleLogger;

use trezoreum::proto::{wire, Message, MessageType};
use trezoreum::transport::{CancelSignal, DeviceDescriptor, Transport};
use trezoreum::Trezoreum;

/// Setup test logging (level via LOG_LEVEL)
pub fn init_logging() {
    let log_level = match std::env::var("LOG_LEVEL").map(|v| LevelFilter::from_str(&v)) {
        Ok(Ok(l)) => l,
        _ => LevelFilter::Debug,
    };
    let _ = SimpleLogger::init(log_level, simplelog::Config::default());
}

/// Scripted transport: hands out canned reply frames in order and records
/// every request for inspection.
pub struct MockTransport {
    devices: Vec<DeviceDescriptor>,
    replies: VecDeque<Vec<u8>>,
    stall_when_exhausted: bool,
    sent: Arc<Mutex<Vec<Message>>>,
}

impl MockTransport {
    pub fn new(replies: impl IntoIterator<Item = Message>) -> Self {
        Self {
            devices: vec![DeviceDescriptor {
                path: "mock:0".to_string(),
                session: None,
            }],
            replies: replies.into_iter().map(|m| wire::encode(&m)).collect(),
            stall_when_exhausted: false,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script an empty bus
    pub fn without_devices(mut self) -> Self {
        self.devices.clear();
        self
    }

    /// Once the reply script runs out, block like a device awaiting user
    /// action until the cancel signal fires
    pub fn stall_when_exhausted(mut self) -> Self {
        self.stall_when_exhausted = true;
        self
    }

    /// Log of every decoded request, shared with the handle under test
    pub fn sent_log(&self) -> Arc<Mutex<Vec<Message>>> {
        self.sent.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn enumerate(&mut self) -> anyhow::Result<Vec<DeviceDescriptor>> {
        Ok(self.devices.clone())
    }

    async fn acquire(
        &mut self,
        _path: &str,
        _prior_session: Option<&str>,
    ) -> anyhow::Result<String> {
        Ok("1".to_string())
    }

    async fn call(
        &mut self,
        frame: &[u8],
        _session: &str,
        cancel: &CancelSignal,
    ) -> anyhow::Result<Vec<u8>> {
        let (kind, payload) = wire::split_frame(frame)?;
        self.sent.lock().unwrap().push(Message::decode(kind, payload)?);

        if let Some(reply) = self.replies.pop_front() {
            return Ok(reply);
        }
        if self.stall_when_exhausted {
            let mut cancel = cancel.clone();
            while !*cancel.borrow() {
                cancel
                    .changed()
                    .await
                    .map_err(|_| anyhow::anyhow!("cancel signal dropped"))?;
            }
            return Err(anyhow::anyhow!("call cancelled"));
        }
        Err(anyhow::anyhow!("reply script exhausted"))
    }
}

/// Build a handle over a scripted transport, keeping the request log
pub fn scripted(
    replies: impl IntoIterator<Item = Message>,
) -> (Trezoreum<MockTransport>, Arc<Mutex<Vec<Message>>>) {
    init_logging();
    let transport = MockTransport::new(replies);
    let sent = transport.sent_log();
    (Trezoreum::new(transport), sent)
}

/// Count recorded requests of one catalog variant
pub fn count_sent(log: &Arc<Mutex<Vec<Message>>>, kind: MessageType) -> usize {
    log.lock()
        .unwrap()
        .iter()
        .filter(|m| m.message_type() == kind)
        .count()
}
