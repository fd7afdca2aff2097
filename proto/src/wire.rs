// Copyright (c) 2025-2026 The Trezoreum Developers

//! Wire framing: 2-byte big-endian type tag, 4-byte big-endian payload
//! length, then exactly that many payload bytes.

use byteorder::{BigEndian, ByteOrder};

use crate::{Error, Message, MessageType};

/// Fixed frame header length in bytes
pub const HEADER_LEN: usize = 6;

/// Encode a message into a complete wire frame
pub fn encode(msg: &Message) -> Vec<u8> {
    let payload = msg.encode_payload();

    let mut frame = vec![0u8; HEADER_LEN];
    BigEndian::write_u16(&mut frame[0..2], msg.message_type() as u16);
    BigEndian::write_u32(&mut frame[2..6], payload.len() as u32);
    frame.extend_from_slice(&payload);

    frame
}

/// Read the type tag and payload length from a frame header
pub fn decode_header(frame: &[u8]) -> Result<(u16, u32), Error> {
    if frame.len() < HEADER_LEN {
        return Err(Error::MalformedFrame);
    }

    Ok((
        BigEndian::read_u16(&frame[0..2]),
        BigEndian::read_u32(&frame[2..6]),
    ))
}

/// Split a frame into its catalog variant and payload bytes.
///
/// The declared length must match the payload exactly and the tag must
/// name a registered catalog variant.
pub fn split_frame(frame: &[u8]) -> Result<(MessageType, &[u8]), Error> {
    let (tag, length) = decode_header(frame)?;

    let payload = &frame[HEADER_LEN..];
    if payload.len() != length as usize {
        return Err(Error::MalformedFrame);
    }

    let kind = MessageType::try_from(tag).map_err(|_| Error::UnknownMessageType(tag))?;
    Ok((kind, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ButtonAck, Failure, PinMatrixAck, Success};
    use crate::ethereum::{EthereumGetAddress, EthereumSignTx, EthereumTxRequest};
    use crate::management::{Features, Initialize, Ping};

    fn sample_messages() -> Vec<Message> {
        vec![
            Initialize::default().into(),
            Ping {
                pin_protection: Some(true),
                passphrase_protection: Some(true),
                ..Default::default()
            }
            .into(),
            Success {
                message: Some("unlocked".to_string()),
            }
            .into(),
            Failure {
                code: Some(4),
                message: Some("PIN invalid".to_string()),
            }
            .into(),
            ButtonAck::default().into(),
            PinMatrixAck {
                pin: "713504".to_string(),
            }
            .into(),
            Features {
                vendor: Some("trezor.io".to_string()),
                major_version: Some(1),
                ..Default::default()
            }
            .into(),
            EthereumGetAddress {
                address_n: vec![0x8000_002c, 0x8000_003c, 0x8000_0000, 0, 2],
                ..Default::default()
            }
            .into(),
            EthereumSignTx {
                address_n: vec![0x8000_002c],
                nonce: Some(vec![9]),
                data_length: Some(0),
                ..Default::default()
            }
            .into(),
            EthereumTxRequest {
                data_length: Some(1024),
                ..Default::default()
            }
            .into(),
        ]
    }

    #[test]
    fn frame_round_trip() {
        for msg in sample_messages() {
            let frame = encode(&msg);

            let (tag, length) = decode_header(&frame).unwrap();
            assert_eq!(tag, msg.message_type() as u16);
            assert_eq!(length as usize, msg.encode_payload().len());
            assert_eq!(frame.len(), HEADER_LEN + length as usize);

            let (kind, payload) = split_frame(&frame).unwrap();
            assert_eq!(kind, msg.message_type());
            assert_eq!(Message::decode(kind, payload).unwrap(), msg);
        }
    }

    #[test]
    fn short_header_is_malformed() {
        let frame = encode(&Message::from(ButtonAck::default()));
        for n in 0..HEADER_LEN {
            assert_eq!(decode_header(&frame[..n]), Err(Error::MalformedFrame));
            assert!(matches!(
                split_frame(&frame[..n]),
                Err(Error::MalformedFrame)
            ));
        }
    }

    #[test]
    fn length_mismatch_is_malformed() {
        let mut frame = encode(&Message::from(Success {
            message: Some("ok".to_string()),
        }));
        frame.push(0);
        assert_eq!(split_frame(&frame), Err(Error::MalformedFrame));
    }

    #[test]
    fn unregistered_tag_is_rejected() {
        let mut frame = encode(&Message::from(ButtonAck::default()));
        // Tag 5 (WipeDevice) is outside the catalog
        frame[0] = 0;
        frame[1] = 5;
        assert_eq!(split_frame(&frame), Err(Error::UnknownMessageType(5)));
    }
}
