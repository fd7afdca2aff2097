// Copyright (c) 2025-2026 The Trezoreum Developers

//! Ethereum transaction assembly: RLP signing hashes, signature injection
//! and sender recovery for legacy and EIP-155 transactions.

use ethereum_types::{Address, H256, U256};
use rlp::RlpStream;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message as SecpMessage, Secp256k1};
use tiny_keccak::{Hasher, Keccak};

use crate::Error;

/// An Ethereum transaction awaiting signature
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Account nonce
    pub nonce: U256,
    /// Gas price in wei
    pub gas_price: U256,
    /// Gas limit
    pub gas_limit: U256,
    /// Recipient, `None` for contract creation
    pub to: Option<Address>,
    /// Value in wei
    pub value: U256,
    /// Call data / contract init code
    pub data: Vec<u8>,
}

/// Signature scheme used to hash and encode a transaction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Signer {
    /// Pre-EIP-155 (homestead) encoding, replayable across chains
    Legacy,
    /// EIP-155 replay-protected encoding for the given chain id
    Eip155(u64),
}

/// A 65-byte recoverable signature as injected into a transaction.
///
/// For EIP-155 transactions `v` holds the bare recovery id with the chain
/// id contribution already removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// r component
    pub r: [u8; 32],
    /// s component
    pub s: [u8; 32],
    /// Recovery byte
    pub v: u8,
}

/// A transaction with its signature attached
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The signed transaction body
    pub tx: Transaction,
    /// Recovery value as encoded on chain
    pub v: u64,
    /// Signature r component
    pub r: U256,
    /// Signature s component
    pub s: U256,
}

impl Transaction {
    /// Append the six unsigned fields shared by every encoding
    fn rlp_base(&self, s: &mut RlpStream) {
        s.append(&self.nonce);
        s.append(&self.gas_price);
        s.append(&self.gas_limit);
        match &self.to {
            Some(to) => s.append(to),
            None => s.append_empty_data(),
        };
        s.append(&self.value);
        s.append(&self.data);
    }

    /// Attach a signature, recovering the sender as a sanity check.
    ///
    /// Fails with [Error::SignatureInvalid] when the signature does not
    /// recover under the given scheme, so a corrupted or incompatible
    /// signature can never silently produce a wrong sender.
    pub fn with_signature(
        &self,
        signer: Signer,
        sig: &Signature,
    ) -> Result<(Address, SignedTransaction), Error> {
        let sender = recover_sender(signer, self, sig)?;

        let signed = SignedTransaction {
            tx: self.clone(),
            v: signer.encoded_v(sig),
            r: U256::from_big_endian(&sig.r),
            s: U256::from_big_endian(&sig.s),
        };

        Ok((sender, signed))
    }
}

impl Signer {
    /// Hash signed by the device under this scheme
    pub fn hash(&self, tx: &Transaction) -> H256 {
        let mut s = RlpStream::new();
        match self {
            Signer::Legacy => {
                s.begin_list(6);
                tx.rlp_base(&mut s);
            }
            Signer::Eip155(chain_id) => {
                s.begin_list(9);
                tx.rlp_base(&mut s);
                s.append(chain_id);
                s.append(&0u8);
                s.append(&0u8);
            }
        }
        keccak256(&s.out())
    }

    /// Recovery value as encoded in the final transaction
    fn encoded_v(&self, sig: &Signature) -> u64 {
        match self {
            Signer::Legacy => sig.v as u64,
            Signer::Eip155(chain_id) => sig.v as u64 + chain_id * 2 + 35,
        }
    }

    /// Bare secp256k1 recovery id for the injected recovery byte
    fn recovery_id(&self, sig: &Signature) -> Result<i32, Error> {
        match (self, sig.v) {
            (Signer::Legacy, 27 | 28) => Ok(sig.v as i32 - 27),
            (_, 0 | 1) => Ok(sig.v as i32),
            _ => Err(Error::SignatureInvalid),
        }
    }
}

impl SignedTransaction {
    /// RLP encoding as submitted to the network
    pub fn rlp(&self) -> Vec<u8> {
        let mut s = RlpStream::new();
        s.begin_list(9);
        self.tx.rlp_base(&mut s);
        s.append(&self.v);
        s.append(&self.r);
        s.append(&self.s);
        s.out().to_vec()
    }

    /// Transaction hash
    pub fn hash(&self) -> H256 {
        keccak256(&self.rlp())
    }
}

/// Recover the sender address of `tx` from a device signature
fn recover_sender(signer: Signer, tx: &Transaction, sig: &Signature) -> Result<Address, Error> {
    let recovery_id =
        RecoveryId::from_i32(signer.recovery_id(sig)?).map_err(|_| Error::SignatureInvalid)?;

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&sig.r);
    compact[32..].copy_from_slice(&sig.s);
    let signature = RecoverableSignature::from_compact(&compact, recovery_id)
        .map_err(|_| Error::SignatureInvalid)?;

    let digest = SecpMessage::from_digest(signer.hash(tx).0);
    let public_key = Secp256k1::new()
        .recover_ecdsa(&digest, &signature)
        .map_err(|_| Error::SignatureInvalid)?;

    Ok(address_of(&public_key))
}

/// Ethereum address of a secp256k1 public key
pub fn address_of(public_key: &secp256k1::PublicKey) -> Address {
    let raw = public_key.serialize_uncompressed();
    let hash = keccak256(&raw[1..]);
    Address::from_slice(&hash.0[12..])
}

/// Keccak-256 digest
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak::v256();
    hasher.update(data);

    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    H256(out)
}

/// Big-endian bytes with leading zeroes stripped, the form the device
/// expects for scalar transaction fields. Zero encodes as empty.
pub(crate) fn trimmed_be(value: U256) -> Vec<u8> {
    let mut buff = [0u8; 32];
    value.to_big_endian(&mut buff);

    let len = (value.bits() + 7) / 8;
    buff[32 - len..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::SecretKey;

    /// Worked example from the EIP-155 specification
    fn eip155_example() -> Transaction {
        Transaction {
            nonce: 9u64.into(),
            gas_price: 20_000_000_000u64.into(),
            gas_limit: 21_000u64.into(),
            to: Some(Address::from_slice(&[0x35; 20])),
            value: 1_000_000_000_000_000_000u64.into(),
            data: vec![],
        }
    }

    #[test]
    fn eip155_signing_hash_matches_specification() {
        let hash = Signer::Eip155(1).hash(&eip155_example());
        assert_eq!(
            hex::encode(hash.0),
            "daf5a779ae972f972197303d7b574746c7ef83eabadc08d84f44e7b51aed0bfc"
        );
    }

    #[test]
    fn eip155_signed_encoding_matches_specification() {
        let tx = eip155_example();
        let signer = Signer::Eip155(1);

        // Sign with the specification's private key (0x46 repeated)
        let secp = Secp256k1::new();
        let key = SecretKey::from_slice(&[0x46; 32]).unwrap();
        let recoverable =
            secp.sign_ecdsa_recoverable(&SecpMessage::from_digest(signer.hash(&tx).0), &key);
        let (recovery_id, compact) = recoverable.serialize_compact();

        let mut sig = Signature {
            r: [0; 32],
            s: [0; 32],
            v: recovery_id.to_i32() as u8,
        };
        sig.r.copy_from_slice(&compact[..32]);
        sig.s.copy_from_slice(&compact[32..]);

        let (sender, signed) = tx.with_signature(signer, &sig).unwrap();
        assert_eq!(
            sender,
            Address::from_slice(&hex::decode("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f").unwrap())
        );
        assert_eq!(signed.v, 37);
        assert_eq!(
            hex::encode(signed.rlp()),
            "f86c098504a817c800825208943535353535353535353535353535353535353535880de0\
             b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e15906\
             20aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        );
    }

    #[test]
    fn legacy_recovery_accepts_offset_and_bare_v() {
        let tx = eip155_example();
        let signer = Signer::Legacy;

        let secp = Secp256k1::new();
        let key = SecretKey::from_slice(&[0x46; 32]).unwrap();
        let recoverable =
            secp.sign_ecdsa_recoverable(&SecpMessage::from_digest(signer.hash(&tx).0), &key);
        let (recovery_id, compact) = recoverable.serialize_compact();

        let mut sig = Signature {
            r: [0; 32],
            s: [0; 32],
            v: 27 + recovery_id.to_i32() as u8,
        };
        sig.r.copy_from_slice(&compact[..32]);
        sig.s.copy_from_slice(&compact[32..]);

        let (sender, signed) = tx.with_signature(signer, &sig).unwrap();
        assert_eq!(signed.v as u8, sig.v);

        // The bare 0 / 1 form recovers the same sender
        sig.v -= 27;
        let (bare_sender, _) = tx.with_signature(signer, &sig).unwrap();
        assert_eq!(sender, bare_sender);
    }

    #[test]
    fn corrupted_signature_fails_recovery() {
        let tx = eip155_example();
        let sig = Signature {
            r: [0xff; 32],
            s: [0xff; 32],
            v: 0,
        };
        assert!(matches!(
            tx.with_signature(Signer::Eip155(1), &sig),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn out_of_range_recovery_byte_is_invalid() {
        let tx = eip155_example();
        let sig = Signature {
            r: [1; 32],
            s: [1; 32],
            v: 4,
        };
        assert!(matches!(
            tx.with_signature(Signer::Eip155(1), &sig),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn scalar_fields_trim_to_minimal_big_endian() {
        assert_eq!(trimmed_be(U256::zero()), Vec::<u8>::new());
        assert_eq!(trimmed_be(9u64.into()), vec![9]);
        assert_eq!(trimmed_be(0x0100u64.into()), vec![1, 0]);
        assert_eq!(trimmed_be(U256::MAX), vec![0xff; 32]);
    }

    #[test]
    fn contract_creation_encodes_empty_recipient() {
        let mut tx = eip155_example();
        tx.to = None;
        // Unsigned hash differs from the recipient form but stays stable
        assert_ne!(Signer::Legacy.hash(&tx), Signer::Legacy.hash(&eip155_example()));
    }
}
