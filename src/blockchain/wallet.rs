//! Key management and transaction signing.
//!
//! # Security
//! - Seed phrases and private keys are never logged or serialized
//! - Only the derived address appears in log events

use alloy::primitives::B256;
use alloy::signers::local::coins_bip39::English;
use alloy::signers::local::{MnemonicBuilder, PrivateKeySigner};
use alloy::signers::SignerSync;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::blockchain::types::{Signature, SignedEnvelope, SignedTx, StdTx, TypedPubKey, UnsignedMessage};
use crate::config::KeyConfig;
use crate::error::{OracleError, OracleResult};

/// Produces signed envelopes from unsigned messages.
pub trait Signer: Send + Sync {
    /// Bech32 address of the signing account.
    fn address(&self) -> &str;

    /// Sign `message` and wrap it in an envelope for `mode` broadcast.
    fn sign(&self, message: &UnsignedMessage, mode: &str) -> OracleResult<SignedTx>;
}

/// secp256k1 wallet derived from a BIP-39 seed phrase.
#[derive(Clone)]
pub struct MnemonicWallet {
    signer: PrivateKeySigner,
    /// 33-byte compressed public key.
    public_key: Vec<u8>,
    address: String,
    pubkey_type: String,
}

impl MnemonicWallet {
    /// Derive a wallet from a seed phrase on the configured HD path.
    pub fn from_mnemonic(phrase: &str, keys: &KeyConfig) -> OracleResult<Self> {
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .derivation_path(keys.derivation_path.as_str())
            .map_err(|e| OracleError::Signing(format!("Invalid derivation path: {}", e)))?
            .build()
            .map_err(|e| OracleError::Signing(format!("Key derivation failed: {}", e)))?;

        Self::from_signer(signer, keys)
    }

    /// Create a wallet from a hex-encoded private key (with or without 0x).
    pub fn from_private_key(private_key_hex: &str, keys: &KeyConfig) -> OracleResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| OracleError::Signing(format!("Invalid private key format: {}", e)))?;

        Self::from_signer(signer, keys)
    }

    fn from_signer(signer: PrivateKeySigner, keys: &KeyConfig) -> OracleResult<Self> {
        let public_key = signer
            .credential()
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec();
        let address = account_address(&public_key, &keys.address_prefix)?;

        tracing::info!(address = %address, "Wallet initialized");

        Ok(Self {
            signer,
            public_key,
            address,
            pubkey_type: keys.pubkey_type.clone(),
        })
    }

    /// Compressed public key bytes.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }
}

impl Signer for MnemonicWallet {
    fn address(&self) -> &str {
        &self.address
    }

    fn sign(&self, message: &UnsignedMessage, mode: &str) -> OracleResult<SignedTx> {
        let digest = Sha256::digest(message.sign_bytes()?);
        let sig = self
            .signer
            .sign_hash_sync(&B256::from_slice(&digest))
            .map_err(|e| OracleError::Signing(format!("Signing failed: {}", e)))?;

        let mut compact = Vec::with_capacity(64);
        compact.extend_from_slice(&sig.r().to_be_bytes::<32>());
        compact.extend_from_slice(&sig.s().to_be_bytes::<32>());

        Ok(SignedEnvelope {
            tx: StdTx {
                msg: message.msgs.clone(),
                fee: message.fee.clone(),
                signatures: vec![Signature {
                    signature: STANDARD.encode(compact),
                    pub_key: TypedPubKey {
                        key_type: self.pubkey_type.clone(),
                        value: STANDARD.encode(&self.public_key),
                    },
                    account_number: message.account_number.clone(),
                    sequence: message.sequence.clone(),
                }],
                memo: message.memo.clone(),
            },
            mode: mode.to_string(),
        })
    }
}

impl std::fmt::Debug for MnemonicWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MnemonicWallet")
            .field("address", &self.address)
            .finish()
    }
}

/// Bech32 address of a compressed public key: `ripemd160(sha256(key))`.
pub fn account_address(public_key: &[u8], prefix: &str) -> OracleResult<String> {
    let hash = Ripemd160::digest(Sha256::digest(public_key));
    let hrp = bech32::Hrp::parse(prefix)
        .map_err(|e| OracleError::Signing(format!("Invalid address prefix '{}': {}", prefix, e)))?;
    bech32::encode::<bech32::Bech32>(hrp, &hash)
        .map_err(|e| OracleError::Signing(format!("Address encoding failed: {}", e)))
}
