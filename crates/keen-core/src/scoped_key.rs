// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scoped-key cipher: deriving restricted credentials offline.
//!
//! A scoped key is a permission/filter descriptor (JSON) encrypted with the
//! caller's API key using AES-256-CBC and serialized as
//! `hex(iv) || hex(ciphertext)`. Two historical key-derivation schemes exist
//! and both must stay decryptable:
//!
//! - **Current**: the API key is a 64-character hex string, decoded into the
//!   32-byte AES key.
//! - **Legacy**: the raw API key bytes are padded to a multiple of 32 with
//!   pad-length-valued bytes; the first 32 bytes become the AES key.
//!
//! Scheme selection is by key length (64 characters selects the current
//! scheme). Previously-issued tokens depend on this heuristic, so it is not
//! negotiable. There is no MAC: a failed decrypt is the only integrity check.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::Value;

use crate::error::{KeenError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;

/// AES block length in bytes.
const BLOCK_LEN: usize = 16;

/// Legacy scheme pads keys to a multiple of this many bytes.
const LEGACY_KEY_BLOCK: usize = 32;

/// Key length (in characters) that selects the current scheme.
const CURRENT_KEY_LEN: usize = 64;

/// The key-derivation scheme used for a given API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScheme {
	/// 64-character hex API keys, decoded to raw bytes.
	Current,
	/// Any other key length, byte-padded before use.
	Legacy,
}

impl KeyScheme {
	/// Selects the scheme for an API key. Pure function of key length.
	pub fn for_key(api_key: &str) -> Self {
		if api_key.len() == CURRENT_KEY_LEN {
			KeyScheme::Current
		} else {
			KeyScheme::Legacy
		}
	}

	/// Derives the 32-byte AES key from the API key string.
	fn aes_key(&self, api_key: &str) -> Result<[u8; 32]> {
		match self {
			KeyScheme::Current => {
				let decoded = hex::decode(api_key).map_err(|_| {
					KeenError::cipher("a 64-character API key must be hex to derive a scoped key")
				})?;
				decoded
					.try_into()
					.map_err(|_| KeenError::cipher("API key does not decode to 32 bytes"))
			}
			KeyScheme::Legacy => {
				let bytes = api_key.as_bytes();
				if bytes.is_empty() {
					return Err(KeenError::cipher("API key must not be empty"));
				}
				let mut padded = bytes.to_vec();
				let remainder = padded.len() % LEGACY_KEY_BLOCK;
				if remainder != 0 {
					let pad = LEGACY_KEY_BLOCK - remainder;
					padded.extend(std::iter::repeat(pad as u8).take(pad));
				}
				let mut key = [0u8; 32];
				key.copy_from_slice(&padded[..32]);
				Ok(key)
			}
		}
	}
}

/// A restricted credential: an API key paired with the permission descriptor
/// it encrypts.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedKey {
	pub api_key: String,
	pub data: Value,
}

impl ScopedKey {
	pub fn new(api_key: impl Into<String>, data: Value) -> Self {
		Self {
			api_key: api_key.into(),
			data,
		}
	}

	/// Encrypts the descriptor with a fresh random IV, producing the hex
	/// token.
	pub fn encrypt(&self) -> Result<String> {
		let mut iv = [0u8; IV_LEN];
		OsRng.fill_bytes(&mut iv);
		self.encrypt_with(&iv)
	}

	/// Encrypts with an explicit IV. Only useful where deterministic output
	/// is required (test vectors); the IV must be exactly 16 bytes.
	pub fn encrypt_with_iv(&self, iv: &[u8]) -> Result<String> {
		let iv: [u8; IV_LEN] = iv
			.try_into()
			.map_err(|_| KeenError::invalid_argument("iv must be 16 bytes"))?;
		self.encrypt_with(&iv)
	}

	fn encrypt_with(&self, iv: &[u8; IV_LEN]) -> Result<String> {
		let key = KeyScheme::for_key(&self.api_key).aes_key(&self.api_key)?;
		let plaintext = serde_json::to_string(&self.data)?;
		let cipher = Aes256CbcEnc::new_from_slices(&key, iv)
			.map_err(|_| KeenError::cipher("cipher initialization failed"))?;
		let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
		Ok(format!("{}{}", hex::encode(iv), hex::encode(ciphertext)))
	}

	/// Decrypts a hex token back into a scoped key.
	///
	/// Fails with a `Cipher` error when the token is malformed or the key is
	/// wrong. Wrong-key garbage that still unpads is caught by the JSON
	/// parse; garbage that also parses as JSON is the accepted risk of the
	/// MAC-less format.
	pub fn decrypt(api_key: &str, token: &str) -> Result<Self> {
		let raw = hex::decode(token)
			.map_err(|_| KeenError::cipher("scoped key token is not valid hex"))?;
		if raw.len() < IV_LEN + BLOCK_LEN || (raw.len() - IV_LEN) % BLOCK_LEN != 0 {
			return Err(KeenError::cipher("scoped key token is truncated"));
		}
		let (iv, ciphertext) = raw.split_at(IV_LEN);

		let key = KeyScheme::for_key(api_key).aes_key(api_key)?;
		let cipher = Aes256CbcDec::new_from_slices(&key, iv)
			.map_err(|_| KeenError::cipher("cipher initialization failed"))?;
		let plaintext = cipher
			.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
			.map_err(|_| KeenError::cipher("decryption failed: wrong key or corrupt token"))?;
		let data = serde_json::from_slice(&plaintext)
			.map_err(|_| KeenError::cipher("decrypted payload is not valid JSON"))?;

		Ok(Self::new(api_key, data))
	}
}
