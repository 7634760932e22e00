use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Whole-file AES-256-CBC codec with a static key/IV pair from config
///
/// Every collection file is sealed with the same key and IV. This only
/// keeps casual eyes off the JSON on disk; it is not a security-grade
/// design.
#[derive(Clone)]
pub struct FileCipher {
    key: [u8; 32],
    iv: [u8; 16],
}

impl FileCipher {
    /// Builds a cipher from hex-encoded key material
    ///
    /// # Arguments
    /// * `key_hex` - 64 hex chars (32 bytes)
    /// * `iv_hex` - 32 hex chars (16 bytes)
    pub fn from_hex(key_hex: &str, iv_hex: &str) -> Result<Self, String> {
        let key_bytes = hex::decode(key_hex).map_err(|e| format!("Bad AES key hex: {}", e))?;
        let iv_bytes = hex::decode(iv_hex).map_err(|e| format!("Bad AES IV hex: {}", e))?;

        let key: [u8; 32] = key_bytes
            .try_into()
            .map_err(|_| "AES key must be 32 bytes".to_string())?;
        let iv: [u8; 16] = iv_bytes
            .try_into()
            .map_err(|_| "AES IV must be 16 bytes".to_string())?;

        Ok(Self { key, iv })
    }

    /// Encrypts a serialized collection body
    pub fn seal(&self, plain: &[u8]) -> Vec<u8> {
        Aes256CbcEnc::new(&self.key.into(), &self.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plain)
    }

    /// Decrypts a collection file body
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, String> {
        Aes256CbcDec::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(sealed)
            .map_err(|e| format!("Failed to decrypt data file: {}", e))
    }
}

impl std::fmt::Debug for FileCipher {
    // Key material stays out of logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
    const IV: &str = "0f0e0d0c0b0a09080706050403020100";

    #[test]
    fn seal_open_roundtrip() {
        let cipher = FileCipher::from_hex(KEY, IV).unwrap();
        let plain = br#"[{"id":"abc","balance":"1.50"}]"#;

        let sealed = cipher.seal(plain);
        assert_ne!(sealed.as_slice(), plain.as_slice());

        let opened = cipher.open(&sealed).unwrap();
        assert_eq!(opened.as_slice(), plain.as_slice());
    }

    #[test]
    fn static_key_iv_is_deterministic() {
        let cipher = FileCipher::from_hex(KEY, IV).unwrap();

        // Same key/IV for every record file means identical ciphertext
        // for identical plaintext.
        assert_eq!(cipher.seal(b"hello"), cipher.seal(b"hello"));
    }

    #[test]
    fn open_garbage_fails() {
        let cipher = FileCipher::from_hex(KEY, IV).unwrap();
        assert!(cipher.open(b"not a ciphertext").is_err());
    }

    #[test]
    fn from_hex_rejects_wrong_lengths() {
        assert!(FileCipher::from_hex("abcd", IV).is_err());
        assert!(FileCipher::from_hex(KEY, "abcd").is_err());
        assert!(FileCipher::from_hex("zz", "zz").is_err());
    }
}
