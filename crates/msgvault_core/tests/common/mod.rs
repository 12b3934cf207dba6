#![allow(dead_code)]

use msgvault_core::{CipherError, CipherResult, FieldCipher, ScheduledMessage};

pub const ENVELOPE_PREFIX: &str = "enc:";

/// Reversible fake cipher: `enc:` + reversed text.
///
/// Rejects plaintext containing NUL and ciphertext without the prefix.
pub struct ReverseCipher;

impl FieldCipher for ReverseCipher {
    fn encrypt(&self, plaintext: Option<&str>) -> CipherResult<Option<String>> {
        let Some(plaintext) = plaintext else {
            return Ok(None);
        };
        if plaintext.contains('\0') {
            return Err(CipherError::malformed("plaintext contains NUL"));
        }
        Ok(Some(format!(
            "{ENVELOPE_PREFIX}{}",
            plaintext.chars().rev().collect::<String>()
        )))
    }

    fn decrypt(&self, ciphertext: Option<&str>) -> CipherResult<Option<String>> {
        let Some(ciphertext) = ciphertext else {
            return Ok(None);
        };
        ciphertext
            .strip_prefix(ENVELOPE_PREFIX)
            .map(|body| Some(body.chars().rev().collect()))
            .ok_or_else(|| CipherError::malformed("missing envelope prefix"))
    }
}

/// Cipher whose key can never be loaded.
pub struct LockedCipher;

impl FieldCipher for LockedCipher {
    fn encrypt(&self, plaintext: Option<&str>) -> CipherResult<Option<String>> {
        match plaintext {
            Some(_) => Err(CipherError::key_unavailable("keystore locked")),
            None => Ok(None),
        }
    }

    fn decrypt(&self, ciphertext: Option<&str>) -> CipherResult<Option<String>> {
        match ciphertext {
            Some(_) => Err(CipherError::key_unavailable("keystore locked")),
            None => Ok(None),
        }
    }
}

pub fn sample_message(title: &str, timestamp: i64) -> ScheduledMessage {
    ScheduledMessage::new(title, "5550100", "see you at noon", "text/plain", timestamp)
}
