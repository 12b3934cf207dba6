//! Field cipher capability consumed by the encryption lifecycle.
//!
//! The crate never implements a cipher itself; callers inject one. Both
//! directions must map `None` to `Ok(None)`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CipherResult<T> = Result<T, CipherError>;

/// Coarse cause of a cipher failure, used for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherErrorKind {
    /// Input is not valid ciphertext (or not encodable plaintext).
    MalformedInput,
    /// Key material could not be loaded.
    KeyUnavailable,
    /// Any other failure reported by the cipher backend.
    Backend,
}

impl CipherErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed_input",
            Self::KeyUnavailable => "key_unavailable",
            Self::Backend => "backend",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherError {
    kind: CipherErrorKind,
    message: String,
}

impl CipherError {
    pub fn new(kind: CipherErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(CipherErrorKind::MalformedInput, message)
    }

    pub fn key_unavailable(message: impl Into<String>) -> Self {
        Self::new(CipherErrorKind::KeyUnavailable, message)
    }

    pub fn kind(&self) -> CipherErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for CipherError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "cipher error ({}): {}", self.kind.as_str(), self.message)
    }
}

impl Error for CipherError {}

/// Per-field string cipher.
///
/// # Contract
/// - `encrypt(None)` and `decrypt(None)` return `Ok(None)`.
/// - `decrypt(encrypt(Some(s)))` returns `Some(s)` for the same key.
pub trait FieldCipher {
    fn encrypt(&self, plaintext: Option<&str>) -> CipherResult<Option<String>>;
    fn decrypt(&self, ciphertext: Option<&str>) -> CipherResult<Option<String>>;
}

impl<T: FieldCipher + ?Sized> FieldCipher for &T {
    fn encrypt(&self, plaintext: Option<&str>) -> CipherResult<Option<String>> {
        (**self).encrypt(plaintext)
    }

    fn decrypt(&self, ciphertext: Option<&str>) -> CipherResult<Option<String>> {
        (**self).decrypt(ciphertext)
    }
}
