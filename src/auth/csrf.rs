use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the anti-forgery token on mutating requests
pub const CSRF_HEADER: &str = "csrf-token";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsrfError {
    #[error("CSRF token missing")]
    Missing,
    #[error("CSRF token malformed")]
    Malformed,
    #[error("CSRF token signature mismatch")]
    BadSignature,
    #[error("CSRF token expired")]
    Expired,
}

/// Stateless CSRF tokens of the form `<issued_at>.<nonce>.<signature>`.
///
/// The signature is an HMAC-SHA256 over `<issued_at>.<nonce>` keyed with the
/// configured secret, so any instance sharing the secret can verify a token.
#[derive(Clone)]
pub struct CsrfProtection {
    secret: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for CsrfProtection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfProtection")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl CsrfProtection {
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token stamped with the current time.
    pub fn issue(&self) -> String {
        self.issue_at(Utc::now().timestamp())
    }

    pub fn issue_at(&self, issued_at: i64) -> String {
        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);
        let payload = format!("{}.{}", issued_at, hex::encode(nonce));
        let signature = URL_SAFE_NO_PAD.encode(self.sign(&payload));
        format!("{}.{}", payload, signature)
    }

    pub fn verify(&self, token: &str) -> Result<(), CsrfError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<(), CsrfError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CsrfError::Missing);
        }

        let (payload, signature) = token.rsplit_once('.').ok_or(CsrfError::Malformed)?;
        let (issued_at, nonce) = payload.split_once('.').ok_or(CsrfError::Malformed)?;
        let issued_at: i64 = issued_at.parse().map_err(|_| CsrfError::Malformed)?;
        if nonce.is_empty() {
            return Err(CsrfError::Malformed);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| CsrfError::Malformed)?;
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| CsrfError::BadSignature)?;

        let age = now.saturating_sub(issued_at);
        if age < 0 || age as u64 > self.ttl.as_secs() {
            return Err(CsrfError::Expired);
        }

        Ok(())
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length.
        HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size")
    }

    fn sign(&self, payload: &str) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}
