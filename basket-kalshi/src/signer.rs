//! RSA-PSS request signing for the Kalshi API
//!
//! Kalshi authenticates each request with three headers derived from the
//! API key id, a millisecond timestamp, and an RSA-PSS (SHA-256,
//! MGF1(SHA-256), salt length = digest length) signature over
//! `timestamp + method + path`. The query string is never part of the
//! signed message.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use basket_core::{BasketError, BasketResult};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::pss::BlindedSigningKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

/// Holds the API key id and the parsed signing key.
///
/// Loaded once at client construction and reused for every request; a key
/// that fails to parse is a fatal configuration error, never retried.
#[derive(Clone)]
pub struct RequestSigner {
    api_key_id: String,
    signing_key: BlindedSigningKey<Sha256>,
}

impl RequestSigner {
    /// Parse a signer from PEM text (PKCS#8 tried first, then PKCS#1).
    ///
    /// Inline keys may carry literal `\n` escapes (the usual shape when the
    /// PEM is stuffed into an environment variable); these are normalized to
    /// real newlines before parsing.
    pub fn from_pem(api_key_id: impl Into<String>, pem: &str) -> BasketResult<Self> {
        let pem = pem.replace("\\n", "\n");
        let private_key = RsaPrivateKey::from_pkcs8_pem(&pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
            .map_err(|e| {
                BasketError::config(format!("Failed to parse PEM private key: {}", e))
            })?;

        Ok(Self {
            api_key_id: api_key_id.into(),
            signing_key: BlindedSigningKey::<Sha256>::new(private_key),
        })
    }

    /// Load a signer from a PEM file on disk.
    pub fn from_pem_file(api_key_id: impl Into<String>, path: &str) -> BasketResult<Self> {
        let pem = std::fs::read_to_string(path).map_err(|e| {
            BasketError::config(format!("Failed to read private key file {}: {}", path, e))
        })?;
        Self::from_pem(api_key_id, &pem)
    }

    pub fn api_key_id(&self) -> &str {
        &self.api_key_id
    }

    /// Produce `(timestamp, signature)` for one request.
    pub fn sign(&self, method: &str, path: &str) -> (String, String) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_millis()
            .to_string();
        let message = signing_message(&timestamp, method, path);

        let mut rng = rand::thread_rng();
        let signature = self.signing_key.sign_with_rng(&mut rng, message.as_bytes());

        (timestamp, BASE64.encode(signature.to_bytes()))
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("api_key_id", &self.api_key_id)
            .finish()
    }
}

/// Message signed per request: timestamp + method + path, query stripped.
fn signing_message(timestamp: &str, method: &str, path: &str) -> String {
    let path_only = path.split('?').next().unwrap_or(path);
    format!("{}{}{}", timestamp, method, path_only)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use rsa::signature::{Keypair, Verifier};

    fn test_key_pem() -> String {
        let key = RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
        key.to_pkcs8_pem(LineEnding::LF).unwrap().to_string()
    }

    #[test]
    fn test_signing_message_strips_query_string() {
        let msg = signing_message("123", "GET", "/trade-api/v2/markets?tickers=A,B");
        assert_eq!(msg, "123GET/trade-api/v2/markets");
    }

    #[test]
    fn test_signing_message_concatenation_order() {
        let msg = signing_message("1700000000000", "POST", "/trade-api/v2/portfolio/orders/batched");
        assert_eq!(msg, "1700000000000POST/trade-api/v2/portfolio/orders/batched");
    }

    #[test]
    fn test_signature_verifies_against_public_key() {
        let pem = test_key_pem();
        let signer = RequestSigner::from_pem("key-id", &pem).unwrap();

        let (timestamp, sig_b64) = signer.sign("POST", "/trade-api/v2/portfolio/orders/batched");
        let message = signing_message(&timestamp, "POST", "/trade-api/v2/portfolio/orders/batched");

        let sig_bytes = BASE64.decode(sig_b64).unwrap();
        let signature = rsa::pss::Signature::try_from(sig_bytes.as_slice()).unwrap();
        let verifying_key = signer.signing_key.verifying_key();
        verifying_key
            .verify(message.as_bytes(), &signature)
            .expect("signature must verify");
    }

    #[test]
    fn test_inline_pem_with_escaped_newlines() {
        let pem = test_key_pem().replace('\n', "\\n");
        assert!(RequestSigner::from_pem("key-id", &pem).is_ok());
    }

    #[test]
    fn test_garbage_key_is_config_error() {
        let err = RequestSigner::from_pem("key-id", "not a pem").unwrap_err();
        assert!(matches!(err, BasketError::Config(_)));
    }
}
