//! Signature computation for signed webhook sends.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::SignError;

type HmacSha256 = Hmac<Sha256>;

/// Computes the `sign` field for a signed webhook send.
///
/// The HMAC-SHA256 is keyed by `"{timestamp}\n{secret}"` and computed over
/// an empty message; the digest is base64 (standard alphabet) encoded.
/// This matches what the bot endpoint verifies against, so keep the key
/// and message in this order.
///
/// # Errors
///
/// Returns [`SignError`] if the HMAC primitive rejects the key.
///
/// # Example
///
/// ```
/// use feishu_webhook::webhook::sign;
///
/// let signature = sign("abc", "1599360473").unwrap();
/// assert_eq!(signature, "cgtpJzI2j6bUDggbdGYjskCK3FPgKpTkwosfWsMzKqM=");
/// ```
pub fn sign(secret: &str, timestamp: &str) -> Result<String, SignError> {
    let string_to_sign = format!("{timestamp}\n{secret}");
    let mac = HmacSha256::new_from_slice(string_to_sign.as_bytes())
        .map_err(|e| SignError::new(e.to_string()))?;

    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}
