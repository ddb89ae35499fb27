//! HMAC-SHA512 request signing.

use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Sign `payload` with the shared `secret`.
///
/// # Returns
/// Lowercase hex HMAC-SHA512 digest (128 chars)
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
