//! Pre-shared key authentication.
//!
//! Requests are signed with an HS256 JWT. The HMAC key is derived from the
//! PSK with PBKDF2-HMAC-SHA256 and a random salt that travels in the JWT
//! header, so the service can derive the same key.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use uuid::Uuid;

use resoto_notebook_core::JsObject;

use crate::error::{ClientError, Result};

pub const AUTHORIZATION: &str = "Authorization";

/// PBKDF2 iteration count shared with the service.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Token lifetime in seconds.
pub const DEFAULT_EXPIRE_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

/// Derive the 32-byte signing key for `psk` and `salt`.
pub fn key_from_psk(psk: &str, salt: &[u8]) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(psk.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
    key
}

/// Encode `payload` as a signed JWT.
///
/// An `exp` claim is added when `expire_in > 0` and the payload has none.
pub fn encode_jwt(payload: JsObject, psk: &str, expire_in: i64) -> Result<String> {
    // A v4 UUID is 16 bytes from the OS RNG.
    let salt = Uuid::new_v4().into_bytes();
    encode_jwt_with_salt(payload, psk, expire_in, &salt)
}

fn encode_jwt_with_salt(
    mut payload: JsObject,
    psk: &str,
    expire_in: i64,
    salt: &[u8],
) -> Result<String> {
    if expire_in > 0 && !payload.contains_key("exp") {
        let exp = chrono::Utc::now().timestamp() + expire_in;
        payload.insert("exp".to_string(), json!(exp));
    }

    let header = json!({
        "alg": "HS256",
        "typ": "JWT",
        "salt": STANDARD.encode(salt),
    });
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&Value::Object(payload))?),
    );

    let key = key_from_psk(psk, salt);
    let mut mac =
        HmacSha256::new_from_slice(&key).map_err(|e| ClientError::Auth(e.to_string()))?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature}"))
}

/// The `Authorization: Bearer <jwt>` header for `psk`.
pub fn auth_header(psk: &str) -> Result<(&'static str, String)> {
    let token = encode_jwt(JsObject::new(), psk, DEFAULT_EXPIRE_SECS)?;
    Ok((AUTHORIZATION, format!("Bearer {token}")))
}

/// Headers sent with every request, signed when a PSK is configured.
pub fn request_headers(
    psk: Option<&str>,
    content_type: &str,
) -> Result<Vec<(&'static str, String)>> {
    let mut headers = vec![
        ("Content-Type", content_type.to_string()),
        ("Accept", "application/json".to_string()),
    ];
    if let Some(psk) = psk {
        headers.push(auth_header(psk)?);
    }
    Ok(headers)
}
