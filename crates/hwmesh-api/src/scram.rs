// Login proof computation
//
// The router authenticates with a SCRAM-SHA256 variant: the client never
// sends the password, only a proof derived from the salted password and
// both nonces. Note the HMAC argument order differs from RFC 5802 --
// the router keys "Client Key" and the auth message, not the secrets.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::Error;

type HmacSha256 = Hmac<Sha256>;

const DIGEST_LEN: usize = 32;
const NONCE_LEN: usize = 32;

/// Generate a fresh client nonce: 64 lowercase hex characters.
pub fn client_nonce() -> String {
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    hex::encode(nonce)
}

/// Compute the hex-encoded client proof for `user_login_proof`.
///
/// `salt` is the hex string returned by `user_login_nonce`.
pub fn client_proof(
    password: &str,
    salt: &str,
    iterations: u32,
    first_nonce: &str,
    server_nonce: &str,
) -> Result<String, Error> {
    let salt = hex::decode(salt).map_err(|e| Error::Authentication {
        message: format!("router returned a malformed salt {salt:?}: {e}"),
    })?;
    let auth_message = format!("{first_nonce},{server_nonce},{server_nonce}");

    let salted = pbkdf2_sha256(password.as_bytes(), &salt, iterations)?;
    let client_key = hmac_sha256(b"Client Key", &salted)?;
    let stored_key = Sha256::digest(client_key);
    let signature = hmac_sha256(auth_message.as_bytes(), &stored_key)?;

    let proof: Vec<u8> = client_key
        .iter()
        .zip(signature.iter())
        .map(|(k, s)| k ^ s)
        .collect();
    Ok(hex::encode(proof))
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<[u8; DIGEST_LEN], Error> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| Error::Authentication {
        message: format!("HMAC key rejected: {e}"),
    })?;
    mac.update(message);
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// PBKDF2-HMAC-SHA256 producing exactly one 32-byte block.
fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> Result<[u8; DIGEST_LEN], Error> {
    let mut block = salt.to_vec();
    block.extend_from_slice(&1u32.to_be_bytes());

    let mut u = hmac_sha256(password, &block)?;
    let mut out = u;
    for _ in 1..iterations {
        u = hmac_sha256(password, &u)?;
        for (o, b) in out.iter_mut().zip(u.iter()) {
            *o ^= b;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn pbkdf2_matches_rfc7914_vector() {
        // RFC 7914 §11: P="passwd", S="salt", c=1 -- first 32 bytes.
        let dk = pbkdf2_sha256(b"passwd", b"salt", 1).unwrap();
        assert_eq!(
            hex::encode(dk),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn client_nonce_is_64_hex_chars() {
        let nonce = client_nonce();
        assert_eq!(nonce.len(), 64);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(nonce.chars().all(|c| !c.is_ascii_uppercase()));
        assert_ne!(nonce, client_nonce());
    }

    #[test]
    fn proof_is_deterministic_and_password_sensitive() {
        let a = client_proof("secret", "a1b2c3d4", 100, "aaaa", "bbbb").unwrap();
        let b = client_proof("secret", "a1b2c3d4", 100, "aaaa", "bbbb").unwrap();
        let c = client_proof("other", "a1b2c3d4", 100, "aaaa", "bbbb").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn malformed_salt_fails_authentication() {
        let err = client_proof("secret", "not-hex", 100, "aaaa", "bbbb").unwrap_err();
        assert!(matches!(err, Error::Authentication { .. }));
        let err = client_proof("secret", "abc", 100, "aaaa", "bbbb").unwrap_err();
        assert!(matches!(err, Error::Authentication { .. }));
    }
}
