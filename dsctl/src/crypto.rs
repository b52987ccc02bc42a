use base64::{Engine as _, engine::general_purpose};

/// Prefix identifying keys issued by this service.
pub const API_KEY_PREFIX: &str = "sk_live_";

/// Generates a cryptographically secure API key with 256 bits of entropy.
///
/// The key is formatted as `sk_live_{base64url_encoded_random_bytes}` where the random bytes are
/// 32 bytes drawn from the thread-local CSPRNG. The key is never derived from account data.
///
/// # Examples
///
/// ```ignore
/// let api_key = generate_api_key();
/// assert!(api_key.starts_with("sk_live_"));
/// assert_eq!(api_key.len(), 51); // "sk_live_" + 43 base64url chars
/// ```
pub fn generate_api_key() -> String {
    let key_bytes: [u8; 32] = rand::random();

    format!("{API_KEY_PREFIX}{}", general_purpose::URL_SAFE_NO_PAD.encode(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_api_key_format() {
        let key = generate_api_key();
        assert!(key.starts_with(API_KEY_PREFIX));
        assert_eq!(key.len(), API_KEY_PREFIX.len() + 43);

        let encoded = &key[API_KEY_PREFIX.len()..];
        assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(general_purpose::URL_SAFE_NO_PAD.decode(encoded).unwrap().len(), 32);
    }

    #[test]
    fn test_generate_api_key_uniqueness() {
        let keys: HashSet<String> = (0..1000).map(|_| generate_api_key()).collect();
        assert_eq!(keys.len(), 1000);
    }
}
