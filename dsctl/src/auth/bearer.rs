use crate::errors::Error;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::trace;

/// API key presented in an `Authorization: Bearer <key>` header.
///
/// The scheme is matched case-insensitively (`bearer`, `BEARER`).
///
/// Extraction only parses the header; the key is checked against the account store by
/// [`AccessController`](super::access::AccessController). A missing header, a non-UTF-8 value, a
/// different scheme or an empty token all reject with `401`, exactly like an unknown key.
#[derive(Clone)]
pub struct BearerKey(pub String);

impl std::fmt::Debug for BearerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerKey(<redacted>)")
    }
}

impl<S: Send + Sync> FromRequestParts<S> for BearerKey {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|key| !key.is_empty());

        match key {
            Some(key) => Ok(BearerKey(key.to_string())),
            None => {
                trace!("Request carried no usable bearer token");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}
