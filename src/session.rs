// src/session.rs - who is looking at the page

use base64::Engine;
use log::warn;

use crate::models::profile::UserId;

/// Proof of authentication. Scopes every read and write to the session
/// owner's own row.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub access_token: String,
}

/// Injected in place of the ambient auth state the page used to read.
/// Returning `None` means nobody is signed in and the page must not render
/// a profile.
pub trait SessionProvider: Send + Sync {
    fn session(&self) -> Option<Session>;
}

/// Derives the session from a stored Supabase access token. The JWT payload
/// is decoded without signature verification - the token is minted and
/// checked by the backend, this side only needs the subject out of it.
pub struct BearerSessionProvider {
    access_token: String,
}

impl BearerSessionProvider {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let access_token = token
            .trim()
            .strip_prefix("Bearer ")
            .unwrap_or(token.trim())
            .to_string();
        Self { access_token }
    }
}

impl SessionProvider for BearerSessionProvider {
    fn session(&self) -> Option<Session> {
        let user_id = user_id_from_token(&self.access_token)?;
        Some(Session {
            user_id,
            access_token: self.access_token.clone(),
        })
    }
}

/// Fixed session, for tests and the demo binary.
pub struct StaticSessionProvider {
    session: Option<Session>,
}

impl StaticSessionProvider {
    pub fn signed_in(user_id: UserId, access_token: impl Into<String>) -> Self {
        Self {
            session: Some(Session {
                user_id,
                access_token: access_token.into(),
            }),
        }
    }

    pub fn signed_out() -> Self {
        Self { session: None }
    }
}

impl SessionProvider for StaticSessionProvider {
    fn session(&self) -> Option<Session> {
        self.session.clone()
    }
}

/// Pulls the `sub` claim out of a JWT without validating the signature.
/// Supabase encodes the payload as base64url without padding; older tokens
/// circulated with standard encoding, so that is tried second.
fn user_id_from_token(token: &str) -> Option<UserId> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        warn!("access token is not a JWT");
        return None;
    }

    let payload = decode_segment(parts[1])?;
    let claims: serde_json::Value = match serde_json::from_slice(&payload) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("token payload is not JSON: {e}");
            return None;
        }
    };

    match claims.get("sub").and_then(|sub| sub.as_str()) {
        Some(sub) if !sub.is_empty() => Some(UserId::new(sub)),
        _ => {
            warn!("token payload has no usable 'sub' claim");
            None
        }
    }
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

    URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| STANDARD.decode(segment))
        .map_err(|e| warn!("token payload failed base64 decode: {e}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.assinatura",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn session_comes_from_the_sub_claim() {
        let token = token_with_payload(r#"{"sub":"user-1","role":"authenticated"}"#);
        let provider = BearerSessionProvider::new(token.clone());
        let session = provider.session().expect("session derived");
        assert_eq!(session.user_id.as_str(), "user-1");
        assert_eq!(session.access_token, token);
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        let token = token_with_payload(r#"{"sub":"user-2"}"#);
        let provider = BearerSessionProvider::new(format!("Bearer {token}"));
        let session = provider.session().expect("session derived");
        assert_eq!(session.access_token, token);
    }

    #[test]
    fn malformed_tokens_yield_no_session() {
        assert!(BearerSessionProvider::new("not-a-jwt").session().is_none());
        let no_sub = token_with_payload(r#"{"role":"authenticated"}"#);
        assert!(BearerSessionProvider::new(no_sub).session().is_none());
    }

    #[test]
    fn static_provider_reports_what_it_was_given() {
        assert!(StaticSessionProvider::signed_out().session().is_none());
        let provider = StaticSessionProvider::signed_in(UserId::new("user-3"), "tok");
        assert_eq!(provider.session().unwrap().user_id.as_str(), "user-3");
    }
}
