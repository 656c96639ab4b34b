use crate::handlers::auth::{decode_claims, validate_jwt, Claims};
use crate::models::all_models::Role;
use actix_session::Session;
use actix_web::cookie::{Cookie, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Session-store key holding the bearer token for upstream calls.
pub const TOKEN_SESSION_KEY: &str = "clinic.token";
/// Duplicate raw-token cookie read by the edge guard, which runs before the
/// session store is available.
pub const EDGE_TOKEN_COOKIE: &str = "clinic_token";

//Authenticated Session
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthSession {
    pub user_id: uuid::Uuid,
    pub account: String,
    pub display_name: String,
    pub role: Role,
    pub token: String,
}

impl AuthSession {
    pub fn from_claims(claims: &Claims, token: String) -> Self {
        AuthSession {
            user_id: claims.id,
            account: claims.account.clone(),
            display_name: claims.display_name.clone(),
            role: claims.role,
            token,
        }
    }
}

/// Rebuilds a session from persisted parts: the serialized claims first,
/// falling back to the stored token. Returns None for anything malformed,
/// expired, or incomplete.
pub fn rebuild_session(
    claims_json: Option<&str>,
    stored_token: Option<&str>,
    secret: &str,
) -> Option<AuthSession> {
    let token = stored_token?;

    if let Some(json) = claims_json {
        if let Ok(claims) = serde_json::from_str::<Claims>(json) {
            if claims.exp > Utc::now().timestamp() as usize {
                return Some(AuthSession::from_claims(&claims, token.to_string()));
            }
        }
    }

    // Serialized claims missing or unusable: derive everything from the token
    match decode_claims(token, secret) {
        Ok(claims) => Some(AuthSession::from_claims(&claims, token.to_string())),
        Err(_) => None,
    }
}

/// Restores the session from the cookie-backed store. Malformed or expired
/// state is purged and reported as no session rather than an error.
pub fn restore(claims_json: Option<String>, session: &Session) -> Option<AuthSession> {
    let stored_token = session.get::<String>(TOKEN_SESSION_KEY).unwrap_or(None);

    if claims_json.is_none() && stored_token.is_none() {
        return None;
    }

    let secret = match std::env::var("JWT_SECRET") {
        Ok(s) => s,
        Err(_) => {
            session.purge();
            return None;
        }
    };

    match rebuild_session(claims_json.as_deref(), stored_token.as_deref(), &secret) {
        Some(auth) => Some(auth),
        None => {
            session.purge();
            None
        }
    }
}

/// Validates the raw token cookie the edge guard reads.
pub fn edge_token_is_valid(token: &str) -> bool {
    validate_jwt(token).is_ok()
}

/// The raw-token cookie written alongside the session store on login.
pub fn edge_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(EDGE_TOKEN_COOKIE, token.to_owned())
        .path("/")
        .secure(true)
        .http_only(true)
        .same_site(SameSite::None)
        .finish()
}

/// Removal counterpart of [`edge_cookie`], issued on logout.
pub fn clear_edge_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(EDGE_TOKEN_COOKIE, "")
        .path("/")
        .secure(true)
        .http_only(true)
        .same_site(SameSite::None)
        .finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    const SECRET: &str = "session-test-secret";

    fn claims(role: Role, ttl: Duration) -> Claims {
        Claims {
            id: Uuid::new_v4(),
            account: "mwhite".to_string(),
            display_name: "M. White".to_string(),
            role,
            exp: (Utc::now() + ttl).timestamp() as usize,
        }
    }

    fn token_for(claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn rebuilds_from_serialized_claims() {
        let claims = claims(Role::Staff, Duration::hours(1));
        let token = token_for(&claims);
        let json = serde_json::to_string(&claims).unwrap();

        let session = rebuild_session(Some(&json), Some(&token), SECRET).unwrap();
        assert_eq!(session.role, Role::Staff);
        assert_eq!(session.token, token);
    }

    #[test]
    fn falls_back_to_token_when_claims_are_malformed() {
        let claims = claims(Role::Patient, Duration::hours(1));
        let token = token_for(&claims);

        let session = rebuild_session(Some("{not json"), Some(&token), SECRET).unwrap();
        assert_eq!(session.role, Role::Patient);
        assert_eq!(session.account, "mwhite");
    }

    #[test]
    fn expired_claims_fall_back_to_token_validation() {
        let stale = claims(Role::Doctor, Duration::hours(-2));
        let fresh = claims(Role::Doctor, Duration::hours(2));
        let json = serde_json::to_string(&stale).unwrap();
        let token = token_for(&fresh);

        let session = rebuild_session(Some(&json), Some(&token), SECRET).unwrap();
        assert_eq!(session.role, Role::Doctor);
    }

    #[test]
    fn missing_token_yields_no_session() {
        let claims = claims(Role::Admin, Duration::hours(1));
        let json = serde_json::to_string(&claims).unwrap();
        assert!(rebuild_session(Some(&json), None, SECRET).is_none());
    }

    #[test]
    fn undecodable_token_yields_no_session() {
        assert!(rebuild_session(None, Some("garbage"), SECRET).is_none());
        assert!(rebuild_session(Some("{not json"), Some("garbage"), SECRET).is_none());
    }

    #[test]
    fn expired_token_yields_no_session() {
        let stale = claims(Role::Nurse, Duration::hours(-1));
        let token = token_for(&stale);
        assert!(rebuild_session(None, Some(&token), SECRET).is_none());
    }

    #[test]
    fn restored_role_is_always_from_the_enumeration() {
        // A token carrying an unknown role string must not produce a session
        let json = format!(
            "{{\"id\":\"{}\",\"account\":\"x\",\"display_name\":\"X\",\"role\":\"superuser\",\"exp\":{}}}",
            Uuid::new_v4(),
            (Utc::now() + Duration::hours(1)).timestamp()
        );
        let claims = claims(Role::Staff, Duration::hours(1));
        let token = token_for(&claims);

        // Malformed claims JSON falls back to the (valid) token
        let session = rebuild_session(Some(&json), Some(&token), SECRET).unwrap();
        assert_eq!(session.role, Role::Staff);
    }

    #[test]
    fn edge_cookie_round_trip() {
        let cookie = edge_cookie("tok");
        assert_eq!(cookie.name(), EDGE_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.path(), Some("/"));

        let removal = clear_edge_cookie();
        assert_eq!(removal.name(), EDGE_TOKEN_COOKIE);
        assert!(removal.value().is_empty());
    }
}
