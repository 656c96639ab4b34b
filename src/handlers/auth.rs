use crate::models::all_models::Role;
use dotenvy::dotenv;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use uuid::Uuid;

/// Lifetime of the dashboard session stamped into the identity claims.
pub const SESSION_TTL_HOURS: i64 = 12;

/// Structure representing JWT claims issued by the clinic API
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: Uuid, // User ID
    pub account: String,
    pub display_name: String,
    pub role: Role,
    pub exp: usize, // Expiration timestamp
}

/// Decodes and verifies a token against the given shared secret
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, Box<dyn std::error::Error>> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| -> Box<dyn std::error::Error> {
        // Provide more context about the validation error
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                format!("Token has expired: {}", e).into()
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                format!("Invalid token signature: {}", e).into()
            }
            _ => format!("Token validation failed: {}", e).into(),
        }
    })?;

    Ok(token_data.claims)
}

/// Validates a token from the clinic API and extracts the user information
pub fn validate_jwt(token: &str) -> Result<Claims, Box<dyn std::error::Error>> {
    dotenv().ok();

    let secret_key = env::var("JWT_SECRET").map_err(|e| -> Box<dyn std::error::Error> {
        format!("Failed to retrieve JWT_SECRET: {}", e).into()
    })?;

    decode_claims(token, &secret_key)
}
