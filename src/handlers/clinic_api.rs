use crate::models::all_models::{Consultation, Department, PatientRecord, Remission, StockItem, Worker};
use actix_web::{http::StatusCode, HttpResponse};
use log::{debug, error, warn};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

//Remote API Error
/// Failure talking to the clinic API: the transport failed, the API answered
/// non-2xx, or a 2xx body did not parse.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("clinic API unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("clinic API returned {status}")]
    Api { status: u16, message: Option<String> },
    #[error("unexpected response from clinic API: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ApiError {
    /// One-shot user-facing response: the server-supplied message when there
    /// is one, the caller's fallback otherwise. Transport and parse failures
    /// map to 502.
    pub fn to_response(&self, fallback: &str) -> HttpResponse {
        match self {
            ApiError::Transport(e) => {
                error!("Clinic API transport failure: {}", e);
                HttpResponse::BadGateway().body(fallback.to_string())
            }
            ApiError::Api { status, message } => {
                let status =
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
                let body = message.clone().unwrap_or_else(|| fallback.to_string());
                HttpResponse::build(status).body(body)
            }
            ApiError::Malformed(e) => {
                error!("Clinic API response did not parse: {}", e);
                HttpResponse::BadGateway().body(fallback.to_string())
            }
        }
    }
}

//Login Token Response
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

//Register Request
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub account: String,
    pub secret: String,
    pub display_name: String,
}

//Registered Response
#[derive(Debug, Deserialize, Serialize)]
pub struct RegisteredResponse {
    pub user_id: Uuid,
    pub account: String,
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    account: &'a str,
    secret: &'a str,
}

/// Extracts the server-supplied message from an error body, if any.
fn server_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return Some(message.to_string());
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Clinic API client
#[derive(Clone)]
pub struct ClinicApi {
    client: Client,
    base_url: String,
}

impl ClinicApi {
    pub fn new(base_url: String) -> Result<Self, Box<dyn std::error::Error>> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(ClinicApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    // Create a ClinicApi client from the environment
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let base_url =
            std::env::var("CLINIC_API_URL").map_err(|_| "CLINIC_API_URL not set")?;
        Self::new(base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Clinic API {} answered {}: {}", path, status, body);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
            error!("Failed to parse clinic API response from {}: {}", path, e);
            e
        })?;
        Ok(parsed)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Clinic API {} answered {}: {}", path, status, body);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
            error!("Failed to parse clinic API response from {}: {}", path, e);
            e
        })?;
        Ok(parsed)
    }

    //  AUTHENTICATION

    pub async fn login(&self, account: &str, secret: &str) -> Result<TokenResponse, ApiError> {
        self.post_json("/auth/login", &CredentialsBody { account, secret }, None)
            .await
    }

    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegisteredResponse, ApiError> {
        self.post_json("/auth/register", request, None).await
    }

    /// Best-effort remote session invalidation; callers treat failure as
    /// non-fatal.
    pub async fn invalidate(&self, token: &str) -> Result<(), ApiError> {
        let url = format!("{}/auth/logout", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }
        Ok(())
    }

    //  DOMAIN COLLECTIONS

    pub async fn departments(&self, token: &str) -> Result<Vec<Department>, ApiError> {
        self.get_json("/departments", token).await
    }

    pub async fn department_stock(
        &self,
        department_id: Uuid,
        token: &str,
    ) -> Result<Vec<StockItem>, ApiError> {
        self.get_json(&format!("/departments/{}/stock", department_id), token)
            .await
    }

    pub async fn workers(&self, token: &str) -> Result<Vec<Worker>, ApiError> {
        self.get_json("/workers", token).await
    }

    pub async fn patients(&self, token: &str) -> Result<Vec<PatientRecord>, ApiError> {
        self.get_json("/patients", token).await
    }

    pub async fn consultations(&self, token: &str) -> Result<Vec<Consultation>, ApiError> {
        self.get_json("/consultations", token).await
    }

    pub async fn consultations_for_patient(
        &self,
        patient_id: Uuid,
        token: &str,
    ) -> Result<Vec<Consultation>, ApiError> {
        self.get_json(&format!("/patients/{}/consultations", patient_id), token)
            .await
    }

    pub async fn remissions(&self, token: &str) -> Result<Vec<Remission>, ApiError> {
        self.get_json("/remissions", token).await
    }

    pub async fn remissions_for_patient(
        &self,
        patient_id: Uuid,
        token: &str,
    ) -> Result<Vec<Remission>, ApiError> {
        self.get_json(&format!("/patients/{}/remissions", patient_id), token)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_prefers_json_message_field() {
        let body = "{\"message\":\"Invalid credentials\"}";
        assert_eq!(
            server_message(body),
            Some("Invalid credentials".to_string())
        );
    }

    #[test]
    fn server_message_falls_back_to_plain_body() {
        assert_eq!(server_message("  nope  "), Some("nope".to_string()));
    }

    #[test]
    fn empty_error_body_yields_no_message() {
        assert_eq!(server_message(""), None);
        assert_eq!(server_message("   "), None);
    }

    #[test]
    fn api_error_response_uses_server_message() {
        let err = ApiError::Api {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        let response = err.to_response("Login failed");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn api_error_response_falls_back_on_generic_text() {
        let err = ApiError::Api {
            status: 500,
            message: None,
        };
        let response = err.to_response("Failed to load workers");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = ClinicApi::new("http://clinic.example/api/".to_string()).unwrap();
        assert_eq!(api.base_url, "http://clinic.example/api");
    }
}
