//! Google service-account credentials and OAuth2 access tokens
//!
//! Credentials come from the environment in one of two forms:
//!
//! - `FIREBASE_CREDENTIALS`: the service-account JSON file, base64 encoded
//! - `FIREBASE_TYPE`, `FIREBASE_PROJECT_ID`, `FIREBASE_PRIVATE_KEY`, ... : one
//!   variable per field, with literal `\n` sequences in the private key
//!
//! The base64 form wins when both are present. Access tokens are minted with the
//! JWT bearer grant (RFC 7523) and cached until shortly before they expire.

use crate::store::StoreError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use gearup_core::{ConfigLoader, GearupError};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

pub const CREDENTIALS_ENV: &str = "FIREBASE_CREDENTIALS";

/// Scopes required to read a Realtime Database over REST
pub const FIREBASE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/firebase.database",
    "https://www.googleapis.com/auth/userinfo.email",
];

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before their reported expiry
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Service-account key as issued by the Google Cloud console
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub auth_provider_x509_cert_url: String,
    #[serde(default)]
    pub client_x509_cert_url: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Decode the base64-encoded service-account JSON
    pub fn from_base64(encoded: &str) -> Result<Self, GearupError> {
        let decoded = STANDARD.decode(encoded.trim()).map_err(|e| {
            GearupError::config(
                format!("{} is not valid base64: {}", CREDENTIALS_ENV, e),
                CREDENTIALS_ENV,
            )
        })?;

        serde_json::from_slice(&decoded).map_err(|e| {
            GearupError::config(
                format!("{} does not contain a service-account key: {}", CREDENTIALS_ENV, e),
                CREDENTIALS_ENV,
            )
        })
    }

    /// Load credentials through an arbitrary variable lookup
    ///
    /// `lookup` returns the value of a variable, or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GearupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(encoded) = lookup(CREDENTIALS_ENV).filter(|v| !v.trim().is_empty()) {
            return Self::from_base64(&encoded);
        }

        let required = |key: &str| {
            lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                GearupError::config(
                    format!(
                        "Firebase credentials not set: provide {} or {}",
                        CREDENTIALS_ENV, key
                    ),
                    key,
                )
            })
        };
        let optional = |key: &str| lookup(key).unwrap_or_default();

        Ok(Self {
            key_type: required("FIREBASE_TYPE")?,
            project_id: optional("FIREBASE_PROJECT_ID"),
            private_key_id: optional("FIREBASE_PRIVATE_KEY_ID"),
            private_key: required("FIREBASE_PRIVATE_KEY")?.replace("\\n", "\n"),
            client_email: required("FIREBASE_CLIENT_EMAIL")?,
            client_id: optional("FIREBASE_CLIENT_ID"),
            auth_uri: optional("FIREBASE_AUTH_URI"),
            token_uri: lookup("FIREBASE_TOKEN_URI")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(default_token_uri),
            auth_provider_x509_cert_url: optional("FIREBASE_AUTH_PROVIDER_X509_CERT_URL"),
            client_x509_cert_url: optional("FIREBASE_CLIENT_X509_CERT_URL"),
        })
    }
}

impl ConfigLoader for ServiceAccountKey {
    fn from_env() -> Result<Self, GearupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn validate(&self) -> Result<(), GearupError> {
        if self.key_type != "service_account" {
            return Err(GearupError::config(
                format!(
                    "Unsupported credential type '{}', expected 'service_account'",
                    self.key_type
                ),
                "FIREBASE_TYPE",
            ));
        }

        if !self.client_email.contains('@') {
            return Err(GearupError::config(
                format!("Invalid client_email '{}'", self.client_email),
                "FIREBASE_CLIENT_EMAIL",
            ));
        }

        if !self.private_key.contains("PRIVATE KEY") {
            return Err(GearupError::config(
                "private_key is not a PEM-encoded private key",
                "FIREBASE_PRIVATE_KEY",
            ));
        }

        Url::parse(&self.token_uri).map_err(|e| {
            GearupError::config(
                format!("Invalid token_uri: {}", e),
                "FIREBASE_TOKEN_URI",
            )
        })?;

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Mints and caches OAuth2 access tokens for a service account
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scopes: Vec<String>,
    http_client: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl fmt::Debug for ServiceAccountTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountTokenProvider")
            .field("client_email", &self.key.client_email)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl ServiceAccountTokenProvider {
    /// Create a provider requesting the Realtime Database scopes
    pub fn new(key: ServiceAccountKey, http_client: reqwest::Client) -> Result<Self, GearupError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            GearupError::config(
                format!("Failed to parse service-account private key: {}", e),
                "FIREBASE_PRIVATE_KEY",
            )
        })?;

        Ok(Self {
            key,
            encoding_key,
            scopes: FIREBASE_SCOPES.iter().map(|s| s.to_string()).collect(),
            http_client,
            cached: RwLock::new(None),
        })
    }

    /// Signed JWT assertion exchanged at the token endpoint
    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, StoreError> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: self.scopes.join(" "),
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        if !self.key.private_key_id.is_empty() {
            header.kid = Some(self.key.private_key_id.clone());
        }

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| StoreError::Credentials(format!("Failed to sign assertion: {}", e)))
    }

    /// Current access token, fetching a new one when the cached token is stale
    pub async fn access_token(&self) -> Result<String, StoreError> {
        let now = Utc::now();
        if let Some(token) = self.cached.read().await.as_ref() {
            if token.is_fresh(now) {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token(Utc::now()).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn request_token(&self, now: DateTime<Utc>) -> Result<CachedToken, StoreError> {
        let assertion = self.sign_assertion(now)?;

        let response = self
            .http_client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::Credentials(format!(
                "Token exchange failed with status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Credentials(format!("Invalid token response: {}", e)))?;

        debug!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "Obtained access token"
        );

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + Duration::seconds((token.expires_in - EXPIRY_MARGIN_SECS).max(0)),
        })
    }
}
