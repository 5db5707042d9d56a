//! Authentication service for admin API tokens.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;
use crate::utils::token::generate_token;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns 64 lowercase hex characters. The `admin` CLI uses the same function
/// so tokens it creates authenticate against the server.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Authenticates admin requests via Bearer tokens.
///
/// A database leak alone does not allow verifying or forging tokens without
/// the server-side secret.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Checks a raw token and records its use.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        if !self.repository.validate_token(&token_hash).await? {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        }

        if let Err(e) = self.repository.touch_last_used(&token_hash).await {
            tracing::warn!(error = %e, "Failed to record token use");
        }

        Ok(())
    }

    /// Creates a token and returns it with the raw value, which is never stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank name.
    /// Returns [`AppError::Conflict`] if the name is taken.
    pub async fn issue_token(&self, name: &str) -> Result<(String, ApiToken), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request(
                "Token name must not be empty",
                json!({}),
            ));
        }

        let raw = generate_token();
        let token = self
            .repository
            .create_token(name, &hash_token(&self.signing_secret, &raw))
            .await?;

        Ok((raw, token))
    }

    pub async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        self.repository.list_tokens().await
    }

    /// Revokes a token given its numeric id or its name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no token matches.
    /// Returns [`AppError::Conflict`] if it is already revoked.
    pub async fn revoke(&self, id_or_name: &str) -> Result<ApiToken, AppError> {
        let token = match id_or_name.parse::<i64>() {
            Ok(id) => self.repository.find_by_id(id).await?,
            Err(_) => self.repository.find_by_name(id_or_name).await?,
        }
        .ok_or_else(|| AppError::not_found("Token not found", json!({ "token": id_or_name })))?;

        if !self.repository.revoke_token(token.id).await? {
            return Err(AppError::conflict(
                "Token is already revoked",
                json!({ "token": token.name }),
            ));
        }

        Ok(token)
    }
}
