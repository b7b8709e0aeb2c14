use super::model::{AppMetadata, AuthenticatedUser};
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

/// Verifies HS256 access tokens issued by the external auth provider
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    /// Provider role; "authenticated" for signed-in users, "anon" for the public key
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    app_metadata: AppMetadata,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&config.audience]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation.leeway = config.jwt_leeway.as_secs();
        validation.validate_nbf = true;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Unauthorized(e.to_string()))?;

        if header.alg != Algorithm::HS256 {
            return Err(AppError::Unauthorized(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        let claims = token_data.claims;

        if claims.role.as_deref() == Some("anon") {
            return Err(AppError::Unauthorized(
                "Anonymous tokens are not accepted".to_string(),
            ));
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Token subject is not a user id".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
            organization_id: claims.app_metadata.organization_id,
            roles: claims.app_metadata.roles,
        })
    }
}
