use crate::config::{AuthConfig, CredentialSource};
use crate::credential::SigningCredential;
use crate::error::{AuthError, AuthResult, CredentialError};
use crate::jwks::JwksProvider;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    pub iss: Option<String>,
    pub aud: Option<serde_json::Value>, // string or array
    pub nbf: Option<u64>,
    pub iat: Option<u64>,
}

#[derive(Debug, Clone)]
enum KeySource {
    Static(SigningCredential),
    Jwks(JwksProvider),
}

/// Verifies RS256 bearer tokens against one key source.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    keys: KeySource,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(credential: SigningCredential, config: &AuthConfig) -> Self {
        Self {
            keys: KeySource::Static(credential),
            validation: Self::validation_for(config),
        }
    }

    pub fn with_jwks(provider: JwksProvider, config: &AuthConfig) -> Self {
        Self {
            keys: KeySource::Jwks(provider),
            validation: Self::validation_for(config),
        }
    }

    /// Builds the validator described by `config.credential`.
    pub async fn from_config(config: &AuthConfig) -> Result<Self, CredentialError> {
        match &config.credential {
            CredentialSource::Pem(pem) => Ok(Self::new(SigningCredential::from_pem(pem)?, config)),
            CredentialSource::PemFile(path) => Ok(Self::new(
                SigningCredential::from_pem_file(path).await?,
                config,
            )),
            CredentialSource::Jwks(uri) => {
                Ok(Self::with_jwks(JwksProvider::new(uri.clone())?, config))
            }
            CredentialSource::None => Err(CredentialError::NotConfigured),
        }
    }

    fn validation_for(config: &AuthConfig) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = config.clock_skew_leeway.as_secs();
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        if let Some(iss) = &config.issuer {
            validation.set_issuer(&[iss]);
        }
        if config.audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&config.audience);
        }
        validation
    }

    pub async fn validate(&self, token: &str) -> AuthResult<Claims> {
        let key = self.resolve_key(token).await?;
        let data = decode::<Claims>(token, &key, &self.validation)?;
        Ok(data.claims)
    }

    async fn resolve_key(&self, token: &str) -> AuthResult<Arc<DecodingKey>> {
        match &self.keys {
            KeySource::Static(credential) => Ok(credential.decoding_key()),
            KeySource::Jwks(provider) => {
                let header = decode_header(token)?;
                if header.alg != Algorithm::RS256 {
                    return Err(AuthError::InvalidSignature {
                        reason: format!("algorithm {:?} not allowed", header.alg),
                    });
                }
                let kid = header.kid.ok_or_else(|| AuthError::KeyUnavailable {
                    reason: "token header has no kid".into(),
                })?;
                provider.get_key(&kid).await
            }
        }
    }
}
