use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Where the verification key comes from.
///
/// Resolution order when more than one is set: inline PEM, PEM file, JWKS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    #[default]
    None,
    /// PEM text supplied directly (certificate or public key).
    Pem(String),
    /// Path to a PEM file, read once at startup.
    PemFile(PathBuf),
    /// Rotation-aware key distribution endpoint.
    Jwks(Url),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub credential: CredentialSource,
    pub issuer: Option<String>,
    pub audience: Vec<String>,
    pub clock_skew_leeway: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credential: CredentialSource::None,
            issuer: None,
            audience: Vec::new(),
            clock_skew_leeway: Duration::ZERO,
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = env::var("TODO_AUTH_JWKS_URI") {
            match Url::parse(&v) {
                Ok(u) if u.scheme() == "https" => cfg.credential = CredentialSource::Jwks(u),
                Ok(_) => {
                    tracing::warn!(
                        reason = "W_AUTH_JWKS_SCHEME",
                        "JWKS URI '{}' is not HTTPS. Ignoring unsafe URI.",
                        v
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        reason = "W_AUTH_JWKS_URI",
                        error = %e,
                        "Ignoring unparseable JWKS URI"
                    );
                }
            }
        }

        // File and inline PEM take precedence over JWKS, inline first.
        if let Ok(v) = env::var("TODO_AUTH_CERT_PATH") {
            if !v.trim().is_empty() {
                cfg.credential = CredentialSource::PemFile(PathBuf::from(v));
            }
        }

        if let Ok(v) = env::var("TODO_AUTH_CERT_PEM") {
            if !v.trim().is_empty() {
                cfg.credential = CredentialSource::Pem(v);
            }
        }

        if let Ok(v) = env::var("TODO_AUTH_ISSUER") {
            if !v.is_empty() {
                cfg.issuer = Some(v);
            }
        }

        if let Ok(v) = env::var("TODO_AUTH_AUDIENCE") {
            cfg.audience = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(v) = env::var("TODO_AUTH_LEEWAY_SECS") {
            match v.trim().parse::<u64>() {
                Ok(secs) => cfg.clock_skew_leeway = Duration::from_secs(secs),
                Err(_) => {
                    tracing::warn!(
                        reason = "W_AUTH_LEEWAY",
                        "Ignoring invalid TODO_AUTH_LEEWAY_SECS '{}'",
                        v
                    );
                }
            }
        }

        cfg
    }
}
