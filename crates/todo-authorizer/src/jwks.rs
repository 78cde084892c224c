use crate::error::{AuthError, AuthResult, CredentialError};
use jsonwebtoken::DecodingKey;
use moka::sync::Cache;
use reqwest::Client;
use serde::Deserialize;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const MAX_CACHED_KEYS: u64 = 100;
const KEY_TTL: Duration = Duration::from_secs(3600);
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_JWKS_BYTES: u64 = 512 * 1024;

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: Option<String>,
    kty: String,
    #[serde(rename = "use")]
    key_use: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

/// Resolves RS256 verification keys by `kid` from a JWKS endpoint.
#[derive(Clone)]
pub struct JwksProvider {
    cache: Cache<String, Arc<DecodingKey>>,
    client: Client,
    jwks_uri: Url,
}

impl std::fmt::Debug for JwksProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksProvider")
            .field("jwks_uri", &self.jwks_uri.as_str())
            .field("cached_keys", &self.cache.entry_count())
            .finish()
    }
}

impl JwksProvider {
    pub fn new(jwks_uri: Url) -> Result<Self, CredentialError> {
        Self::validate_uri(&jwks_uri)?;
        Self::build(jwks_uri)
    }

    /// Skips the host safety check. For local identity providers and tests.
    pub fn new_allowing_private_hosts(jwks_uri: Url) -> Result<Self, CredentialError> {
        Self::build(jwks_uri)
    }

    fn build(jwks_uri: Url) -> Result<Self, CredentialError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("todo-authorizer/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| CredentialError::Jwks {
                message: e.to_string(),
            })?;

        Ok(Self {
            cache: Cache::builder()
                .max_capacity(MAX_CACHED_KEYS)
                .time_to_live(KEY_TTL)
                .build(),
            client,
            jwks_uri,
        })
    }

    fn validate_uri(uri: &Url) -> Result<(), CredentialError> {
        let unsafe_ip = match uri.host() {
            Some(url::Host::Ipv4(addr)) => {
                Self::is_unsafe_ip(&IpAddr::V4(addr)).then_some(addr.to_string())
            }
            Some(url::Host::Ipv6(addr)) => {
                Self::is_unsafe_ip(&IpAddr::V6(addr)).then_some(addr.to_string())
            }
            // Domain names would need DNS resolution to classify.
            Some(url::Host::Domain(_)) => None,
            None => {
                return Err(CredentialError::Jwks {
                    message: format!("JWKS URI has no host: {uri}"),
                })
            }
        };

        match unsafe_ip {
            Some(addr) => Err(CredentialError::Jwks {
                message: format!("Use of unsafe IP address in JWKS URI: {addr}"),
            }),
            None => Ok(()),
        }
    }

    fn is_unsafe_ip(ip: &IpAddr) -> bool {
        match ip {
            IpAddr::V4(addr) => {
                addr.is_loopback()
                    || addr.is_link_local()
                    || addr.is_multicast()
                    || addr.is_unspecified()
                    || addr.is_private()
            }
            IpAddr::V6(addr) => {
                addr.is_loopback()
                    || addr.is_multicast()
                    || addr.is_unspecified()
                    || (addr.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7
                    || (addr.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10
            }
        }
    }

    pub async fn get_key(&self, kid: &str) -> AuthResult<Arc<DecodingKey>> {
        if let Some(key) = self.cache.get(kid) {
            return Ok(key);
        }

        // Miss: a rotated key may have been published since the last fetch.
        self.refresh().await?;

        self.cache.get(kid).ok_or_else(|| AuthError::KeyUnavailable {
            reason: format!("no key published for kid '{kid}'"),
        })
    }

    async fn refresh(&self) -> AuthResult<()> {
        tracing::info!(event = "jwks_refresh", uri = %self.jwks_uri);
        let unavailable = |e: reqwest::Error| AuthError::KeyUnavailable {
            reason: format!("JWKS fetch failed: {e}"),
        };

        let resp = self
            .client
            .get(self.jwks_uri.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(unavailable)?;

        if let Some(len) = resp.content_length() {
            if len > MAX_JWKS_BYTES {
                return Err(AuthError::KeyUnavailable {
                    reason: format!("JWKS response too large: {len} bytes"),
                });
            }
        }

        let jwks: JwksResponse = resp.json().await.map_err(unavailable)?;

        let mut loaded = 0usize;
        for key in jwks.keys {
            if key.kty != "RSA" || key.key_use.as_deref().is_some_and(|u| u != "sig") {
                continue;
            }
            let (Some(kid), Some(n), Some(e)) = (&key.kid, &key.n, &key.e) else {
                continue;
            };
            match DecodingKey::from_rsa_components(n, e) {
                Ok(decoding_key) => {
                    self.cache.insert(kid.clone(), Arc::new(decoding_key));
                    loaded += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        reason = "W_AUTH_JWK",
                        kid = %kid,
                        error = %err,
                        "Skipping unusable JWK"
                    );
                }
            }
        }
        tracing::debug!(event = "jwks_loaded", keys = loaded);

        Ok(())
    }
}
