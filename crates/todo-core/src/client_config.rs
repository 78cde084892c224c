//! Static configuration handed to the browser client.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

pub const DEFAULT_REGION: &str = "us-west-1";
pub const DEFAULT_STAGE: &str = "dev";
pub const DEFAULT_CALLBACK_URL: &str = "http://localhost:3000/callback";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAuthConfig {
    /// Identity provider tenant domain.
    pub domain: String,
    pub client_id: String,
    pub callback_url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub api_endpoint: Url,
    pub auth: ClientAuthConfig,
}

/// `https://{api_id}.execute-api.{region}.amazonaws.com/{stage}`
pub fn api_endpoint(api_id: &str, region: &str, stage: &str) -> Result<Url, ConfigError> {
    let valid = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid(api_id) {
        return Err(ConfigError::Invalid {
            name: "TODO_API_ID",
            message: format!("'{api_id}' is not a valid API id"),
        });
    }
    if !valid(region) {
        return Err(ConfigError::Invalid {
            name: "TODO_API_REGION",
            message: format!("'{region}' is not a valid region"),
        });
    }

    Url::parse(&format!(
        "https://{api_id}.execute-api.{region}.amazonaws.com/{stage}"
    ))
    .map_err(|e| ConfigError::Invalid {
        name: "TODO_API_STAGE",
        message: e.to_string(),
    })
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing { name })
        };
        let optional = |name: &str, default: &str| {
            env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let api_id = required("TODO_API_ID")?;
        let region = optional("TODO_API_REGION", DEFAULT_REGION);
        let stage = optional("TODO_API_STAGE", DEFAULT_STAGE);
        let callback = optional("TODO_AUTH_CALLBACK_URL", DEFAULT_CALLBACK_URL);

        Ok(Self {
            api_endpoint: api_endpoint(&api_id, &region, &stage)?,
            auth: ClientAuthConfig {
                domain: required("TODO_AUTH_DOMAIN")?,
                client_id: required("TODO_AUTH_CLIENT_ID")?,
                callback_url: Url::parse(&callback).map_err(|e| ConfigError::Invalid {
                    name: "TODO_AUTH_CALLBACK_URL",
                    message: e.to_string(),
                })?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "TODO_API_ID",
        "TODO_API_REGION",
        "TODO_API_STAGE",
        "TODO_AUTH_DOMAIN",
        "TODO_AUTH_CLIENT_ID",
        "TODO_AUTH_CALLBACK_URL",
    ];

    fn clear_env() {
        for v in VARS {
            env::remove_var(v);
        }
    }

    #[test]
    fn endpoint_follows_gateway_layout() {
        let url = api_endpoint("gxthwqjlcf", "us-west-1", "dev").unwrap();
        assert_eq!(
            url.as_str(),
            "https://gxthwqjlcf.execute-api.us-west-1.amazonaws.com/dev"
        );
        assert!(api_endpoint("evil.com/x", "us-west-1", "dev").is_err());
        assert!(api_endpoint("", "us-west-1", "dev").is_err());
    }

    #[test]
    #[serial]
    fn from_env_applies_defaults() {
        clear_env();
        env::set_var("TODO_API_ID", "gxthwqjlcf");
        env::set_var("TODO_AUTH_DOMAIN", "tenant.example.com");
        env::set_var("TODO_AUTH_CLIENT_ID", "client-123");

        let cfg = ClientConfig::from_env().unwrap();
        assert_eq!(cfg.auth.callback_url.as_str(), DEFAULT_CALLBACK_URL);
        assert_eq!(
            cfg.api_endpoint.host_str(),
            Some("gxthwqjlcf.execute-api.us-west-1.amazonaws.com")
        );
        assert_eq!(cfg.api_endpoint.path(), "/dev");

        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["auth"]["clientId"], "client-123");
        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_requires_ids() {
        clear_env();
        env::set_var("TODO_AUTH_DOMAIN", "tenant.example.com");
        env::set_var("TODO_AUTH_CLIENT_ID", "client-123");
        assert_eq!(
            ClientConfig::from_env().unwrap_err(),
            ConfigError::Missing { name: "TODO_API_ID" }
        );

        env::set_var("TODO_API_ID", "abc123");
        env::remove_var("TODO_AUTH_CLIENT_ID");
        assert_eq!(
            ClientConfig::from_env().unwrap_err(),
            ConfigError::Missing { name: "TODO_AUTH_CLIENT_ID" }
        );
        clear_env();
    }
}
