//! Bearer-token authorizer for the to-do API.
//!
//! Turns the gateway's token-authorizer event into an allow/deny policy:
//!
//! ```no_run
//! use todo_authorizer::{AuthConfig, AuthorizationRequest, Authorizer, TokenValidator};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AuthConfig::from_env();
//! let authorizer = Authorizer::new(TokenValidator::from_config(&config).await?);
//!
//! let decision = authorizer
//!     .authorize(&AuthorizationRequest::with_header("Bearer eyJ..."))
//!     .await;
//! println!("{} -> {:?}", decision.principal_id(), decision.effect());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `TODO_AUTH_CERT_PEM` | Inline PEM certificate or RSA public key |
//! | `TODO_AUTH_CERT_PATH` | File holding the PEM credential |
//! | `TODO_AUTH_JWKS_URI` | HTTPS JWKS endpoint (keys selected by `kid`) |
//! | `TODO_AUTH_ISSUER` | Required `iss` claim, if set |
//! | `TODO_AUTH_AUDIENCE` | Accepted `aud` values, comma separated |
//! | `TODO_AUTH_LEEWAY_SECS` | Clock skew allowed on `exp`/`nbf` (default: 0) |

pub mod config;
pub mod credential;
pub mod decision;
pub mod error;
pub mod extract;
pub mod jwks;
pub mod validation;

pub use config::{AuthConfig, CredentialSource};
pub use credential::SigningCredential;
pub use decision::{
    AuthorizationDecision, AuthorizationRequest, Authorizer, AuthorizerResponse, Effect,
    PolicyDocument, PolicyStatement, DENIED_PRINCIPAL,
};
pub use error::{AuthError, AuthResult, CredentialError};
pub use extract::bearer_token;
pub use jwks::JwksProvider;
pub use validation::{Claims, TokenValidator};
