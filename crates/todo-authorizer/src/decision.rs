//! Authorization decisions in the gateway's custom-authorizer shape.
//!
//! Flow:
//! 1. Extract the bearer token from the header
//! 2. Verify signature and claims
//! 3. `Allow` the verified subject, or `Deny` the placeholder principal
//!
//! No failure escapes [`Authorizer::authorize`]; the reason is logged and
//! the caller only ever sees the denial.

use crate::error::AuthResult;
use crate::extract::bearer_token;
use crate::validation::{Claims, TokenValidator};
use serde::{Deserialize, Serialize};

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";
pub const ALL_RESOURCES: &str = "*";
/// Principal reported when no verified subject is available.
pub const DENIED_PRINCIPAL: &str = "user";

/// Token-authorizer event as delivered by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub authorization_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_arn: Option<String>,
}

impl AuthorizationRequest {
    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            authorization_token: Some(header.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    fn single(effect: Effect) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                action: INVOKE_ACTION.to_string(),
                effect,
                resource: ALL_RESOURCES.to_string(),
            }],
        }
    }
}

/// Outcome of one authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Allow { principal_id: String },
    Deny { principal_id: String },
}

impl AuthorizationDecision {
    pub fn deny() -> Self {
        Self::Deny {
            principal_id: DENIED_PRINCIPAL.to_string(),
        }
    }

    pub fn principal_id(&self) -> &str {
        match self {
            Self::Allow { principal_id } | Self::Deny { principal_id } => principal_id,
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            Self::Allow { .. } => Effect::Allow,
            Self::Deny { .. } => Effect::Deny,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    pub fn policy_document(&self) -> PolicyDocument {
        PolicyDocument::single(self.effect())
    }
}

/// Wire form returned to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
}

impl From<&AuthorizationDecision> for AuthorizerResponse {
    fn from(decision: &AuthorizationDecision) -> Self {
        Self {
            principal_id: decision.principal_id().to_string(),
            policy_document: decision.policy_document(),
        }
    }
}

impl From<AuthorizationDecision> for AuthorizerResponse {
    fn from(decision: AuthorizationDecision) -> Self {
        Self::from(&decision)
    }
}

#[derive(Debug, Clone)]
pub struct Authorizer {
    validator: TokenValidator,
}

impl Authorizer {
    pub fn new(validator: TokenValidator) -> Self {
        Self { validator }
    }

    /// Always yields a decision.
    pub async fn authorize(&self, request: &AuthorizationRequest) -> AuthorizationDecision {
        tracing::info!(
            event = "authorize",
            has_header = request.authorization_token.is_some(),
            "Authorizing a user"
        );

        match self.verify(request.authorization_token.as_deref()).await {
            Ok(claims) => {
                tracing::info!(event = "authorize_allow", sub = %claims.sub, "User was authorized");
                AuthorizationDecision::Allow {
                    principal_id: claims.sub,
                }
            }
            Err(e) => {
                tracing::warn!(
                    event = "authorize_deny",
                    reason = e.code(),
                    error = %e,
                    "User not authorized"
                );
                AuthorizationDecision::deny()
            }
        }
    }

    async fn verify(&self, header: Option<&str>) -> AuthResult<Claims> {
        let token = bearer_token(header)?;
        self.validator.validate(token).await
    }
}
