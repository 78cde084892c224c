//! Caller identity from an already-authorized request.
//!
//! The gateway copies the authorizer's `principalId` into the request
//! context of every request it lets through; handlers trust it as-is.

use crate::error::{TodoError, TodoResult};
use crate::model::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerContext {
    #[serde(default)]
    pub principal_id: Option<String>,
}

/// The `requestContext` portion of a proxied API request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub authorizer: Option<AuthorizerContext>,
}

impl RequestContext {
    pub fn for_principal(principal_id: impl Into<String>) -> Self {
        Self {
            authorizer: Some(AuthorizerContext {
                principal_id: Some(principal_id.into()),
            }),
        }
    }
}

pub fn resolve_caller_identity(ctx: &RequestContext) -> TodoResult<UserId> {
    ctx.authorizer
        .as_ref()
        .and_then(|a| a.principal_id.as_deref())
        .filter(|p| !p.is_empty())
        .map(UserId::new)
        .ok_or_else(|| TodoError::Unauthenticated {
            message: "request context has no authorizer principal".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn principal_is_read_from_gateway_context() {
        let ctx: RequestContext = serde_json::from_value(json!({
            "accountId": "123456789012",
            "authorizer": { "principalId": "auth0|abc", "integrationLatency": 12 }
        }))
        .unwrap();
        assert_eq!(resolve_caller_identity(&ctx).unwrap(), UserId::new("auth0|abc"));
    }

    #[test]
    fn missing_principal_is_unauthenticated() {
        for ctx in [
            RequestContext::default(),
            RequestContext {
                authorizer: Some(AuthorizerContext::default()),
            },
            RequestContext::for_principal(""),
        ] {
            let err = resolve_caller_identity(&ctx).unwrap_err();
            assert_eq!(err.status_code(), 401);
        }
    }
}
