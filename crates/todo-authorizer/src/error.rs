//! Error types for the authorizer.

/// Why a bearer token was refused.
///
/// Every variant is an expected outcome. At the authorizer boundary all of
/// them collapse to a `Deny` decision; the message is only ever logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header, or an empty one.
    #[error("no authentication header")]
    MissingHeader,

    /// Header present but not of the form `Bearer <token>`.
    #[error("invalid authentication header")]
    MalformedHeader,

    /// Token is not a well-formed signed-claims structure.
    #[error("malformed token: {reason}")]
    MalformedToken { reason: String },

    /// Signature does not verify against the signing credential.
    #[error("invalid token signature: {reason}")]
    InvalidSignature { reason: String },

    /// The `exp` claim is in the past.
    #[error("token expired")]
    Expired,

    /// Issuer or audience does not match the configured expectation.
    #[error("claim mismatch: {claim}")]
    ClaimMismatch { claim: String },

    /// No verification key could be resolved for the token.
    #[error("signing key unavailable: {reason}")]
    KeyUnavailable { reason: String },
}

impl AuthError {
    /// Stable short code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedHeader => "malformed_header",
            Self::MalformedToken { .. } => "malformed_token",
            Self::InvalidSignature { .. } => "invalid_signature",
            Self::Expired => "expired",
            Self::ClaimMismatch { .. } => "claim_mismatch",
            Self::KeyUnavailable { .. } => "key_unavailable",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::InvalidSignature {
                reason: err.to_string(),
            },
            ErrorKind::InvalidIssuer => Self::ClaimMismatch {
                claim: "iss".into(),
            },
            ErrorKind::InvalidAudience => Self::ClaimMismatch {
                claim: "aud".into(),
            },
            ErrorKind::ImmatureSignature => Self::ClaimMismatch {
                claim: "nbf".into(),
            },
            _ => Self::MalformedToken {
                reason: err.to_string(),
            },
        }
    }
}

/// Result type for token checks.
pub type AuthResult<T> = Result<T, AuthError>;

/// Failure to load or build the signing credential at startup.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to read credential file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported credential: {message}")]
    Unsupported { message: String },

    #[error("invalid certificate: {message}")]
    Certificate { message: String },

    #[error("invalid key: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),

    #[error("JWKS provider error: {message}")]
    Jwks { message: String },

    #[error("no signing credential configured (set TODO_AUTH_CERT_PEM, TODO_AUTH_CERT_PATH or TODO_AUTH_JWKS_URI)")]
    NotConfigured,
}
