//! Static signing credential, loaded once at startup.
//!
//! Accepts the PEM forms identity providers hand out for RS256 verification:
//! an X.509 `CERTIFICATE`, an SPKI `PUBLIC KEY` or a PKCS#1 `RSA PUBLIC KEY`.

use crate::error::CredentialError;
use jsonwebtoken::DecodingKey;
use std::path::Path;
use std::sync::Arc;
use x509_cert::der::oid::ObjectIdentifier;
use x509_cert::der::DecodePem;
use x509_cert::Certificate;

const CERTIFICATE_LABEL: &str = "-----BEGIN CERTIFICATE-----";
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// Immutable RSA verification key. Cheap to clone and shared across tasks.
#[derive(Clone)]
pub struct SigningCredential {
    key: Arc<DecodingKey>,
}

impl std::fmt::Debug for SigningCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredential").finish_non_exhaustive()
    }
}

impl SigningCredential {
    pub fn from_pem(pem: &str) -> Result<Self, CredentialError> {
        let pem = pem.trim();
        let key = if pem.starts_with(CERTIFICATE_LABEL) {
            key_from_certificate(pem)?
        } else if pem.contains("PRIVATE KEY-----") {
            return Err(CredentialError::Unsupported {
                message: "private key supplied where a public credential is expected".into(),
            });
        } else {
            DecodingKey::from_rsa_pem(pem.as_bytes())?
        };

        Ok(Self { key: Arc::new(key) })
    }

    pub async fn from_pem_file(path: &Path) -> Result<Self, CredentialError> {
        let pem = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CredentialError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_pem(&pem)
    }

    pub(crate) fn decoding_key(&self) -> Arc<DecodingKey> {
        self.key.clone()
    }
}

fn key_from_certificate(pem: &str) -> Result<DecodingKey, CredentialError> {
    let cert = Certificate::from_pem(pem.as_bytes()).map_err(|e| CredentialError::Certificate {
        message: e.to_string(),
    })?;
    let spki = &cert.tbs_certificate.subject_public_key_info;

    if spki.algorithm.oid != RSA_ENCRYPTION {
        return Err(CredentialError::Unsupported {
            message: format!("certificate key algorithm {} is not RSA", spki.algorithm.oid),
        });
    }

    // The SPKI bit string wraps a PKCS#1 RSAPublicKey.
    let pkcs1 = spki
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| CredentialError::Certificate {
            message: "subject public key is not byte aligned".into(),
        })?;

    Ok(DecodingKey::from_rsa_der(pkcs1))
}
