//! Pre-signed upload handles for item attachments.

use crate::error::{TodoError, TodoResult};
use crate::model::TodoId;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// Issues write handles into the attachment bucket.
pub trait AttachmentStore: Send + Sync {
    /// Time-limited URL the client may `PUT` the attachment to.
    fn upload_url(&self, todo: &TodoId, now: DateTime<Utc>) -> TodoResult<Url>;

    /// Where the uploaded attachment is readable once stored.
    fn public_url(&self, todo: &TodoId) -> TodoResult<Url>;
}

/// Handles of the form `{base}/{todoId}?X-Expires=..&X-Signature=..`, where
/// the signature is HMAC-SHA256 over method, object key and expiry.
pub struct PresignedUrlStore {
    base_url: Url,
    secret: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for PresignedUrlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresignedUrlStore")
            .field("base_url", &self.base_url.as_str())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl PresignedUrlStore {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

    pub fn new(base_url: Url, secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            base_url,
            secret: secret.into(),
            ttl,
        }
    }

    fn object_url(&self, todo: &TodoId) -> TodoResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TodoError::Attachment {
                message: format!("base URL cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .push(todo.as_str());
        Ok(url)
    }

    fn signature(&self, key: &str, expires: i64) -> TodoResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).map_err(|e| TodoError::Attachment {
            message: e.to_string(),
        })?;
        mac.update(format!("PUT\n{key}\n{expires}").as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Recomputes the signature of a previously issued handle.
    pub fn verify(&self, url: &Url, now: DateTime<Utc>) -> bool {
        let mut expires = None;
        let mut signature = None;
        for (k, v) in url.query_pairs() {
            match k.as_ref() {
                "X-Expires" => expires = v.parse::<i64>().ok(),
                "X-Signature" => signature = Some(v.into_owned()),
                _ => {}
            }
        }
        let (Some(expires), Some(signature)) = (expires, signature) else {
            return false;
        };
        if expires < now.timestamp() {
            return false;
        }
        let Some(key) = url.path_segments().and_then(|mut s| s.next_back()) else {
            return false;
        };
        self.signature(key, expires)
            .is_ok_and(|expected| expected == signature)
    }
}

impl AttachmentStore for PresignedUrlStore {
    fn upload_url(&self, todo: &TodoId, now: DateTime<Utc>) -> TodoResult<Url> {
        let ttl = i64::try_from(self.ttl.as_secs()).map_err(|_| TodoError::Attachment {
            message: format!("upload TTL {:?} out of range", self.ttl),
        })?;
        let expires = now.timestamp().saturating_add(ttl);
        let signature = self.signature(todo.as_str(), expires)?;
        let mut url = self.object_url(todo)?;
        url.query_pairs_mut()
            .append_pair("X-Expires", &expires.to_string())
            .append_pair("X-Signature", &signature);
        Ok(url)
    }

    fn public_url(&self, todo: &TodoId) -> TodoResult<Url> {
        self.object_url(todo)
    }
}
