//! Storage keys and public URLs for superhero images.
//!
//! Key format: `heroes/{superhero_id}/{unix_millis}-{sanitized_filename}`.
//! Public URL: `{public_base}/{key}`.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use hero_shared::SuperheroId;

/// Top-level prefix for every superhero image key.
pub const KEY_PREFIX: &str = "heroes";

/// Last instant handed out by [`next_upload_instant`], in unix milliseconds.
static LAST_UPLOAD_MILLIS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Upload instant for the next key.
///
/// Strictly increasing across the whole process, so two keys derived for the
/// same superhero and filename never collide even within one millisecond.
pub fn next_upload_instant() -> DateTime<Utc> {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_UPLOAD_MILLIS
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or(now);
    let millis = now.max(previous.saturating_add(1));
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}

/// Maps between storage keys and public URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodec {
    public_base: String,
}

impl KeyCodec {
    /// Create a codec for the given public base URL. Trailing slashes are ignored.
    #[must_use]
    pub fn new(public_base: impl AsRef<str>) -> Self {
        Self {
            public_base: public_base.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Normalized public base URL.
    #[must_use]
    pub fn public_base(&self) -> &str {
        &self.public_base
    }

    /// Derive the storage key for one upload.
    #[must_use]
    pub fn derive_key(
        superhero_id: SuperheroId,
        filename: &str,
        uploaded_at: DateTime<Utc>,
    ) -> String {
        format!(
            "{KEY_PREFIX}/{superhero_id}/{}-{}",
            uploaded_at.timestamp_millis(),
            sanitize_filename(filename)
        )
    }

    /// Public URL an object stored under `key` is served from.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base)
    }

    /// Recover the storage key from a public URL.
    ///
    /// Returns `None` if the URL was not built from this codec's base.
    #[must_use]
    pub fn key_from_public_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        if self.public_base.is_empty() {
            return None;
        }
        url.strip_prefix(self.public_base.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
    }
}

/// Sanitize filename for storage key.
///
/// Only ASCII alphanumeric characters, dots, hyphens, and underscores survive;
/// everything else becomes `_`. An empty name becomes `file`.
fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "file".to_string()
    } else {
        sanitized
    }
}
