//! Time-boxed request signatures.
//!
//! Every request carries `AccessID`, `Expires` and `Signature` query
//! parameters. The signature is an HMAC-SHA1 over `"{access_id}\n{expires}"`,
//! base64-encoded, and does not depend on the request itself.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::{LinkscapeError, Result};

type HmacSha1 = Hmac<Sha1>;

/// Seconds a signature stays valid unless configured otherwise.
pub const DEFAULT_EXPIRES_THRESHOLD: u64 = 300;

/// Source of the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// API credentials.
///
/// The secret key is only kept as a keyed HMAC, ready to sign.
#[derive(Clone)]
pub struct Credentials {
    access_id: String,
    mac: HmacSha1,
}

impl Credentials {
    /// Create credentials. Both fields must be non-empty.
    pub fn new(access_id: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let access_id = access_id.into();
        let secret_key = secret_key.into();

        if access_id.is_empty() {
            return Err(LinkscapeError::ConfigMissing("access id".to_string()));
        }
        if secret_key.is_empty() {
            return Err(LinkscapeError::ConfigMissing("secret key".to_string()));
        }

        let mac = HmacSha1::new_from_slice(secret_key.as_bytes())
            .map_err(|e| LinkscapeError::ConfigMissing(format!("usable secret key ({e})")))?;

        Ok(Self { access_id, mac })
    }

    /// The public access id.
    pub fn access_id(&self) -> &str {
        &self.access_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_id", &self.access_id)
            .finish_non_exhaustive()
    }
}

/// Generates and caches request signatures.
///
/// The cached signature and its expiry are always updated together by
/// [`Signer::generate`].
pub struct Signer {
    credentials: Credentials,
    expires_threshold: u64,
    last_expires: Option<i64>,
    signature: Option<String>,
    clock: Arc<dyn Clock>,
}

impl Signer {
    /// Create a signer on the system clock.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_clock(credentials, Arc::new(SystemClock))
    }

    /// Create a signer on a custom clock.
    pub fn with_clock(credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials,
            expires_threshold: DEFAULT_EXPIRES_THRESHOLD,
            last_expires: None,
            signature: None,
            clock,
        }
    }

    /// Replace the clock. The cached signature is left as is.
    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
    }

    /// The access id being signed for.
    pub fn access_id(&self) -> &str {
        self.credentials.access_id()
    }

    /// Compute a fresh signature, caching it with its expiry.
    pub fn generate(&mut self) -> String {
        let expires = self.expires(None);
        let signature = sign(&self.credentials, expires);

        self.last_expires = Some(expires);
        self.signature = Some(signature.clone());
        signature
    }

    /// The signature from the last [`generate`](Self::generate) call.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// The expiry from the last [`generate`](Self::generate) call.
    pub fn expires_at(&self) -> Option<i64> {
        self.last_expires
    }

    /// Current time in seconds plus `threshold`, or the configured
    /// threshold when `None`. Does not touch the cache.
    pub fn expires(&self, threshold: Option<u64>) -> i64 {
        let threshold = threshold.unwrap_or(self.expires_threshold);
        let now_secs = self.clock.now_millis().div_euclid(1000);
        now_secs.saturating_add(i64::try_from(threshold).unwrap_or(i64::MAX))
    }

    /// The threshold used by calls that do not pass one.
    pub fn expires_threshold(&self) -> u64 {
        self.expires_threshold
    }

    /// Change the default threshold.
    pub fn set_expires_threshold(&mut self, seconds: u64) {
        self.expires_threshold = seconds;
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("access_id", &self.credentials.access_id)
            .field("expires_threshold", &self.expires_threshold)
            .field("last_expires", &self.last_expires)
            .finish_non_exhaustive()
    }
}

fn sign(credentials: &Credentials, expires: i64) -> String {
    let mut mac = credentials.mac.clone();
    mac.update(format!("{}\n{}", credentials.access_id, expires).as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
