//!
//! `Signature-Input` member values
//!
//! A member value looks like this:
//!
//! ```text
//! ("@method" "@path" "@query" "digest");alg="hmac-sha256";created=1618884475;keyid="test-key"
//! ```
//!

use crate::util::UnixTimestampExt;
use std::time::SystemTime;

mod parse;
mod serialise;

pub use self::parse::{parse, ParseError, ParseErrorKind};
pub use self::serialise::{is_representable, serialise};

/// Parameters of one signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureParams<'a> {
    /// Covered components, in signing order
    pub components: Vec<&'a str>,

    /// Key identifier
    pub key_id: &'a str,

    /// Declared algorithm
    pub algorithm: Option<&'a str>,

    /// Creation timestamp (UNIX seconds)
    pub created: Option<u64>,

    /// Expiry timestamp (UNIX seconds)
    pub expires: Option<u64>,

    /// Nonce
    pub nonce: Option<&'a str>,
}

impl SignatureParams<'_> {
    /// Creation time, if declared
    ///
    /// `None` as well if the timestamp lies too far in the future to be represented
    #[must_use]
    pub fn created_at(&self) -> Option<SystemTime> {
        self.created.and_then(SystemTime::from_unix_timestamp)
    }

    /// Expiry time, if declared
    ///
    /// `None` as well if the timestamp lies too far in the future to be represented
    #[must_use]
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires.and_then(SystemTime::from_unix_timestamp)
    }

    /// Whether the signature expired at the provided point in time
    ///
    /// A signature expires the moment its `expires` timestamp is reached.
    /// Without an `expires` parameter, or with one beyond what the system clock can represent, it never expires.
    #[must_use]
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.expires_at().is_some_and(|expires| expires <= now)
    }
}
