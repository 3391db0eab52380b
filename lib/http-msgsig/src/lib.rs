//!
//! HTTP message signatures
//!
//! Signs and verifies HTTP requests by canonicalising a selected, ordered set of message components
//! into a signing base and running it through one of the supported algorithms:
//!
//! - `rsa-pss-sha512`
//! - `ecdsa-p256-sha256`
//! - `hmac-sha256`
//!
//! All the failures of the verification routine are reported as distinct error variants.
//! When you sit at an HTTP boundary, map every one of them to the same rejection (a plain `400` works).
//! Telling the peer *why* a signature was rejected hands out an oracle for key ID and algorithm guessing.
//!

#[macro_use]
extern crate tracing;

use http::HeaderName;

pub use self::clock::{Clock, SystemClock};
pub use self::component::Message;
pub use self::crypto::{Algorithm, SigningKey, Verify, VerifyingKey};
pub use self::error::Error;
pub use self::input::SignatureParams;
pub use self::key_store::{KeyEntry, KeyStore, VerifyingKeyResolver};
pub use self::signer::{SignatureHeaders, Signer};
pub use self::verifier::Verifier;

pub use ring;

mod error;
mod header;
mod key_store;
mod signer;
mod util;
mod verifier;

pub mod clock;
pub mod component;
pub mod crypto;
pub mod digest;
pub mod input;

type Result<T, E = Error> = std::result::Result<T, E>;

/// `Signature` header
pub static SIGNATURE: HeaderName = HeaderName::from_static("signature");

/// `Signature-Input` header
pub static SIGNATURE_INPUT: HeaderName = HeaderName::from_static("signature-input");

/// `Digest` header
pub static DIGEST: HeaderName = HeaderName::from_static("digest");
