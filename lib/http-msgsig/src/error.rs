use miette::Diagnostic;
use thiserror::Error;

/// Signing and verification error
///
/// Every variant is terminal. Nothing in this crate retries.
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Declared algorithm of the signature conflicts with the algorithm bound to the key
    #[error("Algorithm mismatch for key ID")]
    AlgMismatch,

    /// Requested component isn't present on the message
    #[error("Component {0:?} not found")]
    ComponentNotFound(String),

    /// Digest of the body didn't match the `Digest` header
    #[error("Digest mismatch")]
    DigestMismatch,

    /// Signature verification failed
    #[error("Invalid signature")]
    InvalidSignature,

    /// Key ID can't be written into a `Signature-Input` header
    #[error("Key ID {0:?} can't be represented in a signature header")]
    InvalidKeyId(String),

    /// Produced header value contained bytes not allowed in HTTP headers
    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// `Digest` header couldn't be parsed
    #[error("Malformed digest header")]
    MalformedDigest,

    /// `Signature` or `Signature-Input` header is structurally broken
    #[error("Unable to parse signature headers")]
    MalformedSignature,

    /// `Digest` header is required but missing
    #[error("Missing digest header")]
    MissingDigest,

    /// `Signature` or `Signature-Input` header is missing
    #[error("Signature headers not found")]
    NotSigned,

    /// Signature is expired
    #[error("Signature expired")]
    SignatureExpired,

    /// The cryptography backend failed to produce a signature
    #[error("Failed to create signature")]
    Signing,

    /// None of the key IDs referenced by the signatures is known
    #[error("Unknown key ID")]
    UnknownKey,
}

impl From<crate::input::ParseError> for Error {
    #[inline]
    fn from(err: crate::input::ParseError) -> Self {
        debug!(error = %err, "failed to parse signature input");
        Self::MalformedSignature
    }
}
