//!
//! Algorithm registry and cryptographic operations
//!

use ring::error::KeyRejected;
use strum::{AsRefStr, Display, EnumString};

mod sign;
mod verify;

pub mod parse;

pub use self::sign::{SigningKey, SigningOperation};
pub use self::verify::{Verify, VerifyingKey, VerifyingOperation};

/// Supported signature algorithms
#[derive(AsRefStr, Clone, Copy, Debug, Display, EnumString, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Algorithm {
    /// RSASSA-PSS using SHA-512
    #[strum(serialize = "rsa-pss-sha512")]
    RsaPssSha512,

    /// ECDSA using curve P-256 and SHA-256, ASN.1 DER encoded signatures
    #[strum(serialize = "ecdsa-p256-sha256")]
    EcdsaP256Sha256,

    /// HMAC using SHA-256
    #[strum(serialize = "hmac-sha256")]
    HmacSha256,
}

impl Algorithm {
    /// Construct a signing key for this algorithm
    ///
    /// `material` is a PKCS#8 DER document for the asymmetric algorithms and the shared secret for HMAC
    pub fn signing_key(self, material: &[u8]) -> Result<SigningKey, KeyRejected> {
        match self {
            Self::RsaPssSha512 => SigningKey::rsa_pss_sha512(material),
            Self::EcdsaP256Sha256 => SigningKey::ecdsa_p256_sha256(material),
            Self::HmacSha256 => Ok(SigningKey::hmac_sha256(material)),
        }
    }

    /// Construct a verifying key for this algorithm
    ///
    /// `material` is the DER-encoded `RSAPublicKey` for RSA, the uncompressed curve point for ECDSA,
    /// and the shared secret for HMAC
    #[must_use]
    pub fn verifying_key(self, material: &[u8]) -> VerifyingKey {
        match self {
            Self::RsaPssSha512 => VerifyingKey::rsa_pss_sha512(material),
            Self::EcdsaP256Sha256 => VerifyingKey::ecdsa_p256_sha256(material),
            Self::HmacSha256 => VerifyingKey::hmac_sha256(material),
        }
    }
}
