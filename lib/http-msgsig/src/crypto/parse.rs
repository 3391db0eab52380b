//!
//! Parse cryptographic keys from their PEM forms
//!

use super::{SigningKey, VerifyingKey};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1};
use miette::Diagnostic;
use pkcs8::{Document, PrivateKeyInfo, SecretDocument, SubjectPublicKeyInfoRef};
use thiserror::Error;

/// Key parsing error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Malformed DER structure
    #[error(transparent)]
    Der(#[from] pkcs8::der::Error),

    /// Key rejected
    #[error(transparent)]
    KeyRejected(#[from] ring::error::KeyRejected),

    /// Malformed key
    #[error("Malformed key")]
    MalformedKey,

    /// Malformed algorithm parameters
    #[error(transparent)]
    Spki(#[from] pkcs8::spki::Error),

    /// Elliptic curve other than P-256
    #[error("Unsupported curve")]
    UnsupportedCurve,

    /// Unknown key type
    #[error("Unknown key type")]
    UnknownKeyType,
}

/// Parse a public key from its SPKI PEM form
///
/// Currently supported algorithms:
///
/// - RSA (verified as `rsa-pss-sha512`)
/// - EC P-256 (verified as `ecdsa-p256-sha256`)
#[inline]
pub fn public_key(pem: &str) -> Result<VerifyingKey, Error> {
    let (_pem_tag, document) = Document::from_pem(pem)?;
    let spki: SubjectPublicKeyInfoRef<'_> = document.decode_msg()?;

    let raw_bytes = spki
        .subject_public_key
        .as_bytes()
        .ok_or(Error::MalformedKey)?;

    if spki.algorithm.oid == RSA_ENCRYPTION {
        Ok(VerifyingKey::rsa_pss_sha512(raw_bytes))
    } else if spki.algorithm.oid == ID_EC_PUBLIC_KEY {
        if spki.algorithm.parameters_oid()? != SECP_256_R_1 {
            return Err(Error::UnsupportedCurve);
        }

        Ok(VerifyingKey::ecdsa_p256_sha256(raw_bytes))
    } else {
        Err(Error::UnknownKeyType)
    }
}

/// Parse a private key from its PKCS#8 PEM form
///
/// Currently supported algorithms:
///
/// - RSA (signs as `rsa-pss-sha512`)
/// - EC P-256 (signs as `ecdsa-p256-sha256`)
#[inline]
pub fn private_key(pem: &str) -> Result<SigningKey, Error> {
    let (_tag_line, document) = SecretDocument::from_pem(pem)?;
    let private_key_info: PrivateKeyInfo<'_> = document.decode_msg()?;

    let signing_key = if private_key_info.algorithm.oid == RSA_ENCRYPTION {
        SigningKey::rsa_pss_sha512(document.as_bytes())?
    } else if private_key_info.algorithm.oid == ID_EC_PUBLIC_KEY {
        if private_key_info.algorithm.parameters_oid()? != SECP_256_R_1 {
            return Err(Error::UnsupportedCurve);
        }

        SigningKey::ecdsa_p256_sha256(document.as_bytes())?
    } else {
        return Err(Error::UnknownKeyType);
    };

    Ok(signing_key)
}
