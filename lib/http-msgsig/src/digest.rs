//!
//! `Digest` header over the request body
//!
//! Checked independently of the signature. A signature covering the `digest` header only binds the body
//! once the digest itself has been verified against the body.
//!

use crate::{Error, Result};
use sha2::{Digest, Sha256, Sha512};
use std::str::FromStr;
use strum::{AsRefStr, EnumString};
use subtle::ConstantTimeEq;

/// Digest algorithms
#[derive(AsRefStr, Clone, Copy, Debug, Default, EnumString, Eq, PartialEq)]
#[strum(ascii_case_insensitive)]
#[non_exhaustive]
pub enum Algorithm {
    /// SHA-256
    #[default]
    #[strum(serialize = "id-sha-256", serialize = "sha-256")]
    Sha256,

    /// SHA-512
    #[strum(serialize = "id-sha-512", serialize = "sha-512")]
    Sha512,
}

impl Algorithm {
    /// Hash the data
    #[must_use]
    pub fn digest(&self, data: impl AsRef<[u8]>) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

/// Calculate the `Digest` header value of the body
///
/// Always uses `id-sha-256`
#[must_use]
pub fn calculate(body: &[u8]) -> String {
    let algorithm = Algorithm::Sha256;
    let encoded = base64_simd::STANDARD.encode_to_string(algorithm.digest(body));

    format!("{}=:{encoded}:", algorithm.as_ref())
}

/// Verify the `Digest` header value against the body
///
/// The encoded digest may or may not be delimited by colons
pub fn verify(body: &[u8], header_value: &str) -> Result<()> {
    let (algorithm, encoded) = header_value
        .split_once('=')
        .ok_or(Error::MalformedDigest)?;

    let algorithm = Algorithm::from_str(algorithm.trim()).map_err(|_| Error::MalformedDigest)?;
    let encoded = encoded.trim();
    let encoded = encoded
        .strip_prefix(':')
        .and_then(|encoded| encoded.strip_suffix(':'))
        .unwrap_or(encoded);

    let expected = base64_simd::STANDARD
        .decode_to_vec(encoded)
        .map_err(|_| Error::MalformedDigest)?;

    if bool::from(algorithm.digest(body).ct_eq(&expected)) {
        Ok(())
    } else {
        debug!(algorithm = algorithm.as_ref(), "digest mismatch");
        Err(Error::DigestMismatch)
    }
}

#[cfg(test)]
mod test {
    use super::{calculate, verify};
    use crate::Error;

    const TEXT: &str = r"Una sombra abajo de mi cama
Cómo se llama éste fantasma?
Es mi espejo, es mi espejo
Y me persigue hasta que hablemos";

    const EXPECTED_SHA256_HASH: &str = "vDI/NDnFX991qKsNsKB5Ne4bam8J5eLLYqo0jU8ku+I=";
    const EXPECTED_SHA512_HASH: &str =
        "zTNHlXez9GjaWU8Z/7OM6ntFjCbxcOfuc7NRp8F4m3fVrmG5K/7QST2lQiif8EGEopqih9eFlbo0dumbsBYP4g==";

    #[test]
    fn calculate_sha256() {
        assert_eq!(
            calculate(TEXT.as_bytes()),
            format!("id-sha-256=:{EXPECTED_SHA256_HASH}:")
        );
    }

    #[test]
    fn verify_formats() {
        let body = TEXT.as_bytes();

        verify(body, &calculate(body)).unwrap();
        verify(body, &format!("sha-256={EXPECTED_SHA256_HASH}")).unwrap();
        verify(body, &format!("SHA-256={EXPECTED_SHA256_HASH}")).unwrap();
        verify(body, &format!("sha-512={EXPECTED_SHA512_HASH}")).unwrap();
        verify(body, &format!("id-sha-512=:{EXPECTED_SHA512_HASH}:")).unwrap();
    }

    #[test]
    fn mismatch() {
        assert!(matches!(
            verify(b"other body", &calculate(TEXT.as_bytes())),
            Err(Error::DigestMismatch)
        ));
    }

    #[test]
    fn malformed() {
        let body = TEXT.as_bytes();

        assert!(matches!(verify(body, "sha-256"), Err(Error::MalformedDigest)));
        assert!(matches!(
            verify(body, "md5=:AAAA:"),
            Err(Error::MalformedDigest)
        ));
        assert!(matches!(
            verify(body, "sha-256=THIS-IS-BAD"),
            Err(Error::MalformedDigest)
        ));
    }
}
