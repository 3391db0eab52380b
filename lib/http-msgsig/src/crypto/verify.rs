use super::Algorithm;
use crate::Error;
use ring::{
    hmac,
    signature::{UnparsedPublicKey, ECDSA_P256_SHA256_ASN1, RSA_PSS_2048_8192_SHA512},
};
use std::{fmt, sync::Arc};
use subtle::ConstantTimeEq;

/// Verifying key provided by an external key resolver
pub trait Verify: Send + Sync {
    /// Algorithm the key is bound to, if it has one
    ///
    /// Keys without a bound algorithm accept signatures declaring any algorithm
    fn algorithm(&self) -> Option<Algorithm> {
        None
    }

    /// Verify the signature over the message
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), Error>;
}

/// Enum dispatch over the supported verifying keys
#[derive(Clone)]
#[non_exhaustive]
pub enum VerifyingKey {
    /// `rsa-pss-sha512`
    RsaPssSha512(UnparsedPublicKey<Vec<u8>>),

    /// `ecdsa-p256-sha256`
    EcdsaP256Sha256(UnparsedPublicKey<Vec<u8>>),

    /// `hmac-sha256`
    HmacSha256(hmac::Key),

    /// Key handed out by a resolver
    Custom(Arc<dyn Verify>),
}

impl VerifyingKey {
    /// RSA public key in its DER-encoded `RSAPublicKey` form
    #[must_use]
    pub fn rsa_pss_sha512(public_key: impl Into<Vec<u8>>) -> Self {
        Self::RsaPssSha512(UnparsedPublicKey::new(
            &RSA_PSS_2048_8192_SHA512,
            public_key.into(),
        ))
    }

    /// P-256 public key as an uncompressed curve point
    #[must_use]
    pub fn ecdsa_p256_sha256(public_key: impl Into<Vec<u8>>) -> Self {
        Self::EcdsaP256Sha256(UnparsedPublicKey::new(
            &ECDSA_P256_SHA256_ASN1,
            public_key.into(),
        ))
    }

    /// Shared HMAC secret
    #[must_use]
    pub fn hmac_sha256(secret: &[u8]) -> Self {
        Self::HmacSha256(hmac::Key::new(hmac::HMAC_SHA256, secret))
    }

    /// Wrap a resolver-provided key
    #[must_use]
    pub fn custom<V>(key: V) -> Self
    where
        V: Verify + 'static,
    {
        Self::Custom(Arc::new(key))
    }

    /// Algorithm this key is bound to
    #[must_use]
    pub fn algorithm(&self) -> Option<Algorithm> {
        match self {
            Self::RsaPssSha512(..) => Some(Algorithm::RsaPssSha512),
            Self::EcdsaP256Sha256(..) => Some(Algorithm::EcdsaP256Sha256),
            Self::HmacSha256(..) => Some(Algorithm::HmacSha256),
            Self::Custom(key) => key.algorithm(),
        }
    }

    /// Start a new verifying operation
    #[must_use]
    pub fn operation(&self) -> VerifyingOperation<'_> {
        let state = match self {
            Self::HmacSha256(key) => State::Hmac(hmac::Context::with_key(key)),
            Self::RsaPssSha512(..) | Self::EcdsaP256Sha256(..) | Self::Custom(..) => {
                State::Buffered(Vec::new())
            }
        };

        VerifyingOperation { key: self, state }
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VerifyingKey")
            .field(&self.algorithm())
            .finish()
    }
}

enum State {
    Buffered(Vec<u8>),
    Hmac(hmac::Context),
}

/// Single-use verifying operation
///
/// Feed it the signing base via [`update`](Self::update), then call [`verify`](Self::verify).
pub struct VerifyingOperation<'a> {
    key: &'a VerifyingKey,
    state: State,
}

impl VerifyingOperation<'_> {
    /// Feed data into the operation
    pub fn update(&mut self, data: &[u8]) {
        match self.state {
            State::Buffered(ref mut buffer) => buffer.extend_from_slice(data),
            State::Hmac(ref mut context) => context.update(data),
        }
    }

    /// Check the signature against everything fed into the operation
    pub fn verify(self, signature: &[u8]) -> Result<(), Error> {
        let is_valid = match (self.key, self.state) {
            (
                VerifyingKey::RsaPssSha512(key) | VerifyingKey::EcdsaP256Sha256(key),
                State::Buffered(message),
            ) => key.verify(&message, signature).is_ok(),
            (VerifyingKey::HmacSha256(..), State::Hmac(context)) => {
                let tag = context.sign();
                tag.as_ref().ct_eq(signature).into()
            }
            (VerifyingKey::Custom(key), State::Buffered(message)) => {
                key.verify(&message, signature).is_ok()
            }
            _ => false,
        };

        if is_valid {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

impl std::io::Write for VerifyingOperation<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
