use super::Algorithm;
use ring::{
    error::{KeyRejected, Unspecified},
    hmac,
    rand::SystemRandom,
    signature::{EcdsaKeyPair, RsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING, RSA_PSS_SHA512},
};
use std::{fmt, sync::Arc};

/// Enum dispatch over the supported signing keys
#[derive(Clone)]
#[non_exhaustive]
pub enum SigningKey {
    /// `rsa-pss-sha512`
    RsaPssSha512(Arc<RsaKeyPair>),

    /// `ecdsa-p256-sha256`
    EcdsaP256Sha256(Arc<EcdsaKeyPair>),

    /// `hmac-sha256`
    HmacSha256(hmac::Key),
}

impl SigningKey {
    /// RSA key from its PKCS#8 DER form, used for RSASSA-PSS with SHA-512
    pub fn rsa_pss_sha512(pkcs8: &[u8]) -> Result<Self, KeyRejected> {
        RsaKeyPair::from_pkcs8(pkcs8).map(Self::from)
    }

    /// P-256 key from its PKCS#8 DER form
    pub fn ecdsa_p256_sha256(pkcs8: &[u8]) -> Result<Self, KeyRejected> {
        let key_pair =
            EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8, &SystemRandom::new())?;

        Ok(Self::EcdsaP256Sha256(Arc::new(key_pair)))
    }

    /// Shared HMAC secret
    #[must_use]
    pub fn hmac_sha256(secret: &[u8]) -> Self {
        Self::HmacSha256(hmac::Key::new(hmac::HMAC_SHA256, secret))
    }

    /// Algorithm this key is bound to
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::RsaPssSha512(..) => Algorithm::RsaPssSha512,
            Self::EcdsaP256Sha256(..) => Algorithm::EcdsaP256Sha256,
            Self::HmacSha256(..) => Algorithm::HmacSha256,
        }
    }

    /// Start a new signing operation
    #[must_use]
    pub fn operation(&self) -> SigningOperation<'_> {
        let state = match self {
            Self::HmacSha256(key) => State::Hmac(hmac::Context::with_key(key)),
            Self::RsaPssSha512(..) | Self::EcdsaP256Sha256(..) => State::Buffered(Vec::new()),
        };

        SigningOperation { key: self, state }
    }
}

impl From<RsaKeyPair> for SigningKey {
    fn from(value: RsaKeyPair) -> Self {
        Self::RsaPssSha512(Arc::new(value))
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey")
            .field(&self.algorithm())
            .finish()
    }
}

enum State {
    Buffered(Vec<u8>),
    Hmac(hmac::Context),
}

impl State {
    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Buffered(buffer) => buffer.extend_from_slice(data),
            Self::Hmac(context) => context.update(data),
        }
    }
}

/// Single-use signing operation
///
/// Feed it the signing base via [`update`](Self::update), then call [`finish`](Self::finish).
pub struct SigningOperation<'a> {
    key: &'a SigningKey,
    state: State,
}

impl SigningOperation<'_> {
    /// Feed data into the operation
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Produce the signature over everything fed into the operation
    pub fn finish(self) -> Result<Vec<u8>, Unspecified> {
        match (self.key, self.state) {
            (SigningKey::RsaPssSha512(key), State::Buffered(message)) => {
                let mut signature = vec![0; key.public().modulus_len()];
                key.sign(&RSA_PSS_SHA512, &SystemRandom::new(), &message, &mut signature)?;

                Ok(signature)
            }
            (SigningKey::EcdsaP256Sha256(key), State::Buffered(message)) => {
                let signature = key.sign(&SystemRandom::new(), &message)?;
                Ok(signature.as_ref().to_vec())
            }
            (SigningKey::HmacSha256(..), State::Hmac(context)) => {
                Ok(context.sign().as_ref().to_vec())
            }
            _ => Err(Unspecified),
        }
    }
}

impl std::io::Write for SigningOperation<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
