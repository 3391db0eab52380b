use crate::{
    clock::{Clock, SystemClock},
    component::{self, Message},
    digest,
    header::{self, Members},
    input::{self, SignatureParams},
    key_store::KeyStore,
    Error, Result, DIGEST, SIGNATURE, SIGNATURE_INPUT,
};
use http::{request::Parts, HeaderMap, HeaderName};
use std::{borrow::Cow, sync::Arc, time::Duration};
use typed_builder::TypedBuilder;

/// HTTP message verifier
///
/// Out of all signatures on the message, the first one whose key ID the key store knows gets verified.
/// All the other signatures are ignored, even if they would have verified successfully.
#[derive(Clone, TypedBuilder)]
pub struct Verifier {
    /// Store the key IDs are resolved against
    key_store: Arc<KeyStore>,

    /// Clock the expiry is checked against
    #[builder(
        default = Arc::new(SystemClock) as Arc<dyn Clock>,
        setter(transform = |clock: impl Clock + 'static| Arc::new(clock) as Arc<dyn Clock>)
    )]
    clock: Arc<dyn Clock>,

    /// Maximum age of a signature, measured from its `created` parameter
    ///
    /// If set, signatures without a `created` parameter or with a `created` parameter in the future are rejected
    #[builder(default, setter(strip_option))]
    max_age: Option<Duration>,

    /// Reject requests without a `Digest` header in [`verify_request`](Self::verify_request)
    #[builder(default)]
    require_digest: bool,
}

/// Combined header value, `None` if the header is absent or blank
fn non_empty_value<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Result<Option<Cow<'a, str>>> {
    let value = header::combined_value(headers, name)?;
    Ok(value.filter(|value| !value.trim().is_empty()))
}

impl Verifier {
    fn check_age(&self, params: &SignatureParams<'_>) -> Result<()> {
        let now = self.clock.now();
        if params.is_expired(now) {
            debug!(expires = ?params.expires, "signature expired");
            return Err(Error::SignatureExpired);
        }

        if let Some(max_age) = self.max_age {
            let is_fresh = params
                .created_at()
                .and_then(|created| now.duration_since(created).ok())
                .is_some_and(|age| age <= max_age);

            if !is_fresh {
                debug!(created = ?params.created, "signature missing creation timestamp, too old, or from the future");
                return Err(Error::SignatureExpired);
            }
        }

        Ok(())
    }

    /// Verify the signature on the message
    ///
    /// Returns the key ID the message was signed with
    #[instrument(skip_all)]
    pub fn verify<M>(&self, message: &M) -> Result<String>
    where
        M: Message + ?Sized,
    {
        let headers = message.headers();
        if !headers.contains_key(&SIGNATURE_INPUT) || !headers.contains_key(&SIGNATURE) {
            debug!("missing signature headers");
            return Err(Error::NotSigned);
        }

        let Some(signature_input) = non_empty_value(headers, &SIGNATURE_INPUT)? else {
            debug!("empty signature input header");
            return Err(Error::NotSigned);
        };
        let Some(signature) = non_empty_value(headers, &SIGNATURE)? else {
            debug!("empty signature header");
            return Err(Error::NotSigned);
        };
        let members = Members::split(&signature_input, &signature)?;

        // Members after the selected one are never parsed
        let mut selected = None;
        for (label, raw_params) in &members.inputs {
            let params = input::parse(raw_params)?;
            if let Some(entry) = self.key_store.resolve(params.key_id) {
                selected = Some((*label, *raw_params, params, entry));
                break;
            }
        }

        let Some((label, raw_params, params, entry)) = selected else {
            debug!("none of the key IDs are known");
            return Err(Error::UnknownKey);
        };

        let encoded_signature = members.signature(label)?;

        if let (Some(bound), Some(declared)) = (entry.algorithm(), params.algorithm) {
            if bound.as_ref() != declared {
                debug!(%bound, declared, "algorithm mismatch");
                return Err(Error::AlgMismatch);
            }
        }

        let signature = base64_simd::STANDARD
            .decode_to_vec(encoded_signature)
            .map_err(|_| Error::MalformedSignature)?;

        let signing_base =
            component::signing_base(params.components.iter().copied(), raw_params, message)?;

        let mut operation = entry.operation();
        operation.update(&signing_base);
        operation.verify(&signature).inspect_err(|_| {
            debug!(label, key_id = entry.key_id(), "signature verification failed");
        })?;

        self.check_age(&params)?;

        debug!(label, key_id = entry.key_id(), "verified signature");

        Ok(entry.key_id().to_string())
    }

    /// Verify the signature on the request, then the `Digest` header against the body
    ///
    /// Returns the key ID the request was signed with
    #[instrument(skip_all)]
    pub fn verify_request(&self, parts: &Parts, body: &[u8]) -> Result<String> {
        let key_id = self.verify(parts)?;

        match parts.headers.get(&DIGEST) {
            Some(value) => {
                let value = value.to_str().map_err(|_| Error::MalformedDigest)?;
                digest::verify(body, value)?;
            }
            None if self.require_digest => {
                debug!("request without digest header");
                return Err(Error::MissingDigest);
            }
            None => {}
        }

        Ok(key_id)
    }
}
