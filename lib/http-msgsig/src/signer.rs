use crate::{
    clock::{Clock, SystemClock},
    component::{self, Message},
    crypto::SigningKey,
    digest,
    input::{self, SignatureParams},
    util::UnixTimestampExt,
    Error, Result, DIGEST, SIGNATURE, SIGNATURE_INPUT,
};
use http::{request::Parts, HeaderMap, HeaderValue};
use std::{sync::Arc, time::Duration};
use typed_builder::TypedBuilder;

/// Components every signature covers, in this order, unless listed explicitly
const REQUIRED_COMPONENTS: [&str; 4] = ["@method", "@path", "@query", "digest"];

/// Header values produced by the signer
#[derive(Clone, Debug)]
pub struct SignatureHeaders {
    /// `Signature-Input` header value
    pub signature_input: HeaderValue,

    /// `Signature` header value
    pub signature: HeaderValue,
}

impl SignatureHeaders {
    /// Insert the headers into the map, replacing existing ones
    pub fn apply(self, headers: &mut HeaderMap) {
        headers.insert(SIGNATURE_INPUT.clone(), self.signature_input);
        headers.insert(SIGNATURE.clone(), self.signature);
    }
}

/// HTTP message signer
///
/// Produces one signature per configured key. The labels are assigned in configuration order (`sig1`, `sig2`, ..).
#[derive(Clone, TypedBuilder)]
pub struct Signer {
    /// Key IDs and their keys
    keys: Vec<(String, SigningKey)>,

    /// Headers to cover in addition to `@method`, `@path`, `@query`, and `digest`
    #[builder(default = vec!["content-type".into(), "content-length".into()])]
    components: Vec<String>,

    /// Duration after which the signatures expire
    #[builder(default, setter(strip_option))]
    expires_in: Option<Duration>,

    /// Clock the `created` and `expires` timestamps are read from
    #[builder(
        default = Arc::new(SystemClock) as Arc<dyn Clock>,
        setter(transform = |clock: impl Clock + 'static| Arc::new(clock) as Arc<dyn Clock>)
    )]
    clock: Arc<dyn Clock>,
}

impl Signer {
    /// Covered components in signing order
    ///
    /// Missing required components are prepended, headers are lowercased and deduplicated.
    fn covered_components(&self) -> Vec<String> {
        let mut configured: Vec<String> = Vec::with_capacity(self.components.len());
        for component in &self.components {
            let component = component.to_ascii_lowercase();
            if !configured.contains(&component) {
                configured.push(component);
            }
        }

        let mut covered: Vec<String> = REQUIRED_COMPONENTS
            .iter()
            .filter(|required| !configured.iter().any(|component| component == **required))
            .map(|required| (*required).to_string())
            .collect();
        covered.extend(configured);

        covered
    }

    /// Sign the message
    ///
    /// Either every key produces a signature or the whole call fails
    #[instrument(skip_all)]
    pub fn sign<M>(&self, message: &M) -> Result<SignatureHeaders>
    where
        M: Message + ?Sized,
    {
        if self.keys.is_empty() {
            debug!("no signing keys configured");
            return Err(Error::Signing);
        }

        if let Some((key_id, _)) = self
            .keys
            .iter()
            .find(|(key_id, _)| !input::is_representable(key_id))
        {
            debug!(key_id, "key ID can't be represented in the signature input");
            return Err(Error::InvalidKeyId(key_id.clone()));
        }

        let components = self.covered_components();
        let created = self.clock.now();
        let expires = self.expires_in.map(|expires_in| created + expires_in);

        let mut inputs = Vec::with_capacity(self.keys.len());
        let mut signatures = Vec::with_capacity(self.keys.len());

        for (idx, (key_id, key)) in self.keys.iter().enumerate() {
            let label = format!("sig{}", idx + 1);
            let algorithm = key.algorithm();

            let params = SignatureParams {
                components: components.iter().map(String::as_str).collect(),
                key_id: key_id.as_str(),
                algorithm: Some(algorithm.as_ref()),
                created: Some(created.to_unix_timestamp()),
                expires: expires.as_ref().map(UnixTimestampExt::to_unix_timestamp),
                nonce: None,
            };
            let params = input::serialise(&params);

            let signing_base = component::signing_base(
                components.iter().map(String::as_str),
                &params,
                message,
            )?;

            let mut operation = key.operation();
            operation.update(&signing_base);
            let signature = operation.finish().map_err(|_| {
                debug!(%label, key_id, %algorithm, "cryptography backend failed to sign");
                Error::Signing
            })?;

            debug!(%label, key_id, %algorithm, "signed message");

            inputs.push(format!("{label}={params}"));
            signatures.push(format!(
                "{label}=:{}:",
                base64_simd::STANDARD.encode_to_string(signature)
            ));
        }

        Ok(SignatureHeaders {
            signature_input: HeaderValue::from_str(&inputs.join(", "))?,
            signature: HeaderValue::from_str(&signatures.join(", "))?,
        })
    }

    /// Set the `Digest` header over the body, sign the request, and insert the signature headers
    ///
    /// On failure, the request headers are left untouched
    #[instrument(skip_all)]
    pub fn sign_request(&self, parts: &mut Parts, body: &[u8]) -> Result<()> {
        let digest = HeaderValue::from_str(&digest::calculate(body))?;
        let previous_digest = parts.headers.insert(DIGEST.clone(), digest);

        match self.sign(&*parts) {
            Ok(headers) => {
                headers.apply(&mut parts.headers);
                Ok(())
            }
            Err(error) => {
                match previous_digest {
                    Some(previous_digest) => parts.headers.insert(DIGEST.clone(), previous_digest),
                    None => parts.headers.remove(&DIGEST),
                };

                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::Signer;
    use crate::{crypto::SigningKey, Error, DIGEST, SIGNATURE, SIGNATURE_INPUT};
    use http::{request::Parts, Method, Request};
    use std::time::{Duration, SystemTime};

    fn frozen() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_618_884_475)
    }

    fn parts() -> Parts {
        Request::builder()
            .method(Method::POST)
            .uri("https://example.com/foo?param=value")
            .header("content-type", "application/json")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn component_normalisation() {
        let signer = Signer::builder()
            .keys(vec![])
            .components(vec![
                "Content-Type".into(),
                "digest".into(),
                "content-type".into(),
            ])
            .build();

        assert_eq!(
            signer.covered_components(),
            ["@method", "@path", "@query", "content-type", "digest"]
        );
    }

    #[test]
    fn default_components() {
        let signer = Signer::builder().keys(vec![]).build();

        assert_eq!(
            signer.covered_components(),
            [
                "@method",
                "@path",
                "@query",
                "digest",
                "content-type",
                "content-length"
            ]
        );
    }

    #[test]
    fn labels_and_params() {
        let signer = Signer::builder()
            .keys(vec![
                ("first".into(), SigningKey::hmac_sha256(b"one")),
                ("second".into(), SigningKey::hmac_sha256(b"two")),
            ])
            .components(vec!["content-type".into()])
            .expires_in(Duration::from_secs(300))
            .clock(frozen)
            .build();

        let mut parts = parts();
        signer.sign_request(&mut parts, b"{}").unwrap();

        let signature_input = parts.headers[&SIGNATURE_INPUT].to_str().unwrap();
        assert_eq!(
            signature_input,
            "sig1=(\"@method\" \"@path\" \"@query\" \"digest\" \"content-type\");alg=\"hmac-sha256\";created=1618884475;expires=1618884775;keyid=\"first\", \
             sig2=(\"@method\" \"@path\" \"@query\" \"digest\" \"content-type\");alg=\"hmac-sha256\";created=1618884475;expires=1618884775;keyid=\"second\""
        );

        let signature = parts.headers[&SIGNATURE].to_str().unwrap();
        assert!(signature.starts_with("sig1=:"));
        assert!(signature.contains(":, sig2=:"));
        assert!(signature.ends_with(':'));
    }

    #[test]
    fn failure_leaves_request_untouched() {
        let signer = Signer::builder()
            .keys(vec![("key".into(), SigningKey::hmac_sha256(b"secret"))])
            .components(vec!["x-missing".into()])
            .build();

        let mut parts = parts();
        let result = signer.sign_request(&mut parts, b"{}");

        assert!(matches!(result, Err(Error::ComponentNotFound(name)) if name == "x-missing"));
        assert!(!parts.headers.contains_key(&DIGEST));
        assert!(!parts.headers.contains_key(&SIGNATURE));
        assert!(!parts.headers.contains_key(&SIGNATURE_INPUT));
    }

    #[test]
    fn unrepresentable_key_id() {
        for key_id in ["with \"quotes\"", "back\\slash", "comma, space"] {
            let signer = Signer::builder()
                .keys(vec![
                    ("fine".into(), SigningKey::hmac_sha256(b"secret")),
                    (key_id.into(), SigningKey::hmac_sha256(b"secret")),
                ])
                .components(vec!["content-type".into()])
                .build();

            let mut parts = parts();
            assert!(matches!(
                signer.sign_request(&mut parts, b"{}"),
                Err(Error::InvalidKeyId(rejected)) if rejected == key_id
            ));
            assert!(!parts.headers.contains_key(&SIGNATURE_INPUT));
        }
    }

    #[test]
    fn no_keys() {
        let signer = Signer::builder().keys(vec![]).build();
        assert!(matches!(signer.sign(&parts()), Err(Error::Signing)));
    }
}
