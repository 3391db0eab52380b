//!
//! Splitting of the `Signature` and `Signature-Input` headers into labeled members
//!

use crate::{Error, Result};
use http::{HeaderMap, HeaderName};
use std::borrow::Cow;

const MEMBER_SEPARATOR: &str = ", ";

/// Read a header, combining multiple field lines into one value
pub fn combined_value<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Result<Option<Cow<'a, str>>> {
    let mut values = headers.get_all(name).iter();
    let Some(first) = values.next() else {
        return Ok(None);
    };

    let first = first.to_str().map_err(|_| Error::MalformedSignature)?;
    let mut combined = Cow::Borrowed(first);
    for value in values {
        let value = value.to_str().map_err(|_| Error::MalformedSignature)?;
        let buffer = combined.to_mut();
        buffer.push_str(MEMBER_SEPARATOR);
        buffer.push_str(value);
    }

    Ok(Some(combined))
}

/// Split a header value into its `(label, value)` members
///
/// Members without a label or with a duplicate label make the whole header malformed.
pub fn split(value: &str) -> Result<Vec<(&str, &str)>> {
    let mut members: Vec<(&str, &str)> = Vec::new();

    for member in value.split(MEMBER_SEPARATOR) {
        let Some((label, value)) = member.split_once('=') else {
            debug!("header member without label");
            return Err(Error::MalformedSignature);
        };

        if label.is_empty() || members.iter().any(|(existing, _)| *existing == label) {
            debug!(label, "empty or duplicate label");
            return Err(Error::MalformedSignature);
        }

        members.push((label, value));
    }

    Ok(members)
}

/// Pair of the split `Signature-Input` and `Signature` members
pub struct Members<'a> {
    pub inputs: Vec<(&'a str, &'a str)>,
    pub signatures: Vec<(&'a str, &'a str)>,
}

impl<'a> Members<'a> {
    /// Split both headers, checking that they contain the same number of members
    pub fn split(signature_input: &'a str, signature: &'a str) -> Result<Self> {
        let inputs = split(signature_input)?;
        let signatures = split(signature)?;

        if inputs.len() != signatures.len() {
            debug!(
                inputs = inputs.len(),
                signatures = signatures.len(),
                "unbalanced signature headers"
            );
            return Err(Error::MalformedSignature);
        }

        Ok(Self { inputs, signatures })
    }

    /// Look up the signature belonging to the label and strip its `:` delimiters
    pub fn signature(&self, label: &str) -> Result<&'a str> {
        let (_, value) = self
            .signatures
            .iter()
            .find(|(candidate, _)| *candidate == label)
            .ok_or(Error::MalformedSignature)?;

        value
            .strip_prefix(':')
            .and_then(|value| value.strip_suffix(':'))
            .filter(|value| !value.is_empty())
            .ok_or(Error::MalformedSignature)
    }
}
