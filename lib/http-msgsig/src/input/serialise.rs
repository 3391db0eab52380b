use super::SignatureParams;
use std::fmt::Write;

/// Whether the string parameter value survives serialisation and parsing unchanged
///
/// Quotes and backslashes can't be escaped, and `", "` would split the header into two members.
#[must_use]
pub fn is_representable(value: &str) -> bool {
    !value.contains(['"', '\\']) && !value.contains(", ")
}

/// Serialise signature parameters into a `Signature-Input` member value
///
/// Component identifiers are lowercased, parameters are emitted in lexical order.
#[inline]
#[must_use]
pub fn serialise(params: &SignatureParams<'_>) -> String {
    let quoted = params
        .components
        .iter()
        .map(|component| format!("\"{}\"", component.to_ascii_lowercase()));

    let mut buffer = String::from("(");
    for item in itertools::intersperse(quoted, " ".into()) {
        buffer.push_str(&item);
    }
    buffer.push(')');

    if let Some(algorithm) = params.algorithm {
        let _ = write!(buffer, ";alg=\"{algorithm}\"");
    }

    if let Some(created) = params.created {
        let _ = write!(buffer, ";created={created}");
    }

    if let Some(expires) = params.expires {
        let _ = write!(buffer, ";expires={expires}");
    }

    let _ = write!(buffer, ";keyid=\"{}\"", params.key_id);

    if let Some(nonce) = params.nonce {
        let _ = write!(buffer, ";nonce=\"{nonce}\"");
    }

    buffer
}
