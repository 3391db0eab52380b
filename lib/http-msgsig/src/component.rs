//!
//! Canonicalisation of message components into lines of the signing base
//!

use crate::{Error, Result};
use http::{header::HOST, request::Parts, HeaderMap, Request};

const METHOD: &str = "@method";
const PATH: &str = "@path";
const QUERY: &str = "@query";
const AUTHORITY: &str = "@authority";

/// Read access to the parts of a request that can be covered by a signature
pub trait Message {
    /// HTTP method
    fn method(&self) -> &str;

    /// Path of the request target
    fn path(&self) -> &str;

    /// Raw query string, without the leading `?`
    fn query(&self) -> Option<&str>;

    /// Authority (host and, if non-default, port) as presented
    fn authority(&self) -> Option<&str>;

    /// Header multimap
    fn headers(&self) -> &HeaderMap;
}

fn authority_of<'a>(uri: &'a http::Uri, headers: &'a HeaderMap) -> Option<&'a str> {
    uri.authority()
        .map(http::uri::Authority::as_str)
        .or_else(|| headers.get(HOST).and_then(|host| host.to_str().ok()))
}

impl Message for Parts {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn path(&self) -> &str {
        self.uri.path()
    }

    fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    fn authority(&self) -> Option<&str> {
        authority_of(&self.uri, &self.headers)
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl<B> Message for Request<B> {
    fn method(&self) -> &str {
        self.method().as_str()
    }

    fn path(&self) -> &str {
        self.uri().path()
    }

    fn query(&self) -> Option<&str> {
        self.uri().query()
    }

    fn authority(&self) -> Option<&str> {
        authority_of(self.uri(), self.headers())
    }

    fn headers(&self) -> &HeaderMap {
        self.headers()
    }
}

#[inline]
fn write_line(out: &mut Vec<u8>, name: &str, value: &[u8]) {
    out.push(b'"');
    out.extend(name.bytes().map(|byte| byte.to_ascii_lowercase()));
    out.extend_from_slice(b"\": ");
    out.extend_from_slice(value);
    out.push(b'\n');
}

/// Append the canonical line of the component to the output buffer
///
/// Components are either specialty components (`@method`, `@path`, `@query`, `@authority`) or header names.
/// Header names are matched case-insensitively. Headers set multiple times are combined into one line,
/// each value trimmed and joined with `", "` in the order they appear in.
pub fn canonicalize<M>(out: &mut Vec<u8>, component: &str, message: &M) -> Result<()>
where
    M: Message + ?Sized,
{
    match component {
        METHOD => {
            let method = message.method().to_ascii_uppercase();
            write_line(out, METHOD, method.as_bytes());
        }
        PATH => {
            let path = message.path();
            if !path.starts_with('/') {
                debug!(path, "path is empty or not absolute");
                return Err(Error::ComponentNotFound(PATH.into()));
            }

            write_line(out, PATH, path.as_bytes());
        }
        QUERY => {
            let query = format!("?{}", message.query().unwrap_or_default());
            write_line(out, QUERY, query.as_bytes());
        }
        AUTHORITY => {
            let authority = message
                .authority()
                .filter(|authority| !authority.is_empty())
                .ok_or_else(|| Error::ComponentNotFound(AUTHORITY.into()))?;

            write_line(out, AUTHORITY, authority.as_bytes());
        }
        name if name.starts_with('@') => {
            debug!(name, "unsupported specialty component");
            return Err(Error::ComponentNotFound(name.into()));
        }
        name => {
            let mut values = message.headers().get_all(name).iter().peekable();
            if values.peek().is_none() {
                return Err(Error::ComponentNotFound(name.into()));
            }

            let mut combined = Vec::new();
            for (idx, value) in values.enumerate() {
                if idx > 0 {
                    combined.extend_from_slice(b", ");
                }
                combined.extend_from_slice(value.as_bytes().trim_ascii());
            }

            write_line(out, name, &combined);
        }
    }

    Ok(())
}

/// Build the complete signing base
///
/// Every component gets its own line, followed by the `@signature-params` line which carries the serialised
/// signature parameters verbatim (and isn't terminated by a line break).
pub fn signing_base<'a, M, I>(components: I, params: &str, message: &M) -> Result<Vec<u8>>
where
    M: Message + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    let mut base = Vec::with_capacity(256);
    for component in components {
        canonicalize(&mut base, component, message)?;
    }

    base.extend_from_slice(b"\"@signature-params\": ");
    base.extend_from_slice(params.as_bytes());

    Ok(base)
}
