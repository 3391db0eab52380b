use super::SignatureParams;
use logos::{Logos, Span, SpannedIter};
use miette::{Diagnostic, SourceSpan};
use std::iter::Peekable;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Logos, PartialEq)]
enum TokenTy {
    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token(" ")]
    Space,

    #[token(";")]
    Semicolon,

    #[token("=")]
    Equals,

    #[regex(r#""[^"\\]*""#)]
    String,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[a-z*][a-z0-9_.*-]*")]
    Key,
}

/// Reason the parser rejected the input
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Parameter was specified more than once
    #[error("Duplicate parameter")]
    DuplicateParameter,

    /// The list of covered components is empty
    #[error("Empty component list")]
    EmptyComponentList,

    /// Timestamp isn't a non-negative integer
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Input contains characters that aren't part of the grammar
    #[error("Invalid token")]
    InvalidToken,

    /// The `keyid` parameter is missing
    #[error("Missing key ID")]
    MissingKeyId,

    /// Input ended prematurely
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// Token is valid but not allowed at this position
    #[error("Unexpected token")]
    UnexpectedToken,
}

/// `Signature-Input` parsing error
#[derive(Debug, Diagnostic, Error)]
#[error("{kind}")]
#[diagnostic(code(http_msgsig::input::parse))]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,

    /// Where it went wrong
    #[label("here")]
    pub span: SourceSpan,
}

struct Parser<'a> {
    input: &'a str,
    tokens: Peekable<SpannedIter<'a, TokenTy>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: TokenTy::lexer(input).spanned().peekable(),
        }
    }

    #[inline]
    fn error(kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError {
            kind,
            span: span.into(),
        }
    }

    fn next_token(&mut self) -> Result<(TokenTy, Span), ParseError> {
        match self.tokens.next() {
            Some((Ok(ty), span)) => Ok((ty, span)),
            Some((Err(()), span)) => Err(Self::error(ParseErrorKind::InvalidToken, span)),
            None => Err(Self::error(
                ParseErrorKind::UnexpectedEnd,
                self.input.len()..self.input.len(),
            )),
        }
    }

    fn expect(&mut self, expected: TokenTy) -> Result<Span, ParseError> {
        let (ty, span) = self.next_token()?;
        if ty == expected {
            Ok(span)
        } else {
            Err(Self::error(ParseErrorKind::UnexpectedToken, span))
        }
    }

    fn unquote(&self, span: Span) -> &'a str {
        let input = self.input;
        &input[span.start + 1..span.end - 1]
    }

    fn components(&mut self) -> Result<Vec<&'a str>, ParseError> {
        let open = self.expect(TokenTy::OpenParen)?;

        let (mut ty, mut span) = self.next_token()?;
        if ty == TokenTy::CloseParen {
            return Err(Self::error(
                ParseErrorKind::EmptyComponentList,
                open.start..span.end,
            ));
        }

        let mut components = Vec::new();
        loop {
            if ty != TokenTy::String || span.len() == 2 {
                return Err(Self::error(ParseErrorKind::UnexpectedToken, span));
            }
            components.push(self.unquote(span));

            let (separator, separator_span) = self.next_token()?;
            match separator {
                TokenTy::CloseParen => break,
                TokenTy::Space => (ty, span) = self.next_token()?,
                _ => {
                    return Err(Self::error(
                        ParseErrorKind::UnexpectedToken,
                        separator_span,
                    ))
                }
            }
        }

        Ok(components)
    }

    fn string(&self, ty: TokenTy, span: Span) -> Result<&'a str, ParseError> {
        if ty == TokenTy::String {
            Ok(self.unquote(span))
        } else {
            Err(Self::error(ParseErrorKind::UnexpectedToken, span))
        }
    }

    fn timestamp(&self, ty: TokenTy, span: Span) -> Result<u64, ParseError> {
        if ty != TokenTy::Integer {
            return Err(Self::error(ParseErrorKind::InvalidTimestamp, span));
        }

        self.input[span.clone()]
            .parse()
            .map_err(|_| Self::error(ParseErrorKind::InvalidTimestamp, span))
    }

    fn parse(mut self) -> Result<SignatureParams<'a>, ParseError> {
        let components = self.components()?;

        let mut seen_keys: Vec<&str> = Vec::new();
        let mut key_id = None;
        let mut algorithm = None;
        let mut created = None;
        let mut expires = None;
        let mut nonce = None;

        while self.tokens.peek().is_some() {
            self.expect(TokenTy::Semicolon)?;
            let key_span = self.expect(TokenTy::Key)?;
            self.expect(TokenTy::Equals)?;
            let (value_ty, value_span) = self.next_token()?;

            let input = self.input;
            let key = &input[key_span.clone()];
            if seen_keys.contains(&key) {
                return Err(Self::error(ParseErrorKind::DuplicateParameter, key_span));
            }
            seen_keys.push(key);

            match key {
                "keyid" => key_id = Some(self.string(value_ty, value_span)?),
                "alg" => algorithm = Some(self.string(value_ty, value_span)?),
                "nonce" => nonce = Some(self.string(value_ty, value_span)?),
                "created" => created = Some(self.timestamp(value_ty, value_span)?),
                "expires" => expires = Some(self.timestamp(value_ty, value_span)?),
                _ => {
                    // Unknown parameters are ignored, as long as their value is well-formed
                    if !matches!(value_ty, TokenTy::String | TokenTy::Integer) {
                        return Err(Self::error(ParseErrorKind::UnexpectedToken, value_span));
                    }
                }
            }
        }

        let key_id = key_id
            .ok_or_else(|| Self::error(ParseErrorKind::MissingKeyId, 0..self.input.len()))?;

        Ok(SignatureParams {
            components,
            key_id,
            algorithm,
            created,
            expires,
            nonce,
        })
    }
}

/// Parse a `Signature-Input` member value (the part after `<label>=`)
///
/// Unknown parameters are ignored, duplicate parameters are rejected.
#[inline]
pub fn parse(input: &str) -> Result<SignatureParams<'_>, ParseError> {
    Parser::new(input).parse()
}

#[cfg(test)]
mod test {
    use super::{parse, ParseErrorKind};
    use proptest::{prop_assert, proptest};

    const INPUT: &str = r#"("@method" "@path" "@query" "digest" "content-type");alg="rsa-pss-sha512";created=1618884475;expires=1618884775;keyid="test-key-rsa-pss";nonce="b3k2pp5k7z""#;

    fn kind(input: &str) -> ParseErrorKind {
        parse(input).unwrap_err().kind
    }

    #[test]
    fn parse_input() {
        let params = parse(INPUT).unwrap();

        assert_eq!(
            params.components,
            ["@method", "@path", "@query", "digest", "content-type"]
        );
        assert_eq!(params.key_id, "test-key-rsa-pss");
        assert_eq!(params.algorithm, Some("rsa-pss-sha512"));
        assert_eq!(params.created, Some(1_618_884_475));
        assert_eq!(params.expires, Some(1_618_884_775));
        assert_eq!(params.nonce, Some("b3k2pp5k7z"));
    }

    #[test]
    fn parameters_in_any_order() {
        let params = parse(r#"("@method");keyid="test";created=5;alg="hmac-sha256""#).unwrap();

        assert_eq!(params.components, ["@method"]);
        assert_eq!(params.key_id, "test");
        assert_eq!(params.algorithm, Some("hmac-sha256"));
        assert_eq!(params.created, Some(5));
        assert_eq!(params.expires, None);
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let params = parse(r#"("@method");tag="app";keyid="test";extra=42"#).unwrap();
        assert_eq!(params.key_id, "test");
    }

    #[test]
    fn empty_component_list() {
        assert_eq!(kind(r#"();keyid="test""#), ParseErrorKind::EmptyComponentList);
    }

    #[test]
    fn empty_component_identifier() {
        assert_eq!(kind(r#"("");keyid="test""#), ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn duplicate_parameter() {
        assert_eq!(
            kind(r#"("@method");keyid="a";keyid="b""#),
            ParseErrorKind::DuplicateParameter
        );
        assert_eq!(
            kind(r#"("@method");keyid="a";x=1;x=2"#),
            ParseErrorKind::DuplicateParameter
        );
    }

    #[test]
    fn invalid_timestamp() {
        assert_eq!(
            kind(r#"("@method");keyid="a";created="yesterday""#),
            ParseErrorKind::InvalidTimestamp
        );
        assert_eq!(
            kind(r#"("@method");keyid="a";expires=99999999999999999999999"#),
            ParseErrorKind::InvalidTimestamp
        );
        assert_eq!(
            kind(r#"("@method");keyid="a";created=-1"#),
            ParseErrorKind::InvalidToken
        );
    }

    #[test]
    fn missing_key_id() {
        assert_eq!(kind(r#"("@method");alg="hmac-sha256""#), ParseErrorKind::MissingKeyId);
    }

    #[test]
    fn malformed_list() {
        assert_eq!(kind(r#""@method";keyid="a""#), ParseErrorKind::UnexpectedToken);
        assert_eq!(kind(r#"("@method""#), ParseErrorKind::UnexpectedEnd);
        assert_eq!(kind(r#"("@method""@path");keyid="a""#), ParseErrorKind::UnexpectedToken);
        assert_eq!(kind(r#"("@method"  "@path");keyid="a""#), ParseErrorKind::UnexpectedToken);
        assert_eq!(kind(r#"("@method") ;keyid="a""#), ParseErrorKind::UnexpectedToken);
        assert_eq!(kind(r#"("@method");keyid"#), ParseErrorKind::UnexpectedEnd);
        assert_eq!(kind(r#"(@method);keyid="a""#), ParseErrorKind::InvalidToken);
    }

    #[test]
    fn error_span_points_at_offender() {
        let input = r#"("@method");keyid="a";keyid="b""#;
        let err = parse(input).unwrap_err();

        assert_eq!(&input[err.span.offset()..err.span.offset() + err.span.len()], "keyid");
    }

    proptest! {
        #[test]
        fn never_panics(input: String) {
            let _ = parse(&input);
        }

        #[test]
        fn parses_arbitrary_component_lists(components in proptest::collection::vec("[a-z@-]{1,12}", 1..8)) {
            let list = components
                .iter()
                .map(|component| format!("\"{component}\""))
                .collect::<Vec<_>>()
                .join(" ");
            let input = format!("({list});keyid=\"test\"");

            let params = parse(&input);
            prop_assert!(params.is_ok());
            prop_assert!(params.unwrap().components == components.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
